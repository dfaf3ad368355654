use crate::ResourceSlot;
use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("{0}")]
    InvalidArguments(String),

    #[error("input file is missing or unreadable: {0:?}")]
    MissingInputFile(PathBuf),

    #[error("failed to write resource {slot} into {image:?}: {reason}")]
    ResourceWriteFailure {
        slot: ResourceSlot,
        image: PathBuf,
        reason: String,
    },

    #[error("resource {0} is not present in the image")]
    ResourceNotFound(ResourceSlot),

    #[error("invalid registry marker '{spec}': {reason} (expected <ROOT>:<SubKeyPath>:<ValueName>)")]
    InvalidMarkerFormat { spec: String, reason: String },

    #[error("prerequisite did not establish its registry marker '{0}'")]
    PrerequisiteVerificationFailed(String),

    #[error("resources are not embedded")]
    UnconfiguredResources,

    #[error("failed to launch {path:?}: {reason}")]
    LaunchFailed { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ChainError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LaunchFailed { .. } => 2,
            _ => 1,
        }
    }
}
