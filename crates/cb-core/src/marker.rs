use crate::ChainError;
use std::{fmt, str::FromStr};

const DELIMITER: char = ':';

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RegistryRoot {
    CurrentUser,
    LocalMachine,
    ClassesRoot,
    Users,
}

impl RegistryRoot {
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::CurrentUser => "HKCU",
            Self::LocalMachine => "HKLM",
            Self::ClassesRoot => "HKCR",
            Self::Users => "HKU",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        let roots = [
            (Self::CurrentUser, "HKEY_CURRENT_USER"),
            (Self::LocalMachine, "HKEY_LOCAL_MACHINE"),
            (Self::ClassesRoot, "HKEY_CLASSES_ROOT"),
            (Self::Users, "HKEY_USERS"),
        ];

        roots
            .into_iter()
            .find(|(root, long)| {
                token.eq_ignore_ascii_case(root.short_name()) || token.eq_ignore_ascii_case(long)
            })
            .map(|(root, _)| root)
    }
}

impl fmt::Display for RegistryRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// `ROOT:SubKeyPath:ValueName`. An empty value name means the key itself is the marker.
/// `:` cannot appear inside the sub key or value name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryMarker {
    pub root: RegistryRoot,
    pub sub_key: String,
    pub value_name: String,
}

impl RegistryMarker {
    #[inline]
    pub fn is_key_only(&self) -> bool {
        self.value_name.is_empty()
    }
}

impl FromStr for RegistryMarker {
    type Err = ChainError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ChainError::InvalidMarkerFormat {
            spec: spec.to_string(),
            reason,
        };

        let tokens: Vec<&str> = spec.split(DELIMITER).collect();
        let [root, sub_key, value_name] = tokens[..] else {
            return Err(invalid(format!("found {} fields", tokens.len())));
        };

        let root = RegistryRoot::from_token(root)
            .ok_or_else(|| invalid(format!("unknown root '{}'", root)))?;

        Ok(Self {
            root,
            sub_key: sub_key.to_string(),
            value_name: value_name.to_string(),
        })
    }
}

impl fmt::Display for RegistryMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}",
            self.root, self.sub_key, self.value_name
        )
    }
}
