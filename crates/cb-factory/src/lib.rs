pub mod builder;
pub mod codec;
pub mod launcher;
pub mod probe;
pub mod runner;
