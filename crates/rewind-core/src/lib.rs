pub mod batch;
pub mod branch;
pub mod config;
pub mod cutoff;
pub mod deadline;
pub mod error;
pub mod git;
pub mod inspect;
pub mod paths;
pub mod restore;
pub mod vcs;

pub use error::{Result, RewindError};
