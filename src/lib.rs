pub mod config;
pub mod error;
pub mod exec;
pub mod fetch;
pub mod git_ops;
pub mod offset;
pub mod package;
pub mod resolver;
pub mod sloc;
pub mod specfile;
pub mod tags;
pub mod ui;
pub mod version;

pub use error::{ReconstructError, Result};
