//! Resume matcher library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use config::Config;
pub use error::{Result, ResumeMatcherError};
pub use processing::batch::{BatchMatcher, BatchOptions, CancellationFlag, ResumeInput};
pub use processing::matcher::{MatchResult, ResumeMatcher};
