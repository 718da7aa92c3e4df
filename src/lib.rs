pub mod artwork;
pub mod batch;
pub mod common;
pub mod config;
pub mod download;
pub mod errors;
pub mod naming;
pub mod tagger;

pub use batch::{BatchOrchestrator, RunReport};
pub use config::TrackDescriptor;
pub use errors::{Result, TapedeckError, TapedeckExpectedError};

#[cfg(test)]
mod testing;

#[cfg(test)]
mod tagger_test;
