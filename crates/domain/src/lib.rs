//! Shared configuration and error types for the cronkit workspace.

pub mod config;
pub mod error;

pub use error::{Error, Result};
