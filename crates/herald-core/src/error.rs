//! # Herald Core Errors
//!
//! Defines [`Error`], the crate-wide enum wrapping each subsystem's typed
//! error, and the matching [`Result`] alias. Dispatcher operations return
//! [`EventSystemError`] directly; `Error` is for callers that mix dispatcher
//! calls with configuration loading.
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::config::error::ConfigError;
use crate::event::error::EventSystemError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// Specific, typed event system error
    #[error("Event system error: {0}")]
    EventSystem(#[from] EventSystemError),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for herald operations that span subsystems
pub type Result<T> = StdResult<T, Error>;
