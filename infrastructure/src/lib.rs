//! Infrastructure layer for avalon-engine
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer for a single local process, plus configuration file
//! loading and logging setup.

pub mod bus;
pub mod config;
pub mod decision;
pub mod logging;

// Re-export commonly used types
pub use bus::InMemoryActionBus;
pub use config::{
    ConfigLoader, FileConfig, FileGameConfig, FileLoggingConfig, FileOutputConfig,
    FileRoundsConfig,
};
pub use decision::{AnswerError, DecisionAnnouncer, DecisionDesk};
pub use logging::{LogSettings, LoggingError};
