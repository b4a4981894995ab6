//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.
//! The engine depends on exactly three capabilities: posting/updating
//! messages, listening for actions, and polling for single-shot decisions.

pub mod action_listener;
pub mod decision;
pub mod error;
pub mod messenger;
pub mod notice;
