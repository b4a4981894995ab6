//! Core domain concepts shared across all subdomains.
//!
//! - [`player::Player`] : a seat at the table and the role dealt to it
//! - [`error`] : configuration, phase and assignment errors

pub mod error;
pub mod player;
