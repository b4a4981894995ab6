//! Local action delivery
//!
//! [`InMemoryActionBus`] implements the action listener port for a single
//! process: front-ends call [`InMemoryActionBus::dispatch`] with whatever the
//! user typed or clicked.

mod in_memory;

pub use in_memory::InMemoryActionBus;
