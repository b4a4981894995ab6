//! Collecting one asynchronous answer per roster entity

pub mod action_collector;
pub mod policy;

pub use action_collector::{
    ActionCollector, CollectError, CollectorProgress, IdentityResolver, identity_equality,
};
pub use policy::RoundPolicy;
