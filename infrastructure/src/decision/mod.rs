//! Pending single-shot decisions
//!
//! [`DecisionDesk`] implements the decision port by parking each request
//! until its chooser answers through [`DecisionDesk::answer`].

mod desk;

pub use desk::{AnswerError, DecisionAnnouncer, DecisionDesk};
