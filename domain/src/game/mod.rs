//! Game flow model: phases, quests, proposals and the state aggregate

pub mod outcome;
pub mod phase;
pub mod proposal;
pub mod quest;
pub mod role_assignment;
pub mod state;
