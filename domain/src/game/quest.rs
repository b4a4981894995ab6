//! Quest progress tracking

use crate::config::{GameConfiguration, QuestAssignment};
use crate::core::player::PlayerId;
use crate::role::Faction;
use serde::{Deserialize, Serialize};

/// Public result of one completed quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestResult {
    Good,
    Bad,
}

impl QuestResult {
    /// The faction this result counts towards
    pub fn faction(&self) -> Faction {
        match self {
            QuestResult::Good => Faction::Good,
            QuestResult::Bad => Faction::Evil,
        }
    }
}

/// Outcome of evaluating one quest's cards.
///
/// Only `result` and the fail count are ever made public; who played what
/// stays hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestOutcome {
    pub result: QuestResult,
    pub fail_count: usize,
    pub required_fails: usize,
}

impl QuestOutcome {
    pub fn summary(&self) -> String {
        let plural = if self.fail_count == 1 { "" } else { "s" };
        match (self.result, self.fail_count) {
            (QuestResult::Good, 0) => "All team members succeeded!".to_string(),
            (QuestResult::Good, n) => format!(
                "{} fail vote{}, but {} required to fail the quest",
                n, plural, self.required_fails
            ),
            (QuestResult::Bad, n) => format!("{} fail vote{} - quest failed!", n, plural),
        }
    }
}

/// Tally of completed quests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub good: usize,
    pub bad: usize,
}

/// Display status of one quest slot on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestStatus {
    Succeeded,
    Failed,
    Current,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestBoardEntry {
    pub index: usize,
    pub status: QuestStatus,
    pub team_size: usize,
    pub requires_two_fails: bool,
}

/// Tracks the five quests of one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestManager {
    assignments: [QuestAssignment; 5],
    progress: Vec<QuestResult>,
}

impl QuestManager {
    pub fn new(config: &GameConfiguration) -> Self {
        Self::with_assignments(config.quest_assignments())
    }

    pub fn with_assignments(assignments: [QuestAssignment; 5]) -> Self {
        Self {
            assignments,
            progress: Vec::with_capacity(GameConfiguration::QUEST_COUNT),
        }
    }

    /// 0-based index of the quest being played (5 once all are done)
    pub fn current_quest_index(&self) -> usize {
        self.progress.len()
    }

    pub fn is_complete(&self) -> bool {
        self.progress.len() >= GameConfiguration::QUEST_COUNT
    }

    /// Assignment for the quest being played; the last quest once complete.
    pub fn current_assignment(&self) -> QuestAssignment {
        let index = self.current_quest_index().min(GameConfiguration::QUEST_COUNT - 1);
        self.assignments[index]
    }

    pub fn assignment(&self, quest_index: usize) -> Option<QuestAssignment> {
        self.assignments.get(quest_index).copied()
    }

    pub fn progress(&self) -> &[QuestResult] {
        &self.progress
    }

    /// Append a result and advance to the next quest.
    ///
    /// Returns `false` (and records nothing) once all five quests are done.
    #[must_use]
    pub fn record_quest_result(&mut self, result: QuestResult) -> bool {
        if self.is_complete() {
            return false;
        }
        self.progress.push(result);
        true
    }

    /// The quest fails iff the fail count reaches the current quest's threshold.
    ///
    /// Success cards never count; they are accepted so callers can pass both
    /// partitions of a round straight through.
    pub fn evaluate_quest_outcome(
        &self,
        failed: &[PlayerId],
        _succeeded: &[PlayerId],
    ) -> QuestOutcome {
        let required_fails = self.current_assignment().required_fails;
        let fail_count = failed.len();
        let result = if fail_count >= required_fails {
            QuestResult::Bad
        } else {
            QuestResult::Good
        };
        QuestOutcome {
            result,
            fail_count,
            required_fails,
        }
    }

    pub fn calculate_score(&self) -> Score {
        self.progress.iter().fold(Score::default(), |mut score, result| {
            match result {
                QuestResult::Good => score.good += 1,
                QuestResult::Bad => score.bad += 1,
            }
            score
        })
    }

    /// The faction that has won on quests, if any.
    ///
    /// A good win here is still subject to the assassination when Merlin plays.
    pub fn end_condition(&self) -> Option<Faction> {
        let score = self.calculate_score();
        if score.bad >= GameConfiguration::QUESTS_TO_WIN {
            Some(Faction::Evil)
        } else if score.good >= GameConfiguration::QUESTS_TO_WIN {
            Some(Faction::Good)
        } else {
            None
        }
    }

    pub fn board(&self) -> Vec<QuestBoardEntry> {
        self.assignments
            .iter()
            .enumerate()
            .map(|(index, assignment)| {
                let status = match self.progress.get(index) {
                    Some(QuestResult::Good) => QuestStatus::Succeeded,
                    Some(QuestResult::Bad) => QuestStatus::Failed,
                    None if index == self.progress.len() => QuestStatus::Current,
                    None => QuestStatus::Pending,
                };
                QuestBoardEntry {
                    index,
                    status,
                    team_size: assignment.required_team_size,
                    requires_two_fails: assignment.requires_two_fails(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(players: usize) -> QuestManager {
        QuestManager::new(&GameConfiguration::standard(players).unwrap())
    }

    fn ids(n: usize) -> Vec<PlayerId> {
        (0..n).map(|i| PlayerId::new(format!("p{i}"))).collect()
    }

    #[test]
    fn test_single_fail_fails_normal_quest() {
        let quests = manager(5);
        let outcome = quests.evaluate_quest_outcome(&ids(1), &ids(1));
        assert_eq!(outcome.result, QuestResult::Bad);
        assert_eq!(outcome.summary(), "1 fail vote - quest failed!");

        let outcome = quests.evaluate_quest_outcome(&[], &ids(2));
        assert_eq!(outcome.result, QuestResult::Good);
        assert_eq!(outcome.summary(), "All team members succeeded!");
    }

    #[test]
    fn test_fourth_quest_tolerates_one_fail_with_seven_players() {
        let mut quests = manager(7);
        assert!(quests.record_quest_result(QuestResult::Good));
        assert!(quests.record_quest_result(QuestResult::Bad));
        assert!(quests.record_quest_result(QuestResult::Good));
        assert_eq!(quests.current_quest_index(), 3);

        let outcome = quests.evaluate_quest_outcome(&ids(1), &ids(3));
        assert_eq!(outcome.result, QuestResult::Good);
        assert_eq!(
            outcome.summary(),
            "1 fail vote, but 2 required to fail the quest"
        );
        let outcome = quests.evaluate_quest_outcome(&ids(2), &ids(2));
        assert_eq!(outcome.result, QuestResult::Bad);
    }

    #[test]
    fn test_score_and_end_condition() {
        let mut quests = manager(5);
        assert_eq!(quests.end_condition(), None);

        assert!(quests.record_quest_result(QuestResult::Bad));
        assert!(quests.record_quest_result(QuestResult::Good));
        assert!(quests.record_quest_result(QuestResult::Bad));
        assert_eq!(quests.calculate_score(), Score { good: 1, bad: 2 });
        assert_eq!(quests.end_condition(), None);

        assert!(quests.record_quest_result(QuestResult::Bad));
        assert_eq!(quests.end_condition(), Some(Faction::Evil));
    }

    #[test]
    fn test_three_successes_favor_good() {
        let mut quests = manager(6);
        for _ in 0..3 {
            assert!(quests.record_quest_result(QuestResult::Good));
        }
        assert_eq!(quests.end_condition(), Some(Faction::Good));
        assert_eq!(quests.current_quest_index(), 3);
    }

    #[test]
    fn test_progress_is_bounded() {
        let mut quests = manager(5);
        for result in [
            QuestResult::Good,
            QuestResult::Bad,
            QuestResult::Good,
            QuestResult::Bad,
            QuestResult::Good,
        ] {
            assert!(quests.record_quest_result(result));
        }
        assert!(quests.is_complete());
        assert!(!quests.record_quest_result(QuestResult::Bad));
        assert_eq!(quests.progress().len(), 5);
    }

    #[test]
    fn test_board_statuses() {
        let mut quests = manager(8);
        assert!(quests.record_quest_result(QuestResult::Good));
        assert!(quests.record_quest_result(QuestResult::Bad));

        let board = quests.board();
        let statuses: Vec<QuestStatus> = board.iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![
                QuestStatus::Succeeded,
                QuestStatus::Failed,
                QuestStatus::Current,
                QuestStatus::Pending,
                QuestStatus::Pending,
            ]
        );
        assert!(board[3].requires_two_fails);
        assert_eq!(board[3].team_size, 5);
        assert_eq!(board[0].team_size, 3);
    }
}
