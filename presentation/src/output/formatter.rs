//! Notice rendering for the terminal

use avalon_application::{DecisionRequest, MessageTarget, Notice};
use avalon_domain::{
    Faction, Insight, PlayerId, ProposalHistoryEntry, ProposalOutcome, QuestBoardEntry,
    QuestResult, QuestStatus, RoleKnowledge,
};
use colored::Colorize;

/// Formats notices as plain terminal text
pub struct NoticeFormatter;

impl NoticeFormatter {
    /// Format a notice addressed to `target`
    pub fn format(target: &MessageTarget, notice: &Notice) -> String {
        let body = Self::format_body(notice);
        match target {
            MessageTarget::Table => body,
            MessageTarget::Player(player) => format!(
                "{}\n{}",
                format!("── to {} ──", player).magenta().bold(),
                body
            ),
        }
    }

    pub fn format_body(notice: &Notice) -> String {
        match notice {
            Notice::GameStarted {
                players,
                special_roles,
                resistance,
                evil_count,
                board,
            } => {
                let mut output = Self::header("Avalon");
                output.push_str(&format!(
                    "\n{} {}\n",
                    "Players:".cyan().bold(),
                    Self::names(players)
                ));
                let roles = if special_roles.is_empty() {
                    "none".to_string()
                } else {
                    special_roles
                        .iter()
                        .map(|r| r.display_name())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                output.push_str(&format!("{} {}\n", "Special roles:".cyan().bold(), roles));
                output.push_str(&format!(
                    "{} {} of {}\n",
                    "Evil players:".cyan().bold(),
                    evil_count,
                    players.len()
                ));
                if *resistance {
                    output.push_str(&format!("{}\n", "Resistance rules: no assassination".dimmed()));
                }
                output.push_str(&format!("{} {}\n", "Quests:".cyan().bold(), Self::board(board)));
                output
            }
            Notice::RoleBriefing(knowledge) => Self::briefing(knowledge),
            Notice::LeaderNominating {
                leader,
                quest_number,
                attempt,
                team_size,
                requires_two_fails,
                board,
            } => {
                let mut output = format!(
                    "\n{} {}\n",
                    format!("Quest {}", quest_number + 1).cyan().bold(),
                    Self::board(board)
                );
                output.push_str(&format!(
                    "{} picks {} players (attempt {} of 5){}\n",
                    leader.as_str().yellow().bold(),
                    team_size,
                    attempt,
                    if *requires_two_fails {
                        ", two fails needed"
                    } else {
                        ""
                    }
                ));
                output
            }
            Notice::TeamVoteOpened { proposal } => format!(
                "{} proposes {}; vote with `<name> approve` or `<name> reject`",
                proposal.leader().as_str().yellow().bold(),
                Self::names(proposal.member_ids()).bold()
            ),
            Notice::TeamVoteProgress { voted, pending, .. } => format!(
                "  voted: {}  waiting: {}",
                Self::names_or_dash(voted).green(),
                Self::names_or_dash(pending).dimmed()
            ),
            Notice::TeamVoteResolved { entry } => Self::vote_result(entry),
            Notice::QuestStarted {
                quest_number,
                team,
                requires_two_fails,
                ..
            } => format!(
                "{} {} go on the quest{}; play `<name> succeed` or `<name> fail`",
                format!("Quest {}:", quest_number + 1).cyan().bold(),
                Self::names(team).bold(),
                if *requires_two_fails {
                    " (two fails needed)"
                } else {
                    ""
                }
            ),
            Notice::QuestProgress {
                team, completed, ..
            } => format!(
                "  played: {} of {}",
                completed.len(),
                Self::distinct(team).len()
            ),
            Notice::QuestResolved {
                quest_number,
                outcome,
                board,
            } => {
                let verdict = match outcome.result {
                    QuestResult::Good => "succeeded".green().bold(),
                    QuestResult::Bad => "failed".red().bold(),
                };
                format!(
                    "{} {} with {} fail(s)\n{} {}",
                    format!("Quest {}", quest_number + 1).cyan().bold(),
                    verdict,
                    outcome.fail_count,
                    "Quests:".cyan().bold(),
                    Self::board(board)
                )
            }
            Notice::AssassinationStarted {
                assassin,
                candidates,
            } => format!(
                "{}\n{} must name Merlin among: {}",
                "Good completed three quests!".green().bold(),
                assassin.as_str().red().bold(),
                Self::names(candidates)
            ),
            Notice::GameOver { outcome, players } => {
                let mut output = Self::header("Game Over");
                let winner = format!("{} win", outcome.winner);
                let winner = match outcome.winner {
                    Faction::Good => winner.blue().bold(),
                    Faction::Evil => winner.red().bold(),
                };
                output.push_str(&format!("\n{} by {}\n\n", winner, outcome.reason.description()));
                for player in players {
                    let role = player
                        .role()
                        .map(|r| r.display_name())
                        .unwrap_or("unassigned");
                    let role = if player.is_evil() {
                        role.red()
                    } else {
                        role.blue()
                    };
                    output.push_str(&format!("  {:<12} {}\n", player.id().as_str(), role));
                }
                output.push_str(&Self::footer());
                output
            }
        }
    }

    /// Prompt shown when a decision is waiting on `request.chooser`
    pub fn format_decision(request: &DecisionRequest) -> String {
        let mut output = format!(
            "{} {}\n",
            format!("{}:", request.chooser).yellow().bold(),
            request.prompt
        );
        for (i, option) in request.options.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, option));
        }
        let count = if request.min == request.max {
            request.min.to_string()
        } else {
            format!("{}-{}", request.min, request.max)
        };
        output.push_str(&format!(
            "{}",
            format!(
                "{} with `{} pick <n>...` ({} choice(s))",
                request.verb, request.chooser, count
            )
            .dimmed()
        ));
        output
    }

    fn briefing(knowledge: &RoleKnowledge) -> String {
        let faction = knowledge.role.faction();
        let role = match faction {
            Faction::Good => knowledge.role.display_name().blue().bold(),
            Faction::Evil => knowledge.role.display_name().red().bold(),
        };
        let mut output = format!("You are {} ({}).\n", role, faction);
        output.push_str(&format!("{}\n", knowledge.role.objective().dimmed()));

        match &knowledge.insight {
            Insight::Nothing => {}
            Insight::Evils {
                players,
                mordred_hidden,
            } => {
                output.push_str(&format!("Evil players: {}\n", Self::names_or_dash(players).red()));
                if *mordred_hidden {
                    output.push_str("Mordred is hidden from you.\n");
                }
            }
            Insight::MerlinCandidates { players } => {
                if players.len() > 1 {
                    output.push_str(&format!(
                        "Merlin is one of: {}\n",
                        Self::names(players).blue()
                    ));
                } else {
                    output.push_str(&format!("Merlin is {}\n", Self::names(players).blue()));
                }
            }
            Insight::Teammates {
                players,
                oberon_hidden,
            } => {
                output.push_str(&format!(
                    "Your evil teammates: {}\n",
                    Self::names_or_dash(players).red()
                ));
                if *oberon_hidden {
                    output.push_str("Oberon is evil but unknown to you.\n");
                }
            }
        }

        if knowledge.is_assassin {
            output.push_str(&format!(
                "{}\n",
                "You will make the assassination guess if good wins three quests.".red()
            ));
        }
        output
    }

    fn vote_result(entry: &ProposalHistoryEntry) -> String {
        let verdict = match entry.outcome {
            ProposalOutcome::Approved => "approved".green().bold(),
            ProposalOutcome::AutoApproved => "approved (final attempt)".green().bold(),
            ProposalOutcome::Rejected => "rejected".red().bold(),
        };
        let mut output = format!("Team {} {}", Self::names(entry.proposal.member_ids()), verdict);
        if entry.outcome != ProposalOutcome::AutoApproved {
            output.push_str(&format!(
                "\n  approve: {}\n  reject:  {}",
                Self::names_or_dash(&entry.approve_votes),
                Self::names_or_dash(&entry.reject_votes)
            ));
        }
        output
    }

    /// One cell per quest: `[S]` succeeded, `[F]` failed, `[>3]` current,
    /// `[3]` pending; `*` marks a quest that needs two fails.
    pub fn board(board: &[QuestBoardEntry]) -> String {
        board
            .iter()
            .map(|entry| {
                let marker = if entry.requires_two_fails { "*" } else { "" };
                match entry.status {
                    QuestStatus::Succeeded => "[S]".green().to_string(),
                    QuestStatus::Failed => "[F]".red().to_string(),
                    QuestStatus::Current => format!("[>{}{}]", entry.team_size, marker)
                        .yellow()
                        .to_string(),
                    QuestStatus::Pending => format!("[{}{}]", entry.team_size, marker),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn names(players: &[PlayerId]) -> String {
        players
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn names_or_dash(players: &[PlayerId]) -> String {
        if players.is_empty() {
            "-".to_string()
        } else {
            Self::names(players)
        }
    }

    fn distinct(players: &[PlayerId]) -> Vec<&PlayerId> {
        let mut seen = Vec::new();
        for player in players {
            if !seen.contains(&player) {
                seen.push(player);
            }
        }
        seen
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(48);
        format!("{}\n{:^48}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(48).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avalon_domain::{
        GameConfiguration, GameOutcome, Player, QuestManager, Role, TeamProposal, WinReason,
    };

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|n| PlayerId::from(*n)).collect()
    }

    #[test]
    fn test_board_marks_two_fail_quest() {
        let config = GameConfiguration::standard(7).unwrap();
        let mut quests = QuestManager::new(&config);
        assert!(quests.record_quest_result(QuestResult::Good));
        assert!(quests.record_quest_result(QuestResult::Bad));

        let board = NoticeFormatter::board(&quests.board());
        assert!(board.contains("[S]"));
        assert!(board.contains("[F]"));
        assert!(board.contains(">3"));
        assert!(board.contains("[4*]"));
    }

    #[test]
    fn test_private_notice_names_recipient() {
        let knowledge = RoleKnowledge {
            player: "alice".into(),
            role: Role::Merlin,
            is_assassin: false,
            insight: Insight::Evils {
                players: ids(&["dave", "erin"]),
                mordred_hidden: true,
            },
        };
        let text = NoticeFormatter::format(
            &MessageTarget::Player("alice".into()),
            &Notice::RoleBriefing(knowledge),
        );
        assert!(text.contains("to alice"));
        assert!(text.contains("MERLIN"));
        assert!(text.contains("dave, erin"));
        assert!(text.contains("Mordred is hidden"));
    }

    #[test]
    fn test_vote_result_reveals_votes() {
        let proposal = TeamProposal::new("alice".into(), ids(&["alice", "bob"]), 0, 1);
        let entry = ProposalHistoryEntry::voted(proposal, ids(&["alice"]), ids(&["bob", "carol"]));
        let text = NoticeFormatter::format_body(&Notice::TeamVoteResolved { entry });
        assert!(text.contains("rejected"));
        assert!(text.contains("bob, carol"));
    }

    #[test]
    fn test_progress_hides_votes() {
        let proposal = TeamProposal::new("alice".into(), ids(&["alice", "bob"]), 0, 1);
        let text = NoticeFormatter::format_body(&Notice::TeamVoteProgress {
            proposal,
            voted: ids(&["carol"]),
            pending: ids(&["alice", "bob"]),
        });
        assert!(text.contains("carol"));
        assert!(!text.contains("approve"));
        assert!(!text.contains("reject"));
    }

    #[test]
    fn test_game_over_reveals_roles() {
        let text = NoticeFormatter::format_body(&Notice::GameOver {
            outcome: GameOutcome::evil(WinReason::MerlinAssassinated {
                target: "alice".into(),
            }),
            players: vec![
                Player::with_role("alice", Role::Merlin),
                Player::with_role("dave", Role::Assassin),
            ],
        });
        assert!(text.contains("Game Over"));
        assert!(text.contains("MERLIN"));
        assert!(text.contains("THE ASSASSIN"));
    }

    #[test]
    fn test_decision_prompt_numbers_options() {
        let request = DecisionRequest {
            target: MessageTarget::Player("dave".into()),
            prompt: "Choose whom to assassinate".to_string(),
            options: vec!["alice".into(), "bob".into()],
            verb: "Assassinate".to_string(),
            chooser: "dave".into(),
            min: 1,
            max: 1,
        };
        let text = NoticeFormatter::format_decision(&request);
        assert!(text.contains("1. alice"));
        assert!(text.contains("2. bob"));
        assert!(text.contains("dave pick"));
    }
}
