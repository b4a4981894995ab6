//! Game rules configuration from TOML (`[game]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [game]
//! special_roles = ["merlin", "percival", "morgana"]
//! resistance = false
//! leader_order = "random"
//! final_proposal = "evil_wins"
//! ```

use avalon_domain::{ConfigurationError, FinalProposalRule, GameConfiguration, LeaderOrder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGameConfig {
    /// Special role names, e.g. "merlin", "percival", "mordred"
    pub special_roles: Vec<String>,
    /// Plain Resistance: no Merlin required, no assassination
    pub resistance: bool,
    /// "turn" keeps join order, "random" shuffles the seating once
    pub leader_order: LeaderOrder,
    /// "auto_approve" or "evil_wins"
    pub final_proposal: FinalProposalRule,
}

impl Default for FileGameConfig {
    fn default() -> Self {
        Self {
            special_roles: vec!["merlin".to_string()],
            resistance: false,
            leader_order: LeaderOrder::default(),
            final_proposal: FinalProposalRule::default(),
        }
    }
}

impl FileGameConfig {
    /// Build a validated configuration for `player_count` seats.
    pub fn to_game_configuration(
        &self,
        player_count: usize,
    ) -> Result<GameConfiguration, ConfigurationError> {
        let roles = GameConfiguration::parse_special_roles(&self.special_roles)?;
        Ok(
            GameConfiguration::new(player_count, roles, self.resistance, self.leader_order)?
                .with_final_proposal_rule(self.final_proposal),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avalon_domain::Role;

    #[test]
    fn test_game_config_default() {
        let config = FileGameConfig::default();
        assert_eq!(config.special_roles, vec!["merlin"]);
        assert!(!config.resistance);
        assert_eq!(config.leader_order, LeaderOrder::Turn);
        assert_eq!(config.final_proposal, FinalProposalRule::AutoApprove);
    }

    #[test]
    fn test_game_config_deserialize() {
        let toml_str = r#"
[game]
special_roles = ["merlin", "percival", "morgana"]
leader_order = "random"
final_proposal = "evil_wins"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.game.leader_order, LeaderOrder::Random);
        assert_eq!(config.game.final_proposal, FinalProposalRule::EvilWins);

        let game = config.game.to_game_configuration(7).unwrap();
        assert_eq!(
            game.special_roles(),
            &[Role::Merlin, Role::Percival, Role::Morgana]
        );
        assert_eq!(game.final_proposal_rule(), FinalProposalRule::EvilWins);
        assert_eq!(game.leader_order(), LeaderOrder::Random);
    }

    #[test]
    fn test_unknown_role_name() {
        let config = FileGameConfig {
            special_roles: vec!["merlin".to_string(), "jester".to_string()],
            ..FileGameConfig::default()
        };
        let err = config.to_game_configuration(5).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownRole(name) if name == "jester"));
    }

    #[test]
    fn test_player_count_checked() {
        let err = FileGameConfig::default()
            .to_game_configuration(11)
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidPlayerCount { count: 11, .. }));
    }

    #[test]
    fn test_bad_leader_order_rejected() {
        let toml_str = r#"
[game]
leader_order = "clockwise"
"#;
        assert!(toml::from_str::<super::super::FileConfig>(toml_str).is_err());
    }
}
