//! CLI entrypoint for avalon
//!
//! This is the main binary that wires together all layers using
//! dependency injection, then runs one hot-seat game on the terminal.

use anyhow::{Result, anyhow, bail};
use avalon_application::{
    ActionEvent, CollectError, DecisionRequest, GameOrchestrator, OrchestratorError, PortError, RoundError,
    RoundPolicy,
};
use avalon_domain::{FinalProposalRule, GameConfiguration, LeaderOrder, Player};
use avalon_infrastructure::{
    ConfigLoader, DecisionDesk, FileConfig, InMemoryActionBus, LogSettings, logging,
};
use avalon_presentation::{
    Cli, CommandError, ConsoleCommand, ConsoleMessenger, HELP, NoticeFormatter, disable_color,
    parse_command,
};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    // Keep the guard alive so the file sink flushes on exit
    let _log_guard = logging::init(&LogSettings {
        verbosity: cli.verbose,
        default_level: file_config.logging.level.clone(),
        file: file_config.logging.file.clone(),
    })?;

    if cli.no_color || !file_config.output.color {
        disable_color();
    }

    if cli.players.is_empty() {
        bail!("Name the players, e.g. `avalon alice bob carol dave erin`");
    }
    let game_config = game_configuration(&cli, &file_config)?;
    let players = Player::from_ids(cli.players.iter().map(String::as_str));

    info!("Starting Avalon with {} players", players.len());

    // === Dependency Injection ===
    let cancel = CancellationToken::new();
    let console = Arc::new(ConsoleMessenger::stdout());
    let bus = Arc::new(InMemoryActionBus::new());
    let desk = Arc::new(DecisionDesk::new().with_announcer({
        let console = console.clone();
        Arc::new(move |request: &DecisionRequest| {
            let _ = console.say(NoticeFormatter::format_decision(request));
        })
    }));

    let orchestrator = GameOrchestrator::new(game_config, console.clone(), bus.clone(), desk.clone())
        .with_round_policy(round_policy(&cli, &file_config, cancel.clone()));

    let reader = tokio::spawn(read_commands(
        bus.clone(),
        desk.clone(),
        console.clone(),
        cancel.clone(),
    ));

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let result = async {
        let mut state = orchestrator.setup(players, &mut rng).await?;
        orchestrator.run(&mut state).await
    }
    .await;

    let quit = cancel.is_cancelled();
    cancel.cancel();
    reader.abort();

    match result {
        Ok(outcome) => {
            info!("Finished: {}", outcome);
            Ok(())
        }
        Err(err) if quit && is_abandonment(&err) => {
            println!("Game abandoned.");
            Ok(())
        }
        Err(
            OrchestratorError::Round(RoundError::Collect(CollectError::TimedOut { pending }))
            | OrchestratorError::DecisionAbandoned {
                reason: CollectError::TimedOut { pending },
                ..
            },
        ) => {
            bail!(
                "Round timed out waiting for: {}",
                pending
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        }
        Err(err) => Err(err.into()),
    }
}

/// File values first, CLI flags on top.
fn game_configuration(cli: &Cli, file_config: &FileConfig) -> Result<GameConfiguration> {
    let mut game = file_config.game.clone();
    if !cli.roles.is_empty() {
        game.special_roles = cli.roles.clone();
    }
    if cli.resistance {
        game.resistance = true;
    }
    if cli.random_order {
        game.leader_order = LeaderOrder::Random;
    }
    if cli.evil_wins_on_rejections {
        game.final_proposal = FinalProposalRule::EvilWins;
    }
    Ok(game.to_game_configuration(cli.players.len())?)
}

fn round_policy(cli: &Cli, file_config: &FileConfig, cancel: CancellationToken) -> RoundPolicy {
    let timeout = match cli.round_timeout {
        Some(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        Some(_) => None,
        None => file_config.rounds.timeout(),
    };
    let policy = RoundPolicy::unbounded().with_cancellation(cancel);
    match timeout {
        Some(timeout) => policy.with_timeout(timeout),
        None => policy,
    }
}

fn is_abandonment(err: &OrchestratorError) -> bool {
    matches!(
        err,
        OrchestratorError::Port(PortError::Closed)
            | OrchestratorError::Round(RoundError::Collect(CollectError::Cancelled))
            | OrchestratorError::Round(RoundError::Port(PortError::Closed))
            | OrchestratorError::DecisionAbandoned {
                reason: CollectError::Cancelled,
                ..
            }
    )
}

/// Read typed commands until `quit`, end of input or Ctrl-C.
async fn read_commands(
    bus: Arc<InMemoryActionBus>,
    desk: Arc<DecisionDesk>,
    console: Arc<ConsoleMessenger>,
    cancel: CancellationToken,
) {
    let mut lines = stdin_lines();
    let _ = console.say("Type `help` for commands.");

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::signal::ctrl_c() => None,
            line = lines.recv() => line,
        };

        let Some(line) = line else {
            abandon(&desk, &cancel);
            return;
        };

        let reply = match parse_command(&line) {
            Ok(ConsoleCommand::Action {
                actor,
                action_key,
                payload,
            }) => {
                if bus.dispatch(action_key, ActionEvent::new(actor, payload)) {
                    None
                } else {
                    Some("Nobody is waiting for that right now.".to_string())
                }
            }
            Ok(ConsoleCommand::Pick { actor, indexes }) => {
                desk.answer(&actor, indexes).err().map(|e| e.to_string())
            }
            Ok(ConsoleCommand::Help) => Some(HELP.to_string()),
            Ok(ConsoleCommand::Quit) => {
                abandon(&desk, &cancel);
                return;
            }
            Err(CommandError::Empty) => None,
            Err(e) => Some(e.to_string()),
        };

        if let Some(reply) = reply {
            let _ = console.say(reply);
        }
    }
}

/// Blocking stdin reads on a plain thread, so a pending read never holds up
/// runtime shutdown.
fn stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Could not read input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

fn abandon(desk: &DecisionDesk, cancel: &CancellationToken) {
    info!("Abandoning the game");
    cancel.cancel();
    desk.withdraw_all();
}
