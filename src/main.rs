use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::HashMap;
use std::path::PathBuf;
use time::OffsetDateTime;
use uuid::Uuid;

use spades_arena::config::{ArenaConfig, DEFAULT_DATA_DIR};
use spades_arena::pairing::{self, PairingPayload};
use spades_arena::store::{self, snapshot, MatchStore};
use spades_arena::xlsx;
use spades_arena::{
    GoalDirection, LedgerState, MatchSession, Team, TeamSlot, UndoOutcome, DEFAULT_GOAL_SCORE,
};

#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Keep score for live Spades matches", long_about = None)]
struct Cli {
    /// Directory for the live match and recorded games
    #[arg(long, env = "ARENA_DATA_DIR", default_value = DEFAULT_DATA_DIR, global = true)]
    data_dir: PathBuf,

    /// User id recorded as the creator of finished games
    #[arg(long, env = "ARENA_USER_ID", global = true)]
    user: Option<Uuid>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage teams
    Team {
        #[command(subcommand)]
        action: TeamAction,
    },

    /// Start a new match
    New {
        /// Id of the first team
        #[arg(long)]
        team1: Uuid,

        /// Id of the second team (or bind it later with `pair`)
        #[arg(long)]
        team2: Option<Uuid>,

        /// Score to play to (100-500, steps of 50)
        #[arg(long, default_value_t = DEFAULT_GOAL_SCORE)]
        goal: u32,
    },

    /// Bind the opposing team from a scanned team code
    Pair {
        /// Raw text of the scanned code
        code: String,
    },

    /// Record both teams' bids for a new hand
    Bid {
        team1: u8,
        team2: u8,

        /// Team 1 bid blind
        #[arg(long)]
        blind1: bool,

        /// Team 2 bid blind
        #[arg(long)]
        blind2: bool,
    },

    /// Record books taken in the open hand
    Books { team1: u8, team2: u8 },

    /// Undo the last entry (books first, then the bids)
    Undo,

    /// Step the goal score up or down by 50
    Goal { direction: GoalArg },

    /// Show the live match
    Status,

    /// Finish the live match and record it
    Finish {
        /// Also write an Excel scoresheet
        #[arg(long)]
        xlsx: Option<PathBuf>,
    },

    /// Abandon the live match without recording it
    Discard,

    /// Create or read pairing codes
    Qr {
        #[command(subcommand)]
        action: QrAction,
    },

    /// List recorded matches
    History,
}

#[derive(Subcommand)]
enum TeamAction {
    /// Register a team
    Add { name: String },
    /// List registered teams
    List,
}

#[derive(Subcommand)]
enum QrAction {
    /// Code for joining a team into a match
    Team { team_id: Uuid },
    /// Code identifying a player profile
    Profile { user_id: Uuid, display_name: String },
    /// Code for watching a game
    Spectator { game_id: Uuid },
    /// Decode a scanned code
    Decode { code: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum GoalArg {
    Up,
    Down,
}

impl From<GoalArg> for GoalDirection {
    fn from(arg: GoalArg) -> Self {
        match arg {
            GoalArg::Up => GoalDirection::Up,
            GoalArg::Down => GoalDirection::Down,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = ArenaConfig::new(cli.data_dir, cli.user);

    match cli.command {
        Commands::Team { action } => team(&config, action)?,
        Commands::New { team1, team2, goal } => new_match(&config, team1, team2, goal)?,
        Commands::Pair { code } => pair(&config, &code)?,
        Commands::Bid {
            team1,
            team2,
            blind1,
            blind2,
        } => {
            let mut session = load_live(&config)?;
            let hand = session.record_bid(team1, blind1, team2, blind2)?;
            println!("{}", hand);
            save_live(&config, &session)?;
        }
        Commands::Books { team1, team2 } => {
            let mut session = load_live(&config)?;
            let (points1, points2) = session.record_books(team1, team2)?;
            let (total1, total2) = session.current_totals();
            println!("Points: {:+} / {:+}", points1, points2);
            println!("Totals: {} / {}", total1, total2);
            if session.goal_reached() {
                println!(
                    "Goal of {} reached - run `arena finish` to record the match",
                    session.goal_score()
                );
            }
            save_live(&config, &session)?;
        }
        Commands::Undo => {
            let mut session = load_live(&config)?;
            match session.undo_last()? {
                UndoOutcome::Reopened { index } => println!("Hand {}: books cleared", index),
                UndoOutcome::Removed { index } => println!("Hand {}: removed", index),
            }
            save_live(&config, &session)?;
        }
        Commands::Goal { direction } => {
            let mut session = load_live(&config)?;
            let goal = session.adjust_goal_score(direction.into());
            println!("Goal score: {}", goal);
            save_live(&config, &session)?;
        }
        Commands::Status => status(&config)?,
        Commands::Finish { xlsx } => finish(&config, xlsx)?,
        Commands::Discard => {
            if snapshot::discard_session(&config.session_path())? {
                println!("Live match discarded");
            } else {
                println!("No live match");
            }
        }
        Commands::Qr { action } => qr(action)?,
        Commands::History => history(&config)?,
    }

    Ok(())
}

fn load_live(config: &ArenaConfig) -> Result<MatchSession> {
    snapshot::load_session(&config.session_path())
        .context("Failed to read live match")?
        .context("No match in progress; start one with `arena new`")
}

fn save_live(config: &ArenaConfig, session: &MatchSession) -> Result<()> {
    snapshot::save_session(&config.session_path(), session).context("Failed to save live match")
}

fn team(config: &ArenaConfig, action: TeamAction) -> Result<()> {
    let mut store = config.open_store().context("Failed to open data directory")?;
    match action {
        TeamAction::Add { name } => {
            let team = Team::new(Uuid::new_v4(), name);
            store.insert_team(&team)?;
            println!("{}  {}", team.id, team.name);
            println!("Pairing code: {}", pairing::encode(&PairingPayload::Team { team_id: team.id })?);
        }
        TeamAction::List => {
            let teams = store.teams()?;
            println!("Teams: {}", teams.len());
            for team in &teams {
                println!("  {}  {}", team.id, team.name);
            }
        }
    }
    Ok(())
}

fn new_match(config: &ArenaConfig, team1: Uuid, team2: Option<Uuid>, goal: u32) -> Result<()> {
    if snapshot::load_session(&config.session_path())?.is_some() {
        anyhow::bail!("A match is already in progress; finish or discard it first");
    }

    let store = config.open_store().context("Failed to open data directory")?;
    let team1 = store.find_team(team1)?;
    let team2 = team2.map(|id| store.find_team(id)).transpose()?;

    let session =
        MatchSession::new(team1, team2, OffsetDateTime::now_utc())?.with_goal_score(goal)?;
    save_live(config, &session)?;

    println!("Match started: {} vs {}", session.team1(), opponent_name(&session));
    println!("Playing to {}", session.goal_score());
    Ok(())
}

fn pair(config: &ArenaConfig, code: &str) -> Result<()> {
    let mut session = load_live(config)?;
    let store = config.open_store().context("Failed to open data directory")?;
    let team = pairing::resolve_team(&store, code)?;
    session.bind_opponent(team)?;
    save_live(config, &session)?;
    println!("Paired: {} vs {}", session.team1(), opponent_name(&session));
    Ok(())
}

fn status(config: &ArenaConfig) -> Result<()> {
    let session = load_live(config)?;

    println!("{} vs {}", session.team1(), opponent_name(&session));
    println!("Goal: {}", session.goal_score());
    println!();

    for hand in session.ledger().hands() {
        println!("  {}", hand);
    }
    if session.ledger().is_empty() {
        println!("  No hands yet");
    }
    println!();

    let (total1, total2) = session.current_totals();
    for (slot, total) in TeamSlot::ALL.into_iter().zip([total1, total2]) {
        let name = session
            .team(slot)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| slot.to_string());
        println!("{}: {}", name, total);
    }

    match session.state() {
        LedgerState::AwaitingBid => println!("Next: bids"),
        LedgerState::AwaitingBooks => println!("Next: books"),
    }
    Ok(())
}

fn finish(config: &ArenaConfig, xlsx_path: Option<PathBuf>) -> Result<()> {
    let session = load_live(config)?;
    let mut store = config.open_store().context("Failed to open data directory")?;

    let export = store::commit_match(&mut store, &session, config.user)
        .context("Failed to finish match")?;
    snapshot::discard_session(&config.session_path())?;

    let team1_name = session.team1().name.as_str();
    let team2_name = opponent_name(&session);

    println!("Game {}", export.game.id);
    for hand in &export.hands {
        println!("  {}", xlsx::hand_summary(hand));
    }
    println!(
        "Final: {} {} - {} {}",
        team1_name, export.outcome.team1_total, team2_name, export.outcome.team2_total
    );
    match export.outcome.winner_team_id {
        Some(id) if id == session.team1().id => println!("Winner: {}", team1_name),
        Some(_) => println!("Winner: {}", team2_name),
        None => println!("Tie"),
    }

    if let Some(path) = xlsx_path {
        println!("Writing Excel file: {}", path.display());
        xlsx::write_scoresheet(&export, team1_name, team2_name, &path)
            .context("Failed to write Excel file")?;
    }

    Ok(())
}

fn qr(action: QrAction) -> Result<()> {
    let payload = match action {
        QrAction::Team { team_id } => PairingPayload::Team { team_id },
        QrAction::Profile {
            user_id,
            display_name,
        } => PairingPayload::Profile {
            user_id,
            display_name,
        },
        QrAction::Spectator { game_id } => PairingPayload::GameSpectator { game_id },
        QrAction::Decode { code } => {
            match pairing::decode(&code)? {
                PairingPayload::Profile {
                    user_id,
                    display_name,
                } => println!("Profile: {} ({})", display_name, user_id),
                PairingPayload::Team { team_id } => println!("Team: {}", team_id),
                PairingPayload::GameSpectator { game_id } => println!("Spectate game: {}", game_id),
            }
            return Ok(());
        }
    };

    println!("{}", pairing::encode(&payload)?);
    Ok(())
}

fn history(config: &ArenaConfig) -> Result<()> {
    let store = config.open_store().context("Failed to open data directory")?;
    let names: HashMap<Uuid, String> = store
        .teams()?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();
    let name = |id: &Uuid| names.get(id).cloned().unwrap_or_else(|| id.to_string());

    let outcomes = store.outcomes()?;
    println!("Matches: {}", outcomes.len());
    for outcome in &outcomes {
        let winner = outcome
            .winner_team_id
            .as_ref()
            .map(&name)
            .unwrap_or_else(|| "tie".to_string());
        println!(
            "  {}  {} {} - {} {}  ({})",
            outcome.completed_at.date(),
            name(&outcome.team1_id),
            outcome.team1_total,
            name(&outcome.team2_id),
            outcome.team2_total,
            winner
        );
    }
    Ok(())
}

fn opponent_name(session: &MatchSession) -> &str {
    session
        .team2()
        .map(|t| t.name.as_str())
        .unwrap_or("(unpaired)")
}
