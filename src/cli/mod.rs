//! CLI module for the roster client
//!
//! Each subcommand drives one store operation and prints the result:
//! - account: `login`, `register`, `logout`, `whoami`
//! - teams: `team`, `teams`, `subscribe`, `unsubscribe`, `status`, `can-join`
//! - schedule: `player`, `match`, `games`

pub mod auth;
pub mod matches;
pub mod teams;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::ClientState;

/// Roster - team roster client
#[derive(Parser)]
#[command(name = "roster")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in and persist the session
    Login(auth::LoginArgs),

    /// Create an account and sign in as it
    Register(auth::RegisterArgs),

    /// Forget the persisted session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Show my team and its roster
    Team,

    /// Browse teams available to join
    Teams(TeamsArgs),

    /// Join a team
    Subscribe { organization_id: String },

    /// Leave the current team
    Unsubscribe,

    /// Show the backend's view of my membership
    Status,

    /// Check whether I can join a team
    CanJoin { organization_id: String },

    /// Show a player of my team
    Player { player_id: String },

    /// Show a match
    Match { match_id: String },

    /// List upcoming (or past) games of my team
    Games {
        #[arg(long)]
        past: bool,
    },
}

impl Command {
    /// Account commands replace or clear the stored session, so they still
    /// run when it cannot be restored
    pub fn requires_session(&self) -> bool {
        !matches!(self, Self::Login(_) | Self::Register(_) | Self::Logout)
    }
}

#[derive(Args)]
pub struct TeamsArgs {
    /// Filter teams by name
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, default_value_t = crate::domain::organization::DEFAULT_PAGE)]
    pub page: u32,

    #[arg(long, default_value_t = crate::domain::organization::DEFAULT_PAGE_LIMIT)]
    pub limit: u32,
}

/// Load configuration, restore the session and run one command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let state = crate::create_client_state_with_config(&config)?;
    state.auth.initialize().await;
    if let Some(error) = state.auth.state().error {
        if cli.command.requires_session() {
            anyhow::bail!("{}; run `roster login` to start a new session", error);
        }
        tracing::warn!(error = %error, "Continuing without a restored session");
    }

    dispatch(&state, cli.command).await
}

async fn dispatch(state: &ClientState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login(args) => auth::login(state, args).await,
        Command::Register(args) => auth::register(state, args).await,
        Command::Logout => auth::logout(state).await,
        Command::Whoami => auth::whoami(state),
        Command::Team => teams::show_team(state).await,
        Command::Teams(args) => teams::list(state, args).await,
        Command::Subscribe { organization_id } => teams::subscribe(state, &organization_id).await,
        Command::Unsubscribe => teams::unsubscribe(state).await,
        Command::Status => teams::status(state).await,
        Command::CanJoin { organization_id } => teams::can_join(state, &organization_id).await,
        Command::Player { player_id } => matches::player(state, &player_id).await,
        Command::Match { match_id } => matches::show_match(state, &match_id).await,
        Command::Games { past } => matches::games(state, past).await,
    }
}
