use anyhow::Context;
use clap::{Parser, Subcommand};
use clubhouse::db::Db;
use clubhouse::db::repo::{CorrectionRepository, IdentityRepository};
use clubhouse::models::types::{Metadata, UserId};
use clubhouse::{Action, UserService, analyze_username, config, dispatch, dispatch_json};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

// cargo run -- suggest jotambbarbosa pedrombsilva
// cargo run -- --as <admin-uuid> fix --user-id <uuid> --username joao.barbosa

#[derive(Debug, Parser)]
#[command(name = "clubhouse", version, about = "Inspect and correct clubhouse usernames")]
struct Args {
    /// Read configuration from a TOML file instead of the environment
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override database URL (if omitted, use env/config)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Id of the user performing the action
    #[arg(long = "as", global = true)]
    caller: Option<UserId>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Show what the repair heuristic makes of each username (no database needed)
    Suggest { usernames: Vec<String> },

    /// Print a user record
    Show {
        #[arg(long)]
        user_id: UserId,
    },

    /// Print the character profile of a user's stored username
    Verify {
        #[arg(long)]
        user_id: UserId,
    },

    /// Set a user's username to exactly the given value
    Fix {
        #[arg(long)]
        user_id: UserId,
        #[arg(long)]
        username: String,
    },

    /// Merge a JSON object into a user's metadata
    SetMetadata {
        #[arg(long)]
        user_id: UserId,
        /// JSON object, eg: '{"username": "joao.barbosa"}'
        #[arg(long)]
        json: String,
    },

    /// List recorded username corrections for a user
    History {
        #[arg(long)]
        user_id: UserId,
    },

    /// Run a raw JSON action request (read from stdin when omitted)
    Dispatch { request: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => config::Config::load(path)?,
        None => config::Config::from_env()?,
    };
    init_tracing(&cfg.log_filter)?;

    if let Cmd::Suggest { usernames } = &args.command {
        let out: Vec<_> = usernames.iter().map(|u| analyze_username(u)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let caller = args
        .caller
        .context("--as <user id> is required for this command")?;

    // allow overriding the DSN from CLI
    let database_url = args.database_url.as_deref().unwrap_or(&cfg.database_url);

    let db = Arc::new(Db::new(database_url, cfg.pool_max_size)?);
    db.init().await?;

    let service = UserService::new(
        Arc::new(IdentityRepository::new(db.clone())),
        Arc::new(CorrectionRepository::new(db.clone())),
    );

    let response = match args.command {
        Cmd::Suggest { .. } => return Ok(()),
        Cmd::Show { user_id } => dispatch(&service, caller, Action::GetUser { user_id }).await,
        Cmd::Verify { user_id } => dispatch(&service, caller, Action::VerifyUsername { user_id }).await,
        Cmd::Fix { user_id, username } => {
            let action = Action::FixUsername {
                user_id,
                correct_username: username,
            };
            dispatch(&service, caller, action).await
        }
        Cmd::SetMetadata { user_id, json } => {
            let metadata: Metadata = serde_json::from_str(&json).context("--json must be a JSON object")?;
            dispatch(&service, caller, Action::UpdateUserMetadata { user_id, metadata }).await
        }
        Cmd::History { user_id } => dispatch(&service, caller, Action::CorrectionHistory { user_id }).await,
        Cmd::Dispatch { request } => {
            let raw = match request {
                Some(r) => r,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            dispatch_json(&service, caller, &raw).await
        }
    };

    println!("{}", serde_json::to_string_pretty(&response)?);

    if response.failed() {
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, prelude::*};

    color_eyre::install().map_err(|e| anyhow::anyhow!("{e}"))?;

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_timer(tracing_subscriber::fmt::time::uptime()),
        )
        .with(tracing_error::ErrorLayer::default())
        .init();

    Ok(())
}
