use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use light_client::{
    ActionOutcome, Channel, HttpLightingEndpoint, SessionConfig, SyncSession,
};
use shared::domain::RoomId;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "lightctl", about = "Control a multi-room light fixture")]
struct Args {
    /// Path to a TOML config file (defaults to ./lightctl.toml).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the endpoint URL from config and environment.
    #[arg(long)]
    endpoint_url: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Power {
    On,
    Off,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive console (default).
    Console,
    /// Turn the light on or off in a room.
    Toggle {
        #[arg(value_enum)]
        power: Power,
        #[arg(long)]
        room: u32,
    },
    /// Set a color and turn the light on in a room.
    Color {
        red: f64,
        green: f64,
        blue: f64,
        #[arg(long, default_value_t = 1.0)]
        brightness: f64,
        #[arg(long)]
        room: u32,
    },
    /// Apply a mode by id or name.
    Apply {
        mode: String,
        /// Room for modes that are not bound to one.
        #[arg(long)]
        room: Option<u32>,
    },
    /// List the available modes.
    Modes,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn toggle_in_room(session: &mut SyncSession, on: bool, room: u32) -> Result<ActionOutcome> {
    session.toggle(on).await?;
    Ok(session.choose_room(RoomId(room)).await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(url) = args.endpoint_url {
        settings.endpoint_url = url;
    }
    let endpoint_url = settings.endpoint()?;
    info!("lightctl: endpoint={endpoint_url} debounce_ms={}", settings.debounce_ms);

    let endpoint = HttpLightingEndpoint::with_timeout(endpoint_url, settings.request_timeout())
        .context("failed to build http client")?;
    let mut session = SyncSession::new(
        Arc::new(endpoint),
        SessionConfig {
            rooms: settings.rooms.clone(),
            quiet_period: settings.quiet_period(),
            room_policy: settings.room_policy(),
            seed_builtin_modes: true,
        },
    );

    match args.command.unwrap_or(Command::Console) {
        Command::Console => {
            let stdin = BufReader::new(tokio::io::stdin());
            console::run(&mut session, stdin).await?;
        }
        Command::Toggle { power, room } => {
            let outcome = toggle_in_room(&mut session, matches!(power, Power::On), room).await?;
            println!("{}", console::describe_outcome(&outcome));
        }
        Command::Color {
            red,
            green,
            blue,
            brightness,
            room,
        } => {
            session.set_channel(Channel::Red, red).await;
            session.set_channel(Channel::Green, green).await;
            session.set_channel(Channel::Blue, blue).await;
            session.set_brightness(brightness).await;
            let outcome = toggle_in_room(&mut session, true, room).await?;
            println!("{}", console::describe_outcome(&outcome));
        }
        Command::Apply { mode, room } => {
            let outcome = match session.apply_mode_by_key(&mode).await? {
                ActionOutcome::AwaitingRoom(_) => {
                    let Some(room) = room else {
                        bail!("mode '{mode}' is not bound to a room; pass --room <id>");
                    };
                    session.choose_room(RoomId(room)).await?
                }
                outcome => {
                    if room.is_some() {
                        warn!("lightctl: mode '{mode}' has its own room; --room ignored");
                    }
                    outcome
                }
            };
            println!("{}", console::describe_outcome(&outcome));
        }
        Command::Modes => {
            for mode in session.list_modes() {
                println!("{}\t{}\t{}", mode.id, mode.name, mode.color);
            }
        }
    }

    Ok(())
}
