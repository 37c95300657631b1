//! Line-oriented operator console. Each line is one command against the
//! session; room prompts are answered with `room <id>` or `cancel`.

use anyhow::Result;
use futures::StreamExt;
use light_client::{ActionOutcome, Channel, SessionError, SessionEvent, SyncSession};
use shared::domain::RoomId;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::{broadcast, oneshot},
};
use tokio_stream::wrappers::LinesStream;
use tracing::{debug, warn};

pub const HELP: &str = "\
commands:
  red|green|blue <0..1>   set a color channel
  brightness <0..1>       set brightness
  on | off                toggle the light (asks for a room)
  room <id>               answer a pending room prompt
  cancel                  drop a pending room prompt
  modes                   list modes
  rooms                   list rooms
  apply <mode>            apply a mode by id or name
  create <name>           save the current color as a mode for the selected room
  create-for-room <name>  save the current color as a mode, asking for the room
  flush                   send a pending edit now
  status                  show the editing state
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    SetChannel(Channel, f64),
    SetBrightness(f64),
    Toggle(bool),
    ChooseRoom(RoomId),
    Cancel,
    ListModes,
    ListRooms,
    Apply(String),
    Create(String),
    CreateForRoom(String),
    Flush,
    Status,
    Help,
    Quit,
}

fn parse_unit(raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| format!("expected a number between 0 and 1, got '{}'", raw.trim()))
}

fn required_arg(rest: &str, usage: &str) -> Result<String, String> {
    let rest = rest.trim();
    if rest.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(rest.to_string())
    }
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    let command = match word.to_ascii_lowercase().as_str() {
        "red" | "green" | "blue" | "r" | "g" | "b" => {
            let channel = word.parse::<Channel>()?;
            let value = parse_unit(&required_arg(rest, "<channel> <value>")?)?;
            ConsoleCommand::SetChannel(channel, value)
        }
        "brightness" | "bri" => {
            ConsoleCommand::SetBrightness(parse_unit(&required_arg(rest, "brightness <value>")?)?)
        }
        "on" => ConsoleCommand::Toggle(true),
        "off" => ConsoleCommand::Toggle(false),
        "room" => {
            let raw = required_arg(rest, "room <id>")?;
            let id = raw
                .parse::<u32>()
                .map_err(|_| format!("room id must be a number, got '{raw}'"))?;
            ConsoleCommand::ChooseRoom(RoomId(id))
        }
        "cancel" => ConsoleCommand::Cancel,
        "modes" => ConsoleCommand::ListModes,
        "rooms" => ConsoleCommand::ListRooms,
        "apply" => ConsoleCommand::Apply(required_arg(rest, "apply <mode>")?),
        "create" => ConsoleCommand::Create(required_arg(rest, "create <name>")?),
        "create-for-room" => {
            ConsoleCommand::CreateForRoom(required_arg(rest, "create-for-room <name>")?)
        }
        "flush" => ConsoleCommand::Flush,
        "status" => ConsoleCommand::Status,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(command))
}

pub fn describe_outcome(outcome: &ActionOutcome) -> String {
    match outcome {
        ActionOutcome::AwaitingRoom(action) => {
            format!("choose a room to {} (room <id> or cancel)", action.describe())
        }
        ActionOutcome::Toggled { room, on, .. } => {
            let verb = if *on { "on" } else { "off" };
            format!("{}: light {verb}", room.name)
        }
        ActionOutcome::ModeApplied { mode, room, .. } => format!("{}: mode {mode}", room.name),
        ActionOutcome::ModeCreated(mode) => format!("saved mode {} ({})", mode.id, mode.color),
    }
}

/// Text for events the console shows as they arrive. Notifications are
/// left out because the action's own outcome line already reports them.
pub fn render_event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::RoomChoiceRequested { rooms, .. } => Some(
            rooms
                .iter()
                .map(|room| format!("  [{}] {}", room.id, room.name))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        SessionEvent::RoomChoiceCancelled(action) => {
            Some(format!("cancelled: {}", action.describe()))
        }
        SessionEvent::Error(message) => Some(format!("error: {message}")),
        SessionEvent::CommandSent { .. }
        | SessionEvent::ModeCreated(_)
        | SessionEvent::Notification(_) => None,
    }
}

fn status_line(session: &SyncSession) -> String {
    let color = session.color();
    let room = session
        .selected_room()
        .map(|room| room.name.clone())
        .unwrap_or_else(|| "none".to_string());
    format!(
        "{} brightness={:.2} on={} room={room}",
        color.rgb(),
        color.brightness(),
        color.is_on()
    )
}

fn print_result(result: Result<ActionOutcome, SessionError>) {
    match result {
        Ok(outcome) => println!("{}", describe_outcome(&outcome)),
        Err(err) => {
            debug!("console: action failed: {err}");
            println!("error: {}", err.notification());
        }
    }
}

/// Runs one command. Returns `false` when the console should stop.
pub async fn execute(session: &mut SyncSession, command: ConsoleCommand) -> bool {
    match command {
        ConsoleCommand::SetChannel(channel, value) => session.set_channel(channel, value).await,
        ConsoleCommand::SetBrightness(value) => session.set_brightness(value).await,
        ConsoleCommand::Toggle(on) => print_result(session.toggle(on).await),
        ConsoleCommand::ChooseRoom(room) => print_result(session.choose_room(room).await),
        ConsoleCommand::Cancel => {
            if session.cancel_room_choice().is_none() {
                println!("nothing to cancel");
            }
        }
        ConsoleCommand::ListModes => {
            for mode in session.list_modes() {
                let room = mode
                    .room
                    .map(|room| format!("room {room}"))
                    .unwrap_or_else(|| "any room".to_string());
                println!("  {:<16} {:<16} {} {room}", mode.id, mode.name, mode.color);
            }
        }
        ConsoleCommand::ListRooms => {
            for room in session.rooms() {
                println!("  [{}] {}", room.id, room.name);
            }
        }
        ConsoleCommand::Apply(key) => print_result(session.apply_mode_by_key(&key).await),
        ConsoleCommand::Create(name) => print_result(session.create_mode(&name)),
        ConsoleCommand::CreateForRoom(name) => {
            print_result(session.begin_create_mode(&name).await)
        }
        ConsoleCommand::Flush => {
            if !session.flush().await {
                println!("nothing pending");
            }
        }
        ConsoleCommand::Status => println!("{}", status_line(session)),
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => return false,
    }
    true
}

pub async fn run<R>(session: &mut SyncSession, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    run_with(session, input, |text| println!("{text}")).await
}

/// Prints rendered events until told to stop, then drains whatever the
/// session emitted before the stop signal.
async fn print_events<F>(
    mut events: broadcast::Receiver<SessionEvent>,
    mut shutdown: oneshot::Receiver<()>,
    emit: F,
) where
    F: Fn(String),
{
    let show = |event: SessionEvent| {
        if let Some(text) = render_event(&event) {
            emit(text);
        }
    };

    loop {
        tokio::select! {
            received = events.recv() => match received {
                Ok(event) => show(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "console: event printer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return,
            },
            _ = &mut shutdown => break,
        }
    }

    loop {
        match events.try_recv() {
            Ok(event) => show(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "console: event printer lagged");
            }
            Err(_) => return,
        }
    }
}

async fn run_with<R, F>(session: &mut SyncSession, input: R, emit: F) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    F: Fn(String) + Send + Sync + 'static,
{
    let (stop, shutdown) = oneshot::channel();
    let printer = tokio::spawn(print_events(session.subscribe_events(), shutdown, emit));

    println!("{HELP}");
    let mut lines = LinesStream::new(input.lines());
    while let Some(line) = lines.next().await {
        match parse_line(&line?) {
            Ok(Some(command)) => {
                if !execute(session, command).await {
                    break;
                }
            }
            Ok(None) => {}
            Err(message) => println!("{message}"),
        }
    }

    session.flush().await;
    let _ = stop.send(());
    if let Err(err) = printer.await {
        warn!("console: event printer stopped: {err}");
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
