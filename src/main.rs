//! Cabin Settings - a driver-distraction-aware vehicle settings shell
//!
//! This is the binary entry point. It wires the single-threaded dispatch
//! loop: a simulated vehicle backs the platform services, stdin drives
//! clicks/navigation, and simulation commands stand in for the vehicle's
//! restriction and state broadcasts. All logic lives in the library crates.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use cabin_app::{process_message, AppState, Message, PlatformEvent, ScreenId, UxRestrictions};
use cabin_platform::{SettingsStore, SimulatedVehicle, SystemClock, WifiRadio};

/// Cabin Settings - vehicle settings shell over a simulated vehicle
#[derive(Parser, Debug)]
#[command(name = "cabin")]
#[command(about = "A driver-distraction-aware vehicle settings shell", long_about = None)]
struct Args {
    /// Screen to open at startup (home, system, users, wifi, datetime)
    #[arg(long, default_value = "home")]
    screen: String,

    /// Settings file path (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start with driving restrictions already elevated
    #[arg(long)]
    driving: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    cabin_core::logging::init()?;
    let args = Args::parse();

    // Everything runs on one logical UI thread; background tasks are
    // spawn_local'd and re-enter through the message channel.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();
    runtime.block_on(local.run_until(run(args)))
}

async fn run(args: Args) -> color_eyre::Result<()> {
    let start_screen = ScreenId::parse(&args.screen)
        .ok_or_else(|| color_eyre::eyre::eyre!("unknown screen: {}", args.screen))?;

    let store = match args.config {
        Some(path) => SettingsStore::at_path(path),
        None => SettingsStore::at_default_path(),
    };

    // Seed the simulated vehicle from the persisted values.
    let vehicle = SimulatedVehicle::new();
    let persisted = store.load();
    let _ = vehicle.wifi.set_enabled(persisted.wifi_enabled);
    let _ = vehicle.clock.set_auto_time(persisted.auto_time);

    let mut state = AppState::new(vehicle.platform(), Some(store));
    state.shell.launch_screen(start_screen)?;
    if args.driving {
        state
            .shell
            .handle_restrictions_changed(UxRestrictions::elevated(now_ms()))?;
    }

    // Task completions re-enter through msg_tx; stdin commands arrive on
    // their own channel so "show"/"help" never touch the dispatch path.
    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<Message>();
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Command>();

    let stdin_vehicle = vehicle.clone();
    tokio::task::spawn_local(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let command = parse_line(line.trim(), &stdin_vehicle);
            if cmd_tx.send(command).is_err() {
                return;
            }
        }
        // Stdin closed (piped input exhausted): shut down cleanly.
        let _ = cmd_tx.send(Command::Send(Message::Quit));
    });

    println!("Cabin Settings - type 'help' for commands");
    render(&state);

    loop {
        tokio::select! {
            Some(message) = msg_rx.recv() => {
                process_message(&mut state, message, &msg_tx);
                render(&state);
            }
            Some(command) = cmd_rx.recv() => match command {
                Command::Send(message) => {
                    process_message(&mut state, message, &msg_tx);
                    render(&state);
                }
                Command::Render => render(&state),
                Command::Help => print_help(),
                Command::Ack(text) => println!("{text}"),
                Command::Unknown(input) => println!("unknown command: {input} (try 'help')"),
            },
            else => break,
        }
        if state.should_quit() {
            break;
        }
    }

    Ok(())
}

enum Command {
    Send(Message),
    Render,
    Help,
    Ack(&'static str),
    Unknown(String),
}

/// Parse one driver line into a message or a simulation action.
///
/// Simulation commands mutate the fake vehicle directly, then emit the
/// broadcast a real vehicle would have sent.
fn parse_line(line: &str, vehicle: &SimulatedVehicle) -> Command {
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or("");
    let rest: Vec<&str> = parts.collect();

    match verb {
        "" | "show" | "ls" => Command::Render,
        "quit" | "q" => Command::Send(Message::Quit),
        "back" | "b" => Command::Send(Message::Back),
        "help" | "?" => Command::Help,
        "click" | "c" => match rest.first() {
            Some(key) => Command::Send(Message::Click {
                key: (*key).to_string(),
            }),
            None => Command::Unknown(line.to_string()),
        },
        "open" | "o" => match rest.first().and_then(|name| ScreenId::parse(name)) {
            Some(id) => Command::Send(Message::OpenScreen(id)),
            None => Command::Unknown(line.to_string()),
        },
        "choose" => match rest.first().and_then(|n| n.parse::<usize>().ok()) {
            Some(index) => Command::Send(Message::DialogChoice { index }),
            None => Command::Unknown(line.to_string()),
        },
        "drive" => Command::Send(Message::RestrictionsChanged(UxRestrictions::elevated(
            now_ms(),
        ))),
        "park" => Command::Send(Message::RestrictionsChanged(UxRestrictions::baseline(
            now_ms(),
        ))),
        "sim" => match rest.as_slice() {
            ["tick", minutes] => {
                let minutes = minutes.parse().unwrap_or(1);
                vehicle.clock.advance_minutes(minutes);
                Command::Send(Message::Platform(PlatformEvent::TimeChanged))
            }
            ["wifi-join", ssid] => {
                vehicle.wifi.join(ssid, "192.168.1.50");
                Command::Send(Message::Platform(PlatformEvent::WifiStateChanged))
            }
            ["wifi-drop"] => {
                vehicle.wifi.disconnect();
                Command::Send(Message::Platform(PlatformEvent::WifiStateChanged))
            }
            ["fail-removals"] => {
                vehicle
                    .users
                    .fail_removals("user has active enrollment handles");
                Command::Ack("user removals will now fail")
            }
            _ => Command::Unknown(line.to_string()),
        },
        _ => Command::Unknown(line.to_string()),
    }
}

fn print_help() {
    println!("commands:");
    println!("  show                  print the active screen");
    println!("  click <key>           activate a preference row");
    println!("  open <screen>         jump to a screen (home/system/users/wifi/datetime)");
    println!("  back                  pop the back stack");
    println!("  choose <n>            pick a dialog option");
    println!("  drive / park          change the driving restriction state");
    println!("  sim tick <min>        advance the clock and broadcast it");
    println!("  sim wifi-join <ssid>  associate and broadcast");
    println!("  sim wifi-drop         disconnect and broadcast");
    println!("  sim fail-removals     make user removals fail (retry dialog demo)");
    println!("  quit                  exit");
}

/// Print the active screen the way a preference panel would render it.
fn render(state: &AppState) {
    let shell = &state.shell;
    let Some(screen_id) = shell.active_screen_id() else {
        return;
    };

    println!();
    println!("== {} ==", screen_id.title());
    if shell.overlay_visible() {
        println!("  [ not available while driving ]");
        return;
    }
    if let Some(screen) = shell.active_screen() {
        for pref in screen.iter().filter(|p| p.is_visible()) {
            let marker = match (pref.widget(), pref.is_checked()) {
                (cabin_app::WidgetKind::Toggle, true) => "[x] ",
                (cabin_app::WidgetKind::Toggle, false) => "[ ] ",
                _ => "",
            };
            let state_suffix = if pref.is_enabled() { "" } else { " (disabled)" };
            match pref.summary() {
                Some(summary) => println!(
                    "  {marker}{} - {summary}{state_suffix}  <{}>",
                    pref.title(),
                    pref.key()
                ),
                None => println!("  {marker}{}{state_suffix}  <{}>", pref.title(), pref.key()),
            }
        }
    }
    if let Some(dialog) = shell.top_dialog() {
        println!("  + {} - {}", dialog.title, dialog.message);
        for (idx, choice) in dialog.choices.iter().enumerate() {
            println!("      {idx}: {}", choice.label);
        }
        println!("      (choose <n>)");
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
