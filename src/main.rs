use std::io::{self, BufRead, Write};
use std::thread;

use anyhow::Context;
use treasure_scoreboard::console::{parse_line, HELP};
use treasure_scoreboard::{
    AppResult, Command, CommandExecutor, Config, CueKind, Event, EventBus, MatchEngine,
    MonotonicClock,
};

const LOG_TARGET_STARTUP: &str = "treasure_scoreboard::startup";

/// Initialize tracing with file rotation
///
/// Logs are written to `<config dir>/TreasureScoreboard/logs/`, one file per
/// day (`scoreboard.YYYY-MM-DD.log`). Debug builds also log to stderr so the
/// console output on stdout stays readable.
fn initialize_tracing() {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = Config::app_dir()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|_| std::path::PathBuf::from("logs"));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "scoreboard.log");

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::info!("Log directory: {}", log_dir.display());
}

/// Print every state change as one line
fn spawn_renderer(bus: &EventBus) -> thread::JoinHandle<()> {
    let (rx, _id) = bus.subscribe();

    thread::spawn(move || {
        for event in rx.iter() {
            match event {
                Event::Shutdown => break,
                // cues belong to the dispatcher
                Event::Cue { .. } => {}
                other => println!("  {}", other.description()),
            }
        }
    })
}

/// Turn cues into audible alerts (terminal bell)
fn spawn_cue_dispatcher(bus: &EventBus) -> thread::JoinHandle<()> {
    let (rx, _id) = bus.subscribe();

    thread::spawn(move || {
        for event in rx.iter() {
            match event {
                Event::Cue { kind } => {
                    let label = match kind {
                        CueKind::NearEnd => "⏳ Final seconds!",
                        CueKind::Expired => "⏰ Time is up!",
                    };
                    print!("\x07");
                    println!("  {}", label);
                    let _ = io::stdout().flush();
                }
                Event::Shutdown => break,
                _ => {}
            }
        }
    })
}

fn main() -> AppResult<()> {
    initialize_tracing();
    tracing::info!(
        target: LOG_TARGET_STARTUP,
        "Starting treasure scoreboard v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::load()
        .with_context(|| format!("Failed to load config from {}", Config::config_path_display()))?;

    let bus = EventBus::new();
    let renderer = spawn_renderer(&bus);
    let cues = spawn_cue_dispatcher(&bus);

    let engine = MatchEngine::new(&config, MonotonicClock::new(), bus.clone());
    let executor = CommandExecutor::new(engine, config.tick_interval());
    let commands = executor.sender();
    let command_loop = executor.start_processing();

    println!("===========================================");
    println!("  Treasure Scoreboard");
    println!("===========================================");
    println!("{}\n", HELP);
    commands
        .send(Command::PublishSnapshot)
        .context("Command loop stopped unexpectedly")?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        match parse_line(&line, &config.time_presets) {
            Ok(Command::Quit) => break,
            Ok(command) => commands
                .send(command)
                .context("Command loop stopped unexpectedly")?,
            Err(e) => eprintln!("✗ {}", e),
        }
    }

    // Quit is also how end-of-input shuts the loop down
    commands
        .send(Command::Quit)
        .context("Command loop stopped unexpectedly")?;

    let engine = command_loop
        .join()
        .map_err(|_| anyhow::anyhow!("Command loop panicked"))?;
    let _ = renderer.join();
    let _ = cues.join();

    let (score1, score2) = engine.display_score();
    tracing::info!(
        "Final: {} {} - {} {}",
        engine.team_name(treasure_scoreboard::TeamId::Team1),
        score1,
        score2,
        engine.team_name(treasure_scoreboard::TeamId::Team2)
    );

    Ok(())
}
