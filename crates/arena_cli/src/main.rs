//! Terminal client for the arena dashboard.
//!
//! Polls the arena server and prints leaderboard/message re-renders, counter
//! changes and control changes. Commands are read from stdin:
//!
//!   load | start | stop    Send the action
//!   status                 Show control state and counters
//!   help                   List commands
//!   quit                   Exit
//!
//! Talks to http://127.0.0.1:5000 by default; override with `--url`, the
//! config file or `ARENA_BASE_URL`. Set `RUST_LOG` for more detail.

use std::path::PathBuf;
use std::process;

use arena::{Action, ClientConfig, Dashboard, Driver, ElementId, Renderer};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::LocalSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod exec;
mod http;
mod terminal;

use exec::TokioExecutor;
use http::HttpBackend;
use terminal::TerminalSurface;

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    url: Option<String>,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut out = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                out.config = Some(PathBuf::from(path));
            }
            "--url" => out.url = Some(args.next().ok_or("--url needs a base URL")?),
            "-h" | "--help" => out.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(out)
}

fn usage(code: i32) -> ! {
    eprintln!("arena-cli (polls the arena server @ http://127.0.0.1:5000 by default)");
    eprintln!("Usage: arena-cli [--config <path>] [--url <base-url>]\n");
    eprintln!("Environment:");
    eprintln!("  ARENA_BASE_URL              Server base URL");
    eprintln!("  ARENA_POLL_MS               Poll interval in milliseconds");
    eprintln!("  RUST_LOG                    Log filter (default: info)");
    eprintln!();
    print_commands();
    process::exit(code);
}

fn print_commands() {
    eprintln!("Commands (stdin):");
    eprintln!("  load | start | stop         Send the action");
    eprintln!("  status                      Show control state and counters");
    eprintln!("  help                        List commands");
    eprintln!("  quit                        Exit");
}

#[derive(Debug, PartialEq)]
enum Input {
    Action(Action),
    Status,
    Help,
    Quit,
    Blank,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Input::Blank;
        }
        if let Some(action) = Action::parse(line) {
            return Input::Action(action);
        }
        match line.to_ascii_lowercase().as_str() {
            "status" => Input::Status,
            "help" | "?" => Input::Help,
            "quit" | "exit" | "q" => Input::Quit,
            _ => Input::Unknown(line.to_string()),
        }
    }
}

fn status_line(db: &Dashboard<TerminalSurface>) -> String {
    let state = db.state();
    let surface = db.surface();
    let memory = surface.memory();
    let text = |id: ElementId| memory.text(id).unwrap_or("-").to_string();
    format!(
        "mode={:?}{} polls={} online={} ops={} demo={} players={} games={} high={} server={}",
        state.mode(),
        if state.is_provisional() { " (unconfirmed)" } else { "" },
        db.polls(),
        text(ElementId::OnlineCount),
        text(ElementId::OpsPerSecond),
        text(ElementId::DemoCounter),
        text(ElementId::TotalPlayers),
        text(ElementId::ActiveGames),
        text(ElementId::HighScore),
        text(ElementId::ServerUptime),
    )
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(a) if a.help => usage(0),
        Ok(a) => a,
        Err(msg) => {
            eprintln!("{msg}\n");
            usage(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClientConfig::load(args.config.as_deref())?;
    if let Some(url) = args.url {
        config.base_url = url;
    }
    config.validate()?;
    if config.is_same_origin() {
        return Err("base_url must be set for the terminal client".into());
    }
    info!(
        base_url = %config.base_url,
        poll_ms = config.poll_interval_ms,
        "arena client starting"
    );

    let backend = HttpBackend::new(&config)?;
    let dashboard = Dashboard::new(TerminalSurface::stdio(), Renderer::local(), &config);
    let driver = Driver::new(dashboard, backend, TokioExecutor, &config);

    let local = LocalSet::new();
    local
        .run_until(async move {
            driver.start();
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                let line = tokio::select! {
                    line = lines.next_line() => line?,
                    _ = tokio::signal::ctrl_c() => {
                        info!("interrupted");
                        break;
                    }
                };
                let Some(line) = line else {
                    break;
                };
                match Input::parse(&line) {
                    Input::Action(action) => driver.request(action),
                    Input::Status => println!("{}", driver.with_dashboard(status_line)),
                    Input::Help => print_commands(),
                    Input::Quit => break,
                    Input::Blank => {}
                    Input::Unknown(cmd) => warn!("unknown command: {}", cmd),
                }
            }
            Ok::<(), std::io::Error>(())
        })
        .await?;

    info!("arena client stopped");
    Ok(())
}
