//! Terminal host for the Contour engine.
//!
//! Every input line is treated as the new composer contents. Lines starting
//! with `:` are host commands (`:help` lists them); `::text` analyzes a
//! literal `:text`.
//!
//! Usage:
//!   contour                          # interactive
//!   contour --once "50 usd to eur"   # analyze one input and exit
//!   RUST_LOG=contour=trace contour   # verbose engine logs on stderr

mod bus;
mod clipboard;
mod overlay;

use anyhow::Context;
use bus::ChannelEventBus;
use clap::Parser;
use clipboard::PlatformClipboard;
use contour_engine::{CommandOutcome, Contour, ContourConfig, ContourState, Resolvers};
use contour_events::event_names;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "contour")]
#[command(about = "Live input classification and embedded tools for a chat composer")]
struct Args {
    /// Config file (defaults to <config dir>/contour/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analyze this input, wait for any lookup, print and exit
    #[arg(long)]
    once: Option<String>,

    /// Print state snapshots as JSON instead of the text overlay
    #[arg(long)]
    json: bool,

    /// Seconds to wait for a lookup in --once mode
    #[arg(long, default_value = "10")]
    timeout: u64,
}

const HELP: &str = "\
:up / :down        move the palette selection
:select <n>        select palette entry n
:enter             run the selected command
:focus <module>    open a module in focused mode
:start :toggle     start, pause or resume the timer
:reset             reset the timer
:duration <secs>   set the timer duration
:copy              copy the current value
:dismiss           hide the overlay
:state             print the raw state as JSON
:quit              exit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,contour=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ContourConfig::load(path)?,
        None => ContourConfig::load_or_default()?,
    };
    let resolvers = Resolvers::http(
        &config.endpoints,
        &config.user_agent,
        &config.dictionary_lang,
        config.rate_cache_ttl(),
    )
    .context("failed to build lookup clients")?;

    let (bus, events) = ChannelEventBus::new();
    let contour = Contour::builder(config, resolvers)
        .event_bus(Arc::new(bus))
        .clipboard(Arc::new(PlatformClipboard))
        .build();

    info!("Starting contour");

    match &args.once {
        Some(text) => run_once(&contour, events, text, &args).await,
        None => run_interactive(&contour, events, args.json).await,
    }
}

async fn run_once(
    contour: &Contour,
    mut events: UnboundedReceiver<(String, serde_json::Value)>,
    text: &str,
    args: &Args,
) -> anyhow::Result<()> {
    let mut state = contour.analyze(text);
    let deadline = tokio::time::sleep(Duration::from_secs(args.timeout));
    tokio::pin!(deadline);

    while state.result().is_some_and(|r| r.is_loading()) {
        tokio::select! {
            event = events.recv() => match event {
                Some((topic, _)) if topic == event_names::STATE_CHANGED => state = contour.state(),
                Some(_) => {}
                None => break,
            },
            _ = &mut deadline => {
                anyhow::bail!("lookup did not finish within {}s", args.timeout);
            }
        }
    }

    print_state(&state, args.json)
}

async fn run_interactive(
    contour: &Contour,
    mut events: UnboundedReceiver<(String, serde_json::Value)>,
    json: bool,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("Type to analyze, :help for commands.");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                let Some(state) = handle_line(contour, &line) else {
                    break;
                };
                // Events from the synchronous call describe the state just returned.
                drain_pending(&mut events);
                print_state(&state, json)?;
            }
            Some((topic, _)) = events.recv() => {
                let completed =
                    (topic == event_names::TIMER_COMPLETED) | drain_pending(&mut events);
                if completed {
                    println!("\x07Timer done.");
                }
                print_state(&contour.state(), json)?;
            }
        }
    }
    Ok(())
}

/// Discard queued events, reporting whether a timer completion was among them.
fn drain_pending(events: &mut UnboundedReceiver<(String, serde_json::Value)>) -> bool {
    let mut completed = false;
    while let Ok((topic, _)) = events.try_recv() {
        completed |= topic == event_names::TIMER_COMPLETED;
    }
    completed
}

/// Apply one input line. `None` means quit.
fn handle_line(contour: &Contour, line: &str) -> Option<ContourState> {
    let Some(command) = line.strip_prefix(':').filter(|rest| !rest.starts_with(':')) else {
        let text = line.strip_prefix(':').unwrap_or(line);
        return Some(contour.analyze(text));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or("");
    let arg = parts.next();

    let state = match (name, arg) {
        ("quit" | "q", _) => return None,
        ("up", _) => contour.select_up(),
        ("down", _) => contour.select_down(),
        ("select", Some(n)) => match n.parse() {
            Ok(index) => contour.select_index(index),
            Err(_) => {
                eprintln!("not an index: {n}");
                contour.state()
            }
        },
        ("enter", _) => {
            match contour.execute_selected() {
                Some(CommandOutcome::Action(action)) => {
                    println!("(host action: {})", action.as_str())
                }
                Some(CommandOutcome::Focused(_)) => {}
                None => eprintln!("nothing selected"),
            }
            contour.state()
        }
        ("focus", Some(id)) => contour.focus_on_module(id),
        ("start", _) => contour.start_timer(),
        ("toggle", _) => contour.toggle_timer(),
        ("reset", _) => contour.reset_timer(),
        ("duration", Some(secs)) => match secs.parse() {
            Ok(seconds) => contour.set_timer_duration(seconds),
            Err(_) => {
                eprintln!("not a number of seconds: {secs}");
                contour.state()
            }
        },
        ("copy", _) => {
            match contour.copy_current() {
                Some(value) => println!("(copied {value})"),
                None => eprintln!("nothing to copy"),
            }
            contour.state()
        }
        ("dismiss", _) => contour.dismiss(),
        ("state", _) => {
            let state = contour.state();
            match serde_json::to_string_pretty(&state) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("cannot serialize state: {e}"),
            }
            return Some(state);
        }
        _ => {
            println!("{HELP}");
            contour.state()
        }
    };
    Some(state)
}

fn print_state(state: &ContourState, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(state)?);
        return Ok(());
    }
    let text = overlay::render(state);
    if text.is_empty() {
        println!("(hidden)");
    } else {
        print!("{text}");
    }
    Ok(())
}
