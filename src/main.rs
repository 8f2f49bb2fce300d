//! Terminal runtime and entry point.
//!
//! Wires the library together: one thread reads commands from stdin, a pool of
//! worker threads talks to the API, and the main thread runs the event loop.
//!
//! ```text
//! ┌──────────────┐   Inbound    ┌──────────────────────────────┐
//! │ stdin thread │ ───────────► │ event loop (main thread)     │
//! └──────────────┘              │  - handle_event              │
//! ┌──────────────┐   Inbound    │  - TimerQueue                │
//! │ worker pool  │ ───────────► │  - render to stdout          │
//! └──────────────┘              └──────────────────────────────┘
//!        ▲                                   │
//!        └────────── WorkerMessage ──────────┘
//! ```
//!
//! All state lives on the main thread. Timers are deadlines in a
//! [`TimerQueue`]; the loop sleeps on the inbound channel until the next
//! deadline.

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use moviematch::app::{parse_command, TimerQueue};
use moviematch::transport::http::HttpTransport;
use moviematch::worker::{MovieWorker, WorkerPool};
use moviematch::{handle_event, Action, AppState, Config, Event};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Instant;

/// Browse a movie catalog API from the terminal
#[derive(Parser, Debug)]
#[command(name = "moviematch")]
#[command(version)]
#[command(about = "Terminal browser for a movie catalog REST API")]
struct Args {
    /// Path to configuration file (default: platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the API, e.g. http://localhost:3000/api
    #[arg(long)]
    api_url: Option<String>,

    /// Override a configuration key, e.g. --set page_size=20 (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    overrides: Vec<(String, String)>,

    /// Terminal width used for rendering
    #[arg(long, env = "COLUMNS", default_value_t = 80)]
    width: usize,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))
}

/// Messages arriving at the event loop.
enum Inbound {
    Event(Event),
    /// An input line that did not parse; shown as the notice.
    Rejected(String),
}

struct Runtime {
    app: AppState,
    pool: WorkerPool,
    timers: TimerQueue,
    width: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut overrides: BTreeMap<String, String> = args.overrides.into_iter().collect();
    if let Some(url) = args.api_url {
        overrides.insert("api_url".to_string(), url);
    }
    let config = Config::load(args.config.as_deref(), &overrides)?;

    moviematch::observability::init_tracing(&config);
    tracing::info!(config = ?config, "configuration loaded");

    let (sender, receiver) = mpsc::channel::<Inbound>();

    let transport = HttpTransport::new(&config.api_url, config.request_timeout())?;
    let worker = MovieWorker::new(Arc::new(transport));
    let deliver = sender.clone();
    let pool = WorkerPool::start(config.worker_threads, worker, move |response| {
        // The loop may already be gone during shutdown.
        let _ = deliver.send(Inbound::Event(Event::WorkerResponse(response)));
    })?;

    spawn_input_reader(sender)?;

    let mut runtime = Runtime {
        app: moviematch::initialize(&config),
        pool,
        timers: TimerQueue::new(),
        width: args.width,
    };
    runtime.run(&receiver);
    runtime.pool.shutdown();

    tracing::info!("moviematch exited");
    Ok(())
}

fn spawn_input_reader(sender: Sender<Inbound>) -> std::io::Result<()> {
    std::thread::Builder::new().name("moviematch-input".to_string()).spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let inbound = match parse_command(&line) {
                Ok(Some(event)) => Inbound::Event(event),
                Ok(None) => continue,
                Err(e) => Inbound::Rejected(e.to_string()),
            };
            if sender.send(inbound).is_err() {
                return;
            }
        }
        // End of input behaves like `quit`.
        let _ = sender.send(Inbound::Event(Event::Quit));
    })?;
    Ok(())
}

impl Runtime {
    fn run(&mut self, receiver: &Receiver<Inbound>) {
        if self.dispatch(&Event::Startup) {
            return;
        }

        loop {
            let now = Instant::now();
            if let Some(event) = self.timers.pop_due(now) {
                if self.dispatch(&event) {
                    return;
                }
                continue;
            }

            let inbound = match self.timers.time_until_next(now) {
                Some(wait) => match receiver.recv_timeout(wait) {
                    Ok(inbound) => inbound,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => return,
                },
                None => match receiver.recv() {
                    Ok(inbound) => inbound,
                    Err(_) => return,
                },
            };

            let quit = match inbound {
                Inbound::Event(event) => self.dispatch(&event),
                Inbound::Rejected(message) => {
                    self.app.notice = Some(message);
                    self.render();
                    false
                }
            };
            if quit {
                return;
            }
        }
    }

    /// Handles one event and executes its actions. Returns `true` on quit.
    fn dispatch(&mut self, event: &Event) -> bool {
        let span = tracing::debug_span!("runtime_event", event_type = event.name());
        let _guard = span.entered();

        let (should_render, actions) = match handle_event(&mut self.app, event) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!(error = %e, "event rejected");
                self.app.notice = Some(e.to_string());
                (true, vec![])
            }
        };

        let mut quit = false;
        for action in actions {
            quit |= self.execute_action(action);
        }

        if should_render && !quit {
            self.render();
        }
        quit
    }

    fn execute_action(&mut self, action: Action) -> bool {
        match action {
            Action::ScheduleTimer { view, token, delay } => {
                tracing::trace!(%view, ?token, ?delay, "timer scheduled");
                self.timers.schedule(Instant::now(), view, token, delay);
                false
            }
            Action::PostToWorker(message) => {
                if let Err(e) = self.pool.post(message) {
                    tracing::warn!(error = %e, "failed to post to worker pool");
                    self.app.notice = Some(e.to_string());
                }
                false
            }
            Action::Quit => {
                self.timers.clear();
                true
            }
        }
    }

    fn render(&self) {
        let frame = moviematch::ui::render(&self.app, self.width);
        let mut stdout = std::io::stdout().lock();
        if writeln!(stdout, "{frame}").and_then(|()| stdout.flush()).is_err() {
            tracing::warn!("failed to write frame to stdout");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_does_not_error() {
        let err = Args::try_parse_from(["moviematch", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn repeated_set_flags_collect() {
        let args = Args::try_parse_from([
            "moviematch",
            "--set",
            "page_size=20",
            "--set",
            "trace_level=moviematch=debug",
        ])
        .unwrap();
        assert_eq!(
            args.overrides,
            vec![
                ("page_size".to_string(), "20".to_string()),
                ("trace_level".to_string(), "moviematch=debug".to_string()),
            ]
        );
    }

    #[test]
    fn set_requires_key_value() {
        assert!(Args::try_parse_from(["moviematch", "--set", "page_size"]).is_err());
        assert!(Args::try_parse_from(["moviematch", "--set", "=20"]).is_err());
    }
}
