//! Line-oriented interactive session over stdin.

use anyhow::{Context, Result};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;
use user_search::{SearchController, SearchOutcome};

use crate::render::StateView;

const HELP: &str = "\
Type a username fragment to search. Commands:
  :next  :prev  :first  :last  :page N
  :retry  :dismiss  :reset  :help  :quit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Query(String),
    Next,
    Previous,
    First,
    Last,
    Page(i64),
    Retry,
    Dismiss,
    Reset,
    Help,
    Quit,
    Invalid(String),
}

fn parse_line(line: &str) -> Input {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return Input::Query(line.to_owned());
    };
    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("next" | "n"), None) => Input::Next,
        (Some("prev" | "p"), None) => Input::Previous,
        (Some("first"), None) => Input::First,
        (Some("last"), None) => Input::Last,
        (Some("page"), Some(n)) => n
            .parse()
            .map_or_else(|_| Input::Invalid(trimmed.to_owned()), Input::Page),
        (Some("retry" | "r"), None) => Input::Retry,
        (Some("dismiss"), None) => Input::Dismiss,
        (Some("reset"), None) => Input::Reset,
        (Some("help" | "h"), None) => Input::Help,
        (Some("quit" | "q"), None) => Input::Quit,
        _ => Input::Invalid(trimmed.to_owned()),
    }
}

fn log_outcome(command: &'static str, outcome: &SearchOutcome) {
    tracing::debug!(command, outcome = outcome.label(), "command finished");
}

/// Run page navigation in the background so typing stays responsive; the
/// controller drops whichever response is no longer current.
fn spawn_navigation(controller: &SearchController, input: Input) {
    let controller = controller.clone();
    tokio::spawn(async move {
        let (command, outcome) = match input {
            Input::Next => ("next", controller.next_page().await),
            Input::Previous => ("prev", controller.previous_page().await),
            Input::First => ("first", controller.first_page().await),
            Input::Last => ("last", controller.last_page().await),
            Input::Page(n) => ("page", controller.set_page(n).await),
            _ => return,
        };
        log_outcome(command, &outcome);
    });
}

/// Upper bound on waiting for outstanding work once input ends.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(60);

/// Finish what the last lines started: fire the pending debounced search
/// and wait for the in-flight one, up to [`DRAIN_TIMEOUT`].
async fn drain(controller: &SearchController) {
    let mut updates = controller.subscribe();
    let settle = async {
        if let Some(outcome) = controller.flush().await {
            log_outcome("flush", &outcome);
        }
        updates.wait_for(|state| !state.loading).await.is_ok()
    };
    if tokio::time::timeout(DRAIN_TIMEOUT, settle).await.is_err() {
        tracing::warn!(
            timeout_secs = DRAIN_TIMEOUT.as_secs(),
            "gave up waiting for the last search"
        );
    }
}

/// Read commands until `:quit` or end of input, printing every state change.
///
/// At end of input the last query is still searched and printed, so piped
/// input works.
///
/// # Errors
/// Fails when stdin cannot be read.
pub async fn run(controller: &SearchController) -> Result<()> {
    let mut updates = controller.subscribe();
    let (stop, mut stopped) = oneshot::channel::<()>();
    let printer = tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let view = StateView(&updates.borrow_and_update()).to_string();
                    println!("{view}");
                }
                _ = &mut stopped => {
                    if updates.has_changed().unwrap_or(false) {
                        let view = StateView(&updates.borrow_and_update()).to_string();
                        println!("{view}");
                    }
                    break;
                }
            }
        }
    });

    println!("{HELP}");
    let mut quit = false;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match parse_line(&line) {
            Input::Query(text) => controller.set_query(&text),
            nav @ (Input::Next | Input::Previous | Input::First | Input::Last | Input::Page(_)) => {
                spawn_navigation(controller, nav);
            }
            Input::Retry => {
                let controller = controller.clone();
                tokio::spawn(async move {
                    match controller.retry().await {
                        Some(outcome) => log_outcome("retry", &outcome),
                        None => println!("Nothing to retry."),
                    }
                });
            }
            Input::Dismiss => controller.dismiss_error(),
            Input::Reset => controller.reset(),
            Input::Help => println!("{HELP}"),
            Input::Quit => {
                quit = true;
                break;
            }
            Input::Invalid(text) => println!("Unknown command '{text}'. Type :help for commands."),
        }
    }

    if !quit {
        drain(controller).await;
    }
    drop(stop);
    printer.await.context("state printer failed")?;
    tracing::info!("interactive session ended");
    Ok(())
}
