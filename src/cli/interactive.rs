//! Line-driven converter. The live rate is looked up in the background while
//! the prompt already works with the in-memory rate.

use super::ui;
use crate::core::{ConverterState, RateCache, RateSource};
use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Amount(String),
    Swap,
    Mode,
    Help,
    Quit,
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "s" | "swap" => Input::Swap,
            "m" | "mode" => Input::Mode,
            "h" | "?" | "help" => Input::Help,
            "q" | "quit" | "exit" => Input::Quit,
            _ => Input::Amount(line.to_string()),
        }
    }
}

/// The state after `input`, or `None` when the user quits.
pub fn apply(state: &ConverterState, input: &Input) -> Option<ConverterState> {
    match input {
        Input::Amount(text) => Some(state.set_amount(text.as_str())),
        Input::Swap => Some(state.toggle_direction()),
        Input::Mode => Some(state.toggle_display_mode()),
        Input::Help => Some(state.clone()),
        Input::Quit => None,
    }
}

fn help_text(state: &ConverterState) -> String {
    format!(
        "Type an amount in {}, [s] swap currencies, [m] {}, [q] quit",
        state.source_currency(),
        state.display_mode().toggle_label()
    )
}

fn print_screen(state: &ConverterState, source: Option<RateSource>) {
    ui::print_separator();
    println!("{}", ui::render_state(state));
    println!("{}", ui::rate_status(state, source));
    println!("{}", ui::style_text(&help_text(state), ui::StyleType::Subtle));
}

pub async fn run(rate_cache: Arc<RateCache>) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    drive(rate_cache, stdin, print_screen).await?;
    Ok(())
}

/// Runs a session over `input` until it ends or the user quits, calling
/// `render` after every change. Returns the final state.
pub async fn drive<R, F>(
    rate_cache: Arc<RateCache>,
    input: R,
    mut render: F,
) -> Result<ConverterState>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&ConverterState, Option<RateSource>),
{
    let mut state = ConverterState::new(rate_cache.pair().clone(), rate_cache.current());
    let mut source = None;
    render(&state, source);

    let lookup = Arc::clone(&rate_cache);
    let mut fetch = tokio::spawn(async move { lookup.resolve().await });
    let mut fetch_pending = true;

    let mut lines = input.lines();
    loop {
        tokio::select! {
            resolved = &mut fetch, if fetch_pending => {
                fetch_pending = false;
                match resolved {
                    Ok((rate, rate_source)) => {
                        state = state.with_rate(rate);
                        source = Some(rate_source);
                    }
                    Err(e) => {
                        warn!(error = %e, "Rate lookup task failed");
                        source = Some(RateSource::Fallback);
                    }
                }
                render(&state, source);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match apply(&state, &Input::parse(&line)) {
                    Some(next) => state = next,
                    None => break,
                }
                render(&state, source);
            }
        }
    }

    Ok(state)
}
