use super::ui;
use crate::core::{ConverterState, CurrencyPair, ExchangeRate, RateCache};
use anyhow::Result;

/// Builds the state a one-shot conversion displays.
pub fn build_state(
    pair: CurrencyPair,
    rate: ExchangeRate,
    amount: &str,
    reverse: bool,
    stylized: bool,
) -> ConverterState {
    let mut state = ConverterState::new(pair, rate);
    if reverse {
        state = state.toggle_direction();
    }
    if stylized {
        state = state.toggle_display_mode();
    }
    state.set_amount(amount)
}

/// Converts `amount` once with the best available rate and prints the result.
pub async fn run(rate_cache: &RateCache, amount: &str, reverse: bool, stylized: bool) -> Result<()> {
    let spinner = ui::new_spinner("Looking up rate...");
    let (rate, source) = rate_cache.resolve().await;
    spinner.finish_and_clear();

    let state = build_state(rate_cache.pair().clone(), rate, amount, reverse, stylized);
    println!("{}", ui::render_state(&state));
    println!("{}", ui::rate_status(&state, Some(source)));
    Ok(())
}

/// Prints the rate in use, in both directions.
pub async fn show_rate(rate_cache: &RateCache) -> Result<()> {
    let spinner = ui::new_spinner("Looking up rate...");
    let (rate, source) = rate_cache.resolve().await;
    spinner.finish_and_clear();

    let state = ConverterState::new(rate_cache.pair().clone(), rate);
    println!(
        "{}",
        ui::style_text(&format!("{} rate", rate_cache.pair()), ui::StyleType::Title)
    );
    println!("{}", state.rate_info_text(true));
    println!("{}", state.rate_info_text(false));
    println!("{}", ui::rate_status(&state, Some(source)));
    Ok(())
}
