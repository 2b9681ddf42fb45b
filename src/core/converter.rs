//! User-facing converter state and the conversion it displays.
//!
//! Every transition returns a new [`ConverterState`], so a front end only
//! has to swap its current value and re-render.

use crate::core::currency::CurrencyPair;
use crate::core::rate::ExchangeRate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Amount shown after startup and after every direction change.
pub const DEFAULT_AMOUNT: &str = "100";
/// Output for an empty or unusable amount.
pub const PLACEHOLDER: &str = "0.00";
/// Output in stylized mode, whatever the amount or rate.
pub const STYLIZED_RESULT: &str = "💅 it’s free ✨💕";
/// Rate line in stylized mode, on both sides.
pub const STYLIZED_RATE_INFO: &str = "1 = 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Amount is entered in the base currency.
    #[default]
    BaseToQuote,
    /// Amount is entered in the quote currency.
    QuoteToBase,
}

impl Direction {
    pub fn toggle(self) -> Self {
        match self {
            Direction::BaseToQuote => Direction::QuoteToBase,
            Direction::QuoteToBase => Direction::BaseToQuote,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Standard,
    Stylized,
}

impl DisplayMode {
    pub fn toggle(self) -> Self {
        match self {
            DisplayMode::Standard => DisplayMode::Stylized,
            DisplayMode::Stylized => DisplayMode::Standard,
        }
    }

    /// Background hint for the surrounding chrome.
    pub fn theme_color(self) -> &'static str {
        match self {
            DisplayMode::Standard => "#000000",
            DisplayMode::Stylized => "#ffc0cb",
        }
    }

    /// Text colour for rate lines and results.
    pub fn accent_color(self) -> &'static str {
        match self {
            DisplayMode::Standard => "#bbbbbb",
            DisplayMode::Stylized => "#d63384",
        }
    }

    /// Label of the control that switches to the other mode.
    pub fn toggle_label(self) -> &'static str {
        match self {
            DisplayMode::Standard => "Girl Math 💖",
            DisplayMode::Stylized => "Reality 🌍",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConverterState {
    pair: CurrencyPair,
    amount: String,
    direction: Direction,
    rate: ExchangeRate,
    display_mode: DisplayMode,
}

impl ConverterState {
    pub fn new(pair: CurrencyPair, rate: ExchangeRate) -> Self {
        Self {
            pair,
            amount: DEFAULT_AMOUNT.to_string(),
            direction: Direction::default(),
            rate,
            display_mode: DisplayMode::default(),
        }
    }

    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn rate(&self) -> ExchangeRate {
        self.rate
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// Stores the text as typed. It is only interpreted by [`Self::convert`].
    pub fn set_amount(&self, text: impl Into<String>) -> Self {
        Self {
            amount: text.into(),
            ..self.clone()
        }
    }

    /// Swaps source and target. The amount goes back to [`DEFAULT_AMOUNT`]
    /// since a magnitude typed for one currency means little in the other.
    pub fn toggle_direction(&self) -> Self {
        Self {
            direction: self.direction.toggle(),
            amount: DEFAULT_AMOUNT.to_string(),
            ..self.clone()
        }
    }

    pub fn toggle_display_mode(&self) -> Self {
        Self {
            display_mode: self.display_mode.toggle(),
            ..self.clone()
        }
    }

    pub fn with_rate(&self, rate: ExchangeRate) -> Self {
        Self {
            rate,
            ..self.clone()
        }
    }

    /// Code of the currency the amount is entered in.
    pub fn source_currency(&self) -> &str {
        match self.direction {
            Direction::BaseToQuote => &self.pair.base,
            Direction::QuoteToBase => &self.pair.quote,
        }
    }

    pub fn target_currency(&self) -> &str {
        match self.direction {
            Direction::BaseToQuote => &self.pair.quote,
            Direction::QuoteToBase => &self.pair.base,
        }
    }

    pub fn convert(&self) -> String {
        if self.amount.is_empty() {
            return PLACEHOLDER.to_string();
        }
        if self.display_mode == DisplayMode::Stylized {
            return STYLIZED_RESULT.to_string();
        }
        let Some(amount) = parse_amount(&self.amount) else {
            return PLACEHOLDER.to_string();
        };

        let converted = match self.direction {
            Direction::BaseToQuote => amount * self.rate.value(),
            Direction::QuoteToBase => amount / self.rate.value(),
        };
        if !converted.is_finite() {
            return PLACEHOLDER.to_string();
        }
        to_fixed(converted, 2)
    }

    /// Rate line shown under the source side (`true`) or the target side.
    /// Each side quotes one unit of its own currency; the base currency gets
    /// two decimals and the quote currency four.
    pub fn rate_info_text(&self, for_source_side: bool) -> String {
        if self.display_mode == DisplayMode::Stylized {
            return STYLIZED_RATE_INFO.to_string();
        }

        let side_is_base = (self.direction == Direction::BaseToQuote) == for_source_side;
        if side_is_base {
            format!(
                "1 {} = {} {}",
                self.pair.base,
                to_fixed(self.rate.value(), 2),
                self.pair.quote
            )
        } else {
            format!(
                "1 {} = {} {}",
                self.pair.quote,
                to_fixed(self.rate.inverse(), 4),
                self.pair.base
            )
        }
    }
}

/// Formats `value` with `places` decimals, rounding ties away from zero.
///
/// The exact binary value is rounded, so `0.125` gives `0.13` while `1.005`
/// (stored just below the tie) gives `1.00`.
pub fn to_fixed(value: f64, places: u32) -> String {
    let width = places as usize;
    match Decimal::from_f64_retain(value) {
        Some(exact) => format!(
            "{:.width$}",
            exact.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
        ),
        // Outside the decimal range
        None => format!("{value:.width$}"),
    }
}

/// A finite, non-negative amount, or `None`.
fn parse_amount(text: &str) -> Option<f64> {
    let value = text.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    // "-0" parses to negative zero
    Some(if value == 0.0 { 0.0 } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn state_with_rate(rate: f64) -> ConverterState {
        ConverterState::new(
            CurrencyPair::default(),
            ExchangeRate::new(rate, Utc::now()).unwrap(),
        )
    }

    #[test]
    fn test_initial_state() {
        let state = ConverterState::new(CurrencyPair::default(), ExchangeRate::default());
        assert_eq!(state.amount(), "100");
        assert_eq!(state.direction(), Direction::BaseToQuote);
        assert_eq!(state.display_mode(), DisplayMode::Standard);
        assert_eq!(state.rate().value(), 48.0);
        assert_eq!(state.source_currency(), "EUR");
        assert_eq!(state.target_currency(), "TRY");
    }

    #[test]
    fn test_convert_base_to_quote() {
        let state = state_with_rate(48.0);
        assert_eq!(state.convert(), "4800.00");
        assert_eq!(state.set_amount("2.5").convert(), "120.00");
    }

    #[test]
    fn test_convert_quote_to_base() {
        let state = state_with_rate(48.0).toggle_direction();
        assert_eq!(state.amount(), "100");
        assert_eq!(state.convert(), "2.08");
        assert_eq!(state.source_currency(), "TRY");
        assert_eq!(state.target_currency(), "EUR");
    }

    #[test]
    fn test_unusable_amounts_show_placeholder() {
        let state = state_with_rate(48.0);
        for text in ["", "abc", "-5", "1.2.3", "inf", "NaN"] {
            assert_eq!(state.set_amount(text).convert(), "0.00", "amount {text:?}");
        }
        assert_eq!(state.set_amount("-0").convert(), "0.00");
        assert_eq!(state.set_amount(" 10 ").convert(), "480.00");
    }

    #[test]
    fn test_set_amount_is_verbatim() {
        let state = state_with_rate(48.0).set_amount(" 12,5 ");
        assert_eq!(state.amount(), " 12,5 ");
    }

    #[test]
    fn test_toggle_direction_is_involution_and_resets_amount() {
        let state = state_with_rate(48.0).set_amount("250");
        let once = state.toggle_direction();
        assert_eq!(once.direction(), Direction::QuoteToBase);
        assert_eq!(once.amount(), DEFAULT_AMOUNT);

        let twice = once.set_amount("7").toggle_direction();
        assert_eq!(twice.direction(), state.direction());
        assert_eq!(twice.amount(), DEFAULT_AMOUNT);
        assert_ne!(twice, state);
    }

    #[test]
    fn test_toggle_display_mode_leaves_other_state() {
        let state = state_with_rate(41.5).set_amount("12").toggle_direction();
        let stylized = state.toggle_display_mode();
        assert_eq!(stylized.display_mode(), DisplayMode::Stylized);
        assert_eq!(stylized.amount(), state.amount());
        assert_eq!(stylized.direction(), state.direction());
        assert_eq!(stylized.rate(), state.rate());

        assert_eq!(stylized.toggle_display_mode(), state);
    }

    #[test]
    fn test_stylized_mode_bypasses_math() {
        let state = state_with_rate(48.0).toggle_display_mode();
        assert_eq!(state.convert(), STYLIZED_RESULT);
        assert_eq!(state.set_amount("abc").convert(), STYLIZED_RESULT);
        assert_eq!(state.toggle_direction().convert(), STYLIZED_RESULT);
        assert_eq!(state.rate_info_text(true), "1 = 1");
        assert_eq!(state.rate_info_text(false), "1 = 1");
    }

    #[test]
    fn test_stylized_mode_with_empty_amount() {
        let state = state_with_rate(48.0).toggle_display_mode().set_amount("");
        assert_eq!(state.convert(), PLACEHOLDER);
    }

    #[test]
    fn test_rate_info_text() {
        let state = state_with_rate(48.0);
        assert_eq!(state.rate_info_text(true), "1 EUR = 48.00 TRY");
        assert_eq!(state.rate_info_text(false), "1 TRY = 0.0208 EUR");

        let reversed = state.toggle_direction();
        assert_eq!(reversed.rate_info_text(true), "1 TRY = 0.0208 EUR");
        assert_eq!(reversed.rate_info_text(false), "1 EUR = 48.00 TRY");
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        // 6 / 48 is exactly 0.125
        let state = state_with_rate(48.0).toggle_direction().set_amount("6");
        assert_eq!(state.convert(), "0.13");

        let state = state_with_rate(48.125);
        assert_eq!(state.rate_info_text(true), "1 EUR = 48.13 TRY");
        assert_eq!(state.set_amount("1").convert(), "48.13");

        // 1 / 0.8 is exactly 1.25
        let state = state_with_rate(0.8);
        assert_eq!(state.rate_info_text(false), "1 TRY = 1.2500 EUR");
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(4800.0, 2), "4800.00");
        assert_eq!(to_fixed(1.0 / 48.0, 4), "0.0208");
        assert_eq!(to_fixed(1e30, 2), format!("{:.2}", 1e30));
    }

    #[test]
    fn test_with_rate_updates_output() {
        let state = state_with_rate(48.0).with_rate(ExchangeRate::new(50.0, Utc::now()).unwrap());
        assert_eq!(state.convert(), "5000.00");
        assert_eq!(state.amount(), "100");
    }

    #[test]
    fn test_mode_hints() {
        assert_eq!(DisplayMode::Standard.theme_color(), "#000000");
        assert_eq!(DisplayMode::Stylized.theme_color(), "#ffc0cb");
        assert_eq!(DisplayMode::Standard.toggle_label(), "Girl Math 💖");
        assert_eq!(DisplayMode::Stylized.toggle_label(), "Reality 🌍");
    }
}
