use crate::core::converter::to_fixed;
use crate::core::{ConverterState, RateSource};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Value,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Value => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Parses a `#rrggbb` colour. Anything else leaves the terminal default.
pub fn hex_color(hex: &str) -> Color {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
    };
    match (hex.len(), hex.starts_with('#')) {
        (7, true) => match (channel(1..3), channel(3..5), channel(5..7)) {
            (Some(r), Some(g), Some(b)) => Color::Rgb { r, g, b },
            _ => Color::Reset,
        },
        _ => Color::Reset,
    }
}

/// Creates a spinner shown while the rate is looked up.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Both currency blocks: source above, target below, each with its rate line.
pub fn render_state(state: &ConverterState) -> String {
    let mode = state.display_mode();
    let accent = hex_color(mode.accent_color());
    let theme = hex_color(mode.theme_color());

    let mut table = new_styled_table();
    table.add_row(vec![
        Cell::new(state.source_currency())
            .add_attribute(Attribute::Bold)
            .fg(accent)
            .bg(theme),
        Cell::new(state.amount()).set_alignment(CellAlignment::Right),
        Cell::new(state.rate_info_text(true)).fg(accent),
    ]);
    table.add_row(vec![
        Cell::new(state.target_currency())
            .add_attribute(Attribute::Bold)
            .fg(accent)
            .bg(theme),
        Cell::new(state.convert())
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right),
        Cell::new(state.rate_info_text(false)).fg(accent),
    ]);

    table.to_string()
}

/// One line describing the rate in use and its origin.
pub fn rate_status(state: &ConverterState, source: Option<RateSource>) -> String {
    let rate = state.rate();
    match source {
        None => style_text("Fetching live rate...", StyleType::Subtle),
        Some(RateSource::Fallback) => style_text(
            &format!(
                "Could not fetch live rate, using {} {} per {}",
                to_fixed(rate.value(), 4),
                state.pair().quote,
                state.pair().base
            ),
            StyleType::Error,
        ),
        Some(source) => style_text(
            &format!(
                "Rate: {} ({}, as of {})",
                style_text(&to_fixed(rate.value(), 4), StyleType::Value),
                source,
                rate.fetched_at().format("%Y-%m-%d %H:%M UTC")
            ),
            StyleType::Subtle,
        ),
    }
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CurrencyPair, ExchangeRate};

    #[test]
    fn test_hex_color() {
        assert_eq!(
            hex_color("#ffc0cb"),
            Color::Rgb {
                r: 255,
                g: 192,
                b: 203
            }
        );
        assert_eq!(hex_color("#000000"), Color::Rgb { r: 0, g: 0, b: 0 });
        assert_eq!(hex_color("pink"), Color::Reset);
        assert_eq!(hex_color("#zzzzzz"), Color::Reset);
    }

    #[test]
    fn test_render_state_shows_both_blocks() {
        console::set_colors_enabled(false);
        let state = ConverterState::new(CurrencyPair::default(), ExchangeRate::default());
        let rendered = render_state(&state);
        assert!(rendered.contains("EUR"));
        assert!(rendered.contains("TRY"));
        assert!(rendered.contains("4800.00"));
        assert!(rendered.contains("1 EUR = 48.00 TRY"));
        assert!(rendered.contains("1 TRY = 0.0208 EUR"));
    }

    #[test]
    fn test_rate_status() {
        console::set_colors_enabled(false);
        let state = ConverterState::new(CurrencyPair::default(), ExchangeRate::default());
        assert!(rate_status(&state, None).contains("Fetching"));
        assert!(rate_status(&state, Some(RateSource::Fallback)).contains("48.0000 TRY per EUR"));
        assert!(rate_status(&state, Some(RateSource::Cached)).contains("cached"));
    }
}
