use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use std::time::Duration;

/// Decimal places shown for rates in terminal tables.
pub const RATE_DISPLAY_DP: u32 = 6;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
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

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned rate, rounded for display only.
pub fn rate_cell(rate: Decimal) -> Cell {
    Cell::new(rate.round_dp(RATE_DISPLAY_DP).normalize().to_string())
        .set_alignment(CellAlignment::Right)
}

/// Highlights the row of the base currency itself.
pub fn currency_cell(code: &str, is_base: bool) -> Cell {
    if is_base {
        Cell::new(code)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new(code)
    }
}

/// Creates a spinner shown while the upstream document downloads.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
