use crate::core::dates::format_date;
use crate::core::metadata::CurrencyInfo;
use crate::core::money::format_rate;
use crate::core::picker::PickerOption;
use crate::core::prefs::Theme;
use crate::core::view::{HistoryPanel, MSG_NO_DATA, Trend, TrendTag, View, ViewState};
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
    Warning,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Value => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Warning => style(text).yellow().bold(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

fn accent(theme: Theme) -> Color {
    match theme {
        Theme::Dark => Color::Yellow,
        Theme::Light => Color::Cyan,
    }
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

/// Creates a styled header cell, coloured for the active theme.
pub fn header_cell(text: &str, theme: Theme) -> Cell {
    Cell::new(text)
        .fg(accent(theme))
        .add_attribute(Attribute::Bold)
}

/// Trend column of a history row; rows without a tag stay empty.
pub fn trend_cell(tag: Option<TrendTag>) -> Cell {
    let Some(tag) = tag else {
        return Cell::new("");
    };
    let color = match tag.trend {
        Trend::Up => Color::Green,
        Trend::Down => Color::Red,
        Trend::Flat => Color::DarkGrey,
    };
    Cell::new(tag.to_string())
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

pub fn history_table(panel: &HistoryPanel, theme: Theme) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Okres", theme),
        header_cell("Data", theme),
        header_cell("Kurs", theme),
        header_cell("Zmiana", theme),
    ]);
    for row in &panel.rows {
        let rate = match row.rate {
            Some(rate) => Cell::new(format!("{} {}", format_rate(rate), row.currency))
                .set_alignment(CellAlignment::Right),
            None => Cell::new(MSG_NO_DATA)
                .fg(Color::DarkGrey)
                .set_alignment(CellAlignment::Right),
        };
        table.add_row(vec![
            Cell::new(row.label),
            Cell::new(format_date(row.date)),
            rate,
            trend_cell(row.trend),
        ]);
    }
    table
}

pub fn currency_table<'a>(
    entries: impl IntoIterator<Item = PickerOption<'a>>,
    theme: Theme,
) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("", theme),
        header_cell("Kod", theme),
        header_cell("Nazwa", theme),
        header_cell("Symbol", theme),
        header_cell("", theme),
    ]);
    for option in entries {
        let info: &CurrencyInfo = option.info;
        let marker = if option.selected {
            Cell::new("✓").fg(Color::Green)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            Cell::new(info.flag_emoji()),
            Cell::new(info.code).add_attribute(Attribute::Bold),
            Cell::new(info.name),
            Cell::new(info.display_symbol()),
            marker,
        ]);
    }
    table
}

/// Creates a spinner shown while a request is in flight.
pub fn new_spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Lines that describe how `current` differs from `previous`.
pub fn changed_lines(previous: &ViewState, current: &ViewState) -> Vec<String> {
    let mut lines = Vec::new();

    if current.theme != previous.theme {
        lines.push(style_text(
            &format!(
                "Motyw: {} {}",
                current.theme.as_str(),
                current.theme.toggle_icon()
            ),
            StyleType::Subtle,
        ));
    }
    if current.alert != previous.alert {
        if let Some(alert) = current.alert {
            lines.push(style_text(&format!("⚠ {alert}"), StyleType::Warning));
        }
    }
    if current.error_banner != previous.error_banner {
        if let Some(banner) = current.error_banner {
            lines.push(style_text(banner, StyleType::Error));
        }
    }
    if current.result.visible && current.result != previous.result {
        lines.push(style_text(&current.result.value, StyleType::Value));
        if !current.result.rate_info.is_empty() {
            lines.push(style_text(&current.result.rate_info, StyleType::Subtle));
        }
    }

    let panel = &current.history;
    if panel.visible && !panel.loading && (!previous.history.visible || *panel != previous.history)
    {
        lines.push(style_text(&panel.pair_label, StyleType::Title));
        match panel.error {
            Some(error) => lines.push(style_text(error, StyleType::Error)),
            None => lines.push(history_table(panel, current.theme).to_string()),
        }
    }
    lines
}

/// Everything currently visible, for a full redraw.
pub fn screen_lines(state: &ViewState) -> Vec<String> {
    let blank = ViewState {
        theme: state.theme,
        ..ViewState::default()
    };
    changed_lines(&blank, state)
}

/// Draws session changes to the terminal as they happen.
#[derive(Default)]
pub struct TerminalView {
    spinner: Option<ProgressBar>,
    last: Option<ViewState>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl View for TerminalView {
    fn render(&mut self, state: &ViewState) {
        let previous = self.last.take().unwrap_or_default();
        let lines = changed_lines(&previous, state);

        let message = if state.convert_button.loading {
            Some("Przeliczanie...")
        } else if state.history.loading {
            Some("Pobieranie historii...")
        } else {
            None
        };
        match (message, self.spinner.take()) {
            (Some(message), None) => self.spinner = Some(new_spinner(message)),
            (Some(_), Some(spinner)) => self.spinner = Some(spinner),
            (None, Some(spinner)) => spinner.finish_and_clear(),
            (None, None) => {}
        }

        let print = || {
            for line in &lines {
                println!("{line}");
            }
        };
        match &self.spinner {
            Some(spinner) => spinner.suspend(print),
            None => print(),
        }
        self.last = Some(state.clone());
    }
}
