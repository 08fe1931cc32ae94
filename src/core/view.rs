//! View model of the converter screen.
//!
//! Orchestrators only mutate [`ViewState`]; whatever draws the screen
//! implements [`View`] and receives the whole state on every change.

use super::currency::CurrencyCode;
use super::prefs::Theme;
use chrono::NaiveDate;
use std::fmt::Display;

pub const MSG_INVALID_AMOUNT: &str = "Podaj kwotę większą od zera";
pub const MSG_CONNECTION_ERROR: &str = "Błąd połączenia. Sprawdź internet lub spróbuj później.";
pub const MSG_SAME_CURRENCY: &str = "Wybierz dwie różne waluty.";
pub const MSG_HISTORY_ERROR: &str = "Błąd pobierania historii";
pub const MSG_NO_DATA: &str = "Brak danych";
pub const LABEL_SHOW_HISTORY: &str = "Pokaż historię ceny";
pub const LABEL_HIDE_HISTORY: &str = "Ukryj historię ceny";

pub trait View: Send {
    fn render(&mut self, state: &ViewState);
}

/// Discards every frame. Useful when only the final state matters.
pub struct NullView;

impl View for NullView {
    fn render(&mut self, _state: &ViewState) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertButton {
    pub enabled: bool,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultArea {
    pub visible: bool,
    pub value: String,
    pub rate_info: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

/// Trend marker of a history row; `percent` is relative to the current rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendTag {
    pub trend: Trend,
    pub percent: f64,
}

impl Display for TrendTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.trend {
            Trend::Up => write!(f, "▲ +{:.2}%", self.percent),
            Trend::Down => write!(f, "▼ {:.2}%", self.percent),
            Trend::Flat => f.write_str("0.00%"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub label: &'static str,
    pub date: NaiveDate,
    pub currency: CurrencyCode,
    pub rate: Option<f64>,
    pub trend: Option<TrendTag>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPanel {
    pub visible: bool,
    pub toggle_label: &'static str,
    pub pair_label: String,
    pub loading: bool,
    pub rows: Vec<HistoryRow>,
    pub error: Option<&'static str>,
}

impl HistoryPanel {
    pub fn hide(&mut self) {
        self.visible = false;
        self.toggle_label = LABEL_SHOW_HISTORY;
    }
}

impl Default for HistoryPanel {
    fn default() -> Self {
        HistoryPanel {
            visible: false,
            toggle_label: LABEL_SHOW_HISTORY,
            pair_label: String::new(),
            loading: false,
            rows: Vec::new(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub theme: Theme,
    pub convert_button: ConvertButton,
    pub result: ResultArea,
    pub error_banner: Option<&'static str>,
    /// Blocking notice; cleared by the next user action.
    pub alert: Option<&'static str>,
    pub history: HistoryPanel,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            theme: Theme::Light,
            convert_button: ConvertButton {
                enabled: true,
                loading: false,
            },
            result: ResultArea::default(),
            error_banner: None,
            alert: None,
            history: HistoryPanel::default(),
        }
    }
}
