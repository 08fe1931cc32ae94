//! Searchable currency dropdowns.
//!
//! A [`CurrencyPicker`] owns the selected code for one side of the pair and
//! the open/closed state of its option panel. [`PickerBoard`] groups the
//! pickers of a screen so that at most one panel is open at a time.

use super::currency::CurrencyCode;
use super::metadata::CurrencyInfo;
use std::cmp::Ordering;
use std::fmt::Display;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    From,
    To,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Side::From => "from",
            Side::To => "to",
        })
    }
}

/// Emitted whenever the user picks an option.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChanged {
    pub side: Side,
    pub previous: CurrencyCode,
    pub current: CurrencyCode,
}

/// One row of an option panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerOption<'a> {
    pub info: &'a CurrencyInfo,
    pub selected: bool,
}

pub struct CurrencyPicker {
    side: Side,
    entries: Vec<CurrencyInfo>,
    value: CurrencyCode,
    trigger: String,
    open: bool,
}

impl CurrencyPicker {
    /// Builds a picker over `entries`, sorted by display name.
    pub fn build(side: Side, entries: &[CurrencyInfo], value: CurrencyCode) -> Self {
        let mut entries = entries.to_vec();
        entries.sort_by(|a, b| compare_names(a.name, b.name));
        let mut picker = CurrencyPicker {
            side,
            entries,
            value,
            trigger: String::new(),
            open: false,
        };
        picker.render_trigger();
        picker
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn value(&self) -> CurrencyCode {
        self.value
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Text of the collapsed control, e.g. `🇺🇸 USD - Dolar amerykański`.
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    pub fn options(&self) -> impl Iterator<Item = PickerOption<'_>> {
        self.entries.iter().map(|info| PickerOption {
            info,
            selected: info.code == self.value,
        })
    }

    /// Options whose code or name contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<PickerOption<'_>> {
        let query = query.trim().to_lowercase();
        self.options()
            .filter(|opt| {
                query.is_empty()
                    || opt.info.code.as_str().to_lowercase().contains(&query)
                    || opt.info.name.to_lowercase().contains(&query)
            })
            .collect()
    }

    fn contains(&self, code: CurrencyCode) -> bool {
        self.entries.iter().any(|info| info.code == code)
    }

    fn render_trigger(&mut self) {
        self.trigger = match self.entries.iter().find(|info| info.code == self.value) {
            Some(info) => format!("{} {} - {}", info.flag_emoji(), info.code, info.name),
            None => self.value.to_string(),
        };
    }

    fn set_value(&mut self, code: CurrencyCode) {
        self.value = code;
        self.render_trigger();
    }
}

type Listener = Box<dyn Fn(&SelectionChanged) + Send + Sync>;

/// All pickers on a screen.
#[derive(Default)]
pub struct PickerBoard {
    pickers: Vec<CurrencyPicker>,
    listeners: Vec<Listener>,
}

impl PickerBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, picker: CurrencyPicker) {
        self.pickers.retain(|p| p.side != picker.side);
        self.pickers.push(picker);
    }

    pub fn subscribe(&mut self, listener: impl Fn(&SelectionChanged) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn get(&self, side: Side) -> Option<&CurrencyPicker> {
        self.pickers.iter().find(|p| p.side == side)
    }

    fn get_mut(&mut self, side: Side) -> Option<&mut CurrencyPicker> {
        self.pickers.iter_mut().find(|p| p.side == side)
    }

    pub fn value(&self, side: Side) -> Option<CurrencyCode> {
        self.get(side).map(CurrencyPicker::value)
    }

    pub fn open_side(&self) -> Option<Side> {
        self.pickers.iter().find(|p| p.open).map(|p| p.side)
    }

    /// Click on a trigger: closes every other panel and flips this one.
    pub fn toggle(&mut self, side: Side) {
        for picker in &mut self.pickers {
            if picker.side == side {
                picker.open = !picker.open;
            } else {
                picker.open = false;
            }
        }
    }

    /// Click anywhere outside a picker.
    pub fn click_outside(&mut self) {
        for picker in &mut self.pickers {
            picker.open = false;
        }
    }

    /// Click on an option. Returns `None` and leaves everything untouched if
    /// `code` is not one of the picker's entries.
    pub fn select(&mut self, side: Side, code: CurrencyCode) -> Option<SelectionChanged> {
        let picker = self.get_mut(side)?;
        if !picker.contains(code) {
            debug!(%side, %code, "Ignoring selection of unknown currency");
            return None;
        }
        let previous = picker.value;
        picker.set_value(code);
        picker.open = false;

        let event = SelectionChanged {
            side,
            previous,
            current: code,
        };
        for listener in &self.listeners {
            listener(&event);
        }
        Some(event)
    }

    /// Forces `side` to show `code` without notifying listeners. Missing
    /// pickers are ignored.
    pub fn refresh(&mut self, side: Side, code: CurrencyCode) {
        if let Some(picker) = self.get_mut(side) {
            picker.set_value(code);
        }
    }
}

/// Polish alphabetical order: accented letters sort right after their base
/// letter (a < ą < b, l < ł < m, z < ź < ż), case is ignored.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let key = |s: &str| -> Vec<(char, u8)> {
        s.chars()
            .flat_map(char::to_lowercase)
            .map(|c| match c {
                'ą' => ('a', 1),
                'ć' => ('c', 1),
                'ę' => ('e', 1),
                'ł' => ('l', 1),
                'ń' => ('n', 1),
                'ó' => ('o', 1),
                'ś' => ('s', 1),
                'ź' => ('z', 1),
                'ż' => ('z', 2),
                c => (c, 0),
            })
            .collect()
    };
    key(a).cmp(&key(b))
}
