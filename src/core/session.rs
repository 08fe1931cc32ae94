//! State of one converter screen and the actions that are not network bound.
//!
//! The conversion and history flows extend [`Session`] from their own
//! modules (`conversion`, `history`).

use super::currency::{CurrencyCode, Pair, RateProvider};
use super::dates;
use super::metadata::CurrencyTable;
use super::picker::{CurrencyPicker, PickerBoard, SelectionChanged, Side};
use super::prefs::{PreferenceStore, Theme};
use super::view::{View, ViewState};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, warn};

/// Most recently observed unit rate and the pair it belongs to.
///
/// A value of `0.0` means nothing has been observed yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentRate {
    pub value: f64,
    pub pair: Option<Pair>,
}

impl CurrentRate {
    pub const UNSET: CurrentRate = CurrentRate {
        value: 0.0,
        pair: None,
    };

    pub fn is_set(&self) -> bool {
        self.value != 0.0
    }

    /// Set and observed for exactly `pair`.
    pub fn is_fresh_for(&self, pair: Pair) -> bool {
        self.is_set() && self.pair == Some(pair)
    }
}

/// Monotonic request counters; an outcome is applied only while its ticket
/// still carries the latest number.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Generations {
    pub conversion: u64,
    pub history: u64,
}

pub struct Session {
    pub(crate) provider: Arc<dyn RateProvider>,
    pub(crate) prefs: Arc<dyn PreferenceStore>,
    pub(crate) currencies: CurrencyTable,
    pub(crate) view: Box<dyn View>,
    pub(crate) state: ViewState,
    pub(crate) pickers: PickerBoard,
    pub(crate) selection: Pair,
    pub(crate) amount: String,
    pub(crate) current_rate: CurrentRate,
    pub(crate) history_pair: Option<Pair>,
    pub(crate) generations: Generations,
    pub(crate) clock: fn() -> NaiveDate,
}

impl Session {
    pub fn new(
        provider: Arc<dyn RateProvider>,
        prefs: Arc<dyn PreferenceStore>,
        view: Box<dyn View>,
        pair: Pair,
    ) -> Self {
        let currencies = CurrencyTable::builtin();
        let mut pickers = PickerBoard::new();
        pickers.add(CurrencyPicker::build(
            Side::From,
            currencies.entries(),
            pair.from,
        ));
        pickers.add(CurrencyPicker::build(Side::To, currencies.entries(), pair.to));

        let state = ViewState {
            theme: Theme::restore(prefs.as_ref()),
            ..ViewState::default()
        };
        debug!(%pair, theme = state.theme.as_str(), "Session created");

        Session {
            provider,
            prefs,
            currencies,
            view,
            state,
            pickers,
            selection: pair,
            amount: String::new(),
            current_rate: CurrentRate::UNSET,
            history_pair: None,
            generations: Generations::default(),
            clock: dates::today,
        }
    }

    /// Replaces the source of "today" used for history lookbacks.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn pickers(&self) -> &PickerBoard {
        &self.pickers
    }

    pub fn pickers_mut(&mut self) -> &mut PickerBoard {
        &mut self.pickers
    }

    pub fn currencies(&self) -> &CurrencyTable {
        &self.currencies
    }

    pub fn current_rate(&self) -> CurrentRate {
        self.current_rate
    }

    /// Pair the history list was last fetched for.
    pub fn history_pair(&self) -> Option<Pair> {
        self.history_pair
    }

    pub fn pair(&self) -> Pair {
        self.selection
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn set_amount(&mut self, input: &str) {
        self.amount = input.to_string();
    }

    /// Draws the current state without changing it.
    pub fn render(&mut self) {
        self.view.render(&self.state);
    }

    pub(crate) fn clear_alert(&mut self) {
        self.state.alert = None;
    }

    pub fn toggle_picker(&mut self, side: Side) {
        self.clear_alert();
        self.pickers.toggle(side);
        self.render();
    }

    pub fn close_pickers(&mut self) {
        self.pickers.click_outside();
        self.render();
    }

    /// Picks `code` on `side`, resetting whatever depended on the old pair.
    pub fn select(&mut self, side: Side, code: CurrencyCode) -> Option<SelectionChanged> {
        self.clear_alert();
        let event = self.pickers.select(side, code)?;
        match side {
            Side::From => self.selection.from = event.current,
            Side::To => self.selection.to = event.current,
        }
        self.on_selection_changed(&event);
        Some(event)
    }

    fn on_selection_changed(&mut self, event: &SelectionChanged) {
        debug!(side = %event.side, previous = %event.previous, current = %event.current, "Selection changed");
        // An in-flight conversion would render a result for the old pair.
        self.generations.conversion += 1;
        self.state.result.visible = false;
        if self.state.history.visible {
            self.state.history.hide();
        }
        self.render();
    }

    /// Exchanges the two currencies and forgets the fetched history.
    pub fn swap(&mut self) {
        self.clear_alert();
        let pair = self.selection.swapped();
        self.selection = pair;
        self.pickers.refresh(Side::From, pair.from);
        self.pickers.refresh(Side::To, pair.to);

        self.generations.conversion += 1;
        self.generations.history += 1;
        self.state.result.visible = false;
        self.state.history.hide();
        self.history_pair = None;
        debug!(%pair, "Swapped currencies");
        self.render();
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.clear_alert();
        let theme = self.state.theme.toggled();
        self.state.theme = theme;
        if let Err(e) = theme.persist(self.prefs.as_ref()) {
            warn!(error = %e, "Failed to persist theme");
        }
        self.render();
        theme
    }
}
