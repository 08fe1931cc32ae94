//! The "show history" toggle and the six-period rate lookback.

use super::currency::{Pair, RateProvider};
use super::dates::{adjust_to_workday, format_date, shift_date};
use super::session::{CurrentRate, Session};
use super::view::{
    HistoryRow, LABEL_HIDE_HISTORY, MSG_HISTORY_ERROR, MSG_SAME_CURRENCY, Trend, TrendTag,
};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use futures::future::join_all;
use std::fmt::Display;
use tracing::{debug, info, instrument, warn};

/// Changes within this many percent count as unchanged.
pub const FLAT_BAND_PERCENT: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryPeriod {
    OneDay,
    OneWeek,
    OneMonth,
    SixMonths,
    OneYear,
    FiveYears,
}

impl HistoryPeriod {
    pub const ALL: [HistoryPeriod; 6] = [
        HistoryPeriod::OneDay,
        HistoryPeriod::OneWeek,
        HistoryPeriod::OneMonth,
        HistoryPeriod::SixMonths,
        HistoryPeriod::OneYear,
        HistoryPeriod::FiveYears,
    ];

    pub fn lookback_days(&self) -> i64 {
        match self {
            HistoryPeriod::OneDay => 1,
            HistoryPeriod::OneWeek => 7,
            HistoryPeriod::OneMonth => 30,
            HistoryPeriod::SixMonths => 180,
            HistoryPeriod::OneYear => 365,
            HistoryPeriod::FiveYears => 365 * 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HistoryPeriod::OneDay => "24 godziny temu",
            HistoryPeriod::OneWeek => "7 dni temu",
            HistoryPeriod::OneMonth => "30 dni temu",
            HistoryPeriod::SixMonths => "6 miesięcy temu",
            HistoryPeriod::OneYear => "1 rok temu",
            HistoryPeriod::FiveYears => "5 lat temu",
        }
    }
}

impl Display for HistoryPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One lookback request: the calendar date the period points at and the
/// business day actually asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedPeriod {
    pub period: HistoryPeriod,
    pub date: NaiveDate,
    pub business_date: NaiveDate,
}

pub fn plan_periods(today: NaiveDate) -> Result<Vec<PlannedPeriod>> {
    HistoryPeriod::ALL
        .iter()
        .map(|&period| {
            let date = shift_date(today, -period.lookback_days())
                .ok_or_else(|| anyhow!("Cannot go back {} from {}", period, today))?;
            Ok(PlannedPeriod {
                period,
                date,
                business_date: adjust_to_workday(date),
            })
        })
        .collect()
}

/// Classifies `historical` against `current`. `None` when there is no
/// baseline to compare with.
pub fn classify(historical: f64, current: f64) -> Option<TrendTag> {
    if current == 0.0 || !current.is_finite() {
        return None;
    }
    let percent = (historical - current) / current * 100.0;
    let trend = if percent > FLAT_BAND_PERCENT {
        Trend::Up
    } else if percent < -FLAT_BAND_PERCENT {
        Trend::Down
    } else {
        Trend::Flat
    };
    Some(TrendTag { trend, percent })
}

/// Rate fetched for one period, `None` when the API had nothing usable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodRate {
    pub planned: PlannedPeriod,
    pub rate: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct HistoryTicket {
    pub generation: u64,
    pub pair: Pair,
    pub today: NaiveDate,
    pub fetch_baseline: bool,
    pub fetch_rows: bool,
}

impl HistoryTicket {
    #[instrument(name = "History", skip(self, provider), fields(pair = %self.pair))]
    pub async fn run(self, provider: &dyn RateProvider) -> HistoryOutcome {
        let baseline = if self.fetch_baseline {
            match provider.latest(self.pair, None).await {
                Ok(rate) => Some(rate),
                Err(e) => {
                    warn!(error = %e, "Could not fetch the current rate for comparison");
                    None
                }
            }
        } else {
            None
        };

        let rows = if self.fetch_rows {
            Some(self.fetch_periods(provider).await)
        } else {
            None
        };

        HistoryOutcome {
            ticket: self,
            baseline,
            rows,
        }
    }

    async fn fetch_periods(&self, provider: &dyn RateProvider) -> Result<Vec<PeriodRate>> {
        let planned = plan_periods(self.today)?;
        let pair = self.pair;
        let requests = planned.into_iter().map(|planned| async move {
            let rate = match provider.historical(pair, planned.business_date).await {
                Ok(rate) => Some(rate),
                Err(e) => {
                    debug!(
                        period = %planned.period,
                        date = %format_date(planned.business_date),
                        error = %e,
                        "No historical rate"
                    );
                    None
                }
            };
            PeriodRate { planned, rate }
        });
        // join_all keeps input order, so rows stay in period order.
        Ok(join_all(requests).await)
    }
}

pub struct HistoryOutcome {
    pub ticket: HistoryTicket,
    pub baseline: Option<f64>,
    pub rows: Option<Result<Vec<PeriodRate>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryToggle {
    /// Both sides hold the same currency.
    Refused,
    Hidden,
    /// Re-opened on the pair already fetched, nothing requested.
    Shown,
    Fetched,
    /// Superseded by a newer toggle or a swap before the data arrived.
    Discarded,
}

pub enum HistoryStep {
    Done(HistoryToggle),
    Fetch(HistoryTicket),
}

impl Session {
    /// Flips the history panel and decides what has to be fetched.
    pub fn begin_history(&mut self) -> HistoryStep {
        self.clear_alert();
        let pair = self.pair();

        if pair.is_identity() {
            self.state.alert = Some(MSG_SAME_CURRENCY);
            self.render();
            return HistoryStep::Done(HistoryToggle::Refused);
        }

        let panel = &mut self.state.history;
        if panel.visible && self.history_pair == Some(pair) {
            panel.hide();
            self.render();
            return HistoryStep::Done(HistoryToggle::Hidden);
        }

        panel.visible = true;
        panel.toggle_label = LABEL_HIDE_HISTORY;
        panel.pair_label = pair.arrow_label();

        let fetch_baseline = !self.current_rate.is_fresh_for(pair);
        // Rows still loading belong to a ticket this request supersedes.
        let fetch_rows = self.history_pair != Some(pair) || panel.loading;
        if fetch_rows {
            self.history_pair = Some(pair);
            panel.rows.clear();
            panel.error = None;
            panel.loading = true;
        }
        self.render();

        if !fetch_baseline && !fetch_rows {
            return HistoryStep::Done(HistoryToggle::Shown);
        }

        self.generations.history += 1;
        debug!(%pair, fetch_baseline, fetch_rows, "History requested");
        HistoryStep::Fetch(HistoryTicket {
            generation: self.generations.history,
            pair,
            today: (self.clock)(),
            fetch_baseline,
            fetch_rows,
        })
    }

    /// Applies fetched history unless a newer request has taken over.
    pub fn finish_history(&mut self, outcome: HistoryOutcome) -> HistoryToggle {
        let ticket = &outcome.ticket;
        if ticket.generation != self.generations.history {
            debug!(
                pair = %ticket.pair,
                generation = ticket.generation,
                current = self.generations.history,
                "Discarding stale history"
            );
            return HistoryToggle::Discarded;
        }

        if let Some(rate) = outcome.baseline {
            self.current_rate = CurrentRate {
                value: rate,
                pair: Some(ticket.pair),
            };
        }

        if let Some(rows) = outcome.rows {
            let panel = &mut self.state.history;
            panel.loading = false;
            match rows {
                Ok(rates) => {
                    // A baseline for another pair would give meaningless percentages.
                    let current = if self.current_rate.pair == Some(ticket.pair) {
                        self.current_rate.value
                    } else {
                        0.0
                    };
                    panel.rows = rates
                        .into_iter()
                        .map(|r| HistoryRow {
                            label: r.planned.period.label(),
                            date: r.planned.date,
                            currency: ticket.pair.to,
                            rate: r.rate,
                            trend: r.rate.and_then(|rate| classify(rate, current)),
                        })
                        .collect();
                    info!(pair = %ticket.pair, rows = panel.rows.len(), "History loaded");
                }
                Err(e) => {
                    warn!(error = %e, pair = %ticket.pair, "History batch failed");
                    panel.rows.clear();
                    panel.error = Some(MSG_HISTORY_ERROR);
                }
            }
        }

        self.render();
        HistoryToggle::Fetched
    }

    pub async fn toggle_history(&mut self) -> HistoryToggle {
        match self.begin_history() {
            HistoryStep::Done(toggle) => toggle,
            HistoryStep::Fetch(ticket) => {
                let outcome = ticket.run(self.provider.as_ref()).await;
                self.finish_history(outcome)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::picker::Side;
    use crate::core::session::test_support::*;
    use crate::core::view::LABEL_SHOW_HISTORY;
    use std::sync::Arc;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_plan_periods_from_monday() {
        let planned = plan_periods(fixed_today()).unwrap();
        let periods: Vec<_> = planned.iter().map(|p| p.period).collect();
        assert_eq!(periods, HistoryPeriod::ALL.to_vec());

        // 2024-06-16 is a Sunday
        assert_eq!(planned[0].date, day(2024, 6, 16));
        assert_eq!(planned[0].business_date, day(2024, 6, 14));
        assert_eq!(planned[1].date, day(2024, 6, 10));
        assert_eq!(planned[1].business_date, day(2024, 6, 10));
        assert_eq!(planned[2].date, day(2024, 5, 18));
        assert_eq!(planned[2].business_date, day(2024, 5, 17));
        assert_eq!(planned[3].date, day(2023, 12, 20));
        assert_eq!(planned[4].date, day(2023, 6, 18));
        assert_eq!(planned[4].business_date, day(2023, 6, 16));
        assert_eq!(planned[5].date, day(2019, 6, 19));
    }

    #[test]
    fn test_plan_periods_fails_before_calendar_start() {
        assert!(plan_periods(NaiveDate::MIN).is_err());
    }

    #[test]
    fn test_classify_dead_band() {
        let equal = classify(4.0, 4.0).unwrap();
        assert_eq!(equal.trend, Trend::Flat);
        assert_eq!(equal.to_string(), "0.00%");

        // +0.0005% and +0.002%
        assert_eq!(classify(100.0005, 100.0).unwrap().trend, Trend::Flat);
        assert_eq!(classify(100.002, 100.0).unwrap().trend, Trend::Up);
        assert_eq!(classify(99.998, 100.0).unwrap().trend, Trend::Down);

        let up = classify(4.4, 4.0).unwrap();
        assert_eq!(up.to_string(), "▲ +10.00%");
        let down = classify(3.0, 4.0).unwrap();
        assert_eq!(down.to_string(), "▼ -25.00%");

        assert_eq!(classify(4.0, 0.0), None);
    }

    fn rates_with_history() -> MockRates {
        let planned = plan_periods(fixed_today()).unwrap();
        let mut rates = MockRates::default().with_latest("USD-PLN", 4.0);
        let values = [4.0, 4.4, 3.6, 4.00001];
        for (p, value) in planned.iter().zip(values) {
            rates = rates.with_historical("USD-PLN", p.business_date, value);
        }
        rates
    }

    #[tokio::test]
    async fn test_history_rows_in_period_order_with_trends() {
        let rates = Arc::new(rates_with_history());
        let (mut session, view) = session(rates.clone());

        assert_eq!(session.toggle_history().await, HistoryToggle::Fetched);
        assert_eq!(rates.latest_calls(), 1);
        assert_eq!(rates.historical_calls(), 6);

        let panel = &session.state().history;
        assert!(panel.visible);
        assert!(!panel.loading);
        assert_eq!(panel.toggle_label, LABEL_HIDE_HISTORY);
        assert_eq!(panel.pair_label, "USD ➝ PLN");
        assert_eq!(panel.rows.len(), 6);

        let labels: Vec<_> = panel.rows.iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            vec![
                "24 godziny temu",
                "7 dni temu",
                "30 dni temu",
                "6 miesięcy temu",
                "1 rok temu",
                "5 lat temu"
            ]
        );
        assert_eq!(panel.rows[0].trend.unwrap().trend, Trend::Flat);
        assert_eq!(panel.rows[1].trend.unwrap().trend, Trend::Up);
        assert_eq!(panel.rows[2].trend.unwrap().trend, Trend::Down);
        assert_eq!(panel.rows[3].trend.unwrap().trend, Trend::Flat);
        // Missing data is isolated to its row.
        assert_eq!(panel.rows[4].rate, None);
        assert_eq!(panel.rows[4].trend, None);
        assert_eq!(panel.rows[5].rate, None);
        assert_eq!(session.history_pair(), Some(pair("USD", "PLN")));
        assert!(session.current_rate().is_fresh_for(pair("USD", "PLN")));

        let frames = view.frames.lock().unwrap();
        assert!(frames[0].history.loading);
        assert!(frames[0].history.rows.is_empty());
    }

    #[tokio::test]
    async fn test_same_currency_is_refused() {
        let rates = Arc::new(MockRates::default());
        let (mut session, _) = session(rates.clone());
        session.select(Side::To, code("USD"));

        assert_eq!(session.toggle_history().await, HistoryToggle::Refused);
        assert_eq!(session.state().alert, Some(MSG_SAME_CURRENCY));
        assert!(!session.state().history.visible);
        assert_eq!(rates.latest_calls() + rates.historical_calls(), 0);

        // Next action clears the alert.
        session.swap();
        assert_eq!(session.state().alert, None);
    }

    #[tokio::test]
    async fn test_retoggle_same_pair_does_not_refetch() {
        let rates = Arc::new(rates_with_history());
        let (mut session, _) = session(rates.clone());

        assert_eq!(session.toggle_history().await, HistoryToggle::Fetched);
        assert_eq!(session.toggle_history().await, HistoryToggle::Hidden);
        assert!(!session.state().history.visible);
        assert_eq!(session.state().history.toggle_label, LABEL_SHOW_HISTORY);

        assert_eq!(session.toggle_history().await, HistoryToggle::Shown);
        assert!(session.state().history.visible);
        assert_eq!(session.state().history.rows.len(), 6);
        assert_eq!(rates.historical_calls(), 6);
        assert_eq!(rates.latest_calls(), 1);
    }

    #[tokio::test]
    async fn test_changed_pair_refetches() {
        let rates = Arc::new(rates_with_history().with_latest("USD-EUR", 0.9));
        let (mut session, _) = session(rates.clone());

        session.toggle_history().await;
        session.select(Side::To, code("EUR"));
        assert!(!session.state().history.visible);

        assert_eq!(session.toggle_history().await, HistoryToggle::Fetched);
        assert_eq!(rates.historical_calls(), 12);
        assert_eq!(session.state().history.pair_label, "USD ➝ EUR");
        assert_eq!(session.history_pair(), Some(pair("USD", "EUR")));
        // No EUR history in the mock: every row is empty, none fails the batch.
        assert!(session.state().history.rows.iter().all(|r| r.rate.is_none()));
        assert_eq!(session.state().history.error, None);
    }

    #[tokio::test]
    async fn test_fresh_conversion_rate_skips_baseline_request() {
        let rates = Arc::new(rates_with_history());
        let (mut session, _) = session(rates.clone());
        session.set_amount("100");
        session.convert().await;
        assert_eq!(rates.latest_calls(), 1);

        session.toggle_history().await;
        assert_eq!(rates.latest_calls(), 1);
        assert_eq!(rates.historical_calls(), 6);
    }

    #[tokio::test]
    async fn test_baseline_failure_is_swallowed() {
        let planned = plan_periods(fixed_today()).unwrap();
        let rates = Arc::new(MockRates::default().with_historical(
            "USD-PLN",
            planned[0].business_date,
            4.0,
        ));
        let (mut session, _) = session(rates.clone());

        assert_eq!(session.toggle_history().await, HistoryToggle::Fetched);
        assert!(!session.current_rate().is_set());
        let first = &session.state().history.rows[0];
        assert_eq!(first.rate, Some(4.0));
        assert_eq!(first.trend, None);
    }

    #[tokio::test]
    async fn test_stale_history_is_discarded() {
        let rates = Arc::new(rates_with_history().with_latest("USD-EUR", 0.9));
        let (mut session, _) = session(rates.clone());

        let HistoryStep::Fetch(first) = session.begin_history() else {
            panic!("expected a ticket");
        };
        session.select(Side::To, code("EUR"));
        let HistoryStep::Fetch(second) = session.begin_history() else {
            panic!("expected a ticket");
        };

        let newer = second.run(rates.as_ref()).await;
        assert_eq!(session.finish_history(newer), HistoryToggle::Fetched);
        let older = first.run(rates.as_ref()).await;
        assert_eq!(session.finish_history(older), HistoryToggle::Discarded);

        assert_eq!(session.state().history.pair_label, "USD ➝ EUR");
        assert!(session.current_rate().is_fresh_for(pair("USD", "EUR")));
        assert!(
            session
                .state()
                .history
                .rows
                .iter()
                .all(|r| r.currency == code("EUR"))
        );
    }

    #[tokio::test]
    async fn test_reopening_while_loading_refetches_rows() {
        let rates = Arc::new(rates_with_history());
        let (mut session, _) = session(rates.clone());

        let HistoryStep::Fetch(first) = session.begin_history() else {
            panic!("expected a ticket");
        };
        assert!(matches!(
            session.begin_history(),
            HistoryStep::Done(HistoryToggle::Hidden)
        ));
        let HistoryStep::Fetch(second) = session.begin_history() else {
            panic!("expected a ticket");
        };
        assert!(second.fetch_rows);
        assert!(second.fetch_baseline);

        let older = first.run(rates.as_ref()).await;
        assert_eq!(session.finish_history(older), HistoryToggle::Discarded);
        let newer = second.run(rates.as_ref()).await;
        assert_eq!(session.finish_history(newer), HistoryToggle::Fetched);

        let panel = &session.state().history;
        assert!(panel.visible);
        assert!(!panel.loading);
        assert_eq!(panel.rows.len(), 6);
        assert_eq!(panel.rows.iter().filter(|r| r.rate.is_some()).count(), 4);
    }

    #[tokio::test]
    async fn test_swap_discards_in_flight_history() {
        let rates = Arc::new(rates_with_history());
        let (mut session, _) = session(rates.clone());

        let HistoryStep::Fetch(ticket) = session.begin_history() else {
            panic!("expected a ticket");
        };
        session.swap();
        let outcome = ticket.run(rates.as_ref()).await;
        assert_eq!(session.finish_history(outcome), HistoryToggle::Discarded);
        assert!(!session.current_rate().is_set());
        assert!(session.history_pair().is_none());
    }

    #[tokio::test]
    async fn test_batch_failure_shows_single_error_row() {
        let rates = Arc::new(MockRates::default().with_latest("USD-PLN", 4.0));
        let (mut session, _) = session(rates.clone());
        let HistoryStep::Fetch(ticket) = session.begin_history() else {
            panic!("expected a ticket");
        };
        let ticket = HistoryTicket {
            today: NaiveDate::MIN,
            ..ticket
        };

        let outcome = ticket.run(rates.as_ref()).await;
        assert_eq!(session.finish_history(outcome), HistoryToggle::Fetched);
        let panel = &session.state().history;
        assert!(!panel.loading);
        assert!(panel.rows.is_empty());
        assert_eq!(panel.error, Some(MSG_HISTORY_ERROR));
        assert_eq!(rates.historical_calls(), 0);
    }
}
