//! The "convert" action.

use super::currency::{Pair, RateProvider};
use super::money::{format_money, format_rate};
use super::session::{CurrentRate, Session};
use super::view::{MSG_CONNECTION_ERROR, MSG_INVALID_AMOUNT, ResultArea};
use anyhow::Result;
use tracing::{debug, error, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionResult {
    /// Converted amount, in `pair.to`.
    pub amount: f64,
    pub rate: f64,
    pub pair: Pair,
}

/// Parses the amount field. Accepts a decimal comma; anything that is not a
/// finite number above zero is rejected.
pub fn parse_amount(input: &str) -> Option<f64> {
    let normalized = input.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount > 0.0)
}

/// A conversion that passed validation and now waits for its rate.
#[derive(Debug, Clone)]
pub struct ConversionTicket {
    pub generation: u64,
    pub pair: Pair,
    pub amount: f64,
}

impl ConversionTicket {
    #[instrument(name = "Convert", skip(self, provider), fields(pair = %self.pair, amount = self.amount))]
    pub async fn run(self, provider: &dyn RateProvider) -> ConversionOutcome {
        let result = self.resolve(provider).await;
        ConversionOutcome {
            ticket: self,
            result,
        }
    }

    async fn resolve(&self, provider: &dyn RateProvider) -> Result<ConversionResult> {
        if self.pair.is_identity() {
            return Ok(ConversionResult {
                amount: self.amount,
                rate: 1.0,
                pair: self.pair,
            });
        }
        let converted = provider.latest(self.pair, Some(self.amount)).await?;
        Ok(ConversionResult {
            amount: converted,
            rate: converted / self.amount,
            pair: self.pair,
        })
    }
}

pub struct ConversionOutcome {
    pub ticket: ConversionTicket,
    pub result: Result<ConversionResult>,
}

pub enum ConversionStep {
    Done(ConversionStatus),
    Fetch(ConversionTicket),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionStatus {
    InvalidAmount,
    /// A conversion is already running; the button is disabled.
    Busy,
    Converted(ConversionResult),
    Failed,
    /// The selection changed while the rate was in flight.
    Discarded,
}

impl Session {
    /// Validates the amount and enters the loading state.
    pub fn begin_conversion(&mut self) -> ConversionStep {
        self.clear_alert();
        if self.state.convert_button.loading {
            return ConversionStep::Done(ConversionStatus::Busy);
        }

        let Some(amount) = parse_amount(&self.amount) else {
            debug!(input = %self.amount, "Rejected amount");
            self.state.result = ResultArea {
                visible: true,
                value: MSG_INVALID_AMOUNT.to_string(),
                rate_info: String::new(),
            };
            self.render();
            return ConversionStep::Done(ConversionStatus::InvalidAmount);
        };

        let pair = self.pair();
        self.state.convert_button.enabled = false;
        self.state.convert_button.loading = true;
        self.state.error_banner = None;
        self.state.result.visible = false;

        if self.state.history.visible && self.history_pair != Some(pair) {
            self.state.history.hide();
        }

        self.generations.conversion += 1;
        self.render();
        ConversionStep::Fetch(ConversionTicket {
            generation: self.generations.conversion,
            pair,
            amount,
        })
    }

    /// Applies a finished conversion and always leaves the loading state.
    pub fn finish_conversion(&mut self, outcome: ConversionOutcome) -> ConversionStatus {
        self.state.convert_button.enabled = true;
        self.state.convert_button.loading = false;

        let status = if outcome.ticket.generation != self.generations.conversion {
            debug!(
                generation = outcome.ticket.generation,
                current = self.generations.conversion,
                "Discarding stale conversion"
            );
            ConversionStatus::Discarded
        } else {
            match outcome.result {
                Ok(result) => {
                    info!(pair = %result.pair, rate = result.rate, "Converted");
                    self.current_rate = CurrentRate {
                        value: result.rate,
                        pair: Some(result.pair),
                    };
                    self.state.result = self.result_area(&result);
                    ConversionStatus::Converted(result)
                }
                Err(e) => {
                    error!(error = %e, pair = %outcome.ticket.pair, "Conversion failed");
                    self.state.error_banner = Some(MSG_CONNECTION_ERROR);
                    ConversionStatus::Failed
                }
            }
        };

        self.render();
        status
    }

    /// Runs the whole conversion for the current amount and pair.
    pub async fn convert(&mut self) -> ConversionStatus {
        match self.begin_conversion() {
            ConversionStep::Done(status) => status,
            ConversionStep::Fetch(ticket) => {
                let outcome = ticket.run(self.provider.as_ref()).await;
                self.finish_conversion(outcome)
            }
        }
    }

    fn result_area(&self, result: &ConversionResult) -> ResultArea {
        let value = match self.currencies.get(result.pair.to) {
            Some(info) => format_money(result.amount, info),
            None => format!("{:.2} {}", result.amount, result.pair.to),
        };
        ResultArea {
            visible: true,
            value,
            rate_info: format!(
                "Kurs: 1 {} = {} {}",
                result.pair.from,
                format_rate(result.rate),
                result.pair.to
            ),
        }
    }
}
