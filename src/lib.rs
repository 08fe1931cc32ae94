pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

pub use crate::core::config;

use crate::core::config::AppConfig;
use crate::core::metadata::CurrencyTable;
use crate::core::{Pair, Session, View};
use anyhow::{Result, bail};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    Currencies,
    Convert {
        amount: Option<String>,
        from: Option<String>,
        to: Option<String>,
    },
    History {
        from: Option<String>,
        to: Option<String>,
    },
    Interactive,
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    }
}

/// Pair from the command line, falling back to the configured defaults.
/// Codes outside the currency table are rejected.
pub fn resolve_pair(config: &AppConfig, from: Option<&str>, to: Option<&str>) -> Result<Pair> {
    let table = CurrencyTable::builtin();
    let defaults = config.defaults.pair();
    let from = match from {
        Some(code) => table.lookup(code)?.code,
        None => defaults.from,
    };
    let to = match to {
        Some(code) => table.lookup(code)?.code,
        None => defaults.to,
    };
    Ok(Pair::new(from, to))
}

pub fn build_session(config: &AppConfig, pair: Pair, view: Box<dyn View>) -> Result<Session> {
    let provider = providers::FrankfurterProvider::new(
        &config.provider.base_url,
        Duration::from_secs(config.provider.timeout_secs),
    )?;
    let prefs = store::open_preferences(&config.data_path()?);
    Ok(Session::new(Arc::new(provider), prefs, view, pair))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Kantor starting...");

    let config = load_config(config_path)?;
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Currencies => {
            let pair = config.defaults.pair();
            let prefs = store::open_preferences(&config.data_path()?);
            let theme = crate::core::Theme::restore(prefs.as_ref());
            cli::currencies::run(&CurrencyTable::builtin(), &[pair.from, pair.to], theme);
            Ok(())
        }
        AppCommand::Convert { amount, from, to } => {
            let amount = match (amount, config.defaults.amount) {
                (Some(amount), _) => amount,
                (None, Some(amount)) => amount.to_string(),
                (None, None) => bail!("No amount given and no default amount configured"),
            };
            let pair = resolve_pair(&config, from.as_deref(), to.as_deref())?;
            let mut session = build_session(&config, pair, Box::new(cli::ui::TerminalView::new()))?;
            cli::convert::run(&mut session, &amount).await
        }
        AppCommand::History { from, to } => {
            let pair = resolve_pair(&config, from.as_deref(), to.as_deref())?;
            let mut session = build_session(&config, pair, Box::new(cli::ui::TerminalView::new()))?;
            cli::history::run(&mut session).await
        }
        AppCommand::Interactive => {
            let pair = config.defaults.pair();
            let mut session = build_session(&config, pair, Box::new(cli::ui::TerminalView::new()))?;
            if let Some(amount) = config.defaults.amount {
                session.set_amount(&amount.to_string());
            }
            cli::interactive::run(&mut session).await
        }
    }
}
