use crate::core::Session;
use crate::core::history::HistoryToggle;
use crate::core::view::MSG_SAME_CURRENCY;
use anyhow::{Result, bail};

/// Shows the rate history of the selected pair once.
pub async fn run(session: &mut Session) -> Result<()> {
    match session.toggle_history().await {
        HistoryToggle::Refused => bail!("{}", MSG_SAME_CURRENCY),
        HistoryToggle::Fetched | HistoryToggle::Shown => match session.state().history.error {
            Some(error) => bail!("{}", error),
            None => Ok(()),
        },
        HistoryToggle::Hidden | HistoryToggle::Discarded => {
            bail!("History for {} was not shown", session.pair())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::picker::Side;
    use crate::core::session::test_support::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_history_once() {
        let rates = Arc::new(MockRates::default().with_latest("USD-PLN", 4.0));
        let (mut session, _) = session(rates.clone());

        run(&mut session).await.unwrap();
        let panel = &session.state().history;
        assert!(panel.visible);
        assert_eq!(panel.rows.len(), 6);
        assert_eq!(rates.historical_calls(), 6);
    }

    #[tokio::test]
    async fn test_same_currency_is_refused() {
        let rates = Arc::new(MockRates::default());
        let (mut session, _) = session(rates);
        session.select(Side::From, code("PLN"));

        let err = run(&mut session).await.unwrap_err();
        assert_eq!(err.to_string(), MSG_SAME_CURRENCY);
    }
}
