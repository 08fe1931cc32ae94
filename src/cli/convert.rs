use crate::core::Session;
use crate::core::conversion::ConversionStatus;
use crate::core::view::{MSG_CONNECTION_ERROR, MSG_INVALID_AMOUNT};
use anyhow::{Result, bail};

/// Converts `amount` once; the session's view prints the result.
pub async fn run(session: &mut Session, amount: &str) -> Result<()> {
    session.set_amount(amount);
    match session.convert().await {
        ConversionStatus::Converted(_) => Ok(()),
        ConversionStatus::InvalidAmount => bail!("{}", MSG_INVALID_AMOUNT),
        ConversionStatus::Failed => bail!("{}", MSG_CONNECTION_ERROR),
        ConversionStatus::Busy | ConversionStatus::Discarded => {
            bail!("Conversion for {} did not complete", session.pair())
        }
    }
}
