use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::currency::{Pair, RateProvider};
use crate::core::dates::format_date;

/// Client for a Frankfurter-compatible rate API (`/latest`, `/{date}`).
pub struct FrankfurterProvider {
    base_url: String,
    client: reqwest::Client,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("kantor/0.1")
            .timeout(timeout)
            .build()?;
        Ok(FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn fetch_rate(&self, url: &str, pair: Pair) -> Result<f64> {
        debug!("Requesting rate from {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for currency pair: {}", e, pair))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for currency pair: {}",
                response.status(),
                pair
            ));
        }

        let text = response.text().await?;
        let data: RatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", pair, e))?;

        // Zero, negative or non-finite rates are as good as missing.
        data.rates
            .get(pair.to.as_str())
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .ok_or_else(|| anyhow!("No rate data found for currency pair: {}", pair))
    }
}

#[derive(Deserialize, Debug)]
struct RatesResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    #[instrument(name = "FrankfurterLatest", skip(self), fields(pair = %pair))]
    async fn latest(&self, pair: Pair, amount: Option<f64>) -> Result<f64> {
        let url = match amount {
            Some(amount) => format!(
                "{}/latest?amount={}&from={}&to={}",
                self.base_url, amount, pair.from, pair.to
            ),
            None => format!("{}/latest?from={}&to={}", self.base_url, pair.from, pair.to),
        };
        self.fetch_rate(&url, pair).await
    }

    #[instrument(name = "FrankfurterHistorical", skip(self), fields(pair = %pair, date = %date))]
    async fn historical(&self, pair: Pair, date: NaiveDate) -> Result<f64> {
        let url = format!(
            "{}/{}?from={}&to={}",
            self.base_url,
            format_date(date),
            pair.from,
            pair.to
        );
        self.fetch_rate(&url, pair).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn usd_pln() -> Pair {
        Pair::new("USD".parse().unwrap(), "PLN".parse().unwrap())
    }

    fn provider(server: &MockServer) -> FrankfurterProvider {
        FrankfurterProvider::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_latest_with_amount() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("amount", "100"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "PLN"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"amount":100.0,"base":"USD","rates":{"PLN":412.5}}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let converted = provider(&mock_server)
            .latest(usd_pln(), Some(100.0))
            .await
            .expect("Failed to get rate");
        assert_eq!(converted, 412.5);
    }

    #[tokio::test]
    async fn test_latest_without_amount() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param_is_missing("amount"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "PLN"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rates":{"PLN":4.01}}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let rate = provider(&mock_server).latest(usd_pln(), None).await.unwrap();
        assert_eq!(rate, 4.01);
    }

    #[tokio::test]
    async fn test_historical_uses_date_path() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2024-06-14"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "PLN"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"date":"2024-06-14","rates":{"PLN":4.0512}}"#),
            )
            .mount(&mock_server)
            .await;

        let date = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        let rate = provider(&mock_server)
            .historical(usd_pln(), date)
            .await
            .unwrap();
        assert_eq!(rate, 4.0512);
    }

    #[tokio::test]
    async fn test_missing_rate_is_an_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rates":{"EUR":0.9}}"#))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server).latest(usd_pln(), None).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No rate data found for currency pair: USD-PLN"
        );
    }

    #[tokio::test]
    async fn test_zero_rate_is_an_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2024-06-14"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rates":{"PLN":0}}"#))
            .mount(&mock_server)
            .await;

        let date = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        let result = provider(&mock_server).historical(usd_pln(), date).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No rate data found for currency pair: USD-PLN"
        );
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server).latest(usd_pln(), Some(1.0)).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 404 Not Found for currency pair: USD-PLN"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"rates":{"PLN":"four"}}"#),
            )
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server).latest(usd_pln(), None).await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for USD-PLN")
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let provider =
            FrankfurterProvider::new("http://localhost:1/", Duration::from_secs(1)).unwrap();
        assert_eq!(provider.base_url, "http://localhost:1");
    }
}
