// Conversion of foreign salaries into the base currency (RUB)
use crate::model::CurrencyError;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

#[async_trait::async_trait]
pub trait CurrencyRates: Send + Sync {
    /// Multiplier turning an amount in `code` into base currency units.
    async fn rate_to_base(&self, code: &str) -> Result<f64, CurrencyError>;
}

/// Base currency aliases that need no conversion.
#[derive(Debug, Clone)]
pub struct BaseCurrency {
    aliases: Vec<String>,
}

impl BaseCurrency {
    pub fn new(aliases: &[String]) -> Self {
        Self {
            aliases: aliases.iter().map(|a| a.to_uppercase()).collect(),
        }
    }

    pub fn is_base(&self, code: &str) -> bool {
        self.aliases.iter().any(|a| a.eq_ignore_ascii_case(code))
    }
}

#[derive(Debug, Deserialize)]
struct DailyRates {
    #[serde(rename = "Valute")]
    valute: HashMap<String, Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(rename = "Nominal")]
    nominal: f64,
    #[serde(rename = "Value")]
    value: f64,
}

/// Rates from the Central Bank of Russia daily feed.
pub struct CbrRates {
    client: Client,
    url: String,
}

impl CbrRates {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

fn rate_from_feed(feed: &DailyRates, code: &str) -> Result<f64, CurrencyError> {
    let quote = feed
        .valute
        .get(&code.to_uppercase())
        .ok_or_else(|| CurrencyError::UnknownCurrency(code.to_string()))?;

    let rate = quote.value / quote.nominal;
    if !rate.is_finite() || rate <= 0.0 {
        return Err(CurrencyError::InvalidRate {
            code: code.to_string(),
            rate,
        });
    }
    Ok(rate)
}

#[async_trait::async_trait]
impl CurrencyRates for CbrRates {
    async fn rate_to_base(&self, code: &str) -> Result<f64, CurrencyError> {
        let feed: DailyRates = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        rate_from_feed(&feed, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed() -> DailyRates {
        serde_json::from_str(
            r#"{
                "Date": "2024-03-01T11:30:00+03:00",
                "Valute": {
                    "USD": { "CharCode": "USD", "Nominal": 1, "Value": 91.5 },
                    "KZT": { "CharCode": "KZT", "Nominal": 100, "Value": 20.0 },
                    "XXX": { "CharCode": "XXX", "Nominal": 0, "Value": 1.0 }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn rate_accounts_for_nominal() {
        let feed = feed();
        assert_eq!(rate_from_feed(&feed, "usd").unwrap(), 91.5);
        assert!((rate_from_feed(&feed, "KZT").unwrap() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn unknown_and_broken_rates_are_errors() {
        let feed = feed();
        assert!(matches!(
            rate_from_feed(&feed, "EUR"),
            Err(CurrencyError::UnknownCurrency(code)) if code == "EUR"
        ));
        assert!(matches!(
            rate_from_feed(&feed, "XXX"),
            Err(CurrencyError::InvalidRate { .. })
        ));
    }

    #[test]
    fn base_aliases_match_case_insensitively() {
        let base = BaseCurrency::new(&["RUR".to_string(), "rub".to_string()]);
        assert!(base.is_base("RUR"));
        assert!(base.is_base("rub"));
        assert!(!base.is_base("USD"));
    }
}
