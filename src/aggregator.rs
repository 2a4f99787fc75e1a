use crate::currency::{BaseCurrency, CurrencyRates};
use crate::model::{AggregateError, PendingVacancy, RawRecord, Vacancy};
use crate::normalizer::normalize_all;
use crate::source::SourceAdapter;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Fans a query out to every source and turns the answers into vacancies.
pub struct Aggregator {
    sources: Vec<Arc<dyn SourceAdapter>>,
    rates: Arc<dyn CurrencyRates>,
    base: BaseCurrency,
    abort_on_source_error: bool,
}

impl Aggregator {
    pub fn new(
        sources: Vec<Arc<dyn SourceAdapter>>,
        rates: Arc<dyn CurrencyRates>,
        base: BaseCurrency,
        abort_on_source_error: bool,
    ) -> Self {
        Self {
            sources,
            rates,
            base,
            abort_on_source_error,
        }
    }

    /// Result keeps source registration order, then each source's native order.
    pub async fn aggregate(&self, query: &str) -> Result<Vec<Vacancy>, AggregateError> {
        info!("Searching {} sources for '{}'", self.sources.len(), query);
        let raw = self.fetch_all(query).await?;

        let pending = normalize_all(&raw);
        let vacancies = self.convert(pending).await;

        let needle = query.to_lowercase();
        let filtered: Vec<Vacancy> = vacancies
            .into_iter()
            .filter(|v| v.title().to_lowercase().contains(&needle))
            .collect();

        info!(
            "Aggregated {} vacancies from {} raw records",
            filtered.len(),
            raw.len()
        );
        Ok(filtered)
    }

    async fn fetch_all(&self, query: &str) -> Result<Vec<RawRecord>, AggregateError> {
        let tasks = self.sources.iter().map(|source| source.search(query));
        let results = join_all(tasks).await;

        let mut raw = Vec::new();
        for (source, result) in self.sources.iter().zip(results) {
            match result {
                Ok(records) => raw.extend(records),
                Err(e) if self.abort_on_source_error => return Err(e.into()),
                Err(e) => warn!("Skipping {}: {}", source.kind(), e),
            }
        }
        Ok(raw)
    }

    /// Brings salaries into base currency, dropping records without a usable salary.
    async fn convert(&self, pending: Vec<PendingVacancy>) -> Vec<Vacancy> {
        // one lookup per currency per aggregation, failures included
        let mut rates: HashMap<String, Option<f64>> = HashMap::new();
        let mut vacancies = Vec::with_capacity(pending.len());

        for p in pending {
            let Some(amount) = p.salary_raw else {
                continue;
            };

            let salary = match p.currency.as_deref() {
                Some(code) if !self.base.is_base(code) => {
                    let rate = match rates.get(code) {
                        Some(cached) => *cached,
                        None => {
                            let looked_up = match self.rates.rate_to_base(code).await {
                                Ok(rate) => Some(rate),
                                Err(e) => {
                                    warn!("Currency lookup for {} failed: {}", code, e);
                                    None
                                }
                            };
                            rates.insert(code.to_string(), looked_up);
                            looked_up
                        }
                    };
                    match rate {
                        Some(rate) => amount * rate,
                        None => {
                            warn!("Dropping '{}': no rate for {}", p.title, code);
                            continue;
                        }
                    }
                }
                _ => amount,
            };

            let salary = salary.round() as i64;
            if salary <= 0 {
                continue;
            }
            vacancies.push(Vacancy::new(p.title, p.link, salary, p.date));
        }

        vacancies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrencyError, SourceError, SourceKind};
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSource {
        kind: SourceKind,
        records: Vec<Value>,
    }

    #[async_trait::async_trait]
    impl SourceAdapter for FixedSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        async fn search(&self, _query: &str) -> Result<Vec<RawRecord>, SourceError> {
            Ok(self
                .records
                .iter()
                .filter_map(|v| v.as_object().cloned())
                .map(|fields| RawRecord {
                    source: self.kind,
                    fields,
                })
                .collect())
        }
    }

    struct BrokenSource;

    #[async_trait::async_trait]
    impl SourceAdapter for BrokenSource {
        fn kind(&self) -> SourceKind {
            SourceKind::HeadHunter
        }

        async fn search(&self, _query: &str) -> Result<Vec<RawRecord>, SourceError> {
            Err(SourceError::Status {
                provider: SourceKind::HeadHunter,
                status: reqwest::StatusCode::BAD_GATEWAY,
            })
        }
    }

    #[derive(Default)]
    struct CountingRates {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl CurrencyRates for CountingRates {
        async fn rate_to_base(&self, code: &str) -> Result<f64, CurrencyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match code {
                "USD" => Ok(90.0),
                "EUR" => Ok(100.0),
                other => Err(CurrencyError::UnknownCurrency(other.to_string())),
            }
        }
    }

    fn sj(title: &str, salary: i64, currency: &str) -> Value {
        json!({
            "profession": title,
            "link": format!("https://www.superjob.ru/{}", title.len()),
            "payment_from": salary,
            "date_published": 1_700_000_000,
            "currency": currency
        })
    }

    fn base() -> BaseCurrency {
        BaseCurrency::new(&["RUR".to_string(), "RUB".to_string()])
    }

    fn aggregator(
        sources: Vec<Arc<dyn SourceAdapter>>,
        rates: Arc<CountingRates>,
        abort: bool,
    ) -> Aggregator {
        Aggregator::new(sources, rates, base(), abort)
    }

    #[tokio::test]
    async fn converts_filters_and_keeps_source_order() {
        let first: Arc<dyn SourceAdapter> = Arc::new(FixedSource {
            kind: SourceKind::SuperJob,
            records: vec![
                sj("Rust Developer", 1000, "usd"),
                sj("Designer", 5000, "rub"),
                sj("Senior rust developer", 200000, "rub"),
            ],
        });
        let second: Arc<dyn SourceAdapter> = Arc::new(FixedSource {
            kind: SourceKind::SuperJob,
            records: vec![
                sj("RUST developer lead", 2000, "eur"),
                sj("Rust developer", 10, "gbp"),
            ],
        });
        let rates = Arc::new(CountingRates::default());
        let agg = aggregator(vec![first, second], rates.clone(), false);

        let result = agg.aggregate("rust developer").await.unwrap();
        let got: Vec<_> = result.iter().map(|v| (v.title(), v.salary())).collect();
        assert_eq!(
            got,
            vec![
                ("Rust Developer", 90_000),
                ("Senior rust developer", 200_000),
                ("RUST developer lead", 200_000),
            ]
        );
        assert_eq!(rates.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn currency_rate_looked_up_once_per_code() {
        let source: Arc<dyn SourceAdapter> = Arc::new(FixedSource {
            kind: SourceKind::SuperJob,
            records: vec![
                sj("Engineer A", 1, "usd"),
                sj("Engineer B", 2, "usd"),
                sj("Engineer C", 3, "chf"),
            ],
        });
        let rates = Arc::new(CountingRates::default());
        let agg = aggregator(vec![source], rates.clone(), false);

        let result = agg.aggregate("engineer").await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(rates.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failing_source_is_skipped_by_default() {
        let good: Arc<dyn SourceAdapter> = Arc::new(FixedSource {
            kind: SourceKind::SuperJob,
            records: vec![sj("Engineer", 100000, "rub")],
        });
        let broken: Arc<dyn SourceAdapter> = Arc::new(BrokenSource);
        let agg = aggregator(vec![broken, good], Arc::new(CountingRates::default()), false);

        let result = agg.aggregate("engineer").await.unwrap();
        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn failing_source_aborts_when_configured() {
        let good: Arc<dyn SourceAdapter> = Arc::new(FixedSource {
            kind: SourceKind::SuperJob,
            records: vec![sj("Engineer", 100000, "rub")],
        });
        let broken: Arc<dyn SourceAdapter> = Arc::new(BrokenSource);
        let agg = aggregator(vec![good, broken], Arc::new(CountingRates::default()), true);

        let err = agg.aggregate("engineer").await.unwrap_err();
        assert!(matches!(err, AggregateError::Source(SourceError::Status { .. })));
    }
}
