use crate::aggregator::Aggregator;
use crate::model::{AggregateError, StorageError, Vacancy};
use crate::selector::{PartialResult, SortOrder, select_top};
use crate::storage::VacancyStore;
use tracing::{info, warn};

/// Session state: the working collection plus everything needed to refill and persist it.
pub struct AppContext {
    aggregator: Aggregator,
    stores: Vec<Box<dyn VacancyStore>>,
    vacancies: Vec<Vacancy>,
}

impl AppContext {
    pub fn new(aggregator: Aggregator, stores: Vec<Box<dyn VacancyStore>>) -> Self {
        Self {
            aggregator,
            stores,
            vacancies: Vec::new(),
        }
    }

    pub fn vacancies(&self) -> &[Vacancy] {
        &self.vacancies
    }

    /// Replaces the working collection with fresh search results.
    pub async fn search(&mut self, query: &str) -> Result<usize, AggregateError> {
        self.vacancies = self.aggregator.aggregate(query).await?;
        Ok(self.vacancies.len())
    }

    /// Narrows the working collection to its top `k`.
    pub fn select(&mut self, k: usize, order: SortOrder) -> Option<PartialResult> {
        let selection = select_top(&self.vacancies, k, order);
        if let Some(short) = selection.shortfall {
            warn!("Requested {} vacancies, only {} available", short.requested, short.available);
        }
        self.vacancies = selection.vacancies;
        selection.shortfall
    }

    /// Appends the working collection to every store. Stops at the first failing store.
    pub fn save(&self) -> Result<usize, StorageError> {
        for store in &self.stores {
            for vacancy in &self.vacancies {
                store.append(vacancy)?;
            }
            info!("Saved {} vacancies to {} store", self.vacancies.len(), store.name());
        }
        Ok(self.vacancies.len())
    }
}
