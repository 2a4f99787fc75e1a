use crate::model::Vacancy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    BySalary,
    ByDate,
}

/// Fewer vacancies were available than requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialResult {
    pub requested: usize,
    pub available: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub vacancies: Vec<Vacancy>,
    pub shortfall: Option<PartialResult>,
}

/// Top `k` vacancies, highest first. Ties keep their collection order.
pub fn select_top(collection: &[Vacancy], k: usize, order: SortOrder) -> Selection {
    let mut sorted = collection.to_vec();
    // sort_by is stable
    match order {
        SortOrder::BySalary => sorted.sort_by(|a, b| b.salary().cmp(&a.salary())),
        SortOrder::ByDate => sorted.sort_by(|a, b| b.date().cmp(a.date())),
    }
    sorted.truncate(k);

    let shortfall = (k > collection.len()).then_some(PartialResult {
        requested: k,
        available: collection.len(),
    });

    Selection {
        vacancies: sorted,
        shortfall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(title: &str, salary: i64, date: &str) -> Vacancy {
        Vacancy::new(title, format!("https://example.org/{title}"), salary, date)
    }

    #[test]
    fn salary_ties_keep_original_order() {
        let a = v("A", 100, "2024.01.01");
        let b = v("B", 100, "2024.02.01");
        let selection = select_top(&[a.clone(), b.clone()], 2, SortOrder::BySalary);
        assert_eq!(selection.vacancies, vec![a, b]);
        assert_eq!(selection.shortfall, None);
    }

    #[test]
    fn by_salary_descending_and_truncated() {
        let items = vec![
            v("low", 10, "2024.01.01"),
            v("high", 300, "2023.01.01"),
            v("mid", 200, "2022.01.01"),
        ];
        let selection = select_top(&items, 2, SortOrder::BySalary);
        let titles: Vec<_> = selection.vacancies.iter().map(|v| v.title()).collect();
        assert_eq!(titles, vec!["high", "mid"]);
    }

    #[test]
    fn by_date_descending_with_stable_ties() {
        let items = vec![
            v("old", 500, "2023.12.31"),
            v("new-1", 100, "2024.03.01"),
            v("new-2", 900, "2024.03.01"),
        ];
        let selection = select_top(&items, 3, SortOrder::ByDate);
        let titles: Vec<_> = selection.vacancies.iter().map(|v| v.title()).collect();
        assert_eq!(titles, vec!["new-1", "new-2", "old"]);
    }

    #[test]
    fn oversized_k_returns_everything_with_shortfall() {
        let items = vec![
            v("a", 1, "2024.01.01"),
            v("b", 2, "2024.01.02"),
            v("c", 3, "2024.01.03"),
        ];
        let selection = select_top(&items, 1000, SortOrder::ByDate);
        assert_eq!(selection.vacancies.len(), 3);
        assert_eq!(
            selection.shortfall,
            Some(PartialResult {
                requested: 1000,
                available: 3
            })
        );
    }

    #[test]
    fn zero_k_is_empty() {
        let items = vec![v("a", 1, "2024.01.01")];
        let selection = select_top(&items, 0, SortOrder::BySalary);
        assert!(selection.vacancies.is_empty());
        assert_eq!(selection.shortfall, None);
    }
}
