//! Monthly counts and the per-category training set built from them.

use crate::core::{Category, OrdinalMonth};

/// Number of tickets of one category opened in one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyCount {
    pub month: OrdinalMonth,
    pub category: Category,
    pub count: u64,
}

/// One training row: the encoded month and its ticket count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub month: OrdinalMonth,
    pub count: u64,
}

/// Rows of (ordinal month, count) for a single category.
///
/// Row order carries no meaning; nothing downstream may depend on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    category: Option<Category>,
    rows: Vec<Observation>,
}

impl TrainingSet {
    pub fn new(category: Category) -> Self {
        Self {
            category: Some(category),
            rows: Vec::new(),
        }
    }

    /// Build a training set directly from rows.
    pub fn from_rows(category: Category, rows: Vec<Observation>) -> Self {
        Self {
            category: Some(category),
            rows,
        }
    }

    pub fn push(&mut self, month: OrdinalMonth, count: u64) {
        self.rows.push(Observation { month, count });
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Feature column (ordinal months as floats).
    pub fn features(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.month.feature()).collect()
    }

    /// Target column (counts as floats).
    pub fn targets(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.count as f64).collect()
    }

    /// Count recorded for a month, if that month has a row.
    pub fn count_for(&self, month: OrdinalMonth) -> Option<u64> {
        self.rows.iter().find(|r| r.month == month).map(|r| r.count)
    }

    /// Put rows in calendar order, so downstream sampling does not depend
    /// on the order rows were produced in.
    pub fn sort_by_month(&mut self) {
        self.rows.sort_by_key(|r| r.month);
    }

    /// New training set containing the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            category: self.category,
            rows: indices.iter().map(|&i| self.rows[i]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(s: &str) -> OrdinalMonth {
        OrdinalMonth::parse(s).unwrap()
    }

    #[test]
    fn columns_follow_row_order() {
        let mut set = TrainingSet::new(Category::Network);
        set.push(month("2024-02"), 3);
        set.push(month("2024-01"), 2);

        assert_eq!(set.len(), 2);
        assert_eq!(
            set.features(),
            vec![(2024 * 12 + 2) as f64, (2024 * 12 + 1) as f64]
        );
        assert_eq!(set.targets(), vec![3.0, 2.0]);
    }

    #[test]
    fn select_picks_rows_by_index() {
        let mut set = TrainingSet::new(Category::Software);
        for (i, m) in ["2024-01", "2024-02", "2024-03"].iter().enumerate() {
            set.push(month(m), i as u64);
        }

        let subset = set.select(&[2, 0]);
        assert_eq!(subset.category(), Some(Category::Software));
        assert_eq!(subset.targets(), vec![2.0, 0.0]);
    }

    #[test]
    fn sort_by_month_orders_rows() {
        let mut set = TrainingSet::new(Category::Network);
        set.push(month("2024-03"), 1);
        set.push(month("2023-12"), 2);
        set.push(month("2024-01"), 3);
        set.sort_by_month();
        assert_eq!(set.targets(), vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn count_lookup() {
        let set = TrainingSet::from_rows(
            Category::Hardware,
            vec![Observation {
                month: month("2024-05"),
                count: 9,
            }],
        );
        assert_eq!(set.count_for(month("2024-05")), Some(9));
        assert_eq!(set.count_for(month("2024-06")), None);
    }
}
