//! Reduce a ticket log to monthly counts per category.

use std::collections::BTreeMap;

use crate::core::{Category, MonthlyCount, OrdinalMonth, TicketEvent, TrainingSet};

/// Count events per (month, category) pair.
///
/// Each event's opened-at timestamp is truncated to its year-month. The
/// result has one entry per pair that has at least one event, ordered by
/// month then category.
pub fn monthly_counts<I>(events: I) -> Vec<MonthlyCount>
where
    I: IntoIterator<Item = TicketEvent>,
{
    let mut groups: BTreeMap<(OrdinalMonth, Category), u64> = BTreeMap::new();
    for event in events {
        let key = (OrdinalMonth::from_datetime(&event.opened_at), event.category);
        *groups.entry(key).or_insert(0) += 1;
    }

    groups
        .into_iter()
        .map(|((month, category), count)| MonthlyCount {
            month,
            category,
            count,
        })
        .collect()
}

/// Training rows for one category: one `(ordinal month, count)` row per
/// month in which that category had tickets.
///
/// A category with no tickets yields an empty set; deciding whether that
/// is enough history is not this function's concern.
pub fn training_set<I>(events: I, category: Category) -> TrainingSet
where
    I: IntoIterator<Item = TicketEvent>,
{
    let mut set = TrainingSet::new(category);
    for row in monthly_counts(events)
        .into_iter()
        .filter(|row| row.category == category)
    {
        set.push(row.month, row.count);
    }
    set
}
