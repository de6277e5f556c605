//! Damage multiplier aggregation.
//!
//! Folds the damage relations of several types into one running multiplier
//! per related type and direction, then groups the non-neutral results by
//! multiplier value.

use crate::models::{
    DamageRelations, Direction, Multiplier, MultiplierGroups, TypeRecord,
};
use crate::source::{FetchError, TypeSource};
use futures::future::try_join_all;
use indexmap::IndexMap;
use tracing::{debug, info};

/// Running multiplier per related type name, in first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct MultiplierAccumulator {
    totals: IndexMap<String, f64>,
}

impl MultiplierAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Multiply `weight` into the running total for `name`.
    ///
    /// The first contribution for a name sets its total.
    pub fn apply(&mut self, name: &str, weight: f64) {
        match self.totals.get_mut(name) {
            Some(total) => *total *= weight,
            None => {
                self.totals.insert(name.to_string(), weight);
            }
        }
    }

    /// Fold one record's categories for `direction` into the totals.
    pub fn fold_record(&mut self, record: &TypeRecord, direction: Direction) {
        for category in direction.categories() {
            let weight = category.weight();
            for related in record.damage_relations.get(category) {
                self.apply(&related.name, weight);
            }
        }
    }

    /// Current total for a name, if it has been seen.
    #[allow(dead_code)] // Inspection utility
    pub fn get(&self, name: &str) -> Option<f64> {
        self.totals.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    #[allow(dead_code)] // Inspection utility
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Group names by total, dropping neutral totals.
    ///
    /// Names keep their insertion order within a bucket; buckets are ordered
    /// by the first name that landed in them.
    pub fn into_groups(self) -> MultiplierGroups {
        let mut grouped = MultiplierGroups::new();

        for (name, total) in self.totals {
            let multiplier = Multiplier::new(total);
            if multiplier.is_neutral() {
                continue;
            }
            grouped.entry(multiplier).or_default().push(name);
        }

        grouped
    }
}

/// Aggregate already-fetched records into grouped multipliers.
pub fn aggregate(records: &[TypeRecord]) -> DamageRelations {
    let mut from = MultiplierAccumulator::new();
    let mut to = MultiplierAccumulator::new();

    for record in records {
        from.fold_record(record, Direction::From);
        to.fold_record(record, Direction::To);
    }

    debug!(
        "Accumulated {} received and {} dealt relations",
        from.len(),
        to.len()
    );

    DamageRelations {
        from: from.into_groups(),
        to: to.into_groups(),
    }
}

/// Fetch every type's record and aggregate their damage relations.
///
/// All fetches run concurrently. The first failure aborts the whole call
/// and is returned unchanged. Duplicate names are fetched and counted once
/// per occurrence.
pub async fn damage_relations_for_types(
    source: &dyn TypeSource,
    types: &[String],
) -> Result<DamageRelations, FetchError> {
    info!(
        "Fetching {} type record(s) from {}",
        types.len(),
        source.describe()
    );

    let records = try_join_all(types.iter().map(|name| source.fetch_type(name))).await?;

    Ok(aggregate(&records))
}
