// Dataset filter: reduces a snapshot to rows and stores relevant to a shopping list

use crate::models::{Dataset, PriceObservation, ShoppingList, StoreKey, StoreLocation};
use std::collections::HashMap;

/// An observation that matched at least one requested item
#[derive(Debug, Clone)]
pub struct FilteredRow<'a> {
    pub observation: &'a PriceObservation,

    /// Lowercased item description, computed once for substring matching
    pub lowered_item: String,

    /// Index of the row's store in [`FilteredDataset::stores`]
    pub store_index: usize,
}

/// Rows matching a shopping list and the distinct stores carrying them
#[derive(Debug, Clone, Default)]
pub struct FilteredDataset<'a> {
    /// Matching rows in dataset order
    pub rows: Vec<FilteredRow<'a>>,

    /// Candidate stores in first-encountered order
    pub stores: Vec<StoreLocation>,
}

impl<'a> FilteredDataset<'a> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Lowercased descriptions of every matching row
    pub fn lowered_items(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.lowered_item.as_str())
    }
}

/// Keeps the observations whose description contains a requested item and
/// collects the stores they belong to.
///
/// A store's address and coordinate come from its first matching row.
pub fn filter_dataset<'a>(dataset: &'a Dataset, shopping_list: &ShoppingList) -> FilteredDataset<'a> {
    let mut filtered = FilteredDataset::default();
    if shopping_list.is_empty() {
        return filtered;
    }

    let mut store_indices: HashMap<&StoreKey, usize> = HashMap::new();

    for observation in dataset.rows() {
        let lowered_item = observation.item.to_lowercase();
        if !shopping_list.matches_any(&lowered_item) {
            continue;
        }

        let next_index = store_indices.len();
        let store_index = *store_indices.entry(&observation.store).or_insert_with(|| {
            filtered.stores.push(StoreLocation::new(
                observation.store.clone(),
                observation.address.clone(),
                observation.location,
            ));
            next_index
        });

        filtered.rows.push(FilteredRow {
            observation,
            lowered_item,
            store_index,
        });
    }

    filtered
}
