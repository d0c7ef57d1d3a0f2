// Combination search: exhaustive store-subset evaluation with greedy routing

use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::algorithms::combinations::Combinations;
use crate::algorithms::filter::FilteredDataset;
use crate::algorithms::routing::NearestNeighborRouter;
use crate::algorithms::RoutePlanner;
use crate::models::{
    Cost, InfeasibilityReport, ItemAssignment, Location, OptimizationResult, Outcome,
    PlannedRoute, ShoppingList,
};

/// Score of one covering store combination
#[derive(Debug, Clone)]
struct ComboEvaluation {
    /// Indices into the candidate store list, in candidate order
    stores: Vec<usize>,

    /// Indices into the filtered rows, one per distinct item description,
    /// ordered by description
    assignments: Vec<usize>,

    item_subtotal: Cost,
    route: PlannedRoute,
    total_cost: Cost,
}

/// Searches every store subset of size `1..=max_stores` for the cheapest
/// combination of item prices plus travel cost.
///
/// The search is exhaustive: it evaluates C(n,1) + ... + C(n,max_stores)
/// subsets of the n candidate stores, so it is only meant for a handful of
/// candidates and small `max_stores`. Callers bound it up front with
/// [`crate::algorithms::combinations::count_combinations`].
pub struct ComboSearch<'a, P = NearestNeighborRouter> {
    filtered: &'a FilteredDataset<'a>,
    shopping_list: &'a ShoppingList,
    origin: Location,
    origin_label: String,
    cost_per_mile: Cost,
    planner: P,
}

impl<'a> ComboSearch<'a, NearestNeighborRouter> {
    /// Creates a search using greedy nearest-neighbor routing
    pub fn new(
        filtered: &'a FilteredDataset<'a>,
        shopping_list: &'a ShoppingList,
        origin: Location,
        cost_per_mile: Cost,
    ) -> Self {
        Self::with_planner(
            filtered,
            shopping_list,
            origin,
            cost_per_mile,
            NearestNeighborRouter,
        )
    }
}

impl<'a, P: RoutePlanner> ComboSearch<'a, P> {
    /// Creates a search with a custom route planner
    pub fn with_planner(
        filtered: &'a FilteredDataset<'a>,
        shopping_list: &'a ShoppingList,
        origin: Location,
        cost_per_mile: Cost,
        planner: P,
    ) -> Self {
        Self {
            filtered,
            shopping_list,
            origin,
            origin_label: origin.to_string(),
            cost_per_mile,
            planner,
        }
    }

    /// Sets the text shown for the start and end stops of the route
    pub fn origin_label<S: Into<String>>(mut self, label: S) -> Self {
        self.origin_label = label.into();
        self
    }

    /// Runs the search sequentially.
    ///
    /// Combinations are visited by increasing size and, within a size, in
    /// lexicographic order of candidate stores. A combination replaces the
    /// current best only when strictly cheaper, so ties keep the first found.
    pub fn run(&self, max_stores: usize, budget: Option<Cost>) -> Outcome {
        let mut best: Option<ComboEvaluation> = None;
        let mut evaluated = 0usize;
        let mut feasible = 0usize;

        for combo in Combinations::new(self.filtered.stores.len(), max_stores) {
            evaluated += 1;
            let Some(evaluation) = self.evaluate(&combo) else {
                continue;
            };
            feasible += 1;

            let improves = best
                .as_ref()
                .map_or(true, |current| evaluation.total_cost < current.total_cost);
            if improves {
                debug!(
                    stores = ?evaluation.stores,
                    total_cost = evaluation.total_cost,
                    "new best combination"
                );
                best = Some(evaluation);
            }
        }

        info!(
            candidates = self.filtered.stores.len(),
            evaluated, feasible, "combination search finished"
        );

        self.conclude(best, max_stores, budget)
    }

    /// Runs the search on the rayon thread pool.
    ///
    /// Every combination is scored independently and the winner is the lowest
    /// total cost, ties broken by enumeration position, so the outcome is
    /// identical to [`ComboSearch::run`].
    pub fn run_parallel(&self, max_stores: usize, budget: Option<Cost>) -> Outcome
    where
        P: Sync,
    {
        let combos: Vec<Vec<usize>> =
            Combinations::new(self.filtered.stores.len(), max_stores).collect();

        let best = combos
            .par_iter()
            .enumerate()
            .filter_map(|(position, combo)| {
                self.evaluate(combo).map(|evaluation| (position, evaluation))
            })
            .reduce_with(|a, b| {
                let b_wins = b.1.total_cost < a.1.total_cost
                    || (b.1.total_cost == a.1.total_cost && b.0 < a.0);
                if b_wins {
                    b
                } else {
                    a
                }
            })
            .map(|(_, evaluation)| evaluation);

        info!(
            candidates = self.filtered.stores.len(),
            evaluated = combos.len(),
            "parallel combination search finished"
        );

        self.conclude(best, max_stores, budget)
    }

    /// Scores one combination, or returns `None` when it misses a requested item
    fn evaluate(&self, combo: &[usize]) -> Option<ComboEvaluation> {
        let mut in_combo = vec![false; self.filtered.stores.len()];
        for &store in combo {
            in_combo[store] = true;
        }

        let mut covered = vec![false; self.shopping_list.len()];
        // Cheapest row per exact description; a later row must be strictly cheaper to win
        let mut cheapest: BTreeMap<&str, usize> = BTreeMap::new();

        for (index, row) in self.filtered.rows.iter().enumerate() {
            if !in_combo[row.store_index] {
                continue;
            }
            for item in self.shopping_list.matching_indices(&row.lowered_item) {
                covered[item] = true;
            }

            let price = row.observation.price;
            cheapest
                .entry(row.observation.item.as_str())
                .and_modify(|current| {
                    if price < self.filtered.rows[*current].observation.price {
                        *current = index;
                    }
                })
                .or_insert(index);
        }

        if !covered.iter().all(|&c| c) {
            return None;
        }

        let assignments: Vec<usize> = cheapest.into_values().collect();
        let item_subtotal: Cost = assignments
            .iter()
            .map(|&index| self.filtered.rows[index].observation.price)
            .sum();

        let stops: Vec<Location> = combo
            .iter()
            .map(|&store| self.filtered.stores[store].location)
            .collect();
        let route = self.planner.plan(self.origin, &stops);
        let total_cost = item_subtotal + route.miles * self.cost_per_mile;

        Some(ComboEvaluation {
            stores: combo.to_vec(),
            assignments,
            item_subtotal,
            route,
            total_cost,
        })
    }

    fn conclude(
        &self,
        best: Option<ComboEvaluation>,
        max_stores: usize,
        budget: Option<Cost>,
    ) -> Outcome {
        let Some(best) = best else {
            let uncovered_items = self
                .shopping_list
                .uncovered_by(self.filtered.lowered_items());
            return Outcome::Infeasible(InfeasibilityReport::NoCoverage {
                uncovered_items,
                max_stores,
            });
        };

        // The cheapest covering combination is also the cheapest one within
        // budget whenever any combination is within budget.
        if let Some(budget) = budget {
            if best.total_cost > budget {
                return Outcome::Infeasible(InfeasibilityReport::BudgetExceeded {
                    budget,
                    cheapest_total: best.total_cost,
                });
            }
        }

        Outcome::Optimized(self.render(best))
    }

    fn render(&self, evaluation: ComboEvaluation) -> OptimizationResult {
        let stores = &self.filtered.stores;

        let items = evaluation
            .assignments
            .iter()
            .map(|&index| {
                let observation = self.filtered.rows[index].observation;
                ItemAssignment {
                    item: observation.item.clone(),
                    price: observation.price,
                    store: observation.store.clone(),
                    address: observation.address.clone(),
                }
            })
            .collect();

        let stop_labels: Vec<String> = evaluation
            .stores
            .iter()
            .map(|&store| stores[store].stop_label())
            .collect();

        OptimizationResult {
            stores: evaluation
                .stores
                .iter()
                .map(|&store| stores[store].key.clone())
                .collect(),
            items,
            item_subtotal: evaluation.item_subtotal,
            miles_traveled: evaluation.route.miles,
            total_cost: evaluation.total_cost,
            route: evaluation.route.stops(&self.origin_label, &stop_labels),
        }
    }
}
