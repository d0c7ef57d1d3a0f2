// Result models returned by the optimizer

use crate::models::{Cost, Miles, RouteStop, StoreKey};
use serde::{Deserialize, Serialize};

/// The cheapest observation chosen for one distinct item description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAssignment {
    pub item: String,
    pub price: Cost,
    pub store: StoreKey,
    pub address: String,
}

/// The winning store combination with its item and travel costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Chosen stores in candidate order
    pub stores: Vec<StoreKey>,

    /// Cheapest assignment per distinct item description, ordered by description
    pub items: Vec<ItemAssignment>,

    pub item_subtotal: Cost,
    pub miles_traveled: Miles,

    /// Item subtotal plus travel cost
    pub total_cost: Cost,

    /// Start, each visited store in visiting order, end
    pub route: Vec<RouteStop>,
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl OptimizationResult {
    /// Copy with money and distance rounded to two decimals, for display
    pub fn rounded(&self) -> Self {
        Self {
            item_subtotal: round_cents(self.item_subtotal),
            miles_traveled: round_cents(self.miles_traveled),
            total_cost: round_cents(self.total_cost),
            ..self.clone()
        }
    }
}

/// Why no store combination was returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum InfeasibilityReport {
    /// No combination of at most `max_stores` stores covers every requested item.
    ///
    /// `uncovered_items` lists the items that no candidate store sells at all;
    /// it is empty when every item is sold somewhere but not within `max_stores` stores.
    NoCoverage {
        uncovered_items: Vec<String>,
        max_stores: usize,
    },

    /// Covering combinations exist but all of them cost more than the budget
    BudgetExceeded { budget: Cost, cheapest_total: Cost },
}

impl std::fmt::Display for InfeasibilityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InfeasibilityReport::NoCoverage {
                uncovered_items,
                max_stores,
            } if uncovered_items.is_empty() => write!(
                f,
                "no combination of at most {} stores carries every item",
                max_stores
            ),
            InfeasibilityReport::NoCoverage {
                uncovered_items, ..
            } => write!(f, "no store carries: {}", uncovered_items.join(", ")),
            InfeasibilityReport::BudgetExceeded {
                budget,
                cheapest_total,
            } => write!(
                f,
                "cheapest combination costs {:.2}, over the budget of {:.2}",
                cheapest_total, budget
            ),
        }
    }
}

/// Structured outcome of an optimization call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    Optimized(OptimizationResult),
    Infeasible(InfeasibilityReport),
}

impl Outcome {
    pub fn is_optimized(&self) -> bool {
        matches!(self, Outcome::Optimized(_))
    }

    /// The winning result, if any
    pub fn result(&self) -> Option<&OptimizationResult> {
        match self {
            Outcome::Optimized(result) => Some(result),
            Outcome::Infeasible(_) => None,
        }
    }

    /// The infeasibility report, if any
    pub fn infeasibility(&self) -> Option<&InfeasibilityReport> {
        match self {
            Outcome::Optimized(_) => None,
            Outcome::Infeasible(report) => Some(report),
        }
    }
}
