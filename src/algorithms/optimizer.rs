// Optimizer facade: request validation, coordinate resolution, filtering and search

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::algorithms::combinations::count_combinations;
use crate::algorithms::combo_search::ComboSearch;
use crate::algorithms::filter::filter_dataset;
use crate::config::OptimizerConfig;
use crate::error::{OptimizeError, RequestDefect};
use crate::models::{Cost, Dataset, Location, Outcome, ShoppingList};
use crate::utils::geocode::Geocoder;

/// Where the shopper starts and ends the trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Free-text address, resolved through a [`Geocoder`]
    Address(String),
    /// Already resolved coordinate
    Coordinate(Location),
}

/// A single optimization request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub items: Vec<String>,
    pub max_stores: usize,
    pub origin: Origin,
    #[serde(default)]
    pub budget: Option<Cost>,
}

impl OptimizeRequest {
    pub fn new<I, S>(items: I, max_stores: usize, origin: Origin) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            max_stores,
            origin,
            budget: None,
        }
    }

    pub fn with_budget(mut self, budget: Cost) -> Self {
        self.budget = Some(budget);
        self
    }
}

/// Entry point that turns a request and a dataset snapshot into an [`Outcome`]
#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    config: OptimizerConfig,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Finds the cheapest store combination for the request.
    ///
    /// Invalid requests and unresolvable origins are returned as errors before
    /// any search work; infeasible searches are returned as
    /// [`Outcome::Infeasible`].
    pub fn optimize<G: Geocoder + ?Sized>(
        &self,
        request: &OptimizeRequest,
        dataset: &Dataset,
        geocoder: &G,
    ) -> Result<Outcome, OptimizeError> {
        let shopping_list: ShoppingList = request.items.iter().collect();
        if shopping_list.is_empty() {
            return Err(OptimizeError::EmptyRequest(RequestDefect::NoItems));
        }
        if request.max_stores == 0 {
            return Err(OptimizeError::EmptyRequest(RequestDefect::ZeroMaxStores));
        }
        if let Some(budget) = request.budget {
            if !budget.is_finite() || budget < 0.0 {
                return Err(OptimizeError::InvalidBudget(budget));
            }
        }

        let (origin, origin_label) = self.resolve_origin(&request.origin, geocoder)?;

        let filtered = filter_dataset(dataset, &shopping_list);
        let candidates = filtered.stores.len();

        let combinations = count_combinations(candidates, request.max_stores);
        let limit = u128::from(self.config.max_combinations);
        if combinations > limit {
            warn!(
                candidates,
                max_stores = request.max_stores,
                combinations,
                "store combination search refused"
            );
            return Err(OptimizeError::SearchSpaceTooLarge {
                combinations,
                limit,
            });
        }

        info!(
            items = shopping_list.len(),
            matching_rows = filtered.rows.len(),
            candidates,
            max_stores = request.max_stores,
            combinations,
            "starting store combination search"
        );

        let search = ComboSearch::new(&filtered, &shopping_list, origin, self.config.cost_per_mile)
            .origin_label(origin_label);

        let outcome = if self.config.parallel {
            search.run_parallel(request.max_stores, request.budget)
        } else {
            search.run(request.max_stores, request.budget)
        };

        match &outcome {
            Outcome::Optimized(result) => info!(
                stores = ?result.stores,
                total_cost = result.total_cost,
                miles = result.miles_traveled,
                "optimization succeeded"
            ),
            Outcome::Infeasible(report) => info!(%report, "optimization infeasible"),
        }

        Ok(outcome)
    }

    fn resolve_origin<G: Geocoder + ?Sized>(
        &self,
        origin: &Origin,
        geocoder: &G,
    ) -> Result<(Location, String), OptimizeError> {
        match origin {
            Origin::Coordinate(location) => Location::checked(location.lat, location.lon)
                .map(|location| (location, location.to_string()))
                .ok_or_else(|| OptimizeError::UnresolvableAddress {
                    address: location.to_string(),
                }),
            Origin::Address(address) => {
                let resolved = geocoder.geocode(address).map_err(|source| {
                    OptimizeError::Geocoding {
                        address: address.clone(),
                        source,
                    }
                })?;
                match resolved.and_then(|l| Location::checked(l.lat, l.lon)) {
                    Some(location) => Ok((location, address.trim().to_string())),
                    None => Err(OptimizeError::UnresolvableAddress {
                        address: address.clone(),
                    }),
                }
            }
        }
    }
}
