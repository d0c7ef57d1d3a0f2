pub mod combinations;
pub mod combo_search;
pub mod filter;
pub mod optimizer;
pub mod routing;

// Common algorithm traits
use crate::models::{Location, PlannedRoute};

/// Trait for building the visiting order of a store combination
pub trait RoutePlanner {
    /// Plan a round trip that starts and ends at `origin` and visits every stop once.
    ///
    /// `PlannedRoute::order` holds indices into `stops`.
    fn plan(&self, origin: Location, stops: &[Location]) -> PlannedRoute;
}
