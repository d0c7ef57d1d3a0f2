// Models module - exports all model types

mod dataset;
mod location;
mod observation;
pub mod price;
mod result;
mod route;
mod shopping_list;
mod store;

// Re-export model types
pub use self::dataset::{DataQualityReport, Dataset};
pub use self::location::Location;
pub use self::observation::{PriceObservation, RawObservation};
pub use self::result::{InfeasibilityReport, ItemAssignment, OptimizationResult, Outcome};
pub use self::route::{PlannedRoute, RouteStop, StopKind};
pub use self::shopping_list::ShoppingList;
pub use self::store::{StoreKey, StoreLocation};

// Common type aliases for improved code readability
pub type Cost = f64;
pub type Miles = f64;
