// Public modules
pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

// Re-exports for convenience
pub use algorithms::combo_search::ComboSearch;
pub use algorithms::optimizer::{OptimizeRequest, Optimizer, Origin};
pub use config::OptimizerConfig;
pub use error::{LoadError, OptimizeError};
pub use models::{Dataset, Location, OptimizationResult, Outcome, PriceObservation, ShoppingList};
