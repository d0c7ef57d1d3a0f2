// Utilities module - collaborators around the optimizer core

pub mod distance;
pub mod geocode;
pub mod init_dataset;
pub mod snapshot;
pub mod store_directory;
