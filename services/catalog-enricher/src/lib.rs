//! Catalog enricher.
//!
//! Loads endpoint, collection and catalog YAML, applies the endpoint's
//! time series to a collection directory and writes the result.

pub mod config_loader;
pub mod run;

pub use config_loader::{load_catalog_config, load_collection_config, load_endpoint_config};
pub use run::{run, RunOptions};
