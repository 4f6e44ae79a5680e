//! Configuration loading and management for the Earnings Engine.
//!
//! This module provides functionality to load the application settings and
//! the per-country tax rule sets from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use earnings_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! for country in config.countries() {
//!     println!("{} {}", country.flag, country.name);
//! }
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, CountryConfig, VariantConfig, slugify};
