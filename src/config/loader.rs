//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading application
//! settings and country tax rule sets from YAML files.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::calculation::validate_rules;
use crate::error::{EngineError, EngineResult};

use super::types::{AppConfig, CountryConfig, VariantConfig};

/// Loads and provides access to country configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides lookups by country id and variant slug. Every rule set is
/// validated at load time, so a loaded configuration never fails a
/// calculation on rule shape.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── app.yaml          # Application name and share URI
/// └── countries/
///     ├── au.yaml       # One file per country
///     └── gb.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use earnings_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// let variant = loader.get_variant("gb", "standard").unwrap();
/// println!("{} rules", variant.rules.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    app: AppConfig,
    countries: BTreeMap<String, CountryConfig>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `app.yaml` or the `countries` directory is missing, or holds no countries
    /// - Any file contains invalid YAML
    /// - Two countries share an id, or two variants of one country share a slug
    /// - Any rule set fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let app = Self::load_yaml::<AppConfig>(&path.join("app.yaml"))?;
        let countries = Self::load_countries(&path.join("countries"))?;

        Ok(Self { app, countries })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all country files from the countries directory.
    fn load_countries(countries_dir: &Path) -> EngineResult<BTreeMap<String, CountryConfig>> {
        let countries_dir_str = countries_dir.display().to_string();

        let entries = fs::read_dir(countries_dir).map_err(|_| EngineError::ConfigNotFound {
            path: countries_dir_str.clone(),
        })?;

        let mut countries = BTreeMap::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: countries_dir_str.clone(),
            })?;

            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "yaml" || ext == "yml") {
                continue;
            }

            let country = Self::load_yaml::<CountryConfig>(&path)?;
            Self::check_variants(&path, &country.variants)?;

            let path_str = path.display().to_string();
            if countries.contains_key(&country.id) {
                return Err(EngineError::ConfigParseError {
                    path: path_str,
                    message: format!("duplicate country id '{}'", country.id),
                });
            }
            countries.insert(country.id.clone(), country);
        }

        if countries.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no country files found)", countries_dir_str),
            });
        }

        Ok(countries)
    }

    fn check_variants(path: &Path, variants: &[VariantConfig]) -> EngineResult<()> {
        let mut slugs = HashSet::new();

        for variant in variants {
            let slug = variant.slug();
            if slug.is_empty() || !slugs.insert(slug.clone()) {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!(
                        "variant '{}' has an empty or duplicate slug '{}'",
                        variant.name, slug
                    ),
                });
            }
            validate_rules(&variant.rules)?;
        }

        Ok(())
    }

    /// Returns the application settings.
    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// Returns every country, ordered by id.
    pub fn countries(&self) -> impl Iterator<Item = &CountryConfig> {
        self.countries.values()
    }

    /// Gets a country by its id.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use earnings_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config")?;
    /// let country = loader.get_country("gb")?;
    /// println!("{} {}", country.flag, country.name);
    /// # Ok::<(), earnings_engine::error::EngineError>(())
    /// ```
    pub fn get_country(&self, id: &str) -> EngineResult<&CountryConfig> {
        self.countries
            .get(id)
            .ok_or_else(|| EngineError::CountryNotFound { id: id.to_string() })
    }

    /// Gets a variant of a country by its slug.
    pub fn get_variant(&self, country: &str, slug: &str) -> EngineResult<&VariantConfig> {
        self.get_country(country)?
            .variant(slug)
            .ok_or_else(|| EngineError::VariantNotFound {
                country: country.to_string(),
                variant: slug.to_string(),
            })
    }
}
