//! Scenario configuration.
//!
//! A read-only structure loaded from a TOML profile. The profile path comes
//! from the `VITRINA_PROFILE` environment variable when set, falling back to
//! `tests.toml` in the working directory, falling back to built-in defaults
//! when neither exists.

use crate::criteria::{FilterCriteria, ZeroPricePolicy};
use crate::result::VitrinaResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the profile file to load
pub const PROFILE_ENV_VAR: &str = "VITRINA_PROFILE";

/// Default profile file name
pub const DEFAULT_PROFILE: &str = "tests.toml";

/// Configuration of one validation scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Marketplace base URL
    pub base_url: String,
    /// Implicit wait in seconds (element lookup slack)
    pub implicit_wait_secs: u64,
    /// Explicit wait in seconds (bound for blocking waits)
    pub explicit_wait_secs: u64,
    /// Catalog category to open
    pub category: String,
    /// Catalog subcategory to open
    pub subcategory: String,
    /// Minimum price filter
    pub price_min: u64,
    /// Maximum price filter
    pub price_max: u64,
    /// Brands to filter by, in order
    pub brands: Vec<String>,
    /// Minimum number of items expected on the first page
    pub min_products_on_page: usize,
    /// How a parsed price of zero is treated
    pub zero_price: ZeroPricePolicy,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            base_url: "https://market.yandex.ru".to_string(),
            implicit_wait_secs: 5,
            explicit_wait_secs: 30,
            category: "Ноутбуки и компьютеры".to_string(),
            subcategory: "Ноутбуки".to_string(),
            price_min: 30_000,
            price_max: 90_000,
            brands: vec!["Lenovo".to_string(), "HP".to_string()],
            min_products_on_page: 10,
            zero_price: ZeroPricePolicy::Lenient,
        }
    }
}

impl ScenarioConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> VitrinaResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Load the active profile: `VITRINA_PROFILE` if set, else
    /// `tests.toml` if present, else defaults.
    pub fn load_active() -> VitrinaResult<Self> {
        if let Ok(profile) = std::env::var(PROFILE_ENV_VAR) {
            return Self::load(profile);
        }
        if Path::new(DEFAULT_PROFILE).exists() {
            return Self::load(DEFAULT_PROFILE);
        }
        Ok(Self::default())
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the price range
    #[must_use]
    pub const fn with_price_range(mut self, min: u64, max: u64) -> Self {
        self.price_min = min;
        self.price_max = max;
        self
    }

    /// Set the brand list
    #[must_use]
    pub fn with_brands<I, S>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brands = brands.into_iter().map(Into::into).collect();
        self
    }

    /// Set category and subcategory
    #[must_use]
    pub fn with_catalog_path(
        mut self,
        category: impl Into<String>,
        subcategory: impl Into<String>,
    ) -> Self {
        self.category = category.into();
        self.subcategory = subcategory.into();
        self
    }

    /// Set the minimum first-page item count
    #[must_use]
    pub const fn with_min_products(mut self, min: usize) -> Self {
        self.min_products_on_page = min;
        self
    }

    /// Set the explicit wait bound
    #[must_use]
    pub const fn with_explicit_wait_secs(mut self, secs: u64) -> Self {
        self.explicit_wait_secs = secs;
        self
    }

    /// Set the zero-price policy
    #[must_use]
    pub const fn with_zero_price_policy(mut self, policy: ZeroPricePolicy) -> Self {
        self.zero_price = policy;
        self
    }

    /// Explicit wait bound as a duration
    #[must_use]
    pub const fn explicit_wait(&self) -> Duration {
        Duration::from_secs(self.explicit_wait_secs)
    }

    /// Implicit wait (element lookup slack) as a duration
    #[must_use]
    pub const fn implicit_wait(&self) -> Duration {
        Duration::from_secs(self.implicit_wait_secs)
    }

    /// Build the filter criteria this configuration describes
    pub fn criteria(&self) -> VitrinaResult<FilterCriteria> {
        Ok(FilterCriteria::new(self.price_min, self.price_max)?
            .with_brands(self.brands.iter().cloned())
            .with_zero_price_policy(self.zero_price))
    }
}
