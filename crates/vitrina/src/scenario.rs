//! The end-to-end filter-and-search scenario.
//!
//! Opens the catalog, navigates to the configured section, applies the price
//! and brand filters, validates every result page, then searches for the
//! remembered first item and verifies it is found again. Boolean verdicts
//! from the engine become assertion failures with descriptive messages here;
//! infrastructure errors pass through untouched.

use crate::assertion::{ensure, ensure_with};
use crate::config::ScenarioConfig;
use crate::driver::PageDriver;
use crate::engine::ValidationEngine;
use crate::page_object::{HomeCatalog, ProductListing, SearchResults};
use crate::reporter::StepRecorder;
use crate::result::VitrinaResult;
use tracing::info;

/// Runs the complete filter-validation scenario over a page driver
#[derive(Debug, Clone)]
pub struct FilterScenario {
    config: ScenarioConfig,
}

impl FilterScenario {
    /// Create a scenario from configuration
    #[must_use]
    pub const fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    /// The scenario's configuration
    #[must_use]
    pub const fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Run the scenario to completion.
    ///
    /// # Errors
    ///
    /// [`crate::result::VitrinaError::AssertionFailed`] on the first
    /// violated expectation; timeouts and context failures propagate as-is.
    pub fn run<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        recorder: &dyn StepRecorder,
    ) -> VitrinaResult<()> {
        let config = &self.config;
        let criteria = config.criteria()?;
        info!(section = %config.subcategory, "starting filter scenario");

        let home = HomeCatalog::new();
        recorder.step("opening marketplace home page");
        home.open(driver, &config.base_url)?;
        recorder.step("opening catalog menu");
        home.open_catalog(driver)?;
        recorder.step(&format!(
            "navigating to {} / {}",
            config.category, config.subcategory
        ));
        home.navigate(driver, &config.category, &config.subcategory)?;

        let listing = ProductListing::new();
        ensure_with(
            listing.is_title_contains(driver, &config.subcategory)?,
            || format!("wrong section: the title must contain '{}'", config.subcategory),
        )?;

        listing.filter_by_price(driver, config.price_min, config.price_max, recorder)?;
        listing.filter_by_brands(driver, &config.brands, recorder)?;

        let mut engine = ValidationEngine::new();
        ensure_with(
            engine.is_minimum_products_page(driver, config.min_products_on_page)?,
            || {
                format!(
                    "fewer than {} items on the first page",
                    config.min_products_on_page
                )
            },
        )?;

        let all_match = engine.check_all_pages_match_filters(driver, &criteria, recorder)?;
        if !all_match {
            let message = engine
                .violation_message()
                .map_or_else(
                    || format!("an item does not match filters: {}", criteria.describe()),
                    ToString::to_string,
                );
            return ensure(false, message);
        }

        let remembered = listing.search_for_product(driver, &engine, recorder)?;
        let results = SearchResults::new();
        ensure_with(
            results.is_product_present_in_results(driver, &engine, &remembered)?,
            || {
                format!(
                    "search results on the first page must contain the item: {remembered}"
                )
            },
        )?;

        recorder.step("scenario passed");
        info!("filter scenario passed");
        Ok(())
    }
}
