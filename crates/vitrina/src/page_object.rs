//! Page objects for the marketplace flows.
//!
//! Thin plumbing over [`PageDriver`]: the home page with its catalog menu,
//! the filtered listing page, and the search-result listing. All decision
//! logic stays in the engine; these encapsulate element choreography.

use crate::catalog;
use crate::driver::PageDriver;
use crate::engine::ValidationEngine;
use crate::pagination::LoadSentinel;
use crate::reporter::StepRecorder;
use crate::result::VitrinaResult;
use crate::wait::UrlPattern;
use tracing::debug;

/// Trait for page objects representing a page or component in the UI.
pub trait PageObject {
    /// URL pattern that matches this page (e.g., "/catalog")
    fn url_pattern(&self) -> &str;

    /// Check if the page is fully loaded and ready for interaction
    fn is_loaded(&self) -> bool {
        true
    }

    /// Get the page name for logging/debugging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

// =============================================================================
// HOME PAGE + CATALOG MENU
// =============================================================================

/// The marketplace home page and its catalog menu
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeCatalog;

impl PageObject for HomeCatalog {
    fn url_pattern(&self) -> &str {
        "/"
    }
}

impl HomeCatalog {
    /// Create the page object
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Open the marketplace base URL
    pub fn open<D: PageDriver + ?Sized>(&self, driver: &D, base_url: &str) -> VitrinaResult<()> {
        debug!(url = base_url, "opening marketplace home page");
        driver.navigate(base_url)
    }

    /// Open the catalog menu
    pub fn open_catalog<D: PageDriver + ?Sized>(&self, driver: &D) -> VitrinaResult<()> {
        let button = driver.wait_until_visible(&catalog::catalog_button())?;
        driver.click(&button)
    }

    /// Hover a category, then click a subcategory inside its panel
    pub fn navigate<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        category: &str,
        subcategory: &str,
    ) -> VitrinaResult<()> {
        debug!(category, subcategory, "navigating catalog");
        let category_entry = driver.wait_until_visible(&catalog::category_entry(category))?;
        driver.hover(&category_entry)?;
        let subcategory_entry =
            driver.wait_until_clickable(&catalog::subcategory_entry(subcategory))?;
        driver.click(&subcategory_entry)
    }
}

// =============================================================================
// FILTERED LISTING PAGE
// =============================================================================

/// The listing page reached after catalog navigation, with its filter block
/// and header search
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductListing;

impl PageObject for ProductListing {
    fn url_pattern(&self) -> &str {
        "/catalog"
    }
}

impl ProductListing {
    /// Create the page object
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Whether the section title contains the given text
    pub fn is_title_contains<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        text: &str,
    ) -> VitrinaResult<bool> {
        let title = driver.wait_until_visible(&catalog::page_title())?;
        Ok(driver.read_text(&title)?.contains(text))
    }

    /// Type the inclusive price range into the filter inputs
    pub fn filter_by_price<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        min: u64,
        max: u64,
        recorder: &dyn StepRecorder,
    ) -> VitrinaResult<()> {
        recorder.step(&format!("filter by price: {min}..{max}"));
        let min_input = driver.wait_until_visible(&catalog::min_price_input())?;
        driver.click(&min_input)?;
        driver.type_text(&min_input, &min.to_string())?;
        let max_input = driver.wait_until_visible(&catalog::max_price_input())?;
        driver.click(&max_input)?;
        driver.type_text(&max_input, &max.to_string())
    }

    /// Select every brand checkbox, then wait for the listing to settle
    pub fn filter_by_brands<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        brands: &[String],
        recorder: &dyn StepRecorder,
    ) -> VitrinaResult<()> {
        for brand in brands {
            recorder.step(&format!("filter by brand: {brand}"));
            self.filter_by_brand(driver, brand)?;
        }
        LoadSentinel::new().await_settled(driver)
    }

    /// Select one brand checkbox. Falls back to expanding the brand block
    /// and searching its input when the option is not in the short list.
    pub fn filter_by_brand<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        brand: &str,
    ) -> VitrinaResult<()> {
        if self.select_brand_from_list(driver, brand)? {
            return Ok(());
        }
        self.show_all_brands(driver)?;
        self.search_and_select_brand(driver, brand)
    }

    fn select_brand_from_list<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        brand: &str,
    ) -> VitrinaResult<bool> {
        for option in driver.find_all(&catalog::brand_option(brand))? {
            if driver.read_text(&option)?.eq_ignore_ascii_case(brand) {
                driver.click(&option)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn show_all_brands<D: PageDriver + ?Sized>(&self, driver: &D) -> VitrinaResult<()> {
        let controls = driver.find_all(&catalog::brand_show_more())?;
        if let Some(control) = controls.first() {
            if driver.is_visible(control)? {
                return driver.click(control);
            }
        }
        debug!("brand show-more control not available");
        Ok(())
    }

    fn search_and_select_brand<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        brand: &str,
    ) -> VitrinaResult<()> {
        let options = driver.find_all(&catalog::brand_option(brand))?;
        if let Some(option) = options.first() {
            if driver.is_visible(option)? {
                let option = driver.wait_until_clickable(&catalog::brand_option(brand))?;
                return driver.click(&option);
            }
        }
        let input = driver.wait_until_visible(&catalog::brand_search_input())?;
        driver.click(&input)?;
        driver.type_text(&input, brand)?;
        let found = driver.wait_until_clickable(&catalog::brand_option(brand))?;
        driver.click(&found)
    }

    /// Remember the first product name and search for it.
    ///
    /// Returns the remembered name so the caller can verify the results.
    pub fn search_for_product<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        engine: &ValidationEngine,
        recorder: &dyn StepRecorder,
    ) -> VitrinaResult<String> {
        let name = engine.first_product_name(driver)?;
        recorder.step(&format!("searching for remembered item: {name}"));
        let input = driver.wait_until_visible(&catalog::search_input())?;
        driver.type_text(&input, &name)?;
        let button = driver.wait_until_clickable(&catalog::search_button())?;
        driver.click(&button)?;
        driver.wait_until_url_matches(&UrlPattern::Contains("search".to_string()))?;
        Ok(name)
    }
}

// =============================================================================
// SEARCH RESULT LISTING
// =============================================================================

/// The listing shown after a header search
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchResults;

impl PageObject for SearchResults {
    fn url_pattern(&self) -> &str {
        "/search"
    }
}

impl SearchResults {
    /// Create the page object
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Whether the first result page contains the remembered item
    pub fn is_product_present_in_results<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        engine: &ValidationEngine,
        name: &str,
    ) -> VitrinaResult<bool> {
        engine.is_product_present(driver, name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::{ScriptedCatalog, ScriptedItem};
    use crate::reporter::NullRecorder;

    fn listing_driver() -> ScriptedCatalog {
        ScriptedCatalog::builder()
            .page(vec![
                ScriptedItem::new("Lenovo IdeaPad 3", "Цена 45 990 ₽"),
                ScriptedItem::new("HP Pavilion 15", "Цена 60 000 ₽"),
            ])
            .title("Ноутбуки")
            .visible_brand_options(["Lenovo"])
            .hidden_brand_options(["HP"])
            .build()
    }

    mod home_tests {
        use super::*;

        #[test]
        fn test_open_catalog_and_navigate() {
            let driver = ScriptedCatalog::builder()
                .page(vec![ScriptedItem::new("Lenovo IdeaPad 3", "45 990")])
                .start_at_home()
                .build();
            let home = HomeCatalog::new();
            home.open(&driver, "https://market.example").unwrap();
            home.open_catalog(&driver).unwrap();
            home.navigate(&driver, "Ноутбуки и компьютеры", "Ноутбуки")
                .unwrap();
            assert_eq!(
                driver.navigated(),
                Some((
                    "Ноутбуки и компьютеры".to_string(),
                    "Ноутбуки".to_string()
                ))
            );
        }

        #[test]
        fn test_page_object_metadata() {
            assert_eq!(HomeCatalog::new().url_pattern(), "/");
            assert!(HomeCatalog::new().is_loaded());
            assert!(HomeCatalog::new().page_name().contains("HomeCatalog"));
        }
    }

    mod listing_tests {
        use super::*;

        #[test]
        fn test_title_containment() {
            let driver = listing_driver();
            let listing = ProductListing::new();
            assert!(listing.is_title_contains(&driver, "Ноутбуки").unwrap());
            assert!(!listing.is_title_contains(&driver, "Телефоны").unwrap());
        }

        #[test]
        fn test_price_filter_types_both_bounds() {
            let driver = listing_driver();
            ProductListing::new()
                .filter_by_price(&driver, 30_000, 90_000, &NullRecorder)
                .unwrap();
            let log = driver.filter_log();
            assert_eq!(log.min_price.as_deref(), Some("30000"));
            assert_eq!(log.max_price.as_deref(), Some("90000"));
        }

        #[test]
        fn test_brand_filter_direct_selection() {
            let driver = listing_driver();
            ProductListing::new()
                .filter_by_brand(&driver, "Lenovo")
                .unwrap();
            assert_eq!(driver.filter_log().brands, vec!["Lenovo".to_string()]);
        }

        #[test]
        fn test_brand_filter_falls_back_to_show_more() {
            let driver = listing_driver();
            // HP is hidden behind show-more.
            ProductListing::new().filter_by_brand(&driver, "HP").unwrap();
            assert_eq!(driver.filter_log().brands, vec!["HP".to_string()]);
        }

        #[test]
        fn test_filter_by_brands_selects_all() {
            let driver = listing_driver();
            let brands = vec!["Lenovo".to_string(), "HP".to_string()];
            ProductListing::new()
                .filter_by_brands(&driver, &brands, &NullRecorder)
                .unwrap();
            assert_eq!(driver.filter_log().brands, brands);
        }

        #[test]
        fn test_search_for_product_remembers_first_name() {
            let driver = listing_driver();
            let engine = ValidationEngine::new();
            let name = ProductListing::new()
                .search_for_product(&driver, &engine, &NullRecorder)
                .unwrap();
            assert_eq!(name, "Lenovo IdeaPad 3");
            assert_eq!(driver.submitted_query(), Some(name));
        }
    }

    mod search_results_tests {
        use super::*;

        #[test]
        fn test_remembered_item_found_in_results() {
            let driver = listing_driver();
            let engine = ValidationEngine::new();
            let listing = ProductListing::new();
            let name = listing
                .search_for_product(&driver, &engine, &NullRecorder)
                .unwrap();
            let results = SearchResults::new();
            assert!(results
                .is_product_present_in_results(&driver, &engine, &name)
                .unwrap());
        }

        #[test]
        fn test_missing_item_not_found() {
            let driver = ScriptedCatalog::builder()
                .page(vec![ScriptedItem::new("Lenovo IdeaPad 3", "45 990")])
                .search_results(vec![ScriptedItem::new("Другой товар", "10 000")])
                .build();
            let engine = ValidationEngine::new();
            let listing = ProductListing::new();
            let name = listing
                .search_for_product(&driver, &engine, &NullRecorder)
                .unwrap();
            let results = SearchResults::new();
            assert!(!results
                .is_product_present_in_results(&driver, &engine, &name)
                .unwrap());
        }
    }
}
