//! The validation engine: paginated traversal, dedup, fail-fast verdict.

use crate::catalog;
use crate::criteria::{FilterCriteria, ProductSnapshot};
use crate::detail::DetailViewBridge;
use crate::driver::PageDriver;
use crate::pagination::{LoadSentinel, PageCursor, PageTraversal};
use crate::reporter::StepRecorder;
use crate::result::VitrinaResult;
use crate::validator::ItemValidator;
use std::collections::HashSet;
use tracing::{debug, info};

/// Identity keys of items already validated in the current run.
///
/// Owned exclusively by one engine run; reset at the start of each
/// [`ValidationEngine::check_all_pages_match_filters`] call and never shared
/// across runs or instances.
#[derive(Debug, Clone, Default)]
pub struct CheckedSet {
    keys: HashSet<String>,
}

impl CheckedSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all keys
    pub fn reset(&mut self) {
        self.keys.clear();
    }

    /// Whether a key was already validated
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Record a validated key
    pub fn insert(&mut self, key: String) {
        let _ = self.keys.insert(key);
    }

    /// Number of distinct validated keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether nothing was validated yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Orchestrates traversal and per-item validation into one verdict.
#[derive(Debug, Default)]
pub struct ValidationEngine {
    checked: CheckedSet,
    traversal: PageTraversal,
    load: LoadSentinel,
    validator: ItemValidator,
    bridge: DetailViewBridge,
    violation: Option<String>,
}

impl ValidationEngine {
    /// Create an engine
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate every item on every result page against the criteria.
    ///
    /// Protocol: reset the dedup set, then for each page: focus the
    /// pagination region, wait for content to settle, read all item
    /// snapshots, validate each snapshot not already seen (returning `false`
    /// on the first rejection), record it as checked. Advance via the
    /// next-page control while one is enabled and visible. Advancing the
    /// cursor is the engine's job; [`PageTraversal`] only reports it.
    ///
    /// Returns `true` only if every item on every page passed. After a
    /// `false` verdict, [`Self::violation_message`] describes the item.
    pub fn check_all_pages_match_filters<D: PageDriver + ?Sized>(
        &mut self,
        driver: &D,
        criteria: &FilterCriteria,
        recorder: &dyn StepRecorder,
    ) -> VitrinaResult<bool> {
        self.checked.reset();
        self.violation = None;
        let mut cursor = PageCursor::start();
        info!(criteria = %criteria.describe(), "validating all result pages");

        loop {
            self.traversal.focus_pagination_region(driver)?;
            self.load.await_settled(driver)?;

            let snapshots = self.read_snapshots(driver)?;
            debug!(
                page = cursor.position(),
                items = snapshots.len(),
                "validating page"
            );

            for snapshot in snapshots {
                let key = snapshot.identity_key();
                if self.checked.contains(&key) {
                    continue;
                }
                recorder.step(&format!(
                    "item: {}, price: {}",
                    snapshot.name, snapshot.parsed_price
                ));
                if !self
                    .validator
                    .validate(driver, &snapshot, criteria, &self.bridge)?
                {
                    let message = format!(
                        "item '{}' (price {}) does not match filters: {}",
                        snapshot.name,
                        snapshot.parsed_price,
                        criteria.describe()
                    );
                    recorder.step(&message);
                    self.violation = Some(message);
                    return Ok(false);
                }
                self.checked.insert(key);
            }

            if !self.traversal.has_next_page(driver)? {
                break;
            }
            let Some(control) = self.traversal.next_page_control(driver)? else {
                // Control vanished between the check and the fetch; the
                // traversal is over.
                break;
            };
            driver.click(&control)?;
            cursor.advance();
        }

        info!(
            pages = cursor.position() + 1,
            distinct_items = self.checked.len(),
            "all pages match filters"
        );
        Ok(true)
    }

    /// Whether the current page shows at least `min` item snapshots.
    /// No pagination: counts visible items on this page only.
    pub fn is_minimum_products_page<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        min: usize,
    ) -> VitrinaResult<bool> {
        self.traversal.focus_pagination_region(driver)?;
        self.load.await_settled(driver)?;
        let cards = driver.wait_for_present_all(&catalog::product_names())?;
        for card in &cards {
            driver.wait_until_visible(&card.selector)?;
        }
        debug!(found = cards.len(), required = min, "counted page items");
        Ok(cards.len() >= min)
    }

    /// Name of the first item on the current page, or an empty string when
    /// the page has none. Used to seed the subsequent search scenario.
    pub fn first_product_name<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
    ) -> VitrinaResult<String> {
        driver.scroll_to_top()?;
        self.load.await_settled(driver)?;
        let cards = driver.find_all(&catalog::product_names())?;
        match cards.first() {
            Some(first) => driver.read_text(first),
            None => Ok(String::new()),
        }
    }

    /// Whether any item on the current page contains `name` in its title
    pub fn is_product_present<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        name: &str,
    ) -> VitrinaResult<bool> {
        self.traversal.focus_pagination_region(driver)?;
        self.load.await_settled(driver)?;
        let cards = driver.wait_for_present_all(&catalog::product_names())?;
        for card in &cards {
            if driver.read_text(card)?.contains(name) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Description of the first violating item from the last run, if the
    /// last run returned `false`
    #[must_use]
    pub fn violation_message(&self) -> Option<&str> {
        self.violation.as_deref()
    }

    /// Number of distinct items validated in the last run
    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    /// Read all item snapshots on the current page.
    ///
    /// Names and prices are parallel lists in document order; a missing
    /// price node yields an empty raw text (and so an unparseable price).
    fn read_snapshots<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
    ) -> VitrinaResult<Vec<ProductSnapshot>> {
        let names = driver.wait_for_present_all(&catalog::product_names())?;
        let prices = driver.find_all(&catalog::product_prices())?;

        let mut snapshots = Vec::with_capacity(names.len());
        for (index, name_ref) in names.iter().enumerate() {
            let name = driver.read_text(name_ref)?;
            let raw_price = match prices.get(index) {
                Some(price_ref) => driver.read_text(price_ref)?,
                None => String::new(),
            };
            snapshots.push(ProductSnapshot::new(name, raw_price));
        }
        Ok(snapshots)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::{ScriptedCatalog, ScriptedItem};
    use crate::reporter::{MemoryRecorder, NullRecorder};

    fn criteria() -> FilterCriteria {
        FilterCriteria::new(30_000, 90_000)
            .unwrap()
            .with_brands(["Lenovo", "HP"])
    }

    mod checked_set_tests {
        use super::*;

        #[test]
        fn test_dedup_counts_distinct_keys() {
            let mut set = CheckedSet::new();
            set.insert("a_1".to_string());
            set.insert("a_1".to_string());
            set.insert("b_2".to_string());
            assert_eq!(set.len(), 2);
            assert!(set.contains("a_1"));
        }

        #[test]
        fn test_reset_clears() {
            let mut set = CheckedSet::new();
            set.insert("a_1".to_string());
            set.reset();
            assert!(set.is_empty());
        }
    }

    mod single_page_tests {
        use super::*;

        #[test]
        fn test_compliant_page_passes() {
            let driver = ScriptedCatalog::builder()
                .page(vec![ScriptedItem::new("Lenovo IdeaPad 3", "Цена 45 990 ₽")])
                .build();
            let mut engine = ValidationEngine::new();
            let verdict = engine
                .check_all_pages_match_filters(&driver, &criteria(), &NullRecorder)
                .unwrap();
            assert!(verdict);
            assert_eq!(engine.checked_count(), 1);
            assert!(engine.violation_message().is_none());
        }

        #[test]
        fn test_fail_fast_skips_later_items() {
            // [pass, fail, pass]; the third would need a detail view, so an
            // empty detail-open log proves it was never evaluated.
            let driver = ScriptedCatalog::builder()
                .page(vec![
                    ScriptedItem::new("Lenovo IdeaPad 3", "Цена 45 990 ₽"),
                    ScriptedItem::new("Acer Aspire 5", "Цена 49 990 ₽"),
                    ScriptedItem::new("IdeaPad Slim 5", "Цена 52 990 ₽"),
                ])
                .detail_brand("Acer Aspire 5", "Acer")
                .detail_brand("IdeaPad Slim 5", "Lenovo")
                .build();
            let recorder = MemoryRecorder::new();
            let mut engine = ValidationEngine::new();
            let verdict = engine
                .check_all_pages_match_filters(&driver, &criteria(), &recorder)
                .unwrap();
            assert!(!verdict);
            assert_eq!(engine.checked_count(), 1);
            // Only the violating item's detail view was opened.
            assert_eq!(driver.detail_opens(), vec!["Acer Aspire 5".to_string()]);
            let messages = recorder.messages();
            assert!(messages.iter().any(|m| m.contains("Acer Aspire 5")));
            assert!(!messages.iter().any(|m| m.contains("IdeaPad Slim 5")));
            assert!(engine
                .violation_message()
                .unwrap()
                .contains("Acer Aspire 5"));
        }

        #[test]
        fn test_duplicate_items_counted_once() {
            let driver = ScriptedCatalog::builder()
                .page(vec![
                    ScriptedItem::new("Lenovo IdeaPad 3", "Цена 45 990 ₽"),
                    ScriptedItem::new("Lenovo IdeaPad 3", "Цена 45 990 ₽"),
                    ScriptedItem::new("HP Pavilion 15", "Цена 60 000 ₽"),
                ])
                .build();
            let mut engine = ValidationEngine::new();
            let verdict = engine
                .check_all_pages_match_filters(&driver, &criteria(), &NullRecorder)
                .unwrap();
            assert!(verdict);
            assert_eq!(engine.checked_count(), 2);
        }

        #[test]
        fn test_price_violation_reports_message() {
            let driver = ScriptedCatalog::builder()
                .page(vec![ScriptedItem::new("Lenovo IdeaPad 3", "Цена 25 000 ₽")])
                .build();
            let mut engine = ValidationEngine::new();
            let verdict = engine
                .check_all_pages_match_filters(&driver, &criteria(), &NullRecorder)
                .unwrap();
            assert!(!verdict);
            let message = engine.violation_message().unwrap();
            assert!(message.contains("Lenovo IdeaPad 3"));
            assert!(message.contains("25000"));
        }

        #[test]
        fn test_checked_set_reset_between_runs() {
            let driver = ScriptedCatalog::builder()
                .page(vec![ScriptedItem::new("Lenovo IdeaPad 3", "Цена 45 990 ₽")])
                .build();
            let mut engine = ValidationEngine::new();
            for _ in 0..2 {
                let verdict = engine
                    .check_all_pages_match_filters(&driver, &criteria(), &NullRecorder)
                    .unwrap();
                assert!(verdict);
                assert_eq!(engine.checked_count(), 1);
            }
        }
    }

    mod multi_page_tests {
        use super::*;

        #[test]
        fn test_every_page_is_validated() {
            let driver = ScriptedCatalog::builder()
                .page(vec![ScriptedItem::new("Lenovo IdeaPad 3", "Цена 45 990 ₽")])
                .page(vec![ScriptedItem::new("HP Pavilion 15", "Цена 60 000 ₽")])
                .page(vec![ScriptedItem::new("Lenovo Legion 5", "Цена 89 990 ₽")])
                .build();
            let mut engine = ValidationEngine::new();
            let verdict = engine
                .check_all_pages_match_filters(&driver, &criteria(), &NullRecorder)
                .unwrap();
            assert!(verdict);
            assert_eq!(engine.checked_count(), 3);
            // The traversal ended on the last page.
            assert_eq!(driver.current_page_index(), 2);
        }

        #[test]
        fn test_violation_on_later_page_fails_run() {
            let driver = ScriptedCatalog::builder()
                .page(vec![ScriptedItem::new("Lenovo IdeaPad 3", "Цена 45 990 ₽")])
                .page(vec![ScriptedItem::new("Lenovo Legion 5", "Цена 99 990 ₽")])
                .build();
            let mut engine = ValidationEngine::new();
            let verdict = engine
                .check_all_pages_match_filters(&driver, &criteria(), &NullRecorder)
                .unwrap();
            assert!(!verdict);
            assert!(engine.violation_message().unwrap().contains("Legion 5"));
        }

        #[test]
        fn test_dedup_spans_pages() {
            // The same item is rendered on both pages (e.g. a sponsored
            // repeat); it is validated once.
            let recorder = MemoryRecorder::new();
            let driver = ScriptedCatalog::builder()
                .page(vec![ScriptedItem::new("Lenovo IdeaPad 3", "Цена 45 990 ₽")])
                .page(vec![
                    ScriptedItem::new("Lenovo IdeaPad 3", "Цена 45 990 ₽"),
                    ScriptedItem::new("HP Pavilion 15", "Цена 60 000 ₽"),
                ])
                .build();
            let mut engine = ValidationEngine::new();
            let verdict = engine
                .check_all_pages_match_filters(&driver, &criteria(), &recorder)
                .unwrap();
            assert!(verdict);
            assert_eq!(engine.checked_count(), 2);
            let ideapad_steps = recorder
                .messages()
                .iter()
                .filter(|m| m.contains("IdeaPad 3"))
                .count();
            assert_eq!(ideapad_steps, 1);
        }
    }

    mod page_query_tests {
        use super::*;

        #[test]
        fn test_minimum_count_met() {
            let items: Vec<ScriptedItem> = (0..10)
                .map(|i| ScriptedItem::new(format!("Lenovo {i}"), "40 000"))
                .collect();
            let driver = ScriptedCatalog::builder().page(items).build();
            let engine = ValidationEngine::new();
            assert!(engine.is_minimum_products_page(&driver, 10).unwrap());
        }

        #[test]
        fn test_minimum_count_not_met() {
            let items: Vec<ScriptedItem> = (0..8)
                .map(|i| ScriptedItem::new(format!("Lenovo {i}"), "40 000"))
                .collect();
            let driver = ScriptedCatalog::builder().page(items).build();
            let engine = ValidationEngine::new();
            assert!(!engine.is_minimum_products_page(&driver, 10).unwrap());
        }

        #[test]
        fn test_first_product_name() {
            let driver = ScriptedCatalog::builder()
                .page(vec![
                    ScriptedItem::new("Lenovo IdeaPad 3", "Цена 45 990 ₽"),
                    ScriptedItem::new("HP Pavilion 15", "Цена 60 000 ₽"),
                ])
                .build();
            let engine = ValidationEngine::new();
            assert_eq!(
                engine.first_product_name(&driver).unwrap(),
                "Lenovo IdeaPad 3"
            );
        }

        #[test]
        fn test_first_product_name_empty_page() {
            let driver = ScriptedCatalog::builder().page(Vec::new()).build();
            let engine = ValidationEngine::new();
            assert_eq!(engine.first_product_name(&driver).unwrap(), "");
        }

        #[test]
        fn test_product_presence() {
            let driver = ScriptedCatalog::builder()
                .page(vec![ScriptedItem::new("Lenovo IdeaPad 3 15IAU7", "45 990")])
                .build();
            let engine = ValidationEngine::new();
            assert!(engine
                .is_product_present(&driver, "Lenovo IdeaPad 3")
                .unwrap());
            assert!(!engine
                .is_product_present(&driver, "HP Pavilion")
                .unwrap());
        }
    }

    mod end_to_end_property {
        use super::*;

        #[test]
        fn test_canonical_scenario_from_properties() {
            // criteria {30000, 90000, [Lenovo, HP]}, one item
            // "Lenovo IdeaPad 3" / "Цена 45 990 ₽": parses to 45990, passes
            // price and name-brand tiers, engine returns true with one key.
            let driver = ScriptedCatalog::builder()
                .page(vec![ScriptedItem::new("Lenovo IdeaPad 3", "Цена 45 990 ₽")])
                .build();
            let mut engine = ValidationEngine::new();
            let verdict = engine
                .check_all_pages_match_filters(&driver, &criteria(), &NullRecorder)
                .unwrap();
            assert!(verdict);
            assert_eq!(engine.checked_count(), 1);
            assert!(driver.detail_opens().is_empty());
        }
    }
}
