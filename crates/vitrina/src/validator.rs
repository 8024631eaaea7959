//! Per-item filter validation.

use crate::criteria::{FilterCriteria, ProductSnapshot, ZeroPricePolicy};
use crate::detail::DetailViewBridge;
use crate::driver::PageDriver;
use crate::result::VitrinaResult;
use tracing::debug;

/// Decides whether one item snapshot satisfies the active filter criteria.
///
/// Price first, with a short-circuit: an out-of-range price rejects the item
/// without any brand work. The brand check is two-tier: a cheap
/// case-insensitive name-containment pass, then the detail-view fallback via
/// [`DetailViewBridge`] only when the name reveals nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemValidator;

impl ItemValidator {
    /// Create a validator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validate one snapshot against the criteria.
    ///
    /// Returns `Ok(false)` for logical rejections (price out of range, brand
    /// unverifiable or mismatched, detail link unresolvable). Infrastructure
    /// errors (timeouts, context failures) propagate.
    pub fn validate<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        item: &ProductSnapshot,
        criteria: &FilterCriteria,
        bridge: &DetailViewBridge,
    ) -> VitrinaResult<bool> {
        if criteria.zero_price_policy() == ZeroPricePolicy::Strict && item.parsed_price == 0 {
            debug!(item = %item.name, "rejected: zero price under strict policy");
            return Ok(false);
        }

        if !criteria.price_in_range(item.parsed_price) {
            debug!(
                item = %item.name,
                price = item.parsed_price,
                "rejected: price out of range"
            );
            return Ok(false);
        }

        if criteria.matches_brand_name(&item.name) {
            return Ok(true);
        }

        match bridge.resolve_brand(driver, &item.name) {
            Ok(lookup) => {
                if lookup.is_empty() {
                    debug!(item = %item.name, "rejected: no brand metadata in detail view");
                    return Ok(false);
                }
                Ok(criteria.brand_equals(lookup.brand()))
            }
            Err(err) if err.is_lookup_miss() => {
                debug!(item = %item.name, "rejected: detail link not resolvable");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::criteria::FilterCriteria;
    use crate::mock::{ScriptedCatalog, ScriptedItem};

    fn criteria() -> FilterCriteria {
        FilterCriteria::new(30_000, 90_000)
            .unwrap()
            .with_brands(["Lenovo", "HP"])
    }

    fn empty_driver() -> ScriptedCatalog {
        ScriptedCatalog::builder().page(Vec::new()).build()
    }

    fn validate_item(driver: &ScriptedCatalog, item: &ProductSnapshot) -> bool {
        ItemValidator::new()
            .validate(driver, item, &criteria(), &DetailViewBridge::new())
            .unwrap()
    }

    #[test]
    fn test_price_below_range_rejected_without_brand_check() {
        let driver = empty_driver();
        let item = ProductSnapshot::new("Lenovo IdeaPad 3", "Цена 29 999 ₽");
        assert!(!validate_item(&driver, &item));
        // Short-circuit: no detail view was opened.
        assert!(driver.detail_opens().is_empty());
    }

    #[test]
    fn test_price_boundaries_inclusive() {
        let driver = empty_driver();
        assert!(validate_item(
            &driver,
            &ProductSnapshot::new("Lenovo A", "30 000")
        ));
        assert!(validate_item(
            &driver,
            &ProductSnapshot::new("Lenovo B", "90 000")
        ));
        assert!(!validate_item(
            &driver,
            &ProductSnapshot::new("Lenovo C", "29 999")
        ));
        assert!(!validate_item(
            &driver,
            &ProductSnapshot::new("Lenovo D", "90 001")
        ));
    }

    #[test]
    fn test_name_containment_skips_detail_view() {
        let driver = empty_driver();
        let item = ProductSnapshot::new("Lenovo IdeaPad 3", "Цена 45 990 ₽");
        assert!(validate_item(&driver, &item));
        assert!(driver.detail_opens().is_empty());
    }

    #[test]
    fn test_fallback_resolves_brand_via_detail_view() {
        let driver = ScriptedCatalog::builder()
            .page(vec![ScriptedItem::new("IdeaPad 3", "Цена 45 990 ₽")])
            .detail_brand("IdeaPad 3", "Lenovo")
            .build();
        let item = ProductSnapshot::new("IdeaPad 3", "Цена 45 990 ₽");
        assert!(validate_item(&driver, &item));
        assert_eq!(driver.detail_opens(), vec!["IdeaPad 3".to_string()]);
    }

    #[test]
    fn test_fallback_brand_equality_is_exact() {
        // Detail view says "Lenovo Group"; containment is not enough here.
        let driver = ScriptedCatalog::builder()
            .page(vec![ScriptedItem::new("IdeaPad 3", "Цена 45 990 ₽")])
            .detail_brand("IdeaPad 3", "Lenovo Group")
            .build();
        let item = ProductSnapshot::new("IdeaPad 3", "Цена 45 990 ₽");
        assert!(!validate_item(&driver, &item));
    }

    #[test]
    fn test_fallback_brand_case_insensitive() {
        let driver = ScriptedCatalog::builder()
            .page(vec![ScriptedItem::new("IdeaPad 3", "Цена 45 990 ₽")])
            .detail_brand("IdeaPad 3", "LENOVO")
            .build();
        let item = ProductSnapshot::new("IdeaPad 3", "Цена 45 990 ₽");
        assert!(validate_item(&driver, &item));
    }

    #[test]
    fn test_unresolvable_link_rejects_instead_of_crashing() {
        // The listing has no link for this item at all.
        let driver = empty_driver();
        let item = ProductSnapshot::new("IdeaPad 3", "Цена 45 990 ₽");
        assert!(!validate_item(&driver, &item));
    }

    #[test]
    fn test_empty_detail_brand_rejects() {
        let driver = ScriptedCatalog::builder()
            .page(vec![ScriptedItem::new("IdeaPad 3", "Цена 45 990 ₽")])
            .detail_brand("IdeaPad 3", "")
            .build();
        let item = ProductSnapshot::new("IdeaPad 3", "Цена 45 990 ₽");
        assert!(!validate_item(&driver, &item));
    }

    #[test]
    fn test_zero_price_lenient_vs_strict() {
        let driver = empty_driver();
        let free = ProductSnapshot::new("Lenovo Freebie", "—");
        assert_eq!(free.parsed_price, 0);

        // Lenient: 0 takes the normal range check (and fails it here).
        let lenient = FilterCriteria::new(30_000, 90_000)
            .unwrap()
            .with_brand("Lenovo");
        let verdict = ItemValidator::new()
            .validate(&driver, &free, &lenient, &DetailViewBridge::new())
            .unwrap();
        assert!(!verdict);

        // Lenient with a range admitting 0: passes.
        let admits_zero = FilterCriteria::new(0, 90_000).unwrap().with_brand("Lenovo");
        let verdict = ItemValidator::new()
            .validate(&driver, &free, &admits_zero, &DetailViewBridge::new())
            .unwrap();
        assert!(verdict);

        // Strict: rejected even when the range admits 0.
        let strict = FilterCriteria::new(0, 90_000)
            .unwrap()
            .with_brand("Lenovo")
            .with_zero_price_policy(ZeroPricePolicy::Strict);
        let verdict = ItemValidator::new()
            .validate(&driver, &free, &strict, &DetailViewBridge::new())
            .unwrap();
        assert!(!verdict);
    }
}
