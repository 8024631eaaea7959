//! Pagination traversal and page-load settling.

use crate::catalog;
use crate::driver::PageDriver;
use crate::locator::ElementRef;
use crate::result::VitrinaResult;
use tracing::trace;

/// Traversal position across result pages. Advances monotonically; there is
/// no previous operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCursor(usize);

impl PageCursor {
    /// Cursor at the first page
    #[must_use]
    pub const fn start() -> Self {
        Self(0)
    }

    /// Zero-based index of the current page
    #[must_use]
    pub const fn position(&self) -> usize {
        self.0
    }

    /// Move to the next page
    pub fn advance(&mut self) {
        self.0 += 1;
    }
}

/// Determines whether a further page of results exists and exposes the
/// navigation control. Advancing the cursor (clicking the control) is the
/// caller's responsibility.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageTraversal;

impl PageTraversal {
    /// Create a traversal helper
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Whether a next page is reachable right now.
    ///
    /// True only while the next-page control is both enabled and visible.
    /// That is a transient layout state, so the result is never cached.
    pub fn has_next_page<D: PageDriver + ?Sized>(&self, driver: &D) -> VitrinaResult<bool> {
        let controls = driver.find_all(&catalog::next_page_control())?;
        let Some(control) = controls.first() else {
            return Ok(false);
        };
        Ok(driver.is_enabled(control)? && driver.is_visible(control)?)
    }

    /// The next-page control, when present
    pub fn next_page_control<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
    ) -> VitrinaResult<Option<ElementRef>> {
        Ok(driver.find_all(&catalog::next_page_control())?.into_iter().next())
    }

    /// Best-effort scroll to the pagination region. Idempotent; a no-op when
    /// the region is absent.
    pub fn focus_pagination_region<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
    ) -> VitrinaResult<()> {
        let regions = driver.find_all(&catalog::pagination_region())?;
        if let Some(region) = regions.first() {
            driver.scroll_into_view(region)?;
        } else {
            trace!("pagination region absent, skipping scroll");
        }
        Ok(())
    }
}

/// Waits out the listing's loading indicators before item snapshots are read.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadSentinel;

impl LoadSentinel {
    /// Create a sentinel
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Block until no loader or skeleton indicator is visible.
    ///
    /// An indicator that is absent, or present but already hidden, does not
    /// trigger a wait.
    pub fn await_settled<D: PageDriver + ?Sized>(&self, driver: &D) -> VitrinaResult<()> {
        for indicator in [catalog::loader(), catalog::loading_skeleton()] {
            let present = driver.find_all(&indicator)?;
            if let Some(first) = present.first() {
                if driver.is_visible(first)? {
                    driver.wait_until_invisible(&indicator)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::{ScriptedCatalog, ScriptedItem};

    fn two_pages() -> ScriptedCatalog {
        ScriptedCatalog::builder()
            .page(vec![ScriptedItem::new("Lenovo A", "40 000")])
            .page(vec![ScriptedItem::new("HP B", "50 000")])
            .build()
    }

    mod cursor_tests {
        use super::*;

        #[test]
        fn test_cursor_advances_monotonically() {
            let mut cursor = PageCursor::start();
            assert_eq!(cursor.position(), 0);
            cursor.advance();
            cursor.advance();
            assert_eq!(cursor.position(), 2);
        }
    }

    mod traversal_tests {
        use super::*;

        #[test]
        fn test_has_next_on_first_page() {
            let driver = two_pages();
            assert!(PageTraversal::new().has_next_page(&driver).unwrap());
        }

        #[test]
        fn test_no_next_on_last_page() {
            let driver = two_pages();
            let traversal = PageTraversal::new();
            let control = traversal.next_page_control(&driver).unwrap().unwrap();
            driver.click(&control).unwrap();
            assert!(!traversal.has_next_page(&driver).unwrap());
        }

        #[test]
        fn test_single_page_has_no_next() {
            let driver = ScriptedCatalog::builder()
                .page(vec![ScriptedItem::new("Lenovo A", "40 000")])
                .build();
            assert!(!PageTraversal::new().has_next_page(&driver).unwrap());
        }

        #[test]
        fn test_result_not_cached_across_layout_change() {
            let driver = two_pages();
            let traversal = PageTraversal::new();
            assert!(traversal.has_next_page(&driver).unwrap());
            driver.hide_next_control();
            assert!(!traversal.has_next_page(&driver).unwrap());
        }

        #[test]
        fn test_focus_region_is_noop_when_absent() {
            let driver = ScriptedCatalog::builder().page(Vec::new()).build();
            driver.hide_pagination_region();
            // Twice, to exercise idempotence.
            PageTraversal::new().focus_pagination_region(&driver).unwrap();
            PageTraversal::new().focus_pagination_region(&driver).unwrap();
        }
    }

    mod load_sentinel_tests {
        use super::*;

        #[test]
        fn test_settles_after_loader_clears() {
            let driver = ScriptedCatalog::builder()
                .page(vec![ScriptedItem::new("Lenovo A", "40 000")])
                .loader_visible_for_polls(3)
                .build();
            LoadSentinel::new().await_settled(&driver).unwrap();
            // Subsequent settles see no loader at all.
            LoadSentinel::new().await_settled(&driver).unwrap();
        }

        #[test]
        fn test_noop_without_indicators() {
            let driver = ScriptedCatalog::builder()
                .page(vec![ScriptedItem::new("Lenovo A", "40 000")])
                .build();
            LoadSentinel::new().await_settled(&driver).unwrap();
        }
    }
}
