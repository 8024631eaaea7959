//! Brand verification through an item's detail view.
//!
//! When an item's name does not reveal its brand, the bridge opens the
//! item's detail link in a second browsing context, reads the brand image's
//! alt text, and restores the original context. The open/extract/close
//! sequence is a scoped acquisition: close and switch-back run on every exit
//! path, including a failure during extraction.

use crate::catalog;
use crate::criteria::BrandLookup;
use crate::driver::{context_timeout, ContextId, PageDriver};
use crate::result::{VitrinaError, VitrinaResult};
use crate::wait::UrlPattern;
use tracing::debug;

/// The engine never holds more than one detail view open at a time, so a
/// successful open means exactly two contexts exist.
const EXPECTED_CONTEXTS: usize = 2;

/// Opens detail views and resolves brand metadata from them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailViewBridge;

impl DetailViewBridge {
    /// Create a bridge
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolve an item's brand by opening its detail view.
    ///
    /// The detail link is the first one whose visible text contains the item
    /// name (first-match-wins; shared name prefixes can mis-identify the
    /// link, a known limitation).
    ///
    /// # Errors
    ///
    /// - [`VitrinaError::LookupError`] when no link matches the name; the
    ///   caller treats this as a rejection, not a crash.
    /// - [`VitrinaError::ContextTimeout`] when the secondary context does
    ///   not open within the wait bound; fatal to the run.
    /// - Any driver error from extraction or restore; fatal to the run.
    pub fn resolve_brand<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        item_name: &str,
    ) -> VitrinaResult<BrandLookup> {
        let link = driver
            .find_first_containing(&catalog::product_links(), item_name)?
            .ok_or_else(|| VitrinaError::LookupError {
                name: item_name.to_string(),
            })?;

        let origin = driver.active_context()?;
        let origin_url = driver.current_url()?;

        debug!(item = item_name, "opening detail view for brand check");
        driver.click(&link)?;
        driver
            .wait_until_context_count(EXPECTED_CONTEXTS)
            .map_err(|e| context_timeout(e, EXPECTED_CONTEXTS))?;

        let detail = Self::secondary_context(driver, origin)?;
        driver.switch_context(detail)?;

        // Scoped section: whatever extraction does, the detail context is
        // closed and the original context restored before returning.
        let extracted = Self::read_brand(driver);
        let restored = Self::restore(driver, origin, &origin_url);

        match (extracted, restored) {
            (Ok(lookup), Ok(())) => {
                debug!(brand = lookup.brand(), "detail view resolved");
                Ok(lookup)
            }
            (Err(e), _) | (Ok(_), Err(e)) => Err(e),
        }
    }

    /// The one open context that is not the original
    fn secondary_context<D: PageDriver + ?Sized>(
        driver: &D,
        origin: ContextId,
    ) -> VitrinaResult<ContextId> {
        driver
            .context_ids()?
            .into_iter()
            .find(|id| *id != origin)
            .ok_or(VitrinaError::InvalidState {
                message: "secondary context disappeared after open".to_string(),
            })
    }

    /// Read the first brand image's alt text; missing image or empty alt
    /// yields an empty brand, which is not an error.
    fn read_brand<D: PageDriver + ?Sized>(driver: &D) -> VitrinaResult<BrandLookup> {
        let images = driver.find_all(&catalog::brand_image())?;
        let Some(image) = images.first() else {
            return Ok(BrandLookup::empty());
        };
        driver.wait_until_visible(&catalog::brand_image())?;
        let alt = driver.read_attribute(image, "alt")?.unwrap_or_default();
        let alt = alt.trim();
        if alt.is_empty() {
            Ok(BrandLookup::empty())
        } else {
            Ok(BrandLookup::new(alt))
        }
    }

    /// Close the detail context, switch back, and block until the original
    /// context's location matches its pre-navigation value (guards against
    /// stale-page races).
    fn restore<D: PageDriver + ?Sized>(
        driver: &D,
        origin: ContextId,
        origin_url: &str,
    ) -> VitrinaResult<()> {
        driver.close_active_context()?;
        driver.switch_context(origin)?;
        driver.wait_until_url_matches(&UrlPattern::Exact(origin_url.to_string()))
    }
}
