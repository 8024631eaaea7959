//! The synchronous page-surface contract the validation core drives.
//!
//! `PageDriver` is the seam between the engine and whatever renders the
//! catalog: the CDP-backed driver (feature `browser`), or the scripted
//! in-memory surface used by tests. Required methods are single, non-blocking
//! probes and actions; every blocking operation is a provided method built on
//! the one polling primitive in [`crate::wait`].

use crate::locator::{ElementRef, Selector};
use crate::result::{VitrinaError, VitrinaResult};
use crate::wait::{poll_until, UrlPattern, WaitOptions};
use std::time::Duration;

/// Opaque identifier of one browsing context (window/tab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    /// Create a context id from a raw value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw value of this id
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ctx-{}", self.0)
    }
}

/// Locator/wait service contract.
///
/// Implementations stay synchronous-blocking; there is exactly one active
/// context at a time and no parallelism between operations.
pub trait PageDriver {
    /// Navigate the active context to a URL
    fn navigate(&self, url: &str) -> VitrinaResult<()>;

    /// Current location of the active context
    fn current_url(&self) -> VitrinaResult<String>;

    /// All current matches of a selector, in document order
    fn find_all(&self, selector: &Selector) -> VitrinaResult<Vec<ElementRef>>;

    /// Visible text of an element (empty string when gone)
    fn read_text(&self, element: &ElementRef) -> VitrinaResult<String>;

    /// Attribute value of an element (`None` when unset or gone)
    fn read_attribute(&self, element: &ElementRef, name: &str) -> VitrinaResult<Option<String>>;

    /// Click an element
    fn click(&self, element: &ElementRef) -> VitrinaResult<()>;

    /// Replace an element's value with `text`
    fn type_text(&self, element: &ElementRef, text: &str) -> VitrinaResult<()>;

    /// Dispatch a hover to an element
    fn hover(&self, element: &ElementRef) -> VitrinaResult<()>;

    /// Scroll an element into view
    fn scroll_into_view(&self, element: &ElementRef) -> VitrinaResult<()>;

    /// Scroll the active context to the top
    fn scroll_to_top(&self) -> VitrinaResult<()>;

    /// Whether an element currently has a rendered, non-hidden box
    fn is_visible(&self, element: &ElementRef) -> VitrinaResult<bool>;

    /// Whether an element is enabled for interaction
    fn is_enabled(&self, element: &ElementRef) -> VitrinaResult<bool>;

    /// Ids of all open browsing contexts
    fn context_ids(&self) -> VitrinaResult<Vec<ContextId>>;

    /// Id of the active context
    fn active_context(&self) -> VitrinaResult<ContextId>;

    /// Switch the active context
    fn switch_context(&self, id: ContextId) -> VitrinaResult<()>;

    /// Close the active context. Until the next `switch_context` there is no
    /// active context and element operations fail with `InvalidState`.
    fn close_active_context(&self) -> VitrinaResult<()>;

    /// Explicit-wait bound for the provided blocking methods
    fn wait_timeout(&self) -> Duration;

    // =========================================================================
    // Provided blocking operations
    // =========================================================================

    /// Wait options derived from [`Self::wait_timeout`]
    fn wait_options(&self) -> WaitOptions {
        WaitOptions::new().with_timeout(self.wait_timeout().as_millis() as u64)
    }

    /// Block until a selector has a visible match; returns the first one
    fn wait_until_visible(&self, selector: &Selector) -> VitrinaResult<ElementRef> {
        poll_until(&self.wait_options(), || {
            for element in self.find_all(selector)? {
                if self.is_visible(&element)? {
                    return Ok(Some(element));
                }
            }
            Ok(None)
        })
    }

    /// Block until a selector has a visible and enabled match
    fn wait_until_clickable(&self, selector: &Selector) -> VitrinaResult<ElementRef> {
        poll_until(&self.wait_options(), || {
            for element in self.find_all(selector)? {
                if self.is_visible(&element)? && self.is_enabled(&element)? {
                    return Ok(Some(element));
                }
            }
            Ok(None)
        })
    }

    /// Block until no match of a selector is visible
    fn wait_until_invisible(&self, selector: &Selector) -> VitrinaResult<()> {
        poll_until(&self.wait_options(), || {
            for element in self.find_all(selector)? {
                if self.is_visible(&element)? {
                    return Ok(None);
                }
            }
            Ok(Some(()))
        })
    }

    /// Block until a selector has at least one match in the document
    fn wait_for_present_all(&self, selector: &Selector) -> VitrinaResult<Vec<ElementRef>> {
        poll_until(&self.wait_options(), || {
            let elements = self.find_all(selector)?;
            Ok(if elements.is_empty() {
                None
            } else {
                Some(elements)
            })
        })
    }

    /// Block until exactly `expected` browsing contexts are open
    fn wait_until_context_count(&self, expected: usize) -> VitrinaResult<()> {
        poll_until(&self.wait_options(), || {
            Ok((self.context_ids()?.len() == expected).then_some(()))
        })
    }

    /// Block until the active context's location matches the pattern
    fn wait_until_url_matches(&self, pattern: &UrlPattern) -> VitrinaResult<()> {
        poll_until(&self.wait_options(), || {
            Ok(pattern.matches(&self.current_url()?).then_some(()))
        })
    }

    /// First match of `selector` whose text contains `needle`.
    ///
    /// First-match-wins: when several elements contain the needle, the one
    /// earliest in document order is returned, which can pick the wrong
    /// element if two share a name prefix. Known limitation.
    fn find_first_containing(
        &self,
        selector: &Selector,
        needle: &str,
    ) -> VitrinaResult<Option<ElementRef>> {
        for element in self.find_all(selector)? {
            if self.read_text(&element)?.contains(needle) {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }
}

/// Map a context-count wait timeout into the dedicated error variant
pub(crate) fn context_timeout(err: VitrinaError, expected: usize) -> VitrinaError {
    match err {
        VitrinaError::Timeout { ms } => VitrinaError::ContextTimeout { expected, ms },
        other => other,
    }
}
