//! Locator abstraction for element selection.
//!
//! Selectors are compiled to JavaScript query expressions and evaluated in
//! the page, rather than resolved to protocol-level element handles. Reads,
//! clicks and visibility probes are all small script evaluations addressed
//! by `(selector, index)` pairs, so a reference never goes stale between a
//! `find_all` and the operation that uses it: it is re-resolved on use.

use serde::{Deserialize, Serialize};

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css(String),
    /// XPath selector
    XPath(String),
    /// Text content selector
    Text(String),
    /// Combined selector with text filter
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::XPath(selector.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Convert to a JavaScript expression yielding an array of all matches
    #[must_use]
    pub fn to_query_all(&self) -> String {
        match self {
            Self::Css(s) => format!("Array.from(document.querySelectorAll({s:?}))"),
            Self::XPath(s) => format!(
                "(() => {{ const r = document.evaluate({s:?}, document, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
                 const out = []; \
                 for (let i = 0; i < r.snapshotLength; i++) out.push(r.snapshotItem(i)); \
                 return out; }})()"
            ),
            Self::Text(t) => format!(
                "Array.from(document.querySelectorAll('*')).filter(el => el.textContent.includes({t:?}))"
            ),
            Self::CssWithText { css, text } => format!(
                "Array.from(document.querySelectorAll({css:?})).filter(el => el.textContent.includes({text:?}))"
            ),
        }
    }

    /// Convert to a JavaScript expression counting matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("{}.length", self.to_query_all())
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css={s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
            Self::Text(t) => write!(f, "text={t}"),
            Self::CssWithText { css, text } => write!(f, "css={css} text={text}"),
        }
    }
}

/// A reference to one element: a selector plus the match index.
///
/// References are positional and re-resolved on every use; index `i` means
/// "the i-th match of the selector at evaluation time".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    /// The selector the element was found by
    pub selector: Selector,
    /// Zero-based index into the selector's matches
    pub index: usize,
}

impl ElementRef {
    /// Create a reference to the `index`-th match of `selector`
    #[must_use]
    pub const fn new(selector: Selector, index: usize) -> Self {
        Self { selector, index }
    }

    /// JavaScript expression resolving this reference to an element or null
    #[must_use]
    pub fn js_element(&self) -> String {
        format!("({})[{}]", self.selector.to_query_all(), self.index)
    }

    fn js_with_element(&self, body: &str, fallback: &str) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return {fallback}; {body} }})()",
            self.js_element()
        )
    }

    /// JavaScript reading the element's visible text (empty when absent)
    #[must_use]
    pub fn js_read_text(&self) -> String {
        self.js_with_element(
            "return String(el.textContent || el.innerText || '');",
            "''",
        )
    }

    /// JavaScript reading an attribute (null when absent)
    #[must_use]
    pub fn js_read_attribute(&self, name: &str) -> String {
        self.js_with_element(&format!("return el.getAttribute({name:?});"), "null")
    }

    /// JavaScript clicking the element
    #[must_use]
    pub fn js_click(&self) -> String {
        self.js_with_element("el.click(); return true;", "false")
    }

    /// JavaScript replacing the element's value and firing an input event
    #[must_use]
    pub fn js_set_value(&self, text: &str) -> String {
        self.js_with_element(
            &format!(
                "el.focus(); el.value = {text:?}; \
                 el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                 return true;"
            ),
            "false",
        )
    }

    /// JavaScript dispatching a hover (mouseover) event
    #[must_use]
    pub fn js_hover(&self) -> String {
        self.js_with_element(
            "el.dispatchEvent(new MouseEvent('mouseover', { bubbles: true })); return true;",
            "false",
        )
    }

    /// JavaScript scrolling the element into view
    #[must_use]
    pub fn js_scroll_into_view(&self) -> String {
        self.js_with_element(
            "el.scrollIntoView(true); window.scrollBy(0, -300); return true;",
            "false",
        )
    }

    /// JavaScript probing visibility (rendered box and not hidden)
    #[must_use]
    pub fn js_is_visible(&self) -> String {
        self.js_with_element(
            "const rect = el.getBoundingClientRect(); \
             const style = window.getComputedStyle(el); \
             return rect.width > 0 && rect.height > 0 && \
                    style.visibility !== 'hidden' && style.display !== 'none';",
            "false",
        )
    }

    /// JavaScript probing whether the element is enabled
    #[must_use]
    pub fn js_is_enabled(&self) -> String {
        self.js_with_element(
            "return !el.disabled && el.getAttribute('aria-disabled') !== 'true';",
            "false",
        )
    }
}

impl std::fmt::Display for ElementRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.selector, self.index)
    }
}
