//! Filter criteria and per-page item snapshots.

use crate::price::extract_price;
use crate::result::{VitrinaError, VitrinaResult};
use serde::{Deserialize, Serialize};

/// How a parsed price of `0` is treated during validation.
///
/// The parser cannot distinguish "no price present" from "legitimately
/// free", so the decision is configuration, not a heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroPricePolicy {
    /// A zero price flows through the normal inclusive range check
    #[default]
    Lenient,
    /// A zero price is rejected as unverifiable
    Strict,
}

/// The price range and brand set one validation run checks against.
///
/// Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    min_price: u64,
    max_price: u64,
    brands: Vec<String>,
    zero_price: ZeroPricePolicy,
}

impl FilterCriteria {
    /// Create criteria for an inclusive price range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if `min_price > max_price`.
    pub fn new(min_price: u64, max_price: u64) -> VitrinaResult<Self> {
        if min_price > max_price {
            return Err(VitrinaError::InvalidState {
                message: format!("price range inverted: {min_price} > {max_price}"),
            });
        }
        Ok(Self {
            min_price,
            max_price,
            brands: Vec::new(),
            zero_price: ZeroPricePolicy::default(),
        })
    }

    /// Add one expected brand
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brands.push(brand.into());
        self
    }

    /// Add several expected brands
    #[must_use]
    pub fn with_brands<I, S>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brands.extend(brands.into_iter().map(Into::into));
        self
    }

    /// Set the zero-price policy
    #[must_use]
    pub const fn with_zero_price_policy(mut self, policy: ZeroPricePolicy) -> Self {
        self.zero_price = policy;
        self
    }

    /// Lower price bound (inclusive)
    #[must_use]
    pub const fn min_price(&self) -> u64 {
        self.min_price
    }

    /// Upper price bound (inclusive)
    #[must_use]
    pub const fn max_price(&self) -> u64 {
        self.max_price
    }

    /// Expected brands, in configuration order
    #[must_use]
    pub fn brands(&self) -> &[String] {
        &self.brands
    }

    /// Active zero-price policy
    #[must_use]
    pub const fn zero_price_policy(&self) -> ZeroPricePolicy {
        self.zero_price
    }

    /// Whether a price lies in the inclusive range
    #[must_use]
    pub const fn price_in_range(&self, price: u64) -> bool {
        price >= self.min_price && price <= self.max_price
    }

    /// Whether an item name contains any expected brand, case-insensitively
    #[must_use]
    pub fn matches_brand_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.brands
            .iter()
            .any(|brand| name.contains(&brand.to_lowercase()))
    }

    /// Whether a resolved brand equals any expected brand, case-insensitively.
    /// Equality, not containment: this is the detail-view comparison.
    #[must_use]
    pub fn brand_equals(&self, brand: &str) -> bool {
        self.brands
            .iter()
            .any(|expected| expected.eq_ignore_ascii_case(brand))
    }

    /// Human-readable summary for step logs and assertion messages
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "price {}..={}, brands [{}]",
            self.min_price,
            self.max_price,
            self.brands.join(", ")
        )
    }
}

/// One catalog entry as read from the page: name plus raw and parsed price.
///
/// Produced fresh per page read; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    /// Trimmed item name
    pub name: String,
    /// Raw price text as displayed
    pub raw_price_text: String,
    /// Price extracted from the raw text (`0` when unparseable)
    pub parsed_price: u64,
}

impl ProductSnapshot {
    /// Build a snapshot, trimming the name and parsing the price text
    #[must_use]
    pub fn new(name: impl Into<String>, raw_price_text: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        let raw_price_text = raw_price_text.into();
        let parsed_price = extract_price(Some(&raw_price_text));
        Self {
            name,
            raw_price_text,
            parsed_price,
        }
    }

    /// Deduplication key for one run.
    ///
    /// Not a durable identifier: two distinct items sharing name and parsed
    /// price collide. Known limitation.
    #[must_use]
    pub fn identity_key(&self) -> String {
        format!("{}_{}", self.name, self.parsed_price)
    }
}

/// Brand metadata extracted from an item's detail view.
///
/// An empty brand means "no brand metadata found", not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandLookup {
    brand: String,
}

impl BrandLookup {
    /// Wrap a resolved (already trimmed) brand
    #[must_use]
    pub fn new(brand: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
        }
    }

    /// The "no brand metadata" result
    #[must_use]
    pub fn empty() -> Self {
        Self {
            brand: String::new(),
        }
    }

    /// Resolved brand text
    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Whether no brand metadata was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.brand.is_empty()
    }
}
