//! Vitrina: catalog filter-validation engine.
//!
//! Vitrina verifies that a paginated, filterable marketplace listing behaves
//! correctly after price and brand filters are applied: every displayed item
//! must satisfy the active filters, a minimum item count must hold, and a
//! subsequent keyword search for a remembered item must surface that item
//! again.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     VITRINA Architecture                         │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐    ┌──────────────┐    ┌───────────────────┐     │
//! │  │ Scenario   │    │ Validation   │    │ PageDriver        │     │
//! │  │ + page     │───►│ Engine       │───►│ (CDP browser or   │     │
//! │  │ objects    │    │ + validator  │    │ scripted surface) │     │
//! │  └────────────┘    └──────────────┘    └───────────────────┘     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine traverses result pages, parses heterogeneous price text,
//! deduplicates repeated items, validates each item against the criteria
//! (name heuristics first, an isolated detail-view context on ambiguity) and
//! fails fast on the first violation. Everything blocking is a bounded poll;
//! the whole model is single-threaded and synchronous.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

pub mod assertion;
pub mod catalog;
pub mod config;
pub mod criteria;
pub mod detail;
pub mod driver;
pub mod engine;
pub mod locator;
pub mod mock;
pub mod page_object;
pub mod pagination;
pub mod price;
pub mod reporter;
pub mod result;
pub mod scenario;
pub mod validator;
pub mod wait;

/// CDP browser control (requires chromium)
#[cfg(feature = "browser")]
pub mod browser;

pub use config::ScenarioConfig;
pub use criteria::{BrandLookup, FilterCriteria, ProductSnapshot, ZeroPricePolicy};
pub use detail::DetailViewBridge;
pub use driver::{ContextId, PageDriver};
pub use engine::{CheckedSet, ValidationEngine};
pub use locator::{ElementRef, Selector};
pub use page_object::{HomeCatalog, PageObject, ProductListing, SearchResults};
pub use pagination::{LoadSentinel, PageCursor, PageTraversal};
pub use price::extract_price;
pub use reporter::{
    MemoryRecorder, NullRecorder, ScenarioReport, ScenarioStatus, StepRecorder, TracingRecorder,
};
pub use result::{VitrinaError, VitrinaResult};
pub use scenario::FilterScenario;
pub use validator::ItemValidator;
pub use wait::{UrlPattern, WaitOptions, Waiter};

#[cfg(feature = "browser")]
pub use browser::{BrowserOptions, CdpDriver};
