//! Wait mechanisms.
//!
//! Every blocking operation in Vitrina is a timeout-bounded poll of a
//! boolean predicate, expressed through [`poll_until`]. There is no
//! parallelism to coordinate with; the model is single-threaded,
//! cooperative and synchronous-blocking.

use crate::result::{VitrinaError, VitrinaResult};
use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (30 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// POLLING PRIMITIVE
// =============================================================================

/// Poll `probe` until it yields a value or the timeout expires.
///
/// The probe returns `Ok(Some(value))` when the awaited condition holds,
/// `Ok(None)` to keep polling, or `Err` to abort immediately (infrastructure
/// failures are not retried). Expiry yields [`VitrinaError::Timeout`].
///
/// This is the single blocking primitive; all driver-level waits are
/// expressed in terms of it.
pub fn poll_until<T, F>(options: &WaitOptions, mut probe: F) -> VitrinaResult<T>
where
    F: FnMut() -> VitrinaResult<Option<T>>,
{
    let start = Instant::now();
    let timeout = options.timeout();
    let poll_interval = options.poll_interval();

    loop {
        if let Some(value) = probe()? {
            return Ok(value);
        }
        if start.elapsed() >= timeout {
            return Err(VitrinaError::Timeout {
                ms: options.timeout_ms,
            });
        }
        std::thread::sleep(poll_interval);
    }
}

// =============================================================================
// WAIT CONDITION TRAIT
// =============================================================================

/// Trait for custom wait conditions
pub trait WaitCondition {
    /// Check if the condition is satisfied
    fn check(&self) -> bool;

    /// Get description for error messages
    fn description(&self) -> String;
}

/// A function-based wait condition
pub struct FnCondition<F: Fn() -> bool> {
    func: F,
    description: String,
}

impl<F: Fn() -> bool> std::fmt::Debug for FnCondition<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCondition")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl<F: Fn() -> bool> FnCondition<F> {
    /// Create a new function condition
    pub fn new(func: F, description: impl Into<String>) -> Self {
        Self {
            func,
            description: description.into(),
        }
    }
}

impl<F: Fn() -> bool> WaitCondition for FnCondition<F> {
    fn check(&self) -> bool {
        (self.func)()
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Result of a wait operation
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
}

impl WaitResult {
    /// Create a successful wait result
    #[must_use]
    pub fn satisfied(elapsed: Duration, waited_for: impl Into<String>) -> Self {
        Self {
            elapsed,
            waited_for: waited_for.into(),
        }
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Waiter for synchronization operations
#[derive(Debug, Clone, Default)]
pub struct Waiter {
    options: WaitOptions,
}

impl Waiter {
    /// Create a new waiter with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom options
    #[must_use]
    pub fn with_options(options: WaitOptions) -> Self {
        Self { options }
    }

    /// Wait for a custom condition
    pub fn wait_for<C: WaitCondition>(&self, condition: &C) -> VitrinaResult<WaitResult> {
        let start = Instant::now();
        poll_until(&self.options, || Ok(condition.check().then_some(())))?;
        Ok(WaitResult::satisfied(start.elapsed(), condition.description()))
    }

    /// Wait for a predicate to return true
    pub fn wait_for_function<F>(&self, predicate: F) -> VitrinaResult<WaitResult>
    where
        F: Fn() -> bool,
    {
        let start = Instant::now();
        poll_until(&self.options, || Ok(predicate().then_some(())))?;
        Ok(WaitResult::satisfied(start.elapsed(), "custom function"))
    }
}

// =============================================================================
// URL PATTERN
// =============================================================================

/// Pattern for matching URLs in waits and page objects
#[derive(Debug, Clone)]
pub enum UrlPattern {
    /// Exact URL match
    Exact(String),
    /// URL contains substring
    Contains(String),
    /// URL starts with prefix
    Prefix(String),
    /// URL matches regular expression
    Matches(regex::Regex),
}

impl UrlPattern {
    /// Check if a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(expected) => url == expected,
            Self::Contains(needle) => url.contains(needle),
            Self::Prefix(prefix) => url.starts_with(prefix),
            Self::Matches(re) => re.is_match(url),
        }
    }
}

// =============================================================================
// CONVENIENCE FUNCTIONS
// =============================================================================

/// Wait for a condition with default poll interval and the given timeout
pub fn wait_until<F>(predicate: F, timeout_ms: u64) -> VitrinaResult<()>
where
    F: Fn() -> bool,
{
    let options = WaitOptions::new().with_timeout(timeout_ms);
    poll_until(&options, || Ok(predicate().then_some(())))
}
