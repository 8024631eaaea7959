//! Browser control via the Chrome DevTools Protocol.
//!
//! [`CdpDriver`] implements [`PageDriver`] over chromiumoxide. The driver
//! owns a private tokio runtime and blocks on it, so the surface exposed to
//! the engine stays synchronous: one active context, one operation at a
//! time. Selectors are evaluated as JavaScript in the page (see
//! [`crate::locator`]), which also keeps clicks working on elements the
//! marketplace re-renders between protocol round-trips.

use crate::driver::{ContextId, PageDriver};
use crate::locator::{ElementRef, Selector};
use crate::result::{VitrinaError, VitrinaResult};
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::cdp::browser_protocol::target::TargetId;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

/// Browser launch options
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 900,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserOptions {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

#[derive(Debug)]
struct TrackedContext {
    id: ContextId,
    target: TargetId,
    page: CdpPage,
}

/// CDP-backed page driver
#[derive(Debug)]
pub struct CdpDriver {
    runtime: tokio::runtime::Runtime,
    browser: RefCell<CdpBrowser>,
    handler_task: tokio::task::JoinHandle<()>,
    contexts: RefCell<Vec<TrackedContext>>,
    active: Cell<Option<ContextId>>,
    next_context_id: Cell<u64>,
    wait_timeout: Duration,
    implicit_wait: Duration,
}

impl CdpDriver {
    /// Launch a browser and open an initial blank context.
    ///
    /// `wait_timeout` bounds the explicit blocking waits; `implicit_wait` is
    /// the lookup slack `find_all` allows before reporting no matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser cannot be launched.
    pub fn launch(
        options: &BrowserOptions,
        wait_timeout: Duration,
        implicit_wait: Duration,
    ) -> VitrinaResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        let mut builder = CdpConfig::builder()
            .window_size(options.viewport_width, options.viewport_height);

        if !options.headless {
            builder = builder.with_head();
        }
        if !options.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = options.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .build()
            .map_err(|e| VitrinaError::BrowserLaunchError {
                message: e.to_string(),
            })?;

        let (browser, mut handler) = runtime
            .block_on(CdpBrowser::launch(cdp_config))
            .map_err(|e| VitrinaError::BrowserLaunchError {
                message: e.to_string(),
            })?;

        // Drive CDP events for the browser's lifetime.
        let handler_task = runtime.spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = runtime
            .block_on(browser.new_page("about:blank"))
            .map_err(|e| VitrinaError::PageError {
                message: e.to_string(),
            })?;

        let root = TrackedContext {
            id: ContextId::new(0),
            target: page.target_id().clone(),
            page,
        };

        Ok(Self {
            runtime,
            browser: RefCell::new(browser),
            handler_task,
            contexts: RefCell::new(vec![root]),
            active: Cell::new(Some(ContextId::new(0))),
            next_context_id: Cell::new(1),
            wait_timeout,
            implicit_wait,
        })
    }

    /// Capture a PNG screenshot of the active context
    pub fn screenshot(&self) -> VitrinaResult<Vec<u8>> {
        let page = self.active_page()?;
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let response = self
            .block(page.execute(params))
            .map_err(|e| VitrinaError::ScreenshotError {
                message: e.to_string(),
            })?;

        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&response.data)
            .map_err(|e| VitrinaError::ScreenshotError {
                message: e.to_string(),
            })
    }

    /// Close the browser and shut the runtime down
    pub fn shutdown(self) {
        {
            let mut browser = self.browser.borrow_mut();
            if let Err(e) = self.runtime.block_on(browser.close()) {
                debug!(error = %e, "browser close failed");
            }
        }
        self.handler_task.abort();
    }

    fn block<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }

    fn active_page(&self) -> VitrinaResult<CdpPage> {
        let active = self.active.get().ok_or(VitrinaError::InvalidState {
            message: "no active browsing context".to_string(),
        })?;
        let contexts = self.contexts.borrow();
        contexts
            .iter()
            .find(|ctx| ctx.id == active)
            .map(|ctx| ctx.page.clone())
            .ok_or(VitrinaError::InvalidState {
                message: "active context was closed".to_string(),
            })
    }

    /// Re-enumerate browser targets, tracking newly opened pages and
    /// dropping externally closed ones.
    fn refresh_contexts(&self) -> VitrinaResult<()> {
        let pages = {
            let browser = self.browser.borrow();
            self.block(browser.pages())
                .map_err(|e| VitrinaError::ConnectionFailed {
                    message: e.to_string(),
                })?
        };

        let mut contexts = self.contexts.borrow_mut();
        contexts.retain(|ctx| pages.iter().any(|p| *p.target_id() == ctx.target));
        for page in pages {
            let target = page.target_id().clone();
            if !contexts.iter().any(|ctx| ctx.target == target) {
                let id = ContextId::new(self.next_context_id.get());
                self.next_context_id.set(self.next_context_id.get() + 1);
                debug!(context = %id, "tracking new browsing context");
                contexts.push(TrackedContext { id, target, page });
            }
        }
        Ok(())
    }

    /// Evaluate a script in the active context and deserialize its value
    fn eval<T: serde::de::DeserializeOwned>(&self, script: String) -> VitrinaResult<T> {
        let page = self.active_page()?;
        let result = self
            .block(page.evaluate(script))
            .map_err(|e| VitrinaError::ScriptError {
                message: e.to_string(),
            })?;
        result.into_value().map_err(|e| VitrinaError::ScriptError {
            message: e.to_string(),
        })
    }

    /// Run an element action script that yields `false` when the element is
    /// no longer on the page
    fn eval_action(&self, element: &ElementRef, script: String) -> VitrinaResult<()> {
        let found: bool = self.eval(script)?;
        if found {
            Ok(())
        } else {
            Err(VitrinaError::PageError {
                message: format!("element {element} not found"),
            })
        }
    }
}

impl PageDriver for CdpDriver {
    fn navigate(&self, url: &str) -> VitrinaResult<()> {
        let page = self.active_page()?;
        self.block(page.goto(url))
            .map(|_| ())
            .map_err(|e| VitrinaError::NavigationError {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    fn current_url(&self) -> VitrinaResult<String> {
        let page = self.active_page()?;
        let url = self.block(page.url()).map_err(|e| VitrinaError::PageError {
            message: e.to_string(),
        })?;
        Ok(url.unwrap_or_default())
    }

    fn find_all(&self, selector: &Selector) -> VitrinaResult<Vec<ElementRef>> {
        // Implicit wait: an empty lookup retries until the slack elapses.
        let deadline = Instant::now() + self.implicit_wait;
        loop {
            let count: usize = self.eval(selector.to_count_query())?;
            if count > 0 || Instant::now() >= deadline {
                return Ok((0..count)
                    .map(|index| ElementRef::new(selector.clone(), index))
                    .collect());
            }
            std::thread::sleep(Duration::from_millis(
                crate::wait::DEFAULT_POLL_INTERVAL_MS,
            ));
        }
    }

    fn read_text(&self, element: &ElementRef) -> VitrinaResult<String> {
        self.eval(element.js_read_text())
    }

    fn read_attribute(&self, element: &ElementRef, name: &str) -> VitrinaResult<Option<String>> {
        self.eval(element.js_read_attribute(name))
    }

    fn click(&self, element: &ElementRef) -> VitrinaResult<()> {
        self.eval_action(element, element.js_click())
    }

    fn type_text(&self, element: &ElementRef, text: &str) -> VitrinaResult<()> {
        self.eval_action(element, element.js_set_value(text))
    }

    fn hover(&self, element: &ElementRef) -> VitrinaResult<()> {
        self.eval_action(element, element.js_hover())
    }

    fn scroll_into_view(&self, element: &ElementRef) -> VitrinaResult<()> {
        self.eval_action(element, element.js_scroll_into_view())
    }

    fn scroll_to_top(&self) -> VitrinaResult<()> {
        let _: bool = self.eval("(() => { window.scrollTo(0, 0); return true; })()".to_string())?;
        Ok(())
    }

    fn is_visible(&self, element: &ElementRef) -> VitrinaResult<bool> {
        self.eval(element.js_is_visible())
    }

    fn is_enabled(&self, element: &ElementRef) -> VitrinaResult<bool> {
        self.eval(element.js_is_enabled())
    }

    fn context_ids(&self) -> VitrinaResult<Vec<ContextId>> {
        self.refresh_contexts()?;
        Ok(self.contexts.borrow().iter().map(|ctx| ctx.id).collect())
    }

    fn active_context(&self) -> VitrinaResult<ContextId> {
        self.active.get().ok_or(VitrinaError::InvalidState {
            message: "no active browsing context".to_string(),
        })
    }

    fn switch_context(&self, id: ContextId) -> VitrinaResult<()> {
        self.refresh_contexts()?;
        let page = {
            let contexts = self.contexts.borrow();
            contexts
                .iter()
                .find(|ctx| ctx.id == id)
                .map(|ctx| ctx.page.clone())
                .ok_or(VitrinaError::InvalidState {
                    message: format!("unknown browsing context {id}"),
                })?
        };
        self.block(page.bring_to_front())
            .map_err(|e| VitrinaError::PageError {
                message: e.to_string(),
            })?;
        self.active.set(Some(id));
        Ok(())
    }

    fn close_active_context(&self) -> VitrinaResult<()> {
        let page = self.active_page()?;
        self.block(page.close()).map_err(|e| VitrinaError::PageError {
            message: e.to_string(),
        })?;
        let active = self.active.take();
        self.contexts
            .borrow_mut()
            .retain(|ctx| Some(ctx.id) != active);
        Ok(())
    }

    fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }
}
