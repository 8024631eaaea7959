//! Scripted catalog surface for deterministic tests.
//!
//! [`ScriptedCatalog`] implements [`PageDriver`] over an in-memory model of
//! the marketplace: paginated listing items, detail views with brand
//! metadata, the catalog menu, filter controls and header search. Tests
//! script the surface through the builder and observe interactions through
//! the recorded logs.

use crate::catalog;
use crate::driver::{ContextId, PageDriver};
use crate::locator::{ElementRef, Selector};
use crate::result::{VitrinaError, VitrinaResult};
use std::cell::RefCell;
use std::time::Duration;

/// One scripted listing item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedItem {
    /// Item name as rendered
    pub name: String,
    /// Price text as rendered
    pub price_text: String,
}

impl ScriptedItem {
    /// Create an item
    #[must_use]
    pub fn new(name: impl Into<String>, price_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price_text: price_text.into(),
        }
    }
}

/// What one browsing context currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
enum View {
    Home,
    Listing,
    SearchResults,
    Detail { product: String },
}

#[derive(Debug, Clone)]
struct ScriptedContext {
    id: ContextId,
    view: View,
    url: String,
}

/// Filter interactions recorded by the surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterLog {
    /// Text typed into the minimum price input
    pub min_price: Option<String>,
    /// Text typed into the maximum price input
    pub max_price: Option<String>,
    /// Brand options clicked, in order
    pub brands: Vec<String>,
}

#[derive(Debug)]
struct ScriptedState {
    base_url: String,
    title: String,
    pages: Vec<Vec<ScriptedItem>>,
    page_index: usize,
    detail_brands: Vec<(String, String)>,
    contexts: Vec<ScriptedContext>,
    active: Option<ContextId>,
    next_context_id: u64,
    catalog_open: bool,
    hovered_category: Option<String>,
    navigated: Option<(String, String)>,
    visible_brands: Vec<String>,
    hidden_brands: Vec<String>,
    filter_log: FilterLog,
    search_query: String,
    submitted_query: Option<String>,
    search_results: Option<Vec<ScriptedItem>>,
    detail_opens: Vec<String>,
    loader_polls: u32,
    suppress_detail_open: bool,
    hide_next_control: bool,
    hide_pagination_region: bool,
    fail_next_attribute_read: Option<String>,
    wait_timeout: Duration,
}

/// What a selector addresses on this surface
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    ProductNames,
    ProductLinks,
    ProductPrices,
    Loader,
    Skeleton,
    PaginationRegion,
    NextControl,
    PageTitle,
    BrandImage,
    CatalogButton,
    CategoryEntry(String),
    SubcategoryEntry(String),
    MinPriceInput,
    MaxPriceInput,
    BrandOption(String),
    BrandShowMore,
    BrandSearchInput,
    SearchInput,
    SearchButton,
    Unknown,
}

fn xpath_param(xpath: &str) -> Option<String> {
    let start = xpath.find("text()='")? + "text()='".len();
    let end = xpath[start..].find('\'')? + start;
    Some(xpath[start..end].to_string())
}

fn classify(selector: &Selector) -> Target {
    if *selector == catalog::product_names() {
        return Target::ProductNames;
    }
    if *selector == catalog::product_links() {
        return Target::ProductLinks;
    }
    if *selector == catalog::product_prices() {
        return Target::ProductPrices;
    }
    if *selector == catalog::loader() {
        return Target::Loader;
    }
    if *selector == catalog::loading_skeleton() {
        return Target::Skeleton;
    }
    if *selector == catalog::pagination_region() {
        return Target::PaginationRegion;
    }
    if *selector == catalog::next_page_control() {
        return Target::NextControl;
    }
    if *selector == catalog::page_title() {
        return Target::PageTitle;
    }
    if *selector == catalog::brand_image() {
        return Target::BrandImage;
    }
    if *selector == catalog::catalog_button() {
        return Target::CatalogButton;
    }
    if *selector == catalog::min_price_input() {
        return Target::MinPriceInput;
    }
    if *selector == catalog::max_price_input() {
        return Target::MaxPriceInput;
    }
    if *selector == catalog::brand_show_more() {
        return Target::BrandShowMore;
    }
    if *selector == catalog::brand_search_input() {
        return Target::BrandSearchInput;
    }
    if *selector == catalog::search_input() {
        return Target::SearchInput;
    }
    if *selector == catalog::search_button() {
        return Target::SearchButton;
    }
    if let Selector::XPath(xpath) = selector {
        if xpath.contains("label[@role='checkbox']") {
            if let Some(brand) = xpath_param(xpath) {
                return Target::BrandOption(brand);
            }
        }
        if xpath.contains("catalog-content") {
            if let Some(category) = xpath_param(xpath) {
                return Target::CategoryEntry(category);
            }
        }
        if xpath.contains("linkSnippet") {
            if let Some(subcategory) = xpath_param(xpath) {
                return Target::SubcategoryEntry(subcategory);
            }
        }
    }
    Target::Unknown
}

/// Builder for [`ScriptedCatalog`]
#[derive(Debug, Default)]
pub struct ScriptedCatalogBuilder {
    base_url: Option<String>,
    title: Option<String>,
    pages: Vec<Vec<ScriptedItem>>,
    detail_brands: Vec<(String, String)>,
    visible_brands: Vec<String>,
    hidden_brands: Vec<String>,
    search_results: Option<Vec<ScriptedItem>>,
    loader_polls: u32,
    suppress_detail_open: bool,
    start_at_home: bool,
    wait_timeout_ms: u64,
}

impl ScriptedCatalogBuilder {
    /// Set the base URL (default `https://market.example`)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the listing page title (default "Ноутбуки")
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append one page of listing items
    #[must_use]
    pub fn page(mut self, items: Vec<ScriptedItem>) -> Self {
        self.pages.push(items);
        self
    }

    /// Script a product's detail-view brand. An empty brand means the detail
    /// view has no brand image at all.
    #[must_use]
    pub fn detail_brand(mut self, product: impl Into<String>, brand: impl Into<String>) -> Self {
        self.detail_brands.push((product.into(), brand.into()));
        self
    }

    /// Brand options shown in the filter block without expanding it
    #[must_use]
    pub fn visible_brand_options<I, S>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visible_brands = brands.into_iter().map(Into::into).collect();
        self
    }

    /// Brand options reachable only via show-more or the brand search input
    #[must_use]
    pub fn hidden_brand_options<I, S>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden_brands = brands.into_iter().map(Into::into).collect();
        self
    }

    /// Fix the search result listing. Without this, submitting a search
    /// shows every scripted item whose name contains the query.
    #[must_use]
    pub fn search_results(mut self, items: Vec<ScriptedItem>) -> Self {
        self.search_results = Some(items);
        self
    }

    /// Make the loader indicator visible for the first `polls` probes
    #[must_use]
    pub const fn loader_visible_for_polls(mut self, polls: u32) -> Self {
        self.loader_polls = polls;
        self
    }

    /// Clicking a detail link no longer opens a second context
    #[must_use]
    pub const fn suppress_detail_open(mut self) -> Self {
        self.suppress_detail_open = true;
        self
    }

    /// Start on the home page instead of directly on the listing
    #[must_use]
    pub const fn start_at_home(mut self) -> Self {
        self.start_at_home = true;
        self
    }

    /// Explicit-wait bound for blocking operations (default 1000ms)
    #[must_use]
    pub const fn wait_timeout_ms(mut self, ms: u64) -> Self {
        self.wait_timeout_ms = ms;
        self
    }

    /// Build the surface
    #[must_use]
    pub fn build(self) -> ScriptedCatalog {
        let base_url = self
            .base_url
            .unwrap_or_else(|| "https://market.example".to_string());
        let (view, url) = if self.start_at_home {
            (View::Home, base_url.clone())
        } else {
            (View::Listing, format!("{base_url}/catalog?page=0"))
        };
        let root = ScriptedContext {
            id: ContextId::new(0),
            view,
            url,
        };
        ScriptedCatalog {
            state: RefCell::new(ScriptedState {
                base_url,
                title: self.title.unwrap_or_else(|| "Ноутбуки".to_string()),
                pages: self.pages,
                page_index: 0,
                detail_brands: self.detail_brands,
                contexts: vec![root],
                active: Some(ContextId::new(0)),
                next_context_id: 1,
                catalog_open: false,
                hovered_category: None,
                navigated: None,
                visible_brands: self.visible_brands,
                hidden_brands: self.hidden_brands,
                filter_log: FilterLog::default(),
                search_query: String::new(),
                submitted_query: None,
                search_results: self.search_results,
                detail_opens: Vec::new(),
                loader_polls: self.loader_polls,
                suppress_detail_open: self.suppress_detail_open,
                hide_next_control: false,
                hide_pagination_region: false,
                fail_next_attribute_read: None,
                wait_timeout: Duration::from_millis(if self.wait_timeout_ms == 0 {
                    1000
                } else {
                    self.wait_timeout_ms
                }),
            }),
        }
    }
}

/// In-memory marketplace surface implementing [`PageDriver`]
#[derive(Debug)]
pub struct ScriptedCatalog {
    state: RefCell<ScriptedState>,
}

impl ScriptedCatalog {
    /// Start building a scripted surface
    #[must_use]
    pub fn builder() -> ScriptedCatalogBuilder {
        ScriptedCatalogBuilder::default()
    }

    // =========================================================================
    // Test observation and scripting hooks
    // =========================================================================

    /// Names of products whose detail view was opened, in order
    #[must_use]
    pub fn detail_opens(&self) -> Vec<String> {
        self.state.borrow().detail_opens.clone()
    }

    /// Zero-based index of the listing page currently shown
    #[must_use]
    pub fn current_page_index(&self) -> usize {
        self.state.borrow().page_index
    }

    /// Recorded filter interactions
    #[must_use]
    pub fn filter_log(&self) -> FilterLog {
        self.state.borrow().filter_log.clone()
    }

    /// Query submitted through the header search, if any
    #[must_use]
    pub fn submitted_query(&self) -> Option<String> {
        self.state.borrow().submitted_query.clone()
    }

    /// Category/subcategory pair navigated to, if any
    #[must_use]
    pub fn navigated(&self) -> Option<(String, String)> {
        self.state.borrow().navigated.clone()
    }

    /// Make the next-page control invisible (transient layout state)
    pub fn hide_next_control(&self) {
        self.state.borrow_mut().hide_next_control = true;
    }

    /// Remove the pagination region from the page
    pub fn hide_pagination_region(&self) {
        self.state.borrow_mut().hide_pagination_region = true;
    }

    /// Fail the next `read_attribute` call with a page error
    pub fn fail_next_attribute_read(&self, message: impl Into<String>) {
        self.state.borrow_mut().fail_next_attribute_read = Some(message.into());
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn active_view(state: &ScriptedState) -> VitrinaResult<&ScriptedContext> {
        let active = state.active.ok_or(VitrinaError::InvalidState {
            message: "no active browsing context".to_string(),
        })?;
        state
            .contexts
            .iter()
            .find(|ctx| ctx.id == active)
            .ok_or(VitrinaError::InvalidState {
                message: "active context was closed".to_string(),
            })
    }

    fn current_items(state: &ScriptedState) -> VitrinaResult<Vec<ScriptedItem>> {
        let context = Self::active_view(state)?;
        Ok(match &context.view {
            View::Listing => state
                .pages
                .get(state.page_index)
                .cloned()
                .unwrap_or_default(),
            View::SearchResults => Self::search_items(state),
            View::Home | View::Detail { .. } => Vec::new(),
        })
    }

    fn search_items(state: &ScriptedState) -> Vec<ScriptedItem> {
        if let Some(fixed) = &state.search_results {
            return fixed.clone();
        }
        let query = state.submitted_query.clone().unwrap_or_default();
        state
            .pages
            .iter()
            .flatten()
            .filter(|item| item.name.contains(&query))
            .cloned()
            .collect()
    }

    fn detail_brand_of(state: &ScriptedState, product: &str) -> Option<String> {
        state
            .detail_brands
            .iter()
            .find(|(name, _)| name == product)
            .map(|(_, brand)| brand.clone())
    }

    /// Number of matches a selector currently has
    fn match_count(state: &mut ScriptedState, target: &Target) -> VitrinaResult<usize> {
        let view = Self::active_view(state)?.view.clone();
        Ok(match target {
            Target::ProductNames | Target::ProductLinks | Target::ProductPrices => {
                Self::current_items(state)?.len()
            }
            Target::Loader => usize::from(state.loader_polls > 0),
            Target::Skeleton => 0,
            Target::PaginationRegion => usize::from(
                matches!(view, View::Listing) && !state.hide_pagination_region,
            ),
            Target::NextControl => {
                usize::from(matches!(view, View::Listing) && state.pages.len() > 1)
            }
            Target::PageTitle => {
                usize::from(matches!(view, View::Listing | View::SearchResults))
            }
            Target::BrandImage => match &view {
                View::Detail { product } => usize::from(
                    Self::detail_brand_of(state, product).is_some_and(|b| !b.is_empty()),
                ),
                _ => 0,
            },
            Target::CatalogButton => usize::from(matches!(view, View::Home)),
            Target::CategoryEntry(_) => {
                usize::from(matches!(view, View::Home) && state.catalog_open)
            }
            Target::SubcategoryEntry(_) => usize::from(
                matches!(view, View::Home)
                    && state.catalog_open
                    && state.hovered_category.is_some(),
            ),
            Target::MinPriceInput | Target::MaxPriceInput | Target::BrandSearchInput => {
                usize::from(matches!(view, View::Listing))
            }
            Target::BrandOption(brand) => usize::from(
                matches!(view, View::Listing)
                    && state.visible_brands.iter().any(|b| b == brand),
            ),
            Target::BrandShowMore => usize::from(matches!(view, View::Listing)),
            Target::SearchInput | Target::SearchButton => {
                usize::from(!matches!(view, View::Detail { .. }))
            }
            Target::Unknown => 0,
        })
    }
}

impl PageDriver for ScriptedCatalog {
    fn navigate(&self, url: &str) -> VitrinaResult<()> {
        let mut state = self.state.borrow_mut();
        let base = state.base_url.clone();
        let active = state.active.ok_or(VitrinaError::InvalidState {
            message: "no active browsing context".to_string(),
        })?;
        let context = state
            .contexts
            .iter_mut()
            .find(|ctx| ctx.id == active)
            .ok_or(VitrinaError::InvalidState {
                message: "active context was closed".to_string(),
            })?;
        context.url = url.to_string();
        context.view = if url == base { View::Home } else { View::Listing };
        Ok(())
    }

    fn current_url(&self) -> VitrinaResult<String> {
        let state = self.state.borrow();
        Ok(Self::active_view(&state)?.url.clone())
    }

    fn find_all(&self, selector: &Selector) -> VitrinaResult<Vec<ElementRef>> {
        let mut state = self.state.borrow_mut();
        let count = Self::match_count(&mut state, &classify(selector))?;
        Ok((0..count)
            .map(|index| ElementRef::new(selector.clone(), index))
            .collect())
    }

    fn read_text(&self, element: &ElementRef) -> VitrinaResult<String> {
        let state = self.state.borrow();
        match classify(&element.selector) {
            Target::ProductNames | Target::ProductLinks => Ok(Self::current_items(&state)?
                .get(element.index)
                .map(|item| item.name.clone())
                .unwrap_or_default()),
            Target::ProductPrices => Ok(Self::current_items(&state)?
                .get(element.index)
                .map(|item| item.price_text.clone())
                .unwrap_or_default()),
            Target::PageTitle => Ok(state.title.clone()),
            Target::BrandOption(brand) => Ok(brand),
            Target::CategoryEntry(name) | Target::SubcategoryEntry(name) => Ok(name),
            _ => Ok(String::new()),
        }
    }

    fn read_attribute(&self, element: &ElementRef, name: &str) -> VitrinaResult<Option<String>> {
        let mut state = self.state.borrow_mut();
        if let Some(message) = state.fail_next_attribute_read.take() {
            return Err(VitrinaError::PageError { message });
        }
        match classify(&element.selector) {
            Target::BrandImage if name == "alt" => {
                let view = Self::active_view(&state)?.view.clone();
                if let View::Detail { product } = view {
                    Ok(Self::detail_brand_of(&state, &product))
                } else {
                    Ok(None)
                }
            }
            _ => Ok(None),
        }
    }

    fn click(&self, element: &ElementRef) -> VitrinaResult<()> {
        let mut state = self.state.borrow_mut();
        match classify(&element.selector) {
            Target::ProductLinks => {
                let items = Self::current_items(&state)?;
                let Some(item) = items.get(element.index) else {
                    return Ok(());
                };
                if state.suppress_detail_open {
                    return Ok(());
                }
                let id = ContextId::new(state.next_context_id);
                state.next_context_id += 1;
                let base = state.base_url.clone();
                let name = item.name.clone();
                state.contexts.push(ScriptedContext {
                    id,
                    view: View::Detail {
                        product: name.clone(),
                    },
                    url: format!("{base}/product/{}", name.replace(' ', "-")),
                });
                state.detail_opens.push(name);
            }
            Target::NextControl => {
                if state.page_index + 1 < state.pages.len() {
                    state.page_index += 1;
                    let base = state.base_url.clone();
                    let page = state.page_index;
                    let active = state.active;
                    if let Some(context) = state
                        .contexts
                        .iter_mut()
                        .find(|ctx| Some(ctx.id) == active)
                    {
                        context.url = format!("{base}/catalog?page={page}");
                    }
                }
            }
            Target::CatalogButton => state.catalog_open = true,
            Target::SubcategoryEntry(subcategory) => {
                let category = state.hovered_category.clone().unwrap_or_default();
                state.navigated = Some((category, subcategory));
                state.catalog_open = false;
                state.page_index = 0;
                let base = state.base_url.clone();
                let active = state.active;
                if let Some(context) = state
                    .contexts
                    .iter_mut()
                    .find(|ctx| Some(ctx.id) == active)
                {
                    context.view = View::Listing;
                    context.url = format!("{base}/catalog?page=0");
                }
            }
            Target::BrandOption(brand) => state.filter_log.brands.push(brand),
            Target::BrandShowMore => {
                let hidden = std::mem::take(&mut state.hidden_brands);
                state.visible_brands.extend(hidden);
            }
            Target::SearchButton => {
                let query = state.search_query.clone();
                state.submitted_query = Some(query.clone());
                let base = state.base_url.clone();
                let active = state.active;
                if let Some(context) = state
                    .contexts
                    .iter_mut()
                    .find(|ctx| Some(ctx.id) == active)
                {
                    context.view = View::SearchResults;
                    context.url = format!("{base}/search?text={}", query.replace(' ', "+"));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn type_text(&self, element: &ElementRef, text: &str) -> VitrinaResult<()> {
        let mut state = self.state.borrow_mut();
        match classify(&element.selector) {
            Target::SearchInput => state.search_query = text.to_string(),
            Target::MinPriceInput => state.filter_log.min_price = Some(text.to_string()),
            Target::MaxPriceInput => state.filter_log.max_price = Some(text.to_string()),
            Target::BrandSearchInput => {
                if let Some(position) = state.hidden_brands.iter().position(|b| b == text) {
                    let brand = state.hidden_brands.remove(position);
                    state.visible_brands.push(brand);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn hover(&self, element: &ElementRef) -> VitrinaResult<()> {
        let mut state = self.state.borrow_mut();
        if let Target::CategoryEntry(category) = classify(&element.selector) {
            state.hovered_category = Some(category);
        }
        Ok(())
    }

    fn scroll_into_view(&self, _element: &ElementRef) -> VitrinaResult<()> {
        Ok(())
    }

    fn scroll_to_top(&self) -> VitrinaResult<()> {
        Ok(())
    }

    fn is_visible(&self, element: &ElementRef) -> VitrinaResult<bool> {
        let mut state = self.state.borrow_mut();
        match classify(&element.selector) {
            Target::Loader => {
                if state.loader_polls > 0 {
                    state.loader_polls -= 1;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Target::NextControl => Ok(!state.hide_next_control),
            target => {
                let count = Self::match_count(&mut state, &target)?;
                Ok(element.index < count)
            }
        }
    }

    fn is_enabled(&self, element: &ElementRef) -> VitrinaResult<bool> {
        let mut state = self.state.borrow_mut();
        match classify(&element.selector) {
            Target::NextControl => Ok(state.page_index + 1 < state.pages.len()),
            target => {
                let count = Self::match_count(&mut state, &target)?;
                Ok(element.index < count)
            }
        }
    }

    fn context_ids(&self) -> VitrinaResult<Vec<ContextId>> {
        Ok(self
            .state
            .borrow()
            .contexts
            .iter()
            .map(|ctx| ctx.id)
            .collect())
    }

    fn active_context(&self) -> VitrinaResult<ContextId> {
        self.state
            .borrow()
            .active
            .ok_or(VitrinaError::InvalidState {
                message: "no active browsing context".to_string(),
            })
    }

    fn switch_context(&self, id: ContextId) -> VitrinaResult<()> {
        let mut state = self.state.borrow_mut();
        if !state.contexts.iter().any(|ctx| ctx.id == id) {
            return Err(VitrinaError::InvalidState {
                message: format!("unknown browsing context {id}"),
            });
        }
        state.active = Some(id);
        Ok(())
    }

    fn close_active_context(&self) -> VitrinaResult<()> {
        let mut state = self.state.borrow_mut();
        let active = state.active.ok_or(VitrinaError::InvalidState {
            message: "no active browsing context".to_string(),
        })?;
        state.contexts.retain(|ctx| ctx.id != active);
        state.active = None;
        Ok(())
    }

    fn wait_timeout(&self) -> Duration {
        self.state.borrow().wait_timeout
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn listing() -> ScriptedCatalog {
        ScriptedCatalog::builder()
            .page(vec![
                ScriptedItem::new("Lenovo IdeaPad 3", "Цена 45 990 ₽"),
                ScriptedItem::new("HP Pavilion 15", "Цена 60 000 ₽"),
            ])
            .build()
    }

    #[test]
    fn test_find_all_and_read_listing() {
        let driver = listing();
        let names = driver.find_all(&catalog::product_names()).unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(driver.read_text(&names[0]).unwrap(), "Lenovo IdeaPad 3");
        let prices = driver.find_all(&catalog::product_prices()).unwrap();
        assert_eq!(driver.read_text(&prices[1]).unwrap(), "Цена 60 000 ₽");
    }

    #[test]
    fn test_detail_open_and_close_cycle() {
        let driver = ScriptedCatalog::builder()
            .page(vec![ScriptedItem::new("IdeaPad 3", "45 990")])
            .detail_brand("IdeaPad 3", "Lenovo")
            .build();
        let links = driver.find_all(&catalog::product_links()).unwrap();
        driver.click(&links[0]).unwrap();
        assert_eq!(driver.context_ids().unwrap().len(), 2);

        let origin = driver.active_context().unwrap();
        let detail = driver
            .context_ids()
            .unwrap()
            .into_iter()
            .find(|id| *id != origin)
            .unwrap();
        driver.switch_context(detail).unwrap();
        let images = driver.find_all(&catalog::brand_image()).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(
            driver.read_attribute(&images[0], "alt").unwrap(),
            Some("Lenovo".to_string())
        );

        driver.close_active_context().unwrap();
        assert!(driver.active_context().is_err());
        driver.switch_context(origin).unwrap();
        assert_eq!(driver.context_ids().unwrap().len(), 1);
    }

    #[test]
    fn test_search_defaults_to_containment() {
        let driver = listing();
        let input = driver.find_all(&catalog::search_input()).unwrap();
        driver.type_text(&input[0], "Lenovo IdeaPad 3").unwrap();
        let button = driver.find_all(&catalog::search_button()).unwrap();
        driver.click(&button[0]).unwrap();
        assert_eq!(
            driver.submitted_query(),
            Some("Lenovo IdeaPad 3".to_string())
        );
        let names = driver.find_all(&catalog::product_names()).unwrap();
        assert_eq!(names.len(), 1);
        assert!(driver.current_url().unwrap().contains("/search?text="));
    }

    #[test]
    fn test_brand_show_more_reveals_hidden_options() {
        let driver = ScriptedCatalog::builder()
            .page(Vec::new())
            .visible_brand_options(["Lenovo"])
            .hidden_brand_options(["HP"])
            .build();
        assert!(driver
            .find_all(&catalog::brand_option("HP"))
            .unwrap()
            .is_empty());
        let more = driver.find_all(&catalog::brand_show_more()).unwrap();
        driver.click(&more[0]).unwrap();
        assert_eq!(driver.find_all(&catalog::brand_option("HP")).unwrap().len(), 1);
    }

    #[test]
    fn test_home_catalog_flow() {
        let driver = ScriptedCatalog::builder()
            .page(Vec::new())
            .start_at_home()
            .build();
        assert!(driver
            .find_all(&catalog::category_entry("Ноутбуки и компьютеры"))
            .unwrap()
            .is_empty());

        let button = driver.find_all(&catalog::catalog_button()).unwrap();
        driver.click(&button[0]).unwrap();
        let category = driver
            .find_all(&catalog::category_entry("Ноутбуки и компьютеры"))
            .unwrap();
        driver.hover(&category[0]).unwrap();
        let subcategory = driver
            .find_all(&catalog::subcategory_entry("Ноутбуки"))
            .unwrap();
        driver.click(&subcategory[0]).unwrap();

        assert_eq!(
            driver.navigated(),
            Some((
                "Ноутбуки и компьютеры".to_string(),
                "Ноутбуки".to_string()
            ))
        );
        assert!(driver.current_url().unwrap().contains("/catalog"));
    }

    #[test]
    fn test_wait_until_visible_via_trait() {
        let driver = listing();
        let element = driver.wait_until_visible(&catalog::product_names()).unwrap();
        assert_eq!(element.index, 0);
    }

    #[test]
    fn test_wait_timeout_expires() {
        let driver = ScriptedCatalog::builder()
            .page(Vec::new())
            .wait_timeout_ms(80)
            .build();
        let err = driver
            .wait_until_visible(&catalog::product_names())
            .unwrap_err();
        assert!(matches!(err, VitrinaError::Timeout { .. }));
    }
}
