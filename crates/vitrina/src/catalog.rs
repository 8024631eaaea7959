//! Element locators for the marketplace surface under validation.
//!
//! One place for every selector the engine and page objects touch, in the
//! spirit of the usual page-object locator interface. Parameterized entries
//! build the XPath from the runtime value, so the values must not contain
//! quote characters.

use crate::locator::Selector;

/// Item name nodes on a listing page
#[must_use]
pub fn product_names() -> Selector {
    Selector::xpath("//article//span[@itemprop='name']")
}

/// Detail links wrapping the item name nodes
#[must_use]
pub fn product_links() -> Selector {
    Selector::xpath("//article//a[span[@itemprop='name']]")
}

/// Price nodes on a listing page
#[must_use]
pub fn product_prices() -> Selector {
    Selector::xpath("//article//span[contains(text(),'Цена')]")
}

/// Skeleton placeholder shown while a result roll is loading
#[must_use]
pub fn loading_skeleton() -> Selector {
    Selector::xpath("//div[@data-auto='rollSkeleton']")
}

/// Generic loader indicator
#[must_use]
pub fn loader() -> Selector {
    Selector::xpath("//div[contains(@data-auto,'loader')]")
}

/// Pagination region at the bottom of a listing page
#[must_use]
pub fn pagination_region() -> Selector {
    Selector::xpath("//div[@data-auto='pagination-page']")
}

/// Next-page control
#[must_use]
pub fn next_page_control() -> Selector {
    Selector::xpath("//div[@data-zone-name='next']")
}

/// Listing page title (H1)
#[must_use]
pub fn page_title() -> Selector {
    Selector::xpath("//h1[@data-auto='title']")
}

/// Brand image inside an item's detail view
#[must_use]
pub fn brand_image() -> Selector {
    Selector::xpath("//div[@data-zone-name='showAll']//img")
}

/// Button opening the catalog menu on the home page
#[must_use]
pub fn catalog_button() -> Selector {
    Selector::xpath("//button[./span[text()='Каталог']]")
}

/// Category entry in the opened catalog menu
#[must_use]
pub fn category_entry(category: &str) -> Selector {
    Selector::xpath(format!(
        "//div[@data-auto='catalog-content']//li[.//span[text()='{category}']]"
    ))
}

/// Subcategory link in the category tab panel
#[must_use]
pub fn subcategory_entry(subcategory: &str) -> Selector {
    Selector::xpath(format!(
        "//div[@role='tabpanel']//div[@data-zone-name='linkSnippet']//a[text()='{subcategory}']"
    ))
}

/// Minimum price filter input
#[must_use]
pub fn min_price_input() -> Selector {
    Selector::xpath("//input[contains(@id,'min') and contains(@id,'price')]")
}

/// Maximum price filter input
#[must_use]
pub fn max_price_input() -> Selector {
    Selector::xpath("//input[contains(@id,'max') and contains(@id,'price')]")
}

/// Brand checkbox option by visible label
#[must_use]
pub fn brand_option(brand: &str) -> Selector {
    Selector::xpath(format!(
        "//div[@data-auto='filter' and contains(.//span,'Бренд')]//label[@role='checkbox']//span[text()='{brand}']"
    ))
}

/// "Show more" control of the brand filter block
#[must_use]
pub fn brand_show_more() -> Selector {
    Selector::xpath(
        "//div[@data-auto='filter' and contains(.//span,'Бренд')]//div[@data-zone-name='showMoreFilters']//button",
    )
}

/// Search input of the brand filter block
#[must_use]
pub fn brand_search_input() -> Selector {
    Selector::xpath("//div[@data-auto='filter' and contains(.//span,'Бренд')]//input")
}

/// Header search input
#[must_use]
pub fn search_input() -> Selector {
    Selector::css("#header-search")
}

/// Header search submit button
#[must_use]
pub fn search_button() -> Selector {
    Selector::xpath("//button[@data-auto='search-button']")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameterized_category() {
        let sel = category_entry("Ноутбуки и компьютеры");
        match sel {
            Selector::XPath(x) => assert!(x.contains("text()='Ноутбуки и компьютеры'")),
            other => panic!("expected xpath, got {other:?}"),
        }
    }

    #[test]
    fn test_brand_option_embeds_brand() {
        let sel = brand_option("Lenovo");
        match sel {
            Selector::XPath(x) => assert!(x.contains("text()='Lenovo'")),
            other => panic!("expected xpath, got {other:?}"),
        }
    }

    #[test]
    fn test_search_input_is_css() {
        assert_eq!(search_input(), Selector::css("#header-search"));
    }
}
