//! Price text normalization.
//!
//! Listing prices arrive as heterogeneous text ("Цена 45 990 ₽", with
//! regular, thin or non-breaking spaces). Extraction keeps only the digit
//! run and parses it as an integer.
//!
//! Two consequences are deliberate, documented behavior rather than defects:
//! text carrying two separate numbers (a price range) concatenates into one
//! misleading value, and `0` is ambiguous between "no price present" and
//! "legitimately free". Callers decide how to treat `0` via
//! [`crate::criteria::ZeroPricePolicy`].

/// Sentinel for text no price could be extracted from
pub const UNPARSEABLE_PRICE: u64 = 0;

/// Extract the integer price from raw text.
///
/// Total over all inputs: never panics, `None` and digit-free text yield
/// [`UNPARSEABLE_PRICE`]. A digit run too long for `u64` is treated as
/// unparseable as well.
#[must_use]
pub fn extract_price(text: Option<&str>) -> u64 {
    let Some(text) = text else {
        return UNPARSEABLE_PRICE;
    };
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return UNPARSEABLE_PRICE;
    }
    digits.parse().unwrap_or(UNPARSEABLE_PRICE)
}
