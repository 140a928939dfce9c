//! Selectors for the storefront's DOM.
//!
//! The constants describe the page structure the scenarios depend on; the
//! builder functions produce case-insensitive product lookups.
//!
//! XPath 1.0 `translate()` only folds the ASCII alphabet, so names are
//! upper-cased with ASCII rules on the Rust side too. Non-ASCII letters are
//! compared exactly as written.

use crate::models::ProductName;
use crate::traits::Selector;

/// Marker present once a category listing has rendered.
pub const CATEGORY_PRODUCTS: &str = ".category-products";
/// Marker present once a product detail page has rendered.
pub const PRODUCT_VIEW: &str = ".product-view";
/// Price/summary block of the detail page.
pub const PRODUCT_SHOP: &str = ".product-shop";
/// First product link on a listing, in document order.
pub const FIRST_PRODUCT_LINK: &str = "h2.product-name a";
pub const SPECIAL_PRICE: &str = ".special-price .price";
pub const REGULAR_PRICE: &str = ".price-box .price";
pub const QTY_INPUT: &str = "input.qty";
pub const ADD_TO_CART: &str = "button.btn-cart";
/// Alternative error-message containers, most specific first.
pub const ERROR_MESSAGES: [&str; 3] = ["li.error-msg", ".error-msg", ".error"];

const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Listing entry.
const LIST_ITEM: &str = "li[contains(@class, 'item')]";
/// `h2` carrying the `product-name` class.
const PRODUCT_HEADING: &str =
    "h2[contains(concat(' ', normalize-space(@class), ' '), ' product-name ')]";

/// Link in a product-name heading whose text contains `product`,
/// ignoring case and surrounding whitespace.
pub fn product_link(product: &ProductName) -> Selector {
    let text = contains_upper(product);
    Selector::xpath(format!("//{PRODUCT_HEADING}/a[{text}]"))
}

/// Listing item (`li.item`) that holds the link for `product`.
pub fn product_item(product: &ProductName) -> Selector {
    let text = contains_upper(product);
    Selector::xpath(format!("//{LIST_ITEM}[.//{PRODUCT_HEADING}/a[{text}]]"))
}

/// Candidate selectors for the storefront's error message, in priority order.
pub fn error_messages() -> Vec<Selector> {
    ERROR_MESSAGES.iter().map(|s| Selector::css(*s)).collect()
}

/// Anchors whose whitespace-normalized text equals `text` ignoring case.
///
/// Drivers narrow these candidates down with the rendered text, which is
/// what a link-text lookup compares against.
pub fn link_text_candidates(text: &str) -> String {
    let wanted = xpath_literal(&text.trim().to_ascii_uppercase());
    format!("//a[{} = {wanted}]", upper_text())
}

fn contains_upper(product: &ProductName) -> String {
    let wanted = xpath_literal(product.as_str());
    format!("contains({}, {wanted})", upper_text())
}

/// The context node's normalized text, ASCII-upper-cased.
fn upper_text() -> String {
    format!("translate(normalize-space(.), '{LOWER}', '{UPPER}')")
}

/// Quote `s` as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so a value holding both quote kinds is
/// spliced together with `concat()`.
pub fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{s}'");
    }
    if !s.contains('"') {
        return format!("\"{s}\"");
    }
    let parts: Vec<String> = s.split('\'').map(|part| format!("'{part}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}
