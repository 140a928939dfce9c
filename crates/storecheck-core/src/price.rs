use crate::error::AppError;
use crate::locator::{REGULAR_PRICE, SPECIAL_PRICE};
use crate::traits::{Driver, Selector};

/// Keep only ASCII digits and `.` from a raw price string.
///
/// This is a textual filter, not a parser: `"$1,234.00"` becomes
/// `"1234.00"`, while `"1234"` and `"1234.00"` stay distinct.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect::<String>()
        .trim()
        .to_string()
}

/// [`normalize`] lifted over an absent price.
pub fn normalize_price(raw: Option<&str>) -> Option<String> {
    raw.map(normalize)
}

/// Read the effective price inside `context`.
///
/// A special (discount) price wins over the regular one; with neither present
/// the lookup fails with [`AppError::NotFound`].
pub async fn extract_price<D: Driver>(
    driver: &D,
    context: &D::Element,
) -> Result<String, AppError> {
    let special = Selector::css(SPECIAL_PRICE);
    if let Some(first) = driver.find_all(Some(context), &special).await?.first() {
        return driver.text(first).await;
    }

    let regular = Selector::css(REGULAR_PRICE);
    match driver.find_one(Some(context), &regular).await? {
        Some(element) => driver.text(&element).await,
        None => Err(AppError::not_found(regular)),
    }
}
