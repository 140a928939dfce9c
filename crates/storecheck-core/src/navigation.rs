use std::time::Duration;

use crate::config::Storefront;
use crate::error::AppError;
use crate::locator;
use crate::models::ProductName;
use crate::traits::{Driver, Selector};

/// Load the storefront and open its category listing.
///
/// Blocks until the listing marker is present; a missing link or marker
/// surfaces as [`AppError::Timeout`] after `wait`.
pub async fn open_category<D: Driver>(
    driver: &D,
    storefront: &Storefront,
    wait: Duration,
) -> Result<(), AppError> {
    driver.navigate(storefront.base_url.as_str()).await?;

    let link = driver
        .wait_for(&Selector::link_text(storefront.category.as_str()), wait)
        .await?;
    driver.click(&link).await?;

    driver
        .wait_for(&Selector::css(locator::CATEGORY_PRODUCTS), wait)
        .await?;
    tracing::debug!(category = %storefront.category, "Category listing open");
    Ok(())
}

/// From a category listing, open the detail page of `product`.
pub async fn open_product_detail<D: Driver>(
    driver: &D,
    product: &ProductName,
    wait: Duration,
) -> Result<(), AppError> {
    let link = driver.wait_for(&locator::product_link(product), wait).await?;
    driver.click(&link).await?;
    driver
        .wait_for(&Selector::css(locator::PRODUCT_VIEW), wait)
        .await?;
    tracing::debug!(%product, "Product detail open");
    Ok(())
}

/// From a category listing, open whichever product is listed first.
pub async fn open_first_product<D: Driver>(driver: &D, wait: Duration) -> Result<(), AppError> {
    let link = driver
        .wait_for(&Selector::css(locator::FIRST_PRODUCT_LINK), wait)
        .await?;
    let title = driver.text(&link).await.unwrap_or_default();
    driver.click(&link).await?;
    driver
        .wait_for(&Selector::css(locator::PRODUCT_VIEW), wait)
        .await?;
    tracing::debug!(product = %title.trim(), "First listed product open");
    Ok(())
}
