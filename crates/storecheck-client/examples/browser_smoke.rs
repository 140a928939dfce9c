/// Smoke-test for `ChromiumDriver`.
///
/// Launches a headless Chromium, opens the demo storefront, follows the
/// MOBILE category link, and prints the first listed product with its price.
///
/// Run with:
///   cargo run -p storecheck-client --example browser_smoke
use std::time::Duration;

use storecheck_client::{ChromiumDriver, DriverOptions};
use storecheck_core::config::Storefront;
use storecheck_core::locator;
use storecheck_core::navigation::open_category;
use storecheck_core::price::extract_price;
use storecheck_core::traits::{Driver, Selector};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    println!("Launching headless browser…");
    let driver = ChromiumDriver::launch(&DriverOptions::default()).await?;

    let result = smoke(&driver).await;
    driver.quit().await;
    result
}

async fn smoke(driver: &ChromiumDriver) -> anyhow::Result<()> {
    let shop = Storefront::default();
    println!("Opening {} …", shop.base_url);
    open_category(driver, &shop, Duration::from_secs(20)).await?;

    let link = driver
        .wait_for(&Selector::css(locator::FIRST_PRODUCT_LINK), Duration::from_secs(5))
        .await?;
    let name = driver.text(&link).await?;

    let items = driver.find_all(None, &Selector::css("li.item")).await?;
    anyhow::ensure!(!items.is_empty(), "No listing items found");
    let price = extract_price(driver, &items[0]).await?;

    println!("OK: {} items listed, first: {} at {}", items.len(), name.trim(), price.trim());
    Ok(())
}
