use std::future::Future;

use crate::traits::Driver;

/// Await `scenario`, then release the browser session whatever the outcome.
pub async fn run_then_quit<D, F, T>(driver: &D, scenario: F) -> T
where
    D: Driver,
    F: Future<Output = T>,
{
    let outcome = scenario.await;
    driver.quit().await;
    tracing::debug!("Session released");
    outcome
}
