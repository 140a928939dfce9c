use crate::config::{InventoryConfig, Storefront};
use crate::error::AppError;
use crate::locator;
use crate::models::InventoryOutcome;
use crate::navigation::{open_category, open_first_product};
use crate::report::{CheckEvent, CheckReporter, TracingCheckReporter};
use crate::traits::{Driver, Selector};

/// First keyword contained in `message`, compared case-insensitively.
pub fn matched_keyword<'k>(message: &str, keywords: &'k [String]) -> Option<&'k str> {
    let lower = message.to_lowercase();
    keywords
        .iter()
        .map(String::as_str)
        .find(|k| lower.contains(&k.to_lowercase()))
}

/// Adds an oversized quantity to the cart and asserts the storefront refuses
/// it with an inventory-limit message.
///
/// Unlike the price check, the single assertion here is fatal: a message
/// without any expected keyword fails the run with [`AppError::Assertion`].
pub struct InventoryCheck<'a, D, R = TracingCheckReporter>
where
    D: Driver,
    R: CheckReporter,
{
    driver: &'a D,
    storefront: &'a Storefront,
    config: &'a InventoryConfig,
    reporter: R,
}

impl<'a, D: Driver> InventoryCheck<'a, D> {
    pub fn new(driver: &'a D, storefront: &'a Storefront, config: &'a InventoryConfig) -> Self {
        Self::with_reporter(driver, storefront, config, TracingCheckReporter)
    }
}

impl<'a, D, R> InventoryCheck<'a, D, R>
where
    D: Driver,
    R: CheckReporter,
{
    pub fn with_reporter(
        driver: &'a D,
        storefront: &'a Storefront,
        config: &'a InventoryConfig,
        reporter: R,
    ) -> Self {
        Self {
            driver,
            storefront,
            config,
            reporter,
        }
    }

    pub async fn run(&self) -> Result<InventoryOutcome, AppError> {
        let wait = self.config.wait;

        open_category(self.driver, self.storefront, wait).await?;
        open_first_product(self.driver, wait).await?;

        let qty = self
            .driver
            .wait_for(&Selector::css(locator::QTY_INPUT), wait)
            .await?;
        self.driver.clear(&qty).await?;
        self.driver.type_text(&qty, &self.config.quantity).await?;
        tracing::debug!(quantity = %self.config.quantity, "Quantity entered");

        let add = self
            .driver
            .wait_for(&Selector::css(locator::ADD_TO_CART), wait)
            .await?;
        self.driver.click(&add).await?;

        // Some environments warn about submitting over an insecure connection.
        let dialog = self.driver.accept_dialog(self.config.dialog_wait).await?;
        if let Some(message) = &dialog {
            self.reporter.report(CheckEvent::DialogAccepted { message });
        }

        let (index, element) = self
            .driver
            .wait_for_any(&locator::error_messages(), wait)
            .await?;
        let message = self.driver.text(&element).await?.trim().to_string();
        let selector = locator::ERROR_MESSAGES[index];
        tracing::debug!(selector, "Error message located");
        let event = CheckEvent::InventoryMessage { message: &message };
        self.reporter.report(event);

        match matched_keyword(&message, &self.config.keywords) {
            Some(keyword) => Ok(InventoryOutcome {
                keyword: keyword.to_string(),
                message,
                dialog,
            }),
            None => {
                let reason = format!("Unexpected error message: {message}");
                Err(AppError::Assertion(reason))
            }
        }
    }
}
