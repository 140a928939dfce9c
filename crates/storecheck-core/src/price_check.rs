use crate::config::{PriceCheckConfig, Storefront};
use crate::error::AppError;
use crate::locator;
use crate::models::{Issue, IssueKind, PriceReport, ProductName};
use crate::navigation::{open_category, open_product_detail};
use crate::price::{extract_price, normalize, normalize_price};
use crate::report::{CheckEvent, CheckReporter, TracingCheckReporter};
use crate::traits::{Driver, Selector};

/// Compares list-page and detail-page prices for a set of products.
///
/// Runs in three phases: collect list prices, verify each detail page
/// against them, report. Per-product failures never abort the run; they are
/// recorded as issues instead.
pub struct PriceCheckService<'a, D, R = TracingCheckReporter>
where
    D: Driver,
    R: CheckReporter,
{
    driver: &'a D,
    storefront: &'a Storefront,
    config: &'a PriceCheckConfig,
    reporter: R,
}

impl<'a, D: Driver> PriceCheckService<'a, D> {
    pub fn new(driver: &'a D, storefront: &'a Storefront, config: &'a PriceCheckConfig) -> Self {
        Self::with_reporter(driver, storefront, config, TracingCheckReporter)
    }
}

impl<'a, D, R> PriceCheckService<'a, D, R>
where
    D: Driver,
    R: CheckReporter,
{
    pub fn with_reporter(
        driver: &'a D,
        storefront: &'a Storefront,
        config: &'a PriceCheckConfig,
        reporter: R,
    ) -> Self {
        Self {
            driver,
            storefront,
            config,
            reporter,
        }
    }

    /// Run all phases and return the report.
    pub async fn run(&self) -> PriceReport {
        let mut report = PriceReport::default();

        // Phase A: list prices
        for product in &self.config.products {
            let raw = match self.list_price(product).await {
                Ok(raw) => Some(raw),
                Err(error) => {
                    let event = CheckEvent::ListPriceFailed {
                        product,
                        error: &error,
                    };
                    self.reporter.report(event);
                    self.record(&mut report, product, IssueKind::ListError(error));
                    None
                }
            };

            let price = normalize_price(raw.as_deref());
            if let Some(price) = price.as_deref() {
                let event = CheckEvent::ListPriceRead { product, price };
                self.reporter.report(event);
            }
            report.list_prices.insert(product.clone(), price);
        }

        // Phase B: detail prices, compared against phase A
        for product in &self.config.products {
            self.reporter.report(CheckEvent::DetailStarted { product });

            match self.detail_price(product).await {
                Ok(detail) => {
                    let list = report.list_prices.get(product).map(str::to_string);
                    let event = CheckEvent::PricesCompared {
                        product,
                        list: list.as_deref(),
                        detail: &detail,
                    };
                    self.reporter.report(event);
                    if let Some(kind) = compare(list, detail) {
                        self.record(&mut report, product, kind);
                    }
                }
                Err(error) => {
                    let event = CheckEvent::DetailFailed {
                        product,
                        error: &error,
                    };
                    self.reporter.report(event);
                    self.record(&mut report, product, IssueKind::DetailError(error));
                }
            }

            self.reporter.report(CheckEvent::DetailFinished { product });
        }

        tracing::info!(
            products = self.config.products.len(),
            issues = report.issues.len(),
            "Price check complete"
        );
        report
    }

    /// Raw price text of `product` on the category listing.
    async fn list_price(&self, product: &ProductName) -> Result<String, AppError> {
        let wait = self.config.wait;
        open_category(self.driver, self.storefront, wait).await?;
        let selector = locator::product_item(product);
        let item = self.driver.wait_for(&selector, wait).await?;
        let raw = extract_price(self.driver, &item).await?;
        tracing::debug!(%product, %raw, "List price raw text");
        Ok(raw)
    }

    /// Normalized price of `product` on its own detail page.
    async fn detail_price(&self, product: &ProductName) -> Result<String, AppError> {
        let wait = self.config.wait;
        open_category(self.driver, self.storefront, wait).await?;
        open_product_detail(self.driver, product, wait).await?;
        let selector = Selector::css(locator::PRODUCT_SHOP);
        let shop = self.driver.wait_for(&selector, wait).await?;
        let raw = extract_price(self.driver, &shop).await?;
        tracing::debug!(%product, %raw, "Detail price raw text");
        Ok(normalize(&raw))
    }

    fn record(&self, report: &mut PriceReport, product: &ProductName, kind: IssueKind) {
        let issue = Issue::new(product.clone(), kind);
        self.reporter.report(CheckEvent::IssueRecorded { issue: &issue });
        report.issues.push(issue);
    }
}

/// Plain string comparison of normalized prices.
fn compare(list: Option<String>, detail: String) -> Option<IssueKind> {
    match list {
        None => Some(IssueKind::ListPriceMissing),
        Some(list) if list != detail => Some(IssueKind::Mismatch { list, detail }),
        Some(_) => None,
    }
}
