use std::time::Duration;

use url::Url;

use crate::error::AppError;
use crate::models::ProductName;

pub const DEFAULT_BASE_URL: &str = "https://live.techpanda.org/index.php/";
pub const DEFAULT_CATEGORY: &str = "MOBILE";

/// Keywords accepted in an inventory-limit error message.
pub const INVENTORY_KEYWORDS: [&str; 6] = [
    "requested",
    "available",
    "not",
    "maximum",
    "qty",
    "quantity",
];

/// Where the storefront lives and which category to drill into.
#[derive(Debug, Clone)]
pub struct Storefront {
    pub base_url: Url,
    /// Visible text of the category link.
    pub category: String,
}

impl Storefront {
    /// Validate the base URL: it must be absolute `http` or `https`.
    pub fn new(base_url: &str, category: &str) -> Result<Self, AppError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("Invalid base URL '{base_url}': {e}")))?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            let message = format!("URL scheme '{scheme}' is not allowed (only http/https)");
            return Err(AppError::Config(message));
        }

        let category = category.trim();
        if category.is_empty() {
            let message = "Category link text must not be empty".to_string();
            return Err(AppError::Config(message));
        }

        Ok(Self {
            base_url: parsed,
            category: category.to_string(),
        })
    }
}

impl Default for Storefront {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("valid default URL"),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

/// Settings for the list-vs-detail price check.
#[derive(Debug, Clone)]
pub struct PriceCheckConfig {
    /// Products to check, in report order.
    pub products: Vec<ProductName>,
    /// Bound on every page-state wait.
    pub wait: Duration,
}

impl PriceCheckConfig {
    pub fn new(products: Vec<ProductName>) -> Self {
        Self {
            products,
            ..Self::default()
        }
    }

    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }
}

impl Default for PriceCheckConfig {
    /// The three default products, 20 s waits.
    fn default() -> Self {
        Self {
            products: ProductName::defaults(),
            wait: Duration::from_secs(20),
        }
    }
}

/// Settings for the inventory-overflow check.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Quantity typed into the cart form.
    pub quantity: String,
    /// Lower-case keywords; the error message must contain one of them.
    pub keywords: Vec<String>,
    pub wait: Duration,
    /// How long to watch for a native dialog after adding to cart.
    pub dialog_wait: Duration,
}

impl InventoryConfig {
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.to_string();
        self
    }

    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_dialog_wait(mut self, dialog_wait: Duration) -> Self {
        self.dialog_wait = dialog_wait;
        self
    }
}

impl Default for InventoryConfig {
    /// Quantity 999, 10 s waits, 2 s dialog window.
    fn default() -> Self {
        Self {
            quantity: "999".to_string(),
            keywords: INVENTORY_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            wait: Duration::from_secs(10),
            dialog_wait: Duration::from_secs(2),
        }
    }
}
