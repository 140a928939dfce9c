use std::fmt;

use crate::error::{AppError, ErrorKind};

/// Products checked when no list is given on the command line.
pub const DEFAULT_PRODUCTS: [&str; 3] = ["SONY XPERIA", "IPHONE", "SAMSUNG GALAXY"];

/// Product identifier, matched against catalog titles case-insensitively.
///
/// Always stored trimmed and upper-cased with ASCII rules, the same folding
/// the XPath lookups apply to page text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductName(String);

impl ProductName {
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_ascii_uppercase())
    }

    /// Like [`ProductName::new`], but rejects names that are empty after
    /// trimming, which would match every listed product.
    pub fn parse(name: &str) -> Result<Self, AppError> {
        let product = Self::new(name);
        if product.0.is_empty() {
            return Err(AppError::Config("Product name must not be empty".into()));
        }
        Ok(product)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The default product list, in declaration order.
    pub fn defaults() -> Vec<ProductName> {
        DEFAULT_PRODUCTS.iter().map(|n| ProductName::new(n)).collect()
    }
}

impl fmt::Display for ProductName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized list prices keyed by product, in insertion order.
///
/// `None` marks a product whose list price could not be extracted.
#[derive(Debug, Clone, Default)]
pub struct PriceRecord {
    entries: Vec<(ProductName, Option<String>)>,
}

impl PriceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a price; a product already present is overwritten in place.
    pub fn insert(&mut self, product: ProductName, price: Option<String>) {
        match self.entries.iter_mut().find(|(p, _)| *p == product) {
            Some(entry) => entry.1 = price,
            None => self.entries.push((product, price)),
        }
    }

    /// `None` if the product was never recorded or its price is absent.
    pub fn get(&self, product: &ProductName) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == product)
            .and_then(|(_, price)| price.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProductName, Option<&str>)> {
        self.entries.iter().map(|(p, price)| (p, price.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What went wrong for a product.
#[derive(Debug)]
pub enum IssueKind {
    /// List price extraction failed.
    ListError(AppError),
    /// Detail price was read but there is no list price to compare with.
    ListPriceMissing,
    Mismatch { list: String, detail: String },
    /// Navigation or extraction on the detail page failed.
    DetailError(AppError),
}

impl IssueKind {
    /// Classification of the underlying error, for error-carrying kinds.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            IssueKind::ListError(e) | IssueKind::DetailError(e) => Some(e.kind()),
            _ => None,
        }
    }

    pub fn cause(&self) -> Option<&AppError> {
        match self {
            IssueKind::ListError(e) | IssueKind::DetailError(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::ListError(e) => write!(f, "LIST_ERROR({})", e.kind()),
            IssueKind::ListPriceMissing => f.write_str("LIST_PRICE_MISSING"),
            IssueKind::Mismatch { list, detail } => {
                write!(f, "MISMATCH(List {list} vs Detail {detail})")
            }
            IssueKind::DetailError(e) => write!(f, "DETAIL_ERROR({})", e.kind()),
        }
    }
}

/// A discrepancy or failure surfaced in the final report.
#[derive(Debug)]
pub struct Issue {
    pub product: ProductName,
    pub kind: IssueKind,
}

impl Issue {
    pub fn new(product: ProductName, kind: IssueKind) -> Self {
        Self { product, kind }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.product, self.kind)
    }
}

/// Outcome of a price-check run.
#[derive(Debug, Default)]
pub struct PriceReport {
    pub list_prices: PriceRecord,
    pub issues: Vec<Issue>,
}

impl PriceReport {
    pub fn is_pass(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for PriceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pass() {
            return f.write_str("PASS: All product prices match (list vs detail).");
        }
        f.write_str("FAIL: Issues found:")?;
        for issue in &self.issues {
            write!(f, "\n - {issue}")?;
        }
        Ok(())
    }
}

/// Outcome of a passing inventory-overflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryOutcome {
    /// Error message shown by the storefront, trimmed.
    pub message: String,
    /// First expected keyword found in the message.
    pub keyword: String,
    /// Text of the native dialog accepted on the way, if any.
    pub dialog: Option<String>,
}
