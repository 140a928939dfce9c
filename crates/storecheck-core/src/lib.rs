pub mod config;
pub mod error;
pub mod inventory;
pub mod locator;
pub mod models;
pub mod navigation;
pub mod price;
pub mod price_check;
pub mod report;
pub mod session;
pub mod traits;

#[cfg(test)]
pub mod testutil;

pub use config::{InventoryConfig, PriceCheckConfig, Storefront};
pub use error::{AppError, ErrorKind};
pub use inventory::InventoryCheck;
pub use models::{InventoryOutcome, Issue, IssueKind, PriceRecord, PriceReport, ProductName};
pub use price_check::PriceCheckService;
pub use report::{CheckEvent, CheckReporter, TracingCheckReporter};
pub use session::run_then_quit;
pub use traits::{Driver, Selector};
