use crate::error::AppError;
use crate::models::{Issue, ProductName};

/// Progress events emitted by the scenarios.
#[derive(Debug, Clone, Copy)]
pub enum CheckEvent<'a> {
    ListPriceRead {
        product: &'a ProductName,
        price: &'a str,
    },
    ListPriceFailed {
        product: &'a ProductName,
        error: &'a AppError,
    },
    DetailStarted { product: &'a ProductName },
    PricesCompared {
        product: &'a ProductName,
        list: Option<&'a str>,
        detail: &'a str,
    },
    DetailFailed {
        product: &'a ProductName,
        error: &'a AppError,
    },
    DetailFinished { product: &'a ProductName },
    IssueRecorded { issue: &'a Issue },
    DialogAccepted { message: &'a str },
    InventoryMessage { message: &'a str },
}

/// Receives scenario events (decoupled from console output and logging).
pub trait CheckReporter: Send + Sync {
    fn report(&self, event: CheckEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingCheckReporter;

impl CheckReporter for TracingCheckReporter {
    fn report(&self, event: CheckEvent<'_>) {
        match event {
            CheckEvent::ListPriceRead { product, price } => {
                tracing::info!(%product, %price, "List price read");
            }
            CheckEvent::ListPriceFailed { product, error } => {
                tracing::warn!(%product, %error, "List price unavailable");
            }
            CheckEvent::DetailStarted { product } => {
                tracing::info!(%product, "Checking detail page");
            }
            CheckEvent::PricesCompared {
                product,
                list,
                detail,
            } => {
                tracing::info!(%product, ?list, %detail, "Prices compared");
            }
            CheckEvent::DetailFailed { product, error } => {
                tracing::warn!(%product, %error, "Detail check failed");
            }
            CheckEvent::DetailFinished { product } => {
                tracing::debug!(%product, "Detail check finished");
            }
            CheckEvent::IssueRecorded { issue } => {
                tracing::warn!(%issue, "Issue recorded");
            }
            CheckEvent::DialogAccepted { message } => {
                tracing::info!(%message, "Dialog accepted");
            }
            CheckEvent::InventoryMessage { message } => {
                tracing::info!(%message, "Inventory error message");
            }
        }
    }
}
