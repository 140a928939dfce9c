use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::AppError;

/// Interval between lookups while waiting for page state.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How an element is located on a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    Css(String),
    XPath(String),
    /// Anchor whose rendered text equals the given string.
    LinkText(String),
}

impl Selector {
    pub fn css(s: impl Into<String>) -> Self {
        Selector::Css(s.into())
    }

    pub fn xpath(s: impl Into<String>) -> Self {
        Selector::XPath(s.into())
    }

    pub fn link_text(s: impl Into<String>) -> Self {
        Selector::LinkText(s.into())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(s) => write!(f, "css '{s}'"),
            Selector::XPath(s) => write!(f, "xpath '{s}'"),
            Selector::LinkText(s) => write!(f, "link text '{s}'"),
        }
    }
}

/// Minimal browser capability used by the scenarios.
///
/// Scenario code only talks to this trait, so it runs the same against a real
/// Chromium session and against the scripted mock in `testutil`.
/// Lookups with a `scope` search inside that element instead of the page.
pub trait Driver: Send + Sync {
    type Element: Send + Sync;

    /// Load a URL in the session's page.
    fn navigate(&self, url: &str) -> impl Future<Output = Result<(), AppError>> + Send;

    /// First element matching `selector` in document order, if any.
    fn find_one(
        &self,
        scope: Option<&Self::Element>,
        selector: &Selector,
    ) -> impl Future<Output = Result<Option<Self::Element>, AppError>> + Send;

    /// All elements matching `selector`, in document order.
    fn find_all(
        &self,
        scope: Option<&Self::Element>,
        selector: &Selector,
    ) -> impl Future<Output = Result<Vec<Self::Element>, AppError>> + Send;

    /// Rendered text of an element.
    fn text(
        &self,
        element: &Self::Element,
    ) -> impl Future<Output = Result<String, AppError>> + Send;

    fn click(&self, element: &Self::Element) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Empty a form input.
    fn clear(&self, element: &Self::Element) -> impl Future<Output = Result<(), AppError>> + Send;

    fn type_text(
        &self,
        element: &Self::Element,
        text: &str,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Accept a native dialog if one opens within `timeout`.
    ///
    /// Returns the dialog message, or `None` when no dialog showed up.
    fn accept_dialog(
        &self,
        timeout: Duration,
    ) -> impl Future<Output = Result<Option<String>, AppError>> + Send;

    /// Release the browser session. Errors are logged, never returned.
    fn quit(&self) -> impl Future<Output = ()> + Send;

    /// Poll until `selector` matches, or fail with [`AppError::Timeout`].
    fn wait_for(
        &self,
        selector: &Selector,
        timeout: Duration,
    ) -> impl Future<Output = Result<Self::Element, AppError>> + Send {
        async move {
            let (_, element) = self
                .wait_for_any(std::slice::from_ref(selector), timeout)
                .await?;
            Ok(element)
        }
    }

    /// Poll until one of `selectors` matches. Each round tries them in order,
    /// so the first alternative wins when several are present.
    ///
    /// Returns the index of the matching selector together with the element.
    fn wait_for_any(
        &self,
        selectors: &[Selector],
        timeout: Duration,
    ) -> impl Future<Output = Result<(usize, Self::Element), AppError>> + Send {
        async move {
            let start = Instant::now();
            loop {
                for (index, selector) in selectors.iter().enumerate() {
                    if let Some(element) = self.find_one(None, selector).await? {
                        let elapsed_ms = start.elapsed().as_millis() as u64;
                        tracing::debug!(%selector, elapsed_ms, "Element present");
                        return Ok((index, element));
                    }
                }

                let elapsed = start.elapsed();
                if elapsed >= timeout {
                    let what = selectors
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(" | ");
                    return Err(AppError::Timeout {
                        what,
                        millis: timeout.as_millis() as u64,
                    });
                }
                tokio::time::sleep(POLL_INTERVAL.min(timeout - elapsed)).await;
            }
        }
    }
}
