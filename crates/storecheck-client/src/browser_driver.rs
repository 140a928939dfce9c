use std::path::{Path, PathBuf};
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::page::{
    EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures::StreamExt;
use storecheck_core::error::AppError;
use storecheck_core::locator;
use storecheck_core::traits::{Driver, Selector};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

/// Launch settings for [`ChromiumDriver`].
#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub headless: bool,
    /// Explicit Chrome/Chromium binary; auto-detected when `None`.
    pub chrome_executable: Option<PathBuf>,
    pub window_size: (u32, u32),
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_executable: None,
            window_size: (1280, 900),
        }
    }
}

/// [`Driver`] over a Chromium session controlled through the Chrome DevTools
/// Protocol.
///
/// One browser process and one tab per driver. Native dialogs are accepted
/// as soon as they open (a pending dialog blocks input on the page); their
/// messages are queued for [`Driver::accept_dialog`].
///
/// # Example
///
/// ```rust,no_run
/// use storecheck_client::{ChromiumDriver, DriverOptions};
/// use storecheck_core::traits::{Driver, Selector};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let driver = ChromiumDriver::launch(&DriverOptions::default()).await?;
/// driver.navigate("https://example.com").await?;
/// let h1 = driver.find_one(None, &Selector::css("h1")).await?;
/// driver.quit().await;
/// # Ok(())
/// # }
/// ```
pub struct ChromiumDriver {
    browser: Mutex<Browser>,
    page: Page,
    dialogs: Mutex<mpsc::UnboundedReceiver<String>>,
    tasks: Vec<JoinHandle<()>>,
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank tab.
    ///
    /// Requires a Chromium / Chrome binary: `options.chrome_executable`, one
    /// of the well-known install paths, or whatever `chromiumoxide` finds.
    pub async fn launch(options: &DriverOptions) -> Result<Self, AppError> {
        let mut builder = BrowserConfig::builder();
        builder = builder.no_sandbox().disable_default_args();

        if let Some(bin) = find_chrome_binary(options.chrome_executable.as_deref()) {
            tracing::info!("Using Chrome binary: {}", bin.display());
            builder = builder.chrome_executable(bin);
        }

        let (width, height) = options.window_size;
        builder = builder.window_size(width, height);
        if options.headless {
            builder = builder.arg("--headless=new").arg("--disable-gpu");
        } else {
            builder = builder.with_head();
        }

        let config = builder
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-translate")
            .arg("--no-first-run")
            .build()
            .map_err(|e| AppError::Browser(format!("Browser config error: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AppError::Browser(format!("Failed to launch browser: {e}")))?;

        // The CDP handler must be polled continuously for the connection to work.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    tracing::warn!("Browser CDP handler error: {event:?}");
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| AppError::Browser(format!("Failed to open tab: {e}")))?;

        let mut opened = page
            .event_listener::<EventJavascriptDialogOpening>()
            .await
            .map_err(|e| AppError::Browser(format!("Failed to watch dialogs: {e}")))?;
        let (tx, rx) = mpsc::unbounded_channel();
        let dialog_page = page.clone();
        let dialog_task = tokio::spawn(async move {
            while let Some(event) = opened.next().await {
                tracing::info!(message = %event.message, "Dialog detected");
                if let Err(e) = dialog_page
                    .execute(HandleJavaScriptDialogParams::new(true))
                    .await
                {
                    tracing::warn!("Failed to accept dialog: {e}");
                    continue;
                }
                if tx.send(event.message.clone()).is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            dialogs: Mutex::new(rx),
            tasks: vec![handler_task, dialog_task],
        })
    }

    async fn query(
        &self,
        scope: Option<&Element>,
        selector: &Selector,
    ) -> Result<Vec<Element>, AppError> {
        let found = match (selector, scope) {
            (Selector::Css(css), None) => self.page.find_elements(css.as_str()).await,
            (Selector::Css(css), Some(el)) => el.find_elements(css.as_str()).await,
            (Selector::XPath(xpath), None) => self.page.find_xpaths(xpath.as_str()).await,
            (Selector::LinkText(text), None) => return self.links_with_text(text).await,
            (_, Some(_)) => {
                let message = format!("{selector} can only be looked up page-wide");
                return Err(AppError::Browser(message));
            }
        };

        // Lookups race with navigation: a document being replaced answers
        // with an error, which counts as "not there yet".
        Ok(found.unwrap_or_else(|e| {
            tracing::debug!(%selector, "Lookup failed: {e}");
            Vec::new()
        }))
    }

    async fn links_with_text(&self, text: &str) -> Result<Vec<Element>, AppError> {
        let candidates = self
            .page
            .find_xpaths(locator::link_text_candidates(text))
            .await
            .unwrap_or_default();

        let wanted = text.trim();
        let mut links = Vec::new();
        for link in candidates {
            let rendered = link.inner_text().await.ok().flatten().unwrap_or_default();
            if rendered.trim() == wanted {
                links.push(link);
            }
        }
        Ok(links)
    }
}

impl Driver for ChromiumDriver {
    type Element = Element;

    async fn navigate(&self, url: &str) -> Result<(), AppError> {
        tracing::debug!(%url, "Navigating");
        self.page
            .goto(url)
            .await
            .map_err(|e| AppError::Browser(format!("Failed to navigate to {url}: {e}")))?;
        Ok(())
    }

    async fn find_one(
        &self,
        scope: Option<&Element>,
        selector: &Selector,
    ) -> Result<Option<Element>, AppError> {
        Ok(self.query(scope, selector).await?.into_iter().next())
    }

    async fn find_all(
        &self,
        scope: Option<&Element>,
        selector: &Selector,
    ) -> Result<Vec<Element>, AppError> {
        self.query(scope, selector).await
    }

    async fn text(&self, element: &Element) -> Result<String, AppError> {
        let text = element
            .inner_text()
            .await
            .map_err(|e| AppError::Browser(format!("Failed to read element text: {e}")))?;
        Ok(text.unwrap_or_default())
    }

    async fn click(&self, element: &Element) -> Result<(), AppError> {
        tracing::debug!("Clicking element");
        element
            .click()
            .await
            .map_err(|e| AppError::Browser(format!("Click failed: {e}")))?;
        Ok(())
    }

    async fn clear(&self, element: &Element) -> Result<(), AppError> {
        element
            .call_js_fn("function() { this.value = ''; }", false)
            .await
            .map_err(|e| AppError::Browser(format!("Failed to clear input: {e}")))?;
        Ok(())
    }

    async fn type_text(&self, element: &Element, text: &str) -> Result<(), AppError> {
        element
            .focus()
            .await
            .map_err(|e| AppError::Browser(format!("Failed to focus input: {e}")))?;
        element
            .type_str(text)
            .await
            .map_err(|e| AppError::Browser(format!("Failed to type into input: {e}")))?;
        Ok(())
    }

    async fn accept_dialog(&self, timeout: Duration) -> Result<Option<String>, AppError> {
        let mut dialogs = self.dialogs.lock().await;
        match tokio::time::timeout(timeout, dialogs.recv()).await {
            Ok(message) => Ok(message),
            Err(_) => {
                let timeout_ms = timeout.as_millis() as u64;
                tracing::debug!(timeout_ms, "No dialog appeared");
                Ok(None)
            }
        }
    }

    async fn quit(&self) {
        let mut browser = self.browser.lock().await;
        if let Err(e) = browser.close().await {
            tracing::warn!("Error closing browser: {e}");
        }
        if let Err(e) = browser.wait().await {
            tracing::warn!("Error waiting for browser exit: {e}");
        }
        for task in &self.tasks {
            task.abort();
        }
        tracing::info!("Browser shut down");
    }
}

/// Tries to locate the real Chrome/Chromium binary.
///
/// An explicit path wins when it exists. On systems where Chromium is
/// installed via **snap**, the wrapper at `/snap/bin/chromium` strips unknown
/// CLI flags, breaking headless mode, so the real binary inside the snap is
/// checked before the usual system paths. `None` lets `chromiumoxide` do its
/// own lookup.
pub fn find_chrome_binary(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        let shown = path.display();
        tracing::warn!("Chrome binary {shown} does not exist, auto-detecting");
    }

    let candidates: &[&str] = &[
        // Snap (Ubuntu default)
        "/snap/chromium/current/usr/lib/chromium-browser/chrome",
        // Flatpak
        "/var/lib/flatpak/exports/bin/org.chromium.Chromium",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/google-chrome",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
    ];

    candidates.iter().map(PathBuf::from).find(|p| p.exists())
}
