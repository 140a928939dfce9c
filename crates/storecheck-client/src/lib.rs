pub mod browser_driver;

pub use browser_driver::{ChromiumDriver, DriverOptions, find_chrome_binary};
