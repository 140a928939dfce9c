//! Test utilities: a scripted, in-memory implementation of [`Driver`].
//!
//! Pages are tables from selector to elements; elements carry their text,
//! scoped children, and what happens when they are clicked. All state sits
//! behind `Arc<Mutex<_>>` so tests can inspect recorded actions afterwards.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::AppError;
use crate::locator;
use crate::models::ProductName;
use crate::report::CheckReporter;
use crate::traits::{Driver, Selector};

/// Handle to an element registered in a [`MockDriver`].
pub type ElementId = usize;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Element description used to build mock pages.
#[derive(Debug, Clone, Default)]
pub struct MockElement {
    text: String,
    children: Vec<(Selector, Vec<MockElement>)>,
    navigates_to: Option<String>,
    opens_dialog: Option<String>,
}

impl MockElement {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    /// Elements found when searching inside this one with `selector`.
    pub fn child(mut self, selector: Selector, elements: Vec<MockElement>) -> Self {
        self.children.push((selector, elements));
        self
    }

    /// Clicking this element loads `url`.
    pub fn navigates_to(mut self, url: &str) -> Self {
        self.navigates_to = Some(url.to_string());
        self
    }

    /// Clicking this element opens a native dialog with `message`.
    pub fn opens_dialog(mut self, message: &str) -> Self {
        self.opens_dialog = Some(message.to_string());
        self
    }
}

/// Page description: top-level lookups and their results.
#[derive(Debug, Clone, Default)]
pub struct MockPage {
    selectors: Vec<(Selector, Vec<MockElement>)>,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, selector: Selector, elements: Vec<MockElement>) -> Self {
        self.selectors.push((selector, elements));
        self
    }
}

/// Reporter that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl CheckReporter for NullReporter {}

// ---------------------------------------------------------------------------
// MockDriver
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct StoredElement {
    text: String,
    value: String,
    children: HashMap<Selector, Vec<ElementId>>,
    navigates_to: Option<String>,
    opens_dialog: Option<String>,
}

type PageTable = HashMap<Selector, Vec<ElementId>>;

#[derive(Debug, Default)]
struct State {
    elements: Vec<StoredElement>,
    /// Page variants per URL. Each visit takes the front variant while more
    /// than one is queued; the last one stays for all later visits.
    pages: HashMap<String, VecDeque<PageTable>>,
    current: Option<PageTable>,
    pending_dialog: Option<String>,
    actions: Vec<String>,
    quit: bool,
}

impl State {
    fn register(&mut self, element: MockElement) -> ElementId {
        let mut children = HashMap::new();
        for (selector, elements) in element.children {
            let ids = elements.into_iter().map(|e| self.register(e)).collect();
            children.insert(selector, ids);
        }
        self.elements.push(StoredElement {
            text: element.text,
            value: String::new(),
            children,
            navigates_to: element.navigates_to,
            opens_dialog: element.opens_dialog,
        });
        self.elements.len() - 1
    }

    fn load(&mut self, url: &str) -> Result<(), AppError> {
        let Some(variants) = self.pages.get_mut(url) else {
            let message = format!("Failed to navigate to {url}: no such page");
            return Err(AppError::Browser(message));
        };
        let page = if variants.len() > 1 {
            variants.pop_front()
        } else {
            variants.front().cloned()
        };
        self.current = page;
        Ok(())
    }

    fn element(&self, id: ElementId) -> Result<&StoredElement, AppError> {
        self.elements
            .get(id)
            .ok_or_else(|| AppError::Browser(format!("stale element {id}")))
    }

    fn element_mut(&mut self, id: ElementId) -> Result<&mut StoredElement, AppError> {
        self.elements
            .get_mut(id)
            .ok_or_else(|| AppError::Browser(format!("stale element {id}")))
    }

    fn lookup(
        &self,
        scope: Option<ElementId>,
        selector: &Selector,
    ) -> Result<Vec<ElementId>, AppError> {
        let table = match scope {
            Some(id) => &self.element(id)?.children,
            None => match &self.current {
                Some(page) => page,
                None => return Ok(Vec::new()),
            },
        };
        Ok(table.get(selector).cloned().unwrap_or_default())
    }
}

/// Scripted driver. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<State>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page for `url`. Registering the same URL again queues a
    /// variant served on a later visit.
    pub fn add_page(&self, url: &str, page: MockPage) {
        let mut state = self.state.lock().unwrap();
        let mut table = HashMap::new();
        for (selector, elements) in page.selectors {
            let ids = elements.into_iter().map(|e| state.register(e)).collect();
            table.insert(selector, ids);
        }
        state
            .pages
            .entry(url.to_string())
            .or_default()
            .push_back(table);
    }

    /// Recorded actions, e.g. `navigate <url>`, `click <text>`, `type 999`.
    pub fn actions(&self) -> Vec<String> {
        self.state.lock().unwrap().actions.clone()
    }

    /// Current value of a form input.
    pub fn value_of(&self, id: ElementId) -> String {
        self.state.lock().unwrap().elements[id].value.clone()
    }

    pub fn has_quit(&self) -> bool {
        self.state.lock().unwrap().quit
    }
}

impl Driver for MockDriver {
    type Element = ElementId;

    async fn navigate(&self, url: &str) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.actions.push(format!("navigate {url}"));
        state.load(url)
    }

    async fn find_one(
        &self,
        scope: Option<&ElementId>,
        selector: &Selector,
    ) -> Result<Option<ElementId>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.lookup(scope.copied(), selector)?.first().copied())
    }

    async fn find_all(
        &self,
        scope: Option<&ElementId>,
        selector: &Selector,
    ) -> Result<Vec<ElementId>, AppError> {
        let state = self.state.lock().unwrap();
        state.lookup(scope.copied(), selector)
    }

    async fn text(&self, element: &ElementId) -> Result<String, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.element(*element)?.text.clone())
    }

    async fn click(&self, element: &ElementId) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        let el = state.element(*element)?;
        let text = el.text.clone();
        let target = el.navigates_to.clone();
        let dialog = el.opens_dialog.clone();

        state.actions.push(format!("click {text}"));
        if dialog.is_some() {
            state.pending_dialog = dialog;
        }
        if let Some(url) = target {
            state.load(&url)?;
        }
        Ok(())
    }

    async fn clear(&self, element: &ElementId) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.element_mut(*element)?.value.clear();
        state.actions.push("clear".to_string());
        Ok(())
    }

    async fn type_text(&self, element: &ElementId, text: &str) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.element_mut(*element)?.value.push_str(text);
        state.actions.push(format!("type {text}"));
        Ok(())
    }

    async fn accept_dialog(&self, _timeout: Duration) -> Result<Option<String>, AppError> {
        let mut state = self.state.lock().unwrap();
        let dialog = state.pending_dialog.take();
        if let Some(message) = &dialog {
            state.actions.push(format!("accept dialog {message}"));
        }
        Ok(dialog)
    }

    async fn quit(&self) {
        let mut state = self.state.lock().unwrap();
        state.actions.push("quit".to_string());
        state.quit = true;
    }
}

// ---------------------------------------------------------------------------
// Storefront fixture
// ---------------------------------------------------------------------------

pub const HOME_URL: &str = "https://shop.test/index.php/";
pub const CATEGORY_URL: &str = "https://shop.test/index.php/mobile.html";
pub const CART_URL: &str = "https://shop.test/index.php/checkout/cart/";

/// Prices shown for one product on the listing or the detail page.
#[derive(Debug, Clone, Default)]
pub struct Prices {
    pub regular: Option<String>,
    pub special: Option<String>,
}

impl Prices {
    pub fn regular(raw: &str) -> Self {
        Self {
            regular: Some(raw.to_string()),
            special: None,
        }
    }

    pub fn on_sale(regular: &str, special: &str) -> Self {
        Self {
            regular: Some(regular.to_string()),
            special: Some(special.to_string()),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    fn attach(&self, mut element: MockElement) -> MockElement {
        if let Some(special) = &self.special {
            element = element.child(
                Selector::css(locator::SPECIAL_PRICE),
                vec![MockElement::new(special)],
            );
        }
        if let Some(regular) = &self.regular {
            element = element.child(
                Selector::css(locator::REGULAR_PRICE),
                vec![MockElement::new(regular)],
            );
        }
        element
    }
}

/// A product as it appears in the catalog.
#[derive(Debug, Clone)]
pub struct FixtureProduct {
    pub name: String,
    pub list: Prices,
    pub detail: Prices,
}

impl FixtureProduct {
    pub fn new(name: &str, list: Prices, detail: Prices) -> Self {
        Self {
            name: name.to_string(),
            list,
            detail,
        }
    }

    pub fn detail_url(&self) -> String {
        let slug = self.name.to_lowercase().replace(' ', "-");
        format!("https://shop.test/index.php/{slug}.html")
    }
}

/// Home page with a `MOBILE` link leading to [`CATEGORY_URL`].
pub fn home_page() -> MockPage {
    MockPage::new().with(
        Selector::link_text("MOBILE"),
        vec![MockElement::new("MOBILE").navigates_to(CATEGORY_URL)],
    )
}

/// Category listing with one item per product, in the given order.
pub fn category_page(products: &[FixtureProduct]) -> MockPage {
    let mut page = MockPage::new().with(
        Selector::css(locator::CATEGORY_PRODUCTS),
        vec![MockElement::new("")],
    );
    let mut links = Vec::new();
    for product in products {
        let name = ProductName::new(&product.name);
        let link = MockElement::new(&product.name)
            .navigates_to(&product.detail_url());
        let item = product.list.attach(MockElement::new(&product.name));
        page = page
            .with(locator::product_link(&name), vec![link.clone()])
            .with(locator::product_item(&name), vec![item]);
        links.push(link);
    }
    page.with(Selector::css(locator::FIRST_PRODUCT_LINK), links)
}

/// Detail page for one product, without the add-to-cart form.
pub fn detail_page(product: &FixtureProduct) -> MockPage {
    let shop = product.detail.attach(MockElement::new(""));
    MockPage::new()
        .with(
            Selector::css(locator::PRODUCT_VIEW),
            vec![MockElement::new("")],
        )
        .with(Selector::css(locator::PRODUCT_SHOP), vec![shop])
}

/// Driver serving a home page, one category listing, and a detail page per
/// product.
pub fn storefront(products: &[FixtureProduct]) -> MockDriver {
    let driver = MockDriver::new();
    driver.add_page(HOME_URL, home_page());
    driver.add_page(CATEGORY_URL, category_page(products));
    for product in products {
        driver.add_page(&product.detail_url(), detail_page(product));
    }
    driver
}

/// Single-product storefront whose cart page answers an add-to-cart with
/// `error` (selector, text), optionally opening `dialog` on the way.
pub fn shop_with_cart_error(error: Option<(&str, &str)>, dialog: Option<&str>) -> MockDriver {
    let products = [FixtureProduct::new(
        "Sony Xperia",
        Prices::regular("$100.00"),
        Prices::regular("$100.00"),
    )];
    let product = &products[0];
    let driver = MockDriver::new();
    driver.add_page(HOME_URL, home_page());
    driver.add_page(CATEGORY_URL, category_page(&products));

    let mut add = MockElement::new("Add to Cart").navigates_to(CART_URL);
    if let Some(message) = dialog {
        add = add.opens_dialog(message);
    }
    let detail = detail_page(product)
        .with(
            Selector::css(locator::QTY_INPUT),
            vec![MockElement::new("")],
        )
        .with(Selector::css(locator::ADD_TO_CART), vec![add]);
    driver.add_page(&product.detail_url(), detail);

    let mut cart = MockPage::new();
    if let Some((selector, text)) = error {
        cart = cart.with(Selector::css(selector), vec![MockElement::new(text)]);
    }
    driver.add_page(CART_URL, cart);
    driver
}
