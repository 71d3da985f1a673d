//! The host page the exporter reads from.
//!
//! A browser extension, a headless browser driver, or a saved HTML file can
//! all act as a [`Page`]: the pipeline only needs the current markup, the
//! current URL and title, and a way to click an element it located earlier.

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use dom_query::{Document, Selection};

use crate::{dom, encoding, Result};

/// A located element, captured when the locator found it.
///
/// The element's markup and text are copies; `path` lets the host find the
/// live node again for a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageElement {
    /// Index in the located sequence.
    pub position: usize,

    /// Element-child indices from the document root, see [`dom::node_path`].
    pub path: Vec<usize>,

    /// Lowercase tag name.
    pub tag: String,

    /// Outer HTML at the time the element was located.
    pub html: String,

    /// Rendered text at the time the element was located.
    pub text: String,
}

impl PageElement {
    /// Capture a located element.
    #[must_use]
    pub fn capture(position: usize, sel: &Selection) -> Self {
        Self {
            position,
            path: dom::node_path(sel),
            tag: dom::tag_name(sel).unwrap_or_default(),
            html: dom::outer_html(sel).to_string(),
            text: dom::render_text(sel),
        }
    }

    /// Re-parse the captured markup for lookups inside the element.
    ///
    /// Use [`dom::fragment_root`] on the result to get the element itself.
    #[must_use]
    pub fn fragment(&self) -> Document {
        dom::parse_fragment(&self.html)
    }
}

/// A page whose document list can be exported.
pub trait Page {
    /// Current location of the page.
    fn url(&self) -> String;

    /// Current document title.
    fn title(&self) -> String;

    /// Serialized markup of the whole page as it is right now.
    ///
    /// # Errors
    ///
    /// Returns `Error::PageError` when the host cannot read the page.
    fn markup(&self) -> Result<String>;

    /// Dispatch a click on a previously located element.
    ///
    /// Any page change the click causes may complete asynchronously; callers
    /// wait for a settle window before sampling the page again.
    ///
    /// # Errors
    ///
    /// Returns `Error::PageError` when the element no longer exists or the
    /// click could not be dispatched.
    fn click(&self, element: &PageElement) -> Result<()>;

    /// Parse the current markup.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Page::markup`].
    fn snapshot(&self) -> Result<Document> {
        Ok(dom::parse(&self.markup()?))
    }
}

/// A page that never changes, such as a saved HTML file.
///
/// Clicks are accepted and ignored.
#[derive(Debug, Clone)]
pub struct StaticPage {
    url: String,
    html: String,
    clicks: RefCell<Vec<Vec<usize>>>,
}

impl StaticPage {
    /// Wrap markup served from `url`.
    #[must_use]
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            clicks: RefCell::new(Vec::new()),
        }
    }

    /// Wrap raw HTML bytes, decoding them with their declared charset.
    #[must_use]
    pub fn from_bytes(url: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(url, encoding::transcode_to_utf8(bytes))
    }

    /// Read a saved page from disk.
    ///
    /// The page URL defaults to the `file://` form of the path when `url` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` when the file cannot be read.
    pub fn open(path: &Path, url: Option<String>) -> Result<Self> {
        let bytes = fs::read(path)?;
        let url = url.unwrap_or_else(|| format!("file://{}", path.display()));
        Ok(Self::from_bytes(url, &bytes))
    }

    /// Paths of the elements clicked so far.
    #[must_use]
    pub fn clicks(&self) -> Vec<Vec<usize>> {
        self.clicks.borrow().clone()
    }
}

impl Page for StaticPage {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn title(&self) -> String {
        dom::trimmed_text(&dom::parse(&self.html).select("title"))
    }

    fn markup(&self) -> Result<String> {
        Ok(self.html.clone())
    }

    fn click(&self, element: &PageElement) -> Result<()> {
        self.clicks.borrow_mut().push(element.path.clone());
        Ok(())
    }
}
