//! Shared fixtures for the integration tests.
//!
//! `ScriptedPage` plays a single-page app: clicking a document either
//! navigates, opens an overlay, does nothing or fails, as the test scripts it.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use kb_exporter::{
    dom, Archiver, Artifact, Downloader, Error, Notifier, Options, Page, PageElement, Result,
    Session, Status,
};

pub const LIST_URL: &str = "https://app.test/project/acme";

/// What a click does to the page.
pub enum Click {
    /// Replace location and markup.
    Navigate { url: String, html: String },
    /// Insert markup at the end of the list page body.
    Overlay(String),
    /// Restore the list page.
    Back,
    /// Reject the click.
    Fail(String),
    /// Accept the click without changing anything.
    Ignore,
}

type Script = Box<dyn Fn(&PageElement) -> Click>;

pub struct ScriptedPage {
    list_url: String,
    list_html: String,
    url: RefCell<String>,
    html: RefCell<String>,
    script: Script,
    clicks: RefCell<Vec<String>>,
}

impl ScriptedPage {
    pub fn new(
        url: &str,
        html: impl Into<String>,
        script: impl Fn(&PageElement) -> Click + 'static,
    ) -> Self {
        let html = html.into();
        Self {
            list_url: url.to_string(),
            list_html: html.clone(),
            url: RefCell::new(url.to_string()),
            html: RefCell::new(html),
            script: Box::new(script),
            clicks: RefCell::new(Vec::new()),
        }
    }

    /// Texts of the clicked elements, in click order.
    pub fn clicks(&self) -> Vec<String> {
        self.clicks.borrow().clone()
    }

    pub fn set_location(&self, url: &str, html: &str) {
        *self.url.borrow_mut() = url.to_string();
        *self.html.borrow_mut() = html.to_string();
    }
}

impl Page for ScriptedPage {
    fn url(&self) -> String {
        self.url.borrow().clone()
    }

    fn title(&self) -> String {
        dom::trimmed_text(&dom::parse(&self.html.borrow()).select("title"))
    }

    fn markup(&self) -> Result<String> {
        Ok(self.html.borrow().clone())
    }

    fn click(&self, element: &PageElement) -> Result<()> {
        self.clicks.borrow_mut().push(element.text.clone());
        match (self.script)(element) {
            Click::Navigate { url, html } => self.set_location(&url, &html),
            Click::Overlay(overlay) => {
                let html = self
                    .list_html
                    .replacen("</body>", &format!("{overlay}</body>"), 1);
                *self.html.borrow_mut() = html;
            }
            Click::Back => self.set_location(&self.list_url, &self.list_html),
            Click::Fail(reason) => return Err(Error::PageError(reason)),
            Click::Ignore => {}
        }
        Ok(())
    }
}

/// A project page listing one item per title.
pub fn list_html(titles: &[&str]) -> String {
    let items: String = titles
        .iter()
        .map(|t| format!(r#"<li role="listitem" data-testid="project-document-item"><h3>{t}</h3></li>"#))
        .collect();
    format!(
        r#"<html><head><title>Acme Project</title></head><body><main><ul role="list" data-testid="project-document-list">{items}</ul></main></body></html>"#
    )
}

/// A document page with a back button.
pub fn document_html(body: &str) -> String {
    format!(
        r#"<html><head><title>Document</title></head><body><button class="back-button">Back</button><main><div data-testid="document-content">{body}</div></main></body></html>"#
    )
}

/// Clicking a document navigates to its page, except for the titles in `failing`.
pub fn navigating(failing: &[&str]) -> impl Fn(&PageElement) -> Click + 'static {
    let failing: Vec<String> = failing.iter().map(|s| (*s).to_string()).collect();
    move |element| {
        let text = element.text.as_str();
        if text == "Back" {
            Click::Back
        } else if failing.iter().any(|f| f == text) {
            Click::Fail(format!("{text} is detached"))
        } else {
            Click::Navigate {
                url: format!("{LIST_URL}/doc/{}", text.replace(' ', "-")),
                html: document_html(&format!("<p>Body of {text}</p>")),
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingArchiver {
    pub calls: Rc<RefCell<Vec<Vec<Artifact>>>>,
}

impl Archiver for RecordingArchiver {
    fn bundle(&self, artifacts: &[Artifact], _label: Option<&str>) -> Result<Vec<u8>> {
        self.calls.borrow_mut().push(artifacts.to_vec());
        Ok(b"bundle".to_vec())
    }
}

#[derive(Clone, Default)]
pub struct RecordingDownloader {
    pub calls: Rc<RefCell<Vec<String>>>,
    pub fail: bool,
}

impl Downloader for RecordingDownloader {
    async fn download(&self, _bundle: &[u8], file_name: &str) -> Result<PathBuf> {
        if self.fail {
            return Err(Error::DownloadError("disk full".to_string()));
        }
        self.calls.borrow_mut().push(file_name.to_string());
        Ok(PathBuf::from("/downloads").join(file_name))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub statuses: RefCell<Vec<Status>>,
    pub availability: RefCell<Vec<bool>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, status: &Status) {
        self.statuses.borrow_mut().push(status.clone());
    }

    fn trigger_available(&self, available: bool) {
        self.availability.borrow_mut().push(available);
    }
}

pub type TestSession =
    Session<ScriptedPage, RecordingArchiver, RecordingDownloader, RecordingNotifier>;

pub struct Harness {
    pub session: TestSession,
    pub archiver: RecordingArchiver,
    pub downloader: RecordingDownloader,
}

impl Harness {
    pub fn new(page: ScriptedPage, options: Options) -> Self {
        Self::with_downloader(page, options, RecordingDownloader::default())
    }

    pub fn with_downloader(
        page: ScriptedPage,
        options: Options,
        downloader: RecordingDownloader,
    ) -> Self {
        let archiver = RecordingArchiver::default();
        let session = Session::new(
            page,
            archiver.clone(),
            downloader.clone(),
            RecordingNotifier::default(),
            options,
        );
        Self {
            session,
            archiver,
            downloader,
        }
    }

    pub fn statuses(&self) -> Vec<Status> {
        self.session.notifier().statuses.borrow().clone()
    }

    pub fn availability(&self) -> Vec<bool> {
        self.session.notifier().availability.borrow().clone()
    }

    /// Artifacts handed to the archiver in its only call.
    pub fn bundled(&self) -> Vec<Artifact> {
        let calls = self.archiver.calls.borrow();
        assert_eq!(calls.len(), 1, "archiver should run exactly once");
        calls[0].clone()
    }
}
