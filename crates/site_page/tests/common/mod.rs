#![allow(dead_code, reason = "each test binary uses a different subset of helpers")]
use std::cell::RefCell;

use anyhow::{Result, anyhow};
use dom::NodeId;
use site_config::SiteConfig;
use site_page::{HttpTransport, PageConfig, Platform, PlatformError, SitePage, TransportError};

/// Host body used by the integration tests: a nav slot and two call-to-action buttons.
pub const HOST_HTML: &str = r#"<header><nav id="nav"></nav></header><main><button id="cta" class="btn" data-action="openSignup">Join</button><a id="more" href="/start/">More</a><button id="cta2" data-action="openSignup"><span id="ctaLabel">Join too</span></button></main>"#;

pub fn init_logger() {
    drop(env_logger::builder().is_test(true).try_init());
}

/// Records every platform call and answers clipboard/prompt as configured.
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    pub navigations: Vec<String>,
    pub clipboard: Vec<String>,
    pub prompts: Vec<(String, String)>,
    pub clipboard_denied: bool,
    pub prompt_unavailable: bool,
}

impl RecordingPlatform {
    pub fn denying_clipboard() -> Self {
        Self {
            clipboard_denied: true,
            ..Self::default()
        }
    }

    pub fn denying_everything() -> Self {
        Self {
            clipboard_denied: true,
            prompt_unavailable: true,
            ..Self::default()
        }
    }
}

impl Platform for RecordingPlatform {
    fn navigate(&mut self, uri: &str) {
        self.navigations.push(uri.to_owned());
    }

    fn write_clipboard(&mut self, text: &str) -> Result<(), PlatformError> {
        if self.clipboard_denied {
            return Err(PlatformError::Denied(String::from("no user gesture")));
        }
        self.clipboard.push(text.to_owned());
        Ok(())
    }

    fn prompt(&mut self, message: &str, default_text: &str) -> Result<(), PlatformError> {
        if self.prompt_unavailable {
            return Err(PlatformError::Unavailable);
        }
        self.prompts.push((message.to_owned(), default_text.to_owned()));
        Ok(())
    }
}

#[derive(Copy, Clone, Debug)]
pub enum Reply {
    Status(u16),
    Unreachable,
}

/// Records `(url, body)` of every request and answers with a fixed reply.
#[derive(Debug)]
pub struct MockTransport {
    pub reply: Reply,
    pub requests: RefCell<Vec<(String, String)>>,
}

impl MockTransport {
    pub const fn new(reply: Reply) -> Self {
        Self {
            reply,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl HttpTransport for MockTransport {
    async fn post_json(&self, url: &str, body: &str) -> Result<u16, TransportError> {
        self.requests.borrow_mut().push((url.to_owned(), body.to_owned()));
        match self.reply {
            Reply::Status(status) => Ok(status),
            Reply::Unreachable => Err(TransportError::Network(String::from("connection refused"))),
        }
    }
}

pub fn page_with(site: SiteConfig, config: PageConfig, platform: RecordingPlatform) -> Result<SitePage<RecordingPlatform>> {
    init_logger();
    SitePage::new(site, config, platform, HOST_HTML, "/")
}

pub fn default_page() -> Result<SitePage<RecordingPlatform>> {
    page_with(SiteConfig::default(), PageConfig::default(), RecordingPlatform::default())
}

pub fn node(page: &SitePage<RecordingPlatform>, id: &str) -> Result<NodeId> {
    page.dom()
        .get_element_by_id(id)
        .ok_or_else(|| anyhow!("#{id} not found"))
}

/// Open the modal via the primary call-to-action button.
pub fn open_from_cta(page: &mut SitePage<RecordingPlatform>) -> Result<NodeId> {
    let cta = node(page, "cta")?;
    page.click(cta)?;
    Ok(cta)
}
