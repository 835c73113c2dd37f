mod common;

use core::time::Duration;

use anyhow::{Result, anyhow};
use common::{RecordingPlatform, default_page, init_logger};
use site_config::{NavLink, SiteConfig};
use site_page::render::NAV_ID;
use site_page::{PageConfig, SitePage};
use tokio::time::{Instant, advance};

fn nav_links_at(site: SiteConfig, location: &str) -> Result<Vec<(String, String, bool)>> {
    init_logger();
    let page = SitePage::new(
        site,
        PageConfig::default(),
        RecordingPlatform::default(),
        common::HOST_HTML,
        location,
    )?;
    let dom = page.dom();
    let nav = dom.get_element_by_id(NAV_ID).ok_or_else(|| anyhow!("nav missing"))?;
    Ok(dom
        .children(nav)
        .into_iter()
        .map(|link| {
            (
                dom.attr(link, "href").unwrap_or_default().to_owned(),
                dom.text_content(link),
                dom.has_class(link, "active"),
            )
        })
        .collect())
}

#[test]
fn nav_is_injected_with_one_active_entry() -> Result<()> {
    let links = nav_links_at(SiteConfig::default(), "/den/events/")?;
    assert_eq!(links.len(), 5);
    let active: Vec<&str> = links
        .iter()
        .filter(|(_, _, active)| *active)
        .map(|(_, label, _)| label.as_str())
        .collect();
    assert_eq!(active, ["Events"]);
    Ok(())
}

#[test]
fn base_path_prefixes_hrefs() -> Result<()> {
    let site = SiteConfig {
        base_path: String::from("/faulty-site/"),
        ..SiteConfig::default()
    };
    let links = nav_links_at(site, "/faulty-site/start/")?;
    assert_eq!(links[0].0, "/faulty-site/");
    assert_eq!(links[1], (String::from("/faulty-site/start/"), String::from("Start"), true));
    Ok(())
}

#[test]
fn empty_nav_uses_chapter_fallback() -> Result<()> {
    let site = SiteConfig {
        chapter_name: String::from("Bay"),
        chapter_city_label: String::from("Oakland"),
        nav_links: Vec::new(),
        ..SiteConfig::default()
    };
    let links = nav_links_at(site, "/")?;
    let labels: Vec<&str> = links.iter().map(|(_, label, _)| label.as_str()).collect();
    assert_eq!(labels, ["Home", "Start", "Bay (Oakland)", "Events", "Eiber"]);
    assert!(links[0].2);
    Ok(())
}

#[test]
fn nav_label_markup_is_text() -> Result<()> {
    let site = SiteConfig {
        nav_links: vec![NavLink::new("/", "<script>alert(1)</script>")],
        ..SiteConfig::default()
    };
    let links = nav_links_at(site, "/")?;
    assert_eq!(links[0].1, "<script>alert(1)</script>");
    Ok(())
}

#[test]
fn host_without_nav_slot_still_loads() -> Result<()> {
    init_logger();
    let page = SitePage::new(
        SiteConfig::default(),
        PageConfig::default(),
        RecordingPlatform::default(),
        "<main><p>hello</p></main>",
        "/",
    )?;
    assert_eq!(page.nav_entries().len(), 5);
    assert!(page.dom().find_all(page.dom().root(), |dom, id| dom.tag(id) == Some("a")).is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn toast_last_call_wins() -> Result<()> {
    let mut page = default_page()?;
    page.toast("first")?;
    advance(Duration::from_millis(2000)).await;
    page.toast("second")?;
    assert_eq!(page.toast_text().as_deref(), Some("second"));

    advance(Duration::from_millis(1500)).await;
    assert!(!page.tick());
    assert!(page.toast_visible());

    let deadline = page.next_deadline().ok_or_else(|| anyhow!("no pending hide"))?;
    assert_eq!(deadline.saturating_duration_since(Instant::now()), Duration::from_millis(1500));
    advance(Duration::from_millis(1500)).await;
    assert!(page.tick());
    assert!(!page.toast_visible());
    assert_eq!(page.next_deadline(), None);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn toast_duration_follows_page_config() -> Result<()> {
    let mut page = common::page_with(
        SiteConfig::default(),
        PageConfig::new(500, None, site_page::ClipboardFallback::Prompt),
        RecordingPlatform::default(),
    )?;
    page.toast("short")?;
    advance(Duration::from_millis(499)).await;
    assert!(!page.tick());
    advance(Duration::from_millis(1)).await;
    assert!(page.tick());
    page.toast_for("custom", Duration::from_millis(50))?;
    assert!(!page.tick_at(Instant::now() + Duration::from_millis(49)));
    assert!(page.tick_at(Instant::now() + Duration::from_millis(50)));
    Ok(())
}
