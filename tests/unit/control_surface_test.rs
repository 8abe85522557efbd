//! Unit tests for the Control Surface (popup): status on open, the toggle
//! button label, and font/theme selections reaching both the store and the page.

use clean_reader::control_surface::{
    ControlSurface, DisconnectedChannel, MessageChannel, PageChannel, DISABLE_LABEL, ENABLE_LABEL,
};
use clean_reader::dom::{HtmlPage, PageHost};
use clean_reader::services::preference_store::{PreferenceStore, PreferenceStoreTrait, PREFERENCES_FILE};
use clean_reader::services::reader_view::{ReaderView, ReaderViewTrait};
use clean_reader::types::messages::{ContentMessage, ContentResponse};
use clean_reader::types::reader::Theme;
use serde_json::json;
use tempfile::TempDir;

const PAGE: &str = r#"<html><head><title>Tide Tables</title></head><body>
<article>
  <p>Tides are the rise and fall of sea levels caused by the combined effects of gravity.</p>
  <p>The moon exerts the strongest pull, and the sun contributes roughly half as much force.</p>
  <p>Coastal shape and ocean depth change how large the tidal range becomes in any one place.</p>
</article>
</body></html>"#;

fn store_in(dir: &TempDir) -> PreferenceStore {
    let path = dir.path().join(PREFERENCES_FILE).to_string_lossy().to_string();
    PreferenceStore::new(Some(path))
}

/// Records every message and answers like a page that never toggles.
#[derive(Default)]
struct RecordingChannel {
    sent: Vec<ContentMessage>,
}

impl MessageChannel for RecordingChannel {
    fn send(&mut self, message: &ContentMessage) -> Option<ContentResponse> {
        self.sent.push(message.clone());
        Some(ContentResponse::Status { reader_mode_active: false })
    }
}

#[test]
fn test_open_without_listener_shows_enable() {
    let dir = TempDir::new().unwrap();
    let mut surface = ControlSurface::new(store_in(&dir));
    let state = surface.open(&mut DisconnectedChannel);

    assert_eq!(state.reader_active, None);
    assert_eq!(state.toggle_label(), ENABLE_LABEL);
}

#[test]
fn test_open_loads_saved_selections() {
    let dir = TempDir::new().unwrap();
    let mut saved = store_in(&dir);
    saved.set_value("font", json!("monospace")).unwrap();
    saved.set_value("theme", json!("dark")).unwrap();

    let mut surface = ControlSurface::new(store_in(&dir));
    let state = surface.open(&mut DisconnectedChannel);
    assert_eq!(state.font, "monospace");
    assert_eq!(state.theme, Theme::Dark);
}

#[test]
fn test_toggle_click_swaps_page_and_label() {
    let dir = TempDir::new().unwrap();
    let mut view = ReaderView::with_store(store_in(&dir));
    let mut page = HtmlPage::from_html(PAGE);
    let original = page.body_html().to_string();
    let mut surface = ControlSurface::new(store_in(&dir));

    {
        let mut channel = PageChannel::new(&mut view, &mut page);
        assert_eq!(surface.open(&mut channel).toggle_label(), ENABLE_LABEL);
        assert_eq!(surface.click_toggle(&mut channel), DISABLE_LABEL);
    }
    assert!(view.is_active());
    assert!(page.body_html().contains("clean-reader-container"));

    {
        let mut channel = PageChannel::new(&mut view, &mut page);
        assert_eq!(surface.click_toggle(&mut channel), ENABLE_LABEL);
    }
    assert_eq!(page.body_html(), original);
}

#[test]
fn test_reopening_popup_reflects_active_page() {
    let dir = TempDir::new().unwrap();
    let mut view = ReaderView::with_store(store_in(&dir));
    let mut page = HtmlPage::from_html(PAGE);
    view.toggle(&mut page);

    let mut surface = ControlSurface::new(store_in(&dir));
    let mut channel = PageChannel::new(&mut view, &mut page);
    assert_eq!(surface.open(&mut channel).toggle_label(), DISABLE_LABEL);
}

#[test]
fn test_toggle_without_listener_keeps_label() {
    let dir = TempDir::new().unwrap();
    let mut surface = ControlSurface::new(store_in(&dir));
    assert_eq!(surface.click_toggle(&mut DisconnectedChannel), ENABLE_LABEL);
}

#[test]
fn test_theme_selection_is_stored_and_sent() {
    let dir = TempDir::new().unwrap();
    let mut surface = ControlSurface::new(store_in(&dir));
    let mut channel = RecordingChannel::default();
    surface.select_theme(&mut channel, Theme::Dark);

    assert_eq!(surface.state().theme, Theme::Dark);
    assert!(store_in(&dir).load().unwrap().dark_mode);
    assert_eq!(channel.sent.len(), 1);
    match &channel.sent[0] {
        ContentMessage::UpdateSettings { settings } => {
            assert_eq!(settings.theme.as_deref(), Some("dark"));
            assert_eq!(settings.font, None);
        }
        other => panic!("expected updateSettings, got {other:?}"),
    }
}

#[test]
fn test_font_selection_reaches_live_view() {
    let dir = TempDir::new().unwrap();
    let mut view = ReaderView::with_store(store_in(&dir));
    let mut page = HtmlPage::from_html(PAGE);
    view.toggle(&mut page);

    let mut surface = ControlSurface::new(store_in(&dir));
    {
        let mut channel = PageChannel::new(&mut view, &mut page);
        surface.select_font(&mut channel, "sans-serif");
    }
    assert!(page.body_html().contains("sans-serif"));
    assert_eq!(
        store_in(&dir).load().unwrap().font_family.as_str(),
        "sans-serif"
    );
}

#[test]
fn test_selection_without_listener_is_still_saved() {
    let dir = TempDir::new().unwrap();
    let mut surface = ControlSurface::new(store_in(&dir));
    surface.select_font(&mut DisconnectedChannel, "monospace");
    assert_eq!(store_in(&dir).load().unwrap().font_family.as_str(), "monospace");
}

#[test]
fn test_popup_selection_keeps_panel_font_size() {
    let dir = TempDir::new().unwrap();
    let mut view = ReaderView::with_store(store_in(&dir));
    let mut page = HtmlPage::from_html(PAGE);
    let mut surface = ControlSurface::new(store_in(&dir));

    {
        let mut channel = PageChannel::new(&mut view, &mut page);
        surface.open(&mut channel);
        surface.click_toggle(&mut channel);
    }
    assert!(view.change_font_size(&mut page, 1));
    assert_eq!(store_in(&dir).load().unwrap().font_size_px, 18);

    {
        let mut channel = PageChannel::new(&mut view, &mut page);
        surface.select_font(&mut channel, "monospace");
    }
    let saved = store_in(&dir).load().unwrap();
    assert_eq!(saved.font_size_px, 18);
    assert_eq!(saved.font_family.as_str(), "monospace");
}
