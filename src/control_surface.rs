//! Control Surface: the popup that drives a page's reader view.
//!
//! The popup never touches the page directly. It talks over a [`MessageChannel`]
//! and a page without a listener simply never answers.

use serde_json::Value;
use tracing::{debug, warn};

use crate::dom::PageHost;
use crate::services::preference_store::PreferenceStoreTrait;
use crate::services::reader_view::{ReaderView, ReaderViewTrait};
use crate::types::messages::{ContentMessage, ContentResponse, SettingsDelta};
use crate::types::reader::Theme;

pub const ENABLE_LABEL: &str = "Enable Reader Mode";
pub const DISABLE_LABEL: &str = "Disable Reader Mode";

/// One-shot request/response link to the active page.
pub trait MessageChannel {
    /// `None` when nothing on the other end answered.
    fn send(&mut self, message: &ContentMessage) -> Option<ContentResponse>;
}

/// A page with no reader view listener, e.g. a browser-internal page.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisconnectedChannel;

impl MessageChannel for DisconnectedChannel {
    fn send(&mut self, _message: &ContentMessage) -> Option<ContentResponse> {
        None
    }
}

/// Delivers messages straight to a reader view running on a page.
pub struct PageChannel<'a, S: PreferenceStoreTrait> {
    view: &'a mut ReaderView<S>,
    page: &'a mut dyn PageHost,
}

impl<'a, S: PreferenceStoreTrait> PageChannel<'a, S> {
    pub fn new(view: &'a mut ReaderView<S>, page: &'a mut dyn PageHost) -> Self {
        Self { view, page }
    }
}

impl<S: PreferenceStoreTrait> MessageChannel for PageChannel<'_, S> {
    fn send(&mut self, message: &ContentMessage) -> Option<ContentResponse> {
        Some(self.view.handle_message(self.page, message))
    }
}

/// What the popup currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupState {
    /// `None` until a page has answered a status query.
    pub reader_active: Option<bool>,
    pub font: String,
    pub theme: Theme,
}

impl PopupState {
    pub fn toggle_label(&self) -> &'static str {
        if self.reader_active == Some(true) {
            DISABLE_LABEL
        } else {
            ENABLE_LABEL
        }
    }
}

impl Default for PopupState {
    fn default() -> Self {
        Self {
            reader_active: None,
            font: "serif".to_string(),
            theme: Theme::Light,
        }
    }
}

/// The popup: a toggle button plus font and theme selects.
pub struct ControlSurface<S: PreferenceStoreTrait> {
    store: S,
    state: PopupState,
}

impl<S: PreferenceStoreTrait> ControlSurface<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: PopupState::default(),
        }
    }

    pub fn state(&self) -> &PopupState {
        &self.state
    }

    pub fn toggle_label(&self) -> &'static str {
        self.state.toggle_label()
    }

    /// Fills the selects from saved preferences and asks the page for its status.
    pub fn open(&mut self, channel: &mut dyn MessageChannel) -> &PopupState {
        match self.store.load() {
            Ok(prefs) => {
                self.state.font = prefs.font_family.as_str().to_string();
                self.state.theme = if prefs.dark_mode { Theme::Dark } else { Theme::Light };
            }
            Err(e) => warn!(error = %e, "failed to load saved preferences for popup"),
        }
        self.refresh_status(channel)
    }

    pub fn refresh_status(&mut self, channel: &mut dyn MessageChannel) -> &PopupState {
        let reply = channel.send(&ContentMessage::GetStatus);
        self.state.reader_active = reply.and_then(|r| r.reader_mode_active());
        &self.state
    }

    /// Sends `toggleReader` and updates the label from the reply.
    pub fn click_toggle(&mut self, channel: &mut dyn MessageChannel) -> &'static str {
        match channel.send(&ContentMessage::ToggleReader) {
            Some(reply) => {
                if let Some(active) = reply.reader_mode_active() {
                    self.state.reader_active = Some(active);
                }
            }
            None => debug!("toggle sent to a page without a reader listener"),
        }
        self.toggle_label()
    }

    pub fn select_font(&mut self, channel: &mut dyn MessageChannel, font: &str) {
        self.state.font = font.to_string();
        self.remember("font", Value::String(font.to_string()));
        self.push_settings(
            channel,
            SettingsDelta {
                font: Some(font.to_string()),
                ..Default::default()
            },
        );
    }

    pub fn select_theme(&mut self, channel: &mut dyn MessageChannel, theme: Theme) {
        self.state.theme = theme;
        self.remember("theme", Value::String(theme.as_str().to_string()));
        self.push_settings(
            channel,
            SettingsDelta {
                theme: Some(theme.as_str().to_string()),
                ..Default::default()
            },
        );
    }

    fn remember(&mut self, key: &str, value: Value) {
        if let Err(e) = self.store.set_value(key, value) {
            warn!(key, error = %e, "failed to save popup selection");
        }
    }

    fn push_settings(&mut self, channel: &mut dyn MessageChannel, settings: SettingsDelta) {
        if channel
            .send(&ContentMessage::UpdateSettings { settings })
            .is_none()
        {
            debug!("settings sent to a page without a reader listener");
        }
    }
}
