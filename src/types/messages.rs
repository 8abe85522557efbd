//! Messages exchanged between the control surface and the page.
//!
//! The wire shape is the popup's: a JSON object tagged by `action`, answered
//! with a small status object.

use serde::{Deserialize, Serialize};

/// A request sent from the control surface to the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ContentMessage {
    ToggleReader,
    GetStatus,
    UpdateSettings {
        #[serde(default)]
        settings: SettingsDelta,
    },
}

/// Partial preference change carried by `updateSettings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
}

impl SettingsDelta {
    pub fn is_empty(&self) -> bool {
        self.theme.is_none() && self.font.is_none() && self.font_size.is_none()
    }
}

/// The page's answer to a [`ContentMessage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentResponse {
    Toggled {
        status: ResponseStatus,
        #[serde(rename = "readerModeActive")]
        reader_mode_active: bool,
    },
    Status {
        #[serde(rename = "readerModeActive")]
        reader_mode_active: bool,
    },
    Ack { status: ResponseStatus },
}

impl ContentResponse {
    /// Reader mode state reported by the response, if it carries one.
    pub fn reader_mode_active(&self) -> Option<bool> {
        match self {
            ContentResponse::Toggled {
                reader_mode_active, ..
            }
            | ContentResponse::Status { reader_mode_active } => Some(*reader_mode_active),
            ContentResponse::Ack { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    /// The message was understood but had nothing to act on.
    Ignored,
}
