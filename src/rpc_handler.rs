//! RPC method handler for the Clean Reader JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the page,
//! the reader view and the preference store via the `App` struct.

use std::sync::Mutex;

use crate::app::App;
use crate::dom::{Document, PageHost};
use crate::services::preference_store::PreferenceStoreTrait;
use crate::services::reader_view::{extract_layout, ReaderViewTrait};
use crate::types::messages::{ContentMessage, SettingsDelta};

use serde_json::{json, Value};

/// Runs a content message against the loaded page.
fn send_message(app: &Mutex<App>, message: &ContentMessage) -> Result<Value, String> {
    let mut a = app.lock().map_err(|e| e.to_string())?;
    let (page, view) = a.page_and_view().map_err(|e| e.to_string())?;
    let response = view.handle_message(page, message);
    serde_json::to_value(response).map_err(|e| e.to_string())
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Page ───
        "page.load" => {
            let html = params.get("html").and_then(|v| v.as_str()).ok_or("missing html")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.load_page(html);
            Ok(json!({"ok": true}))
        }
        "page.html" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let page = a.page().map_err(|e| e.to_string())?;
            Ok(json!({"html": page.document_html()}))
        }
        "page.body" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let page = a.page().map_err(|e| e.to_string())?;
            Ok(json!({"html": page.body_html()}))
        }

        // ─── Content messages ───
        "toggleReader" => send_message(app, &ContentMessage::ToggleReader),
        "getStatus" => send_message(app, &ContentMessage::GetStatus),
        "updateSettings" => {
            let settings: SettingsDelta = match params.get("settings") {
                Some(v) => serde_json::from_value(v.clone())
                    .map_err(|e| format!("invalid settings: {}", e))?,
                None => SettingsDelta::default(),
            };
            send_message(app, &ContentMessage::UpdateSettings { settings })
        }
        "message" => {
            let message: ContentMessage = serde_json::from_value(params.clone())
                .map_err(|e| format!("invalid message: {}", e))?;
            send_message(app, &message)
        }

        // ─── Control panel ───
        "panel.exit" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let (page, view) = a.page_and_view().map_err(|e| e.to_string())?;
            let exited = view.exit(page);
            Ok(json!({"ok": exited, "readerModeActive": view.is_active()}))
        }
        "panel.fontLarger" | "panel.fontSmaller" => {
            let steps = if method == "panel.fontLarger" { 1 } else { -1 };
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let (page, view) = a.page_and_view().map_err(|e| e.to_string())?;
            let changed = view.change_font_size(page, steps);
            let size = view.session().map(|s| s.preferences().font_size_px);
            Ok(json!({"ok": changed, "fontSize": size}))
        }
        "panel.toggleTheme" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let (page, view) = a.page_and_view().map_err(|e| e.to_string())?;
            let changed = view.toggle_theme(page);
            let dark = view.session().map(|s| s.preferences().dark_mode);
            Ok(json!({"ok": changed, "darkMode": dark}))
        }

        // ─── Preferences ───
        "preferences.get" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let prefs = a.reader_view.store_mut().load().map_err(|e| e.to_string())?;
            serde_json::to_value(prefs).map_err(|e| e.to_string())
        }
        "preferences.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let store = a.reader_view.store_mut();
            store.load().map_err(|e| e.to_string())?;
            store.set_value(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "preferences.reset" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.reader_view.store_mut().reset().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Extraction ───
        "extract" => {
            let html = params.get("html").and_then(|v| v.as_str()).ok_or("missing html")?;
            let doc = Document::parse(html);
            let a = app.lock().map_err(|e| e.to_string())?;
            let layout = extract_layout(a.reader_view.rules(), &doc);
            serde_json::to_value(layout).map_err(|e| e.to_string())
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
