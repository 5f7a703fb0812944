use anyhow::anyhow;
use backdrop_core::{Environment, Viewport};
use wasm_bindgen::JsValue;
use web_sys as web;

#[inline]
pub fn window() -> anyhow::Result<web::Window> {
    web::window().ok_or_else(|| anyhow!("no window"))
}

#[inline]
pub fn document(window: &web::Window) -> anyhow::Result<web::Document> {
    window.document().ok_or_else(|| anyhow!("no document"))
}

/// Viewport size plus the full scrollable document height.
pub fn read_viewport(window: &web::Window) -> Viewport {
    let width = js_number(window.inner_width());
    let height = js_number(window.inner_height());
    let document_height = window
        .document()
        .map(|doc| {
            let root = doc
                .document_element()
                .map(|el| el.scroll_height())
                .unwrap_or(0);
            let body = doc.body().map(|b| b.scroll_height()).unwrap_or(0);
            root.max(body) as f32
        })
        .unwrap_or(0.0);
    Viewport {
        width,
        height,
        document_height: document_height.max(height),
        device_pixel_ratio: window.device_pixel_ratio() as f32,
    }
}

pub fn read_environment(window: &web::Window) -> Environment {
    let navigator = window.navigator();
    let coarse_pointer = media_matches(window, "(pointer: coarse)")
        || (media_matches(window, "(hover: none)") && navigator.max_touch_points() > 0);
    Environment {
        viewport: read_viewport(window),
        coarse_pointer,
        reduced_motion: media_matches(window, "(prefers-reduced-motion: reduce)"),
        save_data: save_data_hint(&navigator),
    }
}

fn media_matches(window: &web::Window, query: &str) -> bool {
    match window.match_media(query) {
        Ok(Some(list)) => list.matches(),
        _ => false,
    }
}

/// `navigator.connection` is not in every browser, so it is probed reflectively.
fn save_data_hint(navigator: &web::Navigator) -> bool {
    let Ok(connection) = js_sys::Reflect::get(navigator, &JsValue::from_str("connection")) else {
        return false;
    };
    if connection.is_undefined() || connection.is_null() {
        return false;
    }
    let save_data = js_sys::Reflect::get(&connection, &JsValue::from_str("saveData"))
        .ok()
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let slow = js_sys::Reflect::get(&connection, &JsValue::from_str("effectiveType"))
        .ok()
        .and_then(|v| v.as_string())
        .is_some_and(|t| t == "slow-2g" || t == "2g");
    save_data || slow
}

#[inline]
fn js_number(v: Result<JsValue, JsValue>) -> f32 {
    v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
}
