#![cfg(target_arch = "wasm32")]
//! Browser front-end: mounts the arena backdrop on a canvas element.
//!
//! ```js
//! import init, { Backdrop } from "./backdrop_web.js";
//! await init();
//! const backdrop = new Backdrop(canvas, { intensity: 1.3 });
//! // later
//! backdrop.unmount();
//! ```

mod canvas2d;
mod dom;
mod events;
mod frame;

use anyhow::anyhow;
use backdrop_core::{BackdropConfig, Engine};
use canvas2d::WebCanvas;
use events::EventListener;
use frame::FrameLoop;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

pub(crate) type SharedEngine = Rc<RefCell<Engine<WebCanvas>>>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("backdrop-web loaded");
    Ok(())
}

struct Mounted {
    engine: SharedEngine,
    frame: FrameLoop,
    listeners: Vec<EventListener>,
}

impl Mounted {
    fn teardown(self) {
        drop(self.listeners);
        self.frame.dispose();
        self.engine.borrow_mut().stop();
    }
}

/// Handle returned to the page. Dropping it (`free()` from JS) unmounts.
#[wasm_bindgen]
pub struct Backdrop {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl Backdrop {
    /// Mount on `canvas`. `options` is a plain object, a bare intensity
    /// number, or `undefined`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: web::HtmlCanvasElement, options: JsValue) -> Result<Backdrop, JsValue> {
        mount(canvas, &options)
            .map(|m| Backdrop { mounted: Some(m) })
            .map_err(|e| {
                log::error!("[backdrop] mount failed: {e:#}");
                JsValue::from_str(&format!("{e:#}"))
            })
    }

    #[wasm_bindgen(js_name = mountById)]
    pub fn mount_by_id(id: &str, options: JsValue) -> Result<Backdrop, JsValue> {
        let canvas = find_canvas(id).map_err(|e| JsValue::from_str(&format!("{e:#}")))?;
        Self::new(canvas, options)
    }

    /// Stop animating and remove every listener. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if let Some(m) = self.mounted.take() {
            m.teardown();
        }
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.mounted
            .as_ref()
            .is_some_and(|m| m.engine.borrow().lifecycle() == backdrop_core::Lifecycle::Running)
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn find_canvas(id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    let window = dom::window()?;
    let document = dom::document(&window)?;
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow!("missing #{id}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|_| anyhow!("#{id} is not a canvas"))
}

fn parse_options(options: &JsValue) -> BackdropConfig {
    if options.is_undefined() || options.is_null() {
        return BackdropConfig::default();
    }
    if let Some(intensity) = options.as_f64() {
        return BackdropConfig::with_intensity(intensity as f32);
    }
    let json = js_sys::JSON::stringify(options)
        .ok()
        .and_then(|s| s.as_string());
    match json.map(|s| serde_json::from_str::<BackdropConfig>(&s)) {
        Some(Ok(cfg)) => cfg,
        Some(Err(e)) => {
            log::warn!("[backdrop] ignoring malformed options: {e}");
            BackdropConfig::default()
        }
        None => {
            log::warn!("[backdrop] options are not serialisable; using defaults");
            BackdropConfig::default()
        }
    }
}

fn mount(canvas: web::HtmlCanvasElement, options: &JsValue) -> anyhow::Result<Mounted> {
    let window = dom::window()?;
    let document = dom::document(&window)?;
    let config = parse_options(options);
    let env = dom::read_environment(&window);

    let surface = WebCanvas::new(canvas, document.clone())?;
    let engine = Engine::with_default_scene(surface, &config, &env)?;
    let pointer_feed = engine.pointer_active();
    let engine: SharedEngine = Rc::new(RefCell::new(engine));

    let frame = {
        let engine = engine.clone();
        FrameLoop::new(move |now| engine.borrow_mut().tick(now))
    };

    let mut listeners = vec![
        events::on_resize(&window, &engine)?,
        events::on_visibility_change(&document, &engine, &frame)?,
    ];
    if pointer_feed {
        listeners.push(events::on_pointer_move(&window, &engine)?);
    }

    let now = instant::now();
    {
        let mut e = engine.borrow_mut();
        e.start(now);
        if document.hidden() {
            e.set_visible(false, now);
        }
    }
    if !document.hidden() {
        frame.request();
    }

    Ok(Mounted {
        engine,
        frame,
        listeners,
    })
}
