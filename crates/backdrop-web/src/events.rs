use crate::dom;
use crate::frame::FrameLoop;
use crate::SharedEngine;
use anyhow::anyhow;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Passive DOM listener that unregisters itself when dropped.
pub struct EventListener {
    target: web::EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(web::Event)>,
}

impl EventListener {
    pub fn new(
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let options = web::AddEventListenerOptions::new();
        options.set_passive(true);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| anyhow!("addEventListener({kind}) failed: {e:?}"))?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

pub fn on_resize(window: &web::Window, engine: &SharedEngine) -> anyhow::Result<EventListener> {
    let engine = engine.clone();
    let win = window.clone();
    EventListener::new(window, "resize", move |_| {
        let viewport = dom::read_viewport(&win);
        engine.borrow_mut().resize(viewport);
    })
}

pub fn on_pointer_move(
    window: &web::Window,
    engine: &SharedEngine,
) -> anyhow::Result<EventListener> {
    let engine = engine.clone();
    EventListener::new(window, "pointermove", move |ev| {
        if let Some(ev) = ev.dyn_ref::<web::MouseEvent>() {
            engine
                .borrow_mut()
                .pointer_move(ev.client_x() as f32, ev.client_y() as f32);
        }
    })
}

/// Suspends the engine and cancels the pending frame while the page is
/// hidden; resumes with a rebased clock when it is shown again.
pub fn on_visibility_change(
    document: &web::Document,
    engine: &SharedEngine,
    frame: &FrameLoop,
) -> anyhow::Result<EventListener> {
    let engine = engine.clone();
    let frame = frame.clone();
    let doc = document.clone();
    EventListener::new(document, "visibilitychange", move |_| {
        let visible = !doc.hidden();
        let changed = engine.borrow_mut().set_visible(visible, instant::now());
        match (visible, changed) {
            (false, _) => frame.cancel(),
            (true, true) => frame.request(),
            (true, false) => {}
        }
    })
}
