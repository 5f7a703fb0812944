use backdrop_core::FrameStatus;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Owned `requestAnimationFrame` loop. At most one frame is pending at a time.
///
/// The callback reaches its own handle through weak references, so dropping
/// every `FrameLoop` clone (after [`FrameLoop::dispose`]) frees the closure.
#[derive(Clone)]
pub struct FrameLoop {
    pending: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl FrameLoop {
    pub fn new(mut on_frame: impl FnMut(f64) -> FrameStatus + 'static) -> Self {
        let pending = Rc::new(Cell::new(None));
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let weak_pending = Rc::downgrade(&pending);
        let weak_callback = Rc::downgrade(&callback);

        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            let Some(this) = Self::upgrade(&weak_pending, &weak_callback) else {
                return;
            };
            this.pending.set(None);
            if on_frame(now) == FrameStatus::Continue {
                this.request();
            }
        }) as Box<dyn FnMut(f64)>));

        Self { pending, callback }
    }

    fn upgrade(
        pending: &Weak<Cell<Option<i32>>>,
        callback: &Weak<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    ) -> Option<Self> {
        Some(Self {
            pending: pending.upgrade()?,
            callback: callback.upgrade()?,
        })
    }

    /// Schedule the next frame unless one is already pending.
    pub fn request(&self) {
        if self.pending.get().is_some() {
            return;
        }
        let Some(window) = web::window() else {
            return;
        };
        let callback = self.callback.borrow();
        let Some(cb) = callback.as_ref() else {
            return;
        };
        match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => self.pending.set(Some(id)),
            Err(e) => log::warn!("[frame] requestAnimationFrame failed: {e:?}"),
        }
    }

    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            if let Some(window) = web::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    /// Cancel and drop the callback. The loop cannot be restarted afterwards.
    pub fn dispose(&self) {
        self.cancel();
        self.callback.borrow_mut().take();
    }
}
