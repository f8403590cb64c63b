//! Browser host built on `web-sys`.
//!
//! `BrowserHost` registers window-level `pointermove` / `pointerup` /
//! `pointercancel` listeners for the lifetime of a gesture and suppresses
//! text selection on `<body>`. Listener callbacks hand a [`WindowPointer`] to
//! the page's forwarder, which passes it on to
//! [`Coordinator::handle_window_pointer`](crate::coordinator::Coordinator::handle_window_pointer).

use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement, PointerEvent, Window};

use crate::geometry::Rect;
use crate::host::{DragHost, WINDOW_POINTER_EVENTS, WindowPointer};

const USER_SELECT: &str = "user-select";

/// Receives window pointer events while a gesture is active.
pub type PointerForwarder = Rc<dyn Fn(WindowPointer)>;

type PointerCallback = Closure<dyn FnMut(PointerEvent)>;

pub struct BrowserHost {
    body: HtmlElement,
    forward: PointerForwarder,
    /// Listeners currently registered on the window.
    attached: Option<(Window, Vec<(&'static str, PointerCallback)>)>,
    /// Removed listeners, freed on the next attach. `pointerup` detaches from
    /// inside its own callback, so its closure must outlive the call.
    retired: Vec<PointerCallback>,
    /// Inline `user-select` value present before the gesture, if any.
    saved_user_select: Option<String>,
}

impl BrowserHost {
    /// Host bound to the current document's `<body>`. `None` outside a
    /// browser window or before the body exists.
    #[must_use]
    pub fn from_window(forward: PointerForwarder) -> Option<Self> {
        let body = web_sys::window()?.document()?.body()?;
        Some(Self::new(body, forward))
    }

    #[must_use]
    pub fn new(body: HtmlElement, forward: PointerForwarder) -> Self {
        Self { body, forward, attached: None, retired: Vec::new(), saved_user_select: None }
    }

    /// Whether window listeners are registered right now.
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.attached.is_some()
    }
}

impl DragHost for BrowserHost {
    fn attach_listeners(&mut self) {
        if self.attached.is_some() {
            return;
        }
        self.retired.clear();
        let Some(window) = web_sys::window() else {
            warn!("no window; pointer events will not be captured");
            return;
        };

        let mut callbacks = Vec::with_capacity(WINDOW_POINTER_EVENTS.len());
        for event_type in WINDOW_POINTER_EVENTS {
            let forward = Rc::clone(&self.forward);
            let callback: PointerCallback = Closure::wrap(Box::new(move |e: PointerEvent| {
                if let Some(signal) = WindowPointer::from_event(event_type, f64::from(e.client_x()), f64::from(e.client_y())) {
                    forward(signal);
                }
            }) as Box<dyn FnMut(PointerEvent)>);
            match window.add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref()) {
                Ok(()) => callbacks.push((event_type, callback)),
                Err(e) => log_js_error("add pointer listener", &e),
            }
        }
        self.attached = Some((window, callbacks));
    }

    fn detach_listeners(&mut self) {
        let Some((window, callbacks)) = self.attached.take() else {
            return;
        };
        for (event_type, callback) in callbacks {
            if let Err(e) = window.remove_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref()) {
                log_js_error("remove pointer listener", &e);
            }
            self.retired.push(callback);
        }
    }

    fn suspend_selection(&mut self) {
        let style = self.body.style();
        match style.get_property_value(USER_SELECT) {
            Ok(prev) if !prev.is_empty() => self.saved_user_select = Some(prev),
            Ok(_) => self.saved_user_select = None,
            Err(e) => log_js_error("read user-select", &e),
        }
        if let Err(e) = style.set_property(USER_SELECT, "none") {
            log_js_error("suspend user-select", &e);
        }
    }

    fn restore_selection(&mut self) {
        let style = self.body.style();
        match self.saved_user_select.take() {
            Some(prev) => {
                if let Err(e) = style.set_property(USER_SELECT, &prev) {
                    log_js_error("restore user-select", &e);
                }
            }
            None => {
                if let Err(e) = style.remove_property(USER_SELECT) {
                    log_js_error("clear user-select", &e);
                }
            }
        }
    }
}

/// Bounds accessor reading an element's live viewport rectangle.
pub fn element_bounds(element: Element) -> impl Fn() -> Rect {
    move || {
        let r = element.get_bounding_client_rect();
        Rect::new(r.x(), r.y(), r.width(), r.height())
    }
}

fn log_js_error(action: &str, err: &JsValue) {
    warn!(action, error = ?err.as_string(), "browser host call failed");
}
