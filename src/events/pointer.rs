use crate::dom::EventListener;
use crate::frame::FrameContext;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Pointer position normalized to the element's box, clamped to `[0, 1]²`.
#[inline]
pub fn pointer_uv(ev: &web::MouseEvent, el: &web::Element) -> Option<[f32; 2]> {
    let rect = el.get_bounding_client_rect();
    let w = rect.width() as f32;
    let h = rect.height() as f32;
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    Some([(x_css / w).clamp(0.0, 1.0), (y_css / h).clamp(0.0, 1.0)])
}

fn with_ctx(ctx: &Rc<RefCell<FrameContext>>, f: impl FnOnce(&mut FrameContext)) {
    match ctx.try_borrow_mut() {
        Ok(mut c) => f(&mut c),
        Err(_) => log::debug!("[pointer] frame context busy, event dropped"),
    }
}

/// Scrub on move, release on leave, and treat presses as the audio gesture.
pub fn wire_pointer_handlers(
    canvas: &web::HtmlCanvasElement,
    ctx: &Rc<RefCell<FrameContext>>,
) -> Vec<EventListener> {
    let mut listeners = Vec::new();

    let (c, el) = (ctx.clone(), canvas.clone());
    listeners.push(EventListener::new(canvas, "pointermove", move |ev| {
        let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else {
            return;
        };
        if let Some(uv) = pointer_uv(ev, &el) {
            with_ctx(&c, |f| f.on_pointer_move(uv));
        }
    }));

    let c = ctx.clone();
    listeners.push(EventListener::new(canvas, "pointerleave", move |_| {
        with_ctx(&c, FrameContext::on_pointer_leave);
    }));

    let c = ctx.clone();
    listeners.push(EventListener::new(canvas, "pointerdown", move |_| {
        with_ctx(&c, FrameContext::on_gesture);
    }));

    if let Some(window) = web::window() {
        let c = ctx.clone();
        listeners.push(EventListener::new(&window, "keydown", move |_| {
            with_ctx(&c, FrameContext::on_gesture);
        }));
    }

    listeners
}
