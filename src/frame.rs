use crate::audio::AudioPipeline;
use crate::core::{Clock, InstantClock, MediaEvent, Scene};
use crate::dom;
use crate::media::{EventQueue, VideoSource};
use crate::overlay;
use crate::surface::CanvasSurface;
use rand::rngs::StdRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub scene: Scene<StdRng>,
    pub video: VideoSource,
    pub surface: CanvasSurface,
    pub audio_el: Option<web::HtmlAudioElement>,
    pub audio: Option<AudioPipeline>,
    pub audio_ready: Rc<RefCell<bool>>,
    pub media_events: EventQueue,
    pub document: web::Document,
    /// Density scale follows devicePixelRatio unless configured explicitly.
    pub track_pixel_ratio: bool,
    clock: InstantClock,
    gesture_seen: bool,
    last_loading: String,
}

impl FrameContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        scene: Scene<StdRng>,
        video: VideoSource,
        surface: CanvasSurface,
        audio_el: Option<web::HtmlAudioElement>,
        audio: Option<AudioPipeline>,
        audio_ready: Rc<RefCell<bool>>,
        media_events: EventQueue,
        document: web::Document,
        track_pixel_ratio: bool,
    ) -> Self {
        // a reclaimed graph means the gesture already happened
        let gesture_seen = audio.is_some();
        Self {
            scene,
            video,
            surface,
            audio_el,
            audio,
            audio_ready,
            media_events,
            document,
            track_pixel_ratio,
            clock: InstantClock::new(),
            gesture_seen,
            last_loading: String::new(),
        }
    }

    pub fn frame(&mut self) {
        self.drain_media_events();

        let now = self.clock.now_ms();
        let active = self.audio_active();
        let mut bass = self.audio.as_mut().map(AudioPipeline::meter);
        let report = self
            .scene
            .tick(now, active, &mut self.video, &mut self.surface, &mut bass);

        let loading = self.scene.loading().to_string();
        if loading != self.last_loading {
            overlay::update_loading(&self.document, &loading, self.scene.loading().is_ready());
            self.last_loading = loading;
        }
        if let Some(r) = report {
            log::debug!(
                "[frame] t={:.3} d={:.4} bass={:.2} particles={}",
                r.step.current_time,
                r.step.delta,
                r.bass,
                r.particles.drawn
            );
            overlay::update_telemetry(&self.document, &self.scene.telemetry(active));
        }
    }

    fn drain_media_events(&mut self) {
        let events: Vec<MediaEvent> = self.media_events.borrow_mut().drain(..).collect();
        for ev in events {
            if let Err(e) = self
                .scene
                .handle_media_event(&ev, &mut self.video, &mut self.surface)
            {
                log::warn!("[media] {}", e);
            }
        }
    }

    fn audio_active(&self) -> bool {
        self.audio.as_ref().is_some_and(AudioPipeline::is_playing)
    }

    pub fn on_pointer_move(&mut self, uv: [f32; 2]) {
        self.scene.pointer_moved(uv);
        if let Some(a) = &self.audio {
            if *self.audio_ready.borrow() && !a.is_playing() {
                a.play();
            }
        }
    }

    pub fn on_pointer_leave(&mut self) {
        self.scene.pointer_left();
        if let Some(a) = &self.audio {
            a.pause();
        }
    }

    /// First qualifying user gesture: build the audio graph. Failure only
    /// disables bass modulation.
    pub fn on_gesture(&mut self) {
        if self.gesture_seen {
            return;
        }
        self.gesture_seen = true;
        let Some(el) = &self.audio_el else {
            return;
        };
        match AudioPipeline::new(el, self.gesture_seen) {
            Ok(pipeline) => {
                if self.scene.pointer().is_some() {
                    pipeline.play();
                }
                self.audio = Some(pipeline);
            }
            Err(e) => log::warn!("[audio] disabled: {}", e),
        }
    }

    pub fn on_resize(&mut self) {
        let (w, h) = dom::sync_canvas_backing_size(self.surface.overlay_canvas());
        self.scene.resize_viewport(w as f32, h as f32);
        if self.track_pixel_ratio {
            self.scene
                .compositor_mut()
                .set_density_scale(dom::device_pixel_ratio());
        }
    }

    /// Stop playback and hand the audio graph back so a later mount can reuse it.
    pub fn shutdown(&mut self) -> Option<AudioPipeline> {
        let audio = self.audio.take();
        if let Some(a) = &audio {
            a.pause();
        }
        audio
    }
}

/// Owns the requestAnimationFrame callback; cancels it when dropped.
pub struct LoopHandle {
    raf_id: Rc<Cell<Option<i32>>>,
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl LoopHandle {
    pub fn cancel(&self) {
        if let Some(id) = self.raf_id.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
        // breaks the closure's self-reference
        self.tick.borrow_mut().take();
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>, raf_id: &Cell<Option<i32>>) {
    let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref().map(|c| c.as_ref().clone()))
    else {
        return;
    };
    match w.request_animation_frame(cb.unchecked_ref()) {
        Ok(id) => raf_id.set(Some(id)),
        Err(e) => log::error!("[frame] requestAnimationFrame failed: {:?}", e),
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> LoopHandle {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let raf_id = Rc::new(Cell::new(None));
    let tick_clone = tick.clone();
    let raf_clone = raf_id.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        raf_clone.set(None);
        match frame_ctx.try_borrow_mut() {
            Ok(mut ctx) => ctx.frame(),
            Err(_) => log::debug!("[frame] context busy, deferring"),
        }
        request_frame(&tick_clone, &raf_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick, &raf_id);
    LoopHandle { raf_id, tick }
}
