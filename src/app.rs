use crate::constants::{
    ATTR_AUDIO_SRC, ATTR_VIDEO_SRC, AUDIO_ID, FRAME_CANVAS_ID, OVERLAY_CANVAS_ID, VIDEO_ID,
};
use crate::audio::AudioPipeline;
use crate::core::{GraphSlot, LoadingState, Scene, SceneConfig};
use crate::dom::{self, EventListener};
use crate::events;
use crate::frame::{self, FrameContext, LoopHandle};
use crate::media::{self, EventQueue, VideoSource};
use crate::overlay;
use crate::surface::CanvasSurface;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

/// Everything tied to one pair of media sources. Dropping it cancels the
/// frame loop, detaches every listener and parks the audio graph.
struct Mounted {
    loop_handle: LoopHandle,
    listeners: Vec<EventListener>,
    ctx: Rc<RefCell<FrameContext>>,
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.loop_handle.cancel();
        self.listeners.clear();
        let audio = match self.ctx.try_borrow_mut() {
            Ok(mut ctx) => ctx.shutdown(),
            Err(_) => None,
        };
        if let Some(a) = audio {
            AUDIO_GRAPH.with(|slot| slot.borrow_mut().park(a));
        }
    }
}

thread_local! {
    static MOUNTED: RefCell<Option<Mounted>> = const { RefCell::new(None) };
    // Outlives mounts: the audio element can only ever be wired into one graph
    static AUDIO_GRAPH: RefCell<GraphSlot<AudioPipeline>> =
        const { RefCell::new(GraphSlot::new()) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ashen-web starting");

    if let Err(e) = mount(None) {
        log::error!("init error: {:?}", e);
        show_load_error(&e);
    }
    Ok(())
}

/// Swap media sources: tears down the current loop and listeners first. The
/// audio graph is kept and reused when the audio element is unchanged.
#[wasm_bindgen]
pub fn load_sources(video_src: &str, audio_src: Option<String>) -> Result<(), JsValue> {
    unmount();
    mount(Some((video_src.to_string(), audio_src))).map_err(|e| {
        show_load_error(&e);
        JsValue::from_str(&e.to_string())
    })
}

/// Stop everything, including the audio graph.
#[wasm_bindgen]
pub fn teardown() {
    unmount();
    AUDIO_GRAPH.with(|slot| slot.borrow_mut().clear());
}

fn unmount() {
    let previous = MOUNTED.with(|m| m.borrow_mut().take());
    if let Some(mounted) = previous {
        drop(mounted);
        log::info!("[frame] torn down");
    }
}

fn show_load_error(e: &anyhow::Error) {
    if let Some(document) = dom::window_document() {
        let state = LoadingState::Error(e.to_string()).to_string();
        overlay::update_loading(&document, &state, false);
    }
}

fn mount(sources: Option<(String, Option<String>)>) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let frame_canvas: web::HtmlCanvasElement = dom::element_by_id(&document, FRAME_CANVAS_ID)?;
    let overlay_canvas: web::HtmlCanvasElement = dom::element_by_id(&document, OVERLAY_CANVAS_ID)?;
    let video_el: web::HtmlVideoElement = dom::element_by_id(&document, VIDEO_ID)?;
    let audio_el: Option<web::HtmlAudioElement> = dom::element_by_id(&document, AUDIO_ID).ok();

    let (video_src, audio_src) = match sources {
        Some((v, a)) => (Some(v), a),
        None => (
            frame_canvas.get_attribute(ATTR_VIDEO_SRC),
            frame_canvas.get_attribute(ATTR_AUDIO_SRC),
        ),
    };
    let video_src = video_src
        .ok_or_else(|| anyhow::anyhow!("no {} on #{}", ATTR_VIDEO_SRC, FRAME_CANVAS_ID))?;

    let config = SceneConfig::from_attrs(|name| frame_canvas.get_attribute(name));
    log::info!(
        "[config] smoothing={} frame_rate={} preset={} noise={}",
        config.smoothing,
        config.frame_rate,
        config.preset,
        config.pixel_noise
    );

    let (w, h) = dom::sync_canvas_backing_size(&overlay_canvas);
    let mut scene = Scene::from_config(&config, (w as f32, h as f32));
    let track_pixel_ratio = config.density_scale.is_none();
    if track_pixel_ratio {
        scene
            .compositor_mut()
            .set_density_scale(dom::device_pixel_ratio());
    }

    let queue: EventQueue = Rc::new(RefCell::new(VecDeque::new()));
    let mut listeners = media::wire_video_events(&video_el, &queue);
    let audio_ready = Rc::new(RefCell::new(false));
    if let Some(a) = &audio_el {
        listeners.extend(media::wire_audio_events(a, audio_ready.clone()));
        match &audio_src {
            Some(src) => {
                a.set_src(src);
                a.set_loop(true);
                a.load();
            }
            None => log::info!("[audio] no track; particles will not react to bass"),
        }
    }

    let video = VideoSource::new(video_el.clone());
    video.load(&video_src);
    log::info!("[media] loading {}", video_src);

    let surface = CanvasSurface::new(video_el, frame_canvas.clone(), overlay_canvas)?;
    let audio_el = audio_el.filter(|_| audio_src.is_some());
    let audio = AUDIO_GRAPH.with(|slot| {
        let mut slot = slot.borrow_mut();
        match &audio_el {
            Some(el) => slot.reclaim(|graph| graph.element() == el),
            None => {
                slot.clear();
                None
            }
        }
    });
    if audio.is_some() {
        log::info!("[audio] reusing graph for new track");
    }
    let ctx = Rc::new(RefCell::new(FrameContext::new(
        scene,
        video,
        surface,
        audio_el,
        audio,
        audio_ready,
        queue,
        document.clone(),
        track_pixel_ratio,
    )));

    listeners.extend(events::pointer::wire_pointer_handlers(&frame_canvas, &ctx));
    let resize_ctx = ctx.clone();
    listeners.push(EventListener::new(&window, "resize", move |_| {
        if let Ok(mut c) = resize_ctx.try_borrow_mut() {
            c.on_resize();
        }
    }));

    overlay::update_loading(&document, &LoadingState::Initializing.to_string(), false);
    let loop_handle = frame::start_loop(ctx.clone());
    MOUNTED.with(|m| {
        *m.borrow_mut() = Some(Mounted {
            loop_handle,
            listeners,
            ctx,
        });
    });
    Ok(())
}
