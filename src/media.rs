use crate::core::{DrawError, MediaEvent, MediaSource};
use crate::dom::EventListener;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use web_sys as web;

/// Lifecycle events queued by DOM listeners, drained at the start of a tick.
pub type EventQueue = Rc<RefCell<VecDeque<MediaEvent>>>;

pub struct VideoSource {
    video: web::HtmlVideoElement,
}

impl VideoSource {
    pub fn new(video: web::HtmlVideoElement) -> Self {
        video.set_preload("auto");
        video.set_muted(true);
        Self { video }
    }

    pub fn load(&self, src: &str) {
        self.video.set_src(src);
        self.video.load();
    }
}

impl MediaSource for VideoSource {
    fn duration_seconds(&self) -> f64 {
        self.video.duration()
    }

    fn natural_size(&self) -> (u32, u32) {
        (self.video.video_width(), self.video.video_height())
    }

    fn seek(&mut self, time: f64) -> Result<(), DrawError> {
        if self.video.ready_state() == 0 {
            return Err(DrawError::SourceNotReady);
        }
        self.video.set_current_time(time);
        Ok(())
    }
}

fn push(queue: &EventQueue, event: MediaEvent) {
    queue.borrow_mut().push_back(event);
}

/// Attach lifecycle listeners on the video element. Dropping the returned
/// listeners detaches them.
pub fn wire_video_events(video: &web::HtmlVideoElement, queue: &EventQueue) -> Vec<EventListener> {
    let mut listeners = Vec::new();

    let (q, v) = (queue.clone(), video.clone());
    listeners.push(EventListener::new(video, "loadedmetadata", move |_| {
        let event = MediaEvent::MetadataReady {
            duration: v.duration(),
            width: v.video_width(),
            height: v.video_height(),
        };
        push(&q, event);
    }));

    let q = queue.clone();
    listeners.push(EventListener::new(video, "loadeddata", move |_| {
        push(&q, MediaEvent::FrameReady);
    }));

    let q = queue.clone();
    listeners.push(EventListener::new(video, "seeking", move |_| {
        push(&q, MediaEvent::SeekStarted);
    }));

    let q = queue.clone();
    listeners.push(EventListener::new(video, "seeked", move |_| {
        push(&q, MediaEvent::SeekFinished);
    }));

    let (q, v) = (queue.clone(), video.clone());
    listeners.push(EventListener::new(video, "error", move |_| {
        let msg = v
            .error()
            .map(|e| {
                let m = e.message();
                if m.is_empty() {
                    format!("media error code {}", e.code())
                } else {
                    m
                }
            })
            .unwrap_or_else(|| "video failed to load".to_string());
        push(&q, MediaEvent::DecodeError(msg));
    }));

    listeners
}

/// Audio readiness is informational; a failing track only disables bass modulation.
pub fn wire_audio_events(
    audio: &web::HtmlAudioElement,
    ready: Rc<RefCell<bool>>,
) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    let r = ready.clone();
    listeners.push(EventListener::new(audio, "canplaythrough", move |_| {
        if !*r.borrow() {
            log::info!("[audio] can play through");
        }
        *r.borrow_mut() = true;
    }));
    let a = audio.clone();
    listeners.push(EventListener::new(audio, "error", move |_| {
        let code = a.error().map(|e| e.code()).unwrap_or(0);
        log::error!("[audio] track failed to load (code {})", code);
        *ready.borrow_mut() = false;
    }));
    listeners
}
