use crate::core::constants::{ANALYSER_FFT_SIZE, BASS_GAIN, BASS_LOWPASS_HZ, BASS_LOWPASS_Q};
use crate::core::{AudioError, BassMeter, SpectrumSource};
use web_sys as web;

impl SpectrumSource for web::AnalyserNode {
    fn bin_count(&self) -> usize {
        self.frequency_bin_count() as usize
    }

    fn read_spectrum(&self, out: &mut [u8]) {
        self.get_byte_frequency_data(out);
    }
}

/// source -> lowpass -> gain -> analyser -> destination
pub struct AudioPipeline {
    ctx: web::AudioContext,
    element: web::HtmlAudioElement,
    _source: web::MediaElementAudioSourceNode,
    _lowpass: web::BiquadFilterNode,
    _gain: web::GainNode,
    meter: BassMeter<web::AnalyserNode>,
}

fn graph_err(label: &str) -> impl Fn(wasm_bindgen::JsValue) -> AudioError + '_ {
    move |e| {
        log::error!("[audio] {} error: {:?}", label, e);
        AudioError::Graph(format!("{label}: {e:?}"))
    }
}

fn create_gain(ctx: &web::AudioContext, value: f32) -> Result<web::GainNode, AudioError> {
    let g = web::GainNode::new(ctx).map_err(graph_err("GainNode"))?;
    g.gain().set_value(value);
    Ok(g)
}

impl AudioPipeline {
    /// Build the analysis graph around `element`. Browsers refuse to run an
    /// AudioContext before a user gesture, so the caller passes whether one
    /// has been observed.
    pub fn new(element: &web::HtmlAudioElement, gesture_seen: bool) -> Result<Self, AudioError> {
        if !gesture_seen {
            return Err(AudioError::GestureRequired);
        }
        let ctx = web::AudioContext::new().map_err(graph_err("AudioContext"))?;
        let source = ctx
            .create_media_element_source(element)
            .map_err(graph_err("MediaElementSource"))?;

        let lowpass = web::BiquadFilterNode::new(&ctx).map_err(graph_err("BiquadFilterNode"))?;
        lowpass.set_type(web::BiquadFilterType::Lowpass);
        lowpass.frequency().set_value(BASS_LOWPASS_HZ);
        lowpass.q().set_value(BASS_LOWPASS_Q);

        let gain = create_gain(&ctx, BASS_GAIN)?;

        let analyser = web::AnalyserNode::new(&ctx).map_err(graph_err("AnalyserNode"))?;
        analyser.set_fft_size(ANALYSER_FFT_SIZE);

        source
            .connect_with_audio_node(&lowpass)
            .and_then(|_| lowpass.connect_with_audio_node(&gain))
            .and_then(|_| gain.connect_with_audio_node(&analyser))
            .and_then(|_| analyser.connect_with_audio_node(&ctx.destination()))
            .map_err(graph_err("connect"))?;

        log::info!(
            "[audio] graph ready: lowpass {}Hz q={} gain={} bins={}",
            BASS_LOWPASS_HZ,
            BASS_LOWPASS_Q,
            BASS_GAIN,
            analyser.frequency_bin_count()
        );
        Ok(Self {
            ctx,
            element: element.clone(),
            _source: source,
            _lowpass: lowpass,
            _gain: gain,
            meter: BassMeter::new(analyser),
        })
    }

    /// The element this graph is bound to for the element's whole life.
    pub fn element(&self) -> &web::HtmlAudioElement {
        &self.element
    }

    pub fn meter(&mut self) -> &mut BassMeter<web::AnalyserNode> {
        &mut self.meter
    }

    pub fn is_playing(&self) -> bool {
        !self.element.paused()
    }

    /// Resume the context and start playback; failures are logged only.
    pub fn play(&self) {
        _ = self.ctx.resume();
        match self.element.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                    log::warn!("[audio] play rejected: {:?}", e);
                }
            }),
            Err(e) => log::warn!("[audio] play error: {:?}", e),
        }
    }

    pub fn pause(&self) {
        _ = self.element.pause();
    }
}

impl Drop for AudioPipeline {
    fn drop(&mut self) {
        self.pause();
        _ = self.ctx.close();
        log::info!("[audio] graph closed");
    }
}
