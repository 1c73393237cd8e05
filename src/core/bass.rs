//! Bass-band intensity from a magnitude spectrum.

use crate::core::constants::BASS_BIN_FRACTION;

/// Anything that can fill a byte magnitude spectrum (0..=255 per bin).
pub trait SpectrumSource {
    /// Number of frequency bins; fixed for the lifetime of the source.
    fn bin_count(&self) -> usize;
    fn read_spectrum(&self, out: &mut [u8]);
}

/// Per-tick bass source consumed by the scene.
pub trait BassSampler {
    fn sample(&mut self, active: bool) -> f32;
}

/// Samples bass intensity once per tick without reallocating.
pub struct BassMeter<S> {
    source: S,
    scratch: Vec<u8>,
}

impl<S: SpectrumSource> BassMeter<S> {
    pub fn new(source: S) -> Self {
        let bins = source.bin_count();
        Self {
            source,
            scratch: vec![0; bins],
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn bin_count(&self) -> usize {
        self.scratch.len()
    }

    /// Normalized bass intensity in `[0, 1]`; exactly 0 when `active` is false.
    pub fn sample(&mut self, active: bool) -> f32 {
        if !active {
            return 0.0;
        }
        self.source.read_spectrum(&mut self.scratch);
        bass_intensity(&self.scratch)
    }
}

impl<S: SpectrumSource> BassSampler for BassMeter<S> {
    fn sample(&mut self, active: bool) -> f32 {
        BassMeter::sample(self, active)
    }
}

impl<B: BassSampler + ?Sized> BassSampler for &mut B {
    fn sample(&mut self, active: bool) -> f32 {
        (**self).sample(active)
    }
}

// Missing audio graph degrades to a silent, non-reactive field
impl<B: BassSampler> BassSampler for Option<B> {
    fn sample(&mut self, active: bool) -> f32 {
        self.as_mut().map_or(0.0, |b| b.sample(active))
    }
}

/// Keeps an analysis graph alive between mounts.
///
/// A media element can feed only one graph source node for its whole life,
/// so the graph built around it is parked on teardown and reclaimed by the
/// next mount instead of being rebuilt. Dropping a graph releases it.
#[derive(Debug)]
pub struct GraphSlot<G> {
    parked: Option<G>,
}

impl<G> GraphSlot<G> {
    pub const fn new() -> Self {
        Self { parked: None }
    }

    pub fn is_empty(&self) -> bool {
        self.parked.is_none()
    }

    /// Replaces (and drops) any graph already parked.
    pub fn park(&mut self, graph: G) {
        self.parked = Some(graph);
    }

    /// Take the parked graph if `fits` accepts it; a rejected graph is dropped.
    pub fn reclaim(&mut self, fits: impl FnOnce(&G) -> bool) -> Option<G> {
        self.parked.take().filter(|g| fits(g))
    }

    pub fn clear(&mut self) {
        self.parked = None;
    }
}

impl<G> Default for GraphSlot<G> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean of the lowest ~10% of bins, normalized by 255.
pub fn bass_intensity(spectrum: &[u8]) -> f32 {
    let take = (spectrum.len() as f32 * BASS_BIN_FRACTION) as usize;
    if take == 0 {
        return 0.0;
    }
    let sum: u32 = spectrum[..take].iter().map(|&b| u32::from(b)).sum();
    (sum as f32 / take as f32 / 255.0).clamp(0.0, 1.0)
}
