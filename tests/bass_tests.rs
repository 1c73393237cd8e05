// Host-side tests for bass-band extraction.

use ashen_web::core::{bass_intensity, BassMeter, BassSampler, GraphSlot, SpectrumSource};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

struct FakeSpectrum {
    bins: RefCell<Vec<u8>>,
    reads: Cell<usize>,
}

impl FakeSpectrum {
    fn new(bins: Vec<u8>) -> Self {
        Self {
            bins: RefCell::new(bins),
            reads: Cell::new(0),
        }
    }
}

impl SpectrumSource for FakeSpectrum {
    fn bin_count(&self) -> usize {
        self.bins.borrow().len()
    }

    fn read_spectrum(&self, out: &mut [u8]) {
        self.reads.set(self.reads.get() + 1);
        out.copy_from_slice(&self.bins.borrow());
    }
}

#[test]
fn inactive_returns_exact_zero_without_reading() {
    let mut meter = BassMeter::new(FakeSpectrum::new(vec![255; 512]));
    assert_eq!(meter.sample(false), 0.0);
    assert_eq!(meter.source().reads.get(), 0);
}

#[test]
fn full_and_silent_spectra_hit_the_bounds() {
    let mut loud = BassMeter::new(FakeSpectrum::new(vec![255; 512]));
    assert!((loud.sample(true) - 1.0).abs() < 1e-6);
    let mut silent = BassMeter::new(FakeSpectrum::new(vec![0; 512]));
    assert_eq!(silent.sample(true), 0.0);
}

#[test]
fn only_the_lowest_tenth_counts() {
    // 512 bins -> lowest 51
    let mut bins = vec![255u8; 512];
    for b in bins.iter_mut().take(51) {
        *b = 204;
    }
    let v = bass_intensity(&bins);
    assert!((v - 0.8).abs() < 1e-6, "got {v}");

    let mut highs_only = vec![0u8; 512];
    for b in highs_only.iter_mut().skip(51) {
        *b = 255;
    }
    assert_eq!(bass_intensity(&highs_only), 0.0);
}

#[test]
fn tiny_spectrum_yields_zero() {
    assert_eq!(bass_intensity(&[]), 0.0);
    assert_eq!(bass_intensity(&[255; 9]), 0.0);
}

#[test]
fn scratch_buffer_is_sized_once() {
    let mut meter = BassMeter::new(FakeSpectrum::new(vec![100; 512]));
    assert_eq!(meter.bin_count(), 512);
    for _ in 0..10 {
        meter.sample(true);
    }
    assert_eq!(meter.bin_count(), 512);
    assert_eq!(meter.source().reads.get(), 10);
}

#[test]
fn sample_tracks_the_latest_spectrum() {
    let mut meter = BassMeter::new(FakeSpectrum::new(vec![0; 100]));
    assert_eq!(meter.sample(true), 0.0);
    meter.source().bins.borrow_mut().iter_mut().for_each(|b| *b = 51);
    assert!((meter.sample(true) - 0.2).abs() < 1e-6);
}

#[test]
fn intensity_is_always_in_unit_range() {
    let mut seed: u32 = 0x1234_ABCD;
    for _ in 0..200 {
        let bins: Vec<u8> = (0..256)
            .map(|_| {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                (seed & 0xFF) as u8
            })
            .collect();
        let v = bass_intensity(&bins);
        assert!((0.0..=1.0).contains(&v), "out of range: {v}");
    }
}

#[test]
fn missing_pipeline_degrades_to_silence() {
    let mut none: Option<BassMeter<FakeSpectrum>> = None;
    assert_eq!(none.sample(true), 0.0);

    let mut some = Some(BassMeter::new(FakeSpectrum::new(vec![255; 64])));
    assert!(some.sample(true) > 0.99);
    assert_eq!(some.sample(false), 0.0);
}

/// Stand-in for an audio graph bound to one element; counts releases.
struct FakeGraph {
    element: &'static str,
    released: Rc<Cell<usize>>,
}

impl Drop for FakeGraph {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

#[test]
fn graph_survives_a_source_swap_on_the_same_element() {
    let released = Rc::new(Cell::new(0));
    let mut slot = GraphSlot::new();
    assert!(slot.is_empty());

    // teardown of the first mount parks the graph instead of closing it
    slot.park(FakeGraph {
        element: "scrub-audio",
        released: released.clone(),
    });
    assert!(!slot.is_empty());

    // the next mount reuses it for the same element
    let graph = slot.reclaim(|g| g.element == "scrub-audio").unwrap();
    assert_eq!(graph.element, "scrub-audio");
    assert_eq!(released.get(), 0);
    assert!(slot.is_empty());

    slot.park(graph);
    let again = slot.reclaim(|g| g.element == "scrub-audio");
    assert!(again.is_some());
    assert_eq!(released.get(), 0);
}

#[test]
fn graph_for_another_element_is_released() {
    let released = Rc::new(Cell::new(0));
    let mut slot = GraphSlot::new();
    slot.park(FakeGraph {
        element: "old-audio",
        released: released.clone(),
    });
    assert!(slot.reclaim(|g| g.element == "new-audio").is_none());
    assert_eq!(released.get(), 1);
    assert!(slot.is_empty());
}

#[test]
fn full_teardown_releases_the_parked_graph() {
    let released = Rc::new(Cell::new(0));
    let mut slot = GraphSlot::default();
    slot.park(FakeGraph {
        element: "scrub-audio",
        released: released.clone(),
    });
    slot.park(FakeGraph {
        element: "scrub-audio",
        released: released.clone(),
    });
    assert_eq!(released.get(), 1);
    slot.clear();
    assert_eq!(released.get(), 2);
}
