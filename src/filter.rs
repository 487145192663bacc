use atomic_float::AtomicF32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::biquad::{BiQuad, BiquadCoefficients};
use crate::coefficients::{SharedCoefficients, NEVER_SEEN};
use crate::filter_type::FilterType;
use crate::math::{clamp_frequency, clamp_q};
use crate::process::{AudioProcess, FilterControl};

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Frequency in Hz, resonance/bandwidth factor and gain in dB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParameters {
    pub frequency: f32,
    pub q: f32,
    pub gain_db: f32,
}

impl FilterParameters {
    /// Builds a clamped parameter set.
    pub fn new(frequency: f32, q: f32, gain_db: f32) -> Self {
        Self {
            frequency: clamp_frequency(frequency),
            q: clamp_q(q),
            gain_db,
        }
    }
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            q: 0.7,
            gain_db: 0.0,
        }
    }
}

/// Parameters and published coefficients of one stage. Everything in here may be
/// touched from a control thread while the audio thread renders.
#[derive(Debug)]
struct FilterShared {
    kind: FilterType,
    frequency: AtomicF32,
    q: AtomicF32,
    gain_db: AtomicF32,
    sample_rate: AtomicU32,
    coefficients: SharedCoefficients,
}

impl FilterShared {
    fn new(kind: FilterType, sample_rate: u32) -> Self {
        // A stage of a cascade runs the 12 dB section it is built from
        let kind = kind.stage_type();
        let params = FilterParameters::default();
        let sample_rate = sample_rate.max(1);
        Self {
            kind,
            frequency: AtomicF32::new(params.frequency),
            q: AtomicF32::new(params.q),
            gain_db: AtomicF32::new(params.gain_db),
            sample_rate: AtomicU32::new(sample_rate),
            coefficients: SharedCoefficients::new(kind.coefficients(&params, sample_rate)),
        }
    }

    fn parameters(&self) -> FilterParameters {
        FilterParameters {
            frequency: self.frequency.load(Ordering::Relaxed),
            q: self.q.load(Ordering::Relaxed),
            gain_db: self.gain_db.load(Ordering::Relaxed),
        }
    }

    fn set_frequency(&self, frequency: f32) {
        self.frequency.store(clamp_frequency(frequency), Ordering::Relaxed);
        self.calc_coefficients();
    }

    fn set_q(&self, q: f32) {
        self.q.store(clamp_q(q), Ordering::Relaxed);
        self.calc_coefficients();
    }

    fn set_gain(&self, gain_db: f32) {
        self.gain_db.store(gain_db, Ordering::Relaxed);
        self.calc_coefficients();
    }

    fn set_parameters(&self, frequency: f32, q: f32, gain_db: f32) {
        let params = FilterParameters::new(frequency, q, gain_db);
        self.frequency.store(params.frequency, Ordering::Relaxed);
        self.q.store(params.q, Ordering::Relaxed);
        self.gain_db.store(params.gain_db, Ordering::Relaxed);
        self.calc_coefficients();
    }

    fn set_sample_rate(&self, sample_rate: u32) {
        if sample_rate > 0 {
            self.sample_rate.store(sample_rate, Ordering::Relaxed);
            self.calc_coefficients();
        }
    }

    fn calc_coefficients(&self) {
        let coeffs = self
            .kind
            .coefficients(&self.parameters(), self.sample_rate.load(Ordering::Relaxed));
        self.coefficients.publish(&coeffs);
    }
}

/// Control-thread side of a [`Filter`].
#[derive(Debug, Clone)]
pub struct FilterHandle {
    shared: Arc<FilterShared>,
}

impl FilterHandle {
    pub fn filter_type(&self) -> FilterType {
        self.shared.kind
    }

    pub fn parameters(&self) -> FilterParameters {
        self.shared.parameters()
    }

    pub fn sample_rate(&self) -> u32 {
        self.shared.sample_rate.load(Ordering::Relaxed)
    }

    /// The most recently published coefficients.
    pub fn coefficients(&self) -> BiquadCoefficients {
        self.shared.coefficients.load()
    }

    pub fn set_frequency(&self, frequency: f32) {
        self.shared.set_frequency(frequency);
    }

    pub fn set_q(&self, q: f32) {
        self.shared.set_q(q);
    }

    pub fn set_gain(&self, gain_db: f32) {
        self.shared.set_gain(gain_db);
    }

    pub fn set_parameters(&self, frequency: f32, q: f32, gain_db: f32) {
        self.shared.set_parameters(frequency, q, gain_db);
    }

    pub fn set_sample_rate(&self, sample_rate: u32) {
        self.shared.set_sample_rate(sample_rate);
    }

    pub fn calc_coefficients(&self) {
        self.shared.calc_coefficients();
    }
}

/// One biquad stage of a single topology.
///
/// Cascaded types ([`FilterType::Lp24`], [`FilterType::Hp24`]) build a single
/// Lp12/Hp12 stage and report that type. Use [`crate::chain::FilterChain::cascade`]
/// or [`crate::multi_filter::MultiFilter`] for the full 24 dB response.
#[derive(Debug)]
pub struct Filter {
    handle: FilterHandle,
    kernel: BiQuad,
    /// Sequence of the snapshot loaded into `kernel`.
    seen: u32,
}

impl Filter {
    pub fn new(kind: FilterType) -> Self {
        Self::with_sample_rate(kind, DEFAULT_SAMPLE_RATE)
    }

    pub fn with_sample_rate(kind: FilterType, sample_rate: u32) -> Self {
        let mut filter = Self {
            handle: FilterHandle {
                shared: Arc::new(FilterShared::new(kind, sample_rate)),
            },
            kernel: BiQuad::new(),
            seen: NEVER_SEEN,
        };
        filter.refresh();
        filter
    }

    /// A handle for updating this filter from another thread.
    pub fn handle(&self) -> FilterHandle {
        self.handle.clone()
    }

    pub fn filter_type(&self) -> FilterType {
        self.handle.filter_type()
    }

    pub fn parameters(&self) -> FilterParameters {
        self.handle.parameters()
    }

    pub fn sample_rate(&self) -> u32 {
        self.handle.sample_rate()
    }

    pub fn coefficients(&self) -> BiquadCoefficients {
        self.handle.coefficients()
    }

    pub fn is_cleared(&self) -> bool {
        self.kernel.is_cleared()
    }

    /// Picks up newly published coefficients. Keeps the current set when a write
    /// is in flight and tries again on the next call.
    #[inline]
    fn refresh(&mut self) {
        let shared = &self.handle.shared.coefficients;
        if shared.version() != self.seen {
            if let Some((coeffs, version)) = shared.try_load() {
                self.kernel.set_coefficients(coeffs);
                self.seen = version;
            }
        }
    }
}

impl AudioProcess for Filter {
    fn set_sample_rate(&mut self, sample_rate: u32) {
        self.handle.set_sample_rate(sample_rate);
    }

    #[inline]
    fn process_sample(&mut self, input: f32) -> f32 {
        self.refresh();
        self.kernel.tick(input)
    }

    fn process_block(&mut self, block: &mut [f32]) {
        self.refresh();
        for sample in block.iter_mut() {
            *sample = self.kernel.tick(*sample);
        }
    }
}

impl FilterControl for Filter {
    fn set_frequency(&mut self, frequency: f32) {
        self.handle.set_frequency(frequency);
    }

    fn set_q(&mut self, q: f32) {
        self.handle.set_q(q);
    }

    fn set_gain(&mut self, gain_db: f32) {
        self.handle.set_gain(gain_db);
    }

    fn set_parameters(&mut self, frequency: f32, q: f32, gain_db: f32) {
        self.handle.set_parameters(frequency, q, gain_db);
    }

    fn calc_coefficients(&mut self) {
        self.handle.calc_coefficients();
    }

    fn clear(&mut self) {
        self.kernel.clear();
    }

    fn use_q(&self) -> bool {
        self.filter_type().use_q()
    }

    fn use_gain(&self) -> bool {
        self.filter_type().use_gain()
    }
}
