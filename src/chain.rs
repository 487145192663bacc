//! Filters run in series, used for the 24 dB/octave types.

use crate::filter::{Filter, FilterHandle, FilterParameters, DEFAULT_SAMPLE_RATE};
use crate::filter_type::FilterType;
use crate::process::{AudioProcess, FilterControl};

#[derive(Debug)]
pub struct FilterChain {
    kind: FilterType,
    stages: Vec<Filter>,
}

impl FilterChain {
    /// An empty chain reporting `kind`'s capabilities.
    pub fn new(kind: FilterType) -> Self {
        Self {
            kind,
            stages: Vec::with_capacity(kind.stage_count()),
        }
    }

    /// `kind.stage_count()` independent stages of `kind.stage_type()`.
    pub fn cascade(kind: FilterType, sample_rate: u32) -> Self {
        let mut chain = Self::new(kind);
        for _ in 0..kind.stage_count() {
            chain.push(Filter::with_sample_rate(kind.stage_type(), sample_rate));
        }
        chain
    }

    pub fn push(&mut self, filter: Filter) {
        self.stages.push(filter);
    }

    pub fn filter_type(&self) -> FilterType {
        self.kind
    }

    pub fn stages(&self) -> &[Filter] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn is_cleared(&self) -> bool {
        self.stages.iter().all(Filter::is_cleared)
    }

    /// Parameters of the first stage, every stage receives the same updates.
    pub fn parameters(&self) -> FilterParameters {
        self.stages
            .first()
            .map(Filter::parameters)
            .unwrap_or_default()
    }

    pub fn handle(&self) -> FilterChainHandle {
        FilterChainHandle {
            kind: self.kind,
            stages: self.stages.iter().map(Filter::handle).collect(),
        }
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::cascade(FilterType::Lp24, DEFAULT_SAMPLE_RATE)
    }
}

impl AudioProcess for FilterChain {
    fn set_sample_rate(&mut self, sample_rate: u32) {
        for stage in &mut self.stages {
            stage.set_sample_rate(sample_rate);
        }
    }

    #[inline]
    fn process_sample(&mut self, input: f32) -> f32 {
        self.stages
            .iter_mut()
            .fold(input, |value, stage| stage.process_sample(value))
    }

    fn process_block(&mut self, block: &mut [f32]) {
        for stage in &mut self.stages {
            stage.process_block(block);
        }
    }
}

impl FilterControl for FilterChain {
    fn set_frequency(&mut self, frequency: f32) {
        for stage in &mut self.stages {
            stage.set_frequency(frequency);
        }
    }

    fn set_q(&mut self, q: f32) {
        for stage in &mut self.stages {
            stage.set_q(q);
        }
    }

    fn set_gain(&mut self, gain_db: f32) {
        for stage in &mut self.stages {
            stage.set_gain(gain_db);
        }
    }

    fn set_parameters(&mut self, frequency: f32, q: f32, gain_db: f32) {
        for stage in &mut self.stages {
            stage.set_parameters(frequency, q, gain_db);
        }
    }

    fn calc_coefficients(&mut self) {
        for stage in &mut self.stages {
            stage.calc_coefficients();
        }
    }

    fn clear(&mut self) {
        for stage in &mut self.stages {
            stage.clear();
        }
    }

    fn use_q(&self) -> bool {
        self.kind.use_q()
    }

    fn use_gain(&self) -> bool {
        self.kind.use_gain()
    }
}

/// Control-thread side of a [`FilterChain`], broadcasting to every stage.
#[derive(Debug, Clone)]
pub struct FilterChainHandle {
    kind: FilterType,
    stages: Vec<FilterHandle>,
}

impl FilterChainHandle {
    pub(crate) fn single(stage: FilterHandle) -> Self {
        Self {
            kind: stage.filter_type(),
            stages: vec![stage],
        }
    }

    pub fn filter_type(&self) -> FilterType {
        self.kind
    }

    pub fn stages(&self) -> &[FilterHandle] {
        &self.stages
    }

    pub fn parameters(&self) -> FilterParameters {
        self.stages
            .first()
            .map(FilterHandle::parameters)
            .unwrap_or_default()
    }

    pub fn set_frequency(&self, frequency: f32) {
        self.stages.iter().for_each(|s| s.set_frequency(frequency));
    }

    pub fn set_q(&self, q: f32) {
        self.stages.iter().for_each(|s| s.set_q(q));
    }

    pub fn set_gain(&self, gain_db: f32) {
        self.stages.iter().for_each(|s| s.set_gain(gain_db));
    }

    pub fn set_parameters(&self, frequency: f32, q: f32, gain_db: f32) {
        self.stages
            .iter()
            .for_each(|s| s.set_parameters(frequency, q, gain_db));
    }

    pub fn set_sample_rate(&self, sample_rate: u32) {
        self.stages.iter().for_each(|s| s.set_sample_rate(sample_rate));
    }

    pub fn calc_coefficients(&self) {
        self.stages.iter().for_each(FilterHandle::calc_coefficients);
    }
}
