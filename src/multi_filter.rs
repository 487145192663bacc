//! One filter facade over the whole catalog, switchable while audio is running.
//!
//! Every topology is built up front. A control thread configures the target
//! topology, then publishes its index together with a generation counter in a
//! single atomic store. The audio thread reads that cell, and whenever the
//! generation moved it clears the selected topology before the next sample.

use nih_plug::nih_warn;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::biquad::BiquadCoefficients;
use crate::chain::{FilterChain, FilterChainHandle};
use crate::error::FilterError;
use crate::filter::{Filter, FilterParameters, DEFAULT_SAMPLE_RATE};
use crate::filter_type::{type_catalog, FilterType};
use crate::process::{AudioProcess, FilterControl};

const INDEX_BITS: u32 = 8;
const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;

#[inline]
fn selected_index(selection: u32) -> usize {
    (selection & INDEX_MASK) as usize
}

#[inline]
fn next_selection(current: u32, index: usize) -> u32 {
    let generation = (current >> INDEX_BITS).wrapping_add(1);
    (generation << INDEX_BITS) | (index as u32 & INDEX_MASK)
}

/// A catalog entry: a single biquad stage or a cascade.
#[derive(Debug)]
pub enum Topology {
    Single(Filter),
    Cascade(FilterChain),
}

impl Topology {
    pub fn new(kind: FilterType, sample_rate: u32) -> Self {
        if kind.stage_count() > 1 {
            Topology::Cascade(FilterChain::cascade(kind, sample_rate))
        } else {
            Topology::Single(Filter::with_sample_rate(kind, sample_rate))
        }
    }

    pub fn filter_type(&self) -> FilterType {
        match self {
            Topology::Single(filter) => filter.filter_type(),
            Topology::Cascade(chain) => chain.filter_type(),
        }
    }

    pub fn parameters(&self) -> FilterParameters {
        match self {
            Topology::Single(filter) => filter.parameters(),
            Topology::Cascade(chain) => chain.parameters(),
        }
    }

    pub fn is_cleared(&self) -> bool {
        match self {
            Topology::Single(filter) => filter.is_cleared(),
            Topology::Cascade(chain) => chain.is_cleared(),
        }
    }

    pub fn handle(&self) -> FilterChainHandle {
        match self {
            Topology::Single(filter) => FilterChainHandle::single(filter.handle()),
            Topology::Cascade(chain) => chain.handle(),
        }
    }
}

impl AudioProcess for Topology {
    fn set_sample_rate(&mut self, sample_rate: u32) {
        match self {
            Topology::Single(filter) => filter.set_sample_rate(sample_rate),
            Topology::Cascade(chain) => chain.set_sample_rate(sample_rate),
        }
    }

    #[inline]
    fn process_sample(&mut self, input: f32) -> f32 {
        match self {
            Topology::Single(filter) => filter.process_sample(input),
            Topology::Cascade(chain) => chain.process_sample(input),
        }
    }

    fn process_block(&mut self, block: &mut [f32]) {
        match self {
            Topology::Single(filter) => filter.process_block(block),
            Topology::Cascade(chain) => chain.process_block(block),
        }
    }
}

impl FilterControl for Topology {
    fn set_frequency(&mut self, frequency: f32) {
        match self {
            Topology::Single(filter) => filter.set_frequency(frequency),
            Topology::Cascade(chain) => chain.set_frequency(frequency),
        }
    }

    fn set_q(&mut self, q: f32) {
        match self {
            Topology::Single(filter) => filter.set_q(q),
            Topology::Cascade(chain) => chain.set_q(q),
        }
    }

    fn set_gain(&mut self, gain_db: f32) {
        match self {
            Topology::Single(filter) => filter.set_gain(gain_db),
            Topology::Cascade(chain) => chain.set_gain(gain_db),
        }
    }

    fn set_parameters(&mut self, frequency: f32, q: f32, gain_db: f32) {
        match self {
            Topology::Single(filter) => filter.set_parameters(frequency, q, gain_db),
            Topology::Cascade(chain) => chain.set_parameters(frequency, q, gain_db),
        }
    }

    fn calc_coefficients(&mut self) {
        match self {
            Topology::Single(filter) => filter.calc_coefficients(),
            Topology::Cascade(chain) => chain.calc_coefficients(),
        }
    }

    fn clear(&mut self) {
        match self {
            Topology::Single(filter) => filter.clear(),
            Topology::Cascade(chain) => chain.clear(),
        }
    }

    fn use_q(&self) -> bool {
        self.filter_type().use_q()
    }

    fn use_gain(&self) -> bool {
        self.filter_type().use_gain()
    }
}

#[derive(Debug)]
struct MultiFilterShared {
    /// `generation << INDEX_BITS | catalog index`
    selection: AtomicU32,
    sample_rate: AtomicU32,
    /// Indexed by catalog position.
    slots: Vec<FilterChainHandle>,
}

/// Control-thread side of a [`MultiFilter`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MultiFilterHandle {
    shared: Arc<MultiFilterShared>,
}

impl MultiFilterHandle {
    /// Switches to the named type. Returns `false` and changes nothing when the
    /// name is not in the catalog.
    pub fn set_type(&self, name: &str) -> bool {
        self.try_set_type(name).is_ok()
    }

    pub fn try_set_type(&self, name: &str) -> Result<FilterType, FilterError> {
        match name.parse::<FilterType>() {
            Ok(kind) => {
                self.select(kind);
                Ok(kind)
            }
            Err(err) => {
                nih_warn!("Keeping {} active: {}", self.filter_type(), err);
                Err(err)
            }
        }
    }

    pub fn set_type_index(&self, index: usize) -> Result<FilterType, FilterError> {
        let kind = FilterType::at(index).ok_or(FilterError::IndexOutOfRange(index))?;
        self.select(kind);
        Ok(kind)
    }

    /// Brings `kind` up to the current sample rate, recomputes it and only then
    /// publishes it as the active type.
    pub fn select(&self, kind: FilterType) {
        let slot = &self.shared.slots[kind.index()];
        slot.set_sample_rate(self.shared.sample_rate.load(Ordering::Relaxed));
        slot.calc_coefficients();
        self.publish(kind.index());
    }

    /// Asks the audio side to zero the active topology's state before its next sample.
    pub fn clear(&self) {
        self.publish(selected_index(self.selection()));
    }

    pub fn filter_type(&self) -> FilterType {
        FilterType::at(selected_index(self.selection())).unwrap_or_default()
    }

    pub fn parameters(&self) -> FilterParameters {
        self.active_slot().parameters()
    }

    pub fn coefficients(&self) -> BiquadCoefficients {
        self.active_slot()
            .stages()
            .first()
            .map(|stage| stage.coefficients())
            .unwrap_or_default()
    }

    pub fn sample_rate(&self) -> u32 {
        self.shared.sample_rate.load(Ordering::Relaxed)
    }

    pub fn set_frequency(&self, frequency: f32) {
        self.active_slot().set_frequency(frequency);
    }

    pub fn set_q(&self, q: f32) {
        self.active_slot().set_q(q);
    }

    pub fn set_gain(&self, gain_db: f32) {
        self.active_slot().set_gain(gain_db);
    }

    pub fn set_parameters(&self, frequency: f32, q: f32, gain_db: f32) {
        self.active_slot().set_parameters(frequency, q, gain_db);
    }

    /// Zero is ignored. Inactive types pick the rate up when they get selected.
    pub fn set_sample_rate(&self, sample_rate: u32) {
        if sample_rate > 0 {
            self.shared.sample_rate.store(sample_rate, Ordering::Relaxed);
            self.active_slot().set_sample_rate(sample_rate);
        }
    }

    pub fn calc_coefficients(&self) {
        self.active_slot().calc_coefficients();
    }

    /// Whether the type at catalog `index` responds to Q. `false` outside the catalog.
    pub fn use_q_at(&self, index: usize) -> bool {
        FilterType::at(index).is_some_and(FilterType::use_q)
    }

    /// Whether the type at catalog `index` responds to gain. `false` outside the catalog.
    pub fn use_gain_at(&self, index: usize) -> bool {
        FilterType::at(index).is_some_and(FilterType::use_gain)
    }

    #[inline]
    fn selection(&self) -> u32 {
        self.shared.selection.load(Ordering::Acquire)
    }

    fn active_slot(&self) -> &FilterChainHandle {
        &self.shared.slots[selected_index(self.selection())]
    }

    fn publish(&self, index: usize) {
        // The closure never returns `None`
        let _ = self
            .shared
            .selection
            .fetch_update(Ordering::Release, Ordering::Relaxed, |current| {
                Some(next_selection(current, index))
            });
    }
}

/// Runs whichever catalog type is currently selected.
#[derive(Debug)]
pub struct MultiFilter {
    handle: MultiFilterHandle,
    slots: Vec<Topology>,
    /// Last selection observed by the audio side.
    selection: u32,
    active: usize,
}

impl MultiFilter {
    pub fn new() -> Self {
        Self::with_sample_rate(DEFAULT_SAMPLE_RATE)
    }

    pub fn with_sample_rate(sample_rate: u32) -> Self {
        let sample_rate = sample_rate.max(1);
        let slots: Vec<Topology> = FilterType::ALL
            .iter()
            .map(|&kind| Topology::new(kind, sample_rate))
            .collect();
        let handle = MultiFilterHandle {
            shared: Arc::new(MultiFilterShared {
                selection: AtomicU32::new(0),
                sample_rate: AtomicU32::new(sample_rate),
                slots: slots.iter().map(Topology::handle).collect(),
            }),
        };

        let mut multi = Self {
            handle,
            slots,
            selection: 0,
            active: 0,
        };
        multi.select(FilterType::default());
        multi
    }

    pub fn type_catalog() -> &'static [&'static str] {
        type_catalog()
    }

    /// A handle for switching types and changing parameters from another thread.
    ///
    /// Once a handle is out, let it be the only writer: parameter setters on the
    /// audio side would contend with it for the same coefficient cells.
    pub fn handle(&self) -> MultiFilterHandle {
        self.handle.clone()
    }

    pub fn set_type(&mut self, name: &str) -> bool {
        self.try_set_type(name).is_ok()
    }

    pub fn try_set_type(&mut self, name: &str) -> Result<FilterType, FilterError> {
        let kind = self.handle.try_set_type(name)?;
        self.sync();
        Ok(kind)
    }

    pub fn set_type_index(&mut self, index: usize) -> Result<FilterType, FilterError> {
        let kind = self.handle.set_type_index(index)?;
        self.sync();
        Ok(kind)
    }

    pub fn select(&mut self, kind: FilterType) {
        self.handle.select(kind);
        self.sync();
    }

    pub fn filter_type(&self) -> FilterType {
        self.handle.filter_type()
    }

    pub fn parameters(&self) -> FilterParameters {
        self.handle.parameters()
    }

    pub fn coefficients(&self) -> BiquadCoefficients {
        self.handle.coefficients()
    }

    pub fn sample_rate(&self) -> u32 {
        self.handle.sample_rate()
    }

    pub fn use_q_at(&self, index: usize) -> bool {
        self.handle.use_q_at(index)
    }

    pub fn use_gain_at(&self, index: usize) -> bool {
        self.handle.use_gain_at(index)
    }

    /// The topology the audio side is currently running.
    pub fn active(&self) -> &Topology {
        &self.slots[self.active]
    }

    pub fn is_cleared(&self) -> bool {
        self.active().is_cleared()
    }

    /// Follows the published selection, clearing the topology that just became active.
    #[inline]
    fn sync(&mut self) {
        let selection = self.handle.selection();
        if selection != self.selection {
            self.selection = selection;
            self.active = selected_index(selection);
            self.slots[self.active].clear();
        }
    }
}

impl Default for MultiFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioProcess for MultiFilter {
    fn set_sample_rate(&mut self, sample_rate: u32) {
        self.handle.set_sample_rate(sample_rate);
    }

    #[inline]
    fn process_sample(&mut self, input: f32) -> f32 {
        self.sync();
        self.slots[self.active].process_sample(input)
    }

    fn process_block(&mut self, block: &mut [f32]) {
        self.sync();
        self.slots[self.active].process_block(block);
    }
}

impl FilterControl for MultiFilter {
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
        self.sync();
        self.slots[self.active].clear();
    }

    fn use_q(&self) -> bool {
        self.filter_type().use_q()
    }

    fn use_gain(&self) -> bool {
        self.filter_type().use_gain()
    }
}
