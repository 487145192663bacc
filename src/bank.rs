//! One [`MultiFilter`] per audio channel, all driven by the same settings.

use nih_plug::nih_debug_assert;

use crate::filter::{FilterParameters, DEFAULT_SAMPLE_RATE};
use crate::filter_type::FilterType;
use crate::multi_filter::MultiFilter;
use crate::process::{AudioProcess, FilterControl};

/// Everything the host controls.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterSettings {
    pub filter_type: FilterType,
    pub parameters: FilterParameters,
}

#[derive(Debug)]
pub struct FilterBank {
    channels: Vec<MultiFilter>,
    sample_rate: u32,
    /// Last settings pushed to the channels.
    settings: Option<FilterSettings>,
}

impl FilterBank {
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            settings: None,
        }
    }

    /// Rebuilds the per-channel filters. Allocates, so never call this from the
    /// audio thread.
    pub fn prepare(&mut self, channel_count: usize, sample_rate: u32, settings: FilterSettings) {
        self.sample_rate = sample_rate.max(1);
        self.channels.clear();
        self.channels
            .extend((0..channel_count).map(|_| MultiFilter::with_sample_rate(self.sample_rate)));
        self.settings = None;
        self.apply(settings);
    }

    /// Pushes changed settings to every channel. A type change selects the new
    /// type on each channel first, which also clears its state.
    pub fn apply(&mut self, settings: FilterSettings) {
        let previous = self.settings.replace(settings);
        if previous == Some(settings) {
            return;
        }

        let type_changed = previous.map_or(true, |p| p.filter_type != settings.filter_type);
        let FilterParameters {
            frequency,
            q,
            gain_db,
        } = settings.parameters;

        for channel in self.channels.iter_mut() {
            if type_changed {
                channel.select(settings.filter_type);
            }
            channel.set_parameters(frequency, q, gain_db);
        }
    }

    /// Filters `block` in place. Channels without a filter are left untouched.
    pub fn process_channel(&mut self, channel: usize, block: &mut [f32]) {
        nih_debug_assert!(
            channel < self.channels.len(),
            "channel {} was not prepared",
            channel
        );
        if let Some(filter) = self.channels.get_mut(channel) {
            filter.process_block(block);
        }
    }

    /// Zeroes every channel's state, e.g. after a transport jump.
    pub fn clear(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.clear();
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, index: usize) -> Option<&MultiFilter> {
        self.channels.get(index)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn settings(&self) -> Option<FilterSettings> {
        self.settings
    }

    pub fn use_q(&self, index: usize) -> bool {
        FilterType::at(index).is_some_and(FilterType::use_q)
    }

    pub fn use_gain(&self, index: usize) -> bool {
        FilterType::at(index).is_some_and(FilterType::use_gain)
    }
}

impl Default for FilterBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(filter_type: FilterType, frequency: f32, q: f32, gain_db: f32) -> FilterSettings {
        FilterSettings {
            filter_type,
            parameters: FilterParameters::new(frequency, q, gain_db),
        }
    }

    #[test]
    fn prepare_sizes_one_filter_per_channel() {
        let mut bank = FilterBank::new();
        bank.prepare(2, 48_000, settings(FilterType::Hp12, 200.0, 0.707, 0.0));

        assert_eq!(bank.channel_count(), 2);
        for index in 0..2 {
            let channel = bank.channel(index).unwrap();
            assert_eq!(channel.filter_type(), FilterType::Hp12);
            assert_eq!(channel.sample_rate(), 48_000);
            assert_eq!(channel.parameters().frequency, 200.0);
        }

        bank.prepare(1, 44_100, FilterSettings::default());
        assert_eq!(bank.channel_count(), 1);
    }

    #[test]
    fn channels_keep_independent_state() {
        let mut bank = FilterBank::new();
        bank.prepare(2, 44_100, settings(FilterType::Lp12, 1_000.0, 0.707, 0.0));

        let mut left = [1.0, 0.0, 0.0, 0.0];
        let mut right = [0.0; 4];
        bank.process_channel(0, &mut left);
        bank.process_channel(1, &mut right);

        assert!(left.iter().any(|&x| x != 0.0));
        assert_eq!(right, [0.0; 4]);
        assert!(!bank.channel(0).unwrap().is_cleared());
        assert!(bank.channel(1).unwrap().is_cleared());
    }

    #[test]
    fn type_change_clears_every_channel() {
        let mut bank = FilterBank::new();
        bank.prepare(2, 44_100, settings(FilterType::Lp12, 1_000.0, 0.707, 0.0));
        let mut block = [0.5; 8];
        bank.process_channel(0, &mut block);
        bank.process_channel(1, &mut block);

        bank.apply(settings(FilterType::Peak, 1_000.0, 1.0, 6.0));
        for index in 0..2 {
            let channel = bank.channel(index).unwrap();
            assert_eq!(channel.filter_type(), FilterType::Peak);
            assert!(channel.is_cleared());
            assert_eq!(channel.parameters().gain_db, 6.0);
        }
    }

    #[test]
    fn parameter_change_keeps_state() {
        let mut bank = FilterBank::new();
        bank.prepare(1, 44_100, settings(FilterType::Lp12, 1_000.0, 0.707, 0.0));
        let mut block = [0.5; 8];
        bank.process_channel(0, &mut block);

        bank.apply(settings(FilterType::Lp12, 2_000.0, 0.707, 0.0));
        let channel = bank.channel(0).unwrap();
        assert!(!channel.is_cleared());
        assert_eq!(channel.parameters().frequency, 2_000.0);
    }

    #[test]
    fn unprepared_channel_is_passed_through() {
        let mut bank = FilterBank::new();
        bank.prepare(1, 44_100, settings(FilterType::Hp12, 5_000.0, 0.707, 0.0));
        let mut block = [0.25, -0.25, 0.5];
        bank.process_channel(3, &mut block);
        assert_eq!(block, [0.25, -0.25, 0.5]);
    }

    #[test]
    fn clear_resets_all_channels() {
        let mut bank = FilterBank::new();
        bank.prepare(2, 44_100, settings(FilterType::Bp12, 1_000.0, 2.0, 0.0));
        let mut block = [1.0, 0.5, 0.25];
        bank.process_channel(0, &mut block);
        bank.clear();
        assert!(bank.channel(0).unwrap().is_cleared());
        assert!(bank.channel(1).unwrap().is_cleared());
    }

    #[test]
    fn capability_queries_use_catalog_indices() {
        let bank = FilterBank::new();
        assert!(!bank.use_q(FilterType::Lp6.index()));
        assert!(bank.use_q(FilterType::Bs12.index()));
        assert!(bank.use_gain(FilterType::HighShelf.index()));
        assert!(!bank.use_gain(99));
    }
}
