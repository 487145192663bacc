use nih_plug::prelude::*;
use std::sync::Arc;

use crate::bank::FilterBank;
use crate::filter::DEFAULT_SAMPLE_RATE;
use crate::params::MultiFilterParams;

pub struct MultiFilterPlugin {
    // ホストと共有するパラメーター
    params: Arc<MultiFilterParams>,

    // チャンネルごとのフィルター
    bank: FilterBank,
}

impl MultiFilterPlugin {
    pub fn bank(&self) -> &FilterBank {
        &self.bank
    }
}

impl Default for MultiFilterPlugin {
    fn default() -> Self {
        // 実際のチャンネル数は `initialize` で決まる
        Self {
            params: Arc::new(MultiFilterParams::default()),
            bank: FilterBank::new(),
        }
    }
}

impl Plugin for MultiFilterPlugin {
    const NAME: &'static str = "Multi Filter";
    const VENDOR: &'static str = "Kakeru3";
    const URL: &'static str = "";
    const EMAIL: &'static str = "";

    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            ..AudioIOLayout::const_default()
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            ..AudioIOLayout::const_default()
        },
    ];

    const SAMPLE_ACCURATE_AUTOMATION: bool = true;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let channels = audio_io_layout
            .main_output_channels
            .map(NonZeroU32::get)
            .unwrap_or(0) as usize;

        let sample_rate = match buffer_config.sample_rate.round() as u32 {
            0 => {
                nih_warn!(
                    "Host reported a sample rate of {}, falling back to {} Hz",
                    buffer_config.sample_rate,
                    DEFAULT_SAMPLE_RATE
                );
                DEFAULT_SAMPLE_RATE
            }
            rate => rate,
        };

        // チャンネル数に合わせてフィルターを(再)構築
        self.bank.prepare(channels, sample_rate, self.params.settings());
        nih_log!("Prepared {} filter channel(s) at {} Hz", channels, sample_rate);

        true
    }

    fn reset(&mut self) {
        self.bank.clear();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        // パラメーターはブロック単位で反映する
        self.bank.apply(self.params.settings());

        for (channel, samples) in buffer.as_slice().iter_mut().enumerate() {
            self.bank.process_channel(channel, samples);
        }

        ProcessStatus::Normal
    }
}

impl ClapPlugin for MultiFilterPlugin {
    const CLAP_ID: &'static str = "com.kakeru3.multi-filter";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("Multi-mode filter with eleven switchable responses");
    const CLAP_MANUAL_URL: Option<&'static str> = Some(Self::URL);
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Filter,
        ClapFeature::Stereo,
        ClapFeature::Mono,
    ];
}

impl Vst3Plugin for MultiFilterPlugin {
    const VST3_CLASS_ID: [u8; 16] = *b"MultiFilterKak3A";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Filter];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unprepared() {
        let plugin = MultiFilterPlugin::default();
        assert_eq!(plugin.bank().channel_count(), 0);
        assert_eq!(plugin.bank().settings(), None);
    }

    #[test]
    fn layouts_cover_mono_and_stereo() {
        let outputs: Vec<u32> = MultiFilterPlugin::AUDIO_IO_LAYOUTS
            .iter()
            .filter_map(|layout| layout.main_output_channels.map(NonZeroU32::get))
            .collect();
        assert_eq!(outputs, vec![2, 1]);
    }
}
