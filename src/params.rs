use nih_plug::prelude::*;

use crate::bank::FilterSettings;
use crate::filter::FilterParameters;
use crate::filter_type::FilterType;
use crate::math::{MAX_FREQUENCY, MAX_Q, MIN_FREQUENCY, MIN_Q};

#[derive(Params)]
pub struct MultiFilterParams {
    #[id = "cutoff"]
    pub cutoff: FloatParam,
    #[id = "res"]
    pub resonance: FloatParam,
    #[id = "type"]
    pub filter_type: EnumParam<FilterType>,
    #[id = "gain"]
    pub gain: FloatParam,
}

impl MultiFilterParams {
    /// Current values as one settings snapshot.
    pub fn settings(&self) -> FilterSettings {
        FilterSettings {
            filter_type: self.filter_type.value(),
            parameters: FilterParameters::new(
                self.cutoff.value(),
                self.resonance.value(),
                self.gain.value(),
            ),
        }
    }
}

impl Default for MultiFilterParams {
    fn default() -> Self {
        Self {
            cutoff: FloatParam::new(
                "Cutoff",
                MAX_FREQUENCY,
                FloatRange::Skewed {
                    min: MIN_FREQUENCY,
                    max: MAX_FREQUENCY,
                    factor: FloatRange::skew_factor(-2.0),
                },
            )
            .with_value_to_string(formatters::v2s_f32_hz_then_khz(1))
            .with_string_to_value(formatters::s2v_f32_hz_then_khz()),

            resonance: FloatParam::new(
                "Resonance",
                0.707,
                FloatRange::Skewed {
                    min: MIN_Q,
                    max: MAX_Q,
                    factor: FloatRange::skew_factor(-1.5),
                },
            )
            .with_value_to_string(formatters::v2s_f32_rounded(3)),

            filter_type: EnumParam::new("Filter Type", FilterType::Lp6),

            gain: FloatParam::new(
                "Gain",
                0.0,
                FloatRange::Linear {
                    min: -30.0,
                    max: 30.0,
                },
            )
            .with_unit(" dB")
            .with_value_to_string(formatters::v2s_f32_rounded(2)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_open_the_filter() {
        let params = MultiFilterParams::default();
        let settings = params.settings();
        assert_eq!(settings.filter_type, FilterType::Lp6);
        assert_eq!(settings.parameters.frequency, MAX_FREQUENCY);
        assert!((settings.parameters.q - 0.707).abs() < 1e-6);
        assert_eq!(settings.parameters.gain_db, 0.0);
    }
}
