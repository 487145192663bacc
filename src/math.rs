//! Small numeric helpers shared by the filter code.

use nih_plug::prelude::util;

pub const F_PI: f32 = std::f32::consts::PI;
pub const F_2PI: f32 = std::f32::consts::TAU;

/// Reference pitch for MIDI note 69.
pub const BASE_A4: f32 = 440.0;

pub const MIN_FREQUENCY: f32 = 20.0;
pub const MAX_FREQUENCY: f32 = 20_000.0;
pub const MIN_Q: f32 = 0.1;
pub const MAX_Q: f32 = 20.0;

/// Coefficient formulas never see a frequency above this fraction of the sample rate.
pub const NYQUIST_LIMIT: f32 = 0.49;

/// Clamps `val` into `[min, max]`. A NaN input ends up at `max`.
#[inline]
pub fn bound(min: f32, val: f32, max: f32) -> f32 {
    min.max(val.min(max))
}

#[inline]
pub fn fraction(val: f32) -> f32 {
    val - val.trunc()
}

pub fn midi_note_freq(note: i32) -> f32 {
    BASE_A4 * 2.0f32.powf((note as f32 - 69.0) / 12.0)
}

/// Fractional MIDI note number for a frequency, the inverse of [`midi_note_freq`].
pub fn freq_to_midi_note(freq: f32) -> f32 {
    69.0 + 12.0 * (freq / BASE_A4).log2()
}

/// Linear gain factor `mu` for a decibel value.
#[inline]
pub fn db_to_gain(gain_db: f32) -> f32 {
    util::db_to_gain(gain_db)
}

#[inline]
pub fn clamp_frequency(freq: f32) -> f32 {
    bound(MIN_FREQUENCY, freq, MAX_FREQUENCY)
}

#[inline]
pub fn clamp_q(q: f32) -> f32 {
    bound(MIN_Q, q, MAX_Q)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_clamps_both_sides() {
        assert_eq!(bound(20.0, 5.0, 20_000.0), 20.0);
        assert_eq!(bound(20.0, 25_000.0, 20_000.0), 20_000.0);
        assert_eq!(bound(20.0, 440.0, 20_000.0), 440.0);
        assert_eq!(bound(0.1, f32::NAN, 20.0), 20.0);
    }

    #[test]
    fn midi_conversion_round_trips_a4() {
        assert!((midi_note_freq(69) - 440.0).abs() < 1e-4);
        assert!((midi_note_freq(81) - 880.0).abs() < 1e-3);
        assert!((freq_to_midi_note(440.0) - 69.0).abs() < 1e-4);
        assert!((freq_to_midi_note(midi_note_freq(60)) - 60.0).abs() < 1e-3);
    }

    #[test]
    fn fraction_keeps_sign() {
        assert!((fraction(2.25) - 0.25).abs() < 1e-6);
        assert!((fraction(-1.5) + 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_db_is_unity() {
        assert!((db_to_gain(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_gain(20.0) - 10.0).abs() < 1e-4);
    }
}
