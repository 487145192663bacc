//! Processing contracts shared by every filter in the crate.

/// A single channel of audio processing.
pub trait AudioProcess {
    /// Zero is ignored, the previous rate stays in effect.
    fn set_sample_rate(&mut self, sample_rate: u32);

    fn process_sample(&mut self, input: f32) -> f32;

    /// Processes `block` in place.
    fn process_block(&mut self, block: &mut [f32]) {
        for sample in block.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}

/// Musical parameters on top of [`AudioProcess`].
///
/// Setters clamp frequency to 20 Hz..20 kHz and Q to 0.1..20, then recompute the
/// coefficients. Gain is stored as given.
pub trait FilterControl: AudioProcess {
    fn set_frequency(&mut self, frequency: f32);
    fn set_q(&mut self, q: f32);
    fn set_gain(&mut self, gain_db: f32);
    fn set_parameters(&mut self, frequency: f32, q: f32, gain_db: f32);
    fn calc_coefficients(&mut self);
    /// Zeroes the delay lines.
    fn clear(&mut self);
    fn use_q(&self) -> bool;
    fn use_gain(&self) -> bool;
}
