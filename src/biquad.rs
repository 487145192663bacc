/// Coefficient set for [`BiQuad`].
///
/// `a*` are the feed-forward taps, `b*` the feedback taps (normalised so the
/// leading feedback term is 1). `c0` scales the filtered signal and `d0` mixes
/// in the dry input, which lets shelves and peaks reuse the same kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub a0: f32,
    pub a1: f32,
    pub a2: f32,
    pub b1: f32,
    pub b2: f32,
    pub c0: f32,
    pub d0: f32,
}

impl BiquadCoefficients {
    /// Passes the input through unchanged.
    pub const IDENTITY: Self = Self {
        a0: 1.0,
        a1: 0.0,
        a2: 0.0,
        b1: 0.0,
        b2: 0.0,
        c0: 1.0,
        d0: 0.0,
    };

    /// Linear magnitude of `c0 * H(z) + d0` at `freq`.
    pub fn magnitude(&self, freq: f32, sample_rate: u32) -> f32 {
        let w = std::f64::consts::TAU * freq as f64 / sample_rate.max(1) as f64;
        let (sin1, cos1) = w.sin_cos();
        let (sin2, cos2) = (2.0 * w).sin_cos();

        let num_re = self.a0 as f64 + self.a1 as f64 * cos1 + self.a2 as f64 * cos2;
        let num_im = -(self.a1 as f64 * sin1 + self.a2 as f64 * sin2);
        let den_re = 1.0 + self.b1 as f64 * cos1 + self.b2 as f64 * cos2;
        let den_im = -(self.b1 as f64 * sin1 + self.b2 as f64 * sin2);

        let den_norm = den_re * den_re + den_im * den_im;
        if den_norm == 0.0 {
            return f32::INFINITY;
        }
        let h_re = (num_re * den_re + num_im * den_im) / den_norm;
        let h_im = (num_im * den_re - num_re * den_im) / den_norm;

        let out_re = self.c0 as f64 * h_re + self.d0 as f64;
        let out_im = self.c0 as f64 * h_im;
        out_re.hypot(out_im) as f32
    }

    pub fn magnitude_db(&self, freq: f32, sample_rate: u32) -> f32 {
        20.0 * self.magnitude(freq, sample_rate).log10()
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The `biquad` crate names feed-forward taps `b*` and feedback taps `a*`.
impl From<biquad::Coefficients<f32>> for BiquadCoefficients {
    fn from(coeffs: biquad::Coefficients<f32>) -> Self {
        Self {
            a0: coeffs.b0,
            a1: coeffs.b1,
            a2: coeffs.b2,
            b1: coeffs.a1,
            b2: coeffs.a2,
            c0: 1.0,
            d0: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BiQuad {
    coeffs: BiquadCoefficients,
    z1: f32,
    z2: f32,
}

impl BiQuad {
    pub fn new() -> Self {
        Self::with_coefficients(BiquadCoefficients::IDENTITY)
    }

    pub fn with_coefficients(coeffs: BiquadCoefficients) -> Self {
        Self {
            coeffs,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Leaves the delay lines alone, call [`BiQuad::clear`] on discontinuous changes.
    #[inline]
    pub fn set_coefficients(&mut self, coeffs: BiquadCoefficients) {
        self.coeffs = coeffs;
    }

    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coeffs
    }

    #[inline]
    pub fn clear(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }

    pub fn is_cleared(&self) -> bool {
        self.z1 == 0.0 && self.z2 == 0.0
    }

    #[inline]
    pub fn tick(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        // Transposed direct form II
        let mut out = self.z1 + c.a0 * input;
        // Denormals, NaN and inf never reach the feedback path
        if !out.is_normal() {
            out = 0.0;
        }
        self.z1 = c.a1 * input + self.z2 - c.b1 * out;
        self.z2 = c.a2 * input - c.b2 * out;
        out * c.c0 + input * c.d0
    }
}

impl Default for BiQuad {
    fn default() -> Self {
        Self::new()
    }
}

/// One-pole feedback section: `y = a0 * x - b1 * y[n-1]`.
///
/// A standalone kernel for smoothing and tone controls. The catalog's LP6/HP6
/// run on [`BiQuad`] with `a2 = b2 = 0` instead.
#[derive(Debug, Clone, Copy)]
pub struct FirstOrderFeedBackFilter {
    a0: f32,
    b1: f32,
    z1: f32,
}

impl FirstOrderFeedBackFilter {
    pub fn new() -> Self {
        Self {
            a0: 0.5,
            b1: -0.5,
            z1: 0.0,
        }
    }

    /// 6 dB/octave low-pass with unity gain at DC.
    pub fn lowpass(freq: f32, sample_rate: u32) -> Self {
        let theta = crate::math::F_2PI * freq / sample_rate.max(1) as f32;
        let gamma = 2.0 - theta.cos();
        let b1 = (gamma * gamma - 1.0).sqrt() - gamma;

        let mut filter = Self::new();
        filter.set_coefficients(1.0 + b1, b1);
        filter
    }

    #[inline]
    pub fn set_coefficients(&mut self, a0: f32, b1: f32) {
        self.a0 = a0;
        self.b1 = b1;
    }

    #[inline]
    pub fn clear(&mut self) {
        self.z1 = 0.0;
    }

    pub fn is_cleared(&self) -> bool {
        self.z1 == 0.0
    }

    #[inline]
    pub fn tick(&mut self, input: f32) -> f32 {
        let mut out = self.a0 * input - self.b1 * self.z1;
        if !out.is_normal() {
            out = 0.0;
        }
        self.z1 = out;
        out
    }
}

impl Default for FirstOrderFeedBackFilter {
    fn default() -> Self {
        Self::new()
    }
}
