//! The fixed catalog of filter topologies and their coefficient formulas.
//!
//! Variant order is the catalog order and therefore the index persisted by hosts.

use nih_plug::prelude::Enum;
use std::fmt;
use std::str::FromStr;

use crate::biquad::BiquadCoefficients;
use crate::error::FilterError;
use crate::filter::FilterParameters;
use crate::math::{db_to_gain, F_2PI, F_PI, NYQUIST_LIMIT};

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterType {
    #[id = "lp6"]
    #[name = "LP6"]
    Lp6,
    #[id = "lp12"]
    #[name = "LP12"]
    Lp12,
    #[id = "lp24"]
    #[name = "LP24"]
    Lp24,
    #[id = "hp6"]
    #[name = "HP6"]
    Hp6,
    #[id = "hp12"]
    #[name = "HP12"]
    Hp12,
    #[id = "hp24"]
    #[name = "HP24"]
    Hp24,
    #[id = "low_shelf"]
    #[name = "Low Shelf"]
    LowShelf,
    #[id = "high_shelf"]
    #[name = "High Shelf"]
    HighShelf,
    #[id = "peak"]
    #[name = "Peak"]
    Peak,
    #[id = "bp12"]
    #[name = "BP12"]
    Bp12,
    #[id = "bs12"]
    #[name = "BS12"]
    Bs12,
}

pub const TYPE_COUNT: usize = 11;

const TYPE_NAMES: [&str; TYPE_COUNT] = [
    "LP6",
    "LP12",
    "LP24",
    "HP6",
    "HP12",
    "HP24",
    "Low Shelf",
    "High Shelf",
    "Peak",
    "BP12",
    "BS12",
];

/// Ordered display names of every topology.
pub fn type_catalog() -> &'static [&'static str] {
    &TYPE_NAMES
}

impl FilterType {
    pub const ALL: [FilterType; TYPE_COUNT] = [
        FilterType::Lp6,
        FilterType::Lp12,
        FilterType::Lp24,
        FilterType::Hp6,
        FilterType::Hp12,
        FilterType::Hp24,
        FilterType::LowShelf,
        FilterType::HighShelf,
        FilterType::Peak,
        FilterType::Bp12,
        FilterType::Bs12,
    ];

    /// Catalog index.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn at(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        TYPE_NAMES[self.index()]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        TYPE_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .and_then(Self::at)
    }

    pub fn use_q(self) -> bool {
        match self {
            FilterType::Lp6 | FilterType::Hp6 => false,
            FilterType::Lp12
            | FilterType::Hp12
            | FilterType::Bp12
            | FilterType::Bs12
            | FilterType::Lp24
            | FilterType::Hp24 => true,
            FilterType::Peak => true,
            FilterType::LowShelf | FilterType::HighShelf => false,
        }
    }

    pub fn use_gain(self) -> bool {
        matches!(
            self,
            FilterType::Peak | FilterType::LowShelf | FilterType::HighShelf
        )
    }

    /// Number of 12 dB stages cascaded for this type.
    pub fn stage_count(self) -> usize {
        match self {
            FilterType::Lp24 | FilterType::Hp24 => 2,
            _ => 1,
        }
    }

    /// The topology each stage of a cascade runs.
    pub fn stage_type(self) -> Self {
        match self {
            FilterType::Lp24 => FilterType::Lp12,
            FilterType::Hp24 => FilterType::Hp12,
            other => other,
        }
    }

    /// Derives the coefficients for one stage of this topology.
    ///
    /// The frequency is kept below Nyquist so the trigonometric forms stay on
    /// their principal branch at low sample rates.
    pub fn coefficients(self, params: &FilterParameters, sample_rate: u32) -> BiquadCoefficients {
        let sample_rate = sample_rate.max(1) as f32;
        let freq = params.frequency.min(NYQUIST_LIMIT * sample_rate);
        let theta = F_2PI * freq / sample_rate;

        match self {
            FilterType::Lp6 => first_order_pass(theta, false),
            FilterType::Hp6 => first_order_pass(theta, true),
            FilterType::Lp12 | FilterType::Lp24 => second_order_pass(theta, params.q, false),
            FilterType::Hp12 | FilterType::Hp24 => second_order_pass(theta, params.q, true),
            FilterType::Bp12 => band(freq, sample_rate, params.q, false),
            FilterType::Bs12 => band(freq, sample_rate, params.q, true),
            FilterType::Peak => peak(theta, params.q, params.gain_db),
            FilterType::LowShelf => shelf(theta, params.gain_db, false),
            FilterType::HighShelf => shelf(theta, params.gain_db, true),
        }
    }
}

fn first_order_pass(theta: f32, high: bool) -> BiquadCoefficients {
    let gamma = theta.cos() / (1.0 + theta.sin());
    let (a0, a1) = if high {
        ((1.0 + gamma) / 2.0, -(1.0 + gamma) / 2.0)
    } else {
        ((1.0 - gamma) / 2.0, (1.0 - gamma) / 2.0)
    };

    BiquadCoefficients {
        a0,
        a1,
        a2: 0.0,
        b1: -gamma,
        b2: 0.0,
        c0: 1.0,
        d0: 0.0,
    }
}

fn second_order_pass(theta: f32, q: f32, high: bool) -> BiquadCoefficients {
    let d = 1.0 / q;
    let half_d_sin = 0.5 * d * theta.sin();
    let beta = 0.5 * (1.0 - half_d_sin) / (1.0 + half_d_sin);
    let gamma = (0.5 + beta) * theta.cos();

    let (a0, a1) = if high {
        let sum = 0.5 + beta + gamma;
        (sum / 2.0, -sum)
    } else {
        let sum = 0.5 + beta - gamma;
        (sum / 2.0, sum)
    };

    BiquadCoefficients {
        a0,
        a1,
        a2: a0,
        b1: -2.0 * gamma,
        b2: 2.0 * beta,
        c0: 1.0,
        d0: 0.0,
    }
}

fn band(freq: f32, sample_rate: f32, q: f32, stop: bool) -> BiquadCoefficients {
    let k = (F_PI * freq / sample_rate).tan();
    let k2 = k * k;
    let delta = k2 * q + k + q;
    let b1 = 2.0 * q * (k2 - 1.0) / delta;
    let b2 = (k2 * q - k + q) / delta;

    let (a0, a1, a2) = if stop {
        let a0 = q * (k2 + 1.0) / delta;
        (a0, b1, a0)
    } else {
        (k / delta, 0.0, -k / delta)
    };

    BiquadCoefficients {
        a0,
        a1,
        a2,
        b1,
        b2,
        c0: 1.0,
        d0: 0.0,
    }
}

fn peak(theta: f32, q: f32, gain_db: f32) -> BiquadCoefficients {
    let q = q.max(1.0);
    let mu = db_to_gain(gain_db);
    let zeta = 4.0 / (1.0 + mu);
    let t = zeta * (theta / (2.0 * q)).tan();
    let beta = 0.5 * (1.0 - t) / (1.0 + t);
    let gamma = (0.5 + beta) * theta.cos();

    BiquadCoefficients {
        a0: 0.5 - beta,
        a1: 0.0,
        a2: -(0.5 - beta),
        b1: -2.0 * gamma,
        b2: 2.0 * beta,
        c0: mu - 1.0,
        d0: 1.0,
    }
}

fn shelf(theta: f32, gain_db: f32, high: bool) -> BiquadCoefficients {
    let mu = db_to_gain(gain_db);
    let beta = if high { (1.0 + mu) / 4.0 } else { 4.0 / (1.0 + mu) };
    let delta = beta * (theta / 2.0).tan();
    let gamma = (1.0 - delta) / (1.0 + delta);

    let (a0, a1) = if high {
        ((1.0 + gamma) / 2.0, -(1.0 + gamma) / 2.0)
    } else {
        ((1.0 - gamma) / 2.0, (1.0 - gamma) / 2.0)
    };

    BiquadCoefficients {
        a0,
        a1,
        a2: 0.0,
        b1: -gamma,
        b2: 0.0,
        c0: mu - 1.0,
        d0: 1.0,
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterType {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| FilterError::UnknownType(s.to_owned()))
    }
}

impl Default for FilterType {
    fn default() -> Self {
        FilterType::Lp6
    }
}
