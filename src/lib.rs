//! A real-time multi-mode filter: eleven biquad-based responses behind one
//! switchable processor, plus the plugin wrapper that drives it per channel.
//!
//! Control threads talk to a running filter through its handle
//! ([`MultiFilter::handle`]). Parameter changes publish fresh coefficients that
//! the audio thread picks up without waiting, and a type switch clears the newly
//! selected topology before it renders.

use nih_plug::prelude::*;

pub mod bank;
pub mod biquad;
pub mod chain;
pub mod coefficients;
pub mod error;
pub mod filter;
pub mod filter_type;
pub mod math;
pub mod multi_filter;
pub mod params;
pub mod process;
pub mod processor;

pub use bank::{FilterBank, FilterSettings};
pub use self::biquad::{BiQuad, BiquadCoefficients, FirstOrderFeedBackFilter};
pub use chain::{FilterChain, FilterChainHandle};
pub use error::FilterError;
pub use filter::{Filter, FilterHandle, FilterParameters};
pub use filter_type::FilterType;
pub use multi_filter::{MultiFilter, MultiFilterHandle, Topology};
pub use params::MultiFilterParams;
pub use process::{AudioProcess, FilterControl};
pub use processor::MultiFilterPlugin;

nih_export_clap!(MultiFilterPlugin);
nih_export_vst3!(MultiFilterPlugin);
