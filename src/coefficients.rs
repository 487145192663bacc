//! Coefficient hand-off between a control thread and the audio thread.
//!
//! The writer bumps a sequence counter to an odd value, stores the seven taps and
//! bumps it back to even. A reader only accepts a snapshot when it saw the same
//! even sequence before and after reading the taps, so it can never observe a mix
//! of two coefficient sets. Readers make a single attempt and never wait on the
//! writer.

use atomic_float::AtomicF32;
use std::hint;
use std::sync::atomic::{fence, AtomicU32, Ordering};

use crate::biquad::BiquadCoefficients;

/// Sequence value that no published snapshot ever carries.
pub const NEVER_SEEN: u32 = u32::MAX;

#[derive(Debug)]
pub struct SharedCoefficients {
    sequence: AtomicU32,
    a0: AtomicF32,
    a1: AtomicF32,
    a2: AtomicF32,
    b1: AtomicF32,
    b2: AtomicF32,
    c0: AtomicF32,
    d0: AtomicF32,
}

impl SharedCoefficients {
    pub fn new(coeffs: BiquadCoefficients) -> Self {
        Self {
            sequence: AtomicU32::new(0),
            a0: AtomicF32::new(coeffs.a0),
            a1: AtomicF32::new(coeffs.a1),
            a2: AtomicF32::new(coeffs.a2),
            b1: AtomicF32::new(coeffs.b1),
            b2: AtomicF32::new(coeffs.b2),
            c0: AtomicF32::new(coeffs.c0),
            d0: AtomicF32::new(coeffs.d0),
        }
    }

    /// Publishes a new coefficient set. Readers are never blocked.
    ///
    /// Concurrent writers are serialised, and a writer spins while another one is
    /// mid-publish. Drive each stage from one thread only and never call this from
    /// the audio thread while a control thread holds a handle to the same stage.
    pub fn publish(&self, coeffs: &BiquadCoefficients) {
        let mut seq = self.sequence.load(Ordering::Relaxed);
        loop {
            if seq & 1 == 1 {
                hint::spin_loop();
                seq = self.sequence.load(Ordering::Relaxed);
                continue;
            }
            match self.sequence.compare_exchange_weak(
                seq,
                seq.wrapping_add(1),
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => seq = current,
            }
        }
        fence(Ordering::Release);

        self.a0.store(coeffs.a0, Ordering::Relaxed);
        self.a1.store(coeffs.a1, Ordering::Relaxed);
        self.a2.store(coeffs.a2, Ordering::Relaxed);
        self.b1.store(coeffs.b1, Ordering::Relaxed);
        self.b2.store(coeffs.b2, Ordering::Relaxed);
        self.c0.store(coeffs.c0, Ordering::Relaxed);
        self.d0.store(coeffs.d0, Ordering::Relaxed);

        self.sequence.store(seq.wrapping_add(2), Ordering::Release);
    }

    /// Current sequence number. Odd while a write is in progress.
    #[inline]
    pub fn version(&self) -> u32 {
        self.sequence.load(Ordering::Acquire)
    }

    /// One read attempt. `None` when a write overlapped the read.
    #[inline]
    pub fn try_load(&self) -> Option<(BiquadCoefficients, u32)> {
        let before = self.sequence.load(Ordering::Acquire);
        if before & 1 == 1 {
            return None;
        }

        let coeffs = BiquadCoefficients {
            a0: self.a0.load(Ordering::Relaxed),
            a1: self.a1.load(Ordering::Relaxed),
            a2: self.a2.load(Ordering::Relaxed),
            b1: self.b1.load(Ordering::Relaxed),
            b2: self.b2.load(Ordering::Relaxed),
            c0: self.c0.load(Ordering::Relaxed),
            d0: self.d0.load(Ordering::Relaxed),
        };

        fence(Ordering::Acquire);
        let after = self.sequence.load(Ordering::Relaxed);
        (before == after).then_some((coeffs, before))
    }

    /// Spins until a consistent snapshot is read. Control-side only.
    pub fn load(&self) -> BiquadCoefficients {
        loop {
            if let Some((coeffs, _)) = self.try_load() {
                return coeffs;
            }
            hint::spin_loop();
        }
    }
}

impl Default for SharedCoefficients {
    fn default() -> Self {
        Self::new(BiquadCoefficients::IDENTITY)
    }
}
