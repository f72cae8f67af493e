//! Waveform shapes and phase bookkeeping.
//!
//! Naive (non-band-limited) shapes evaluated at a radian phase. Aliasing is
//! accepted by design; the shapes match their textbook definitions exactly,
//! which keeps amplitude tests bit-predictable.

use core::f64::consts::PI;
use libm::{asin, fmod, sin};

const TWO_PI: f64 = 2.0 * PI;

/// Waveform selector for one oscillator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Waveform {
    /// Pure sine tone.
    #[default]
    Sine,
    /// Square wave, +1 over the positive sine half-period, -1 otherwise.
    Square,
    /// Linear ramp from -1 to +1 across each period.
    Sawtooth,
    /// Triangle wave via the arcsine-of-sine identity.
    Triangle,
}

impl Waveform {
    /// Evaluate the shape at `phase` radians. Output lies in [-1, 1].
    #[inline]
    pub fn sample(self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => sin(phase),
            Waveform::Square => {
                if sin(phase) >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => fmod(phase, TWO_PI) / PI - 1.0,
            Waveform::Triangle => (2.0 / PI) * asin(sin(phase)),
        }
    }

    /// Stable numeric tag, used by preset files.
    pub fn index(self) -> u8 {
        match self {
            Waveform::Sine => 0,
            Waveform::Square => 1,
            Waveform::Sawtooth => 2,
            Waveform::Triangle => 3,
        }
    }

    /// Inverse of [`Waveform::index`]. Returns `None` for unassigned tags.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Waveform::Sine),
            1 => Some(Waveform::Square),
            2 => Some(Waveform::Sawtooth),
            3 => Some(Waveform::Triangle),
            _ => None,
        }
    }

    /// Human-readable shape name.
    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Square => "Square",
            Waveform::Sawtooth => "Sawtooth",
            Waveform::Triangle => "Triangle",
        }
    }
}

/// Advance a radian phase by one sample period and wrap it into [0, 2π).
///
/// The wrap also recovers from negative phases, which a (transient) negative
/// frequency edit would otherwise accumulate.
#[inline]
pub fn advance_phase(phase: f64, frequency: f64, sample_rate: f64) -> f64 {
    let advanced = phase + TWO_PI * frequency / sample_rate;
    let wrapped = fmod(advanced, TWO_PI);
    let wrapped = if wrapped < 0.0 { wrapped + TWO_PI } else { wrapped };
    // Adding the period to a sub-ulp negative remainder can round to exactly 2π
    if wrapped >= TWO_PI { wrapped - TWO_PI } else { wrapped }
}
