//! Scalar and small vector primitives shared by every branch of the record.
//!
//! Everything here has a defined "empty" value so a default-constructed
//! record is well-formed and serializable before any mapper has touched it.

use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// Version tag stamped on every output record and on the run summary.
///
/// Bump when the serialized layout of [`crate::record::StandardRecord`]
/// changes incompatibly.
pub const SCHEMA_VERSION: u32 = 1;

/// Spatial point or displacement \[cm\].
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Vector3 {
    /// x component.
    pub x: f32,
    /// y component.
    pub y: f32,
    /// z component.
    pub z: f32,
}

impl Vector3 {
    /// Construct from components.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Four-momentum \[GeV\].
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LorentzVector {
    /// Momentum x component.
    pub px: f32,
    /// Momentum y component.
    pub py: f32,
    /// Momentum z component.
    pub pz: f32,
    /// Energy.
    pub e: f32,
}

impl LorentzVector {
    /// Construct from components.
    #[inline]
    #[must_use]
    pub const fn new(px: f32, py: f32, pz: f32, e: f32) -> Self {
        Self { px, py, pz, e }
    }

    /// Magnitude of the spatial part.
    #[inline]
    #[must_use]
    pub fn p_mag(&self) -> f32 {
        self.px
            .mul_add(self.px, self.py.mul_add(self.py, self.pz * self.pz))
            .sqrt()
    }

    /// Spatial part as a [`Vector3`].
    #[inline]
    #[must_use]
    pub const fn vect(&self) -> Vector3 {
        Vector3::new(self.px, self.py, self.pz)
    }
}

impl Sub for LorentzVector {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.px - rhs.px,
            self.py - rhs.py,
            self.pz - rhs.pz,
            self.e - rhs.e,
        )
    }
}

/// Event generator that produced a true interaction.
///
/// A closed mapping with an explicit default: anything the output format
/// does not model decodes (and maps) to [`Generator::Unknown`] rather than
/// failing.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    /// GENIE.
    Genie,
    /// GiBUU.
    Gibuu,
    /// NEUT.
    Neut,
    /// Catch-all for generators the format does not model.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Creation/destruction process tag for a true particle.
///
/// Generator-level particles start as [`ParticleProcess::Primary`]; the end
/// process is unknown until detector simulation information is folded in.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParticleProcess {
    /// Produced directly by the event generator.
    Primary,
    /// Not determined.
    #[default]
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lorentz_subtraction_and_magnitude() {
        let nu = LorentzVector::new(0.0, 0.0, 2.0, 2.0);
        let lep = LorentzVector::new(0.3, 0.0, 1.1, 1.2);
        let q = nu - lep;
        assert!((q.e - 0.8).abs() < 1e-6);
        let expect = (0.3f32 * 0.3 + 0.9 * 0.9).sqrt();
        assert!((q.p_mag() - expect).abs() < 1e-6);
    }

    #[test]
    fn generator_default_is_unknown() {
        assert_eq!(Generator::default(), Generator::Unknown);
    }
}
