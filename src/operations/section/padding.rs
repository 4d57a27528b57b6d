use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::Aabb;
use crate::math::Vector3;

/// How padding is distributed across the three axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddingMode {
    /// One padding value, derived from the largest dimension, on every axis.
    #[default]
    Uniform,
    /// Each axis padded in proportion to its own extent.
    PerAxis,
}

/// Padding applied around a clash before it is turned into a section box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddingPolicy {
    /// Fraction of the box extent added on each side.
    pub factor: f64,
    /// Floor for the padding, in world units.
    pub min_padding: f64,
    pub distribution: PaddingMode,
}

impl Default for PaddingPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl PaddingPolicy {
    /// Close cut around the clash.
    #[must_use]
    pub fn tight() -> Self {
        Self {
            factor: 0.3,
            min_padding: 0.5,
            distribution: PaddingMode::Uniform,
        }
    }

    #[must_use]
    pub fn standard() -> Self {
        Self {
            factor: 0.5,
            min_padding: 0.5,
            distribution: PaddingMode::Uniform,
        }
    }

    /// Padding per axis for `bounds`. Empty boxes get the floor.
    #[must_use]
    pub fn padding_for(&self, bounds: &Aabb) -> Vector3 {
        let size = bounds.size();
        match self.distribution {
            PaddingMode::Uniform => {
                Vector3::repeat((size.max() * self.factor).max(self.min_padding))
            }
            PaddingMode::PerAxis => size.map(|d| (d * self.factor).max(self.min_padding)),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the floor is not strictly positive or the factor
    /// is negative or non-finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_padding.is_finite() && self.min_padding > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "section min_padding must be positive, got {}",
                self.min_padding
            )));
        }
        if !(self.factor.is_finite() && self.factor >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "section padding factor must be non-negative, got {}",
                self.factor
            )));
        }
        Ok(())
    }
}
