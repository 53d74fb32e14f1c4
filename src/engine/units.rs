use serde::{Deserialize, Serialize};

use crate::error::DccError;
use crate::types::RenderedElement;
use crate::Result;

/// Reconciles rendered device pixels with design units.
///
/// Rendered geometry is divided by `device_pixel_ratio` before matching and
/// diffing, so a 2x capture of a 120-unit button measures 120 again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitScale {
    pub device_pixel_ratio: f64,
}

impl Default for UnitScale {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
        }
    }
}

impl UnitScale {
    pub fn new(device_pixel_ratio: f64) -> Result<Self> {
        let scale = Self { device_pixel_ratio };
        scale.validate()?;
        Ok(scale)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.device_pixel_ratio.is_finite() || self.device_pixel_ratio <= 0.0 {
            return Err(DccError::Config(format!(
                "device_pixel_ratio must be a positive number, got {}",
                self.device_pixel_ratio
            )));
        }
        Ok(())
    }

    pub fn is_identity(&self) -> bool {
        self.device_pixel_ratio == 1.0
    }

    /// Element with geometry expressed in design units.
    pub fn normalize(&self, element: &RenderedElement) -> RenderedElement {
        let mut normalized = element.clone();
        if !self.is_identity() {
            normalized.geometry = element.geometry.scaled(1.0 / self.device_pixel_ratio);
        }
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Geometry;

    #[test]
    fn identity_scale_leaves_geometry_untouched() {
        let el = RenderedElement::new("a", "a.link", Geometry::new(3.0, 4.0, 120.0, 40.0));
        assert_eq!(UnitScale::default().normalize(&el), el);
    }

    #[test]
    fn ratio_two_halves_geometry() {
        let el = RenderedElement::new("a", "a.link", Geometry::new(20.0, 10.0, 240.0, 80.0));
        let scaled = UnitScale::new(2.0).unwrap().normalize(&el);
        assert_eq!(scaled.geometry, Geometry::new(10.0, 5.0, 120.0, 40.0));
        assert_eq!(scaled.selector, el.selector);
    }

    #[test]
    fn rejects_non_positive_or_non_finite_ratio() {
        assert!(UnitScale::new(0.0).is_err());
        assert!(UnitScale::new(-1.5).is_err());
        assert!(UnitScale::new(f64::INFINITY).is_err());
        assert!(UnitScale::new(f64::NAN).is_err());
    }
}
