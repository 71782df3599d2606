//! Geometric power model for a flat module.
//!
//! Only the cosine of the angle of incidence is modelled. The elevation
//! factor and the incidence factor are clamped at zero separately, so a
//! module facing away from the sun yields nothing even while the sun is up.

use crate::angles::deg_to_rad;
use crate::types::{ModuleOrientation, SunPosition};

/// Cosine of the angle between the sun direction and the module normal.
/// Not clamped; negative when the sun is behind the module.
pub fn incidence_cosine(sun: SunPosition, orientation: &ModuleOrientation) -> f64 {
    let gamma = deg_to_rad(sun.altitude);
    let alpha = deg_to_rad(sun.azimuth);
    gamma.sin() * orientation.tilt.cos()
        + gamma.cos() * orientation.tilt.sin() * (alpha - orientation.azimuth).cos()
}

pub fn elevation_factor(sun: SunPosition) -> f64 {
    deg_to_rad(sun.altitude).sin().max(0.0)
}

pub fn instantaneous_power(sun: SunPosition, orientation: &ModuleOrientation) -> f64 {
    let cos_factor = incidence_cosine(sun, orientation).max(0.0);
    elevation_factor(sun) * cos_factor * orientation.area.max(0.0)
}
