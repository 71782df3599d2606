//! Placement of the sun and the module in the 3-D sun-path scene.
//!
//! The scene uses a y-up frame with north along -z and east along +x, so the
//! south-based sun azimuth maps directly onto the dome.

use crate::angles::deg_to_rad;
use crate::types::{ModuleOrientation, PanelPose, ScenePoint};

pub const DEFAULT_DOME_RADIUS: f64 = 20.0;
pub const PANEL_SIZE: f64 = 4.0;
const PANEL_CLEARANCE: f64 = 0.2;

pub fn sun_position_3d(altitude: f64, azimuth: f64, radius: f64) -> ScenePoint {
    let alt = deg_to_rad(altitude);
    let az = deg_to_rad(azimuth);
    let r = radius * alt.cos();
    ScenePoint {
        x: -r * az.sin(),
        y: radius * alt.sin(),
        z: r * az.cos(),
    }
}

/// Rotation and height of the module mesh. The yaw is applied first, then
/// the pitch about the module's own x axis; the lift keeps the lower edge
/// just above the ground.
pub fn panel_pose(orientation: &ModuleOrientation) -> PanelPose {
    PanelPose {
        yaw: -orientation.azimuth,
        pitch: -std::f64::consts::FRAC_PI_2 + orientation.tilt,
        lift: (PANEL_SIZE / 2.0) * orientation.tilt.sin() + PANEL_CLEARANCE,
    }
}
