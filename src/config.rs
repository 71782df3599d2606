//! Simulator Configuration
//!
//! Startup parameters loaded from an optional TOML file. Every field has a
//! default, so an empty file (or no file) gives the Vienna setup.

use std::path::Path;
use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;
use snafu::ResultExt;
use tracing::info;

use crate::angles::deg_to_rad;
use crate::error::{ConfigReadSnafu, Result, UnknownTimezoneSnafu};
use crate::scene::DEFAULT_DOME_RADIUS;
use crate::types::{Location, ModuleOrientation};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA identifier used until the first timezone lookup resolves
    pub timezone: String,
    pub tilt_deg: f64,
    pub azimuth_deg: f64,
    pub area_m2: f64,
    pub frame_rate: u32,
    /// Minutes between points of the 3-D sun path
    pub sun_path_step_minutes: usize,
    pub scene_radius: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            latitude: 48.2082,
            longitude: 16.3738,
            timezone: "Europe/Vienna".to_string(),
            tilt_deg: 45.0,
            azimuth_deg: 0.0,
            area_m2: 10.0,
            frame_rate: 60,
            sun_path_step_minutes: 6,
            scene_radius: DEFAULT_DOME_RADIUS,
        }
    }
}

impl SimulatorConfig {
    pub fn from_toml_str(value: &str) -> Result<Self> {
        Ok(toml::from_str(value)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let value = std::fs::read_to_string(path).context(ConfigReadSnafu {
            path: path.display().to_string(),
        })?;
        info!("Loaded simulator config from {}", path.display());
        Self::from_toml_str(&value)
    }

    pub fn location(&self) -> Location {
        Location::new(self.latitude, self.longitude)
    }

    pub fn orientation(&self) -> ModuleOrientation {
        ModuleOrientation {
            tilt: deg_to_rad(self.tilt_deg),
            azimuth: deg_to_rad(self.azimuth_deg),
            area: self.area_m2,
        }
        .normalized()
    }

    pub fn zone(&self) -> Result<Tz> {
        parse_zone(&self.timezone)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.max(1)))
    }
}

pub fn parse_zone(id: &str) -> Result<Tz> {
    id.trim()
        .parse::<Tz>()
        .ok()
        .ok_or_else(|| UnknownTimezoneSnafu { id }.build())
}
