use chrono_tz::Tz;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Orientation of a flat module. Angles are radians; azimuth uses the same
/// south-based convention as the sun azimuth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleOrientation {
    pub tilt: f64,
    pub azimuth: f64,
    pub area: f64,
}

impl Default for ModuleOrientation {
    fn default() -> Self {
        Self {
            tilt: std::f64::consts::FRAC_PI_4,
            azimuth: 0.0,
            area: 10.0,
        }
    }
}

impl ModuleOrientation {
    /// Tilt kept within `[0, π]` and area non-negative; azimuth is free.
    pub fn normalized(self) -> Self {
        Self {
            tilt: self.tilt.clamp(0.0, std::f64::consts::PI),
            azimuth: self.azimuth,
            area: self.area.max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    pub altitude: f64,
    pub azimuth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarSample {
    pub minute_of_day: u32,
    pub altitude: f64,
    pub azimuth: f64,
}

impl From<SolarSample> for SunPosition {
    fn from(sample: SolarSample) -> Self {
        Self {
            altitude: sample.altitude,
            azimuth: sample.azimuth,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaySample {
    pub altitude: f64,
    pub azimuth: f64,
    pub power: f64,
}

impl DaySample {
    pub fn is_daylight(&self) -> bool {
        self.altitude > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunriseSunset {
    pub sunrise: u32,
    pub sunset: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerPeak {
    pub minute: u32,
    pub power: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeZoneContext {
    pub zone: Tz,
}

impl TimeZoneContext {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub fn id(&self) -> &'static str {
        self.zone.name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardinalDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }
}

impl std::fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPose {
    pub yaw: f64,
    pub pitch: f64,
    pub lift: f64,
}
