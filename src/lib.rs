pub mod angles;
pub mod animation;
pub mod config;
pub mod day_samples;
pub mod error;
pub mod inputs;
pub mod power;
pub mod scene;
pub mod simulation;
pub mod simulator;
pub mod time_cursor;
pub mod timezone;
pub mod types;

pub use angles::{
    cardinal_direction, compass_azimuth, deg_to_rad, julian_date, normalize_angle, rad_to_deg,
    solar_position, solar_sample,
};

pub use animation::{
    shared_surface, AnimationScheduler, Frame, FrameHost, FrameSignal, SharedSurface, Surface,
    SurfaceKind,
};

pub use config::SimulatorConfig;

pub use day_samples::{
    generate_day_samples, minutes_to_time, time_to_minutes, DaySampleSet, MINUTES_PER_DAY,
};

pub use error::{Error, Result};

pub use power::{elevation_factor, incidence_cosine, instantaneous_power};

pub use scene::{panel_pose, sun_position_3d};

pub use simulation::{Regeneration, RegenerationReason, Simulation};

pub use simulator::{Command, MapView, Simulator, SimulatorHandle, Surfaces};

pub use time_cursor::{civil_day_start, SharedCursor, TimeCursor};

pub use timezone::{NauticalResolver, TimezoneRequests, TimezoneResolver, TimezoneTicket};

pub use types::{
    CardinalDirection, DaySample, Location, ModuleOrientation, PanelPose, PowerPeak, ScenePoint,
    SolarSample, SunPosition, SunriseSunset, TimeZoneContext,
};
