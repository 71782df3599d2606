use chrono::DateTime;
use chrono_tz::Tz;

use crate::angles;
use crate::power;
use crate::scene;
use crate::types::{
    CardinalDirection, DaySample, Location, ModuleOrientation, PowerPeak, ScenePoint,
    SunPosition, SunriseSunset,
};

pub const MINUTES_PER_DAY: u32 = 1440;

pub fn minutes_to_time(total_minutes: u32) -> (u32, u32) {
    (total_minutes / 60, total_minutes % 60)
}

pub fn time_to_minutes(time: (u32, u32)) -> u32 {
    time.0 * 60 + time.1
}

/// One simulated day sampled every minute from `day_start`.
///
/// A set is never patched in place. Any change of location, date or
/// orientation produces a new set through [`generate_day_samples`].
#[derive(Debug, Clone, PartialEq)]
pub struct DaySampleSet {
    day_start: DateTime<Tz>,
    location: Location,
    orientation: ModuleOrientation,
    samples: Vec<DaySample>,
    max_power: f64,
}

pub fn generate_day_samples(
    day_start: &DateTime<Tz>,
    location: Location,
    orientation: &ModuleOrientation,
) -> DaySampleSet {
    let mut samples = Vec::with_capacity(MINUTES_PER_DAY as usize);
    for minute in 0..MINUTES_PER_DAY {
        let sun = SunPosition::from(angles::solar_sample(location, day_start, minute));
        samples.push(DaySample {
            altitude: sun.altitude,
            azimuth: sun.azimuth,
            power: power::instantaneous_power(sun, orientation),
        });
    }

    let peak = samples.iter().map(|s| s.power).fold(0.0_f64, f64::max);

    DaySampleSet {
        day_start: *day_start,
        location,
        orientation: *orientation,
        samples,
        max_power: peak.ceil(),
    }
}

impl DaySampleSet {
    pub fn day_start(&self) -> &DateTime<Tz> {
        &self.day_start
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn orientation(&self) -> &ModuleOrientation {
        &self.orientation
    }

    /// Ceiling of the largest power value; the chart's y-axis limit.
    pub fn max_power(&self) -> f64 {
        self.max_power
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[DaySample] {
        &self.samples
    }

    pub fn get(&self, minute: usize) -> Option<&DaySample> {
        self.samples.get(minute)
    }

    /// Sample at a minute index; indices past the end wrap around the day.
    pub fn sample(&self, minute: usize) -> DaySample {
        self.samples[minute % self.samples.len()]
    }

    /// Samples `0..=index`, the part of the day already revealed by an animation.
    pub fn revealed(&self, index: usize) -> &[DaySample] {
        let end = (index + 1).min(self.samples.len());
        &self.samples[..end]
    }

    pub fn altitudes(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.altitude.max(0.0))
    }

    pub fn powers(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.power)
    }

    pub fn peak(&self) -> Option<PowerPeak> {
        self.samples
            .iter()
            .enumerate()
            .filter(|(_, s)| s.power > 0.0)
            .max_by(|(_, a), (_, b)| a.power.total_cmp(&b.power))
            .map(|(minute, s)| PowerPeak {
                minute: minute as u32,
                power: s.power,
            })
    }

    /// First and last minute with the sun above the horizon.
    pub fn daylight(&self) -> Option<SunriseSunset> {
        let sunrise = self.samples.iter().position(DaySample::is_daylight)?;
        let sunset = self.samples.iter().rposition(DaySample::is_daylight)?;
        Some(SunriseSunset {
            sunrise: sunrise as u32,
            sunset: sunset as u32,
        })
    }

    /// Points of the visible sun path on a dome of `radius`, every `step` minutes.
    pub fn sun_path(&self, step: usize, radius: f64) -> Vec<ScenePoint> {
        self.samples
            .iter()
            .step_by(step.max(1))
            .filter(|s| s.is_daylight())
            .map(|s| scene::sun_position_3d(s.altitude, s.azimuth, radius))
            .collect()
    }

    /// Sun direction at every full hour. The 24:00 entry uses the last
    /// minute of the day.
    pub fn hourly_directions(&self) -> Vec<(u32, CardinalDirection)> {
        (0..=24)
            .map(|hour| {
                let minute = (hour * 60).min(MINUTES_PER_DAY - 1);
                let s = self.sample(minute as usize);
                (hour, angles::cardinal_direction(s.azimuth))
            })
            .collect()
    }
}
