use chrono::{DateTime, TimeZone};

use crate::types::{CardinalDirection, Location, SolarSample, SunPosition};

pub const OBLIQUITY_OF_ECLIPTIC: f64 = 23.4397;
pub const PERIHELION_LONGITUDE: f64 = 102.9372;
pub const J1970: f64 = 2_440_588.0;
pub const J2000: f64 = 2_451_545.0;
pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * (std::f64::consts::PI / 180.0)
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * (180.0 / std::f64::consts::PI)
}

pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

pub fn julian_date<Tz: TimeZone>(dt: &DateTime<Tz>) -> f64 {
    dt.timestamp_millis() as f64 / MILLIS_PER_DAY - 0.5 + J1970
}

/// Days since the J2000.0 epoch.
pub fn days_since_j2000<Tz: TimeZone>(dt: &DateTime<Tz>) -> f64 {
    julian_date(dt) - J2000
}

pub fn solar_mean_anomaly(d: f64) -> f64 {
    deg_to_rad(357.5291 + 0.985_600_28 * d)
}

pub fn equation_of_center(mean_anomaly: f64) -> f64 {
    let m = mean_anomaly;
    deg_to_rad(1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin())
}

pub fn ecliptic_longitude(mean_anomaly: f64) -> f64 {
    mean_anomaly
        + equation_of_center(mean_anomaly)
        + deg_to_rad(PERIHELION_LONGITUDE)
        + std::f64::consts::PI
}

pub fn solar_declination(ecliptic_longitude: f64) -> f64 {
    let e = deg_to_rad(OBLIQUITY_OF_ECLIPTIC);
    (e.sin() * ecliptic_longitude.sin()).asin()
}

pub fn right_ascension(ecliptic_longitude: f64) -> f64 {
    let e = deg_to_rad(OBLIQUITY_OF_ECLIPTIC);
    (ecliptic_longitude.sin() * e.cos()).atan2(ecliptic_longitude.cos())
}

/// Local sidereal time in radians; `lw` is the west longitude in radians.
pub fn sidereal_time(d: f64, lw: f64) -> f64 {
    deg_to_rad(280.16 + 360.985_623_5 * d) - lw
}

pub fn altitude_from(hour_angle: f64, phi: f64, dec: f64) -> f64 {
    (phi.sin() * dec.sin() + phi.cos() * dec.cos() * hour_angle.cos()).asin()
}

pub fn azimuth_from(hour_angle: f64, phi: f64, dec: f64) -> f64 {
    hour_angle
        .sin()
        .atan2(hour_angle.cos() * phi.sin() - dec.tan() * phi.cos())
}

/// Sun altitude and azimuth in degrees. Azimuth is 0° at south and grows
/// toward west, so east is -90° and west is +90°.
pub fn solar_position<Tz: TimeZone>(location: Location, dt: &DateTime<Tz>) -> SunPosition {
    let lw = deg_to_rad(-location.longitude);
    let phi = deg_to_rad(location.latitude);
    let d = days_since_j2000(dt);

    let m = solar_mean_anomaly(d);
    let l = ecliptic_longitude(m);
    let dec = solar_declination(l);
    let ra = right_ascension(l);
    let h = sidereal_time(d, lw) - ra;

    SunPosition {
        altitude: rad_to_deg(altitude_from(h, phi, dec)),
        azimuth: rad_to_deg(azimuth_from(h, phi, dec)),
    }
}

pub fn solar_sample<Tz: TimeZone>(
    location: Location,
    day_start: &DateTime<Tz>,
    minute_of_day: u32,
) -> SolarSample {
    let dt = day_start.clone() + chrono::Duration::minutes(i64::from(minute_of_day));
    let pos = solar_position(location, &dt);
    SolarSample {
        minute_of_day,
        altitude: pos.altitude,
        azimuth: pos.azimuth,
    }
}

/// South-based azimuth to a compass bearing (0°=N, 90°=E, 180°=S).
pub fn compass_azimuth(azimuth: f64) -> f64 {
    normalize_angle(azimuth + 180.0)
}

pub fn cardinal_direction(azimuth: f64) -> CardinalDirection {
    let bearing = compass_azimuth(azimuth);
    let idx = ((bearing + 22.5) / 45.0).floor() as usize % 8;
    CardinalDirection::ALL[idx]
}
