use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::LazyLock;

use chrono::TimeZone;
use chrono_tz::Europe::Vienna;

use solar_sim::angles::{cardinal_direction, deg_to_rad, solar_position};
use solar_sim::day_samples::*;
use solar_sim::power::incidence_cosine;
use solar_sim::types::*;

macro_rules! assert_approx {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $tol,
            "assert_approx failed: left={}, right={}, diff={}, tol={}",
            l, r, (l - r).abs(), $tol
        );
    };
}

const VIENNA: Location = Location {
    latitude: 48.2082,
    longitude: 16.3738,
};

fn day_start(year: i32, month: u32, day: u32) -> chrono::DateTime<chrono_tz::Tz> {
    Vienna.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

fn flat(area: f64) -> ModuleOrientation {
    ModuleOrientation {
        tilt: 0.0,
        azimuth: 0.0,
        area,
    }
}

static SUMMER_FLAT: LazyLock<DaySampleSet> =
    LazyLock::new(|| generate_day_samples(&day_start(2026, 6, 21), VIENNA, &flat(10.0)));

// ── Time utilities ──

#[test]
fn test_time_roundtrip() {
    for m in [0, 1, 59, 60, 61, 120, 719, 720, 721, 1439] {
        assert_eq!(time_to_minutes(minutes_to_time(m)), m, "minutes={}", m);
    }
}

#[test]
fn test_known_time_conversions() {
    assert_eq!(minutes_to_time(0), (0, 0));
    assert_eq!(minutes_to_time(720), (12, 0));
    assert_eq!(minutes_to_time(1439), (23, 59));
    assert_eq!(minutes_to_time(390), (6, 30));
}

// ── Structure ──

#[test]
fn test_exactly_one_sample_per_minute() {
    assert_eq!(SUMMER_FLAT.len(), 1440);
    assert_eq!(SUMMER_FLAT.samples().len(), MINUTES_PER_DAY as usize);
    assert!(!SUMMER_FLAT.is_empty());
}

#[test]
fn test_samples_match_calculator() {
    let start = day_start(2026, 6, 21);
    for minute in [0, 301, 720, 776, 1252, 1439] {
        let dt = start + chrono::Duration::minutes(minute as i64);
        let pos = solar_position(VIENNA, &dt);
        let sample = SUMMER_FLAT.sample(minute);
        assert_eq!(sample.altitude, pos.altitude, "minute {}", minute);
        assert_eq!(sample.azimuth, pos.azimuth, "minute {}", minute);
    }
}

#[test]
fn test_sample_accessor_wraps() {
    assert_eq!(SUMMER_FLAT.sample(1440), SUMMER_FLAT.sample(0));
    assert_eq!(SUMMER_FLAT.get(1440), None);
    assert_eq!(SUMMER_FLAT.get(5), Some(&SUMMER_FLAT.sample(5)));
}

#[test]
fn test_revealed_prefix() {
    assert_eq!(SUMMER_FLAT.revealed(0).len(), 1);
    assert_eq!(SUMMER_FLAT.revealed(719).len(), 720);
    assert_eq!(SUMMER_FLAT.revealed(5000).len(), 1440);
    assert_eq!(SUMMER_FLAT.revealed(10)[10], SUMMER_FLAT.sample(10));
}

#[test]
fn test_altitudes_clamped_for_display() {
    assert!(SUMMER_FLAT.altitudes().all(|a| a >= 0.0));
    assert_eq!(SUMMER_FLAT.altitudes().count(), 1440);
}

// ── maxPower ──

#[test]
fn test_max_power_is_ceiling_of_peak() {
    let peak = SUMMER_FLAT.powers().fold(0.0_f64, f64::max);
    assert_eq!(SUMMER_FLAT.max_power(), peak.ceil());
}

#[test]
fn test_max_power_ceiling_for_various_orientations() {
    let start = day_start(2026, 4, 2);
    for (tilt, az, area) in [(0.0, 0.0, 1.0), (30.0, 0.0, 2.5), (60.0, -45.0, 7.0), (90.0, 90.0, 3.3)] {
        let module = ModuleOrientation {
            tilt: deg_to_rad(tilt),
            azimuth: deg_to_rad(az),
            area,
        };
        let set = generate_day_samples(&start, VIENNA, &module);
        let peak = set.powers().fold(0.0_f64, f64::max);
        assert_eq!(set.max_power(), peak.ceil());
        assert!(set.powers().all(|p| p <= set.max_power()));
    }
}

// ── Vienna summer solstice, horizontal module ──

#[test]
fn test_vienna_solstice_peak_power() {
    let reference_altitude = deg_to_rad(90.0 - VIENNA.latitude + 23.44);
    let reference = 10.0 * reference_altitude.sin().powi(2);

    let peak = SUMMER_FLAT.peak().unwrap();
    assert!(
        ((peak.power - reference) / reference).abs() < 0.01,
        "peak={} reference={}",
        peak.power,
        reference
    );
    assert_eq!(SUMMER_FLAT.max_power(), 9.0);
    // Solar noon in Vienna is just before 13:00 CEST.
    assert_approx!(peak.minute as f64, 776.0, 5.0);
}

#[test]
fn test_vienna_solstice_daylight() {
    let window = SUMMER_FLAT.daylight().unwrap();
    assert_approx!(window.sunrise as f64, 301.0, 3.0);
    assert_approx!(window.sunset as f64, 1252.0, 3.0);
}

// ── Vertical module facing away from the sun ──

#[test]
fn test_vertical_north_facing_winter_is_dark() {
    let north_wall = ModuleOrientation {
        tilt: FRAC_PI_2,
        azimuth: PI,
        area: 10.0,
    };
    let set = generate_day_samples(&day_start(2026, 12, 21), VIENNA, &north_wall);
    assert!(set.samples().iter().any(DaySample::is_daylight));
    assert!(set.powers().all(|p| p == 0.0));
    assert_eq!(set.max_power(), 0.0);
    assert_eq!(set.peak(), None);
}

// ── Determinism ──

#[test]
fn test_regeneration_is_deterministic() {
    let module = ModuleOrientation::default();
    let start = day_start(2026, 9, 1);
    let a = generate_day_samples(&start, VIENNA, &module);
    let _other = generate_day_samples(&start, Location::new(-33.9, 151.2), &module);
    let b = generate_day_samples(&start, VIENNA, &module);

    assert_eq!(a, b);
    for (x, y) in a.samples().iter().zip(b.samples()) {
        assert_eq!(x.altitude.to_bits(), y.altitude.to_bits());
        assert_eq!(x.azimuth.to_bits(), y.azimuth.to_bits());
        assert_eq!(x.power.to_bits(), y.power.to_bits());
    }
}

#[test]
fn test_set_records_inputs() {
    let module = ModuleOrientation::default();
    let start = day_start(2026, 9, 1);
    let set = generate_day_samples(&start, VIENNA, &module);
    assert_eq!(*set.day_start(), start);
    assert_eq!(set.location(), VIENNA);
    assert_eq!(*set.orientation(), module);
}

// ── Equator-facing module tilted at latitude ──

#[test]
fn test_incidence_peaks_at_solar_noon() {
    let start = day_start(2026, 3, 20);
    let module = ModuleOrientation {
        tilt: deg_to_rad(VIENNA.latitude),
        azimuth: 0.0,
        area: 1.0,
    };
    let set = generate_day_samples(&start, VIENNA, &flat(1.0));
    let (noon, _) = set
        .samples()
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.altitude.total_cmp(&b.altitude))
        .unwrap();

    let cosines: Vec<f64> = set
        .samples()
        .iter()
        .map(|s| {
            incidence_cosine(
                SunPosition {
                    altitude: s.altitude,
                    azimuth: s.azimuth,
                },
                &module,
            )
        })
        .collect();
    let best = cosines.iter().cloned().fold(f64::MIN, f64::max);
    assert_approx!(cosines[noon], best, 1e-4);
}

// ── Supplementary views ──

#[test]
fn test_polar_night_has_no_daylight() {
    let start = chrono_tz::UTC.with_ymd_and_hms(2026, 12, 21, 0, 0, 0).unwrap();
    let set = generate_day_samples(&start, Location::new(80.0, 0.0), &flat(1.0));
    assert_eq!(set.daylight(), None);
    assert!(set.sun_path(6, 20.0).is_empty());
}

#[test]
fn test_sun_path_above_ground() {
    let path = SUMMER_FLAT.sun_path(6, 20.0);
    assert!(!path.is_empty());
    assert!(path.len() <= 240);
    for p in &path {
        assert!(p.y > 0.0);
        assert_approx!((p.x * p.x + p.y * p.y + p.z * p.z).sqrt(), 20.0, 1e-9);
    }
}

#[test]
fn test_hourly_directions_summer() {
    let dirs = SUMMER_FLAT.hourly_directions();
    assert_eq!(dirs.len(), 25);
    assert_eq!(dirs[0], (0, CardinalDirection::N));
    assert_eq!(dirs[6].1, CardinalDirection::NE);
    assert_eq!(dirs[9].1, CardinalDirection::E);
    assert_eq!(dirs[13].1, CardinalDirection::S);
    assert_eq!(dirs[18].1, CardinalDirection::W);
    assert_eq!(dirs[24].0, 24);
}

#[test]
fn test_hourly_directions_end_on_last_minute() {
    // At 80°N in midsummer the sun circles the sky. Here it crosses the E/NE
    // boundary between the first and the last minute of the UTC day.
    let start = chrono_tz::UTC.with_ymd_and_hms(2026, 6, 21, 0, 0, 0).unwrap();
    let set = generate_day_samples(&start, Location::new(80.0, 71.85), &flat(1.0));
    let dirs = set.hourly_directions();
    assert_eq!(dirs[0].1, CardinalDirection::E);
    assert_eq!(dirs[24].1, CardinalDirection::NE);
    assert_eq!(dirs[24].1, cardinal_direction(set.sample(1439).azimuth));
}

#[test]
fn test_sets_for_different_dates_differ() {
    let winter = generate_day_samples(&day_start(2026, 12, 21), VIENNA, &flat(10.0));
    assert!(winter.max_power() < SUMMER_FLAT.max_power());
}
