use std::time::Duration;

use chrono_tz::Europe::Vienna;

use solar_sim::config::*;
use solar_sim::error::Error;
use solar_sim::simulation::Simulation;
use solar_sim::timezone::nautical_zone_id;

// ── Defaults ──

#[test]
fn test_default_config() {
    let c = SimulatorConfig::default();
    assert_eq!(c.latitude, 48.2082);
    assert_eq!(c.longitude, 16.3738);
    assert_eq!(c.timezone, "Europe/Vienna");
    assert_eq!(c.tilt_deg, 45.0);
    assert_eq!(c.azimuth_deg, 0.0);
    assert_eq!(c.area_m2, 10.0);
    assert_eq!(c.frame_rate, 60);
    assert_eq!(c.sun_path_step_minutes, 6);
    assert_eq!(c.scene_radius, 20.0);
}

#[test]
fn test_empty_toml_is_default() {
    assert_eq!(SimulatorConfig::from_toml_str("").unwrap(), SimulatorConfig::default());
}

#[test]
fn test_partial_toml() {
    let c = SimulatorConfig::from_toml_str(
        r#"
latitude = -33.87
longitude = 151.21
timezone = "Australia/Sydney"
area_m2 = 2.5
"#,
    )
    .unwrap();
    assert_eq!(c.latitude, -33.87);
    assert_eq!(c.area_m2, 2.5);
    assert_eq!(c.tilt_deg, 45.0);
    assert_eq!(c.zone().unwrap(), chrono_tz::Australia::Sydney);
}

#[test]
fn test_malformed_toml() {
    let err = SimulatorConfig::from_toml_str("latitude = \"north\"").unwrap_err();
    assert!(matches!(err, Error::ConfigParse { .. }));
}

#[test]
fn test_missing_file() {
    let err = SimulatorConfig::load("/nonexistent/solar-sim.toml").unwrap_err();
    assert!(matches!(err, Error::ConfigRead { .. }));
    assert!(err.to_string().contains("/nonexistent/solar-sim.toml"));
}

// ── Derived values ──

#[test]
fn test_orientation_in_radians() {
    let c = SimulatorConfig {
        tilt_deg: 90.0,
        azimuth_deg: -90.0,
        area_m2: -1.0,
        ..SimulatorConfig::default()
    };
    let o = c.orientation();
    assert!((o.tilt - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    assert!((o.azimuth + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    assert_eq!(o.area, 0.0);
}

#[test]
fn test_out_of_range_tilt_is_clamped_at_startup() {
    let c = SimulatorConfig::from_toml_str("tilt_deg = 270.0").unwrap();
    assert_eq!(c.orientation().tilt, std::f64::consts::PI);

    let sim = Simulation::from_config(&c).unwrap();
    assert_eq!(sim.orientation().tilt, std::f64::consts::PI);

    let below = SimulatorConfig {
        tilt_deg: -30.0,
        ..SimulatorConfig::default()
    };
    assert_eq!(below.orientation().tilt, 0.0);
}

#[test]
fn test_frame_interval() {
    let c = SimulatorConfig {
        frame_rate: 50,
        ..SimulatorConfig::default()
    };
    assert!((c.frame_interval().as_secs_f64() - 0.02).abs() < 1e-9);

    let stalled = SimulatorConfig {
        frame_rate: 0,
        ..SimulatorConfig::default()
    };
    assert_eq!(stalled.frame_interval(), Duration::from_secs(1));
}

#[test]
fn test_unknown_zone() {
    let c = SimulatorConfig {
        timezone: "Atlantis/Capital".to_string(),
        ..SimulatorConfig::default()
    };
    assert!(matches!(c.zone(), Err(Error::UnknownTimezone { .. })));
    assert!(Simulation::from_config(&c).is_err());
}

#[test]
fn test_simulation_from_config() {
    let sim = Simulation::from_config(&SimulatorConfig::default()).unwrap();
    assert_eq!(sim.timezone().zone, Vienna);
    assert_eq!(sim.location().latitude, 48.2082);
    assert_eq!(sim.current().samples.len(), 1440);
}

#[test]
fn test_parse_zone_trims() {
    assert_eq!(parse_zone(" Europe/Vienna ").unwrap(), Vienna);
}

// ── Offline resolver ──

#[test]
fn test_nautical_zone_ids() {
    let cases: &[(f64, &str)] = &[
        (0.0, "Etc/GMT"),
        (7.4, "Etc/GMT"),
        (16.37, "Etc/GMT-1"),
        (139.65, "Etc/GMT-9"),
        (-74.0, "Etc/GMT+5"),
        (-179.0, "Etc/GMT+12"),
        (179.0, "Etc/GMT-12"),
    ];
    for &(lng, expected) in cases {
        let id = nautical_zone_id(lng);
        assert_eq!(id, expected, "lng={}", lng);
        assert!(parse_zone(&id).is_ok(), "{} is not a tz id", id);
    }
}
