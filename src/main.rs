//! solar-sim - headless runner
//!
//! Usage: `solar-sim [config.toml] [frames]`

use std::process::ExitCode;

use tokio::task::JoinHandle;

use solar_sim::animation::{shared_surface, Frame, FrameHost, Surface};
use solar_sim::day_samples::minutes_to_time;
use solar_sim::simulator::{MapView, Simulator, Surfaces};
use solar_sim::{
    cardinal_direction, compass_azimuth, panel_pose, Location, NauticalResolver, Simulation,
    SimulatorConfig,
};

const DEFAULT_FRAMES: u32 = 240;

struct ChartLog;

impl Surface for ChartLog {
    fn render(&mut self, frame: &Frame<'_>) {
        if frame.index % 60 == 0 {
            let (hour, minute) = minutes_to_time(frame.index as u32);
            let sample = frame.current();
            tracing::info!(
                "chart  {:02}:{:02}  power {:6.2} / {}  altitude {:5.1}°",
                hour,
                minute,
                sample.power,
                frame.samples.max_power(),
                sample.altitude.max(0.0)
            );
        }
    }
}

struct SceneLog {
    radius: f64,
}

impl Surface for SceneLog {
    fn render(&mut self, frame: &Frame<'_>) {
        if frame.index % 60 == 0 {
            let sample = frame.current();
            let pos = solar_sim::sun_position_3d(sample.altitude, sample.azimuth, self.radius);
            if let Some(instant) = frame.instant {
                tracing::info!(
                    "scene  {}  sun at ({:6.2}, {:6.2}, {:6.2})",
                    instant.format("%H:%M %Z"),
                    pos.x,
                    pos.y,
                    pos.z
                );
            }
        }
    }
}

struct MapLog;

impl MapView for MapLog {
    fn show_location(&mut self, location: Location) {
        tracing::info!(
            "map    marker at ({:.4}, {:.4})",
            location.latitude,
            location.longitude
        );
    }
}

fn print_day(simulation: &Simulation, config: &SimulatorConfig) {
    let current = simulation.current();
    let samples = &current.samples;
    let location = simulation.location();

    println!("=== Solar Module Day Simulation ===");
    println!(
        "Location: ({:.4}, {:.4})  Zone: {}",
        location.latitude,
        location.longitude,
        current.zone.name()
    );
    println!("Day start: {}", current.day_start);
    println!(
        "Module: tilt {:.1}°, azimuth {:.1}°, area {:.1} m²",
        config.tilt_deg, config.azimuth_deg, config.area_m2
    );
    println!();
    println!(" Time  Altitude  Bearing  Dir   Power");
    for hour in 0..24 {
        let sample = samples.sample(hour * 60);
        println!(
            "{:02}:00  {:7.2}°  {:6.1}°  {:<3}  {:6.2}",
            hour,
            sample.altitude,
            compass_azimuth(sample.azimuth),
            cardinal_direction(sample.azimuth),
            sample.power
        );
    }
    println!();
    match samples.peak() {
        Some(peak) => {
            let (h, m) = minutes_to_time(peak.minute);
            println!("Peak power: {:.2} at {:02}:{:02}", peak.power, h, m);
        }
        None => println!("Peak power: none"),
    }
    println!("Chart scale (max power): {}", samples.max_power());
    match samples.daylight() {
        Some(window) => {
            let (rh, rm) = minutes_to_time(window.sunrise);
            let (sh, sm) = minutes_to_time(window.sunset);
            println!("Sun above horizon: {:02}:{:02} - {:02}:{:02}", rh, rm, sh, sm);
        }
        None => println!("Sun above horizon: never"),
    }
    let path = samples.sun_path(config.sun_path_step_minutes, config.scene_radius);
    let pose = panel_pose(simulation.orientation());
    println!("Sun path points: {}", path.len());
    println!(
        "Panel pose: yaw {:.3} rad, pitch {:.3} rad, lift {:.2}",
        pose.yaw, pose.pitch, pose.lift
    );
    println!();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match SimulatorConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => SimulatorConfig::default(),
    };
    let frames = args
        .next()
        .and_then(|raw| raw.parse::<u32>().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let simulation = match Simulation::from_config(&config) {
        Ok(simulation) => simulation,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    print_day(&simulation, &config);

    let host = FrameHost::new();
    let surfaces = Surfaces {
        chart: Some(shared_surface(ChartLog)),
        scene: Some(shared_surface(SceneLog {
            radius: config.scene_radius,
        })),
        map: Some(Box::new(MapLog)),
    };
    let simulator = Simulator::new(simulation, surfaces, NauticalResolver, host.clone());
    let handle = simulator.handle();
    let driver = host.drive(config.frame_interval());
    let running = tokio::spawn(simulator.run());

    tokio::time::sleep(config.frame_interval() * frames).await;
    driver.abort();
    if handle.shutdown().is_err() {
        return ExitCode::SUCCESS;
    }
    join_simulator(running).await
}

async fn join_simulator(running: JoinHandle<()>) -> ExitCode {
    match running.await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Simulator task failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
