//! Simulator
//!
//! Central orchestrator. Producers (map, date picker, orientation inputs)
//! send [`Command`]s through a [`SimulatorHandle`]; the simulator applies
//! them one at a time, regenerates the samples and restarts the animation
//! loops. Timezone lookups run as detached tasks and report back through
//! the same command channel.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::animation::{AnimationScheduler, FrameHost, SharedSurface, SurfaceKind};
use crate::error::{Error, Result};
use crate::simulation::{Regeneration, Simulation};
use crate::timezone::{TimezoneResolver, TimezoneTicket};
use crate::types::{Location, ModuleOrientation};

/// Receiver of location updates, e.g. the map marker.
pub trait MapView: Send + 'static {
    fn show_location(&mut self, location: Location);
}

#[derive(Default)]
pub struct Surfaces {
    pub chart: Option<SharedSurface>,
    pub scene: Option<SharedSurface>,
    pub map: Option<Box<dyn MapView>>,
}

#[derive(Debug)]
pub enum Command {
    SetLocation(Location),
    /// ISO `YYYY-MM-DD` from the date picker
    SetDate(String),
    /// Raw degree value from the tilt field
    SetTilt(String),
    /// Raw degree value from the azimuth field
    SetAzimuth(String),
    /// Raw m² value from the area field
    SetArea(String),
    SetOrientation(ModuleOrientation),
    Regenerate,
    TimezoneResolved {
        ticket: TimezoneTicket,
        result: Result<String>,
    },
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct SimulatorHandle {
    tx: mpsc::UnboundedSender<Command>,
    updates: watch::Receiver<Regeneration>,
}

impl SimulatorHandle {
    pub fn send(&self, command: Command) -> Result<()> {
        self.tx.send(command).map_err(|_| Error::SimulatorStopped)
    }

    pub fn set_location(&self, latitude: f64, longitude: f64) -> Result<()> {
        self.send(Command::SetLocation(Location::new(latitude, longitude)))
    }

    pub fn set_date(&self, iso_date: impl Into<String>) -> Result<()> {
        self.send(Command::SetDate(iso_date.into()))
    }

    pub fn set_tilt(&self, raw: impl Into<String>) -> Result<()> {
        self.send(Command::SetTilt(raw.into()))
    }

    pub fn set_azimuth(&self, raw: impl Into<String>) -> Result<()> {
        self.send(Command::SetAzimuth(raw.into()))
    }

    pub fn set_area(&self, raw: impl Into<String>) -> Result<()> {
        self.send(Command::SetArea(raw.into()))
    }

    pub fn regenerate(&self) -> Result<()> {
        self.send(Command::Regenerate)
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown)
    }

    pub fn subscribe(&self) -> watch::Receiver<Regeneration> {
        self.updates.clone()
    }

    pub fn latest(&self) -> Regeneration {
        self.updates.borrow().clone()
    }
}

pub struct Simulator {
    simulation: Simulation,
    chart: AnimationScheduler,
    scene: AnimationScheduler,
    map: Option<Box<dyn MapView>>,
    resolver: Arc<dyn TimezoneResolver>,
    tx: mpsc::UnboundedSender<Command>,
    rx: mpsc::UnboundedReceiver<Command>,
}

impl Simulator {
    pub fn new(
        simulation: Simulation,
        surfaces: Surfaces,
        resolver: impl TimezoneResolver,
        host: FrameHost,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        if surfaces.map.is_none() {
            error!("Map view is missing, location changes will not be shown");
        }
        Self {
            simulation,
            chart: AnimationScheduler::new(SurfaceKind::Chart, surfaces.chart, host.clone()),
            scene: AnimationScheduler::new(SurfaceKind::Scene, surfaces.scene, host),
            map: surfaces.map,
            resolver: Arc::new(resolver),
            tx,
            rx,
        }
    }

    pub fn handle(&self) -> SimulatorHandle {
        SimulatorHandle {
            tx: self.tx.clone(),
            updates: self.simulation.subscribe(),
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn chart(&self) -> &AnimationScheduler {
        &self.chart
    }

    pub fn scene(&self) -> &AnimationScheduler {
        &self.scene
    }

    /// Start both loops on the current samples. Must run inside a tokio runtime.
    pub fn start(&mut self) {
        let current = self.simulation.current();
        if let Some(map) = self.map.as_mut() {
            map.show_location(self.simulation.location());
        }
        self.restart_animations(&current);
    }

    /// Process commands until [`Command::Shutdown`].
    pub async fn run(mut self) {
        info!("Simulator started");
        self.start();
        while let Some(command) = self.rx.recv().await {
            if !self.handle_command(command) {
                break;
            }
        }
        self.chart.cancel();
        self.scene.cancel();
        info!("Simulator stopped");
    }

    /// Apply one command. Returns false when the simulator should stop.
    pub fn handle_command(&mut self, command: Command) -> bool {
        debug!("Handling {:?}", command);
        let regeneration = match command {
            Command::SetLocation(location) => {
                if let Some(map) = self.map.as_mut() {
                    map.show_location(location);
                }
                let (ticket, regeneration) = self.simulation.set_location(location);
                self.request_timezone(ticket);
                Some(regeneration)
            }
            Command::SetDate(input) => match self.simulation.set_date_input(&input) {
                Ok(regeneration) => Some(regeneration),
                Err(e) => {
                    warn!("Ignoring date change: {}", e);
                    None
                }
            },
            Command::SetTilt(raw) => Some(self.simulation.set_tilt_input(&raw)),
            Command::SetAzimuth(raw) => Some(self.simulation.set_azimuth_input(&raw)),
            Command::SetArea(raw) => Some(self.simulation.set_area_input(&raw)),
            Command::SetOrientation(orientation) => {
                Some(self.simulation.set_orientation(orientation))
            }
            Command::Regenerate => Some(self.simulation.regenerate()),
            Command::TimezoneResolved { ticket, result } => {
                self.simulation.apply_timezone(&ticket, result)
            }
            Command::Shutdown => return false,
        };

        if let Some(regeneration) = regeneration {
            self.restart_animations(&regeneration);
        }
        true
    }

    fn restart_animations(&mut self, regeneration: &Regeneration) {
        let cursor = self.simulation.cursor().clone();
        self.chart.restart(regeneration, &cursor);
        self.scene.restart(regeneration, &cursor);
    }

    fn request_timezone(&self, ticket: TimezoneTicket) {
        let lookup = self.resolver.resolve(ticket.location());
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = lookup.await;
            if tx.send(Command::TimezoneResolved { ticket, result }).is_err() {
                debug!("Simulator gone before timezone lookup #{} finished", ticket.seq());
            }
        });
    }
}
