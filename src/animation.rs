//! Animation Scheduling
//!
//! Every animated surface runs its own cooperative loop: wait for the host's
//! next frame, render the samples revealed so far, advance by one. A change
//! of inputs cancels the loop and starts a fresh one at index 0.
//!
//! ```text
//! FrameHost::pulse() ──► FrameSignal ──► run_loop ──► Surface::render
//!                                          │
//!                          LoopToken ◄─────┘ (checked before each render)
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::DateTime;
use chrono_tz::Tz;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::day_samples::DaySampleSet;
use crate::simulation::Regeneration;
use crate::time_cursor::SharedCursor;
use crate::types::DaySample;

/// What a surface sees on one frame.
#[derive(Debug)]
pub struct Frame<'a> {
    pub generation: u64,
    /// Minute index reached by this loop
    pub index: usize,
    pub samples: &'a DaySampleSet,
    /// Simulated instant, for surfaces driven by the time cursor
    pub instant: Option<DateTime<Tz>>,
}

impl Frame<'_> {
    /// Samples from the start of the day up to and including `index`.
    pub fn revealed(&self) -> &[DaySample] {
        self.samples.revealed(self.index)
    }

    pub fn current(&self) -> DaySample {
        self.samples.sample(self.index)
    }
}

pub trait Surface: Send + 'static {
    fn render(&mut self, frame: &Frame<'_>);
}

pub type SharedSurface = Arc<Mutex<dyn Surface>>;

pub fn shared_surface<S: Surface>(surface: S) -> SharedSurface {
    Arc::new(Mutex::new(surface))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// 2-D power/altitude chart, driven by its own frame index
    Chart,
    /// 3-D sun-path scene, driven by the time cursor
    Scene,
}

impl SurfaceKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Chart => "chart",
            Self::Scene => "scene",
        }
    }
}

// ==================== Frame host ====================

/// Per-frame signal shared by all loops, standing in for the host's
/// display refresh callback.
#[derive(Debug, Clone)]
pub struct FrameHost {
    tx: Arc<watch::Sender<u64>>,
}

impl FrameHost {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Signal one display frame.
    pub fn pulse(&self) {
        self.tx.send_modify(|n| *n = n.wrapping_add(1));
    }

    pub fn frames(&self) -> FrameSignal {
        FrameSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Pulse at a fixed rate until the returned task is aborted.
    pub fn drive(&self, interval: Duration) -> JoinHandle<()> {
        let host = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                host.pulse();
            }
        })
    }
}

impl Default for FrameHost {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct FrameSignal {
    rx: watch::Receiver<u64>,
}

impl FrameSignal {
    /// Wait for the next frame. Frames pulsed while the loop was busy
    /// collapse into one. Returns false once the host is gone.
    pub async fn next_frame(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

// ==================== Loop bookkeeping ====================

/// Cancellation flag of one loop. A loop counts as live from spawn until it
/// is cancelled or exits, whichever comes first.
#[derive(Debug)]
struct LoopToken {
    cancelled: AtomicBool,
    released: AtomicBool,
    live: Arc<AtomicUsize>,
}

impl LoopToken {
    fn new(live: Arc<AtomicUsize>) -> Arc<Self> {
        live.fetch_add(1, Ordering::SeqCst);
        Arc::new(Self {
            cancelled: AtomicBool::new(false),
            released: AtomicBool::new(false),
            live,
        })
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.release();
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn release(&self) {
        if !self.released.swap(true, Ordering::SeqCst) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// Releases the token when the loop future finishes or is dropped by abort.
struct ReleaseOnDrop(Arc<LoopToken>);

impl Drop for ReleaseOnDrop {
    fn drop(&mut self) {
        self.0.release();
    }
}

struct ActiveLoop {
    generation: u64,
    token: Arc<LoopToken>,
    handle: JoinHandle<()>,
}

enum Playhead {
    Chart { index: usize },
    Scene { cursor: SharedCursor },
}

impl Playhead {
    fn position(&self) -> (usize, Option<DateTime<Tz>>) {
        match self {
            Self::Chart { index } => (*index, None),
            Self::Scene { cursor } => {
                let cursor = cursor.lock();
                (cursor.minute_index(), Some(*cursor.current()))
            }
        }
    }

    /// Step forward unless the loop was cancelled. The scene checks the
    /// token under the cursor lock, so a tick can never land after the reset
    /// done by [`AnimationScheduler::restart`].
    fn advance(&mut self, len: usize, token: &LoopToken) {
        match self {
            Self::Chart { index } => {
                *index += 1;
                if *index >= len {
                    *index = 0;
                }
            }
            Self::Scene { cursor } => {
                let mut cursor = cursor.lock();
                if !token.is_cancelled() {
                    cursor.tick();
                }
            }
        }
    }
}

// ==================== Scheduler ====================

/// Owner of at most one animation loop for one surface.
pub struct AnimationScheduler {
    kind: SurfaceKind,
    surface: Option<SharedSurface>,
    host: FrameHost,
    active: Option<ActiveLoop>,
    live: Arc<AtomicUsize>,
}

impl AnimationScheduler {
    /// A scheduler without a surface stays idle; the other surfaces are
    /// unaffected.
    pub fn new(kind: SurfaceKind, surface: Option<SharedSurface>, host: FrameHost) -> Self {
        if surface.is_none() {
            error!(
                "Render target for the {} is missing, its animation will not start",
                kind.name()
            );
        }
        Self {
            kind,
            surface,
            host,
            active: None,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.handle.is_finished())
    }

    /// Generation of the samples the running loop renders.
    pub fn generation(&self) -> Option<u64> {
        self.active.as_ref().map(|active| active.generation)
    }

    /// Loops of this surface that may still render.
    pub fn live_loops(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Stop the running loop. Calling this without a running loop is a no-op.
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            active.token.cancel();
            active.handle.abort();
            debug!(
                "Cancelled {} loop for generation {}",
                self.kind.name(),
                active.generation
            );
        }
    }

    /// Cancel the current loop, then start a new one at index 0 over the
    /// given samples. The scene cursor is rewound together with the cancel,
    /// since a loop that is mid-render cannot be interrupted.
    pub fn restart(&mut self, regeneration: &Regeneration, cursor: &SharedCursor) {
        match self.kind {
            SurfaceKind::Chart => self.cancel(),
            SurfaceKind::Scene => {
                let mut guard = cursor.lock();
                self.cancel();
                guard.reset();
            }
        }
        let Some(surface) = self.surface.clone() else {
            return;
        };

        let playhead = match self.kind {
            SurfaceKind::Chart => Playhead::Chart { index: 0 },
            SurfaceKind::Scene => Playhead::Scene {
                cursor: cursor.clone(),
            },
        };
        let token = LoopToken::new(self.live.clone());
        let handle = tokio::spawn(run_loop(
            regeneration.generation,
            regeneration.samples.clone(),
            playhead,
            surface,
            self.host.frames(),
            token.clone(),
        ));
        debug!(
            "Started {} loop for generation {}",
            self.kind.name(),
            regeneration.generation
        );
        self.active = Some(ActiveLoop {
            generation: regeneration.generation,
            token,
            handle,
        });
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_loop(
    generation: u64,
    samples: Arc<DaySampleSet>,
    mut playhead: Playhead,
    surface: SharedSurface,
    mut frames: FrameSignal,
    token: Arc<LoopToken>,
) {
    let _release = ReleaseOnDrop(token.clone());
    while frames.next_frame().await {
        if token.is_cancelled() {
            break;
        }
        let (index, instant) = playhead.position();
        let frame = Frame {
            generation,
            index,
            samples: &samples,
            instant,
        };
        surface
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .render(&frame);
        if token.is_cancelled() {
            break;
        }
        playhead.advance(samples.len(), &token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_released_once() {
        let live = Arc::new(AtomicUsize::new(0));
        let token = LoopToken::new(live.clone());
        assert_eq!(live.load(Ordering::SeqCst), 1);

        token.cancel();
        token.cancel();
        drop(ReleaseOnDrop(token.clone()));
        assert_eq!(live.load(Ordering::SeqCst), 0);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_chart_playhead_wraps_to_zero() {
        let mut playhead = Playhead::Chart { index: 0 };
        let live = Arc::new(AtomicUsize::new(0));
        let token = LoopToken::new(live);
        for _ in 0..1439 {
            playhead.advance(1440, &token);
        }
        assert_eq!(playhead.position().0, 1439);
        playhead.advance(1440, &token);
        assert_eq!(playhead.position().0, 0);
    }

    #[test]
    fn test_cancelled_scene_does_not_tick() {
        use crate::time_cursor::TimeCursor;
        use chrono::NaiveDate;

        let date = NaiveDate::from_ymd_opt(2026, 6, 21).unwrap();
        let cursor = SharedCursor::new(TimeCursor::new(date, chrono_tz::Europe::Vienna));
        let token = LoopToken::new(Arc::new(AtomicUsize::new(0)));
        let mut playhead = Playhead::Scene {
            cursor: cursor.clone(),
        };

        playhead.advance(1440, &token);
        assert_eq!(cursor.snapshot().minute_index(), 1);
        token.cancel();
        playhead.advance(1440, &token);
        assert_eq!(cursor.snapshot().minute_index(), 1);
    }
}
