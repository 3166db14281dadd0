//! # Telemetry Blackboard
//!
//! Thread-safe progress tracking for loading, grouping and enumeration runs.
//! Uses atomic counters that can be cheaply updated from rayon parallel iterators.
//!
//! The blackboard pattern decouples work execution from progress reporting:
//! - Worker threads update atomic counters with minimal overhead
//! - A background heartbeat thread periodically reads and reports progress

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Processing stage for high-level progress tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Stage {
    Initializing = 0,
    LoadingData = 1,
    Grouping = 2,
    Enumerating = 3,
    WritingOutput = 4,
    Complete = 5,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Initializing => "Initializing",
            Stage::LoadingData => "Loading Data",
            Stage::Grouping => "Grouping",
            Stage::Enumerating => "Enumerating",
            Stage::WritingOutput => "Writing Output",
            Stage::Complete => "Complete",
        }
    }

    fn from_u64(val: u64) -> Self {
        match val {
            0 => Stage::Initializing,
            1 => Stage::LoadingData,
            2 => Stage::Grouping,
            3 => Stage::Enumerating,
            4 => Stage::WritingOutput,
            _ => Stage::Complete,
        }
    }
}

/// Global telemetry state - designed for cheap atomic updates from hot loops.
///
/// All fields use relaxed ordering since we only need eventual visibility,
/// not strict synchronization. The heartbeat thread reads approximate values.
pub struct TelemetryBlackboard {
    // --- Macro Progress (Stage) ---
    stage: AtomicU64,

    // --- Meso Progress (profiles) ---
    profiles_done: AtomicU64,
    total_profiles: AtomicU64,

    // --- Micro Progress ---
    path_sets: AtomicU64,
    segments_loaded: AtomicU64,

    // --- Timing ---
    start_time: Instant,
    last_progress_nanos: AtomicU64,

    // --- Control ---
    shutdown: AtomicBool,
}

impl TelemetryBlackboard {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // === Stage Updates ===

    #[inline]
    pub fn set_stage(&self, stage: Stage) {
        self.stage.store(stage as u64, Ordering::Relaxed);
        self.touch_progress();
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        Stage::from_u64(self.stage.load(Ordering::Relaxed))
    }

    // === Counters ===

    pub fn set_total_profiles(&self, total: u64) {
        self.total_profiles.store(total, Ordering::Relaxed);
        self.profiles_done.store(0, Ordering::Relaxed);
    }

    #[inline]
    pub fn profile_done(&self) {
        self.profiles_done.fetch_add(1, Ordering::Relaxed);
        self.touch_progress();
    }

    #[inline]
    pub fn add_path_sets(&self, n: u64) {
        self.path_sets.fetch_add(n, Ordering::Relaxed);
        self.touch_progress();
    }

    #[inline]
    pub fn add_segments(&self, n: u64) {
        self.segments_loaded.fetch_add(n, Ordering::Relaxed);
        self.touch_progress();
    }

    pub fn profiles_done(&self) -> u64 {
        self.profiles_done.load(Ordering::Relaxed)
    }

    pub fn path_sets(&self) -> u64 {
        self.path_sets.load(Ordering::Relaxed)
    }

    pub fn segments_loaded(&self) -> u64 {
        self.segments_loaded.load(Ordering::Relaxed)
    }

    // === Timing ===

    #[inline]
    fn touch_progress(&self) {
        let elapsed = self.start_time.elapsed().as_nanos() as u64;
        self.last_progress_nanos.store(elapsed, Ordering::Relaxed);
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    // === Snapshot for Heartbeat ===

    fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            stage: self.stage(),
            profiles_done: self.profiles_done(),
            total_profiles: self.total_profiles.load(Ordering::Relaxed),
            path_sets: self.path_sets(),
            segments_loaded: self.segments_loaded(),
            elapsed_secs: self.elapsed_secs(),
            last_progress_nanos: self.last_progress_nanos.load(Ordering::Relaxed),
            current_nanos: self.start_time.elapsed().as_nanos() as u64,
        }
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

impl Default for TelemetryBlackboard {
    fn default() -> Self {
        Self {
            stage: AtomicU64::new(Stage::Initializing as u64),
            profiles_done: AtomicU64::new(0),
            total_profiles: AtomicU64::new(0),
            path_sets: AtomicU64::new(0),
            segments_loaded: AtomicU64::new(0),
            start_time: Instant::now(),
            last_progress_nanos: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        }
    }
}

/// Snapshot of telemetry state at a point in time
struct TelemetrySnapshot {
    stage: Stage,
    profiles_done: u64,
    total_profiles: u64,
    path_sets: u64,
    segments_loaded: u64,
    elapsed_secs: f64,
    last_progress_nanos: u64,
    current_nanos: u64,
}

/// Heartbeat output configuration
pub struct HeartbeatConfig {
    /// Interval between heartbeats (seconds)
    pub interval_secs: u64,
    /// Stall warning threshold (seconds with no progress)
    pub stall_threshold_secs: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            stall_threshold_secs: 120,
        }
    }
}

/// Handle to the heartbeat thread
pub struct HeartbeatHandle {
    handle: Option<JoinHandle<()>>,
    blackboard: Arc<TelemetryBlackboard>,
}

impl HeartbeatHandle {
    /// Spawn the heartbeat thread
    pub fn spawn(blackboard: Arc<TelemetryBlackboard>, config: HeartbeatConfig) -> io::Result<Self> {
        let bb = blackboard.clone();
        let is_tty = io::stderr().is_terminal();

        let handle = thread::Builder::new()
            .name("heartbeat".to_string())
            .spawn(move || {
                heartbeat_loop(bb, config, is_tty);
            })?;

        Ok(Self {
            handle: Some(handle),
            blackboard,
        })
    }

    /// Signal shutdown and wait for thread to finish
    pub fn shutdown(mut self) {
        self.blackboard.signal_shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for HeartbeatHandle {
    fn drop(&mut self) {
        // Don't block in drop
        self.blackboard.signal_shutdown();
    }
}

/// Format duration in human-readable form
fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.0}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{:.0}m{:.0}s", mins, remaining_secs)
    } else {
        format!("{:.1}h", secs / 3600.0)
    }
}

fn heartbeat_loop(bb: Arc<TelemetryBlackboard>, config: HeartbeatConfig, is_tty: bool) {
    let interval = Duration::from_secs(config.interval_secs.max(1));
    let mut last_sets = 0u64;
    let mut last_time = Instant::now();

    loop {
        thread::sleep(interval);

        if bb.is_shutdown() {
            break;
        }

        let snap = bb.snapshot();

        let now = Instant::now();
        let dt = now.duration_since(last_time).as_secs_f64();
        let velocity = if dt > 0.1 {
            snap.path_sets.saturating_sub(last_sets) as f64 / dt
        } else {
            0.0
        };
        last_sets = snap.path_sets;
        last_time = now;

        let stall_secs =
            (snap.current_nanos.saturating_sub(snap.last_progress_nanos)) / 1_000_000_000;
        let is_stalled = stall_secs > config.stall_threshold_secs;

        if is_tty {
            print_tty_progress(&snap, velocity, is_stalled);
        } else {
            print_log_progress(&snap, velocity, is_stalled);
        }
    }

    if is_tty {
        eprint!("\r\x1b[K");
        let _ = io::stderr().flush();
    }
}

/// Print progress for TTY (rewriting single line)
fn print_tty_progress(snap: &TelemetrySnapshot, velocity: f64, is_stalled: bool) {
    let progress_pct = if snap.total_profiles > 0 {
        (snap.profiles_done as f64 / snap.total_profiles as f64 * 100.0).min(100.0)
    } else {
        0.0
    };

    let bar_width = 20;
    let filled = ((progress_pct / 100.0) * bar_width as f64) as usize;
    let bar: String = "=".repeat(filled.min(bar_width))
        + &" ".repeat(bar_width.saturating_sub(filled));
    let stall_str = if is_stalled { " [STALLED]" } else { "" };

    eprint!(
        "\r[{}] {:>5.1}% | {} P{}/{} | {:.0} sets/s | {}{}    \x1b[K",
        bar,
        progress_pct,
        snap.stage.as_str(),
        snap.profiles_done,
        snap.total_profiles,
        velocity,
        format_duration(snap.elapsed_secs),
        stall_str
    );
    let _ = io::stderr().flush();
}

/// Print progress for non-TTY (structured log line)
fn print_log_progress(snap: &TelemetrySnapshot, velocity: f64, is_stalled: bool) {
    eprintln!(
        "[HEARTBEAT] stage=\"{}\" profiles={}/{} path_sets={} segments={} \
         velocity={:.0}/s elapsed={:.0}s stalled={}",
        snap.stage.as_str(),
        snap.profiles_done,
        snap.total_profiles,
        snap.path_sets,
        snap.segments_loaded,
        velocity,
        snap.elapsed_secs,
        is_stalled
    );
}
