//! aqua: a scripted drone show against a synthetic arena.
//!
//! Thirty-two drones spawn two per tick.  While the roster fills up they are
//! parked in a line; once everyone is present the show hides the ball and
//! runs four sub-groups in parallel: a posed formation that then drives to
//! centre field, a tunnel of sixteen staggered launches and a tidy-up group.
//!
//! Usage: `aqua [config.json]`.  Any `ChoreoConfig` field can be set in the
//! JSON file; missing fields keep their defaults.  `RUST_LOG=debug` shows
//! step and branch transitions.

mod arena;
mod show;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use dc_choreo::{ChoreoConfig, ChoreoObserver, ChoreographyBuilder, SnapshotSource, TickOutcome, TimeoutPolicy};
use dc_core::{DroneId, Tick};
use dc_drone::DroneRegistryBuilder;
use dc_output::{CsvWriter, OutputRecorder, OutputWriter};
use dc_step::{StepFailure, Step};

use arena::Arena;
use show::{AquaScript, DRONE_COUNT, LineUp};

// ── Constants ─────────────────────────────────────────────────────────────────

const TICK_RATE_HZ:   u32 = 120;
const SPAWN_PER_TICK: usize = 2;
const MAX_WAIT_SECS:  u64 = 30;
const SHOW_SECS:      u64 = 25;
const OUTPUT_DIR:     &str = "output/aqua";

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:        OutputRecorder<W>,
    summary_rows: usize,
    failures:     usize,
    rebuilds:     usize,
    finished_at:  Option<Tick>,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: OutputRecorder<W>) -> Self {
        Self { inner, summary_rows: 0, failures: 0, rebuilds: 0, finished_at: None }
    }
}

impl<W: OutputWriter> ChoreoObserver for CountingObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, outcome: &TickOutcome, failures: usize) {
        self.summary_rows += 1;
        self.inner.on_tick_end(tick, outcome, failures);
    }

    fn on_step_failure(&mut self, failure: &StepFailure) {
        self.failures += 1;
        eprintln!("step failure: {failure}");
    }

    fn on_rebuild(&mut self, tick: Tick, roster: &[DroneId]) {
        self.rebuilds += 1;
        tracing::info!(tick = tick.0, drones = roster.len(), "sequence rebuilt");
    }

    fn on_gate_timeout(&mut self, tick: Tick, waited: u64) {
        tracing::warn!(tick = tick.0, waited, "gave up waiting for the full roster");
    }

    fn on_finished(&mut self, tick: Tick) {
        self.finished_at = Some(tick);
    }
}

fn load_config() -> Result<ChoreoConfig> {
    if let Some(path) = std::env::args().nth(1) {
        let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
        return serde_json::from_str(&text).with_context(|| format!("parsing {path}"));
    }
    Ok(ChoreoConfig {
        tick_rate_hz:    TICK_RATE_HZ,
        expected_drones: DRONE_COUNT,
        max_wait_ticks:  Some(MAX_WAIT_SECS * u64::from(TICK_RATE_HZ)),
        on_timeout:      TimeoutPolicy::Proceed,
        max_ticks:       Some(SHOW_SECS * u64::from(TICK_RATE_HZ)),
        ..ChoreoConfig::default()
    })
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    let config = load_config()?;
    let max_ticks = config.max_ticks.unwrap_or(u64::MAX);

    println!("=== aqua: scripted drone show ===");
    println!(
        "Drones: {}  |  Rate: {} Hz  |  Spawn: {SPAWN_PER_TICK}/tick",
        config.expected_drones, config.tick_rate_hz
    );
    println!();

    // 1. Registry claims every drone the arena will spawn.
    let registry = DroneRegistryBuilder::new()
        .capacity(DRONE_COUNT)
        .claim((0..DRONE_COUNT as u32).map(DroneId))
        .build();

    // 2. Driver.
    let mut show = ChoreographyBuilder::new(config, AquaScript::new(DRONE_COUNT))
        .registry(registry)
        .staging(Step::drone_list("line up", LineUp))
        .build()?;
    let clock = show.clock();

    // 3. Host and output.
    let mut arena = Arena::new(clock, DRONE_COUNT, SPAWN_PER_TICK, max_ticks);
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver::new(OutputRecorder::new(writer));

    // 4. Run.
    let t0 = Instant::now();
    let mut last = None;
    let mut ticks = 0u64;
    while ticks < max_ticks {
        let Some(snapshot) = arena.next_snapshot() else { break };
        let outcome = show.tick(&snapshot, &mut arena, &mut obs)?;
        show.emit(&mut obs.inner);
        show.emit(&mut arena);
        ticks += 1;
        last = Some(outcome);
        if outcome.is_terminal() {
            break;
        }
    }
    let elapsed = t0.elapsed();

    obs.inner.finish();
    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!("Ran {ticks} ticks ({:.2} s of show) in {:.3} s", clock.secs(ticks), elapsed.as_secs_f64());
    match last {
        Some(outcome) => println!("  outcome             : {outcome}"),
        None => println!("  outcome             : -"),
    }
    println!("  status              : {}", show.status().timeline);
    match obs.finished_at {
        Some(tick) => println!("  finished at         : tick {}", tick.0),
        None => println!("  finished at         : -"),
    }
    println!("  step failures       : {}", obs.failures);
    println!("  rebuilds            : {}", obs.rebuilds);
    println!("  teleports           : {}", arena.teleports());
    println!("  last host clock     : {:.2} s", show.script().last_seconds());
    println!("  tick_summaries.csv  : {} rows", obs.summary_rows);
    println!();

    // 6. Final drone poses.
    println!("{:<8} {:>9} {:>9} {:>8}", "Drone", "x", "y", "speed");
    println!("{}", "-".repeat(37));
    for (id, position, speed) in arena.poses() {
        println!("{:<8} {:>9.1} {:>9.1} {:>8.1}", id.0, position.x, position.y, speed);
    }

    Ok(())
}
