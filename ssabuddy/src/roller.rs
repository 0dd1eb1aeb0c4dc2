//! The roll controller: one worker thread sequencing action, perception,
//! extraction and matching until a target is satisfied or the operator
//! cancels.
//!
//! The loop is deliberately self-correcting instead of retrying: any failed
//! or unreadable capture just skips the cycle's matching, because the next
//! cycle re-captures fresh state anyway. Nothing here is fatal; the worst
//! outcome is a loop that only a cancel or a match will end.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

use extract::{Extractor, Reading};
use lexicon::Target;

use crate::config::Config;
use crate::interface::{ActionInterface, PerceptionInterface};
use crate::odds::{self, OddsEstimate};
use crate::matcher;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum StopReason {
    UserCancelled,
    TargetFound { target_index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum RunState {
    Idle,
    Running,
    Stopped(StopReason),
}

/// Running counters for the current (or last) run.
///
/// Written once per cycle by the worker, read as a snapshot by observers.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct RunStatistics {
    pub roll_count: u64,
    pub average_cycle_secs: f64,
    pub estimated_remaining_secs: f64,
    pub estimated_spend: f64,
}

/// One capture-and-extract pass without rolling, for calibrating the scan
/// region and lexicon against whatever is on screen right now.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub raw_text: String,
    pub reading: Reading,
    /// Index of the target this reading would already satisfy, if any.
    pub matched: Option<usize>,
}

/// Trial mode, fixed for a whole run. Rerolling both passive slots uses a
/// different accept control and a higher price than rerolling one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrialMode {
    Single,
    Double,
}

struct Shared {
    state: Mutex<RunState>,
    stats: Mutex<RunStatistics>,
    cancel: AtomicBool,
}

/// The roll controller. Owns the target list, the extractor and all run
/// state; the rest of the application only ever talks to this type.
pub struct Roller {
    config: Config,
    targets: Vec<Target>,
    extractor: Arc<Extractor>,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Roller {
    pub fn new(config: Config) -> Self {
        Self::with_extractor(config, Extractor::standard())
    }

    pub fn with_extractor(config: Config, extractor: Extractor) -> Self {
        Self {
            config,
            targets: Vec::new(),
            extractor: Arc::new(extractor),
            shared: Arc::new(Shared {
                state: Mutex::new(RunState::Idle),
                stats: Mutex::new(RunStatistics::default()),
                cancel: AtomicBool::new(false),
            }),
            worker: None,
        }
    }

    /// Replace the active target list. Targets are immutable during a run,
    /// so this is rejected while the worker is alive.
    pub fn set_targets(&mut self, targets: Vec<Target>) -> Result<()> {
        if matches!(self.state(), RunState::Running) {
            bail!("targets cannot change while a run is in progress");
        }
        self.targets = targets;
        Ok(())
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Start the reroll loop on a fresh worker thread.
    ///
    /// Picks the trial mode once for the whole run: double iff any target
    /// requires two passives.
    pub fn start(
        &mut self,
        action: Box<dyn ActionInterface>,
        perception: Box<dyn PerceptionInterface>,
    ) -> Result<()> {
        if matches!(self.state(), RunState::Running) {
            bail!("a run is already in progress");
        }
        if self.targets.is_empty() {
            bail!("no targets configured; the run could never stop");
        }
        // Reap the previous run's thread, if any.
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }

        let estimate = odds::estimate(&self.targets, &self.config);
        let mode = if self.targets.iter().any(Target::wants_double_roll) {
            TrialMode::Double
        } else {
            TrialMode::Single
        };

        self.shared.cancel.store(false, Ordering::Relaxed);
        *self.shared.stats.lock().expect("stats lock poisoned") = RunStatistics::default();
        *self.shared.state.lock().expect("state lock poisoned") = RunState::Running;

        let worker = Worker {
            config: self.config.clone(),
            targets: self.targets.clone(),
            extractor: self.extractor.clone(),
            shared: self.shared.clone(),
            estimate,
            mode,
            action,
            perception,
        };
        self.worker = Some(std::thread::spawn(move || worker.run()));
        Ok(())
    }

    /// Request cancellation. Cooperative: the worker notices at its per-cycle
    /// checkpoint, so the latency bound is one cycle's action plus perception
    /// time.
    pub fn stop(&self) {
        self.shared.cancel.store(true, Ordering::Relaxed);
    }

    /// Block until the worker exits and return the final state.
    pub fn wait(&mut self) -> RunState {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("roll worker panicked");
            }
        }
        self.state()
    }

    pub fn state(&self) -> RunState {
        *self.shared.state.lock().expect("state lock poisoned")
    }

    /// Snapshot of the running statistics. Copy-on-read; the worker is the
    /// sole writer.
    pub fn statistics(&self) -> RunStatistics {
        *self.shared.stats.lock().expect("stats lock poisoned")
    }

    /// Odds of the currently configured target list.
    pub fn estimate_odds(&self) -> OddsEstimate {
        odds::estimate(&self.targets, &self.config)
    }

    /// Capture and extract once without rolling.
    pub fn probe(&self, perception: &mut dyn PerceptionInterface) -> Result<ProbeReport> {
        let raw_text = perception
            .capture_region(self.config.scan_region)
            .context("probe capture failed")?;
        let reading = self.extractor.extract(&raw_text);
        let matched = matcher::first_match(&reading, &self.targets);
        Ok(ProbeReport {
            raw_text,
            reading,
            matched,
        })
    }
}

impl Drop for Roller {
    fn drop(&mut self) {
        // Let a still-running worker wind down on its own; it holds only
        // clones of the shared state.
        self.stop();
    }
}

struct Worker {
    config: Config,
    targets: Vec<Target>,
    extractor: Arc<Extractor>,
    shared: Arc<Shared>,
    estimate: OddsEstimate,
    mode: TrialMode,
    action: Box<dyn ActionInterface>,
    perception: Box<dyn PerceptionInterface>,
}

impl Worker {
    fn run(mut self) {
        tracing::info!(
            targets = self.targets.len(),
            mode = ?self.mode,
            probability = self.estimate.combined_probability,
            "run started"
        );
        let started = Instant::now();

        loop {
            // The only cancellation checkpoint. Checking between cycles (and
            // nowhere else) keeps each action/perception pair atomic.
            if self.shared.cancel.load(Ordering::Relaxed) {
                tracing::info!("run cancelled");
                self.finish(StopReason::UserCancelled);
                return;
            }

            let matched = self.cycle();
            self.update_stats(started.elapsed());

            if let Some(target_index) = matched {
                tracing::info!(target_index, "target satisfied");
                self.finish(StopReason::TargetFound { target_index });
                return;
            }
        }
    }

    /// One cycle: reroll, accept, settle, capture, extract, match.
    ///
    /// Returns the matched target index, or `None` for both "no match" and
    /// "nothing readable this cycle".
    fn cycle(&mut self) -> Option<usize> {
        if let Err(err) = self.action.perform_reroll() {
            tracing::warn!(error = %err, "reroll input failed");
        }
        sleep_secs(self.config.roll_settle_s);

        let button = match self.mode {
            TrialMode::Single => self.config.single_roll_button,
            TrialMode::Double => self.config.double_roll_button,
        };
        if let Err(err) = self.action.click_point(button) {
            tracing::warn!(error = %err, "accept click failed");
        }
        sleep_secs(self.config.accept_settle_s);

        let raw = match self.perception.capture_region(self.config.scan_region) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "capture failed; skipping cycle");
                return None;
            }
        };
        if raw.trim().len() < self.config.min_text_len {
            tracing::debug!(len = raw.len(), "raw text too short; treating as failed capture");
            return None;
        }

        let reading = self.extractor.extract(&raw);
        tracing::debug!(?reading, "cycle reading");
        matcher::first_match(&reading, &self.targets)
    }

    fn update_stats(&self, elapsed: Duration) {
        let mut stats = self.shared.stats.lock().expect("stats lock poisoned");
        stats.roll_count += 1;
        stats.average_cycle_secs = elapsed.as_secs_f64() / stats.roll_count as f64;
        stats.estimated_remaining_secs = self.estimate.expected_trials * stats.average_cycle_secs;
        stats.estimated_spend = stats.roll_count as f64 * self.estimate.cost_per_trial;
    }

    fn finish(&self, reason: StopReason) {
        *self.shared.state.lock().expect("state lock poisoned") = RunState::Stopped(reason);
    }
}

fn sleep_secs(secs: f32) {
    if secs > 0.0 {
        std::thread::sleep(Duration::from_secs_f32(secs));
    }
}
