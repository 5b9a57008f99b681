//! Rate- and time-budget-limited scanning.
//!
//! Some state can only be found by searching the target's heap (the HUD
//! report button, for instance), and that search has no useful worst-case
//! bound. [`ScanThrottle`] caps both how often such a scan starts and how
//! long one run may take.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use shipview_cache::SharedClock;
use tracing::{debug, trace};

/// Result of one bounded scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialScan<R> {
    pub result: R,
    /// The scan stopped before examining every candidate. The result may be
    /// incomplete but is not necessarily wrong.
    pub truncated: bool,
    /// Candidates examined before the scan returned.
    pub examined: usize,
}

impl<R> PartialScan<R> {
    /// A scan that examined every candidate.
    pub fn complete(result: R, examined: usize) -> Self {
        Self {
            result,
            truncated: false,
            examined,
        }
    }

    /// A scan cut short by its budget.
    pub fn truncated(result: R, examined: usize) -> Self {
        Self {
            result,
            truncated: true,
            examined,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(R) -> U) -> PartialScan<U> {
        PartialScan {
            result: f(self.result),
            truncated: self.truncated,
            examined: self.examined,
        }
    }
}

/// Wall-clock allowance handed to a running scan.
///
/// Scans are cooperative: they check [`is_exhausted`](Self::is_exhausted)
/// between candidates, or let [`find_map`](Self::find_map) drive the loop.
#[derive(Debug, Clone)]
pub struct ScanBudget {
    started: Instant,
    limit: Duration,
    clock: SharedClock,
}

impl ScanBudget {
    /// A budget starting now.
    pub fn new(limit: Duration, clock: SharedClock) -> Self {
        let started = clock.now();
        Self {
            started,
            limit,
            clock,
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.started)
    }

    pub fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.elapsed())
    }

    /// Elapsed time has passed the limit; stop examining candidates.
    pub fn is_exhausted(&self) -> bool {
        self.elapsed() > self.limit
    }

    /// Examine `candidates` in order until `examine` yields a result or the
    /// budget runs out.
    pub fn find_map<I, F, T>(&self, candidates: I, mut examine: F) -> PartialScan<Option<T>>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Option<T>,
    {
        let mut examined = 0;
        for candidate in candidates {
            if self.is_exhausted() {
                return PartialScan::truncated(None, examined);
            }
            examined += 1;
            if let Some(found) = examine(candidate) {
                return PartialScan::complete(Some(found), examined);
            }
        }
        PartialScan::complete(None, examined)
    }
}

/// What a call to [`ScanThrottle::scan_if_due`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome<R> {
    /// A scan ran.
    Ran(PartialScan<R>),
    /// Too soon after the previous scan, or one is already running. Carries
    /// the last completed scan, if any.
    Skipped { last: Option<PartialScan<R>> },
}

impl<R> ScanOutcome<R> {
    pub fn ran(&self) -> bool {
        matches!(self, ScanOutcome::Ran(_))
    }

    /// The scan that ran, or the last known one.
    pub fn into_latest(self) -> Option<PartialScan<R>> {
        match self {
            ScanOutcome::Ran(scan) => Some(scan),
            ScanOutcome::Skipped { last } => last,
        }
    }
}

struct ScanState<R> {
    last_scan: Option<Instant>,
    min_interval: Duration,
    time_budget: Duration,
    last_result: Option<PartialScan<R>>,
}

/// Gate for an expensive scan: minimum spacing between runs plus a time
/// budget per run.
pub struct ScanThrottle<R> {
    name: &'static str,
    clock: SharedClock,
    state: Mutex<ScanState<R>>,
    running: Mutex<()>,
}

impl<R: Clone> ScanThrottle<R> {
    pub fn new(
        name: &'static str,
        min_interval: Duration,
        time_budget: Duration,
        clock: SharedClock,
    ) -> Self {
        Self {
            name,
            clock,
            state: Mutex::new(ScanState {
                last_scan: None,
                min_interval,
                time_budget,
                last_result: None,
            }),
            running: Mutex::new(()),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.state.lock().min_interval
    }

    pub fn time_budget(&self) -> Duration {
        self.state.lock().time_budget
    }

    /// Update pacing; `None` leaves a setting unchanged.
    pub fn configure(&self, min_interval: Option<Duration>, time_budget: Option<Duration>) {
        let mut state = self.state.lock();
        if let Some(interval) = min_interval {
            state.min_interval = interval;
        }
        if let Some(budget) = time_budget {
            state.time_budget = budget;
        }
        debug!(
            scan = self.name,
            min_interval_ms = state.min_interval.as_millis() as u64,
            time_budget_ms = state.time_budget.as_millis() as u64,
            "Scan throttle configured"
        );
    }

    /// Forget when the last scan ran so the next call scans immediately.
    /// The last result is kept.
    pub fn reset(&self) {
        self.state.lock().last_scan = None;
    }

    pub fn last_result(&self) -> Option<PartialScan<R>> {
        self.state.lock().last_result.clone()
    }

    /// Run `perform` if at least `min_interval` has passed since the last
    /// scan started (or none has run yet).
    ///
    /// `perform` gets a [`ScanBudget`] and must stop once it is exhausted;
    /// the returned scan is marked truncated if it reported so itself or
    /// overran the budget.
    pub fn scan_if_due<F>(&self, perform: F) -> ScanOutcome<R>
    where
        F: FnOnce(&ScanBudget) -> PartialScan<R>,
    {
        let Some(_running) = self.running.try_lock() else {
            trace!(scan = self.name, "Scan already in flight, skipping");
            return ScanOutcome::Skipped {
                last: self.last_result(),
            };
        };

        let now = self.clock.now();
        let limit = {
            let state = self.state.lock();
            if let Some(last) = state.last_scan
                && now.saturating_duration_since(last) < state.min_interval
            {
                trace!(scan = self.name, "Scan not due yet");
                return ScanOutcome::Skipped {
                    last: state.last_result.clone(),
                };
            }
            state.time_budget
        };

        let budget = ScanBudget::new(limit, self.clock.clone());
        let mut scan = perform(&budget);
        if budget.is_exhausted() {
            scan.truncated = true;
        }
        debug!(
            scan = self.name,
            examined = scan.examined,
            truncated = scan.truncated,
            elapsed_ms = budget.elapsed().as_millis() as u64,
            "Scan finished"
        );

        let mut state = self.state.lock();
        state.last_scan = Some(now);
        state.last_result = Some(scan.clone());
        ScanOutcome::Ran(scan)
    }
}
