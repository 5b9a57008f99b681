//! Refresh orchestration across all cached categories.
//!
//! [`RefreshOrchestrator`] owns one [`CategoryCache`] per category, the
//! pointer map behind the fast coordinate path and the HUD scan throttle.
//! Every read the rest of the system makes goes through it, so it is the
//! single place that decides when the collaborator gets called.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use shipview_cache::{
    CacheStats, CategoryCache, Freshness, Lookup, PointerMap, PointerMapCache, SharedClock,
    SystemClock,
};
use shipview_config::{Timings, ViewConfig, defaults, seconds_to_duration};
use shipview_types::{
    Category, ColorId, Handle, HudStatus, PlayerId, PlayerRecord, Position, ReadFailure,
    ReadResult, TaskRecord,
};
use tracing::{debug, info, warn};

use crate::classifier::{SessionClassifier, SessionReport, SessionSignals};
use crate::error::Result;
use crate::reader::GameReader;
use crate::throttle::{PartialScan, ScanOutcome, ScanThrottle};
use crate::value::CategoryValue;

/// Dropped handles in one fast-path pass that trigger a full map rebuild.
const REBUILD_AFTER_DROPPED: usize = 2;

/// Outcome of one [`RefreshOrchestrator::refresh`] call.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    /// Categories whose collaborator read succeeded in this call.
    pub refreshed: BTreeSet<Category>,
    /// Categories whose collaborator read failed in this call.
    pub failed: BTreeMap<Category, ReadFailure>,
    /// Categories that were due but not read by this call: a throttled HUD
    /// scan, or a concurrent caller's refresh served instead. Their cached
    /// entries are left as they were.
    pub skipped: BTreeSet<Category>,
    /// Freshness of every requested category after the call.
    pub freshness: BTreeMap<Category, Freshness>,
    pub completed_at: DateTime<Utc>,
}

impl RefreshReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Coordinates refresh, invalidation and snapshots for every category.
pub struct RefreshOrchestrator<R> {
    reader: R,
    caches: [CategoryCache<CategoryValue>; 5],
    pointers: PointerMapCache,
    hud_scan: ScanThrottle<HudStatus>,
    classifier: SessionClassifier,
    last_position_count: AtomicUsize,
}

impl<R: GameReader> RefreshOrchestrator<R> {
    /// Create an orchestrator with default timings and the system clock.
    pub fn new(reader: R) -> Self {
        Self::with_timings(reader, Timings::default(), Arc::new(SystemClock))
    }

    /// Create an orchestrator from a loaded config.
    pub fn from_config(reader: R, config: &ViewConfig) -> Result<Self> {
        Ok(Self::with_timings(
            reader,
            config.timings()?,
            Arc::new(SystemClock),
        ))
    }

    /// Create an orchestrator with explicit timings and clock.
    pub fn with_timings(reader: R, timings: Timings, clock: SharedClock) -> Self {
        let caches = Category::ALL
            .map(|category| CategoryCache::new(category.as_str(), timings.ttl(category), clock.clone()));

        Self {
            reader,
            caches,
            pointers: PointerMapCache::new(timings.pointer_map_ttl, clock.clone()),
            hud_scan: ScanThrottle::new(
                "hud",
                timings.hud_min_interval,
                timings.hud_time_budget,
                clock,
            ),
            classifier: SessionClassifier::new(),
            last_position_count: AtomicUsize::new(0),
        }
    }

    /// The collaborator this orchestrator reads through.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    fn cache(&self, category: Category) -> &CategoryCache<CategoryValue> {
        &self.caches[category as usize]
    }

    // ─────────────────────────────────────────────────────────────────────
    // Category pipeline
    // ─────────────────────────────────────────────────────────────────────

    /// Read one category, refreshing it if forced, empty or past its TTL.
    pub fn get(&self, category: Category, force: bool) -> Lookup<CategoryValue> {
        let lookup = self
            .cache(category)
            .get_or_refresh_with(force, || self.fetch(category));

        if lookup.fetched
            && let Some(failure) = &lookup.failure
        {
            warn!(
                category = %category,
                error = %failure,
                freshness = ?lookup.freshness,
                "Category read failed"
            );
        }

        lookup
    }

    /// `None` when the read was declined and the cached entry should stand.
    fn fetch(&self, category: Category) -> Option<ReadResult<CategoryValue>> {
        let result = match category {
            Category::Players => self.reader.read_players().map(CategoryValue::Players),
            Category::Colors => self.reader.read_colors().map(CategoryValue::Colors),
            Category::Tasks => self.reader.read_tasks().map(CategoryValue::Tasks),
            Category::Session => self.reader.read_session_probe().map(CategoryValue::Session),
            Category::Hud => return self.scan_hud().map(|r| r.map(CategoryValue::Hud)),
        };
        Some(result)
    }

    fn scan_hud(&self) -> Option<ReadResult<PartialScan<HudStatus>>> {
        match self.hud_scan.scan_if_due(|budget| self.reader.scan_hud(budget)) {
            ScanOutcome::Ran(scan) => Some(Ok(scan)),
            // A replayed scan is not new information; keep the entry's age
            ScanOutcome::Skipped { last: Some(_) } => None,
            ScanOutcome::Skipped { last: None } => Some(Err(ReadFailure::ScanPending)),
        }
    }

    /// Refresh the listed categories. A failure in one category never stops
    /// the others; failures are collected in the report.
    pub fn refresh(
        &self,
        categories: impl IntoIterator<Item = Category>,
        force: bool,
    ) -> RefreshReport {
        let mut refreshed = BTreeSet::new();
        let mut failed = BTreeMap::new();
        let mut skipped = BTreeSet::new();
        let mut freshness = BTreeMap::new();

        for category in categories {
            let due = force || self.cache(category).is_due();
            let lookup = self.get(category, force);
            freshness.insert(category, lookup.freshness);
            match (lookup.fetched, lookup.failure) {
                (true, Some(failure)) => {
                    failed.insert(category, failure);
                }
                (true, None) => {
                    refreshed.insert(category);
                }
                (false, _) if due => {
                    skipped.insert(category);
                }
                (false, _) => {}
            }
        }

        debug!(
            refreshed = refreshed.len(),
            failed = failed.len(),
            skipped = skipped.len(),
            force,
            "Refresh round complete"
        );

        RefreshReport {
            refreshed,
            failed,
            skipped,
            freshness,
            completed_at: Utc::now(),
        }
    }

    /// Refresh every category.
    pub fn refresh_all(&self, force: bool) -> RefreshReport {
        self.refresh(Category::ALL, force)
    }

    /// Drop the cached values of the listed categories.
    ///
    /// Invalidating `hud` also resets the scan throttle, so the next access
    /// performs a fresh scan instead of replaying the last one.
    pub fn invalidate(&self, categories: impl IntoIterator<Item = Category>) {
        for category in categories {
            self.cache(category).invalidate();
            if category == Category::Hud {
                self.hud_scan.reset();
            }
        }
    }

    /// Drop every cached category value. The pointer map is left alone.
    pub fn invalidate_all(&self) {
        self.invalidate(Category::ALL);
    }

    /// Current cached values of the listed categories. Never calls the
    /// collaborator.
    pub fn snapshot(
        &self,
        categories: impl IntoIterator<Item = Category>,
    ) -> BTreeMap<Category, Lookup<CategoryValue>> {
        categories
            .into_iter()
            .map(|category| (category, self.cache(category).peek()))
            .collect()
    }

    /// Snapshot of every category.
    pub fn snapshot_all(&self) -> BTreeMap<Category, Lookup<CategoryValue>> {
        self.snapshot(Category::ALL)
    }

    /// Categories whose most recent collaborator read failed, as recorded
    /// by each category's cache.
    pub fn failed_categories(&self) -> BTreeMap<Category, ReadFailure> {
        Category::ALL
            .into_iter()
            .filter_map(|category| {
                self.cache(category)
                    .last_failure()
                    .map(|failure| (category, failure))
            })
            .collect()
    }

    pub fn stats(&self, category: Category) -> CacheStats {
        self.cache(category).stats()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────────────────

    pub fn ttl(&self, category: Category) -> Duration {
        self.cache(category).ttl()
    }

    /// Change a category's TTL. The cached value is kept; the new TTL applies
    /// from the next freshness check.
    pub fn configure(&self, category: Category, ttl: Duration) {
        self.cache(category).set_ttl(ttl);
        info!(category = %category, ttl_ms = ttl.as_millis() as u64, "Category TTL configured");
    }

    /// Change a category's TTL by name, in seconds.
    pub fn configure_named(&self, category: &str, seconds: f64) -> Result<()> {
        let category: Category = category.parse()?;
        let ttl = seconds_to_duration(category.as_str(), seconds)?;
        self.configure(category, ttl);
        Ok(())
    }

    /// Change HUD scan pacing; `None` leaves a setting unchanged. Values are
    /// clamped to the same bounds the config file uses.
    pub fn configure_hud(&self, min_interval: Option<Duration>, time_budget: Option<Duration>) {
        let min_interval =
            min_interval.map(|d| d.max(Duration::from_secs_f64(defaults::HUD_MIN_INTERVAL_FLOOR)));
        let time_budget = time_budget.map(|d| {
            d.clamp(
                Duration::from_secs_f64(defaults::HUD_TIME_BUDGET_FLOOR),
                Duration::from_secs_f64(defaults::HUD_TIME_BUDGET_CEILING),
            )
        });
        self.hud_scan.configure(min_interval, time_budget);
    }

    pub fn hud_pacing(&self) -> (Duration, Duration) {
        (self.hud_scan.min_interval(), self.hud_scan.time_budget())
    }

    /// Change the pointer map TTL, floored at 0.1 s.
    pub fn configure_pointer_map(&self, ttl: Duration) {
        let ttl = ttl.max(Duration::from_secs_f64(defaults::POINTER_MAP_TTL_FLOOR));
        self.pointers.set_ttl(ttl);
        info!(ttl_ms = ttl.as_millis() as u64, "Pointer map TTL configured");
    }

    pub fn pointer_map_ttl(&self) -> Duration {
        self.pointers.ttl()
    }

    pub fn invalidate_pointer_map(&self) {
        self.pointers.invalidate();
        self.last_position_count.store(0, Ordering::Relaxed);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Typed reads
    // ─────────────────────────────────────────────────────────────────────

    pub fn players(&self) -> Lookup<Vec<PlayerRecord>> {
        self.get(Category::Players, false)
            .and_then(CategoryValue::into_players)
    }

    pub fn player(&self, id: PlayerId) -> Option<PlayerRecord> {
        self.find_player(|p| p.id == id)
    }

    pub fn player_by_color(&self, color: ColorId) -> Option<PlayerRecord> {
        self.find_player(|p| p.color == Some(color))
    }

    pub fn local_player(&self) -> Option<PlayerRecord> {
        self.find_player(|p| p.is_local)
    }

    fn find_player(&self, predicate: impl FnMut(&PlayerRecord) -> bool) -> Option<PlayerRecord> {
        self.players().into_value()?.into_iter().find(predicate)
    }

    pub fn player_count(&self) -> Option<usize> {
        self.players().value().map(Vec::len)
    }

    pub fn colors(&self) -> Lookup<BTreeMap<PlayerId, ColorId>> {
        self.get(Category::Colors, false)
            .and_then(CategoryValue::into_colors)
    }

    pub fn tasks(&self) -> Lookup<BTreeMap<PlayerId, Vec<TaskRecord>>> {
        self.get(Category::Tasks, false)
            .and_then(CategoryValue::into_tasks)
    }

    /// Tasks of one player. A player with no readable task list gets an
    /// empty list.
    pub fn tasks_for(&self, id: PlayerId) -> Lookup<Vec<TaskRecord>> {
        self.tasks()
            .map(|mut tasks| tasks.remove(&id).unwrap_or_default())
    }

    /// HUD status from the throttled scan, with its truncation flag.
    pub fn hud(&self) -> Lookup<PartialScan<HudStatus>> {
        self.get(Category::Hud, false).and_then(CategoryValue::into_hud)
    }

    /// Whether the report button is enabled, if the HUD scan found it.
    pub fn report_active(&self) -> Option<bool> {
        self.hud()
            .into_value()
            .and_then(|scan| scan.result.report_button_active)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────

    /// Gather the current session signals.
    ///
    /// The probe goes through the `session` category (refreshed lazily); the
    /// HUD and player count come from whatever is cached and never trigger
    /// a read.
    pub fn session_signals(&self) -> SessionSignals {
        let probe = self
            .get(Category::Session, false)
            .and_then(CategoryValue::into_session)
            .into_value()
            .unwrap_or_default();
        let hud_visible = self
            .cache(Category::Hud)
            .peek()
            .and_then(CategoryValue::into_hud)
            .into_value()
            .map(|scan| scan.result.is_visible());
        let player_count = self
            .cache(Category::Players)
            .peek()
            .and_then(CategoryValue::into_players)
            .into_value()
            .map(|players| players.len());

        SessionSignals::from_probe(probe)
            .with_hud_visible(hud_visible)
            .with_player_count(player_count)
    }

    /// Classify the current session. Recomputed on every call.
    pub fn session(&self) -> SessionReport {
        self.classifier.classify(self.session_signals())
    }

    /// Map label while on a ship, otherwise the session state name.
    pub fn map_name(&self) -> String {
        self.session().label
    }

    // ─────────────────────────────────────────────────────────────────────
    // Fast coordinate path
    // ─────────────────────────────────────────────────────────────────────

    /// Positions of every player, read directly through cached handles.
    ///
    /// Only the pointer map is refreshed here, and the lookup carries its
    /// freshness and failure. If several handles fail or the readable player
    /// count collapses compared to the previous call, the map is rebuilt
    /// (at most once per pointer map TTL) and the positions re-read.
    pub fn positions(&self) -> Lookup<BTreeMap<PlayerId, Position>> {
        let mut lookup = self.fresh_pointer_map().map(|map| self.read_positions(&map));
        let (read, dropped) = lookup
            .value()
            .map_or((0, 0), |(positions, dropped)| (positions.len(), *dropped));

        let previous = self.last_position_count.load(Ordering::Relaxed);
        let collapsed = previous > 0 && read < (previous / 2).max(1);
        if dropped >= REBUILD_AFTER_DROPPED || collapsed {
            debug!(dropped, previous, read, "Handles went bad, rebuilding pointer map");
            if let Some(rebuilt) = self.pointers.rebuild(|| self.reader.read_pointer_map()) {
                lookup = log_map_failure(rebuilt).map(|map| self.read_positions(&map));
            }
        }

        let lookup = lookup.map(|(positions, _)| positions);
        if let Some(positions) = lookup.value() {
            self.last_position_count
                .store(positions.len(), Ordering::Relaxed);
        }
        lookup
    }

    /// Position of one player through the fast path. An unknown id or a dead
    /// handle gives an absent value; the map is only rebuilt on its TTL.
    pub fn position(&self, id: PlayerId) -> Lookup<Position> {
        self.fresh_pointer_map()
            .and_then(|map| map.get(&id).and_then(|&handle| self.read_handle(handle)))
    }

    /// Handle currently cached for `id`, without refreshing.
    pub fn resolve_handle(&self, id: PlayerId) -> Option<Handle> {
        self.pointers.resolve(id)
    }

    /// Failure of the most recent pointer map read, if it failed.
    pub fn pointer_map_failure(&self) -> Option<ReadFailure> {
        self.pointers.last_failure()
    }

    fn fresh_pointer_map(&self) -> Lookup<Arc<PointerMap>> {
        log_map_failure(self.pointers.ensure_fresh(|| self.reader.read_pointer_map()))
    }

    fn read_positions(&self, map: &PointerMap) -> (BTreeMap<PlayerId, Position>, usize) {
        let mut positions = BTreeMap::new();
        let mut dropped = 0;
        for (&id, &handle) in map {
            match self.read_handle(handle) {
                Some(position) => {
                    positions.insert(id, position);
                }
                None => dropped += 1,
            }
        }
        (positions, dropped)
    }

    fn read_handle(&self, handle: Handle) -> Option<Position> {
        if handle.is_null() || !self.reader.verify_handle(handle) {
            debug!(%handle, "Handle failed verification");
            return None;
        }
        match self.reader.read_position(handle) {
            Ok(position) => Some(position),
            Err(e) => {
                debug!(%handle, error = %e, "Position read failed");
                None
            }
        }
    }
}

fn log_map_failure(lookup: Lookup<Arc<PointerMap>>) -> Lookup<Arc<PointerMap>> {
    if lookup.fetched
        && let Some(failure) = &lookup.failure
    {
        warn!(error = %failure, freshness = ?lookup.freshness, "Pointer map read failed");
    }
    lookup
}
