//! Scripted in-memory game reader for integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use shipview::{
    ColorId, GameReader, Handle, HudStatus, ManualClock, PartialScan, PlayerId, PlayerRecord,
    Position, ReadFailure, RefreshOrchestrator, ScanBudget, SessionProbe, SharedClock,
    TaskRecord,
};
use shipview_cache::PointerMap;
use shipview_config::Timings;

/// Collaborator calls counted by [`FakeReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    Players,
    Colors,
    Tasks,
    Session,
    PointerMap,
    Position,
    HudScan,
}

/// HUD heap layout the fake scan walks through.
#[derive(Debug, Clone)]
pub struct HudScript {
    /// Number of candidate objects on the heap.
    pub candidates: usize,
    /// Index of the report button among the candidates, if present.
    pub button_at: Option<usize>,
    pub button_active: bool,
    /// Simulated time spent examining one candidate.
    pub per_candidate: Duration,
}

impl Default for HudScript {
    fn default() -> Self {
        Self {
            candidates: 4,
            button_at: Some(1),
            button_active: true,
            per_candidate: Duration::from_millis(1),
        }
    }
}

#[derive(Debug)]
pub struct FakeReader {
    clock: Arc<ManualClock>,
    calls: Mutex<HashMap<Call, usize>>,
    players: Mutex<Result<Vec<PlayerRecord>, ReadFailure>>,
    colors: Mutex<Result<BTreeMap<PlayerId, ColorId>, ReadFailure>>,
    tasks: Mutex<Result<BTreeMap<PlayerId, Vec<TaskRecord>>, ReadFailure>>,
    session: Mutex<Result<SessionProbe, ReadFailure>>,
    pointer_map: Mutex<Result<PointerMap, ReadFailure>>,
    positions: Mutex<HashMap<Handle, Position>>,
    dead: Mutex<HashSet<Handle>>,
    hud: Mutex<HudScript>,
}

impl FakeReader {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            clock,
            calls: Mutex::new(HashMap::new()),
            players: Mutex::new(Ok(Vec::new())),
            colors: Mutex::new(Ok(BTreeMap::new())),
            tasks: Mutex::new(Ok(BTreeMap::new())),
            session: Mutex::new(Ok(SessionProbe::default())),
            pointer_map: Mutex::new(Ok(PointerMap::new())),
            positions: Mutex::new(HashMap::new()),
            dead: Mutex::new(HashSet::new()),
            hud: Mutex::new(HudScript::default()),
        }
    }

    /// A crew of `count` players with distinct colours; player 0 is local.
    pub fn with_crew(self, count: u8) -> Self {
        let players = (0..count)
            .map(|id| {
                let record = PlayerRecord::new(
                    id,
                    ColorId::from_index(id),
                    Position::new(f32::from(id), 1.0),
                );
                if id == 0 { record.local() } else { record }
            })
            .collect::<Vec<_>>();
        let colors = players
            .iter()
            .filter_map(|p| p.color.map(|c| (p.id, c)))
            .collect();
        let handles = (0..count)
            .map(|id| (id, Handle(0x1000 + u64::from(id) * 0x100)))
            .collect::<PointerMap>();
        let positions = handles
            .iter()
            .map(|(&id, &handle)| (handle, Position::new(f32::from(id), 2.0)))
            .collect();

        *self.players.lock() = Ok(players);
        *self.colors.lock() = Ok(colors);
        *self.pointer_map.lock() = Ok(handles);
        *self.positions.lock() = positions;
        self
    }

    pub fn calls(&self, call: Call) -> usize {
        self.calls.lock().get(&call).copied().unwrap_or(0)
    }

    fn record(&self, call: Call) {
        *self.calls.lock().entry(call).or_default() += 1;
    }

    pub fn set_players(&self, players: Result<Vec<PlayerRecord>, ReadFailure>) {
        *self.players.lock() = players;
    }

    pub fn set_colors(&self, colors: Result<BTreeMap<PlayerId, ColorId>, ReadFailure>) {
        *self.colors.lock() = colors;
    }

    pub fn set_tasks(&self, tasks: Result<BTreeMap<PlayerId, Vec<TaskRecord>>, ReadFailure>) {
        *self.tasks.lock() = tasks;
    }

    pub fn set_session(&self, probe: Result<SessionProbe, ReadFailure>) {
        *self.session.lock() = probe;
    }

    pub fn set_pointer_map(&self, map: Result<PointerMap, ReadFailure>) {
        *self.pointer_map.lock() = map;
    }

    pub fn place(&self, handle: Handle, position: Position) {
        self.positions.lock().insert(handle, position);
    }

    pub fn kill(&self, handle: Handle) {
        self.dead.lock().insert(handle);
    }

    pub fn set_hud(&self, script: HudScript) {
        *self.hud.lock() = script;
    }
}

impl GameReader for FakeReader {
    fn read_players(&self) -> Result<Vec<PlayerRecord>, ReadFailure> {
        self.record(Call::Players);
        self.players.lock().clone()
    }

    fn read_colors(&self) -> Result<BTreeMap<PlayerId, ColorId>, ReadFailure> {
        self.record(Call::Colors);
        self.colors.lock().clone()
    }

    fn read_tasks(&self) -> Result<BTreeMap<PlayerId, Vec<TaskRecord>>, ReadFailure> {
        self.record(Call::Tasks);
        self.tasks.lock().clone()
    }

    fn read_session_probe(&self) -> Result<SessionProbe, ReadFailure> {
        self.record(Call::Session);
        self.session.lock().clone()
    }

    fn read_pointer_map(&self) -> Result<PointerMap, ReadFailure> {
        self.record(Call::PointerMap);
        self.pointer_map.lock().clone()
    }

    fn read_position(&self, handle: Handle) -> Result<Position, ReadFailure> {
        self.record(Call::Position);
        self.positions
            .lock()
            .get(&handle)
            .copied()
            .ok_or(ReadFailure::InvalidHandle(handle))
    }

    fn verify_handle(&self, handle: Handle) -> bool {
        !self.dead.lock().contains(&handle)
    }

    fn scan_hud(&self, budget: &ScanBudget) -> PartialScan<HudStatus> {
        self.record(Call::HudScan);
        let script = self.hud.lock().clone();
        let scan = budget.find_map(0..script.candidates, |index| {
            self.clock.advance(script.per_candidate);
            (script.button_at == Some(index)).then_some(script.button_active)
        });
        let examined = scan.examined;
        scan.map(|found| HudStatus {
            report_button_active: found,
            candidates_examined: examined,
        })
    }
}

/// Orchestrator over a fresh [`FakeReader`] with default timings and a
/// manual clock.
pub fn view(crew: u8) -> (RefreshOrchestrator<FakeReader>, Arc<ManualClock>) {
    view_with(crew, Timings::default())
}

pub fn view_with(
    crew: u8,
    timings: Timings,
) -> (RefreshOrchestrator<FakeReader>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let reader = FakeReader::new(clock.clone()).with_crew(crew);
    let shared: SharedClock = clock.clone();
    (RefreshOrchestrator::with_timings(reader, timings, shared), clock)
}

pub fn secs(seconds: f64) -> Duration {
    Duration::from_secs_f64(seconds)
}
