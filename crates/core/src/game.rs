//! Game module - the frame-driven engine
//!
//! One call to [`Engine::process_frame`] advances the simulation by exactly one frame:
//!
//! 1. Menu, Transition and GameOver bookkeeping.
//! 2. While a game is running: command dispatch (DAS shifting, edge-triggered rotation,
//!    manual drop), gravity, then the per-phase transition
//!    (Locking -> Clearing -> ClearDelay -> Spawning -> Locking).
//! 3. The frame's command is remembered for rotation edge detection.
//!
//! Per-phase counters live inside [`Phase`], so a counter only exists while its phase does.
//! Commands and gravity only move the board while a piece is in play (`Locking`).

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::grid::Grid;
use crate::randomizer::Randomizer;
use crate::rules::{
    bravo_for, clear_score, format_run_time, grade_for, gravity_for_level, level_requires_clear,
    next_combo, GRAVITY_UNIT, HARD_TRACK_LEVEL,
};
use crate::snapshot::{PieceSnapshot, Snapshot, TimersSnapshot};
use crate::tetromino::Tetromino;
use crate::types::{Command, Rect, ShapeKind, Step, Track};

/// Events buffered between drains. Further events are dropped until the host drains.
pub const EVENT_CAPACITY: usize = 16;

/// Engine phase with the counters that only matter inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Menu,
    /// Waiting for a jingle to play out; `from` is Menu or GameOver
    Transition { from: Step, frames: u32 },
    Locking { lock_frames: u32, active_frames: u32 },
    Clearing,
    ClearDelay { clear_frames: u32 },
    Spawning { are_frames: u32 },
    GameOver,
}

impl Phase {
    pub fn step(&self) -> Step {
        match self {
            Phase::Menu => Step::Menu,
            Phase::Transition { .. } => Step::Transition,
            Phase::Locking { .. } => Step::Locking,
            Phase::Clearing => Step::Clearing,
            Phase::ClearDelay { .. } => Step::ClearDelay,
            Phase::Spawning { .. } => Step::Spawning,
            Phase::GameOver => Step::GameOver,
        }
    }
}

/// Something the host may want to react to (music, logging, effects)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum GameEvent {
    /// Switch the music to `track`
    Cue { track: Track },
    /// A piece entered play; `alternate` when the primary spawn point was blocked
    Spawned { shape: ShapeKind, alternate: bool },
    Locked { shape: ShapeKind },
    Cleared {
        lines: u32,
        points: u64,
        combo: u32,
        bravo: u32,
    },
    /// The level crossed a hundred boundary
    LevelUp { level: u32 },
    GameOver { level: u32, score: u64 },
}

#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    grid: Grid,
    randomizer: Randomizer,
    phase: Phase,
    /// Piece in play while Locking; the promoted next piece during Clearing/ClearDelay/Spawning
    active: Option<Tetromino>,
    next: Option<Tetromino>,
    command: Option<Command>,
    last_command: Option<Command>,
    das_frames: u32,
    soft: bool,
    soft_frames: u32,
    gravity: u32,
    level: u32,
    score: u64,
    combo: u32,
    bravo: u32,
    play_frames: u64,
    track: Track,
    events: ArrayVec<GameEvent, EVENT_CAPACITY>,
}

impl Engine {
    /// Validate `config` and build an idle engine in the menu.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let randomizer = match config.seed {
            Some(seed) => Randomizer::with_seed(seed),
            None => Randomizer::new(),
        };
        Self::with_randomizer(config, randomizer)
    }

    pub fn with_randomizer(
        config: EngineConfig,
        randomizer: Randomizer,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let grid = Grid::new(
            config.grid.origin_x,
            config.grid.origin_y,
            config.grid.cell_size,
            config.grid.width,
            config.grid.height,
        )?;

        let mut engine = Self {
            config,
            grid,
            randomizer,
            phase: Phase::Menu,
            active: None,
            next: None,
            command: None,
            last_command: None,
            das_frames: 0,
            soft: false,
            soft_frames: 0,
            gravity: 0,
            level: 0,
            score: 0,
            combo: 1,
            bravo: 1,
            play_frames: 0,
            track: Track::Menu,
            events: ArrayVec::new(),
        };
        engine.emit(GameEvent::Cue { track: Track::Menu });
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn step(&self) -> Step {
        self.phase.step()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn bravo(&self) -> u32 {
        self.bravo
    }

    pub fn grade(&self) -> &'static str {
        grade_for(self.score)
    }

    /// Frames spent in play since the last start
    pub fn play_frames(&self) -> u64 {
        self.play_frames
    }

    /// Play time as `mm:ss:cc`
    pub fn run_time(&self) -> String {
        format_run_time(self.play_frames)
    }

    pub fn das_frames(&self) -> u32 {
        self.das_frames
    }

    pub fn soft_frames(&self) -> u32 {
        self.soft_frames
    }

    /// Music currently requested
    pub fn track(&self) -> Track {
        self.track
    }

    pub fn command(&self) -> Option<Command> {
        self.command
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct board access for scripted setups (puzzles, tests)
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// The piece in play, if any
    pub fn active(&self) -> Option<&Tetromino> {
        match self.phase {
            Phase::Locking { .. } => self.active.as_ref(),
            _ => None,
        }
    }

    /// Upcoming piece at catalog size, anchored at (0, 0)
    pub fn next(&self) -> Option<&Tetromino> {
        self.next.as_ref()
    }

    /// Set the command for the coming frames. The host clears it with `None` on release.
    pub fn buffer_command(&mut self, command: Option<Command>) {
        self.command = command;
    }

    /// Take every event emitted since the last drain.
    pub fn take_events(&mut self) -> ArrayVec<GameEvent, EVENT_CAPACITY> {
        std::mem::take(&mut self.events)
    }

    /// Whether a candidate piece would hit a wall, the floor or a locked cell.
    pub fn collides(&self, piece: &Tetromino) -> bool {
        self.grid.collides(&piece.blocks())
    }

    /// Advance the simulation by one frame.
    pub fn process_frame(&mut self) {
        match self.phase {
            Phase::Menu => {
                if self.command == Some(Command::Start) {
                    self.phase = Phase::Transition {
                        from: Step::Menu,
                        frames: 0,
                    };
                    self.cue(Track::Start);
                }
            }
            Phase::Transition { from, frames } => {
                let frames = frames + 1;
                if frames < self.config.transition_delay {
                    self.phase = Phase::Transition { from, frames };
                } else if from == Step::Menu {
                    self.start();
                } else {
                    self.phase = Phase::Menu;
                    self.cue(Track::Menu);
                }
            }
            Phase::GameOver => {
                self.phase = Phase::Transition {
                    from: Step::GameOver,
                    frames: 0,
                };
                self.cue(Track::GameOver);
            }
            _ => {}
        }

        if self.phase.step().is_active() {
            self.play_frames += 1;
            self.dispatch_command();
            self.apply_gravity();
            self.advance_phase();
        }

        self.last_command = self.command;
    }

    /// Reset the session and put the first piece in play.
    fn start(&mut self) {
        self.grid.clear();
        self.randomizer.reset();
        self.level = 0;
        self.score = 0;
        self.combo = 1;
        self.bravo = 1;
        self.das_frames = 0;
        self.soft = false;
        self.soft_frames = 0;
        self.gravity = 0;
        self.play_frames = 0;

        self.active = Some(self.randomizer.next_piece());
        self.next = Some(self.randomizer.next_piece());
        self.cue(Track::Easy);
        self.spawn_active();
    }

    fn dispatch_command(&mut self) {
        self.soft = false;
        let das_locked = self.das_locked();

        match self.command {
            Some(command @ (Command::ShiftLeft | Command::ShiftRight)) => {
                if !das_locked {
                    self.das_frames += 1;
                }
                if self.das_frames == 1 || self.das_frames >= self.config.das_delay {
                    self.try_shift(command == Command::ShiftRight);
                }
            }
            command => {
                if !das_locked {
                    self.das_frames = 0;
                }
                let fresh = command != self.last_command;
                match command {
                    Some(Command::RotateClockwise) if fresh => {
                        self.try_rotate(true);
                    }
                    Some(Command::RotateCounterClockwise) if fresh => {
                        self.try_rotate(false);
                    }
                    Some(Command::ManualDrop) => {
                        self.soft_frames += 1;
                        self.soft = true;
                        self.try_drop();
                    }
                    _ => {}
                }
            }
        }
    }

    /// DAS charge is frozen during the clear delay, the first 4 and the last ARE frames,
    /// and the frame after a spawn.
    fn das_locked(&self) -> bool {
        match self.phase {
            Phase::ClearDelay { .. } => true,
            Phase::Spawning { are_frames } => {
                let frame = are_frames + 1;
                frame <= 4 || frame >= self.config.are_delay
            }
            Phase::Locking { active_frames, .. } => active_frames == 1,
            _ => false,
        }
    }

    fn apply_gravity(&mut self) {
        self.gravity += gravity_for_level(self.level);
        while self.gravity >= GRAVITY_UNIT {
            self.try_drop();
            self.gravity -= GRAVITY_UNIT;
        }
    }

    fn advance_phase(&mut self) {
        match self.phase {
            Phase::Locking {
                lock_frames,
                active_frames,
            } => {
                let Some(piece) = self.active else {
                    return;
                };
                let active_frames = active_frames + 1;
                let lock_frames = if self.collides(&piece.probe(Tetromino::drop)) {
                    if self.soft {
                        self.config.lock_delay
                    } else {
                        lock_frames + 1
                    }
                } else {
                    0
                };

                if lock_frames >= self.config.lock_delay {
                    self.lock(piece);
                } else {
                    self.phase = Phase::Locking {
                        lock_frames,
                        active_frames,
                    };
                }
            }
            Phase::Clearing => self.resolve_clears(),
            Phase::ClearDelay { clear_frames } => {
                let clear_frames = clear_frames + 1;
                self.phase = if clear_frames >= self.config.clear_delay {
                    Phase::Spawning { are_frames: 0 }
                } else {
                    Phase::ClearDelay { clear_frames }
                };
            }
            Phase::Spawning { are_frames } => {
                let are_frames = are_frames + 1;
                if are_frames >= self.config.are_delay {
                    self.soft_frames = 0;
                    self.spawn_active();
                } else {
                    self.phase = Phase::Spawning { are_frames };
                }
            }
            Phase::Menu | Phase::Transition { .. } | Phase::GameOver => {}
        }
    }

    fn lock(&mut self, piece: Tetromino) {
        if piece.is_above(self.grid.y()) {
            self.game_over();
            return;
        }

        for block in piece.blocks() {
            self.grid.occupy_matching(&block, piece.color());
        }
        self.emit(GameEvent::Locked { shape: piece.kind() });

        self.active = self.next.take();
        self.next = Some(self.randomizer.next_piece());
        self.phase = Phase::Clearing;
    }

    fn resolve_clears(&mut self) {
        let cleared = self.grid.clear_full_rows() as u32;
        if cleared == 0 {
            self.combo = next_combo(self.combo, 0);
            self.phase = Phase::Spawning { are_frames: 0 };
            return;
        }

        self.bravo = bravo_for(self.grid.is_empty());
        self.combo = next_combo(self.combo, cleared);
        let points = clear_score(self.level, cleared, self.soft_frames, self.combo, self.bravo);
        self.score += points;
        self.emit(GameEvent::Cleared {
            lines: cleared,
            points,
            combo: self.combo,
            bravo: self.bravo,
        });

        self.raise_level(cleared);
        self.phase = Phase::ClearDelay { clear_frames: 0 };
    }

    /// Anchor the promoted piece at the spawn point (or the fallback above it) and start
    /// locking. Both anchors blocked ends the game.
    fn spawn_active(&mut self) {
        let Some(mut piece) = self.active else {
            return;
        };
        piece.resize(self.grid.cell_size());

        let (x, y) = self.grid.spawn_point();
        piece.move_to(x, y);
        let mut alternate = false;
        if self.collides(&piece) {
            let (x, y) = self.grid.alt_spawn_point();
            piece.move_to(x, y);
            alternate = true;
        }
        self.active = Some(piece);

        if alternate && self.collides(&piece) {
            self.game_over();
            return;
        }

        self.phase = Phase::Locking {
            lock_frames: 0,
            active_frames: 1,
        };
        self.emit(GameEvent::Spawned {
            shape: piece.kind(),
            alternate,
        });

        if !level_requires_clear(self.level) {
            self.raise_level(1);
        }
    }

    fn raise_level(&mut self, by: u32) {
        let before = self.level;
        self.level += by;
        if self.level / 100 > before / 100 {
            self.emit(GameEvent::LevelUp { level: self.level });
        }
        if self.level >= HARD_TRACK_LEVEL && self.track != Track::Hard {
            self.cue(Track::Hard);
        }
    }

    fn game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.emit(GameEvent::GameOver {
            level: self.level,
            score: self.score,
        });
    }

    fn try_shift(&mut self, right: bool) -> bool {
        self.try_move(|piece| {
            if right {
                piece.shift_right()
            } else {
                piece.shift_left()
            }
        })
    }

    fn try_drop(&mut self) -> bool {
        self.try_move(Tetromino::drop)
    }

    /// Rotate in place, else after one step right, else after one step left.
    fn try_rotate(&mut self, clockwise: bool) -> bool {
        let rotate = |piece: &mut Tetromino| {
            if clockwise {
                piece.rotate_clockwise()
            } else {
                piece.rotate_counter_clockwise()
            }
        };
        let kicks: [fn(&mut Tetromino); 3] =
            [|_| {}, Tetromino::shift_right, Tetromino::shift_left];

        kicks.iter().any(|kick| {
            self.try_move(|piece| {
                kick(piece);
                rotate(piece);
            })
        })
    }

    fn try_move(&mut self, f: impl FnOnce(&mut Tetromino)) -> bool {
        if !matches!(self.phase, Phase::Locking { .. }) {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };

        let candidate = piece.probe(f);
        if self.collides(&candidate) {
            return false;
        }
        self.active = Some(candidate);
        true
    }

    fn cue(&mut self, track: Track) {
        self.track = track;
        self.emit(GameEvent::Cue { track });
    }

    fn emit(&mut self, event: GameEvent) {
        let _ = self.events.try_push(event);
    }

    pub fn snapshot_into(&self, out: &mut Snapshot) {
        out.step = self.step();
        out.track = self.track;
        out.grid_origin = (self.grid.x(), self.grid.y());
        out.cell_size = self.grid.cell_size();
        out.grid_width = self.grid.width();
        out.grid_height = self.grid.height();
        out.cells.clear();
        out.cells.extend_from_slice(self.grid.cells());
        out.active = self.active().map(PieceSnapshot::from);
        out.next = self.next.as_ref().map(PieceSnapshot::from);
        out.level = self.level;
        out.score = self.score;
        out.combo = self.combo;
        out.bravo = self.bravo;
        out.grade = self.grade();
        out.play_frames = self.play_frames;

        let (lock_frames, clear_frames, are_frames) = match self.phase {
            Phase::Locking { lock_frames, .. } => (lock_frames, 0, 0),
            Phase::ClearDelay { clear_frames } => (0, clear_frames, 0),
            Phase::Spawning { are_frames } => (0, 0, are_frames),
            _ => (0, 0, 0),
        };
        out.timers = TimersSnapshot {
            das_frames: self.das_frames,
            lock_frames,
            clear_frames,
            are_frames,
            soft_frames: self.soft_frames,
            gravity: self.gravity,
        };
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut s = Snapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Blocks of the piece in play, if any
    pub fn active_blocks(&self) -> Option<[Rect; 4]> {
        self.active().map(Tetromino::blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::types::{Rgb, CELL_SIZE};

    const GRAY: Rgb = Rgb::new(0x80, 0x80, 0x80);

    fn config() -> EngineConfig {
        EngineConfig {
            transition_delay: 3,
            ..EngineConfig::default()
        }
    }

    fn started(config: EngineConfig) -> Engine {
        let mut engine = Engine::with_randomizer(config, Randomizer::with_seed(7)).unwrap();
        engine.buffer_command(Some(Command::Start));
        for _ in 0..10 {
            engine.process_frame();
            if engine.step() != Step::Menu && engine.step() != Step::Transition {
                break;
            }
        }
        engine.buffer_command(None);
        engine
    }

    fn fill_row(engine: &mut Engine, row: usize) {
        for col in 0..engine.grid().width() {
            engine.grid_mut().fill(row, col, GRAY);
        }
    }

    #[test]
    fn test_new_engine_waits_in_menu() {
        let mut engine = Engine::new(config()).unwrap();
        assert_eq!(engine.step(), Step::Menu);
        assert!(engine.active().is_none());
        assert_eq!(
            engine.take_events().as_slice(),
            &[GameEvent::Cue { track: Track::Menu }]
        );

        engine.process_frame();
        assert_eq!(engine.step(), Step::Menu);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let bad = EngineConfig {
            lock_delay: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Engine::new(bad),
            Err(EngineError::InvalidDelay("lock_delay"))
        ));
    }

    #[test]
    fn test_start_runs_through_transition() {
        let mut engine = Engine::with_randomizer(config(), Randomizer::with_seed(1)).unwrap();
        engine.take_events();
        engine.buffer_command(Some(Command::Start));

        engine.process_frame();
        assert_eq!(engine.step(), Step::Transition);
        engine.process_frame();
        engine.process_frame();
        assert_eq!(engine.step(), Step::Transition);
        engine.process_frame();
        assert_eq!(engine.step(), Step::Locking);

        let piece = engine.active().copied().unwrap();
        assert_eq!(piece.origin(), engine.grid().spawn_point());
        assert_eq!(piece.size(), CELL_SIZE);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.combo(), 1);
        assert_eq!(engine.bravo(), 1);
        assert_eq!(engine.next().unwrap().size(), crate::types::CATALOG_CELL_SIZE);

        let events = engine.take_events();
        assert_eq!(events[0], GameEvent::Cue { track: Track::Start });
        assert_eq!(events[1], GameEvent::Cue { track: Track::Easy });
        assert_eq!(
            events[2],
            GameEvent::Spawned {
                shape: piece.kind(),
                alternate: false
            }
        );
    }

    #[test]
    fn test_start_frame_runs_locking() {
        let engine = started(config());
        assert_eq!(
            engine.phase(),
            Phase::Locking {
                lock_frames: 0,
                active_frames: 2
            }
        );
        assert_eq!(engine.play_frames(), 1);
    }

    #[test]
    fn test_das_initial_delay_then_repeat() {
        let mut engine = started(EngineConfig {
            grid: GridConfig {
                width: 30,
                ..GridConfig::default()
            },
            ..config()
        });
        let start_x = engine.active().unwrap().origin().0;
        let shifts = |e: &Engine| (e.active().unwrap().origin().0 - start_x) / CELL_SIZE;

        engine.buffer_command(Some(Command::ShiftRight));
        engine.process_frame();
        assert_eq!(shifts(&engine), 1);

        for _ in 2..engine.config().das_delay {
            engine.process_frame();
        }
        assert_eq!(shifts(&engine), 1);

        engine.process_frame();
        assert_eq!(engine.das_frames(), 14);
        assert_eq!(shifts(&engine), 2);

        for _ in 0..5 {
            engine.process_frame();
        }
        assert_eq!(shifts(&engine), 7);
    }

    #[test]
    fn test_shift_stops_at_wall() {
        let mut engine = started(config());
        engine.buffer_command(Some(Command::ShiftLeft));
        for _ in 0..40 {
            engine.process_frame();
        }
        let piece = engine.active().unwrap();
        let left = piece.blocks().iter().map(|b| b.x).min().unwrap();
        assert_eq!(left, engine.grid().x());
    }

    #[test]
    fn test_das_charge_frozen_during_clear_delay() {
        let mut engine = started(config());
        engine.das_frames = 5;
        engine.phase = Phase::ClearDelay { clear_frames: 0 };
        engine.buffer_command(Some(Command::ShiftLeft));
        engine.process_frame();
        assert_eq!(engine.das_frames(), 5);

        engine.buffer_command(None);
        engine.process_frame();
        assert_eq!(engine.das_frames(), 5);
    }

    #[test]
    fn test_das_charge_builds_during_are() {
        let mut engine = started(config());
        engine.phase = Phase::Spawning { are_frames: 10 };
        engine.buffer_command(Some(Command::ShiftRight));
        engine.process_frame();
        engine.process_frame();
        assert_eq!(engine.das_frames(), 2);

        // final ARE frame is frozen
        engine.phase = Phase::Spawning {
            are_frames: engine.config().are_delay - 1,
        };
        engine.process_frame();
        assert_eq!(engine.das_frames(), 2);
    }

    #[test]
    fn test_rotate_is_edge_triggered() {
        let mut engine = started(config());
        let piece = *engine.active().unwrap();
        let once = piece.probe(Tetromino::rotate_clockwise).orientation();
        let twice = piece
            .probe(|p| {
                p.rotate_clockwise();
                p.rotate_clockwise();
            })
            .orientation();

        engine.buffer_command(Some(Command::RotateClockwise));
        for _ in 0..3 {
            engine.process_frame();
        }
        assert_eq!(engine.active().unwrap().orientation(), once);

        engine.buffer_command(None);
        engine.process_frame();
        engine.buffer_command(Some(Command::RotateClockwise));
        engine.process_frame();
        assert_eq!(engine.active().unwrap().orientation(), twice);
    }

    #[test]
    fn test_rotate_kicks_off_right_wall() {
        let mut engine = started(config());
        let mut piece = Tetromino::new(ShapeKind::I);
        piece.resize(CELL_SIZE);
        // vertical I in box column 2 against the right wall
        piece.rotate_clockwise();
        piece.move_to(340, 100);
        assert!(!engine.collides(&piece));
        engine.active = Some(piece);

        engine.buffer_command(Some(Command::RotateClockwise));
        engine.process_frame();

        let rotated = engine.active().unwrap();
        assert_eq!(rotated.orientation(), 1);
        assert_eq!(rotated.origin().0, 320);
    }

    #[test]
    fn test_lock_after_exact_delay() {
        let mut engine = started(EngineConfig {
            grid: GridConfig {
                height: 5,
                ..GridConfig::default()
            },
            ..config()
        });
        engine.take_events();

        let mut frames = 0;
        while !engine.collides(&engine.active().unwrap().probe(Tetromino::drop)) {
            engine.process_frame();
            frames += 1;
            assert!(frames < 1000, "piece never landed");
        }
        assert!(matches!(
            engine.phase(),
            Phase::Locking { lock_frames: 1, .. }
        ));

        let lock_delay = engine.config().lock_delay;
        for _ in 1..lock_delay - 1 {
            engine.process_frame();
        }
        assert!(matches!(
            engine.phase(),
            Phase::Locking { lock_frames, .. } if lock_frames == lock_delay - 1
        ));
        assert!(engine.grid().is_empty());

        engine.process_frame();
        assert_eq!(engine.step(), Step::Clearing);
        assert!(!engine.grid().is_empty());
        assert!(matches!(
            engine.take_events().as_slice(),
            [GameEvent::Locked { .. }]
        ));
    }

    #[test]
    fn test_manual_drop_locks_on_contact() {
        let mut engine = started(EngineConfig {
            grid: GridConfig {
                height: 4,
                ..GridConfig::default()
            },
            ..config()
        });
        engine.buffer_command(Some(Command::ManualDrop));
        for _ in 0..10 {
            engine.process_frame();
            if engine.step() != Step::Locking {
                break;
            }
        }
        assert_eq!(engine.step(), Step::Clearing);
        assert!(engine.soft_frames() > 0);
    }

    #[test]
    fn test_tetris_scores_with_bravo() {
        let mut engine = started(config());
        for row in 16..20 {
            fill_row(&mut engine, row);
        }
        engine.level = 0;
        engine.take_events();
        engine.phase = Phase::Clearing;
        engine.process_frame();

        assert_eq!(engine.combo(), 7);
        assert_eq!(engine.bravo(), 4);
        assert_eq!(engine.score(), 4 * 7 * 7 * 4);
        assert_eq!(engine.level(), 4);
        assert_eq!(engine.step(), Step::ClearDelay);
        assert_eq!(
            engine.take_events().as_slice(),
            &[GameEvent::Cleared {
                lines: 4,
                points: 784,
                combo: 7,
                bravo: 4
            }]
        );
    }

    #[test]
    fn test_tetris_without_bravo() {
        let mut engine = started(config());
        for row in 16..20 {
            fill_row(&mut engine, row);
        }
        engine.grid_mut().fill(15, 0, GRAY);
        engine.level = 0;
        engine.phase = Phase::Clearing;
        engine.process_frame();

        assert_eq!(engine.bravo(), 1);
        assert_eq!(engine.score(), 196);
        assert!(engine.grid().is_occupied(19, 0));
    }

    #[test]
    fn test_no_clear_resets_combo() {
        let mut engine = started(config());
        engine.combo = 9;
        engine.phase = Phase::Clearing;
        engine.process_frame();
        assert_eq!(engine.combo(), 1);
        assert_eq!(engine.step(), Step::Spawning);
    }

    #[test]
    fn test_clear_delay_then_are_then_spawn() {
        let mut engine = started(config());
        engine.phase = Phase::ClearDelay { clear_frames: 0 };
        for _ in 0..engine.config().clear_delay - 1 {
            engine.process_frame();
        }
        assert_eq!(engine.step(), Step::ClearDelay);
        engine.process_frame();
        assert_eq!(engine.step(), Step::Spawning);

        for _ in 0..engine.config().are_delay - 1 {
            engine.process_frame();
        }
        assert_eq!(engine.step(), Step::Spawning);
        engine.process_frame();
        assert_eq!(engine.step(), Step::Locking);
        assert_eq!(engine.soft_frames(), 0);
    }

    #[test]
    fn test_spawn_stops_at_section_boundary() {
        let mut engine = started(config());
        engine.level = 98;
        engine.phase = Phase::Spawning {
            are_frames: engine.config().are_delay - 1,
        };
        engine.process_frame();
        assert_eq!(engine.level(), 99);

        engine.phase = Phase::Spawning {
            are_frames: engine.config().are_delay - 1,
        };
        engine.process_frame();
        assert_eq!(engine.level(), 99);

        fill_row(&mut engine, 19);
        engine.take_events();
        engine.phase = Phase::Clearing;
        engine.process_frame();
        assert_eq!(engine.level(), 100);
        assert!(engine
            .take_events()
            .contains(&GameEvent::LevelUp { level: 100 }));
    }

    #[test]
    fn test_hard_track_from_level_500() {
        let mut engine = started(config());
        engine.level = 497;
        fill_row(&mut engine, 18);
        fill_row(&mut engine, 19);
        engine.take_events();
        engine.phase = Phase::Clearing;
        engine.process_frame();

        assert_eq!(engine.level(), 499);
        assert_eq!(engine.track(), Track::Easy);

        engine.phase = Phase::Spawning {
            are_frames: engine.config().are_delay - 1,
        };
        engine.process_frame();
        // 499 is a section stop
        assert_eq!(engine.level(), 499);

        fill_row(&mut engine, 19);
        engine.phase = Phase::Clearing;
        engine.process_frame();
        assert_eq!(engine.level(), 500);
        assert_eq!(engine.track(), Track::Hard);
    }

    #[test]
    fn test_spawn_falls_back_to_alternate_anchor() {
        let mut engine = started(config());
        for col in 3..7 {
            engine.grid_mut().fill(0, col, GRAY);
            engine.grid_mut().fill(1, col, GRAY);
        }
        engine.take_events();
        engine.phase = Phase::Spawning {
            are_frames: engine.config().are_delay - 1,
        };
        engine.process_frame();

        assert_eq!(engine.step(), Step::Locking);
        assert_eq!(
            engine.active().unwrap().origin(),
            engine.grid().alt_spawn_point()
        );
        assert!(matches!(
            engine.take_events().first(),
            Some(GameEvent::Spawned {
                alternate: true,
                ..
            })
        ));
    }

    #[test]
    fn test_both_anchors_blocked_is_game_over() {
        let mut engine = started(EngineConfig {
            grid: GridConfig {
                width: 3,
                ..GridConfig::default()
            },
            ..config()
        });
        assert_eq!(engine.step(), Step::GameOver);
        assert!(engine
            .take_events()
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_lock_above_top_is_game_over() {
        let mut engine = started(config());
        let mut piece = Tetromino::new(ShapeKind::O);
        piece.resize(CELL_SIZE);
        // O blocks in box rows 1-2: rows -2 and -1, resting on a filled row 0
        piece.move_to(260, -60);
        fill_row(&mut engine, 0);
        engine.active = Some(piece);
        engine.buffer_command(Some(Command::ManualDrop));
        engine.process_frame();
        assert_eq!(engine.step(), Step::GameOver);

        engine.buffer_command(None);
        engine.take_events();
        engine.process_frame();
        assert_eq!(engine.step(), Step::Transition);
        assert_eq!(engine.track(), Track::GameOver);

        for _ in 0..engine.config().transition_delay {
            engine.process_frame();
        }
        assert_eq!(engine.step(), Step::Menu);
        assert_eq!(engine.track(), Track::Menu);
    }

    #[test]
    fn test_gravity_multiple_cells_per_frame() {
        let mut engine = started(config());
        engine.level = 500;
        let y = engine.active().unwrap().origin().1;
        engine.process_frame();
        let piece = engine.active().unwrap();
        assert!(piece.origin().1 > y + CELL_SIZE);
        assert!(engine.collides(&piece.probe(Tetromino::drop)));
    }

    #[test]
    fn test_run_time_format() {
        let mut engine = started(config());
        engine.play_frames = 60 * 61 + 30;
        assert_eq!(engine.run_time(), "01:01:50");
    }

    #[test]
    fn test_snapshot_into_reuses_buffer() {
        let engine = started(config());
        let mut snap = Snapshot::default();
        engine.snapshot_into(&mut snap);
        let capacity = snap.cells.capacity();
        engine.snapshot_into(&mut snap);

        assert_eq!(snap.cells.capacity(), capacity);
        assert_eq!(snap.cells.len(), 200);
        assert_eq!(snap.step, Step::Locking);
        assert_eq!(snap.active.unwrap().blocks, engine.active_blocks().unwrap());
        assert_eq!(snap.grade, "9");
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&GameEvent::Cue { track: Track::Hard }).unwrap();
        assert_eq!(json, r#"{"event":"cue","track":"Hard"}"#);
        let json = serde_json::to_string(&GameEvent::Locked {
            shape: ShapeKind::T,
        })
        .unwrap();
        assert_eq!(json, r#"{"event":"locked","shape":"T"}"#);
    }
}
