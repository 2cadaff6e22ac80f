//! Game state module - owns the board, the active piece and the clock
//!
//! Everything advances through [`GameState::tick`] and the intent setters.
//! Nothing here sleeps or reads input; the caller decides how much time
//! passed and which intents arrived.

use tracing::{debug, info};

use crate::board::{Board, LockedBlock};
use crate::config::validate_config;
use crate::difficulty::{select_shape, DangerZone};
use crate::error::{ConfigurationError, Result};
use crate::matrix::Matrix;
use crate::piece::{ActivePiece, LockPhase};
use crate::rng::{seeded, GameRng, RandomSource};
use crate::scoring::{calculate_score, drop_interval_ms, level_for_lines, soft_drop_interval_ms};
use crate::shapes::{ShapeDefinition, ShapeRegistry};
use crate::types::{GameConfig, InputEvent, InputKind, Intent, LockEvent};

/// Snapshot of the values shown in the debug panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    pub zone: DangerZone,
    /// Difficulty of the active piece, if any
    pub active_difficulty: Option<f64>,
    /// Gravity interval for the current level, ignoring soft drop
    pub drop_interval_ms: u32,
    pub level: u32,
    /// Lock delay that would apply if the piece touched down now
    pub lock_threshold_ms: u32,
    pub clock_ms: u64,
}

/// Complete game state.
#[derive(Debug, Clone)]
pub struct GameState<R = GameRng> {
    config: GameConfig,
    registry: ShapeRegistry,
    rng: R,
    board: Board,
    active: Option<ActivePiece>,
    /// Pre-fetched next shape index
    next: Option<usize>,
    score: u32,
    lines: u32,
    level: u32,
    drop_ms: u32,
    /// Gravity time owed to the active piece
    fall_debt_ms: u32,
    soft_drop: bool,
    lock_phase: LockPhase,
    /// Set on the frame gravity first fails, so that frame adds no grace time
    touched_this_frame: bool,
    running: bool,
    paused: bool,
    game_over: bool,
    /// Monotonic simulation clock, advanced by every tick
    clock_ms: u64,
    last_input: Option<(InputKind, u64)>,
    last_event: Option<LockEvent>,
}

/// Locked blocks store the shape index as `u16`.
const MAX_SHAPES: usize = u16::MAX as usize + 1;

/// Locked blocks store the cell row inside the shape as `u8`.
const MAX_SHAPE_HEIGHT: usize = u8::MAX as usize + 1;

impl GameState<GameRng> {
    /// Create a game driven by a seeded [`GameRng`].
    pub fn with_seed(registry: ShapeRegistry, config: GameConfig, seed: u64) -> Result<Self> {
        Self::new(registry, config, seeded(seed))
    }
}

impl<R: RandomSource> GameState<R> {
    /// Create a game in the ready state (first piece spawned, not running).
    pub fn new(registry: ShapeRegistry, config: GameConfig, rng: R) -> Result<Self> {
        validate_config(&config)?;
        if registry.is_empty() {
            return Err(ConfigurationError::NoShapes);
        }
        if registry.len() > MAX_SHAPES {
            return Err(ConfigurationError::TooManyShapes {
                count: registry.len(),
                max: MAX_SHAPES,
            });
        }
        if let Some(shape) = registry
            .iter()
            .find(|s| s.rotations.iter().any(|m| m.height() > MAX_SHAPE_HEIGHT))
        {
            return Err(ConfigurationError::MalformedGrid {
                id: shape.id.clone(),
                reason: format!("taller than {MAX_SHAPE_HEIGHT} rows"),
            });
        }
        let cols = config.board.cols as usize;
        if let Some(shape) = registry.iter().find(|s| s.max_width() > cols) {
            return Err(ConfigurationError::TooWide {
                id: shape.id.clone(),
                width: shape.max_width(),
                cols,
            });
        }

        let mut state = Self {
            board: Board::new(cols, config.board.rows as usize),
            drop_ms: config.timing.base_drop_ms,
            config,
            registry,
            rng,
            active: None,
            next: None,
            score: 0,
            lines: 0,
            level: 1,
            fall_debt_ms: 0,
            soft_drop: false,
            lock_phase: LockPhase::Falling,
            touched_this_frame: false,
            running: false,
            paused: false,
            game_over: false,
            clock_ms: 0,
            last_input: None,
            last_event: None,
        };
        state.reset();
        Ok(state)
    }

    // --- accessors ---

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for scripted setups.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    /// Shape definition of the active piece.
    pub fn active_shape(&self) -> Option<&ShapeDefinition> {
        self.active.map(|p| self.shape(p.shape))
    }

    /// Occupancy matrix of the active piece in its current rotation.
    pub fn active_matrix(&self) -> Option<&Matrix> {
        self.active
            .map(|p| self.shape(p.shape).rotation(p.rotation))
    }

    pub fn next_shape(&self) -> Option<&ShapeDefinition> {
        self.next.map(|idx| self.shape(idx))
    }

    pub fn shapes(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Gravity interval for the current level.
    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_ms
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn soft_dropping(&self) -> bool {
        self.soft_drop
    }

    pub fn lock_phase(&self) -> LockPhase {
        self.lock_phase
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn danger_zone(&self) -> DangerZone {
        DangerZone::from_board(&self.board, &self.config.assist)
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            zone: self.danger_zone(),
            active_difficulty: self.active_shape().map(|s| s.difficulty),
            drop_interval_ms: self.drop_ms,
            level: self.level,
            lock_threshold_ms: self.lock_threshold_ms(),
            clock_ms: self.clock_ms,
        }
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    fn shape(&self, idx: usize) -> &ShapeDefinition {
        &self.registry.shapes()[idx]
    }

    fn is_live(&self) -> bool {
        self.running && !self.paused && !self.game_over
    }

    // --- controls ---

    /// Start playing; a finished game is reset first.
    pub fn start(&mut self) {
        if self.game_over {
            self.reset();
        }
        self.running = true;
        self.paused = false;
    }

    /// Returns whether the game was actually paused.
    pub fn pause(&mut self) -> bool {
        if !self.running || self.game_over || self.paused {
            return false;
        }
        self.paused = true;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let changed = self.paused || !self.running;
        self.running = true;
        self.paused = false;
        changed
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Throw away the current game. The random source and clock carry over.
    pub fn reset(&mut self) {
        self.board = Board::new(
            self.config.board.cols as usize,
            self.config.board.rows as usize,
        );
        self.active = None;
        self.next = None;
        self.running = false;
        self.paused = false;
        self.game_over = false;
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.drop_ms = self.config.timing.base_drop_ms;
        self.fall_debt_ms = 0;
        self.soft_drop = false;
        self.lock_phase = LockPhase::Falling;
        self.touched_this_frame = false;
        self.last_event = None;
        if !self.spawn_piece() {
            self.game_over = true;
        }
        info!("game reset");
    }

    pub fn set_soft_drop(&mut self, on: bool) {
        self.soft_drop = on;
    }

    /// Remember the kind of the latest input; touch input lengthens lock delay.
    pub fn record_input(&mut self, kind: InputKind) {
        self.last_input = Some((kind, self.clock_ms));
    }

    /// Record the input kind and dispatch the intent.
    ///
    /// Gameplay intents are ignored unless the game is running, unpaused and
    /// not over. Returns whether anything changed.
    pub fn apply(&mut self, event: InputEvent) -> bool {
        self.record_input(event.source);
        match event.intent {
            Intent::Start => {
                let changed = !self.running || self.paused || self.game_over;
                self.start();
                changed
            }
            Intent::Reset => {
                self.reset();
                true
            }
            Intent::Pause => self.pause(),
            Intent::Resume => self.resume(),
            Intent::TogglePause => self.toggle_pause(),
            Intent::SoftDropOff => {
                let changed = self.soft_drop;
                self.set_soft_drop(false);
                changed
            }
            _ if !self.is_live() => false,
            Intent::MoveLeft => self.try_move(-1, 0),
            Intent::MoveRight => self.try_move(1, 0),
            Intent::Rotate => self.try_rotate(),
            Intent::SoftDropOn => {
                let changed = !self.soft_drop;
                self.set_soft_drop(true);
                changed
            }
        }
    }

    // --- piece control ---

    /// Make the pre-fetched next shape active and draw a new next shape.
    ///
    /// Returns false when the spawn placement collides.
    pub fn spawn_piece(&mut self) -> bool {
        let shape_idx = match self.next.take() {
            Some(idx) => idx,
            None => self.draw_shape(),
        };
        self.next = Some(self.draw_shape());

        let shape = self.shape(shape_idx);
        let piece = ActivePiece::spawn(shape_idx, shape, self.board.cols());
        let fits = !piece.collides(shape, &self.board);
        debug!(shape = %shape.id, x = piece.x, y = piece.y, fits, "spawned piece");

        self.active = Some(piece);
        self.lock_phase = LockPhase::Falling;
        self.fall_debt_ms = 0;
        fits
    }

    fn draw_shape(&mut self) -> usize {
        let zone = DangerZone::from_board(&self.board, &self.config.assist);
        select_shape(
            self.registry.shapes(),
            zone,
            &self.config.assist,
            &mut self.rng,
        )
        .unwrap_or(0)
    }

    /// Translate the active piece if the target placement is free.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        if !self.is_live() {
            return false;
        }
        self.shift(dx, dy)
    }

    fn shift(&mut self, dx: i32, dy: i32) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let moved = active.translated(dx, dy);
        if moved.collides(self.shape(active.shape), &self.board) {
            return false;
        }
        self.active = Some(moved);
        if dx != 0 || dy != 0 {
            self.lock_phase = LockPhase::Falling;
        }
        true
    }

    /// Rotate to the next kept rotation, trying each wall kick in turn.
    pub fn try_rotate(&mut self) -> bool {
        if !self.is_live() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };
        match active.rotated(self.shape(active.shape), &self.board) {
            Some(rotated) => {
                self.active = Some(rotated);
                self.lock_phase = LockPhase::Falling;
                true
            }
            None => false,
        }
    }

    fn can_move(&self, dx: i32, dy: i32) -> bool {
        self.active.is_some_and(|active| {
            !active
                .translated(dx, dy)
                .collides(self.shape(active.shape), &self.board)
        })
    }

    // --- simulation ---

    fn effective_interval_ms(&self) -> u32 {
        if self.soft_drop {
            soft_drop_interval_ms(self.drop_ms, &self.config.timing)
        } else {
            self.drop_ms
        }
    }

    /// Lock delay for a piece touching down now.
    fn lock_threshold_ms(&self) -> u32 {
        let lock = &self.config.lock;
        match self.last_input {
            Some((InputKind::Touch, at))
                if self.clock_ms.saturating_sub(at) <= lock.touch_recency_ms as u64 =>
            {
                lock.touch_ms
            }
            _ => lock.keyboard_ms,
        }
    }

    /// Advance the simulation by `dt_ms` (already clamped by the caller).
    pub fn tick(&mut self, dt_ms: u32) {
        self.clock_ms = self.clock_ms.saturating_add(dt_ms as u64);
        if !self.is_live() {
            return;
        }
        if self.active.is_none() && !self.spawn_piece() {
            self.end_game();
            return;
        }

        let timing = &self.config.timing;
        let interval = self.effective_interval_ms().max(1);
        let cap = interval.saturating_mul(timing.max_accumulated_steps);
        let max_steps = timing.max_fall_steps_per_frame;
        let per_cell = self.config.scoring.soft_drop_per_cell;
        self.fall_debt_ms = self.fall_debt_ms.saturating_add(dt_ms).min(cap);
        self.touched_this_frame = false;

        let mut steps = 0;
        while self.fall_debt_ms >= interval && steps < max_steps {
            if self.lock_phase.in_grace() {
                break;
            }
            if self.shift(0, 1) {
                self.fall_debt_ms -= interval;
                if self.soft_drop {
                    self.score = self.score.saturating_add(per_cell);
                }
                steps += 1;
            } else {
                self.lock_phase = LockPhase::Grace { elapsed_ms: 0 };
                self.touched_this_frame = true;
                break;
            }
        }

        self.resolve_grace(dt_ms);
    }

    fn resolve_grace(&mut self, dt_ms: u32) {
        let LockPhase::Grace { elapsed_ms } = self.lock_phase else {
            return;
        };
        if self.can_move(0, 1) {
            self.lock_phase = LockPhase::Falling;
            return;
        }
        let elapsed = if self.touched_this_frame {
            elapsed_ms
        } else {
            elapsed_ms.saturating_add(dt_ms)
        };
        if elapsed >= self.lock_threshold_ms() {
            self.lock_piece();
        } else {
            self.lock_phase = LockPhase::Grace {
                elapsed_ms: elapsed,
            };
        }
    }

    /// Write the active piece into the board, then clear lines and spawn.
    pub fn lock_piece(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        self.lock_phase = LockPhase::Falling;

        let shape = &self.registry.shapes()[piece.shape];
        let mut above_top = false;
        for ((bx, by), (cx, cy)) in piece.blocks(shape) {
            if by < 0 {
                above_top = true;
                continue;
            }
            self.board.set(
                bx,
                by,
                Some(LockedBlock {
                    shape: piece.shape as u16,
                    rotation: piece.rotation as u8,
                    cell_x: cx as u8,
                    cell_y: cy as u8,
                }),
            );
        }
        debug!(shape = %shape.id, x = piece.x, y = piece.y, "locked piece");

        if above_top {
            self.end_game();
            return;
        }

        let mut event = self.clear_lines();
        if !self.spawn_piece() {
            self.end_game();
            event.game_over = true;
        }
        self.last_event = Some(event);
    }

    /// Remove full rows and score them. Returns the number of rows removed.
    pub fn clear_full_lines(&mut self) -> u32 {
        let event = self.clear_lines();
        event.lines_cleared
    }

    fn clear_lines(&mut self) -> LockEvent {
        let count = self.board.clear_full_rows() as u32;
        if count == 0 {
            return LockEvent::default();
        }

        let points = calculate_score(count, self.level, &self.config.scoring);
        self.lines = self.lines.saturating_add(count);
        self.score = self.score.saturating_add(points);

        let level = level_for_lines(self.lines, &self.config.timing);
        let level_up = level != self.level;
        if level_up {
            self.level = level;
            self.drop_ms = drop_interval_ms(level, &self.config.timing);
            debug!(level, drop_ms = self.drop_ms, "level up");
        }

        LockEvent {
            lines_cleared: count,
            points,
            level_up,
            game_over: false,
        }
    }

    fn end_game(&mut self) {
        self.game_over = true;
        self.running = false;
        self.soft_drop = false;
        self.last_event = Some(LockEvent {
            game_over: true,
            ..LockEvent::default()
        });
        info!(score = self.score, lines = self.lines, level = self.level, "game over");
    }
}
