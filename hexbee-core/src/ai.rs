//! Beam-limited adversarial search and the engine facade

use crate::board::{Board, Cell, Point, Stone};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::eval::{evaluate, PositionCache, SharedCache};
use crate::history::{HistoryEntry, SavedState, SAVE_VERSION};
use crate::ordering::ordered_candidates;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Value returned by an abandoned search
const ABANDONED_VALUE: i32 = 0;

// ============================================================================
// SEARCH STATISTICS
// ============================================================================

/// Counters for one move request
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Search nodes entered below the root
    pub nodes: u64,
    /// Static evaluations requested (cached or not)
    pub evaluations: u64,
    /// Evaluations answered from the cache
    pub cache_hits: u64,
    /// Largest number of children expanded at a single node
    pub max_children: usize,
}

// ============================================================================
// SEARCH
// ============================================================================

/// Better for `mover`: higher for Red, lower for Blue
fn improves(mover: Stone, value: i32, best: i32) -> bool {
    match mover {
        Stone::Red => value > best,
        _ => value < best,
    }
}

/// Starting value for a node where `mover` is choosing
fn worst_value(mover: Stone) -> i32 {
    match mover {
        Stone::Red => i32::MIN,
        _ => i32::MAX,
    }
}

/// In-place search over a borrowed board
struct Searcher<'a> {
    board: &'a mut Board,
    cache: &'a mut PositionCache,
    max_depth: u32,
    beam_width: usize,
    abandon: &'a AtomicBool,
    stats: SearchStats,
}

impl Searcher<'_> {
    fn evaluate(&mut self) -> i32 {
        self.stats.evaluations += 1;
        let hits = self.cache.hits();
        let score = evaluate(self.board, self.cache);
        self.stats.cache_hits += self.cache.hits() - hits;
        score
    }

    /// Value of the current board with `mover` to play.
    ///
    /// Stops expanding siblings once the running best passes
    /// `previous_best`, the parent's best value so far.
    fn expand(&mut self, depth: u32, previous_best: i32, mover: Stone) -> i32 {
        if self.abandon.load(Ordering::Relaxed) {
            return ABANDONED_VALUE;
        }
        self.stats.nodes += 1;

        if depth >= self.max_depth {
            return self.evaluate();
        }

        let mut best = worst_value(mover);
        let mut children = 0;

        for candidate in ordered_candidates(self.board)
            .into_iter()
            .take(self.beam_width)
        {
            self.board.set(candidate.cell, mover);
            let value = self.expand(depth + 1, best, mover.opponent());
            self.board.set(candidate.cell, Stone::Empty);
            children += 1;

            if improves(mover, value, best) {
                best = value;
            }
            if improves(mover, best, previous_best) {
                self.note_children(children);
                return best;
            }
        }
        self.note_children(children);

        if children == 0 {
            best = self.evaluate();
        }
        best
    }

    fn note_children(&mut self, children: usize) {
        self.stats.max_children = self.stats.max_children.max(children);
    }

    /// Try every empty cell for `colour` and keep the best.
    /// Ties go to the first cell in row-major order.
    fn search_root(&mut self, colour: Stone) -> Option<(Cell, i32)> {
        let cells: Vec<Cell> = self.board.empty_cells().collect();
        let mut best: Option<(Cell, i32)> = None;
        let mut best_value = worst_value(colour);

        for cell in cells {
            self.board.set(cell, colour);
            let value = self.expand(1, best_value, colour.opponent());
            self.board.set(cell, Stone::Empty);

            if best.is_none() || improves(colour, value, best_value) {
                best_value = value;
                best = Some((cell, value));
            }
        }
        best
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Hex engine for one colour.
///
/// Owns the board, the position cache and the undo history. Calls must be
/// serialized by the caller; the only cross-thread surface is the abandon
/// flag from [`BeeAI::abandon_handle`].
pub struct BeeAI {
    colour: Stone,
    config: EngineConfig,
    board: Board,
    cache: SharedCache,
    history: Vec<HistoryEntry>,
    abandon: Arc<AtomicBool>,
    stats: SearchStats,
}

impl BeeAI {
    pub fn new(colour: Stone, config: EngineConfig) -> Result<Self> {
        let board = Board::new(config.grid_size);
        Self::with_board(colour, config, board)
    }

    /// Engine over an existing position
    pub fn with_board(colour: Stone, config: EngineConfig, board: Board) -> Result<Self> {
        config.validate()?;
        if colour.is_empty() {
            return Err(EngineError::InvalidConfig("engine colour must be Red or Blue".into()));
        }
        if board.grid_size() != config.grid_size {
            return Err(EngineError::InvalidConfig(format!(
                "board size {} does not match configured grid size {}",
                board.grid_size(),
                config.grid_size
            )));
        }
        Ok(Self {
            colour,
            config,
            board,
            cache: PositionCache::shared(),
            history: Vec::new(),
            abandon: Arc::new(AtomicBool::new(false)),
            stats: SearchStats::default(),
        })
    }

    pub fn colour(&self) -> Stone {
        self.colour
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Statistics of the most recent search
    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    /// Flag that makes an in-flight search return immediately.
    ///
    /// While set, move requests still commit a stone but report no move.
    pub fn abandon_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abandon)
    }

    fn abandoned(&self) -> bool {
        self.abandon.load(Ordering::Relaxed)
    }

    /// Record the opponent's move (if any) and choose a reply.
    ///
    /// Returns `Ok(None)` when the board has no empty cell or the search was
    /// abandoned. The chosen stone is committed either way.
    pub fn compute_move(&mut self, opponent: Option<Point>) -> Result<Option<Point>> {
        let opponent_cell = opponent.map(|p| self.checked_cell(p)).transpose()?;

        self.history.push(HistoryEntry::capture(&self.board, &self.cache));

        if let Some(cell) = opponent_cell {
            self.board.set(cell, self.colour.opponent());
        }

        let chosen = if opponent_cell.is_none() && self.board.is_empty() {
            self.stats = SearchStats::default();
            Some(self.board.center())
        } else {
            self.best_cell().map(|(cell, _)| cell)
        };

        let Some(cell) = chosen else {
            tracing::debug!("No empty cell left for {:?}", self.colour);
            return Ok(None);
        };
        self.board.set(cell, self.colour);

        tracing::debug!(
            "{:?} plays {:?} (nodes={}, evaluations={}, cache={})",
            self.colour,
            cell,
            self.stats.nodes,
            self.stats.evaluations,
            self.cache.borrow().len()
        );

        if self.abandoned() {
            return Ok(None);
        }
        Ok(self.board.to_point(cell))
    }

    /// Search the current position without committing anything.
    /// Returns the chosen cell and its root value.
    pub fn best_cell(&mut self) -> Option<(Cell, i32)> {
        let mut cache = self.cache.borrow_mut();
        let mut searcher = Searcher {
            board: &mut self.board,
            cache: &mut *cache,
            max_depth: self.config.depth,
            beam_width: self.config.beam_width,
            abandon: &self.abandon,
            stats: SearchStats::default(),
        };
        let best = searcher.search_root(self.colour);
        self.stats = searcher.stats;
        best
    }

    /// Cached static evaluation of the current board
    pub fn evaluate(&self) -> i32 {
        evaluate(&self.board, &mut self.cache.borrow_mut())
    }

    fn checked_cell(&self, point: Point) -> Result<Cell> {
        let cell = self.board.to_cell(point).ok_or(EngineError::InvalidMove {
            x: point.x,
            y: point.y,
            reason: "outside the board",
        })?;
        if !self.board.get(cell).is_empty() {
            return Err(EngineError::InvalidMove {
                x: point.x,
                y: point.y,
                reason: "cell is occupied",
            });
        }
        Ok(cell)
    }

    // ------------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------------

    /// Restore the state saved before the most recent move request.
    /// Does nothing when there is no history.
    pub fn undo(&mut self) {
        match self.history.pop() {
            Some(entry) => {
                let (board, cache) = entry.into_parts();
                self.board = board;
                self.cache = cache;
            }
            None => tracing::warn!("Undo with empty history ignored"),
        }
    }

    /// Empty board and a fresh cache. Earlier snapshots keep their own cache.
    pub fn reset(&mut self) {
        tracing::info!(
            "Resetting {:?} engine ({} history entries kept)",
            self.colour,
            self.history.len()
        );
        self.board = Board::new(self.config.grid_size);
        self.cache = PositionCache::shared();
    }

    /// Snapshot of the history stack
    pub fn export_state(&self) -> SavedState {
        SavedState {
            version: SAVE_VERSION,
            colour: self.colour,
            grid_size: self.config.grid_size,
            history: self.history.iter().map(|e| e.board().to_codes()).collect(),
        }
    }

    /// Replace the history with a saved stack, then undo once.
    ///
    /// The engine ends up where it was before the last saved move request,
    /// ready for that request to be issued again. With an empty stack the
    /// live board is left alone. The whole payload is validated first; on
    /// error nothing changes. Imported entries share one fresh cache.
    pub fn import_state(&mut self, saved: SavedState) -> Result<()> {
        if saved.colour != self.colour {
            return Err(EngineError::CorruptState(format!(
                "state belongs to {:?}, engine plays {:?}",
                saved.colour, self.colour
            )));
        }
        let boards = saved.decode(self.config.grid_size)?;

        let cache = PositionCache::shared();
        self.history = boards
            .into_iter()
            .map(|b| HistoryEntry::new(b, Rc::clone(&cache)))
            .collect();
        tracing::info!("Imported state with {} history entries", self.history.len());

        if !self.history.is_empty() {
            self.undo();
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
