use alloc::vec::Vec;
use rand::prelude::*;

use crate::*;

/// One player's game from reset to win or loss: board, timer and difficulty.
///
/// Mines are only placed on the first reveal, keeping the 3×3 block around the clicked cell free of them so
/// the opening move always lands on a zero. Until then the board is unmined and only takes flags, which are
/// carried over onto the generated grid.
#[derive(Clone, Debug)]
pub struct GameSession {
    difficulty: Difficulty,
    engine: PlayEngine,
    timer: GameTimer,
    rng: SmallRng,
}

impl GameSession {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        log::debug!("New {} session, seed {}", difficulty, seed);
        Self {
            difficulty,
            engine: Self::unmined_engine(difficulty),
            timer: GameTimer::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Board shown before the first reveal decides where the mines go.
    fn unmined_engine(difficulty: Difficulty) -> PlayEngine {
        PlayEngine::new(Grid::unmined(difficulty.config()))
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn state(&self) -> GameState {
        self.engine.state()
    }

    pub fn is_first_click_pending(&self) -> bool {
        self.engine.state().is_initial()
    }

    pub fn size(&self) -> Coord2 {
        self.engine.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.difficulty.config().mines()
    }

    /// Mines minus placed flags; goes negative when the player over-flags.
    pub fn flags_remaining(&self) -> i32 {
        i32::from(self.total_mines()) - i32::from(self.engine.flag_count())
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.timer.elapsed_secs()
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Whether the one-second tick should currently be scheduled.
    pub fn is_ticking(&self) -> bool {
        self.timer.is_running() && !self.engine.is_finished()
    }

    pub fn cell_view(&self, coords: Coord2) -> CellView {
        self.engine.cell_view(coords)
    }

    pub fn can_chord_reveal_at(&self, coords: Coord2) -> bool {
        self.engine.can_chord_reveal_at(coords)
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.engine.grid().validate_coords(coords)?;
        if self.engine.is_finished() || !self.engine.cell_at(coords).is_hidden() {
            return Ok(RevealOutcome::NoChange);
        }

        if self.is_first_click_pending() {
            self.regenerate_around(coords)?;
            self.timer.start();
        }

        let outcome = self.engine.reveal(coords)?;
        self.on_reveal(outcome);
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.engine.toggle_flag(coords)
    }

    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let outcome = self.engine.chord_reveal(coords)?;
        self.on_reveal(outcome);
        Ok(outcome)
    }

    /// Advances the clock by one second while the game is running.
    pub fn tick(&mut self) -> bool {
        self.is_ticking() && self.timer.tick()
    }

    /// Starts a fresh game with the current difficulty.
    pub fn reset(&mut self) {
        self.engine = Self::unmined_engine(self.difficulty);
        self.timer = GameTimer::new();
        log::debug!("Session reset, difficulty {}", self.difficulty);
    }

    /// Switching to another difficulty resets the game, returns whether it did.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.difficulty == difficulty {
            return false;
        }
        self.difficulty = difficulty;
        self.reset();
        true
    }

    fn regenerate_around(&mut self, start: Coord2) -> Result<()> {
        let flags: Vec<Coord2> = {
            let grid = self.engine.grid();
            let (x_end, y_end) = grid.size();
            (0..x_end)
                .flat_map(|x| (0..y_end).map(move |y| (x, y)))
                .filter(|&pos| grid[pos].flagged)
                .collect()
        };

        let seed = self.rng.random();
        let grid =
            RandomGridGenerator::with_safe_start(seed, start).generate(self.difficulty.config())?;
        let mut engine = PlayEngine::new(grid);
        for &pos in &flags {
            engine.toggle_flag(pos)?;
        }
        log::debug!(
            "Grid regenerated around first reveal at {:?}, {} flags carried over",
            start,
            flags.len()
        );
        self.engine = engine;
        Ok(())
    }

    fn on_reveal(&mut self, outcome: RevealOutcome) {
        if let Some(event) = outcome.event() {
            self.timer.stop();
            log::info!(
                "Game over ({:?}) after {} seconds",
                event,
                self.timer.elapsed_secs()
            );
        }
    }
}
