use alloc::collections::VecDeque;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - NotStarted -> Won
/// - NotStarted -> Lost
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Initial state
    #[default]
    NotStarted,
    /// Game started
    InProgress,
    /// Game ended and player won
    Won,
    /// Game ended and player lost
    Lost,
}

impl GameState {
    /// Indicates the game has not started yet
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Applies player moves to a grid and tracks how the game ends.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayEngine {
    grid: Grid,
    flag_count: CellCount,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

impl PlayEngine {
    pub fn new(grid: Grid) -> Self {
        let flag_count = grid.flagged_count();
        Self {
            grid,
            flag_count,
            state: Default::default(),
            triggered_mine: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_final()
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.grid.mine_count()
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    /// Mines minus placed flags; goes negative when the player over-flags.
    pub fn flags_remaining(&self) -> i32 {
        i32::from(self.grid.mine_count()) - i32::from(self.flag_count)
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.grid[coords]
    }

    pub fn cell_view(&self, coords: Coord2) -> CellView {
        if self.triggered_mine == Some(coords) {
            return CellView::TriggeredMine;
        }
        self.grid[coords].into()
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Whether a chord reveal at `coords` would open its neighbours.
    pub fn can_chord_reveal_at(&self, coords: Coord2) -> bool {
        if self.state.is_final() {
            return false;
        }

        let cell = self.grid[coords];
        cell.revealed
            && !cell.is_mine
            && cell.adjacent_mines == self.grid.count_flagged_neighbors(coords)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use MarkOutcome::*;

        let coords = self.grid.validate_coords(coords)?;
        if self.state.is_final() {
            log::debug!("Ignoring flag at {:?}, game already ended", coords);
            return Ok(NoChange);
        }

        let cell = self.grid.cell_mut(coords);
        if cell.revealed {
            return Ok(NoChange);
        }

        cell.flagged = !cell.flagged;
        if cell.flagged {
            self.flag_count += 1;
        } else {
            self.flag_count -= 1;
        }
        log::debug!(
            "Flag at {:?} toggled, {} flags remaining",
            coords,
            self.flags_remaining()
        );
        Ok(Changed)
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        Ok(self.reveal_cell(coords))
    }

    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.grid.validate_coords(coords)?;

        if !self.can_chord_reveal_at(coords) {
            return Ok(RevealOutcome::NoChange);
        }

        log::debug!("Chord reveal around {:?}", coords);
        // once a neighbour ends the game the remaining reveals are no-ops
        Ok(self
            .grid
            .iter_neighbors(coords)
            .fold(RevealOutcome::NoChange, |outcome, neighbor| {
                outcome | self.reveal_cell(neighbor)
            }))
    }

    fn reveal_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self.grid[coords];
        if self.state.is_final() || !cell.is_hidden() {
            return RevealOutcome::NoChange;
        }

        if cell.is_mine {
            self.lose(coords);
            return RevealOutcome::HitMine;
        }

        let opened = self.flood_reveal(coords);
        log::debug!("Reveal at {:?} opened {} cells", coords, opened);

        if self.grid.is_cleared() {
            self.state = GameState::Won;
            log::debug!("Board cleared, game won");
            RevealOutcome::Won
        } else {
            self.mark_started();
            RevealOutcome::Revealed
        }
    }

    /// Reveals `start` and the connected zero region around it, using an explicit frontier.
    fn flood_reveal(&mut self, start: Coord2) -> CellCount {
        let mut opened: CellCount = 0;
        let mut frontier = VecDeque::from([start]);

        while let Some(coords) = frontier.pop_front() {
            let cell = self.grid.cell_mut(coords);
            // a cell can be queued more than once before it is opened
            if cell.revealed || cell.flagged {
                continue;
            }
            debug_assert!(!cell.is_mine, "flood fill never reaches a mine");

            cell.revealed = true;
            opened += 1;
            let adjacent_mines = cell.adjacent_mines;
            log::trace!("Flood opened {:?}, mine count: {}", coords, adjacent_mines);

            if adjacent_mines == 0 {
                frontier.extend(
                    self.grid
                        .iter_neighbors(coords)
                        .filter(|&pos| self.grid[pos].is_hidden()),
                );
            }
        }

        opened
    }

    fn mark_started(&mut self) {
        if self.state.is_initial() {
            self.state = GameState::InProgress;
        }
    }

    fn lose(&mut self, coords: Coord2) {
        log::debug!("Mine hit at {:?}, game lost", coords);
        self.state = GameState::Lost;
        self.triggered_mine = Some(coords);

        let mines: alloc::vec::Vec<Coord2> = self.grid.iter_mines().collect();
        for mine in mines {
            self.grid.cell_mut(mine).revealed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(size: Coord2, mines: &[Coord2]) -> PlayEngine {
        PlayEngine::new(Grid::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn reveal_floods_from_far_corner_and_wins() {
        let mut engine = engine((3, 3), &[(0, 0)]);

        let outcome = engine.reveal((2, 2)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(engine.state(), GameState::Won);
        for x in 0..3 {
            for y in 0..3 {
                if (x, y) != (0, 0) {
                    assert!(engine.cell_at((x, y)).revealed, "({}, {})", x, y);
                }
            }
        }
        assert_eq!(engine.cell_view((1, 1)), CellView::Revealed(1));
        assert_eq!(engine.cell_view((2, 2)), CellView::Revealed(0));
        assert_eq!(engine.cell_view((0, 0)), CellView::Hidden);
    }

    #[test]
    fn numbered_cells_do_not_propagate() {
        let mut engine = engine((4, 1), &[(0, 0)]);

        assert_eq!(engine.reveal((1, 0)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(engine.state(), GameState::InProgress);
        assert_eq!(engine.cell_view((1, 0)), CellView::Revealed(1));
        assert_eq!(engine.cell_view((2, 0)), CellView::Hidden);
    }

    #[test]
    fn flood_stops_at_flags() {
        let mut engine = engine((5, 1), &[(0, 0)]);
        engine.toggle_flag((3, 0)).unwrap();

        assert_eq!(engine.reveal((2, 0)).unwrap(), RevealOutcome::Revealed);
        assert!(engine.cell_at((1, 0)).revealed);
        assert!(!engine.cell_at((3, 0)).revealed);
        assert!(!engine.cell_at((4, 0)).revealed);
    }

    #[test]
    fn revealing_an_open_zero_region_again_is_a_no_op() {
        // a wall of mines keeps the right half closed
        let mut engine = engine((5, 5), &[(2, 0), (2, 1), (2, 2), (2, 3), (2, 4)]);

        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);
        assert!(engine.cell_at((1, 4)).revealed);
        assert!(!engine.cell_at((3, 0)).revealed);
        let snapshot = engine.clone();

        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.reveal((0, 2)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine, snapshot);
    }

    #[test]
    fn flagged_cell_blocks_reveal() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        engine.toggle_flag((2, 2)).unwrap();

        assert_eq!(engine.reveal((2, 2)).unwrap(), RevealOutcome::NoChange);
        assert!(!engine.cell_at((2, 2)).revealed);
    }

    #[test]
    fn hitting_a_mine_reveals_all_mines_and_blocks_moves() {
        let mut engine = engine((4, 4), &[(0, 0), (3, 3), (0, 3)]);
        engine.toggle_flag((3, 3)).unwrap();

        let outcome = engine.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(outcome.event(), Some(GameEvent::Lost));
        assert_eq!(engine.state(), GameState::Lost);
        assert_eq!(engine.triggered_mine(), Some((0, 0)));
        assert!(engine.grid().iter_mines().all(|mine| engine.cell_at(mine).revealed));
        assert_eq!(engine.cell_view((0, 0)), CellView::TriggeredMine);
        assert_eq!(engine.cell_view((0, 3)), CellView::Mine);
        assert_eq!(engine.cell_view((3, 3)), CellView::Flagged);

        assert_eq!(engine.reveal((2, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.toggle_flag((2, 1)).unwrap(), MarkOutcome::NoChange);
        assert!(!engine.cell_at((2, 1)).revealed);
        assert!(!engine.cell_at((2, 1)).flagged);
    }

    #[test]
    fn win_does_not_need_flags() {
        let mut engine = engine((2, 1), &[(0, 0)]);

        let outcome = engine.reveal((1, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(outcome.event(), Some(GameEvent::Won));
        assert_eq!(engine.flag_count(), 0);
        assert!(engine.is_finished());
    }

    #[test]
    fn toggling_flag_twice_restores_cell_and_counter() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        let before = engine.flags_remaining();

        assert_eq!(engine.toggle_flag((1, 1)).unwrap(), MarkOutcome::Changed);
        assert!(engine.cell_at((1, 1)).flagged);
        assert_eq!(engine.flags_remaining(), before - 1);

        assert_eq!(engine.toggle_flag((1, 1)).unwrap(), MarkOutcome::Changed);
        assert!(!engine.cell_at((1, 1)).flagged);
        assert_eq!(engine.flags_remaining(), before);
    }

    #[test]
    fn flags_remaining_can_go_negative() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        engine.toggle_flag((0, 0)).unwrap();
        engine.toggle_flag((2, 2)).unwrap();

        assert_eq!(engine.flags_remaining(), -1);
        assert_eq!(engine.flag_count(), engine.grid().flagged_count());
    }

    #[test]
    fn revealed_cells_cannot_be_flagged() {
        let mut engine = engine((4, 1), &[(0, 0)]);
        engine.reveal((1, 0)).unwrap();

        assert_eq!(engine.toggle_flag((1, 0)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(engine.flag_count(), 0);
    }

    #[test]
    fn chord_reveal_with_matching_flags_opens_neighbors() {
        // mines left and right of the centre: the centre counts 2
        let mut engine = engine((3, 3), &[(0, 1), (2, 1)]);

        engine.reveal((1, 1)).unwrap();
        assert_eq!(engine.cell_view((1, 1)), CellView::Revealed(2));
        engine.toggle_flag((0, 1)).unwrap();
        engine.toggle_flag((2, 1)).unwrap();

        let outcome = engine.chord_reveal((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        for pos in [(0, 0), (1, 0), (2, 0), (0, 2), (1, 2), (2, 2)] {
            assert!(engine.cell_at(pos).revealed, "{:?}", pos);
        }
        assert!(!engine.cell_at((0, 1)).revealed);
    }

    #[test]
    fn chord_reveal_with_too_few_flags_is_a_no_op() {
        let mut engine = engine((3, 3), &[(0, 1), (2, 1)]);

        engine.reveal((1, 1)).unwrap();
        engine.toggle_flag((0, 1)).unwrap();
        let snapshot = engine.clone();

        assert_eq!(engine.chord_reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine, snapshot);
    }

    #[test]
    fn chord_reveal_on_hidden_cell_is_a_no_op() {
        let mut engine = engine((3, 3), &[(0, 0)]);

        assert_eq!(engine.chord_reveal((2, 2)).unwrap(), RevealOutcome::NoChange);
        assert!(!engine.cell_at((2, 2)).revealed);
    }

    #[test]
    fn chord_reveal_with_wrong_flag_loses() {
        let mut engine = engine((3, 3), &[(0, 1)]);

        engine.reveal((1, 1)).unwrap();
        engine.toggle_flag((1, 0)).unwrap();

        let outcome = engine.chord_reveal((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(engine.state(), GameState::Lost);
        assert_eq!(engine.triggered_mine(), Some((0, 1)));
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let mut engine = engine((3, 3), &[(0, 0)]);

        assert_eq!(engine.reveal((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(engine.toggle_flag((0, 3)), Err(GameError::InvalidCoords));
        assert_eq!(engine.chord_reveal((9, 9)), Err(GameError::InvalidCoords));
    }
}
