use serde::{Deserialize, Serialize};

/// One square of the grid, holding both the hidden truth and the player-visible marks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub revealed: bool,
    pub flagged: bool,
    /// Mines among the up to 8 neighbours, only meaningful for non-mine cells.
    pub adjacent_mines: u8,
}

impl Cell {
    pub const fn is_hidden(self) -> bool {
        !self.revealed && !self.flagged
    }

    /// Win condition for a single cell.
    pub const fn is_cleared(self) -> bool {
        self.is_mine || self.revealed
    }
}

/// What the player sees for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
    /// The mine whose reveal lost the game.
    TriggeredMine,
}

impl CellView {
    // whether the cell is visually closed
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}

impl From<Cell> for CellView {
    fn from(cell: Cell) -> Self {
        // flags win over the revealed mine shown after a loss
        match cell {
            Cell { flagged: true, .. } => Self::Flagged,
            Cell {
                revealed: true,
                is_mine: true,
                ..
            } => Self::Mine,
            Cell {
                revealed: true,
                adjacent_mines,
                ..
            } => Self::Revealed(adjacent_mines),
            _ => Self::Hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_follows_cell_marks() {
        let hidden = Cell::default();
        assert_eq!(CellView::from(hidden), CellView::Hidden);

        let flagged = Cell {
            flagged: true,
            ..hidden
        };
        assert_eq!(CellView::from(flagged), CellView::Flagged);

        let number = Cell {
            revealed: true,
            adjacent_mines: 3,
            ..hidden
        };
        assert_eq!(CellView::from(number), CellView::Revealed(3));

        let mine = Cell {
            revealed: true,
            is_mine: true,
            ..hidden
        };
        assert_eq!(CellView::from(mine), CellView::Mine);
    }

    #[test]
    fn flagged_mine_stays_flagged_after_loss() {
        let cell = Cell {
            is_mine: true,
            revealed: true,
            flagged: true,
            adjacent_mines: 0,
        };
        assert_eq!(CellView::from(cell), CellView::Flagged);
        assert!(CellView::from(cell).is_closed());
    }
}
