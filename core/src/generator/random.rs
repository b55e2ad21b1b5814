use super::*;

/// Uniform rejection-sampling placement, optionally keeping the 3×3 block around one cell free of mines.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomGridGenerator {
    seed: u64,
    excluded: Option<Coord2>,
}

impl RandomGridGenerator {
    pub fn new(seed: u64, excluded: Option<Coord2>) -> Self {
        Self { seed, excluded }
    }

    /// Generator for a session's first reveal at `start`.
    pub fn with_safe_start(seed: u64, start: Coord2) -> Self {
        Self::new(seed, Some(start))
    }

    fn is_excluded(&self, coords: Coord2) -> bool {
        self.excluded
            .is_some_and(|excluded| is_within_one(excluded, coords))
    }

    fn excluded_cell_count(&self, size: Coord2) -> CellCount {
        match self.excluded {
            None => 0,
            Some(excluded) => {
                NeighborIter::new(excluded, size).count() as CellCount
                    + CellCount::from(excluded.0 < size.0 && excluded.1 < size.1)
            }
        }
    }
}

impl GridGenerator for RandomGridGenerator {
    fn generate(self, config: GameConfig) -> Result<Grid> {
        use rand::prelude::*;

        let size = config.size();
        if config.side() == 0 {
            return Err(GameError::EmptyBoard);
        }

        // the sampling loop below only terminates if enough cells are eligible
        let available = config
            .total_cells()
            .saturating_sub(self.excluded_cell_count(size));
        if config.mines() > available {
            log::warn!(
                "Cannot place {} mines, only {} cells are eligible",
                config.mines(),
                available
            );
            return Err(GameError::TooManyMines);
        }

        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        let mut mines_placed: CellCount = 0;
        let mut attempts: u32 = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        while mines_placed < config.mines() {
            attempts += 1;
            let coords = (rng.random_range(0..size.0), rng.random_range(0..size.1));
            if mine_mask[coords.to_nd_index()] || self.is_excluded(coords) {
                continue;
            }
            mine_mask[coords.to_nd_index()] = true;
            mines_placed += 1;
        }

        log::debug!(
            "Placed {} mines on {}x{} in {} attempts, excluded around {:?}",
            mines_placed,
            size.0,
            size.1,
            attempts,
            self.excluded
        );
        Ok(Grid::from_mine_mask(&mine_mask))
    }
}
