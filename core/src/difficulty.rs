use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed board presets selectable by the player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn config(self) -> GameConfig {
        use Difficulty::*;
        // every preset leaves room for the excluded zone
        match self {
            Easy => GameConfig::new_unchecked(10, 15),
            Medium => GameConfig::new_unchecked(15, 40),
            Hard => GameConfig::new_unchecked(20, 80),
        }
    }

    pub const fn label(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "easy",
            Medium => "medium",
            Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.label().eq_ignore_ascii_case(s.trim()))
            .ok_or(GameError::UnknownDifficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_the_board_table() {
        assert_eq!(Difficulty::Easy.config().size(), (10, 10));
        assert_eq!(Difficulty::Easy.config().mines(), 15);
        assert_eq!(Difficulty::Medium.config().size(), (15, 15));
        assert_eq!(Difficulty::Medium.config().mines(), 40);
        assert_eq!(Difficulty::Hard.config().size(), (20, 20));
        assert_eq!(Difficulty::Hard.config().mines(), 80);
    }

    #[test]
    fn presets_pass_config_validation() {
        for difficulty in Difficulty::ALL {
            let config = difficulty.config();
            assert_eq!(GameConfig::new(config.side(), config.mines()), Ok(config));
        }
    }

    #[test]
    fn parses_labels() {
        assert_eq!("hard".parse(), Ok(Difficulty::Hard));
        assert_eq!(" Medium ".parse(), Ok(Difficulty::Medium));
        assert_eq!(
            "expert".parse::<Difficulty>(),
            Err(GameError::UnknownDifficulty)
        );
    }
}
