use serde::{Deserialize, Serialize};

/// Elapsed-seconds counter advanced by an external one-second tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTimer {
    elapsed_secs: u32,
    running: bool,
}

impl GameTimer {
    pub const fn new() -> Self {
        Self {
            elapsed_secs: 0,
            running: false,
        }
    }

    pub const fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advances by one second, returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        if self.running {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        }
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_only_while_running() {
        let mut timer = GameTimer::new();
        assert!(!timer.tick());
        assert_eq!(timer.elapsed_secs(), 0);

        timer.start();
        assert!(timer.tick());
        assert!(timer.tick());
        assert_eq!(timer.elapsed_secs(), 2);

        timer.stop();
        assert!(!timer.tick());
        assert_eq!(timer.elapsed_secs(), 2);
    }
}
