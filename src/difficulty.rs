use std::str::FromStr;
use std::time::Duration;

use crate::error::{MazeError, Result};

/// Difficulty levels, ordered from easiest to hardest.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    VeryEasy,
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

/// Everything a difficulty level decides about a maze and its adversary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub width: u16,
    pub height: u16,
    /// Extra-openings density, 0 to 10. Walls are tried with `density * 2` percent chance.
    pub opening_density: u32,
    /// Path neighbours a wall needs before it may become an opening.
    pub opening_threshold: usize,
    /// Extra carve origins before progress decay.
    pub base_origins: u32,
    pub enemy: Option<EnemyProfile>,
}

/// The chasing adversary. Game loops move it once every `step_interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyProfile {
    pub step_interval: Duration,
}

impl EnemyProfile {
    /// The adversary never gets faster than this interval.
    pub const MIN_STEP_INTERVAL: Duration = Duration::from_millis(200);
    const SPEED_UP: Duration = Duration::from_millis(50);

    /// Every third completed maze shaves a bit off the step interval.
    /// Stops once the interval is at or below [`EnemyProfile::MIN_STEP_INTERVAL`].
    pub fn after(self, progress: Progress) -> Self {
        let headroom = self.step_interval.saturating_sub(Self::MIN_STEP_INTERVAL);
        let max_steps = headroom.as_millis().div_ceil(Self::SPEED_UP.as_millis());
        let steps = (progress.completed / 3).min(max_steps as u32);
        EnemyProfile {
            step_interval: self.step_interval.saturating_sub(Self::SPEED_UP * steps),
        }
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::VeryEasy,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn profile(self) -> DifficultyProfile {
        let (side, opening_density, step_interval) = match self {
            Difficulty::VeryEasy => (7, 10, None),
            Difficulty::Easy => (11, 6, Some(700)),
            Difficulty::Medium => (15, 5, Some(600)),
            Difficulty::Hard => (19, 3, Some(500)),
            Difficulty::Expert => (25, 0, Some(300)),
        };
        DifficultyProfile {
            width: side,
            height: side,
            opening_density,
            opening_threshold: if self >= Difficulty::Hard { 3 } else { 2 },
            base_origins: 2 + self.ordinal() / 2,
            enemy: step_interval.map(|ms| EnemyProfile {
                step_interval: Duration::from_millis(ms),
            }),
        }
    }

    /// Harder levels place the adversary far away from the start instead of the centre.
    pub fn spawns_enemy_far(self) -> bool {
        self >= Difficulty::Hard
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::VeryEasy => write!(f, "VERY EASY"),
            Difficulty::Easy => write!(f, "EASY"),
            Difficulty::Medium => write!(f, "MEDIUM"),
            Difficulty::Hard => write!(f, "HARD"),
            Difficulty::Expert => write!(f, "EXPERT"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "veryeasy" | "0" => Ok(Difficulty::VeryEasy),
            "easy" | "1" => Ok(Difficulty::Easy),
            "medium" | "2" => Ok(Difficulty::Medium),
            "hard" | "3" => Ok(Difficulty::Hard),
            "expert" | "4" => Ok(Difficulty::Expert),
            _ => Err(MazeError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// How many mazes the player has already completed in this session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: u32,
}

impl Progress {
    pub const MIN_LOOP_CHANCE: u32 = 2;
    const START_LOOP_CHANCE: u32 = 10;

    pub fn new(completed: u32) -> Self {
        Progress { completed }
    }

    /// Percent chance of re-queuing a cell during origin shifting. Falls with progress.
    pub fn loop_chance(self) -> u32 {
        Self::START_LOOP_CHANCE
            .saturating_sub(self.completed)
            .max(Self::MIN_LOOP_CHANCE)
    }

    /// Extra origins after decay: untouched for the first two mazes, then one fewer
    /// every two completions, never below one.
    pub fn extra_origins(self, base: u32) -> u32 {
        if self.completed <= 1 {
            base
        } else {
            base.saturating_sub(self.completed / 2).max(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_table() {
        let sizes = Difficulty::ALL.map(|d| d.profile().width);
        assert_eq!(sizes, [7, 11, 15, 19, 25]);
        let densities = Difficulty::ALL.map(|d| d.profile().opening_density);
        assert_eq!(densities, [10, 6, 5, 3, 0]);
        assert!(Difficulty::ALL.iter().all(|d| {
            let p = d.profile();
            p.width == p.height && p.width % 2 == 1
        }));
    }

    #[test]
    fn test_profiles_are_monotonic() {
        for pair in Difficulty::ALL.windows(2) {
            let (easier, harder) = (pair[0].profile(), pair[1].profile());
            assert!(easier.width <= harder.width);
            assert!(easier.opening_density >= harder.opening_density);
            assert!(easier.opening_threshold <= harder.opening_threshold);
        }
    }

    #[test]
    fn test_enemy_profile() {
        assert_eq!(Difficulty::VeryEasy.profile().enemy, None);
        let expert = Difficulty::Expert.profile().enemy.unwrap();
        assert_eq!(expert.step_interval, Duration::from_millis(300));

        let easy = Difficulty::Easy.profile().enemy.unwrap();
        assert_eq!(easy.after(Progress::new(2)), easy);
        let sped_up = easy.after(Progress::new(6));
        assert_eq!(sped_up.step_interval, Duration::from_millis(600));
        let capped = expert.after(Progress::new(30));
        assert_eq!(capped.step_interval, EnemyProfile::MIN_STEP_INTERVAL);
    }

    #[test]
    fn test_enemy_speed_up_stops_at_floor() {
        let easy = Difficulty::Easy.profile().enemy.unwrap();
        // 700ms needs ten speed-ups, one every third level
        assert_eq!(
            easy.after(Progress::new(29)).step_interval,
            Duration::from_millis(250)
        );
        assert_eq!(
            easy.after(Progress::new(30)).step_interval,
            EnemyProfile::MIN_STEP_INTERVAL
        );
        for completed in [31, 1_000, u32::MAX] {
            assert_eq!(
                easy.after(Progress::new(completed)).step_interval,
                EnemyProfile::MIN_STEP_INTERVAL
            );
        }

        // Off-grid intervals take one last step past the floor, then stop
        let odd = EnemyProfile {
            step_interval: Duration::from_millis(220),
        };
        assert_eq!(
            odd.after(Progress::new(u32::MAX)).step_interval,
            Duration::from_millis(170)
        );
        let slow_floor = EnemyProfile {
            step_interval: Duration::from_millis(150),
        };
        assert_eq!(slow_floor.after(Progress::new(9)), slow_floor);
    }

    #[test]
    fn test_loop_chance_decays_to_floor() {
        assert_eq!(Progress::new(0).loop_chance(), 10);
        assert_eq!(Progress::new(3).loop_chance(), 7);
        assert_eq!(Progress::new(8).loop_chance(), 2);
        assert_eq!(Progress::new(50).loop_chance(), 2);
    }

    #[test]
    fn test_extra_origins_decay() {
        let base = Difficulty::Expert.profile().base_origins;
        assert_eq!(base, 4);
        assert_eq!(Progress::new(0).extra_origins(base), 4);
        assert_eq!(Progress::new(1).extra_origins(base), 4);
        assert_eq!(Progress::new(2).extra_origins(base), 3);
        assert_eq!(Progress::new(5).extra_origins(base), 2);
        assert_eq!(Progress::new(40).extra_origins(base), 1);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("very-easy".parse(), Ok(Difficulty::VeryEasy));
        assert_eq!("EXPERT".parse(), Ok(Difficulty::Expert));
        assert_eq!("3".parse(), Ok(Difficulty::Hard));
        assert!("impossible".parse::<Difficulty>().is_err());
        for d in Difficulty::ALL {
            let shown = d.to_string();
            assert_eq!(shown.parse(), Ok(d));
        }
    }
}
