//! Challenge scoring.

use crate::config::Configuration;
use crate::engine::round_half_up;
use crate::levels::Level;

/// Scores a run against the active challenge level.
///
/// Returns 0 when no level is active or the level lacks usable
/// `maxPoints`/`difficulty`. The result floors at 0 but is not capped at
/// `maxPoints`.
pub fn score(_config: &Configuration, time: u64, level: Option<&Level>) -> u64 {
    let Some((max_points, difficulty)) = level.and_then(Level::goal) else {
        return 0;
    };

    let raw_score = max_points - time as f64 / difficulty;
    round_half_up(raw_score).max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(max_points: Option<f64>, difficulty: Option<f64>) -> Level {
        Level {
            id: 1,
            title: "test".to_string(),
            description: String::new(),
            start_config: Configuration::default(),
            max_points,
            difficulty,
        }
    }

    #[test]
    fn test_score_example() {
        let lvl = level(Some(1000.0), Some(5.0));
        // 1000 - 119/5 = 976.2
        assert_eq!(score(&Configuration::default(), 119, Some(&lvl)), 976);
    }

    #[test]
    fn test_no_level_scores_zero() {
        assert_eq!(score(&Configuration::default(), 10, None), 0);
    }

    #[test]
    fn test_incomplete_level_scores_zero() {
        let config = Configuration::default();
        assert_eq!(score(&config, 10, Some(&level(None, Some(5.0)))), 0);
        assert_eq!(score(&config, 10, Some(&level(Some(1000.0), None))), 0);
        assert_eq!(score(&config, 10, Some(&level(Some(1000.0), Some(0.0)))), 0);
        assert_eq!(score(&config, 10, Some(&level(Some(f64::NAN), Some(5.0)))), 0);
        assert_eq!(score(&config, 10, Some(&level(Some(f64::INFINITY), Some(5.0)))), 0);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let lvl = level(Some(100.0), Some(1.0));
        assert_eq!(score(&Configuration::default(), 1_000_000, Some(&lvl)), 0);
    }

    #[test]
    fn test_score_is_not_capped() {
        let lvl = level(Some(100.0), Some(-2.0));
        assert_eq!(score(&Configuration::default(), 50, Some(&lvl)), 125);
    }

    #[test]
    fn test_half_points_round_up() {
        let lvl = level(Some(10.0), Some(2.0));
        // 10 - 1/2 = 9.5
        assert_eq!(score(&Configuration::default(), 1, Some(&lvl)), 10);
    }
}
