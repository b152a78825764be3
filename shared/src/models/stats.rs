//! User progression stats

use serde::{Deserialize, Serialize};

/// Experience granted for each completed prediction
pub const EXPERIENCE_PER_PREDICTION: u32 = 100;

/// Experience needed per level
pub const EXPERIENCE_PER_LEVEL: u32 = 500;

/// Progress of the user across predictions
///
/// Owned by whoever hosts the prediction flows and passed around explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserStats {
    pub predictions_count: u32,
    /// Carried for display; nothing updates it yet
    pub accuracy: f32,
    pub level: u32,
    pub experience: u32,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            predictions_count: 0,
            accuracy: 0.0,
            level: 1,
            experience: 0,
        }
    }
}

impl UserStats {
    /// Apply one completed prediction
    pub fn on_prediction_complete(&mut self) {
        // Client-supplied stats can sit near u32::MAX
        self.predictions_count = self.predictions_count.saturating_add(1);
        self.experience = self.experience.saturating_add(EXPERIENCE_PER_PREDICTION);
        self.level = level_for_experience(self.experience);
    }
}

pub fn level_for_experience(experience: u32) -> u32 {
    experience / EXPERIENCE_PER_LEVEL + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_completion() {
        let mut stats = UserStats::default();
        stats.on_prediction_complete();

        assert_eq!(stats.predictions_count, 1);
        assert_eq!(stats.experience, 100);
        assert_eq!(stats.level, 1);
    }

    #[test]
    fn test_level_up_after_five_predictions() {
        let mut stats = UserStats::default();
        for _ in 0..5 {
            stats.on_prediction_complete();
        }

        assert_eq!(stats.predictions_count, 5);
        assert_eq!(stats.experience, 500);
        assert_eq!(stats.level, 2);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for_experience(0), 1);
        assert_eq!(level_for_experience(499), 1);
        assert_eq!(level_for_experience(500), 2);
        assert_eq!(level_for_experience(1200), 3);
    }

    #[test]
    fn test_completion_saturates_near_max() {
        let mut stats: UserStats = serde_json::from_str(
            r#"{"predictions_count":4294967295,"accuracy":0.0,"level":1,"experience":4294967290}"#,
        )
        .unwrap();
        stats.on_prediction_complete();

        assert_eq!(stats.predictions_count, u32::MAX);
        assert_eq!(stats.experience, u32::MAX);
        assert_eq!(stats.level, level_for_experience(u32::MAX));
    }

    #[test]
    fn test_accuracy_untouched() {
        let mut stats = UserStats {
            accuracy: 0.75,
            ..UserStats::default()
        };
        stats.on_prediction_complete();
        assert_eq!(stats.accuracy, 0.75);
    }
}
