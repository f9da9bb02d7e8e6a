#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::difficulty::{Difficulty, recalc_time_limit};
    use crate::game::{MAX_FALL_SPEED, MIN_SPAWN_INTERVAL_MS, START_FALL_SPEED};

    #[test]
    fn test_time_limit_scales_with_spawn_interval() {
        assert_eq!(recalc_time_limit(1000), 1250);
        assert_eq!(recalc_time_limit(920), 1150);
        // 401 * 1.25 = 501.25, floored
        assert_eq!(recalc_time_limit(401), 501);
    }

    #[test]
    fn test_time_limit_is_clamped() {
        assert_eq!(recalc_time_limit(200), 420);
        assert_eq!(recalc_time_limit(0), 420);
        assert_eq!(recalc_time_limit(2000), 1400);
        assert_eq!(recalc_time_limit(u32::MAX), 1400);
    }

    #[test]
    fn test_default_difficulty() {
        let difficulty = Difficulty::default();
        assert_eq!(difficulty.spawn_interval_ms, 1000);
        assert_eq!(difficulty.time_limit_ms, 1250);
        assert!((difficulty.fall_speed - START_FALL_SPEED).abs() < f32::EPSILON);
        assert!((difficulty.speed_factor() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_acceleration_step() {
        let mut difficulty = Difficulty::default();
        difficulty.accelerate();

        assert_eq!(difficulty.spawn_interval_ms, 920);
        assert_eq!(difficulty.time_limit_ms, 1150);
        assert!((difficulty.fall_speed - START_FALL_SPEED * 1.08).abs() < 1e-5);
        assert!((difficulty.speed_factor() - 1000.0 / 920.0).abs() < 1e-5);
        assert_eq!(difficulty.steps, 1);
    }

    #[test]
    fn test_acceleration_stops_at_the_floor() {
        let mut difficulty = Difficulty {
            spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            ..Difficulty::default()
        };

        difficulty.accelerate();
        assert_eq!(difficulty.spawn_interval_ms, 260);
        difficulty.accelerate();
        assert_eq!(difficulty.spawn_interval_ms, 260);
        assert_eq!(difficulty.time_limit_ms, 420); // 325 clamps up
    }

    #[test]
    fn test_curve_is_monotonic_and_bounded() {
        let mut difficulty = Difficulty::default();
        let mut previous = difficulty;

        for _ in 0..100 {
            difficulty.accelerate();
            assert!(difficulty.spawn_interval_ms <= previous.spawn_interval_ms);
            assert!(difficulty.fall_speed >= previous.fall_speed);
            assert!(difficulty.time_limit_ms <= previous.time_limit_ms);
            assert!(difficulty.spawn_interval_ms >= MIN_SPAWN_INTERVAL_MS);
            assert!(difficulty.fall_speed <= MAX_FALL_SPEED);
            assert!((420..=1400).contains(&difficulty.time_limit_ms));
            previous = difficulty;
        }

        assert_eq!(difficulty.spawn_interval_ms, MIN_SPAWN_INTERVAL_MS);
        assert!((difficulty.fall_speed - MAX_FALL_SPEED).abs() < f32::EPSILON);
    }

    #[test]
    fn test_reset_restores_start_values() {
        let mut difficulty = Difficulty::default();
        difficulty.accelerate();
        difficulty.accelerate();
        difficulty.reset();
        assert_eq!(difficulty, Difficulty::default());
    }
}
