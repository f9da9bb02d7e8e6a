#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::components::{BlockColor, GameOverReason, RoundState};
    use crate::events::GameEvent;
    use crate::game::INITIAL_BLOCKS;
    use crate::scheduler::{Process, Scheduler};
    use crate::session::GameSession;
    use crate::systems;
    use crate::tests::test_utils::{COUNTDOWN_MS, playing_session};

    fn countdown_ticks(events: &[GameEvent]) -> Vec<u32> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::CountdownTick { seconds_remaining } => Some(*seconds_remaining),
                _ => None,
            })
            .collect()
    }

    fn count_spawns(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::BlockSpawned { .. }))
            .count()
    }

    fn wrong_color(color: BlockColor) -> BlockColor {
        BlockColor::ALL
            .into_iter()
            .find(|c| *c != color)
            .expect("three colors")
    }

    #[test]
    fn test_new_session_is_ready() {
        let mut session = GameSession::new(Some(3));
        assert_eq!(session.round(), RoundState::Ready);
        assert_eq!(session.score(), 0);
        assert!(session.blocks().is_empty());

        // Nothing runs before the first restart
        session.advance_time(10_000);
        assert_eq!(session.round(), RoundState::Ready);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_countdown_leads_to_playing() {
        let mut session = GameSession::new(Some(3));
        session.restart();
        assert_eq!(session.round(), RoundState::Countdown);
        assert_eq!(session.countdown_remaining(), 3);

        session.advance_time(1000);
        assert_eq!(session.countdown_remaining(), 2);
        session.advance_time(1000);
        assert_eq!(session.countdown_remaining(), 1);
        assert_eq!(session.round(), RoundState::Countdown);
        assert!(session.blocks().is_empty());

        session.advance_time(1000);
        assert_eq!(session.round(), RoundState::Playing);
        assert_eq!(session.blocks().len(), INITIAL_BLOCKS);

        let events = session.drain_events();
        assert_eq!(countdown_ticks(&events), vec![3, 2, 1, 0]);
        assert_eq!(count_spawns(&events), INITIAL_BLOCKS);
    }

    #[test]
    fn test_nothing_moves_during_countdown() {
        let mut session = GameSession::new(Some(3));
        session.restart();
        session.advance_time(COUNTDOWN_MS - 1);

        let events = session.drain_events();
        assert!(
            events
                .iter()
                .all(|e| !matches!(e, GameEvent::BlockPositionChanged { .. }))
        );
        assert_eq!(count_spawns(&events), 0);
    }

    #[test]
    fn test_initial_blocks_are_staggered_first_lowest() {
        let mut session = playing_session(5);
        let blocks = session.blocks();

        assert_eq!(blocks.len(), INITIAL_BLOCKS);
        for pair in blocks.windows(2) {
            assert!(pair[0].position > pair[1].position);
        }
        assert_eq!(
            session.current_target().map(|b| b.id),
            Some(blocks[0].id)
        );
    }

    #[test]
    fn test_playing_arms_all_processes() {
        let session = playing_session(5);
        let scheduler = session.world.resource::<Scheduler>();

        assert!(scheduler.is_live(Process::Spawn));
        assert!(scheduler.is_live(Process::Accelerate));
        assert!(scheduler.is_live(Process::TargetTick));
        assert!(!scheduler.is_live(Process::Countdown));
    }

    #[test]
    fn test_blocks_fall_while_playing() {
        let mut session = playing_session(5);
        let before = session.blocks()[0].position;

        session.advance_time(500);

        // 1.2 units per frame at 60 frames per second
        let after = session.blocks()[0].position;
        assert!((after - before - 36.0).abs() < 1e-3);
    }

    #[test]
    fn test_fall_is_independent_of_step_size() {
        let mut coarse = playing_session(5);
        let mut fine = playing_session(5);

        coarse.advance_time(400);
        for _ in 0..25 {
            fine.advance_time(16);
        }

        let a = coarse.blocks()[0].position;
        let b = fine.blocks()[0].position;
        assert!((a - b).abs() < 1e-2);
    }

    #[test]
    fn test_spawn_process_adds_blocks() {
        let mut session = playing_session(5);
        session.advance_time(1000);

        let events = session.drain_events();
        assert_eq!(count_spawns(&events), 1);
        assert_eq!(session.blocks().len(), INITIAL_BLOCKS + 1);
    }

    #[test]
    fn test_floor_reached_ends_round() {
        let mut session = playing_session(5);
        // Keep the target timer from ending the round first
        session.world.resource_mut::<Scheduler>().cancel(Process::TargetTick);

        // The lowest block starts at 220 and falls 72 units per second
        session.advance_time(5000);

        assert_eq!(session.round(), RoundState::GameOver);
        assert_eq!(
            session.game_over_reason(),
            Some(&GameOverReason::FloorReached)
        );
        assert_eq!(
            session.world.resource::<Scheduler>().live_count(),
            0
        );
    }

    #[test]
    fn test_acceleration_reschedules_spawn() {
        let mut session = playing_session(5);
        let now = session.now_ms();

        systems::accelerate_system(&mut session.world);

        let difficulty = session.difficulty();
        assert_eq!(difficulty.spawn_interval_ms, 920);
        assert_eq!(difficulty.time_limit_ms, 1150);
        assert_eq!(
            session.world.resource_mut::<Scheduler>().next_fire_at(),
            Some(now + 50) // The target tick is still first
        );

        let events = session.drain_events();
        let expected_factor = 1000.0 / 920.0;
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::SpeedChanged { speed_factor }
                if (*speed_factor - expected_factor).abs() < 1e-5
        )));

        // Spawns now come 920ms after the acceleration
        session.world.resource_mut::<Scheduler>().cancel(Process::TargetTick);
        session.advance_time(919);
        assert_eq!(count_spawns(&session.drain_events()), 0);
        session.advance_time(1);
        assert_eq!(count_spawns(&session.drain_events()), 1);
    }

    #[test]
    fn test_acceleration_fires_every_six_seconds() {
        let mut session = playing_session(5);
        session.world.resource_mut::<Scheduler>().cancel(Process::TargetTick);
        session.world.resource_mut::<Scheduler>().cancel(Process::Spawn);

        session.advance_time(2000);
        assert_eq!(session.difficulty().steps, 0);

        // Blocks are cleared so the floor cannot end the round
        crate::queue::clear_blocks(&mut session.world);
        session.advance_time(4000);
        assert_eq!(session.difficulty().steps, 1);
        session.advance_time(6000);
        assert_eq!(session.difficulty().steps, 2);
    }

    #[test]
    fn test_acceleration_ignored_when_not_playing() {
        let mut session = GameSession::new(Some(1));
        session.restart();

        systems::accelerate_system(&mut session.world);
        assert_eq!(session.difficulty().steps, 0);
    }

    #[test]
    fn test_restart_twice_leaves_single_countdown() {
        let mut session = GameSession::new(Some(9));
        session.restart();
        session.advance_time(500);
        session.restart();

        // The first countdown would have finished at 3000
        session.advance_time(2600);
        assert_eq!(session.round(), RoundState::Countdown);
        assert_eq!(session.countdown_remaining(), 1);

        session.advance_time(400);
        assert_eq!(session.round(), RoundState::Playing);
        assert_eq!(session.blocks().len(), INITIAL_BLOCKS);

        let events = session.drain_events();
        assert_eq!(countdown_ticks(&events), vec![3, 3, 2, 1, 0]);
        assert_eq!(count_spawns(&events), INITIAL_BLOCKS);
    }

    #[test]
    fn test_restart_suppresses_rescheduled_spawn() {
        let mut session = playing_session(5);
        systems::accelerate_system(&mut session.world);
        session.restart();
        session.drain_events();

        session.advance_time(COUNTDOWN_MS - 1);
        assert_eq!(count_spawns(&session.drain_events()), 0);
        assert!(session.blocks().is_empty());

        session.advance_time(1);
        assert_eq!(session.round(), RoundState::Playing);
        assert_eq!(session.blocks().len(), INITIAL_BLOCKS);
        assert_eq!(session.difficulty().spawn_interval_ms, 1000);
    }

    #[test]
    fn test_restart_from_game_over_resets_round() {
        let mut session = playing_session(5);
        let target = session.current_target().expect("seeded lane");
        session.shoot(target.color);
        let next = session.current_target().expect("seeded lane");
        session.shoot(wrong_color(next.color));
        assert_eq!(session.round(), RoundState::GameOver);
        assert_eq!(session.score(), 1);

        session.restart();
        assert_eq!(session.round(), RoundState::Countdown);
        assert_eq!(session.score(), 0);
        assert!(session.blocks().is_empty());
        assert!(session.game_over_reason().is_none());

        let events = session.drain_events();
        assert!(events.contains(&GameEvent::ScoreChanged { score: 0 }));
        assert!(events.contains(&GameEvent::CountdownTick {
            seconds_remaining: 3
        }));
    }
}
