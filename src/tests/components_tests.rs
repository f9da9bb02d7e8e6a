#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::components::{
        BlockColor, BlockId, ColorRng, GameOverReason, GameState, RoundState, UnknownColor,
    };

    #[test]
    fn test_parse_color_names() {
        assert_eq!("red".parse::<BlockColor>(), Ok(BlockColor::Red));
        assert_eq!("Green".parse::<BlockColor>(), Ok(BlockColor::Green));
        assert_eq!(" BLUE\n".parse::<BlockColor>(), Ok(BlockColor::Blue));
        assert_eq!("r".parse::<BlockColor>(), Ok(BlockColor::Red));
        assert_eq!("b".parse::<BlockColor>(), Ok(BlockColor::Blue));
        assert_eq!(
            "yellow".parse::<BlockColor>(),
            Err(UnknownColor("yellow".to_string()))
        );
    }

    #[test]
    fn test_color_display_round_trips() {
        for color in BlockColor::ALL {
            assert_eq!(color.to_string().parse::<BlockColor>(), Ok(color));
        }
    }

    #[test]
    fn test_reason_messages() {
        assert_eq!(
            GameOverReason::WrongColor {
                expected: BlockColor::Red
            }
            .to_string(),
            "Wrong! It was RED"
        );
        assert_eq!(
            GameOverReason::Timeout {
                expected: BlockColor::Blue
            }
            .to_string(),
            "Time's up! Next was BLUE (press R to restart)"
        );
        assert_eq!(
            GameOverReason::FloorReached.to_string(),
            "A block hit the floor!"
        );
    }

    #[test]
    fn test_block_id_display() {
        assert_eq!(BlockId(7).to_string(), "#7");
    }

    #[test]
    fn test_game_state_reset_keeps_id_counter() {
        let mut state = GameState::default();
        assert_eq!(state.allocate_block_id(), BlockId(0));
        assert_eq!(state.allocate_block_id(), BlockId(1));
        state.score = 12;
        state.round = RoundState::GameOver;
        state.last_reason = Some(GameOverReason::FloorReached);

        state.reset();

        assert_eq!(state.score, 0);
        assert_eq!(state.round, RoundState::Ready);
        assert!(state.last_reason.is_none());
        assert_eq!(state.allocate_block_id(), BlockId(2));
    }

    #[test]
    fn test_running_requires_unpaused_play() {
        let mut state = GameState::default();
        assert!(!state.is_running());
        state.round = RoundState::Playing;
        assert!(state.is_running());
        state.paused = true;
        assert!(!state.is_running());
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut a = ColorRng::new(Some(99));
        let mut b = ColorRng::new(Some(99));
        let first: Vec<BlockColor> = (0..32).map(|_| a.next_color()).collect();
        let second: Vec<BlockColor> = (0..32).map(|_| b.next_color()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rng_produces_every_color() {
        let mut rng = ColorRng::new(Some(5));
        let colors: Vec<BlockColor> = (0..300).map(|_| rng.next_color()).collect();
        for color in BlockColor::ALL {
            assert!(colors.contains(&color));
        }
    }
}
