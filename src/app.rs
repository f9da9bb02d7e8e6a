#![warn(clippy::all, clippy::pedantic)]

use log::{debug, info};
use std::collections::BTreeMap;
use std::error;
use std::time::{Duration, Instant};

use crate::components::{BlockColor, BlockId, RoundState};
use crate::config::Config;
use crate::events::GameObserver;
use crate::session::GameSession;
use crate::sound::{AudioState, SoundEffect};

pub type AppResult<T> = std::result::Result<T, Box<dyn error::Error>>;

/// What the renderer knows about one block, built purely from events
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockView {
    pub color: BlockColor,
    pub position: f32,
}

/// Renderer-side mirror of the game, kept up to date through [`GameObserver`]
#[derive(Debug, Clone, Default)]
pub struct GameView {
    pub blocks: BTreeMap<BlockId, BlockView>,
    pub score: u32,
    pub speed_factor: f32,
    pub timer_ratio: f32,
    pub countdown: Option<u32>,
    pub game_over: Option<String>,
    pub beam: Option<(BlockColor, Instant)>,
}

impl GameView {
    #[must_use]
    pub fn new() -> Self {
        Self {
            speed_factor: 1.0,
            timer_ratio: 1.0,
            ..Self::default()
        }
    }

    /// The beam color, if one was fired within `flash`
    #[must_use]
    pub fn active_beam(&self, flash: Duration) -> Option<BlockColor> {
        self.beam
            .filter(|(_, fired_at)| fired_at.elapsed() < flash)
            .map(|(color, _)| color)
    }
}

impl GameObserver for GameView {
    fn on_block_spawned(&mut self, id: BlockId, color: BlockColor, position: f32) {
        self.blocks.insert(id, BlockView { color, position });
    }

    fn on_block_position_changed(&mut self, id: BlockId, position: f32) {
        if let Some(block) = self.blocks.get_mut(&id) {
            block.position = position;
        }
    }

    fn on_block_removed(&mut self, id: BlockId) {
        self.blocks.remove(&id);
    }

    fn on_beam_fired(&mut self, color: BlockColor) {
        self.beam = Some((color, Instant::now()));
    }

    fn on_game_over(&mut self, reason: &str) {
        self.game_over = Some(reason.to_string());
        self.countdown = None;
    }

    fn on_score_changed(&mut self, score: u32) {
        self.score = score;
    }

    fn on_speed_changed(&mut self, speed_factor: f32) {
        self.speed_factor = speed_factor;
    }

    fn on_timer_ratio_changed(&mut self, ratio: f32) {
        self.timer_ratio = ratio;
    }

    fn on_countdown_tick(&mut self, seconds_remaining: u32) {
        self.countdown = Some(seconds_remaining);
        self.game_over = None;
    }
}

// Turns game events into sound effects
struct SoundCues<'a> {
    audio: &'a AudioState,
}

impl GameObserver for SoundCues<'_> {
    fn on_beam_fired(&mut self, color: BlockColor) {
        self.audio.play_sound(SoundEffect::Beam(color));
    }

    fn on_score_changed(&mut self, score: u32) {
        if score > 0 {
            self.audio.play_sound(SoundEffect::Hit);
        }
    }

    fn on_countdown_tick(&mut self, seconds_remaining: u32) {
        let effect = if seconds_remaining == 0 {
            SoundEffect::Go
        } else {
            SoundEffect::CountdownTick
        };
        self.audio.play_sound(effect);
    }

    fn on_game_over(&mut self, _reason: &str) {
        self.audio.play_sound(SoundEffect::GameOver);
    }
}

pub struct App {
    pub session: GameSession,
    pub view: GameView,
    pub audio: AudioState,
    pub config: Config,
    pub should_quit: bool,
}

impl App {
    /// Builds the app and immediately starts the first countdown
    pub fn new(config: Config, audio: AudioState) -> Self {
        let mut app = Self {
            session: GameSession::new(config.session.seed),
            view: GameView::new(),
            audio,
            config,
            should_quit: false,
        };
        app.session.restart();
        app.sync_view();
        app
    }

    pub fn shoot(&mut self, color: BlockColor) {
        self.session.shoot(color);
        self.sync_view();
    }

    pub fn restart(&mut self) {
        debug!("Restart requested");
        self.session.restart();
        self.sync_view();
    }

    /// Advances the game by one host tick
    pub fn on_tick(&mut self, delta_ms: u64) {
        self.session.advance_time(delta_ms);
        self.sync_view();
    }

    /// Takes over reloaded settings. The seed only matters when a session
    /// is created, so the running session keeps its own.
    pub fn apply_config(&mut self, config: &Config) {
        if self.audio.is_sound_enabled() != config.audio.sound_enabled {
            info!(
                "Sound {}",
                if config.audio.sound_enabled { "enabled" } else { "disabled" }
            );
        }
        self.audio.set_sound_enabled(config.audio.sound_enabled);
        if (self.audio.get_volume() - config.audio.volume).abs() > f32::EPSILON {
            self.audio.set_volume(config.audio.volume);
        }
        debug!("Display settings: {:?}", config.display);

        self.config.audio = config.audio.clone();
        self.config.display = config.display.clone();
    }

    /// Feeds pending game events to the view and the sound cues
    pub fn sync_view(&mut self) {
        let mut cues = SoundCues { audio: &self.audio };
        for event in self.session.drain_events() {
            event.dispatch(&mut self.view);
            event.dispatch(&mut cues);
        }
    }

    /// Status line: countdown, time left on the current target, or the game over reason
    pub fn status_message(&mut self) -> String {
        match self.session.round() {
            RoundState::Ready => "Press R to start".to_string(),
            RoundState::Countdown => match self.session.countdown_remaining() {
                0 => "GO!".to_string(),
                n => format!("READY... {n}"),
            },
            RoundState::Playing => match self.session.current_target() {
                Some(target) => {
                    let timer = self.session.target_timer();
                    format!(
                        "NEXT: {}  |  TIME: {:.2}s",
                        target.color.name().to_uppercase(),
                        f64::from(timer.remaining_ms) / 1000.0
                    )
                }
                None => "GO!".to_string(),
            },
            RoundState::GameOver => self
                .session
                .game_over_reason()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }

    /// Id of the block the player has to match, if any
    pub fn target_id(&mut self) -> Option<BlockId> {
        self.session.current_target().map(|block| block.id)
    }
}
