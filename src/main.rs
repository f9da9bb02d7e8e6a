#![warn(clippy::all, clippy::pedantic)]

use std::io;
use std::os::fd::AsRawFd;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{error, info, trace, warn};
use ratatui::{Terminal, prelude::*};
use rgb_beam::BlockColor;
use rgb_beam::app::{App, AppResult};
use rgb_beam::config::{Config, loader};
use rgb_beam::sound::AudioState;
use rgb_beam::ui;

// Game logic runs on a fixed cadence; rendering follows the configured frame period
const GAME_TICK_RATE: Duration = Duration::from_millis(10);

const LOG_PATH: &str = "rgb_beam.log";

fn main() -> AppResult<()> {
    init_logging(LOG_PATH)?;
    info!("Starting RGB Beam");

    load_startup_config();
    let config = Config::current();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let audio = AudioState::new(&config.audio);
    let result = run_app(&mut terminal, App::new(config, audio));

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!("Game error: {err:?}");
    }
    info!("Exiting RGB Beam");

    Ok(())
}

// Logs go to a file; stderr would draw over the alternate screen
fn init_logging(path: &str) -> AppResult<()> {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    // Safety: both descriptors are open for the duration of the call
    unsafe {
        libc::dup2(log_file.as_raw_fd(), io::stderr().as_raw_fd());
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();
    Ok(())
}

// A broken config file is reported and the defaults are used
fn load_startup_config() {
    let path = loader::get_config_file_path();
    if Config::force_reload() {
        info!("Configuration loaded from {}", path.display());
    } else {
        info!("Using default configuration");
    }
}

fn handle_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('q' | 'Q') => app.shoot(BlockColor::Red),
        KeyCode::Char('w' | 'W') => app.shoot(BlockColor::Green),
        KeyCode::Char('e' | 'E') => app.shoot(BlockColor::Blue),
        KeyCode::Char('r' | 'R') => app.restart(),
        _ => {}
    }
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> AppResult<()> {
    let mut last_render = Instant::now();
    let mut last_game_tick = Instant::now();

    // Keys pressed before the game started are not meant for it
    while event::poll(Duration::ZERO)? {
        event::read()?;
    }

    let mut warned_no_audio = false;

    loop {
        let frame_rate = Duration::from_millis(app.config.display.frame_ms.max(1));
        if last_render.elapsed() >= frame_rate {
            terminal.draw(|f| ui::render(f, &mut app))?;
            last_render = Instant::now();
        }

        let since_tick = last_game_tick.elapsed();
        if since_tick >= GAME_TICK_RATE {
            // Whole milliseconds only; the remainder carries into the next tick
            let delta_ms = u64::try_from(since_tick.as_millis()).unwrap_or(u64::MAX);
            last_game_tick += Duration::from_millis(delta_ms);
            app.on_tick(delta_ms);

            if !warned_no_audio && !app.audio.is_audio_available() {
                warn!("No audio output available, playing without sound");
                warned_no_audio = true;
            }

            if Config::check_and_reload() {
                app.apply_config(&Config::current());
            }
        }

        if app.should_quit {
            return Ok(());
        }

        if !event::poll(Duration::from_millis(2))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Release {
                trace!("Key {:?}", key.code);
                handle_key(&mut app, key.code);
            }
        }
    }
}
