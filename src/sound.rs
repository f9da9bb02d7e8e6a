use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use crossbeam_channel::{Receiver, Sender, bounded};
use fundsp::hacker32::*;
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::components::BlockColor;
use crate::config::AudioConfig;

/// Cues the game can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Beam(BlockColor),
    Hit,
    CountdownTick,
    Go,
    GameOver,
}

impl SoundEffect {
    /// Seconds after which the effect is silent and can be dropped
    #[must_use]
    pub fn duration(self) -> f64 {
        match self {
            SoundEffect::Beam(_) => 0.18,
            SoundEffect::Hit | SoundEffect::CountdownTick => 0.1,
            SoundEffect::Go => 0.4,
            SoundEffect::GameOver => 1.0,
        }
    }
}

// Messages from the game thread to the audio thread
enum AudioCommand {
    PlaySound(SoundEffect),
    SetVolume(f32), // 0.0 to 1.0
    Quit,
}

pub struct AudioState {
    sender: Option<Sender<AudioCommand>>,
    available: Arc<AtomicBool>,
    sound_enabled: bool,
    volume: f32,
}

impl AudioState {
    pub fn new(config: &AudioConfig) -> Self {
        let (sender, receiver) = bounded(64);
        let available = Arc::new(AtomicBool::new(true));
        let thread_available = Arc::clone(&available);
        let volume = config.volume.clamp(0.0, 1.0);

        thread::spawn(move || {
            if let Err(e) = run_audio_thread(&receiver, volume) {
                error!("Audio thread error: {e}");
                thread_available.store(false, Ordering::Relaxed);
            }
        });

        Self {
            sender: Some(sender),
            available,
            sound_enabled: config.sound_enabled,
            volume,
        }
    }

    /// An audio state that never opens a device
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            sender: None,
            available: Arc::new(AtomicBool::new(false)),
            sound_enabled: false,
            volume: 0.0,
        }
    }

    pub fn play_sound(&self, effect: SoundEffect) -> bool {
        if !self.sound_enabled {
            return false;
        }
        if let Some(sender) = &self.sender {
            let _ = sender.try_send(AudioCommand::PlaySound(effect));
        }
        true
    }

    pub fn is_audio_available(&self) -> bool {
        self.sender.is_some() && self.available.load(Ordering::Relaxed)
    }

    pub fn is_sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    pub fn get_volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sender) = &self.sender {
            let _ = sender.try_send(AudioCommand::SetVolume(self.volume));
        }
    }
}

impl Drop for AudioState {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            let _ = sender.try_send(AudioCommand::Quit);
        }
    }
}

fn run_audio_thread(receiver: &Receiver<AudioCommand>, initial_volume: f32) -> Result<()> {
    let device = cpal::default_host()
        .default_output_device()
        .ok_or_else(|| anyhow::anyhow!("No audio output device found"))?;
    let supported = device.default_output_config()?;
    debug!("Audio output: {supported:?}");

    let (effect_sender, effect_receiver) = bounded::<SoundEffect>(64);
    let (volume_sender, volume_receiver) = bounded::<f32>(16);
    let mixer = Mixer {
        voices: Vec::new(),
        volume: initial_volume,
        sample_rate: f64::from(supported.sample_rate().0),
        effects: effect_receiver,
        volume_changes: volume_receiver,
    };

    let format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();
    // The stream stops when dropped, so it lives as long as this thread
    let _stream = match format {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, mixer)?,
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, mixer)?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, mixer)?,
        other => return Err(anyhow::anyhow!("Unsupported sample format {other:?}")),
    };

    while let Ok(command) = receiver.recv() {
        match command {
            AudioCommand::PlaySound(effect) => {
                let _ = effect_sender.try_send(effect);
            }
            AudioCommand::SetVolume(volume) => {
                let _ = volume_sender.try_send(volume);
            }
            AudioCommand::Quit => break,
        }
    }

    debug!("Audio thread finished");
    Ok(())
}

// Lives inside the stream callback and sums every sounding voice
struct Mixer {
    voices: Vec<(Box<dyn AudioUnit>, u64)>, // Unit and samples left
    volume: f32,
    sample_rate: f64,
    effects: Receiver<SoundEffect>,
    volume_changes: Receiver<f32>,
}

impl Mixer {
    fn start_pending(&mut self) {
        while let Ok(volume) = self.volume_changes.try_recv() {
            self.volume = volume;
        }
        while let Ok(effect) = self.effects.try_recv() {
            let mut unit = create_sound_effect(effect);
            unit.set_sample_rate(self.sample_rate);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let samples = (effect.duration() * self.sample_rate) as u64;
            self.voices.push((unit, samples));
        }
    }

    fn next_frame(&mut self) -> (f32, f32) {
        let (mut left, mut right) = (0.0, 0.0);
        for (unit, samples_left) in &mut self.voices {
            let (l, r) = unit.get_stereo();
            left += l;
            right += r;
            *samples_left = samples_left.saturating_sub(1);
        }
        self.voices.retain(|(_, samples_left)| *samples_left > 0);

        (
            (left * self.volume).clamp(-1.0, 1.0),
            (right * self.volume).clamp(-1.0, 1.0),
        )
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut mixer: Mixer,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = usize::from(config.channels);

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            mixer.start_pending();
            for frame in data.chunks_mut(channels) {
                let (left, right) = mixer.next_frame();
                let (left, right) = (T::from_sample(left), T::from_sample(right));
                // Even channels get the left signal, odd ones the right
                for (channel, out) in frame.iter_mut().enumerate() {
                    *out = if channel % 2 == 0 { left } else { right };
                }
            }
        },
        |err| error!("Audio stream error: {err}"),
        None,
    )?;

    stream.play()?;
    Ok(stream)
}

/// Base pitch of the beam for each color
#[must_use]
pub fn beam_frequency(color: BlockColor) -> f32 {
    match color {
        BlockColor::Red => 330.0,
        BlockColor::Green => 440.0,
        BlockColor::Blue => 550.0,
    }
}

// Short zap that falls in pitch, panned by color
fn create_beam(color: BlockColor) -> Box<dyn AudioUnit> {
    let base = beam_frequency(color);
    let pan_position = match color {
        BlockColor::Red => -0.4,
        BlockColor::Green => 0.0,
        BlockColor::Blue => 0.4,
    };

    let sweep = envelope(move |t| lerp(base * 2.0, base, (t * 10.0).min(1.0))) >> sine();
    let node = sweep * envelope(|t| (0.18 - t).max(0.0) * 5.0) * 0.3;
    Box::new(node >> pan(pan_position))
}

fn create_hit() -> Box<dyn AudioUnit> {
    let click = sine_hz(880.0) * envelope(|t| if t < 0.06 { 1.0 } else { 0.0 }) * 0.25;
    Box::new(click >> pan(0.0))
}

fn create_countdown_tick() -> Box<dyn AudioUnit> {
    let beep = sine_hz(440.0) * envelope(|t| if t < 0.08 { 1.0 } else { 0.0 }) * 0.3;
    Box::new(beep >> pan(0.0))
}

fn create_go() -> Box<dyn AudioUnit> {
    let beep = sine_hz(880.0) * envelope(|t| if t < 0.35 { 1.0 } else { 0.0 }) * 0.3;
    Box::new(beep >> pan(0.0))
}

fn create_game_over() -> Box<dyn AudioUnit> {
    // Descending pitch
    let sweep = envelope(|t| lerp(600.0, 200.0, t)) >> sine();
    let node = sweep * envelope(|t| (1.0 - t).max(0.0) * 0.5) * 0.4;
    Box::new(node >> pan(0.0))
}

fn create_sound_effect(effect: SoundEffect) -> Box<dyn AudioUnit> {
    match effect {
        SoundEffect::Beam(color) => create_beam(color),
        SoundEffect::Hit => create_hit(),
        SoundEffect::CountdownTick => create_countdown_tick(),
        SoundEffect::Go => create_go(),
        SoundEffect::GameOver => create_game_over(),
    }
}
