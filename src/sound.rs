//! Synthesized tick sound: a short click followed by a burst of filtered noise

use std::f32::consts::PI;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rodio::{Decoder, OutputStream, Sink};

pub const SAMPLE_RATE: u32 = 44_100;
/// Whole sound, in milliseconds
pub const DURATION_MS: u32 = 60;
const IMPULSE_SECS: f32 = 0.0015;
const ATTACK_SECS: f32 = 0.002;
const HIGHPASS_HZ: f32 = 2_000.0;
const NOISE_GAIN: f32 = 0.6;
/// Fixed so the cached file is reproducible
const NOISE_SEED: u64 = 0x71c4;

pub fn sample_count() -> usize {
    (SAMPLE_RATE * DURATION_MS / 1000) as usize
}

/// Samples held at full scale at the start
pub fn impulse_len() -> usize {
    (SAMPLE_RATE as f32 * IMPULSE_SECS).round() as usize
}

fn attack_len() -> usize {
    (SAMPLE_RATE as f32 * ATTACK_SECS).round() as usize
}

/// Gain of the noise tail at sample `i` of `tail`: linear attack, then quadratic decay to zero.
pub fn envelope(i: usize, tail: usize) -> f32 {
    let attack = attack_len();
    if i < attack {
        return i as f32 / attack as f32;
    }
    let decay = tail.saturating_sub(attack).max(1);
    let left = 1.0 - (i - attack) as f32 / decay as f32;
    left.max(0.0).powi(2)
}

pub fn synthesize_tick(seed: u64) -> Vec<i16> {
    let total = sample_count();
    let impulse = impulse_len();
    let tail = total - impulse;

    let dt = 1.0 / SAMPLE_RATE as f32;
    let rc = 1.0 / (2.0 * PI * HIGHPASS_HZ);
    let alpha = rc / (rc + dt);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(total);
    samples.extend(std::iter::repeat_n(i16::MAX, impulse));

    let (mut prev_in, mut prev_out) = (0.0f32, 0.0f32);
    for i in 0..tail {
        let x: f32 = rng.random_range(-1.0..=1.0);
        let y = alpha * (prev_out + x - prev_in);
        prev_in = x;
        prev_out = y;
        let s = y.clamp(-1.0, 1.0) * NOISE_GAIN * envelope(i, tail);
        samples.push((s * i16::MAX as f32) as i16);
    }
    samples
}

/// Write the tick to `path` as 16-bit mono WAV unless it is already there
pub fn ensure_tick_file(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("creating {}", path.display()))?;
    for s in synthesize_tick(NOISE_SEED) {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    log::info!("generated tick sound at {}", path.display());
    Ok(())
}

/// Plays the cached tick on a dedicated audio thread
pub struct TickPlayer {
    tx: Sender<()>,
}

impl TickPlayer {
    pub fn spawn(path: PathBuf) -> Result<Self> {
        ensure_tick_file(&path)?;
        let bytes: Arc<[u8]> = std::fs::read(&path)
            .with_context(|| format!("reading {}", path.display()))?
            .into();
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("tick-audio".to_owned())
            .spawn(move || run_audio(bytes, rx))
            .context("spawning audio thread")?;
        Ok(Self { tx })
    }

    pub fn play(&self) {
        if self.tx.send(()).is_err() {
            log::debug!("audio thread has exited; tick dropped");
        }
    }
}

fn run_audio(bytes: Arc<[u8]>, rx: Receiver<()>) {
    let mut output = OutputStream::try_default().ok();
    if output.is_none() {
        log::warn!("audio output unavailable; ticks are silent until a device appears");
    }
    let mut active: Vec<Sink> = Vec::new();

    while rx.recv().is_ok() {
        active.retain(|sink| !sink.empty());

        if output.is_none() {
            output = OutputStream::try_default().ok();
        }
        let Some((_, handle)) = output.as_ref() else {
            continue;
        };

        let decoder = match Decoder::new(Cursor::new(bytes.clone())) {
            Ok(decoder) => decoder,
            Err(err) => {
                log::debug!("failed decoding tick sound: {err}");
                continue;
            }
        };
        match Sink::try_new(handle) {
            Ok(sink) => {
                sink.append(decoder);
                active.push(sink);
            }
            Err(err) => log::debug!("failed opening sink: {err}"),
        }
    }
}
