/// Sound engine: procedural 8-bit style sound effects via rodio.
///
/// All effects are generated as in-memory WAV buffers at init time and
/// played fire-and-forget (non-blocking) via rodio's Sink. The frame
/// loop hands each frame's events to `process_events`, which maps them
/// to playback:
///
///   Jumped        → rising chirp
///   CoinCollected → two-note chime (also fires per coin during the
///                   post-win clock drain)
///   EnemyStomped  → dull thud
///   PipeEntered   → downward pitch sweep
///   PipeExited    → upward pitch sweep
///   PlayerDied    → falling tone run
///   StageCleared  → ascending fanfare
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

#[cfg(not(feature = "sound"))]
use crate::sim::event::GameEvent;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use crate::sim::event::GameEvent;

    const SAMPLE_RATE: u32 = 22050;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_jump: Arc<Vec<u8>>,
        sfx_coin: Arc<Vec<u8>>,
        sfx_stomp: Arc<Vec<u8>>,
        sfx_pipe_down: Arc<Vec<u8>>,
        sfx_pipe_up: Arc<Vec<u8>>,
        sfx_die: Arc<Vec<u8>>,
        sfx_clear: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            // ── Generate all sound buffers ──
            let sfx_jump = Arc::new(make_wav(&gen_jump()));
            let sfx_coin = Arc::new(make_wav(&gen_coin()));
            let sfx_stomp = Arc::new(make_wav(&gen_stomp()));
            let sfx_pipe_down = Arc::new(make_wav(&gen_pipe_sweep(false)));
            let sfx_pipe_up = Arc::new(make_wav(&gen_pipe_sweep(true)));
            let sfx_die = Arc::new(make_wav(&gen_die()));
            let sfx_clear = Arc::new(make_wav(&gen_clear()));

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_jump,
                sfx_coin,
                sfx_stomp,
                sfx_pipe_down,
                sfx_pipe_up,
                sfx_die,
                sfx_clear,
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        /// Play whatever this frame's events call for.
        pub fn process_events(&self, events: &[GameEvent]) {
            for ev in events {
                match ev {
                    GameEvent::Jumped => self.play(&self.sfx_jump),
                    GameEvent::CoinCollected => self.play(&self.sfx_coin),
                    GameEvent::EnemyStomped { .. } => self.play(&self.sfx_stomp),
                    GameEvent::PipeEntered => self.play(&self.sfx_pipe_down),
                    GameEvent::PipeExited => self.play(&self.sfx_pipe_up),
                    GameEvent::PlayerDied { .. } => self.play(&self.sfx_die),
                    GameEvent::StageCleared => self.play(&self.sfx_clear),
                    GameEvent::NewHighScore { .. } => {}
                }
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Jump: quick rising chirp
    fn gen_jump() -> Vec<f32> {
        let duration = 0.12;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 250.0 + t * 450.0; // 250Hz → 700Hz
                let ti = i as f32 / SAMPLE_RATE as f32;
                let env = (1.0 - t).powf(0.4);
                (ti * freq * 2.0 * std::f32::consts::PI).sin() * env * 0.25
            })
            .collect()
    }

    /// Coin: bright two-note chime B5→E6
    fn gen_coin() -> Vec<f32> {
        let pairs = [(988.0_f32, 0.06), (1319.0, 0.18)]; // B5, E6
        let mut samples = Vec::new();
        for &(freq, dur) in &pairs {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                // Square-ish wave (sine + octave) for retro feel
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.7
                    + (t * freq * 2.0 * 2.0 * std::f32::consts::PI).sin() * 0.3;
                samples.push(wave * env * 0.3);
            }
        }
        samples
    }

    /// Stomp: dull thud, noise over a dropping low tone
    fn gen_stomp() -> Vec<f32> {
        let duration = 0.1;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 777;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 160.0 + (1.0 - t) * 120.0; // 280Hz → 160Hz
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * freq * 2.0 * std::f32::consts::PI).sin();
                // Simple LCG noise
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(0.7);
                (tone * 0.6 + noise * 0.4) * env * 0.35
            })
            .collect()
    }

    /// Pipe travel: slow pitch sweep, downward on entry, upward on exit
    fn gen_pipe_sweep(rising: bool) -> Vec<f32> {
        let duration = 0.4;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let pos = if rising { t } else { 1.0 - t };
                let freq = 140.0 + pos * 320.0; // 140Hz ↔ 460Hz
                let ti = i as f32 / SAMPLE_RATE as f32;
                let env = (1.0 - t).powf(0.3);
                // Sub-octave underneath gives the warp some body
                let wave = (ti * freq * 2.0 * std::f32::consts::PI).sin() * 0.8
                    + (ti * freq * 0.5 * 2.0 * std::f32::consts::PI).sin() * 0.2;
                wave * env * 0.3
            })
            .collect()
    }

    /// Death: falling tone run
    fn gen_die() -> Vec<f32> {
        let notes = [523.0_f32, 494.0, 440.0, 349.0]; // C5→B4→A4→F4
        let note_dur = 0.11;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin();
                samples.push(wave * env * 0.3);
            }
        }
        // Final fade
        let fade_len = samples.len() / 4;
        let total = samples.len();
        for i in (total - fade_len)..total {
            let ratio = (total - i) as f32 / fade_len as f32;
            samples[i] *= ratio;
        }
        samples
    }

    /// Stage clear: ascending victory fanfare
    fn gen_clear() -> Vec<f32> {
        let notes = [392.0_f32, 523.0, 659.0, 784.0, 1047.0]; // G4→C5→E5→G5→C6
        let note_dur = 0.09;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.6
                    + (t * freq * 2.0 * 2.0 * std::f32::consts::PI).sin() * 0.3
                    + (t * freq * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.1;
                samples.push(wave * env * 0.3);
            }
        }
        // Sustain the last note
        let last_freq = 1047.0_f32;
        let n = (SAMPLE_RATE as f32 * 0.3) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32);
            let wave = (t * last_freq * 2.0 * std::f32::consts::PI).sin();
            samples.push(wave * env * 0.3);
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let channels: u16 = 1;
        let bits: u16 = 16;
        let byte_rate = SAMPLE_RATE * (channels as u32) * (bits as u32) / 8;
        let block_align = channels * bits / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
        buf.extend_from_slice(&channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> {
        Some(SoundEngine)
    }
    pub fn process_events(&self, _events: &[GameEvent]) {}
}
