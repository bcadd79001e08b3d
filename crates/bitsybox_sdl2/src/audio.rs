use log::{info, warn};
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

use bitsybox_console::{ConsoleConfig, Synth};

/// Realtime audio callback. Owns the synthesizer outright; the main thread
/// only reaches it through the command queue.
pub struct SynthCallback {
    synth: Synth,
}

impl AudioCallback for SynthCallback {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        self.synth.fill(out);
    }
}

/// Open and start stereo playback. Returns `None` when audio is unavailable
/// and the console runs silently.
pub fn open_audio(
    sdl_context: &sdl2::Sdl,
    config: &ConsoleConfig,
    synth: Synth,
) -> Option<AudioDevice<SynthCallback>> {
    let audio = match sdl_context.audio() {
        Ok(audio) => audio,
        Err(e) => {
            warn!("Failed to init audio subsystem, disabling audio: {e}");
            return None;
        }
    };

    let desired = AudioSpecDesired {
        freq: Some(config.sample_rate as i32),
        channels: Some(2),
        samples: Some(config.audio_buffer_size),
    };
    let requested = synth.sample_rate();
    let device = audio.open_playback(None, &desired, |spec| {
        if spec.freq != requested as i32 || spec.channels != 2 {
            warn!(
                "Audio device opened at {} Hz x{} instead of {} Hz stereo",
                spec.freq, spec.channels, requested
            );
        }
        SynthCallback { synth }
    });

    match device {
        Ok(device) => {
            device.resume();
            info!("Audio device opened at {} Hz", requested);
            Some(device)
        }
        Err(e) => {
            warn!("Failed to open audio device, disabling audio: {e}");
            None
        }
    }
}
