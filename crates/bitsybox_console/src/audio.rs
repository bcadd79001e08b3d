use rtrb::{Consumer, Producer, RingBuffer};

use crate::CHANNEL_COUNT;

/// Duty ratios selectable by script duty code, as (numerator, denominator).
const DUTY_RATIOS: [(u32, u32); 3] = [(1, 8), (1, 4), (1, 2)];
const DEFAULT_FREQUENCY_HZ: f64 = 440.0;
const DEFAULT_DUTY: u8 = 2;

/// Sample-unit conversions shared by both sides of the command queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleClock {
    pub sample_rate: u32,
}

impl SampleClock {
    /// `round(sample_rate / hz)`, never below one sample.
    pub fn cycle_length(&self, frequency_hz: f64) -> u32 {
        ((self.sample_rate as f64 / frequency_hz).round() as u32).max(1)
    }

    pub fn duty_length(cycle_length: u32, duty: u8) -> u32 {
        let (num, den) = DUTY_RATIOS[(duty as usize).min(DUTY_RATIOS.len() - 1)];
        (cycle_length as u64 * num as u64 / den as u64) as u32
    }

    pub fn duration_samples(&self, duration_ms: u32) -> u64 {
        duration_ms as u64 * self.sample_rate as u64 / 1000
    }
}

/// One pulse-wave voice, all lengths in samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channel {
    pub cycle_length: u32,
    pub duty_length: u32,
    pub duty: u8,
    pub volume: f32,
    pub remaining: u64,
}

impl Channel {
    fn boot(clock: SampleClock) -> Self {
        let cycle_length = clock.cycle_length(DEFAULT_FREQUENCY_HZ);
        Self {
            cycle_length,
            duty_length: SampleClock::duty_length(cycle_length, DEFAULT_DUTY),
            duty: DEFAULT_DUTY,
            volume: 0.0,
            remaining: 0,
        }
    }

    /// Pulse level at `step` of the shared master clock.
    #[inline]
    pub fn level(&self, step: u64) -> f32 {
        if step % self.cycle_length as u64 <= self.duty_length as u64 {
            1.0
        } else {
            0.0
        }
    }

    fn countdown(&mut self) {
        if self.remaining > 0 {
            self.remaining -= 1;
            if self.remaining == 0 {
                self.volume = 0.0;
            }
        }
    }

    fn apply(&mut self, command: &SoundCommand) {
        if let Some(remaining) = command.duration {
            self.remaining = remaining;
        }
        if let Some(cycle_length) = command.cycle_length {
            self.cycle_length = cycle_length.max(1);
        }
        if let Some(volume) = command.volume {
            self.volume = volume;
        }
        if let Some(duty) = command.duty {
            self.duty = duty;
        }
        self.duty_length = SampleClock::duty_length(self.cycle_length, self.duty);
    }
}

/// Partial channel update, already in sample units. `None` fields are left
/// as the audio thread currently has them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SoundCommand {
    pub channel: usize,
    pub duration: Option<u64>,
    pub cycle_length: Option<u32>,
    pub volume: Option<f32>,
    pub duty: Option<u8>,
}

/// Main-thread half of the audio link.
pub struct SoundController {
    clock: SampleClock,
    producer: Producer<SoundCommand>,
}

impl SoundController {
    pub fn clock(&self) -> SampleClock {
        self.clock
    }

    pub fn send(&mut self, command: SoundCommand) {
        if let Err(e) = self.producer.push(command) {
            log::warn!("sound command queue full; dropping {:?}", e);
        }
    }
}

/// Two-channel pulse synthesizer. Lives on the audio thread and is the only
/// owner of the channel state; parameter changes arrive as queued
/// [`SoundCommand`]s and are applied at the start of each buffer.
pub struct Synth {
    clock: SampleClock,
    master_volume: f32,
    step: u64,
    channels: [Channel; CHANNEL_COUNT],
    commands: Consumer<SoundCommand>,
}

impl Synth {
    pub fn new(sample_rate: u32, master_volume: f32, queue_capacity: usize) -> (Self, SoundController) {
        let clock = SampleClock { sample_rate };
        let (producer, commands) = RingBuffer::new(queue_capacity.max(1));
        let synth = Self {
            clock,
            master_volume,
            step: 0,
            channels: [Channel::boot(clock); CHANNEL_COUNT],
            commands,
        };
        (synth, SoundController { clock, producer })
    }

    pub fn sample_rate(&self) -> u32 {
        self.clock.sample_rate
    }

    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    /// Apply every queued command.
    pub fn apply_pending(&mut self) {
        while let Ok(command) = self.commands.pop() {
            if let Some(channel) = self.channels.get_mut(command.channel) {
                channel.apply(&command);
            }
        }
    }

    /// One stereo frame: channel 1 left, channel 2 right.
    pub fn next_frame(&mut self) -> [f32; 2] {
        let step = self.step;
        let master = self.master_volume;
        let frame = self
            .channels
            .map(|channel| channel.level(step) * channel.volume * master);
        for channel in self.channels.iter_mut() {
            channel.countdown();
        }
        self.step = self.step.wrapping_add(1);
        frame
    }

    /// Fill an interleaved stereo buffer. This is the realtime callback body.
    pub fn fill(&mut self, out: &mut [f32]) {
        self.apply_pending();
        for frame in out.chunks_exact_mut(2) {
            frame.copy_from_slice(&self.next_frame());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SAMPLE_RATE;

    fn synth() -> (Synth, SoundController) {
        Synth::new(SAMPLE_RATE, 1.0, 16)
    }

    #[test]
    fn half_duty_440_hz_matches_cycle_arithmetic() {
        let (mut synth, mut controller) = synth();
        let clock = controller.clock();
        let cycle_length = clock.cycle_length(440.0);
        assert_eq!(cycle_length, 100);
        assert_eq!(SampleClock::duty_length(cycle_length, 2), 50);

        controller.send(SoundCommand {
            channel: 0,
            cycle_length: Some(cycle_length),
            volume: Some(1.0),
            duty: Some(2),
            ..Default::default()
        });
        synth.apply_pending();
        for step in 0..1000u64 {
            let [left, right] = synth.next_frame();
            let expected = if step % 100 <= 50 { 1.0 } else { 0.0 };
            assert_eq!(left, expected, "step {step}");
            assert_eq!(right, 0.0);
        }
    }

    #[test]
    fn duration_expiry_silences_channel_for_good() {
        let (mut synth, mut controller) = synth();
        let samples = controller.clock().duration_samples(500);
        assert_eq!(samples, 22_050);

        controller.send(SoundCommand {
            channel: 1,
            duration: Some(samples),
            volume: Some(0.5),
            ..Default::default()
        });
        synth.apply_pending();
        for _ in 0..samples - 1 {
            synth.next_frame();
        }
        assert_eq!(synth.channel(1).unwrap().volume, 0.5);
        synth.next_frame();
        let channel = synth.channel(1).unwrap();
        assert_eq!(channel.volume, 0.0);
        assert_eq!(channel.remaining, 0);
        for _ in 0..1000 {
            assert_eq!(synth.next_frame()[1], 0.0);
        }
        assert_eq!(synth.channel(1).unwrap().remaining, 0);
    }

    #[test]
    fn long_durations_keep_every_sample() {
        let (mut synth, mut controller) = synth();
        let samples = controller.clock().duration_samples(100_000_000);
        assert_eq!(samples, 4_410_000_000);

        controller.send(SoundCommand {
            channel: 0,
            duration: Some(samples),
            volume: Some(1.0),
            ..Default::default()
        });
        let mut buffer = [0.0f32; 64];
        synth.fill(&mut buffer);
        let channel = synth.channel(0).unwrap();
        assert_eq!(channel.remaining, 4_410_000_000 - 32);
        assert_eq!(channel.volume, 1.0);
    }

    #[test]
    fn frequency_change_keeps_duty_ratio_and_master_clock() {
        let (mut synth, mut controller) = synth();
        let mut buffer = [0.0f32; 20];
        synth.fill(&mut buffer);
        assert_eq!(synth.step(), 10);

        controller.send(SoundCommand {
            channel: 0,
            duty: Some(0),
            ..Default::default()
        });
        controller.send(SoundCommand {
            channel: 0,
            cycle_length: Some(80),
            ..Default::default()
        });
        synth.fill(&mut buffer);
        let channel = synth.channel(0).unwrap();
        assert_eq!(channel.cycle_length, 80);
        assert_eq!(channel.duty_length, 10);
        assert_eq!(synth.step(), 20);
    }

    #[test]
    fn output_is_scaled_by_channel_and_master_volume() {
        let (mut synth, mut controller) = Synth::new(SAMPLE_RATE, 0.5, 4);
        controller.send(SoundCommand {
            channel: 0,
            volume: Some(0.5),
            ..Default::default()
        });
        let mut buffer = [0.0f32; 2];
        synth.fill(&mut buffer);
        assert_eq!(buffer, [0.25, 0.0]);
    }

    #[test]
    fn full_queue_drops_commands() {
        let (mut synth, mut controller) = Synth::new(SAMPLE_RATE, 1.0, 1);
        for volume in [0.1, 0.2] {
            controller.send(SoundCommand {
                channel: 0,
                volume: Some(volume),
                ..Default::default()
            });
        }
        synth.apply_pending();
        assert_eq!(synth.channel(0).unwrap().volume, 0.1);
    }
}
