use typed_builder::TypedBuilder;

use crate::SAMPLE_RATE;

/// Console tuning knobs. Every field has a default, so
/// `ConsoleConfig::builder().build()` is the stock console.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ConsoleConfig {
    /// Backend pixels per console pixel inside surfaces.
    #[builder(default = 4)]
    pub render_scale: u32,
    #[builder(default = SAMPLE_RATE)]
    pub sample_rate: u32,
    /// Audio callback buffer length in stereo frames.
    #[builder(default = 1024)]
    pub audio_buffer_size: u16,
    #[builder(default = 0.25)]
    pub master_volume: f32,
    /// Minimum accumulated time between logical frames.
    #[builder(default = 16)]
    pub frame_interval_ms: u32,
    #[builder(default = 256)]
    pub sound_queue_capacity: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
