use anyhow::{anyhow, Result};
use sdl2::controller::GameController;
use sdl2::event::Event;
use typed_builder::TypedBuilder;

use bitsybox_console::{Backend, Compositor, ConsoleConfig, FrameClock, Host, Synth, VIDEO_SIZE};

pub mod audio;
pub mod backend;
pub mod event;

pub use backend::SdlBackend;
pub use sdl2;

#[derive(TypedBuilder)]
pub struct SdlInitInfo {
    #[builder(default = "BITSYBOX".to_string())]
    pub title: String,
    #[builder(default = false)]
    pub fullscreen: bool,
    #[builder(default)]
    pub config: ConsoleConfig,
}

pub struct SdlContext {
    pub sdl_context: sdl2::Sdl,
    pub event_pump: sdl2::EventPump,
    pub backend: SdlBackend,
    controllers: Option<sdl2::GameControllerSubsystem>,
    open_pads: Vec<GameController>,
    window_size: u32,
}

impl SdlContext {
    /// Drive `host` until the window closes or the engine fails.
    ///
    /// The host must already be booted; `synth` is the other half of its
    /// sound queue and moves onto the audio thread.
    pub fn run(sdl_init_info: SdlInitInfo, mut host: Host, synth: Synth) -> Result<()> {
        let SdlInitInfo {
            title,
            fullscreen,
            config,
        } = sdl_init_info;
        let mut context = Self::new(&title, &config)?;
        let _audio = audio::open_audio(&context.sdl_context, &config, synth);
        if fullscreen {
            context.set_fullscreen(true)?;
        }

        let timer = context.sdl_context.timer().map_err(|e| anyhow!(e))?;
        let mut clock = FrameClock::new(config.frame_interval_ms);
        let mut compositor = Compositor::new();
        let mut last_ticks = timer.ticks();

        loop {
            let input = match context.event_pump.poll_event() {
                Some(sdl_event) => {
                    context.track_controllers(&sdl_event);
                    event::map_event(&sdl_event)
                }
                None => None,
            };

            let outcome = host.input_mut().tick(input);
            if outcome.quit {
                log::info!("quit requested");
                break;
            }
            if outcome.toggle_fullscreen {
                let fullscreen = !context.backend.is_fullscreen();
                context.set_fullscreen(fullscreen)?;
                host.state_mut().mark_dirty();
            }
            if outcome.resized {
                host.state_mut().mark_dirty();
            }

            let ticks = timer.ticks();
            let elapsed = ticks.wrapping_sub(last_ticks);
            last_ticks = ticks;
            if let Some(delta) = clock.advance(elapsed) {
                host.update(delta)?;
                compositor.render(host.state_mut(), &mut context.backend)?;
                context.backend.present()?;
            }
        }

        host.quit()
    }

    fn new(title: &str, config: &ConsoleConfig) -> Result<Self> {
        let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
        let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;
        let window_size = VIDEO_SIZE as u32 * config.render_scale;
        let window = video_subsystem
            .window(title, window_size, window_size)
            .position_centered()
            .resizable()
            .build()?;
        let canvas = window.into_canvas().accelerated().target_texture().build()?;
        let event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;
        let controllers = match sdl_context.game_controller() {
            Ok(controllers) => Some(controllers),
            Err(e) => {
                log::warn!("Game controllers unavailable: {e}");
                None
            }
        };
        log::info!("window opened at {}x{}", window_size, window_size);

        Ok(Self {
            sdl_context,
            event_pump,
            backend: SdlBackend::new(canvas),
            controllers,
            open_pads: Vec::new(),
            window_size,
        })
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()> {
        self.backend.set_fullscreen(fullscreen, self.window_size)?;
        self.sdl_context.mouse().show_cursor(!fullscreen);
        Ok(())
    }

    fn track_controllers(&mut self, event: &Event) {
        match *event {
            Event::ControllerDeviceAdded { which, .. } => {
                let Some(controllers) = &self.controllers else {
                    return;
                };
                match controllers.open(which) {
                    Ok(pad) => {
                        log::info!("controller connected: {}", pad.name());
                        self.open_pads.push(pad);
                    }
                    Err(e) => log::warn!("Failed to open controller {which}: {e}"),
                }
            }
            Event::ControllerDeviceRemoved { which, .. } => {
                self.open_pads.retain(|pad| pad.instance_id() != which);
            }
            _ => {}
        }
    }
}
