use std::process::ExitCode;

use glam::Vec3;
use glow::HasContext;
use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Keycode,
};
use still_life::{
    abs::App,
    camera::Camera,
    config::Config,
    error::InitError,
    frame::FrameState,
    logger,
    other::InputState,
    render::scene::{FrameParams, Scene, SceneImages},
};

const CAMERA_START: Vec3 = Vec3::new(0.0, 1.5, 10.0);

/// Everything the application owns between startup and shutdown.
///
/// Fields drop in declaration order, so the scene releases its GPU objects while the context
/// owned by `app` is still alive.
struct StillLife {
    scene: Scene,
    camera: Camera,
    input: InputState,
    frame: FrameState,
    app: App,
}

impl StillLife {
    fn new(config: &Config) -> Result<Self, InitError> {
        // Decode every image up front so a missing file fails before any GPU work
        let images = SceneImages::load(&config.asset_dir)?;

        let app = App::new(
            &config.window_title,
            config.window_width,
            config.window_height,
            config.vsync,
        )
        .map_err(InitError::Window)?;
        let scene = Scene::new(&app.gl, &images)?;
        log::info!("Scene ready");

        Ok(Self {
            scene,
            camera: Camera::new(CAMERA_START, config.camera_speed, config.mouse_sensitivity),
            input: InputState::default(),
            frame: FrameState::default(),
            app,
        })
    }

    fn run(&mut self) {
        'running: loop {
            self.frame.tick();
            self.input.begin_frame();

            for event in self.app.event_pump.poll_iter() {
                match event {
                    Event::Quit { .. } => break 'running,
                    Event::Window {
                        win_event: WindowEvent::Resized(width, height),
                        ..
                    } => unsafe {
                        self.app.gl.viewport(0, 0, width, height);
                    },
                    _ => {}
                }
                self.input.handle_event(&event);
            }

            if self.input.is_down(Keycode::Escape) {
                break 'running;
            }

            self.frame.apply_input(&self.input, &mut self.camera);

            let projection = self
                .frame
                .projection
                .matrix(self.camera.zoom, self.app.aspect_ratio());
            self.scene.render(&FrameParams {
                view: self.camera.view_matrix(),
                projection,
                view_position: self.camera.position,
            });
            self.app.window.gl_swap_window();
        }
        log::info!("Window closed, shutting down");
    }
}

fn main() -> ExitCode {
    let config = Config::load();
    let level = config
        .as_ref()
        .map(Config::level_filter)
        .unwrap_or(log::LevelFilter::Info);
    if let Err(e) = logger::setup(level) {
        eprintln!("{}", InitError::Logger(e));
        return ExitCode::FAILURE;
    }

    let result = config
        .map_err(InitError::Config)
        .and_then(|config| StillLife::new(&config));
    match result {
        Ok(mut still_life) => {
            still_life.run();
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
