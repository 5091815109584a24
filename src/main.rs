use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, anyhow};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::Config;
use crate::game::Game;
use crate::level::Level;
use crate::renderer::FrameCompositor;
use crate::scaler::{ScaleLut, blit_nearest_stretch};

mod camera;
mod config;
mod error;
mod game;
mod level;
mod minimap;
mod projector;
mod raycaster;
mod renderer;
mod scaler;

const TITLE: &str = "maze 3d raycasting";
const HINTS: &str = "arrows to move, ESC to exit";

struct App {
    config: Config,
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    game: Game,
    compositor: FrameCompositor,

    // Fixed-size internal frame, stretched to the window
    frame: Vec<u32>,
    scale_lut: Option<ScaleLut>,

    // HUD
    frame_counter: u32,
    last_fps_report: Instant,
    exit_announced: bool,

    keys_down: HashSet<KeyCode>,
    last_tick: Instant,

    fatal: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config, level: Level) -> Self {
        let compositor = FrameCompositor::new(&config, &level.grid);
        let frame = vec![0; compositor.width() * compositor.height()];
        let game = Game::new(level, &config);

        Self {
            config,
            window: None,
            surface: None,
            game,
            compositor,

            frame,
            scale_lut: None,

            frame_counter: 0,
            last_fps_report: Instant::now(),
            exit_announced: false,

            keys_down: HashSet::new(),
            last_tick: Instant::now(),

            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{:#}", err);
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(
                self.config.screen_width as f64,
                self.config.screen_height as f64,
            ));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| anyhow!("failed to create window: {}", e))?,
        );
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow!("failed to create softbuffer context: {}", e))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow!("failed to create softbuffer surface: {}", e))?;

        window.request_redraw();
        self.surface = Some(surface);
        self.window = Some(window);
        self.last_tick = Instant::now();
        Ok(())
    }

    fn pressed(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.keys_down.contains(k))
    }

    fn tick(&mut self) {
        // Cap dt to avoid huge jumps if the app was paused
        let now = Instant::now();
        let dt = now
            .duration_since(self.last_tick)
            .min(Duration::from_millis(100))
            .as_secs_f64();
        self.last_tick = now;

        let step = self.config.move_speed * dt;
        if self.pressed(&[KeyCode::ArrowUp, KeyCode::KeyW]) {
            self.game.handle_move(step);
        } else if self.pressed(&[KeyCode::ArrowDown, KeyCode::KeyS]) {
            self.game.handle_move(-step);
        }

        let turn = self.config.rot_speed * dt;
        if self.pressed(&[KeyCode::ArrowRight, KeyCode::KeyD]) {
            self.game.handle_rotate(turn);
        } else if self.pressed(&[KeyCode::ArrowLeft, KeyCode::KeyA]) {
            self.game.handle_rotate(-turn);
        }

        if self.pressed(&[KeyCode::Escape]) {
            self.game.request_exit();
        }

        if !self.exit_announced && self.game.on_exit_tile() {
            log::info!("exit reached");
            self.exit_announced = true;
        }
    }

    fn redraw(&mut self) -> anyhow::Result<()> {
        let (Some(window), Some(surface)) = (&self.window, &mut self.surface) else {
            return Ok(());
        };

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // Minimized window, skip drawing
        };
        surface
            .resize(dw, dh)
            .map_err(|e| anyhow!("failed to resize surface: {}", e))?;

        let game = &self.game;
        self.compositor
            .render(
                &mut self.frame,
                &game.level.grid,
                &game.pose,
                &game.level.enemies,
            )
            .context("failed to render frame")?;

        let (dw, dh) = (dw.get() as usize, dh.get() as usize);
        if self.scale_lut.as_ref().is_some_and(|lut| !lut.matches(dw, dh)) {
            log::debug!("rebuilding scale table for {}x{}", dw, dh);
            self.scale_lut = None;
        }
        let (src_w, src_h) = (self.compositor.width(), self.compositor.height());
        let lut = self
            .scale_lut
            .get_or_insert_with(|| ScaleLut::new(dw, dh, src_w, src_h));

        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow!("failed to map surface buffer: {}", e))?;
        blit_nearest_stretch(&mut buf, &self.frame, lut);
        buf.present()
            .map_err(|e| anyhow!("failed to present frame: {}", e))?;

        self.frame_counter += 1;
        let elapsed = self.last_fps_report.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            let fps = self.frame_counter as f32 / elapsed;
            log::info!("FPS: {:.1}", fps);
            let mut title = format!("{} | FPS: {:.1} | {}", TITLE, fps, HINTS);
            if self.exit_announced {
                title.push_str(" | exit found");
            }
            window.set_title(&title);
            self.frame_counter = 0;
            self.last_fps_report = Instant::now();
        }

        window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_window(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().is_none_or(|w| w.id() != id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed, stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    self.keys_down.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                self.tick();
                if self.game.should_exit() {
                    log::info!("escape pressed, stopping");
                    event_loop.exit();
                    return;
                }
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e);
                }
            }

            WindowEvent::Resized(size) => {
                log::debug!("window resized to {}x{}", size.width, size.height);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::default();
    let level = Level::load(&config).context("failed to load level")?;
    let mut app = App::new(config, level);

    let event_loop =
        EventLoop::new().map_err(|e| anyhow!("failed to create event loop: {}", e))?;
    // Poll keeps frames coming even without input events
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("event loop failed: {}", e))?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
