//! Windowed host.
//!
//! [`App`] is the winit application: it owns the window, the GPU presenter,
//! the software canvas and the [`FrameLoop`]. Every `RedrawRequested` runs one
//! frame and immediately asks for the next one. While paused the last canvas
//! is presented again without simulating.

use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::canvas::{Canvas, PixelCanvas};
use crate::config::FieldConfig;
use crate::driver::FrameLoop;
use crate::error::AppError;
use crate::gpu::Presenter;
use crate::pointer::pointer_event;
use crate::time::FrameClock;

/// Initial window size.
pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (1280, 720);

const FPS_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// Open a window and run the field until it is closed.
pub fn run(config: FieldConfig, seed: Option<u64>) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, seed);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// State created once the window exists.
struct Running {
    window: Arc<Window>,
    presenter: Presenter,
    canvas: PixelCanvas,
    frame_loop: FrameLoop,
}

/// The winit application.
pub struct App {
    config: FieldConfig,
    seed: Option<u64>,
    running: Option<Running>,
    clock: FrameClock,
    last_fps_log: Instant,
    error: Option<AppError>,
}

impl App {
    /// Application that will spawn a field from `config` once resumed.
    pub fn new(config: FieldConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            seed,
            running: None,
            clock: FrameClock::new(),
            last_fps_log: Instant::now(),
            error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Running, AppError> {
        let (width, height) = DEFAULT_WINDOW_SIZE;
        let window_attributes = Window::default_attributes()
            .with_title("Ember")
            .with_inner_size(PhysicalSize::new(width, height));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));
        log::info!("Window created at {}x{}", width, height);

        let presenter = pollster::block_on(Presenter::new(window.clone(), self.config.background))?;
        let canvas = PixelCanvas::new(width, height)?;
        let frame_loop = FrameLoop::new(width, height, self.config.clone(), self.seed);

        Ok(Running {
            window,
            presenter,
            canvas,
            frame_loop,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        if running.frame_loop.cancel_token().is_cancelled() {
            event_loop.exit();
            return;
        }

        let timestamp_ms = self.clock.tick();
        if !self.clock.is_paused() {
            running.frame_loop.tick(&mut running.canvas, timestamp_ms);
        }

        match running.presenter.render(&running.canvas) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                running.presenter.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory, exiting");
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("Surface error: {:?}", e),
        }

        if self.last_fps_log.elapsed() >= FPS_LOG_INTERVAL {
            log::debug!(
                "{:.1} fps, frame {}, {} particles",
                self.clock.fps(),
                self.clock.frame(),
                running.frame_loop.field().len()
            );
            self.last_fps_log = Instant::now();
        }

        running.window.request_redraw();
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        if size.width == 0 || size.height == 0 {
            return;
        }
        if (size.width, size.height) == (running.canvas.width(), running.canvas.height()) {
            return;
        }
        if let Err(e) = running.canvas.resize(size.width, size.height) {
            log::warn!("Keeping previous canvas: {}", e);
            return;
        }
        running.frame_loop.resize(size.width, size.height);
        running.presenter.resize(size.width, size.height);
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match &event.logical_key {
            Key::Named(NamedKey::Escape) => {
                if let Some(running) = &self.running {
                    running.frame_loop.cancel_token().cancel();
                }
            }
            Key::Named(NamedKey::Space) => {
                self.clock.toggle_pause();
                if let Some(running) = self.running.as_mut() {
                    running.frame_loop.set_paused(self.clock.is_paused());
                }
                log::info!("{}", if self.clock.is_paused() { "Paused" } else { "Resumed" });
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => {
                running.window.request_redraw();
                self.running = Some(running);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(pointer) = pointer_event(&event) {
            if let Some(running) = &self.running {
                running.frame_loop.pointer().apply(pointer);
            }
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
