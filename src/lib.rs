// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

// External crate imports
use pixels::{Pixels, SurfaceTexture};
use log::{debug, info, warn};

// Standard library imports
use std::collections::VecDeque;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Window management imports
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{DeviceEvent, ElementState, Event, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key as LogicalKey, NamedKey};
use winit::window::{CursorGrabMode, Fullscreen, Window, WindowBuilder};

// Crate modules
pub mod config;
mod error;
pub mod geometry;
pub mod image;
pub mod painter;
pub mod session;

pub use config::MouseLockConfig;
pub use error::{HostError, PaintError};
pub use geometry::{distance, Point, Size};
pub use image::{Color, ImageData, ImageDesc, PixelBuffer, PixelFormat};
pub use painter::{Direction, NeedleShape, Painter};
pub use session::{Host, InputEvent, Key, Session, View};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Scripted input, fed to the window through [`MouseLock::show_with_commands`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseLockCommand {
    /// Relative mouse movement, as if the locked mouse had moved.
    Move(i32, i32),
    ToggleLock,
    ToggleFullscreen,
}

impl From<MouseLockCommand> for InputEvent {
    fn from(command: MouseLockCommand) -> Self {
        match command {
            MouseLockCommand::Move(dx, dy) => InputEvent::MouseMove {
                movement: Point::new(dx, dy),
            },
            MouseLockCommand::ToggleLock => InputEvent::MouseDown,
            MouseLockCommand::ToggleFullscreen => InputEvent::KeyDown(Key::Enter),
        }
    }
}

/// Main mouse-lock window - the primary public interface
#[derive(Debug, Clone)]
pub struct MouseLock {
    config: MouseLockConfig,
}

impl MouseLock {
    pub fn new(config: MouseLockConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MouseLockConfig {
        &self.config
    }

    /// Opens the window and runs until it is closed. Click to lock the
    /// mouse, Escape or click again to release it, Enter toggles fullscreen.
    pub fn show(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(None)
    }

    pub fn show_with_commands(
        &mut self,
        receiver: Receiver<MouseLockCommand>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(Some(receiver))
    }

    fn run_window(
        &self,
        receiver: Option<Receiver<MouseLockCommand>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                self.config.window_width as f64,
                self.config.window_height as f64,
            ))
            .with_resizable(self.config.resizable)
            .build(&event_loop)?;

        let window = Arc::new(window);

        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let mut host = WindowHost {
            window: window.clone(),
            pixels,
            lock_events: VecDeque::new(),
            redraw_pending: false,
        };
        let mut session = Session::new(Painter::from_config(&self.config));
        info!("Hello from {}", self.config.title);

        let view = host.view(size);
        session.did_change_view(view, &mut host);

        let frame_duration = Duration::from_secs_f64(1.0 / self.config.max_framerate.max(1.0));
        let mut last_frame = Instant::now();

        event_loop.run(move |event, window_target| {
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        let view = host.view(new_size);
                        session.did_change_view(view, &mut host);
                    }
                    WindowEvent::Focused(has_focus) => {
                        session.did_change_focus(has_focus);
                        // Losing focus releases the grab.
                        if !has_focus && session.is_mouse_locked() {
                            host.unlock_mouse();
                        }
                    }
                    WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                        let input = match state {
                            ElementState::Pressed => InputEvent::MouseDown,
                            ElementState::Released => InputEvent::MouseUp,
                        };
                        session.handle_input(input, &mut host);
                    }
                    WindowEvent::CursorEntered { .. } => {
                        session.handle_input(InputEvent::MouseEnter, &mut host);
                    }
                    WindowEvent::CursorLeft { .. } => {
                        session.handle_input(InputEvent::MouseLeave, &mut host);
                    }
                    WindowEvent::MouseWheel { .. } => {
                        session.handle_input(InputEvent::Wheel, &mut host);
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                logical_key,
                                state,
                                repeat: false,
                                ..
                            },
                        ..
                    } => {
                        let key = match logical_key {
                            LogicalKey::Named(NamedKey::Enter) => Key::Enter,
                            LogicalKey::Named(NamedKey::Escape) => Key::Escape,
                            _ => Key::Other,
                        };
                        if key == Key::Escape && state == ElementState::Pressed && session.is_mouse_locked() {
                            host.unlock_mouse();
                        }
                        let input = match state {
                            ElementState::Pressed => InputEvent::KeyDown(key),
                            ElementState::Released => InputEvent::KeyUp(key),
                        };
                        session.handle_input(input, &mut host);
                    }
                    WindowEvent::RedrawRequested => {
                        host.present(&mut session);
                    }
                    _ => {}
                },
                Event::DeviceEvent {
                    event: DeviceEvent::MouseMotion { delta },
                    ..
                } => {
                    if session.is_mouse_locked() {
                        let movement = Point::new(delta.0.round() as i32, delta.1.round() as i32);
                        session.handle_input(InputEvent::MouseMove { movement }, &mut host);
                    }
                }
                Event::AboutToWait => {
                    if let Some(ref receiver) = receiver {
                        while let Ok(command) = receiver.try_recv() {
                            session.handle_input(command.into(), &mut host);
                            host.settle_lock_events(&mut session);
                        }
                    }

                    // A fullscreen switch may keep the inner size, so no Resized follows it.
                    if session.needs_view_refresh() {
                        let view = host.view(host.window.inner_size());
                        session.did_change_view(view, &mut host);
                    }

                    // Limit presents to the configured frame rate
                    let next_frame = last_frame + frame_duration;
                    if host.redraw_pending && Instant::now() >= next_frame {
                        host.redraw_pending = false;
                        host.window.request_redraw();
                        last_frame = Instant::now();
                    }
                    if host.redraw_pending || receiver.is_some() {
                        let wake = if host.redraw_pending {
                            next_frame
                        } else {
                            Instant::now() + frame_duration
                        };
                        window_target.set_control_flow(ControlFlow::WaitUntil(wake));
                    } else {
                        window_target.set_control_flow(ControlFlow::Wait);
                    }
                }
                _ => {}
            }
            host.settle_lock_events(&mut session);
        })?;

        Ok(())
    }
}

// ============================================================================
// WINDOW HOST
// ============================================================================

enum LockEvent {
    Acquired(Result<(), HostError>),
    Lost,
}

/// [`Host`] backed by a winit window and a pixels surface.
struct WindowHost<'win> {
    window: Arc<Window>,
    pixels: Pixels<'win>,
    lock_events: VecDeque<LockEvent>,
    redraw_pending: bool,
}

impl WindowHost<'_> {
    fn view(&self, size: PhysicalSize<u32>) -> View {
        View {
            size: Size::new(size.width as i32, size.height as i32),
            fullscreen: self.window.fullscreen().is_some(),
        }
    }

    /// Delivers lock results and losses queued by `lock_mouse` / `unlock_mouse`.
    fn settle_lock_events(&mut self, session: &mut Session) {
        while let Some(event) = self.lock_events.pop_front() {
            match event {
                LockEvent::Acquired(result) => session.did_lock_mouse(result, self),
                LockEvent::Lost => session.mouse_lock_lost(self),
            }
        }
    }

    fn present(&mut self, session: &mut Session) {
        if let Some(image) = session.take_frame() {
            let width = image.size().width.max(0) as usize;
            image.copy_to_rgba(self.pixels.frame_mut(), width);
        }
        let result = self
            .pixels
            .render()
            .map_err(|err| HostError::Flush(err.to_string()));
        session.did_flush(result);
    }
}

impl Host for WindowHost<'_> {
    fn bind_graphics(&mut self, size: Size) -> Result<(), HostError> {
        if size.is_empty() {
            return Err(HostError::Bind(format!(
                "empty view {}x{}",
                size.width, size.height
            )));
        }
        let (width, height) = (size.width as u32, size.height as u32);
        self.pixels
            .resize_surface(width, height)
            .map_err(|err| HostError::Bind(err.to_string()))?;
        self.pixels
            .resize_buffer(width, height)
            .map_err(|err| HostError::Bind(err.to_string()))?;
        Ok(())
    }

    fn lock_mouse(&mut self) {
        let result = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined))
            .map_err(|err| HostError::Lock(err.to_string()));
        if result.is_ok() {
            self.window.set_cursor_visible(false);
        }
        self.lock_events.push_back(LockEvent::Acquired(result));
    }

    fn unlock_mouse(&mut self) {
        if let Err(err) = self.window.set_cursor_grab(CursorGrabMode::None) {
            warn!("Could not release cursor grab: {err}");
        }
        self.window.set_cursor_visible(true);
        self.lock_events.push_back(LockEvent::Lost);
    }

    fn is_fullscreen(&self) -> bool {
        self.window.fullscreen().is_some()
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> bool {
        debug!("Switching fullscreen to {fullscreen}");
        self.window
            .set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
        true
    }

    fn flush(&mut self) {
        self.redraw_pending = true;
    }
}
