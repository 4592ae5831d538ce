//! Per-view plugin state: tracks the view, the lock state and the last mouse
//! movement, and turns them into painted frames for the host to present.

use log::{debug, error, info, warn};

use crate::error::HostError;
use crate::geometry::{Point, Size};
use crate::image::{PixelBuffer, PixelFormat};
use crate::painter::Painter;

// ============================================================================
// HOST INTERFACE
// ============================================================================

/// Services the session needs from whatever embeds it.
///
/// `lock_mouse` and `unlock_mouse` are requests: the host reports the outcome
/// later through [`Session::did_lock_mouse`] and [`Session::mouse_lock_lost`].
/// Likewise `flush` schedules presentation of [`Session::take_frame`], and the
/// host answers with [`Session::did_flush`].
pub trait Host {
    fn bind_graphics(&mut self, size: Size) -> Result<(), HostError>;
    fn lock_mouse(&mut self);
    fn unlock_mouse(&mut self);
    fn is_fullscreen(&self) -> bool;
    /// Returns false if the host refused the switch.
    fn set_fullscreen(&mut self, fullscreen: bool) -> bool;
    fn flush(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    pub size: Size,
    pub fullscreen: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MouseDown,
    MouseUp,
    /// Relative movement since the previous move event.
    MouseMove { movement: Point },
    MouseEnter,
    MouseLeave,
    Wheel,
    KeyDown(Key),
    KeyUp(Key),
}

// ============================================================================
// SESSION STATE
// ============================================================================

#[derive(Debug, Clone)]
pub struct Session {
    painter: Painter,
    size: Size,
    mouse_locked: bool,
    mouse_movement: Point,
    is_context_bound: bool,
    was_fullscreen: bool,
    fullscreen_switching: bool,
    waiting_for_flush_completion: bool,
    pending_frame: Option<PixelBuffer>,
}

impl Session {
    pub fn new(painter: Painter) -> Self {
        Self {
            painter,
            size: Size::ZERO,
            mouse_locked: false,
            mouse_movement: Point::ZERO,
            is_context_bound: false,
            was_fullscreen: false,
            fullscreen_switching: false,
            waiting_for_flush_completion: false,
            pending_frame: None,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_mouse_locked(&self) -> bool {
        self.mouse_locked
    }

    pub fn mouse_movement(&self) -> Point {
        self.mouse_movement
    }

    pub fn is_context_bound(&self) -> bool {
        self.is_context_bound
    }

    /// True between a successful fullscreen switch and the next view report.
    /// Hosts that only report views on resize must report one themselves
    /// while this is set, since a switch may leave the size unchanged.
    pub fn needs_view_refresh(&self) -> bool {
        self.fullscreen_switching
    }

    pub fn is_waiting_for_flush(&self) -> bool {
        self.waiting_for_flush_completion
    }

    pub fn did_change_view(&mut self, view: View, host: &mut impl Host) {
        self.fullscreen_switching = false;
        // Views change for many reasons; only rebind when something we draw with changed.
        if self.size == view.size && self.was_fullscreen == view.fullscreen && self.is_context_bound {
            debug!(
                "View unchanged at {}x{} (fullscreen={}, bound={})",
                view.size.width, view.size.height, view.fullscreen, self.is_context_bound
            );
            return;
        }
        info!(
            "View changed to {}x{} (fullscreen={}, bound={})",
            view.size.width, view.size.height, view.fullscreen, self.is_context_bound
        );

        self.size = view.size;
        self.waiting_for_flush_completion = false;
        self.pending_frame = None;

        self.is_context_bound = match host.bind_graphics(view.size) {
            Ok(()) => true,
            Err(err) => {
                error!("Could not bind to 2D context: {err}");
                false
            }
        };
        if !self.is_context_bound {
            return;
        }
        info!("Bound to 2D context size {}x{}", view.size.width, view.size.height);

        self.painter
            .rebuild_scanline(view.size.width, PixelFormat::BgraPremul);
        self.was_fullscreen = view.fullscreen;
        self.paint(host);
    }

    pub fn did_change_focus(&mut self, has_focus: bool) {
        debug!("Focus changed: {has_focus}");
    }

    /// Returns whether the event was consumed.
    pub fn handle_input(&mut self, event: InputEvent, host: &mut impl Host) -> bool {
        match event {
            InputEvent::MouseDown => {
                if self.mouse_locked {
                    host.unlock_mouse();
                } else {
                    debug!("Requesting mouse lock");
                    host.lock_mouse();
                }
                true
            }
            InputEvent::MouseMove { movement } => {
                self.mouse_movement = movement;
                self.paint(host);
                true
            }
            InputEvent::KeyDown(key) => {
                if key == Key::Enter {
                    self.toggle_fullscreen(host);
                }
                true
            }
            _ => false,
        }
    }

    fn toggle_fullscreen(&mut self, host: &mut impl Host) {
        // Ignore the switch while a previous one is still in transition.
        if !self.is_context_bound {
            return;
        }
        let fullscreen = !host.is_fullscreen();
        if host.set_fullscreen(fullscreen) {
            self.is_context_bound = false;
            self.fullscreen_switching = true;
        } else if fullscreen {
            warn!("Could not enter fullscreen mode");
        } else {
            warn!("Could not leave fullscreen mode");
        }
    }

    pub fn did_lock_mouse(&mut self, result: Result<(), HostError>, host: &mut impl Host) {
        self.mouse_locked = result.is_ok();
        if let Err(err) = result {
            error!("Mouselock failed: {err}");
        }
        self.mouse_movement = Point::ZERO;
        self.paint(host);
    }

    pub fn mouse_lock_lost(&mut self, host: &mut impl Host) {
        if self.mouse_locked {
            info!("Mouselock unlocked");
            self.mouse_locked = false;
            self.paint(host);
        }
    }

    /// Paints a new frame unless the previous one is still being presented.
    pub fn paint(&mut self, host: &mut impl Host) {
        if self.waiting_for_flush_completion {
            return;
        }

        match self.painter.paint_image(self.size, self.mouse_movement) {
            Ok(image) => {
                self.pending_frame = Some(image);
                self.waiting_for_flush_completion = true;
                host.flush();
            }
            Err(err) => error!("Could not create image data: {err}"),
        }
    }

    /// Hands the most recent frame to the host for presentation.
    pub fn take_frame(&mut self) -> Option<PixelBuffer> {
        self.pending_frame.take()
    }

    pub fn did_flush(&mut self, result: Result<(), HostError>) {
        if let Err(err) = result {
            error!("Flush failed: {err}");
        }
        self.waiting_for_flush_completion = false;
    }
}
