use bon::Builder;

use crate::image::Color;

pub const BACKGROUND_COLOR: Color = Color::argb(0xff606060);
pub const FOREGROUND_COLOR: Color = Color::argb(0xfff08080);
pub const CENTRAL_SPOT_RADIUS: i32 = 5;

/// Window and painting settings for a [`crate::MouseLock`] instance.
#[derive(Debug, Clone, Builder)]
pub struct MouseLockConfig {
    #[builder(default = "MouseLock".to_string())]
    pub title: String,

    // Window configuration
    #[builder(default = 640)]
    pub window_width: usize,
    #[builder(default = 480)]
    pub window_height: usize,
    #[builder(default = true)]
    pub resizable: bool,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    // Painter configuration
    #[builder(default = BACKGROUND_COLOR)]
    pub background_color: Color,
    #[builder(default = FOREGROUND_COLOR)]
    pub foreground_color: Color,
    #[builder(default = CENTRAL_SPOT_RADIUS)]
    pub spot_radius: i32,
}

impl Default for MouseLockConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
