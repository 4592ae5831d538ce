use log::error;
use mouselock::{MouseLock, MouseLockConfig};
use std::env;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Parse --title <title> and --size <width> <height> from command line
    let mut window_title = "MouseLock".to_string();
    let mut window_size = (640usize, 480usize);
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--title" {
            if let Some(title) = args.next() {
                window_title = title;
            }
        } else if arg == "--size" {
            if let (Some(w), Some(h)) = (args.next(), args.next()) {
                if let (Ok(w), Ok(h)) = (w.parse::<usize>(), h.parse::<usize>()) {
                    window_size = (w.max(1), h.max(1));
                }
            }
        }
    }

    let config = MouseLockConfig::builder()
        .title(window_title)
        .window_width(window_size.0)
        .window_height(window_size.1)
        .build();

    println!("Click inside the window to lock the mouse, then move it around.");
    println!("Click again or press Escape to unlock. Enter toggles fullscreen.");

    if let Err(err) = MouseLock::new(config).show() {
        error!("{err}");
        process::exit(1);
    }
}
