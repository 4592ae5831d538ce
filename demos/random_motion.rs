use mouselock::{MouseLock, MouseLockCommand, MouseLockConfig};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = MouseLockConfig::builder()
        .title("MouseLock - random motion".to_string())
        .window_width(400)
        .window_height(400)
        .build();

    let mut mouse_lock = MouseLock::new(config);

    // Create a channel for sending random movement
    let (sender, receiver) = mpsc::channel();

    // Spawn a thread that swings the needle around the center spot
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let command = MouseLockCommand::Move(
                rng.random_range(-120..=120),
                rng.random_range(-120..=120),
            );
            if sender.send(command).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(250));
        }
    });

    println!("Displaying the needle with random movement:");
    println!("- Movements within the spot radius draw no needle");
    println!("- Click to lock the real mouse, Enter toggles fullscreen");
    println!("Close the window to exit");

    mouse_lock.show_with_commands(receiver)
}
