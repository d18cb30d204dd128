//! Opens a 760x480 borderless window and counts rendered frames.
//!
//! F8 toggles drag, F9 resize, F10 borderless mode and F11 the drop shadow.
//! Set `RUST_LOG=debug` to watch the chrome state transitions.

#[cfg(target_os = "windows")]
fn main() -> Result<(), borderless_window::PlatformError> {
    use borderless_window::{BorderlessWindow, WindowConfig};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut frames: u64 = 0;
    BorderlessWindow::run(WindowConfig::new("ImGui", 760, 480), || {
        frames += 1;
        if frames % 10_000 == 0 {
            log::info!("rendered {frames} frames");
        }
    })
}

#[cfg(not(target_os = "windows"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::error!("the borderless window demo requires Windows");
}
