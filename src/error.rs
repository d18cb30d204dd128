/*
 * Error type shared by the portable chrome logic and the Win32 adapters.
 * Native failures that abort startup carry the `GetLastError` code so callers can
 * report the exact system reason; everything after startup is either recovered
 * in place or treated as fatal by the render path.
 */
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("invalid window configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to register window class (last error {code})")]
    WindowClassRegistration { code: u32 },

    #[error("failed to create window (last error {code})")]
    WindowCreation { code: u32 },

    #[error("failed to create render device: {0}")]
    DeviceCreation(String),

    #[error("no render device installed; the frame pump cannot start")]
    DeviceUnavailable,

    #[error("invalid native handle: {0}")]
    InvalidHandle(String),

    #[cfg(target_os = "windows")]
    #[error("native call failed: {0}")]
    Native(#[from] windows::core::Error),
}

pub type Result<T> = std::result::Result<T, PlatformError>;
