/*
 * Public entry point for the borderless-window crate: a Win32 window whose native
 * frame is suppressed while resize, maximize, snap and drop shadows keep working,
 * hosting an immediate-mode GUI that renders once per idle pump cycle.
 *
 * The chrome state machine, hit-testing, message decoding and the frame pump are
 * platform-neutral and run against the `NativeWindow`, `RenderDevice` and
 * `GuiBackend` seams. Conditional compilation keeps these portable pieces available
 * on every platform so the logic can be tested without a real window, while the
 * Win32 and Direct3D 9 adapters only build on Windows.
 */
#[cfg(target_os = "windows")]
pub mod app;
pub mod chrome;
pub mod config;
#[cfg(target_os = "windows")]
pub(crate) mod d3d9_device;
pub mod error;
pub mod host;
pub mod messages;
pub mod native;
pub mod owned_handle;
pub mod render;
#[cfg(test)]
pub(crate) mod test_support;
pub mod types;
#[cfg(target_os = "windows")]
pub(crate) mod window_common;

#[cfg(target_os = "windows")]
pub use app::BorderlessWindow;
pub use chrome::{ChromeController, ChromeFlags};
pub use config::{ChromeOptions, HotkeyAction, HotkeyBindings, WindowConfig};
pub use error::{PlatformError, Result as PlatformResult};
pub use hit_test::classify as classify_hit;
pub use host::{MessageSource, Pump, WindowHost};
pub use messages::{RawMessage, Reply, WindowMessage};
pub use native::NativeWindow;
pub use owned_handle::OwnedHandle;
pub use render::{
    CooperativeLevel, GuiBackend, NullGui, PresentStatus, RenderDevice, ResetError, reset_device,
};
pub use types::{ClearColor, HitZone, Point, Rect, WindowStyle, centered_origin};
