/*
 * Construction-time configuration for a borderless window. Everything here is fixed
 * once the window exists: the hotkeys are not rebindable at runtime, and the drag band
 * keeps using the construction width even after the window is resized.
 */
use crate::error::{PlatformError, Result as PlatformResult};
use crate::messages::{VK_F8, VK_F9, VK_F10, VK_F11};
use crate::types::ClearColor;

pub const DEFAULT_CLASS_NAME: &str = "BorderlessWindowClass";
pub const DEFAULT_RESIZE_BORDER_PX: i32 = 5;
pub const DEFAULT_TITLEBAR_HEIGHT_PX: i32 = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    ToggleDrag,
    ToggleResize,
    ToggleBorderless,
    ToggleShadow,
}

/// Virtual-key codes for the four chrome toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyBindings {
    pub toggle_drag: u32,
    pub toggle_resize: u32,
    pub toggle_borderless: u32,
    pub toggle_shadow: u32,
}

impl Default for HotkeyBindings {
    fn default() -> Self {
        Self {
            toggle_drag: VK_F8,
            toggle_resize: VK_F9,
            toggle_borderless: VK_F10,
            toggle_shadow: VK_F11,
        }
    }
}

impl HotkeyBindings {
    pub fn action_for(&self, virtual_key: u32) -> Option<HotkeyAction> {
        [
            (self.toggle_drag, HotkeyAction::ToggleDrag),
            (self.toggle_resize, HotkeyAction::ToggleResize),
            (self.toggle_borderless, HotkeyAction::ToggleBorderless),
            (self.toggle_shadow, HotkeyAction::ToggleShadow),
        ]
        .into_iter()
        .find_map(|(key, action)| (key == virtual_key).then_some(action))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeOptions {
    pub borderless: bool,
    pub resize: bool,
    pub drag: bool,
    pub shadow: bool,
    /// Width of the resize zone along every edge of the window rectangle.
    pub resize_border_px: i32,
    /// Height of the synthetic titlebar band that starts a drag.
    pub titlebar_height_px: i32,
    pub class_name: String,
    pub hotkeys: HotkeyBindings,
}

impl Default for ChromeOptions {
    fn default() -> Self {
        Self {
            borderless: true,
            resize: true,
            drag: true,
            shadow: true,
            resize_border_px: DEFAULT_RESIZE_BORDER_PX,
            titlebar_height_px: DEFAULT_TITLEBAR_HEIGHT_PX,
            class_name: DEFAULT_CLASS_NAME.to_string(),
            hotkeys: HotkeyBindings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub chrome: ChromeOptions,
    pub clear_color: ClearColor,
    /// Present with vsync instead of immediately.
    pub vsync: bool,
}

impl WindowConfig {
    pub fn new(title: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            chrome: ChromeOptions::default(),
            clear_color: ClearColor::default(),
            vsync: false,
        }
    }

    pub fn with_chrome(mut self, chrome: ChromeOptions) -> Self {
        self.chrome = chrome;
        self
    }

    pub fn with_clear_color(mut self, clear_color: ClearColor) -> Self {
        self.clear_color = clear_color;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn validate(&self) -> PlatformResult<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(PlatformError::InvalidConfig(format!(
                "window size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.chrome.class_name.is_empty() {
            return Err(PlatformError::InvalidConfig(
                "window class name must not be empty".to_string(),
            ));
        }
        if self.chrome.resize_border_px < 0 || self.chrome.titlebar_height_px < 0 {
            return Err(PlatformError::InvalidConfig(format!(
                "chrome metrics must not be negative (border {}, titlebar {})",
                self.chrome.resize_border_px, self.chrome.titlebar_height_px
            )));
        }
        Ok(())
    }
}
