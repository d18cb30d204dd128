/*
 * Platform-neutral geometry and window-chrome vocabulary.
 *
 * Style bits and hit-test codes use the native Win32 values so the Windows glue can
 * pass them straight through, while the rest of the crate (and its tests) never has
 * to link against the `windows` crate.
 */

pub(crate) const WS_POPUP: u32 = 0x8000_0000;
pub(crate) const WS_CAPTION: u32 = 0x00C0_0000;
pub(crate) const WS_SYSMENU: u32 = 0x0008_0000;
pub(crate) const WS_THICKFRAME: u32 = 0x0004_0000;
pub(crate) const WS_MINIMIZEBOX: u32 = 0x0002_0000;
pub(crate) const WS_MAXIMIZEBOX: u32 = 0x0001_0000;
pub(crate) const WS_OVERLAPPEDWINDOW: u32 =
    WS_CAPTION | WS_SYSMENU | WS_THICKFRAME | WS_MINIMIZEBOX | WS_MAXIMIZEBOX;

// Bits that distinguish the three chrome styles. WS_VISIBLE, WS_CLIPSIBLINGS and
// friends are added by the system and must not affect the comparison.
const CHROME_STYLE_MASK: u32 = WS_POPUP | WS_OVERLAPPEDWINDOW;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// The three mutually exclusive frame styles a window can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStyle {
    /// Standard overlapped window with the native caption and frame.
    Windowed,
    /// Popup with a (hidden) caption so DWM still animates, snaps and shadows it.
    AeroBorderless,
    /// Popup without caption, used when desktop composition is off.
    BasicBorderless,
}

impl WindowStyle {
    pub const fn bits(self) -> u32 {
        match self {
            WindowStyle::Windowed => WS_OVERLAPPEDWINDOW,
            WindowStyle::AeroBorderless => {
                WS_POPUP | WS_THICKFRAME | WS_CAPTION | WS_SYSMENU | WS_MAXIMIZEBOX | WS_MINIMIZEBOX
            }
            WindowStyle::BasicBorderless => {
                WS_POPUP | WS_THICKFRAME | WS_SYSMENU | WS_MAXIMIZEBOX | WS_MINIMIZEBOX
            }
        }
    }

    /// Classifies the style bits reported by the window, or `None` for a foreign style.
    pub fn from_bits(bits: u32) -> Option<Self> {
        let masked = bits & CHROME_STYLE_MASK;
        [
            WindowStyle::Windowed,
            WindowStyle::AeroBorderless,
            WindowStyle::BasicBorderless,
        ]
        .into_iter()
        .find(|style| style.bits() == masked)
    }

    pub fn select(borderless: bool, composition_enabled: bool) -> Self {
        match (borderless, composition_enabled) {
            (false, _) => WindowStyle::Windowed,
            (true, true) => WindowStyle::AeroBorderless,
            (true, false) => WindowStyle::BasicBorderless,
        }
    }

    pub fn is_borderless(self) -> bool {
        self != WindowStyle::Windowed
    }
}

/// Resize affordance reported for a cursor position near the window edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    Left,
    Right,
    Top,
    TopLeft,
    TopRight,
    Bottom,
    BottomLeft,
    BottomRight,
}

impl HitZone {
    /// The WM_NCHITTEST answer (HTLEFT .. HTBOTTOMRIGHT).
    pub const fn code(self) -> isize {
        match self {
            HitZone::Left => 10,
            HitZone::Right => 11,
            HitZone::Top => 12,
            HitZone::TopLeft => 13,
            HitZone::TopRight => 14,
            HitZone::Bottom => 15,
            HitZone::BottomLeft => 16,
            HitZone::BottomRight => 17,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ClearColor {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Packed as 0xAARRGGBB, the D3DCOLOR layout.
    pub const fn argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl Default for ClearColor {
    fn default() -> Self {
        ClearColor::rgba(123, 255, 255, 255)
    }
}

/// Top-left corner that centres a `width` x `height` window on the desktop rectangle.
pub fn centered_origin(desktop: Rect, width: i32, height: i32) -> Point {
    Point::new(
        desktop.width() / 2 - width / 2,
        desktop.height() / 2 - height / 2,
    )
}
