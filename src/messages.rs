/*
 * Decodes native window messages into a typed table the chrome controller and host
 * can match on, independent of any real message pump.
 *
 * The numeric message codes below are the Win32 values. They are duplicated here so
 * that the routing table stays testable on every platform; a Windows-only test checks
 * them against the `windows` crate.
 */
use crate::types::{Point, Rect};

pub(crate) const WM_DESTROY: u32 = 0x0002;
pub(crate) const WM_SIZE: u32 = 0x0005;
pub(crate) const WM_CLOSE: u32 = 0x0010;
pub(crate) const WM_NCCALCSIZE: u32 = 0x0083;
pub(crate) const WM_NCHITTEST: u32 = 0x0084;
pub(crate) const WM_NCACTIVATE: u32 = 0x0086;
pub(crate) const WM_KEYDOWN: u32 = 0x0100;
pub(crate) const WM_SYSKEYDOWN: u32 = 0x0104;
pub(crate) const WM_MOUSEMOVE: u32 = 0x0200;
pub(crate) const WM_LBUTTONDOWN: u32 = 0x0201;

pub(crate) const MK_LBUTTON: usize = 0x0001;
pub(crate) const SIZE_MINIMIZED: usize = 1;

pub const VK_F8: u32 = 0x77;
pub const VK_F9: u32 = 0x78;
pub const VK_F10: u32 = 0x79;
pub const VK_F11: u32 = 0x7A;

/// A native message copied out of the window procedure arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMessage {
    pub msg: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl RawMessage {
    pub const fn new(msg: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            msg,
            wparam,
            lparam,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMessage {
    /// Primary button pressed; `point` is in client coordinates.
    LeftButtonDown { point: Point },
    /// Cursor moved; `key_state` is the MK_* mask, `point` is in client coordinates.
    MouseMove { key_state: usize, point: Point },
    /// `proposed` is filled in by the native glue, which alone may read the
    /// NCCALCSIZE_PARAMS pointer.
    NcCalcSize {
        calc_valid_rects: bool,
        proposed: Option<Rect>,
    },
    /// Cursor position query in screen coordinates.
    NcHitTest { cursor: Point },
    NcActivate,
    Close,
    Size { kind: usize, width: u32, height: u32 },
    Destroy,
    /// WM_KEYDOWN and WM_SYSKEYDOWN (F10 arrives as a system key).
    KeyDown { virtual_key: u32 },
    Other(u32),
}

/// How the native window procedure should answer a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Fall through to DefWindowProc.
    Default,
    Handled(isize),
    /// Overwrite the first NCCALCSIZE rectangle and answer 0.
    ReplaceClientRect(Rect),
}

#[inline]
pub(crate) fn loword(value: isize) -> u32 {
    (value & 0xFFFF) as u32
}

#[inline]
pub(crate) fn hiword(value: isize) -> u32 {
    ((value >> 16) & 0xFFFF) as u32
}

/// Signed packed point, as MAKEPOINTS / GET_X_LPARAM / GET_Y_LPARAM read it.
#[inline]
pub(crate) fn point_from_lparam(lparam: isize) -> Point {
    Point::new(
        loword(lparam) as u16 as i16 as i32,
        hiword(lparam) as u16 as i16 as i32,
    )
}

pub fn decode(raw: RawMessage) -> WindowMessage {
    match raw.msg {
        WM_LBUTTONDOWN => WindowMessage::LeftButtonDown {
            point: point_from_lparam(raw.lparam),
        },
        WM_MOUSEMOVE => WindowMessage::MouseMove {
            key_state: raw.wparam,
            point: point_from_lparam(raw.lparam),
        },
        WM_NCCALCSIZE => WindowMessage::NcCalcSize {
            calc_valid_rects: raw.wparam != 0,
            proposed: None,
        },
        WM_NCHITTEST => WindowMessage::NcHitTest {
            cursor: point_from_lparam(raw.lparam),
        },
        WM_NCACTIVATE => WindowMessage::NcActivate,
        WM_CLOSE => WindowMessage::Close,
        WM_SIZE => WindowMessage::Size {
            kind: raw.wparam,
            width: loword(raw.lparam),
            height: hiword(raw.lparam),
        },
        WM_DESTROY => WindowMessage::Destroy,
        WM_KEYDOWN | WM_SYSKEYDOWN => WindowMessage::KeyDown {
            virtual_key: raw.wparam as u32,
        },
        other => WindowMessage::Other(other),
    }
}

#[cfg(test)]
pub(crate) fn pack_point(x: i32, y: i32) -> isize {
    ((x as u16 as u32) | ((y as u16 as u32) << 16)) as isize
}
