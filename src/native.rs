/*
 * The native-window seam. The chrome controller only talks to the window system
 * through this trait, so the Win32 adapter and the test doubles are interchangeable.
 *
 * All methods take `&self`: Win32 re-enters the window procedure synchronously from
 * calls such as SetWindowPos, so implementations must not hold exclusive borrows
 * across native calls.
 */
use crate::types::Rect;

pub trait NativeWindow {
    /// Current GWL_STYLE bits, including bits added by the system.
    fn style_bits(&self) -> u32;

    fn set_style_bits(&self, bits: u32);

    fn composition_enabled(&self) -> bool;

    /// Extends the compositor frame `inset` pixels into the client area on every
    /// side. An inset of 1 makes DWM draw a drop shadow, 0 removes it.
    fn extend_frame_into_client_area(&self, inset: i32);

    /// Forces the non-client area to be recalculated and shows the window again.
    fn refresh_frame(&self);

    /// Window rectangle in screen coordinates.
    fn window_rect(&self) -> Option<Rect>;

    fn is_maximized(&self) -> bool;

    /// Work area of the monitor the window is on, if it is on one.
    fn monitor_work_area(&self) -> Option<Rect>;

    /// Rectangle of the first window registered under this window's class name.
    fn class_window_rect(&self) -> Option<Rect>;

    /// Moves the first window registered under this window's class name.
    fn move_class_window(&self, left: i32, top: i32);

    fn destroy(&self);

    fn post_quit(&self);
}
