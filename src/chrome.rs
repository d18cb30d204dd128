/*
 * The window chrome controller. It owns the native window adapter and the four
 * interaction flags, and answers the non-client messages that make a captionless
 * popup behave like a framed window: resize borders via WM_NCHITTEST, work-area
 * aware maximize via WM_NCCALCSIZE, a synthetic titlebar drag, and a DWM shadow.
 *
 * State lives in `Cell`s because native calls made from `set_borderless` re-enter
 * the window procedure, which must observe the already-updated flags.
 */
use crate::config::{ChromeOptions, HotkeyAction, HotkeyBindings};
use crate::hit_test;
use crate::messages::{MK_LBUTTON, Reply, WindowMessage};
use crate::native::NativeWindow;
use crate::types::{HitZone, Point, Rect, WindowStyle};

use std::cell::Cell;

/// Snapshot of the interaction flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeFlags {
    pub borderless: bool,
    pub resize: bool,
    pub drag: bool,
    pub shadow: bool,
}

pub struct ChromeController<W: NativeWindow> {
    native: W,
    resize_border_px: i32,
    titlebar_height_px: i32,
    // Width passed at construction; the drag band does not follow later resizes.
    titlebar_width_px: i32,
    hotkeys: HotkeyBindings,
    borderless: Cell<bool>,
    borderless_resize: Cell<bool>,
    borderless_drag: Cell<bool>,
    borderless_shadow: Cell<bool>,
    last_click: Cell<Option<Point>>,
}

impl<W: NativeWindow> ChromeController<W> {
    pub fn new(native: W, options: &ChromeOptions, width: i32) -> Self {
        Self {
            native,
            resize_border_px: options.resize_border_px,
            titlebar_height_px: options.titlebar_height_px,
            titlebar_width_px: width,
            hotkeys: options.hotkeys,
            borderless: Cell::new(options.borderless),
            borderless_resize: Cell::new(options.resize),
            borderless_drag: Cell::new(options.drag),
            borderless_shadow: Cell::new(options.shadow),
            last_click: Cell::new(None),
        }
    }

    pub fn native(&self) -> &W {
        &self.native
    }

    pub fn flags(&self) -> ChromeFlags {
        ChromeFlags {
            borderless: self.borderless.get(),
            resize: self.borderless_resize.get(),
            drag: self.borderless_drag.get(),
            shadow: self.borderless_shadow.get(),
        }
    }

    pub fn is_borderless(&self) -> bool {
        self.borderless.get()
    }

    pub fn current_style(&self) -> Option<WindowStyle> {
        WindowStyle::from_bits(self.native.style_bits())
    }

    /// Switches between the native frame and the borderless style. Does nothing
    /// when the window already carries the target style.
    pub fn set_borderless(&self, enabled: bool) {
        let new_style = WindowStyle::select(enabled, self.native.composition_enabled());
        let old_style = self.current_style();
        if old_style == Some(new_style) {
            log::debug!("Chrome: style already {new_style:?}; set_borderless({enabled}) is a no-op.");
            return;
        }

        log::debug!("Chrome: style {old_style:?} -> {new_style:?}.");
        self.borderless.set(enabled);
        self.native.set_style_bits(new_style.bits());
        self.apply_shadow(self.borderless_shadow.get() && new_style.is_borderless());
        self.native.refresh_frame();
    }

    /// Applies the configured style and shadow to a freshly created window.
    ///
    /// The window is created with its target style already set, so `set_borderless`
    /// usually finds nothing to change. The only NCCALCSIZE sent during creation does
    /// not ask for client-rect validation, so the frame must be recalculated once here
    /// or the system caption stays until the first move or resize.
    pub fn apply_initial(&self, borderless: bool, shadow: bool) {
        self.set_borderless(borderless);
        self.set_borderless_shadow(shadow);
        self.native.refresh_frame();
    }

    /// Stores the shadow preference and applies it if the window is borderless.
    /// While windowed the preference is only remembered for the next switch.
    pub fn set_borderless_shadow(&self, enabled: bool) {
        self.borderless_shadow.set(enabled);
        if self.borderless.get() {
            self.apply_shadow(enabled);
        } else {
            log::debug!("Chrome: shadow preference {enabled} stored; window is not borderless.");
        }
    }

    fn apply_shadow(&self, enabled: bool) {
        if self.native.composition_enabled() {
            self.native.extend_frame_into_client_area(i32::from(enabled));
        }
    }

    /// Resize zone under a screen-space cursor, if borderless resizing is active.
    pub fn hit_test(&self, cursor: Point) -> Option<HitZone> {
        if !self.borderless.get() || !self.borderless_resize.get() {
            return None;
        }
        let window = self.native.window_rect()?;
        hit_test::classify(window, cursor, self.resize_border_px)
    }

    /// The client rectangle to use for a proposed NCCALCSIZE rectangle: the monitor
    /// work area while maximized, otherwise the proposal unchanged.
    pub fn adjusted_client_rect(&self, proposed: Rect) -> Rect {
        if !self.native.is_maximized() {
            return proposed;
        }
        self.native.monitor_work_area().unwrap_or(proposed)
    }

    fn in_titlebar_band(&self, point: Point) -> bool {
        (0..=self.titlebar_width_px).contains(&point.x)
            && (0..=self.titlebar_height_px).contains(&point.y)
    }

    fn drag_to(&self, point: Point) {
        let Some(click) = self.last_click.get() else {
            return;
        };
        // The window is looked up again by class name, as the move target.
        let Some(rect) = self.native.class_window_rect() else {
            log::warn!("Chrome: no window found by class name during drag.");
            return;
        };
        if self.in_titlebar_band(click) {
            self.native.move_class_window(
                rect.left + point.x - click.x,
                rect.top + point.y - click.y,
            );
        }
    }

    fn run_hotkey(&self, action: HotkeyAction) {
        log::debug!("Chrome: hotkey {action:?}.");
        match action {
            HotkeyAction::ToggleDrag => self.borderless_drag.set(!self.borderless_drag.get()),
            HotkeyAction::ToggleResize => {
                self.borderless_resize.set(!self.borderless_resize.get())
            }
            HotkeyAction::ToggleBorderless => self.set_borderless(!self.borderless.get()),
            HotkeyAction::ToggleShadow => {
                self.set_borderless_shadow(!self.borderless_shadow.get())
            }
        }
    }

    /// Answers the chrome-related messages. Returns `None` for messages the chrome
    /// does not own, so the host can handle them.
    pub fn handle(&self, message: &WindowMessage) -> Option<Reply> {
        let reply = match *message {
            WindowMessage::LeftButtonDown { point } => {
                self.last_click.set(Some(point));
                Reply::Handled(0)
            }
            WindowMessage::MouseMove { key_state, point } => {
                if key_state == MK_LBUTTON && self.borderless.get() && self.borderless_drag.get()
                {
                    self.drag_to(point);
                }
                Reply::Handled(0)
            }
            WindowMessage::NcCalcSize {
                calc_valid_rects: true,
                proposed,
            } if self.borderless.get() => match proposed {
                Some(rect) => Reply::ReplaceClientRect(self.adjusted_client_rect(rect)),
                None => Reply::Handled(0),
            },
            WindowMessage::NcHitTest { cursor } => match self.hit_test(cursor) {
                Some(zone) => Reply::Handled(zone.code()),
                None => Reply::Default,
            },
            WindowMessage::NcActivate if !self.native.composition_enabled() => {
                // Keeps the system from painting an inactive classic frame.
                Reply::Handled(1)
            }
            WindowMessage::KeyDown { virtual_key } => match self.hotkeys.action_for(virtual_key) {
                Some(action) => {
                    self.run_hotkey(action);
                    Reply::Handled(0)
                }
                None => Reply::Default,
            },
            WindowMessage::NcCalcSize { .. } | WindowMessage::NcActivate => Reply::Default,
            _ => return None,
        };
        Some(reply)
    }
}
