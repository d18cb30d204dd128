/*
 * Win32 side of the borderless window: window-class registration, native window
 * creation, the window procedure router, the `NativeWindow` adapter and the
 * PeekMessage-based message source.
 *
 * The router recovers the owning `Win32Host` from GWLP_USERDATA, converts the raw
 * message into the portable `WindowMessage` table, and turns the host's `Reply`
 * back into an LRESULT. Only this module reads native message pointers.
 */
use crate::error::{PlatformError, Result as PlatformResult};
use crate::host::{MessageSource, Pump, WindowHost};
use crate::messages::{RawMessage, Reply, WindowMessage, decode};
use crate::native::NativeWindow;
use crate::owned_handle::OwnedHandle;
use crate::render::GuiBackend;
use crate::types::{Point, Rect, WindowStyle};

use super::d3d9_device::D3d9Device;

use windows::{
    Win32::{
        Foundation::{
            ERROR_INVALID_WINDOW_HANDLE, GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, RECT,
            WPARAM,
        },
        Graphics::Dwm::{DwmExtendFrameIntoClientArea, DwmIsCompositionEnabled},
        Graphics::Gdi::{
            COLOR_WINDOW, GetMonitorInfoW, HBRUSH, MONITOR_DEFAULTTONULL, MONITORINFO,
            MonitorFromWindow,
        },
        System::LibraryLoader::GetModuleHandleW,
        UI::Controls::MARGINS,
        UI::WindowsAndMessaging::*, // This list is massive, just import all of them.
    },
    core::{HSTRING, PCWSTR},
};

use std::cell::Cell;
use std::ffi::c_void;
use std::rc::Rc;

pub(crate) type Win32Host = WindowHost<Win32Window, D3d9Device, Box<dyn GuiBackend>>;

impl From<RECT> for Rect {
    fn from(rect: RECT) -> Self {
        Rect::new(rect.left, rect.top, rect.right, rect.bottom)
    }
}

impl From<Rect> for RECT {
    fn from(rect: Rect) -> Self {
        RECT {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        }
    }
}

fn destroy_hwnd(hwnd: HWND) {
    log::debug!("Platform: DestroyWindow for HWND {hwnd:?}.");
    if unsafe { DestroyWindow(hwnd) }.is_err() {
        let last_error = unsafe { GetLastError() };
        // Already destroyed by the system is fine.
        if last_error.0 != ERROR_INVALID_WINDOW_HANDLE.0 {
            log::error!("Platform: DestroyWindow for HWND {hwnd:?} failed: {last_error:?}");
        }
    }
}

/// The native window owned by a borderless host.
pub(crate) struct Win32Window {
    handle: OwnedHandle<HWND>,
    class_name: HSTRING,
    // Set once WM_NCCREATE attached the creation context to the HWND.
    context_attached: Cell<bool>,
}

impl Win32Window {
    pub(crate) fn new(class_name: &str) -> Self {
        Self {
            handle: OwnedHandle::empty(destroy_hwnd),
            class_name: HSTRING::from(class_name),
            context_attached: Cell::new(false),
        }
    }

    pub(crate) fn hwnd(&self) -> Option<HWND> {
        self.handle.get()
    }

    fn adopt(&self, hwnd: HWND) {
        self.context_attached.set(true);
        self.handle.adopt(hwnd);
    }

    fn find_class_window(&self) -> Option<HWND> {
        unsafe { FindWindowW(&self.class_name, PCWSTR::null()) }
            .ok()
            .filter(|hwnd| !hwnd.is_invalid())
    }
}

impl NativeWindow for Win32Window {
    fn style_bits(&self) -> u32 {
        match self.hwnd() {
            Some(hwnd) => unsafe { GetWindowLongPtrW(hwnd, GWL_STYLE) as u32 },
            None => 0,
        }
    }

    fn set_style_bits(&self, bits: u32) {
        if let Some(hwnd) = self.hwnd() {
            unsafe { SetWindowLongPtrW(hwnd, GWL_STYLE, bits as i32 as isize) };
        }
    }

    fn composition_enabled(&self) -> bool {
        unsafe { DwmIsCompositionEnabled() }
            .map(|enabled| enabled.as_bool())
            .unwrap_or(false)
    }

    fn extend_frame_into_client_area(&self, inset: i32) {
        let Some(hwnd) = self.hwnd() else {
            return;
        };
        let margins = MARGINS {
            cxLeftWidth: inset,
            cxRightWidth: inset,
            cyTopHeight: inset,
            cyBottomHeight: inset,
        };
        if let Err(e) = unsafe { DwmExtendFrameIntoClientArea(hwnd, &margins) } {
            log::warn!("Platform: DwmExtendFrameIntoClientArea({inset}) failed: {e:?}");
        }
    }

    fn refresh_frame(&self) {
        let Some(hwnd) = self.hwnd() else {
            return;
        };
        unsafe {
            _ = SetWindowPos(
                hwnd,
                None,
                0,
                0,
                0,
                0,
                SWP_FRAMECHANGED | SWP_NOMOVE | SWP_NOSIZE,
            );
            _ = ShowWindow(hwnd, SW_SHOW);
        }
    }

    fn window_rect(&self) -> Option<Rect> {
        let hwnd = self.hwnd()?;
        let mut rect = RECT::default();
        unsafe { GetWindowRect(hwnd, &mut rect) }.ok()?;
        Some(rect.into())
    }

    fn is_maximized(&self) -> bool {
        let Some(hwnd) = self.hwnd() else {
            return false;
        };
        let mut placement = WINDOWPLACEMENT {
            length: std::mem::size_of::<WINDOWPLACEMENT>() as u32,
            ..Default::default()
        };
        if unsafe { GetWindowPlacement(hwnd, &mut placement) }.is_err() {
            return false;
        }
        placement.showCmd == SW_MAXIMIZE.0 as u32
    }

    fn monitor_work_area(&self) -> Option<Rect> {
        let hwnd = self.hwnd()?;
        let monitor = unsafe { MonitorFromWindow(hwnd, MONITOR_DEFAULTTONULL) };
        if monitor.is_invalid() {
            return None;
        }
        let mut info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        if !unsafe { GetMonitorInfoW(monitor, &mut info) }.as_bool() {
            return None;
        }
        Some(info.rcWork.into())
    }

    fn class_window_rect(&self) -> Option<Rect> {
        let hwnd = self.find_class_window()?;
        let mut rect = RECT::default();
        unsafe { GetWindowRect(hwnd, &mut rect) }.ok()?;
        Some(rect.into())
    }

    fn move_class_window(&self, left: i32, top: i32) {
        let Some(hwnd) = self.find_class_window() else {
            return;
        };
        unsafe {
            _ = SetWindowPos(
                hwnd,
                Some(HWND_TOPMOST),
                left,
                top,
                0,
                0,
                SWP_SHOWWINDOW | SWP_NOSIZE | SWP_NOZORDER,
            );
        }
    }

    fn destroy(&self) {
        self.handle.release();
    }

    fn post_quit(&self) {
        unsafe { PostQuitMessage(0) };
    }
}

// Context passed during window creation to associate the host with the HWND.
struct WindowCreationContext {
    host: Rc<Win32Host>,
}

pub(crate) fn module_instance() -> PlatformResult<HINSTANCE> {
    Ok(unsafe { GetModuleHandleW(None) }?.into())
}

/*
 * Registers the window class if not already registered. All borderless windows
 * share `borderless_wnd_proc`.
 */
pub(crate) fn register_window_class(instance: HINSTANCE, class_name: &str) -> PlatformResult<()> {
    let class_name_hstring = HSTRING::from(class_name);
    let class_name_pcwstr = PCWSTR(class_name_hstring.as_ptr());

    unsafe {
        let mut existing = WNDCLASSEXW::default();
        if GetClassInfoExW(Some(instance), class_name_pcwstr, &mut existing).is_ok() {
            log::debug!("Platform: Window class '{class_name}' already registered.");
            return Ok(());
        }

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(borderless_wnd_proc),
            hInstance: instance,
            hCursor: LoadCursorW(None, IDC_ARROW)?,
            hbrBackground: HBRUSH((COLOR_WINDOW.0 + 1) as *mut c_void),
            lpszClassName: class_name_pcwstr,
            ..Default::default()
        };

        if RegisterClassExW(&wc) == 0 {
            let error = GetLastError();
            log::error!("Platform: RegisterClassExW failed: {error:?}");
            Err(PlatformError::WindowClassRegistration { code: error.0 })
        } else {
            log::debug!("Platform: Window class '{class_name}' registered successfully.");
            Ok(())
        }
    }
}

pub(crate) fn unregister_window_class(instance: HINSTANCE, class_name: &str) {
    if let Err(e) = unsafe { UnregisterClassW(&HSTRING::from(class_name), Some(instance)) } {
        log::warn!("Platform: UnregisterClassW('{class_name}') failed: {e:?}");
    }
}

/// Client rectangle of the desktop window, used to centre new windows.
pub(crate) fn desktop_rect() -> Rect {
    let mut rect = RECT::default();
    unsafe {
        _ = GetClientRect(GetDesktopWindow(), &mut rect);
    }
    rect.into()
}

/*
 * Creates the native window with the aero-borderless style at `origin`. The HWND is
 * adopted by the host's `Win32Window` during WM_NCCREATE, before any other message
 * reaches the chrome.
 */
pub(crate) fn create_native_window(
    host: &Rc<Win32Host>,
    instance: HINSTANCE,
    class_name: &str,
    title: &str,
    origin: Point,
    width: i32,
    height: i32,
) -> PlatformResult<HWND> {
    let creation_context = Box::new(WindowCreationContext {
        host: Rc::clone(host),
    });
    let context_raw = Box::into_raw(creation_context);

    let result = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            &HSTRING::from(class_name),
            &HSTRING::from(title),
            WINDOW_STYLE(WindowStyle::AeroBorderless.bits()),
            origin.x,
            origin.y,
            width,
            height,
            None,
            None,
            Some(instance),
            Some(context_raw as *mut c_void),
        )
    };

    match result {
        Ok(hwnd) => Ok(hwnd),
        Err(e) => {
            let code = unsafe { GetLastError() }.0;
            log::error!("Platform: CreateWindowExW failed: {e:?} (last error {code})");
            // WM_NCDESTROY frees the context if WM_NCCREATE ran; otherwise it is still ours.
            if !host.chrome().native().context_attached.get() {
                drop(unsafe { Box::from_raw(context_raw) });
            }
            Err(PlatformError::WindowCreation { code })
        }
    }
}

/*
 * Window procedure router. Stores the creation context on WM_NCCREATE, dispatches
 * through the host, and frees the context on WM_NCDESTROY.
 */
unsafe extern "system" fn borderless_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let context_ptr = if msg == WM_NCCREATE {
        let create_struct = unsafe { &*(lparam.0 as *const CREATESTRUCTW) };
        let context_raw_ptr = create_struct.lpCreateParams as *mut WindowCreationContext;
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, context_raw_ptr as isize) };
        if !context_raw_ptr.is_null() {
            unsafe { &*context_raw_ptr }.host.chrome().native().adopt(hwnd);
        }
        context_raw_ptr
    } else {
        unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WindowCreationContext }
    };

    if context_ptr.is_null() {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    }

    // Cloned so that the host outlives a WM_NCDESTROY freeing the context re-entrantly
    // (WM_CLOSE -> DestroyWindow -> WM_NCDESTROY).
    let host = Rc::clone(unsafe { &(*context_ptr).host });

    let raw = RawMessage::new(msg, wparam.0, lparam.0);
    let mut message = decode(raw);
    if let WindowMessage::NcCalcSize {
        calc_valid_rects: true,
        proposed,
    } = &mut message
    {
        let params = unsafe { &*(lparam.0 as *const NCCALCSIZE_PARAMS) };
        *proposed = Some(params.rgrc[0].into());
    }

    let result = match host.dispatch(&raw, &message) {
        Reply::Default => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
        Reply::Handled(value) => LRESULT(value),
        Reply::ReplaceClientRect(rect) => {
            let params = unsafe { &mut *(lparam.0 as *mut NCCALCSIZE_PARAMS) };
            params.rgrc[0] = rect.into();
            LRESULT(0)
        }
    };

    if msg == WM_NCDESTROY {
        log::debug!("Platform: WM_NCDESTROY for HWND {hwnd:?}, releasing window context.");
        host.chrome().native().handle.forget();
        let _ = unsafe { Box::from_raw(context_ptr) };
        unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) };
    }
    result
}

/// Non-blocking message source over the thread's queue.
/// Removes a WM_QUIT left in this thread's queue, e.g. by tearing down a window whose
/// startup failed, so a later message loop on the same thread does not exit at once.
pub(crate) fn discard_pending_quit() -> bool {
    let mut msg = MSG::default();
    unsafe { PeekMessageW(&mut msg, None, WM_QUIT, WM_QUIT, PM_REMOVE) }.as_bool()
}

#[derive(Debug, Default)]
pub(crate) struct PeekMessageSource;

impl MessageSource for PeekMessageSource {
    fn pump(&mut self) -> Pump {
        let mut msg = MSG::default();
        if !unsafe { PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE) }.as_bool() {
            return Pump::Idle;
        }
        if msg.message == WM_QUIT {
            return Pump::Quit;
        }
        unsafe {
            _ = TranslateMessage(&msg);
            _ = DispatchMessageW(&msg);
        }
        Pump::Dispatched
    }
}
