/*
 * Public Windows entry point. `BorderlessWindow::run` performs the whole
 * construction contract: register the class, create a centred window, apply the
 * initial chrome, show it, create the render device, attach the GUI backend and
 * pump until the window is closed.
 */
use crate::chrome::ChromeController;
use crate::config::WindowConfig;
use crate::error::Result as PlatformResult;
use crate::host::WindowHost;
use crate::render::{GuiBackend, NullGui};
use crate::types::centered_origin;

use super::d3d9_device::D3d9Device;
use super::window_common::{
    PeekMessageSource, Win32Host, Win32Window, create_native_window, desktop_rect,
    discard_pending_quit, module_instance, register_window_class, unregister_window_class,
};

use std::rc::Rc;

use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Direct3D9::IDirect3DDevice9;
use windows::Win32::Graphics::Gdi::UpdateWindow;
use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, SetProcessDpiAwarenessContext,
};
use windows::Win32::UI::WindowsAndMessaging::{SW_SHOW, ShowWindow};

pub struct BorderlessWindow;

impl BorderlessWindow {
    /// Runs a borderless window without a GUI backend; the frame callback still
    /// runs once per idle cycle and the back buffer is cleared to the configured color.
    pub fn run<F>(config: WindowConfig, frame: F) -> PlatformResult<()>
    where
        F: FnMut(),
    {
        Self::run_with_gui(config, |_, _| NullGui, frame)
    }

    /// Runs a borderless window. `make_gui` is called once the render device exists,
    /// with the window handle and the device, so a GUI backend can bind to both.
    pub fn run_with_gui<G, M, F>(config: WindowConfig, make_gui: M, frame: F) -> PlatformResult<()>
    where
        G: GuiBackend + 'static,
        M: FnOnce(HWND, &IDirect3DDevice9) -> G,
        F: FnMut(),
    {
        config.validate()?;
        enable_dpi_awareness();

        let instance = module_instance()?;
        let class_name = config.chrome.class_name.as_str();
        register_window_class(instance, class_name)?;

        let chrome = ChromeController::new(Win32Window::new(class_name), &config.chrome, config.width);
        let host: Rc<Win32Host> = Rc::new(WindowHost::new(
            chrome,
            Box::new(NullGui) as Box<dyn GuiBackend>,
            config.clear_color,
        ));

        let origin = centered_origin(desktop_rect(), config.width, config.height);
        let hwnd = create_native_window(
            &host,
            instance,
            class_name,
            &config.title,
            origin,
            config.width,
            config.height,
        )?;
        log::info!(
            "Platform: created '{}' ({}x{}) at {origin:?}.",
            config.title,
            config.width,
            config.height
        );

        let chrome = host.chrome();
        chrome.apply_initial(config.chrome.borderless, config.chrome.shadow);
        unsafe {
            _ = ShowWindow(hwnd, SW_SHOW);
            _ = UpdateWindow(hwnd);
        }

        let device = match D3d9Device::create(hwnd, config.vsync) {
            Ok(device) => device,
            Err(e) => {
                log::error!("Platform: render device creation failed: {e}");
                // WM_DESTROY posted a quit for a loop that never ran.
                chrome.native().destroy();
                discard_pending_quit();
                unregister_window_class(instance, class_name);
                return Err(e);
            }
        };
        let gui = make_gui(hwnd, device.device());
        host.replace_gui(Box::new(gui));
        host.install_device(device);

        let result = host.run(&mut PeekMessageSource, frame);

        // GUI objects reference the device, so they go first.
        drop(host.replace_gui(Box::new(NullGui)));
        drop(host.take_device());
        log::info!("Platform: message loop ended: {result:?}");
        result
    }
}

fn enable_dpi_awareness() {
    if let Err(e) =
        unsafe { SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) }
    {
        // Already set by the manifest or an earlier call.
        log::debug!("Platform: SetProcessDpiAwarenessContext: {e:?}");
    }
}
