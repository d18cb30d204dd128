/*
 * Composes the chrome controller with the render device and GUI backend, and runs
 * the single-threaded pump: drain every pending message, and whenever the queue is
 * empty render exactly one frame. WM_QUIT is the only way out of the loop.
 *
 * The device and GUI sit in `RefCell`s that are borrowed only for the duration of
 * one call into them. Window messages arrive re-entrantly (e.g. WM_SIZE sent from
 * inside SetWindowPos during a style toggle in the frame callback) and must be able
 * to reset the device without tripping over a borrow held by the frame.
 */
use crate::chrome::ChromeController;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::messages::{RawMessage, Reply, SIZE_MINIMIZED, WindowMessage};
use crate::native::NativeWindow;
use crate::render::{CooperativeLevel, GuiBackend, PresentStatus, RenderDevice, reset_device};
use crate::types::ClearColor;

use std::cell::{Cell, RefCell};

/// Result of one non-blocking poll of the message queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pump {
    /// A message was translated and dispatched.
    Dispatched,
    /// The queue is empty.
    Idle,
    /// WM_QUIT was retrieved.
    Quit,
}

pub trait MessageSource {
    fn pump(&mut self) -> Pump;
}

pub struct WindowHost<W: NativeWindow, D: RenderDevice, G: GuiBackend> {
    chrome: ChromeController<W>,
    device: RefCell<Option<D>>,
    gui: RefCell<G>,
    clear_color: ClearColor,
    // Back-buffer size from a WM_SIZE that arrived while the device or GUI was busy.
    pending_resize: Cell<Option<(u32, u32)>>,
}

impl<W: NativeWindow, D: RenderDevice, G: GuiBackend> WindowHost<W, D, G> {
    pub fn new(chrome: ChromeController<W>, gui: G, clear_color: ClearColor) -> Self {
        Self {
            chrome,
            device: RefCell::new(None),
            gui: RefCell::new(gui),
            clear_color,
            pending_resize: Cell::new(None),
        }
    }

    pub fn chrome(&self) -> &ChromeController<W> {
        &self.chrome
    }

    pub fn install_device(&self, device: D) {
        *self.device.borrow_mut() = Some(device);
    }

    pub fn take_device(&self) -> Option<D> {
        self.device.borrow_mut().take()
    }

    pub fn has_device(&self) -> bool {
        self.device.borrow().is_some()
    }

    /// Swaps in a new GUI backend, e.g. once the device it binds to exists.
    pub fn replace_gui(&self, gui: G) -> G {
        self.gui.replace(gui)
    }

    pub fn with_gui<R>(&self, f: impl FnOnce(&mut G) -> R) -> R {
        f(&mut self.gui.borrow_mut())
    }

    /*
     * Routes one window message. The GUI sees every message first and may consume it;
     * then the chrome answers non-client and hotkey messages; what remains are the
     * lifecycle messages owned by the host.
     */
    pub fn dispatch(&self, raw: &RawMessage, message: &WindowMessage) -> Reply {
        let consumed = match self.gui.try_borrow_mut() {
            Ok(mut gui) => gui.filter_message(raw),
            Err(_) => false,
        };
        if consumed {
            return Reply::Handled(1);
        }

        if let Some(reply) = self.chrome.handle(message) {
            return reply;
        }

        match *message {
            WindowMessage::Size {
                kind,
                width,
                height,
            } => {
                self.handle_size(kind, width, height);
                Reply::Handled(0)
            }
            WindowMessage::Close => {
                log::debug!("Host: WM_CLOSE received, destroying window.");
                self.chrome.native().destroy();
                Reply::Handled(0)
            }
            WindowMessage::Destroy => {
                log::debug!("Host: WM_DESTROY received, posting quit.");
                self.chrome.native().post_quit();
                Reply::Handled(0)
            }
            _ => Reply::Default,
        }
    }

    fn handle_size(&self, kind: usize, width: u32, height: u32) {
        if kind == SIZE_MINIMIZED {
            return;
        }
        if !self.resize_now(width, height) {
            log::debug!("Host: WM_SIZE {width}x{height} arrived while in use; reset deferred to next frame.");
            self.pending_resize.set(Some((width, height)));
        }
    }

    /// Resizes the back buffer and resets the device as one step. Returns false,
    /// touching nothing, when the device or the GUI is currently borrowed.
    fn resize_now(&self, width: u32, height: u32) -> bool {
        let (Ok(mut slot), Ok(mut gui)) = (self.device.try_borrow_mut(), self.gui.try_borrow_mut())
        else {
            return false;
        };
        let Some(device) = slot.as_mut() else {
            return true;
        };
        log::debug!("Host: resizing back buffer to {width}x{height}.");
        self.pending_resize.set(None);
        device.resize_back_buffer(width, height);
        reset_device(device, &mut *gui);
        true
    }

    /// Renders one frame: GUI frame around the callback, then clear, draw and present.
    pub fn render_frame(&self, frame: &mut dyn FnMut()) -> PlatformResult<()> {
        if !self.has_device() {
            return Err(PlatformError::DeviceUnavailable);
        }

        self.gui.borrow_mut().new_frame();
        frame();
        self.gui.borrow_mut().end_frame();

        if let Some((width, height)) = self.pending_resize.take() {
            self.resize_now(width, height);
        }

        let mut slot = self.device.borrow_mut();
        let device = slot.as_mut().ok_or(PlatformError::DeviceUnavailable)?;
        if device.begin_frame(self.clear_color) {
            self.gui.borrow_mut().render();
            device.end_frame();
        }

        match device.present() {
            PresentStatus::Presented => {}
            PresentStatus::DeviceLost => {
                if device.cooperative_level() == CooperativeLevel::NotReset {
                    log::info!("Host: device lost and ready to reset.");
                    reset_device(device, &mut *self.gui.borrow_mut());
                }
            }
            PresentStatus::Failed(code) => log::warn!("Host: present failed with {code:#x}."),
        }
        Ok(())
    }

    /// Pumps messages until WM_QUIT, rendering one frame each time the queue is empty.
    pub fn run<S, F>(&self, source: &mut S, mut frame: F) -> PlatformResult<()>
    where
        S: MessageSource + ?Sized,
        F: FnMut(),
    {
        if !self.has_device() {
            return Err(PlatformError::DeviceUnavailable);
        }
        log::debug!("Host: entering message loop.");
        loop {
            match source.pump() {
                Pump::Dispatched => continue,
                Pump::Idle => self.render_frame(&mut frame)?,
                Pump::Quit => break,
            }
        }
        log::debug!("Host: message loop finished.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowConfig;
    use crate::messages::{
        RawMessage, VK_F10, WM_CLOSE, WM_DESTROY, WM_KEYDOWN, WM_SIZE, decode, pack_point,
    };
    use crate::render::ResetError;
    use crate::test_support::{
        DeviceCall, GuiCall, MockDevice, MockGui, MockWindow, NativeCall, ScriptedSource,
    };
    use crate::types::{Rect, WindowStyle};

    use std::cell::Cell;
    use std::rc::Rc;

    type TestHost = WindowHost<MockWindow, MockDevice, MockGui>;

    fn host_with(gui: MockGui) -> TestHost {
        let config = WindowConfig::new("ImGui", 760, 480);
        let window = MockWindow::new(Rect::new(100, 100, 860, 580), true);
        window.set_initial_style(WindowStyle::AeroBorderless);
        let chrome = ChromeController::new(window, &config.chrome, config.width);
        WindowHost::new(chrome, gui, config.clear_color)
    }

    fn host() -> TestHost {
        host_with(MockGui::default())
    }

    fn send(host: &TestHost, msg: u32, wparam: usize, lparam: isize) -> Reply {
        let raw = RawMessage::new(msg, wparam, lparam);
        host.dispatch(&raw, &decode(raw))
    }

    #[test]
    fn run_renders_one_frame_per_idle_cycle() {
        // Arrange
        let host = host();
        host.install_device(MockDevice::default());
        let mut source =
            ScriptedSource::new([Pump::Dispatched, Pump::Idle, Pump::Dispatched, Pump::Idle]);
        let frames = Cell::new(0);
        // Act
        host.run(&mut source, || frames.set(frames.get() + 1))
            .expect("loop should finish on quit");
        // Assert
        assert_eq!(frames.get(), 2);
        assert_eq!(source.polls.get(), 5);
    }

    #[test]
    fn quit_ends_loop_without_rendering() {
        let host = host();
        host.install_device(MockDevice::default());
        let mut source = ScriptedSource::new([Pump::Quit, Pump::Idle]);
        let frames = Cell::new(0);

        host.run(&mut source, || frames.set(frames.get() + 1))
            .expect("loop should finish on quit");

        assert_eq!(frames.get(), 0);
        assert_eq!(source.polls.get(), 1);
    }

    #[test]
    fn run_without_device_is_rejected() {
        let host = host();
        let mut source = ScriptedSource::new([Pump::Idle]);
        assert!(matches!(
            host.run(&mut source, || {}),
            Err(PlatformError::DeviceUnavailable)
        ));
        assert_eq!(source.polls.get(), 0);
    }

    #[test]
    fn frame_sequence_wraps_callback_and_presents() {
        let host = host();
        host.install_device(MockDevice::default());

        host.render_frame(&mut || {}).expect("device installed");

        assert_eq!(
            host.with_gui(|gui| gui.calls.clone()),
            vec![GuiCall::NewFrame, GuiCall::EndFrame, GuiCall::Render]
        );
        let device = host.take_device().expect("device installed");
        assert_eq!(
            device.calls,
            vec![
                DeviceCall::Begin(ClearColor::default()),
                DeviceCall::End,
                DeviceCall::Present
            ]
        );
    }

    #[test]
    fn failed_scene_skips_drawing_but_still_presents() {
        let host = host();
        host.install_device(MockDevice {
            begin_ok: false,
            ..MockDevice::default()
        });

        host.render_frame(&mut || {}).expect("device installed");

        assert!(!host.with_gui(|gui| gui.calls.contains(&GuiCall::Render)));
        let device = host.take_device().expect("device installed");
        assert_eq!(device.calls.last(), Some(&DeviceCall::Present));
        assert!(!device.calls.contains(&DeviceCall::End));
    }

    #[test]
    fn lost_device_is_reset_only_when_not_reset() {
        let resettable = host();
        resettable.install_device(MockDevice {
            present_results: [PresentStatus::DeviceLost].into(),
            cooperative: CooperativeLevel::NotReset,
            ..MockDevice::default()
        });
        resettable.render_frame(&mut || {}).expect("device installed");
        assert_eq!(
            resettable.take_device().expect("device installed").calls.last(),
            Some(&DeviceCall::Reset)
        );
        assert!(resettable.with_gui(|gui| gui.calls.ends_with(&[
            GuiCall::InvalidateObjects,
            GuiCall::CreateObjects
        ])));

        let still_lost = host();
        still_lost.install_device(MockDevice {
            present_results: [PresentStatus::DeviceLost].into(),
            cooperative: CooperativeLevel::Lost,
            ..MockDevice::default()
        });
        still_lost.render_frame(&mut || {}).expect("device installed");
        assert!(
            !still_lost
                .take_device()
                .expect("device installed")
                .calls
                .contains(&DeviceCall::Reset)
        );
    }

    #[test]
    #[should_panic(expected = "render device reset failed")]
    fn lost_device_with_invalid_reset_is_fatal() {
        let host = host();
        host.install_device(MockDevice {
            present_results: [PresentStatus::DeviceLost].into(),
            cooperative: CooperativeLevel::NotReset,
            reset_result: Err(ResetError::InvalidCall),
            ..MockDevice::default()
        });
        let _ = host.render_frame(&mut || {});
    }

    #[test]
    fn size_resets_device_with_new_back_buffer() {
        let host = host();
        host.install_device(MockDevice::default());

        assert_eq!(send(&host, WM_SIZE, 0, pack_point(800, 600)), Reply::Handled(0));

        let device = host.take_device().expect("device installed");
        assert_eq!(
            device.calls,
            vec![DeviceCall::Resize(800, 600), DeviceCall::Reset]
        );
    }

    #[test]
    fn minimize_and_missing_device_skip_reset() {
        let host = host();
        assert_eq!(send(&host, WM_SIZE, 0, pack_point(800, 600)), Reply::Handled(0));

        host.install_device(MockDevice::default());
        assert_eq!(
            send(&host, WM_SIZE, SIZE_MINIMIZED, pack_point(0, 0)),
            Reply::Handled(0)
        );
        assert!(host.take_device().expect("device installed").calls.is_empty());
    }

    #[test]
    fn size_while_gui_busy_is_reset_before_next_frame() {
        let host = host();
        host.install_device(MockDevice::default());

        host.with_gui(|_| send(&host, WM_SIZE, 0, pack_point(1024, 768)));
        host.render_frame(&mut || {}).expect("device installed");
        host.render_frame(&mut || {}).expect("device installed");

        let device = host.take_device().expect("device installed");
        assert_eq!(
            &device.calls[..3],
            &[
                DeviceCall::Resize(1024, 768),
                DeviceCall::Reset,
                DeviceCall::Begin(ClearColor::default())
            ]
        );
        assert_eq!(device.calls.iter().filter(|c| **c == DeviceCall::Reset).count(), 1);
    }

    #[test]
    fn later_size_replaces_deferred_one() {
        let host = host();
        host.install_device(MockDevice::default());

        host.with_gui(|_| send(&host, WM_SIZE, 0, pack_point(1024, 768)));
        send(&host, WM_SIZE, 0, pack_point(800, 600));
        host.render_frame(&mut || {}).expect("device installed");

        let device = host.take_device().expect("device installed");
        assert_eq!(
            &device.calls[..2],
            &[DeviceCall::Resize(800, 600), DeviceCall::Reset]
        );
        assert!(!device.calls.contains(&DeviceCall::Resize(1024, 768)));
    }

    #[test]
    fn close_destroys_and_destroy_posts_quit() {
        let host = host();
        assert_eq!(send(&host, WM_CLOSE, 0, 0), Reply::Handled(0));
        assert_eq!(send(&host, WM_DESTROY, 0, 0), Reply::Handled(0));
        assert_eq!(
            host.chrome().native().calls(),
            vec![NativeCall::Destroy, NativeCall::PostQuit]
        );
    }

    #[test]
    fn gui_consumed_messages_short_circuit() {
        let host = host_with(MockGui {
            consume: vec![WM_CLOSE],
            ..MockGui::default()
        });

        assert_eq!(send(&host, WM_CLOSE, 0, 0), Reply::Handled(1));
        assert!(host.chrome().native().calls().is_empty());
        assert_eq!(
            host.with_gui(|gui| gui.calls.clone()),
            vec![GuiCall::Filter(WM_CLOSE)]
        );
    }

    #[test]
    fn replaced_gui_receives_following_frames() {
        let host = host();
        host.install_device(MockDevice::default());
        host.render_frame(&mut || {}).expect("device installed");

        let previous = host.replace_gui(MockGui::default());
        host.render_frame(&mut || {}).expect("device installed");

        assert_eq!(previous.calls.len(), 3);
        assert_eq!(host.with_gui(|gui| gui.calls.len()), 3);
    }

    #[test]
    fn unknown_messages_go_to_default_handling() {
        let host = host();
        assert_eq!(send(&host, 0x000F, 0, 0), Reply::Default);
    }

    #[test]
    fn hotkey_dispatched_between_frames_toggles_style() {
        let host = Rc::new(host());
        host.install_device(MockDevice::default());
        let toggled = Rc::clone(&host);
        let mut source = ScriptedSource::new([Pump::Idle])
            .then_dispatch(move || {
                send(&toggled, WM_KEYDOWN, VK_F10 as usize, 0);
            })
            .then(Pump::Idle);

        host.run(&mut source, || {}).expect("loop should finish");

        assert_eq!(host.chrome().current_style(), Some(WindowStyle::Windowed));
        assert!(!host.chrome().is_borderless());
    }

    #[test]
    fn resize_from_inside_frame_callback_does_not_conflict() {
        let host = Rc::new(host());
        host.install_device(MockDevice::default());
        let inner = Rc::clone(&host);

        host.render_frame(&mut || {
            send(&inner, WM_SIZE, 0, pack_point(640, 360));
        })
        .expect("device installed");

        let device = host.take_device().expect("device installed");
        assert_eq!(&device.calls[..2], &[DeviceCall::Resize(640, 360), DeviceCall::Reset]);
    }
}
