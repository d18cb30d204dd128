/*
 * Contracts for the two externally owned collaborators: the render device that owns
 * the back buffer, and the immediate-mode GUI backend that draws into it. The host
 * only sequences calls on them; device creation and GUI widgets live elsewhere.
 */
use crate::messages::RawMessage;
use crate::types::ClearColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentStatus {
    Presented,
    DeviceLost,
    /// Any other failure code reported by present.
    Failed(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooperativeLevel {
    Ok,
    /// Lost and cannot be reset yet (e.g. another app owns fullscreen).
    Lost,
    /// Lost but ready to be reset.
    NotReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetError {
    /// The device was lost again while resetting; the next present retries.
    DeviceLost,
    /// The presentation parameters were rejected.
    InvalidCall,
    Other(i32),
}

pub trait RenderDevice {
    /// Records new back-buffer dimensions for the next `reset`.
    fn resize_back_buffer(&mut self, width: u32, height: u32);

    /// Resets the device with the current presentation parameters.
    fn reset(&mut self) -> Result<(), ResetError>;

    /// Clears the back buffer and begins a scene. Returns `false` if the scene
    /// could not be started, in which case nothing should be drawn.
    fn begin_frame(&mut self, clear: ClearColor) -> bool;

    fn end_frame(&mut self);

    fn present(&mut self) -> PresentStatus;

    fn cooperative_level(&self) -> CooperativeLevel;
}

pub trait GuiBackend {
    /// Offers every native message to the GUI first. Returns `true` if consumed.
    fn filter_message(&mut self, message: &RawMessage) -> bool;

    fn new_frame(&mut self);

    fn end_frame(&mut self);

    /// Submits the frame's draw data to the render device.
    fn render(&mut self);

    /// Drops device-dependent resources before a device reset.
    fn invalidate_device_objects(&mut self);

    /// Recreates device-dependent resources after a device reset.
    fn create_device_objects(&mut self);
}

impl<G: GuiBackend + ?Sized> GuiBackend for Box<G> {
    fn filter_message(&mut self, message: &RawMessage) -> bool {
        (**self).filter_message(message)
    }

    fn new_frame(&mut self) {
        (**self).new_frame();
    }

    fn end_frame(&mut self) {
        (**self).end_frame();
    }

    fn render(&mut self) {
        (**self).render();
    }

    fn invalidate_device_objects(&mut self) {
        (**self).invalidate_device_objects();
    }

    fn create_device_objects(&mut self) {
        (**self).create_device_objects();
    }
}

/// A GUI backend that draws nothing and consumes no messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullGui;

impl GuiBackend for NullGui {
    fn filter_message(&mut self, _message: &RawMessage) -> bool {
        false
    }

    fn new_frame(&mut self) {}

    fn end_frame(&mut self) {}

    fn render(&mut self) {}

    fn invalidate_device_objects(&mut self) {}

    fn create_device_objects(&mut self) {}
}

/// Invalidates GUI device objects, resets the device and recreates the objects.
///
/// # Panics
///
/// Panics when the reset fails for any reason other than another device loss:
/// without a valid device no frame can ever be rendered again.
pub fn reset_device<D, G>(device: &mut D, gui: &mut G)
where
    D: RenderDevice + ?Sized,
    G: GuiBackend + ?Sized,
{
    gui.invalidate_device_objects();
    match device.reset() {
        Ok(()) => log::debug!("Render: device reset completed."),
        Err(ResetError::DeviceLost) => {
            log::warn!("Render: device lost again during reset; retrying after next present.")
        }
        Err(e) => {
            log::error!("Render: device reset failed: {e:?}");
            panic!("render device reset failed: {e:?}");
        }
    }
    gui.create_device_objects();
}
