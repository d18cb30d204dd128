/*
 * Test doubles for the native window, render device, GUI backend and message source.
 */

use crate::host::{MessageSource, Pump};
use crate::messages::RawMessage;
use crate::native::NativeWindow;
use crate::render::{CooperativeLevel, GuiBackend, PresentStatus, RenderDevice, ResetError};
use crate::types::{ClearColor, Rect, WindowStyle};

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NativeCall {
    SetStyle(u32),
    ExtendFrame(i32),
    RefreshFrame,
    MoveClassWindow(i32, i32),
    Destroy,
    PostQuit,
}

pub(crate) struct MockWindow {
    rect: Rect,
    composition: bool,
    style_bits: Cell<u32>,
    maximized: Cell<bool>,
    work_area: Cell<Option<Rect>>,
    calls: RefCell<Vec<NativeCall>>,
}

impl MockWindow {
    pub(crate) fn new(rect: Rect, composition: bool) -> Self {
        Self {
            rect,
            composition,
            style_bits: Cell::new(0),
            maximized: Cell::new(false),
            work_area: Cell::new(None),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Sets the style as the system would report it after showing (WS_VISIBLE added).
    pub(crate) fn set_initial_style(&self, style: WindowStyle) {
        self.style_bits.set(style.bits() | 0x1000_0000);
    }

    pub(crate) fn set_raw_style(&self, bits: u32) {
        self.style_bits.set(bits);
    }

    pub(crate) fn set_maximized(&self, maximized: bool, work_area: Option<Rect>) {
        self.maximized.set(maximized);
        self.work_area.set(work_area);
    }

    pub(crate) fn calls(&self) -> Vec<NativeCall> {
        self.calls.borrow().clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: NativeCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl NativeWindow for MockWindow {
    fn style_bits(&self) -> u32 {
        self.style_bits.get()
    }

    fn set_style_bits(&self, bits: u32) {
        self.style_bits.set(bits);
        self.record(NativeCall::SetStyle(bits));
    }

    fn composition_enabled(&self) -> bool {
        self.composition
    }

    fn extend_frame_into_client_area(&self, inset: i32) {
        self.record(NativeCall::ExtendFrame(inset));
    }

    fn refresh_frame(&self) {
        // ShowWindow marks the window visible again.
        self.style_bits.set(self.style_bits.get() | 0x1000_0000);
        self.record(NativeCall::RefreshFrame);
    }

    fn window_rect(&self) -> Option<Rect> {
        Some(self.rect)
    }

    fn is_maximized(&self) -> bool {
        self.maximized.get()
    }

    fn monitor_work_area(&self) -> Option<Rect> {
        self.work_area.get()
    }

    fn class_window_rect(&self) -> Option<Rect> {
        Some(self.rect)
    }

    fn move_class_window(&self, left: i32, top: i32) {
        self.record(NativeCall::MoveClassWindow(left, top));
    }

    fn destroy(&self) {
        self.record(NativeCall::Destroy);
    }

    fn post_quit(&self) {
        self.record(NativeCall::PostQuit);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DeviceCall {
    Resize(u32, u32),
    Reset,
    Begin(ClearColor),
    End,
    Present,
}

pub(crate) struct MockDevice {
    pub(crate) calls: Vec<DeviceCall>,
    pub(crate) reset_result: Result<(), ResetError>,
    pub(crate) begin_ok: bool,
    pub(crate) present_results: VecDeque<PresentStatus>,
    pub(crate) cooperative: CooperativeLevel,
}

impl Default for MockDevice {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            reset_result: Ok(()),
            begin_ok: true,
            present_results: VecDeque::new(),
            cooperative: CooperativeLevel::Ok,
        }
    }
}

impl RenderDevice for MockDevice {
    fn resize_back_buffer(&mut self, width: u32, height: u32) {
        self.calls.push(DeviceCall::Resize(width, height));
    }

    fn reset(&mut self) -> Result<(), ResetError> {
        self.calls.push(DeviceCall::Reset);
        self.reset_result
    }

    fn begin_frame(&mut self, clear: ClearColor) -> bool {
        self.calls.push(DeviceCall::Begin(clear));
        self.begin_ok
    }

    fn end_frame(&mut self) {
        self.calls.push(DeviceCall::End);
    }

    fn present(&mut self) -> PresentStatus {
        self.calls.push(DeviceCall::Present);
        self.present_results
            .pop_front()
            .unwrap_or(PresentStatus::Presented)
    }

    fn cooperative_level(&self) -> CooperativeLevel {
        self.cooperative
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GuiCall {
    Filter(u32),
    NewFrame,
    EndFrame,
    Render,
    InvalidateObjects,
    CreateObjects,
}

#[derive(Default)]
pub(crate) struct MockGui {
    pub(crate) calls: Vec<GuiCall>,
    pub(crate) consume: Vec<u32>,
}

impl GuiBackend for MockGui {
    fn filter_message(&mut self, message: &RawMessage) -> bool {
        self.calls.push(GuiCall::Filter(message.msg));
        self.consume.contains(&message.msg)
    }

    fn new_frame(&mut self) {
        self.calls.push(GuiCall::NewFrame);
    }

    fn end_frame(&mut self) {
        self.calls.push(GuiCall::EndFrame);
    }

    fn render(&mut self) {
        self.calls.push(GuiCall::Render);
    }

    fn invalidate_device_objects(&mut self) {
        self.calls.push(GuiCall::InvalidateObjects);
    }

    fn create_device_objects(&mut self) {
        self.calls.push(GuiCall::CreateObjects);
    }
}

/// Replays a fixed pump script; each `Dispatched` step may carry a callback that
/// stands in for the window procedure.
pub(crate) struct ScriptedSource {
    steps: VecDeque<(Pump, Option<Box<dyn FnOnce()>>)>,
    pub(crate) polls: Rc<Cell<usize>>,
}

impl ScriptedSource {
    pub(crate) fn new(steps: impl IntoIterator<Item = Pump>) -> Self {
        Self {
            steps: steps.into_iter().map(|p| (p, None)).collect(),
            polls: Rc::new(Cell::new(0)),
        }
    }

    pub(crate) fn then_dispatch(mut self, handler: impl FnOnce() + 'static) -> Self {
        self.steps.push_back((Pump::Dispatched, Some(Box::new(handler))));
        self
    }

    pub(crate) fn then(mut self, pump: Pump) -> Self {
        self.steps.push_back((pump, None));
        self
    }
}

impl MessageSource for ScriptedSource {
    fn pump(&mut self) -> Pump {
        self.polls.set(self.polls.get() + 1);
        match self.steps.pop_front() {
            Some((pump, handler)) => {
                if let Some(handler) = handler {
                    handler();
                }
                pump
            }
            None => Pump::Quit,
        }
    }
}
