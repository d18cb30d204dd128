/*
 * Direct3D 9 render device. Owns the D3D9 interface, the device and its
 * presentation parameters; nothing about the device lives at process scope.
 * Both COM objects are released when the adapter is dropped.
 */
use crate::error::{PlatformError, Result as PlatformResult};
use crate::render::{CooperativeLevel, PresentStatus, RenderDevice, ResetError};
use crate::types::ClearColor;

use windows::Win32::{
    Foundation::{HWND, RECT},
    Graphics::{Direct3D9::*, Gdi::RGNDATA},
};
use windows::core::BOOL;

pub(crate) struct D3d9Device {
    // Kept alive for the lifetime of the device created from it.
    _direct3d: IDirect3D9,
    device: IDirect3DDevice9,
    params: D3DPRESENT_PARAMETERS,
}

fn presentation_parameters(vsync: bool) -> D3DPRESENT_PARAMETERS {
    D3DPRESENT_PARAMETERS {
        Windowed: BOOL::from(true),
        SwapEffect: D3DSWAPEFFECT_DISCARD,
        BackBufferFormat: D3DFMT_UNKNOWN,
        EnableAutoDepthStencil: BOOL::from(true),
        AutoDepthStencilFormat: D3DFMT_D16,
        PresentationInterval: if vsync {
            D3DPRESENT_INTERVAL_ONE as u32
        } else {
            D3DPRESENT_INTERVAL_IMMEDIATE as u32
        },
        ..Default::default()
    }
}

impl D3d9Device {
    pub(crate) fn create(hwnd: HWND, vsync: bool) -> PlatformResult<Self> {
        let direct3d = unsafe { Direct3DCreate9(D3D_SDK_VERSION) }.ok_or_else(|| {
            PlatformError::DeviceCreation("Direct3DCreate9 returned no interface".to_string())
        })?;

        let mut params = presentation_parameters(vsync);
        let mut device = None;
        unsafe {
            direct3d.CreateDevice(
                D3DADAPTER_DEFAULT,
                D3DDEVTYPE_HAL,
                hwnd,
                D3DCREATE_HARDWARE_VERTEXPROCESSING as u32,
                &mut params,
                &mut device,
            )
        }
        .map_err(|e| PlatformError::DeviceCreation(format!("CreateDevice failed: {e:?}")))?;
        let device = device.ok_or_else(|| {
            PlatformError::DeviceCreation("CreateDevice returned no device".to_string())
        })?;

        log::debug!("Render: Direct3D 9 device created (vsync: {vsync}).");
        Ok(Self {
            _direct3d: direct3d,
            device,
            params,
        })
    }

    pub(crate) fn device(&self) -> &IDirect3DDevice9 {
        &self.device
    }
}

impl RenderDevice for D3d9Device {
    fn resize_back_buffer(&mut self, width: u32, height: u32) {
        self.params.BackBufferWidth = width;
        self.params.BackBufferHeight = height;
    }

    fn reset(&mut self) -> Result<(), ResetError> {
        match unsafe { self.device.Reset(&mut self.params) } {
            Ok(()) => Ok(()),
            Err(e) if e.code() == D3DERR_INVALIDCALL => Err(ResetError::InvalidCall),
            Err(e) if e.code() == D3DERR_DEVICELOST => Err(ResetError::DeviceLost),
            Err(e) => Err(ResetError::Other(e.code().0)),
        }
    }

    fn begin_frame(&mut self, clear: ClearColor) -> bool {
        unsafe {
            _ = self.device.SetRenderState(D3DRS_ZENABLE, 0);
            _ = self.device.SetRenderState(D3DRS_ALPHABLENDENABLE, 0);
            _ = self.device.SetRenderState(D3DRS_SCISSORTESTENABLE, 0);
            _ = self.device.Clear(
                0,
                std::ptr::null(),
                (D3DCLEAR_TARGET | D3DCLEAR_ZBUFFER) as u32,
                clear.argb(),
                1.0,
                0,
            );
            self.device.BeginScene().is_ok()
        }
    }

    fn end_frame(&mut self) {
        if let Err(e) = unsafe { self.device.EndScene() } {
            log::warn!("Render: EndScene failed: {e:?}");
        }
    }

    fn present(&mut self) -> PresentStatus {
        let result = unsafe {
            self.device.Present(
                std::ptr::null::<RECT>(),
                std::ptr::null::<RECT>(),
                HWND::default(),
                std::ptr::null::<RGNDATA>(),
            )
        };
        match result {
            Ok(()) => PresentStatus::Presented,
            Err(e) if e.code() == D3DERR_DEVICELOST => PresentStatus::DeviceLost,
            Err(e) => PresentStatus::Failed(e.code().0),
        }
    }

    fn cooperative_level(&self) -> CooperativeLevel {
        match unsafe { self.device.TestCooperativeLevel() } {
            Ok(()) => CooperativeLevel::Ok,
            Err(e) if e.code() == D3DERR_DEVICENOTRESET => CooperativeLevel::NotReset,
            Err(_) => CooperativeLevel::Lost,
        }
    }
}
