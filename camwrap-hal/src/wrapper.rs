//! Wrapper device and forwarding dispatch.
//!
//! Every operation validates that the device is still open, then forwards
//! to the identically named vendor operation with its arguments unchanged.
//! The exceptions are the two parameter calls, which detour through the
//! fixup engine, and `cancel_auto_focus`, which carries extra policy.

use std::io;
use std::sync::Arc;

use log::{error, trace};

use camwrap_core::{invalid_arg_error, out_of_range_error, Result};

use crate::fixup::{fixup_get_params, fixup_set_params, CancelAutoFocus, FixupConfig};
use crate::module::{ParamCache, Shared};
use crate::vendor::{CameraListener, FrameHandle, MsgType, PreviewWindow, VendorCamera, VendorModule};

/// Host-facing device operation surface, one method per camera capability.
///
/// Void operations on a closed device are no-ops and boolean queries report
/// their disabled value; fallible operations fail with an invalid-argument
/// error. No vendor call is made either way.
pub trait CameraDeviceOps {
    fn set_preview_window(&mut self, window: Option<PreviewWindow>) -> Result<()>;
    fn set_callbacks(&mut self, listener: Arc<dyn CameraListener>);
    fn enable_msg_type(&mut self, msg_type: MsgType);
    fn disable_msg_type(&mut self, msg_type: MsgType);
    fn msg_type_enabled(&mut self, msg_type: MsgType) -> bool;
    fn start_preview(&mut self) -> Result<()>;
    fn stop_preview(&mut self);
    fn preview_enabled(&mut self) -> Result<bool>;
    fn store_meta_data_in_buffers(&mut self, enable: bool) -> Result<()>;
    fn start_recording(&mut self) -> Result<()>;
    fn stop_recording(&mut self);
    fn recording_enabled(&mut self) -> Result<bool>;
    fn release_recording_frame(&mut self, frame: FrameHandle);
    fn auto_focus(&mut self) -> Result<()>;
    fn cancel_auto_focus(&mut self) -> Result<()>;
    fn take_picture(&mut self) -> Result<()>;
    fn cancel_picture(&mut self) -> Result<()>;
    fn set_parameters(&mut self, params: &str) -> Result<()>;
    fn get_parameters(&mut self) -> Result<String>;
    fn put_parameters(&mut self, params: String);
    fn send_command(&mut self, cmd: i32, arg1: i32, arg2: i32) -> Result<()>;
    fn release(&mut self);
    fn dump(&mut self, out: &mut dyn io::Write) -> Result<()>;
}

/// One open camera: the service-assigned id, exclusive ownership of the
/// vendor device, and a handle on the process-wide wrapper state.
pub struct CameraWrapper<M: VendorModule> {
    id: usize,
    vendor: Option<M::Camera>,
    cache: Arc<ParamCache>,
    config: FixupConfig,
    caller: Option<String>,
    shared: Arc<Shared<M>>,
}

impl<M: VendorModule> std::fmt::Debug for CameraWrapper<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraWrapper")
            .field("id", &self.id)
            .field("caller", &self.caller)
            .finish_non_exhaustive()
    }
}

impl<M: VendorModule> CameraWrapper<M> {
    pub(crate) fn new(
        shared: Arc<Shared<M>>,
        id: usize,
        vendor: M::Camera,
        cache: Arc<ParamCache>,
        config: FixupConfig,
        caller: Option<String>,
    ) -> Self {
        Self {
            id,
            vendor: Some(vendor),
            cache,
            config,
            caller,
            shared,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_open(&self) -> bool {
        self.vendor.is_some()
    }

    /// Closes the device: drops every cached parameter string and closes
    /// the vendor device. Serialized against `open` by the module lock.
    /// Closing twice fails with an invalid-argument error and performs no
    /// action.
    pub fn close(&mut self) -> Result<()> {
        trace!("close: camera {}", self.id);
        let shared = self.shared.clone();
        let _guard = shared.state.lock().unwrap();

        let Some(mut vendor) = self.vendor.take() else {
            return Err(invalid_arg_error!("device already closed"));
        };
        self.cache.clear();
        vendor.close()
    }

    fn vendor_mut(&mut self) -> Result<&mut M::Camera> {
        self.vendor
            .as_mut()
            .ok_or_else(|| invalid_arg_error!("no open vendor device"))
    }
}

impl<M: VendorModule> Drop for CameraWrapper<M> {
    fn drop(&mut self) {
        if self.vendor.is_some() {
            if let Err(e) = self.close() {
                error!("camera {} close on drop failed: {e}", self.id);
            }
        }
    }
}

impl<M: VendorModule> CameraDeviceOps for CameraWrapper<M> {
    fn set_preview_window(&mut self, window: Option<PreviewWindow>) -> Result<()> {
        trace!("set_preview_window: camera {}", self.id);
        self.vendor_mut()?.set_preview_window(window)
    }

    fn set_callbacks(&mut self, listener: Arc<dyn CameraListener>) {
        trace!("set_callbacks: camera {}", self.id);
        if let Some(vendor) = self.vendor.as_mut() {
            vendor.set_callbacks(listener);
        }
    }

    fn enable_msg_type(&mut self, msg_type: MsgType) {
        trace!("enable_msg_type: camera {} {msg_type:?}", self.id);
        if let Some(vendor) = self.vendor.as_mut() {
            vendor.enable_msg_type(msg_type);
        }
    }

    fn disable_msg_type(&mut self, msg_type: MsgType) {
        trace!("disable_msg_type: camera {} {msg_type:?}", self.id);
        if let Some(vendor) = self.vendor.as_mut() {
            vendor.disable_msg_type(msg_type);
        }
    }

    fn msg_type_enabled(&mut self, msg_type: MsgType) -> bool {
        trace!("msg_type_enabled: camera {} {msg_type:?}", self.id);
        match self.vendor.as_mut() {
            Some(vendor) => vendor.msg_type_enabled(msg_type),
            None => false,
        }
    }

    fn start_preview(&mut self) -> Result<()> {
        trace!("start_preview: camera {}", self.id);
        self.vendor_mut()?.start_preview()
    }

    fn stop_preview(&mut self) {
        trace!("stop_preview: camera {}", self.id);
        if let Some(vendor) = self.vendor.as_mut() {
            vendor.stop_preview();
        }
    }

    fn preview_enabled(&mut self) -> Result<bool> {
        trace!("preview_enabled: camera {}", self.id);
        self.vendor_mut()?.preview_enabled()
    }

    fn store_meta_data_in_buffers(&mut self, enable: bool) -> Result<()> {
        trace!("store_meta_data_in_buffers: camera {} {enable}", self.id);
        self.vendor_mut()?.store_meta_data_in_buffers(enable)
    }

    fn start_recording(&mut self) -> Result<()> {
        trace!("start_recording: camera {}", self.id);
        self.vendor_mut()?.start_recording()
    }

    fn stop_recording(&mut self) {
        trace!("stop_recording: camera {}", self.id);
        if let Some(vendor) = self.vendor.as_mut() {
            vendor.stop_recording();
        }
    }

    fn recording_enabled(&mut self) -> Result<bool> {
        trace!("recording_enabled: camera {}", self.id);
        self.vendor_mut()?.recording_enabled()
    }

    fn release_recording_frame(&mut self, frame: FrameHandle) {
        trace!("release_recording_frame: camera {}", self.id);
        if let Some(vendor) = self.vendor.as_mut() {
            vendor.release_recording_frame(frame);
        }
    }

    fn auto_focus(&mut self) -> Result<()> {
        trace!("auto_focus: camera {}", self.id);
        self.vendor_mut()?.auto_focus()
    }

    fn cancel_auto_focus(&mut self) -> Result<()> {
        trace!("cancel_auto_focus: camera {}", self.id);
        let policy = self.config.cancel_auto_focus;
        let vendor = self.vendor_mut()?;
        match policy {
            CancelAutoFocus::Disabled => Ok(()),
            // Canceling autofocus with the preview stopped faults some
            // vendor drivers; forward only while the preview is live.
            CancelAutoFocus::PreviewOnly => {
                if vendor.preview_enabled()? {
                    vendor.cancel_auto_focus()
                } else {
                    Ok(())
                }
            }
        }
    }

    fn take_picture(&mut self) -> Result<()> {
        trace!("take_picture: camera {}", self.id);
        self.vendor_mut()?.take_picture()
    }

    fn cancel_picture(&mut self) -> Result<()> {
        trace!("cancel_picture: camera {}", self.id);
        self.vendor_mut()?.cancel_picture()
    }

    fn set_parameters(&mut self, params: &str) -> Result<()> {
        trace!("set_parameters: camera {}", self.id);
        let vendor = self
            .vendor
            .as_mut()
            .ok_or_else(|| invalid_arg_error!("no open vendor device"))?;

        let fixup = fixup_set_params(self.id, &self.config, self.caller.as_deref(), params);
        if let Some((cmd, arg1, arg2)) = fixup.command {
            vendor.send_command(cmd, arg1, arg2)?;
        }

        let slot = self
            .cache
            .slot(self.id)
            .ok_or_else(|| out_of_range_error!("camera id outside parameter cache"))?;
        let mut guard = slot.lock().unwrap();
        let patched = guard.insert(fixup.params);
        trace!("{patched}");
        vendor.set_parameters(patched)
    }

    fn get_parameters(&mut self) -> Result<String> {
        trace!("get_parameters: camera {}", self.id);
        let vendor = self
            .vendor
            .as_mut()
            .ok_or_else(|| invalid_arg_error!("no open vendor device"))?;

        let raw = vendor.get_parameters()?;
        trace!("{raw}");
        let fixed = fixup_get_params(self.id, &self.config, &raw);
        // Hand the vendor's own string back through its release mechanism;
        // the service only ever sees the patched copy.
        vendor.put_parameters(raw);
        trace!("{fixed}");
        Ok(fixed)
    }

    fn put_parameters(&mut self, params: String) {
        trace!("put_parameters: camera {}", self.id);
        drop(params);
    }

    fn send_command(&mut self, cmd: i32, arg1: i32, arg2: i32) -> Result<()> {
        trace!("send_command: camera {} cmd {cmd}", self.id);
        self.vendor_mut()?.send_command(cmd, arg1, arg2)
    }

    fn release(&mut self) {
        trace!("release: camera {}", self.id);
        if let Some(vendor) = self.vendor.as_mut() {
            vendor.release();
        }
    }

    fn dump(&mut self, out: &mut dyn io::Write) -> Result<()> {
        trace!("dump: camera {}", self.id);
        self.vendor_mut()?.dump(out)
    }
}
