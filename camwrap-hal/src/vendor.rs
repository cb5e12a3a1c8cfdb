//! Capability surface of the wrapped vendor camera module.
//!
//! These traits mirror the host HAL's device operation table one method per
//! operation. The wrapper trusts every result it gets from the vendor side
//! except where the fixup engine explicitly patches it.

use std::io;
use std::sync::Arc;

use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use camwrap_core::Result;

bitflags! {
    /// Message types the camera service can subscribe to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MsgType: i32 {
        const ERROR            = 0x0001;
        const SHUTTER          = 0x0002;
        const FOCUS            = 0x0004;
        const ZOOM             = 0x0008;
        const PREVIEW_FRAME    = 0x0010;
        const VIDEO_FRAME      = 0x0020;
        const POSTVIEW_FRAME   = 0x0040;
        const RAW_IMAGE        = 0x0080;
        const COMPRESSED_IMAGE = 0x0100;
        const RAW_IMAGE_NOTIFY = 0x0200;
        const PREVIEW_METADATA = 0x0400;
        const FOCUS_MOVE       = 0x0800;
        const ALL_MSGS         = 0xFFFF;
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum CameraFacing {
    Back = 0,
    Front = 1,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CameraInfo {
    pub facing: CameraFacing,
    /// Clockwise rotation of the sensor image, in degrees.
    pub orientation: i32,
}

/// Opaque handle to the preview surface supplied by the camera service.
/// The wrapper never looks inside, it is forwarded verbatim.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PreviewWindow(pub u64);

/// Opaque handle to a recording frame owned by the vendor driver.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FrameHandle(pub u64);

/// Callbacks registered by the camera service, passed through to the vendor
/// device unchanged.
#[allow(unused_variables)]
pub trait CameraListener: Send + Sync {
    fn on_notify(&self, msg: MsgType, ext1: i32, ext2: i32) {}
    fn on_data(&self, msg: MsgType, data: &[u8]) {}
    fn on_data_timestamp(&self, msg: MsgType, timestamp_ns: i64, data: &[u8]) {}
}

/// One open vendor camera instance.
///
/// Operations that are void at the HAL boundary stay void here; the vendor
/// has no failure channel for them. `get_parameters` transfers ownership of
/// the returned string to the caller, who must hand it back through
/// `put_parameters` once done.
pub trait VendorCamera: Send {
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
    fn close(&mut self) -> Result<()>;
}

/// Entry points of the vendor camera module, resolved once per process and
/// shared by all device instances.
pub trait VendorModule: Send + Sync {
    type Camera: VendorCamera;

    fn number_of_cameras(&self) -> usize;
    fn camera_info(&self, id: usize) -> Result<CameraInfo>;
    fn open(&self, id: usize) -> Result<Self::Camera>;
}
