//! Facade crate re-exporting the camera wrapper workspace.

pub use camwrap_core::error;
pub use camwrap_core::params;
pub use camwrap_core::{Parameters, Result};

pub use camwrap_hal::{
    fixup, identity, module, vendor, CameraDeviceOps, CameraFacing, CameraInfo, CameraListener,
    CameraWrapper, CameraWrapperModule, CancelAutoFocus, FaceDetectionFixup, FixupConfig,
    FrameHandle, ModuleInfo, MsgType, PreviewWindow, VendorCamera, VendorModule, CAMERA_MODULE_ID,
    MODULE_INFO,
};
