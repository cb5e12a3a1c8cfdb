//! Interposing wrapper for vendor camera HAL modules.
//!
//! The wrapper sits between the camera service and a vendor-supplied camera
//! module. Every device operation is forwarded to the vendor implementation
//! unchanged; only the flattened parameter strings exchanged on
//! `set_parameters`/`get_parameters` are rewritten, to mask or inject
//! capability fields the vendor driver reports incorrectly on specific
//! hardware variants.

pub mod fixup;
pub mod identity;
pub mod module;
pub mod vendor;

mod wrapper;

pub use camwrap_core::{error::Error, Result};
pub use fixup::{CancelAutoFocus, FaceDetectionFixup, FixupConfig};
pub use module::{CameraWrapperModule, ModuleInfo, CAMERA_MODULE_ID, MODULE_INFO};
pub use vendor::{
    CameraFacing, CameraInfo, CameraListener, FrameHandle, MsgType, PreviewWindow, VendorCamera,
    VendorModule,
};
pub use wrapper::{CameraDeviceOps, CameraWrapper};
