//! Module registry and device lifecycle.
//!
//! One [`CameraWrapperModule`] stands in for the vendor camera module
//! towards the host loader. It resolves the real vendor module lazily, once
//! per process, and serializes open/close through a single lock. Forwarded
//! per-device operations are not covered by that lock; the host camera
//! service serializes them per device.

use std::sync::{Arc, Mutex, OnceLock};

use log::{debug, error, trace};

use camwrap_core::{invalid_arg_error, out_of_range_error, Result};

use crate::fixup::FixupConfig;
use crate::identity::{default_caller_identity, CallerIdentity};
use crate::vendor::{CameraInfo, VendorModule};
use crate::wrapper::CameraWrapper;

pub const CAMERA_MODULE_ID: &str = "camera";

/// Fixed-identity descriptor handed to the host module loader.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ModuleInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub author: &'static str,
    pub version_major: u16,
    pub version_minor: u16,
}

pub const MODULE_INFO: ModuleInfo = ModuleInfo {
    id: CAMERA_MODULE_ID,
    name: "MSM8960 Camera Wrapper",
    author: "rust-media",
    version_major: 1,
    version_minor: 0,
};

/// Per-camera cache of the last outbound-patched parameter string.
///
/// Sized to the vendor camera count at first open. Each slot owns its
/// string exclusively; replacing a slot drops the prior value, close drops
/// them all. Slots are individually locked so devices with distinct ids
/// never contend.
pub(crate) struct ParamCache {
    slots: Box<[Mutex<Option<String>>]>,
}

impl ParamCache {
    fn new(count: usize) -> Self {
        Self {
            slots: (0..count).map(|_| Mutex::new(None)).collect(),
        }
    }

    pub(crate) fn slot(&self, id: usize) -> Option<&Mutex<Option<String>>> {
        self.slots.get(id)
    }

    pub(crate) fn get(&self, id: usize) -> Option<String> {
        self.slots.get(id)?.lock().unwrap().clone()
    }

    pub(crate) fn clear(&self) {
        for slot in self.slots.iter() {
            slot.lock().unwrap().take();
        }
    }
}

pub(crate) struct ModuleState<M: VendorModule> {
    vendor: Option<M>,
    cache: Option<Arc<ParamCache>>,
}

/// Process-scoped state shared between the module and its open devices.
pub(crate) struct Shared<M: VendorModule> {
    resolver: Box<dyn Fn() -> Result<M> + Send + Sync>,
    pub(crate) state: Mutex<ModuleState<M>>,
    identity: Box<dyn CallerIdentity>,
    caller: OnceLock<Option<String>>,
}

impl<M: VendorModule> Shared<M> {
    /// Resolves the vendor module singleton; idempotent, call with the
    /// module lock held.
    fn resolve_vendor<'a>(&self, state: &'a mut ModuleState<M>) -> Result<&'a mut M> {
        match &mut state.vendor {
            Some(vendor) => Ok(vendor),
            slot @ None => {
                let vendor = (self.resolver)()
                    .inspect_err(|e| error!("failed to open vendor camera module: {e}"))?;
                Ok(slot.insert(vendor))
            }
        }
    }

    /// Resolves the caller name at most once per process; later calls reuse
    /// the cached outcome even when they fail to resolve.
    fn caller_name(&self) -> Option<&str> {
        self.caller
            .get_or_init(|| {
                let name = self.identity.process_name();
                match &name {
                    Some(name) => debug!("camera caller is {name}"),
                    None => debug!("unable to resolve camera caller"),
                }
                name
            })
            .as_deref()
    }
}

/// Wrapper module exposed to the host loader under [`CAMERA_MODULE_ID`].
pub struct CameraWrapperModule<M: VendorModule> {
    shared: Arc<Shared<M>>,
    config: FixupConfig,
}

impl<M: VendorModule> CameraWrapperModule<M> {
    /// Creates a wrapper module around a vendor module resolver. The
    /// resolver runs at most once, on first use.
    pub fn new<F>(resolver: F) -> Self
    where
        F: Fn() -> Result<M> + Send + Sync + 'static,
    {
        Self::with_identity(resolver, default_caller_identity())
    }

    pub fn with_identity<F>(resolver: F, identity: Box<dyn CallerIdentity>) -> Self
    where
        F: Fn() -> Result<M> + Send + Sync + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                resolver: Box::new(resolver),
                state: Mutex::new(ModuleState {
                    vendor: None,
                    cache: None,
                }),
                identity,
                caller: OnceLock::new(),
            }),
            config: FixupConfig::default(),
        }
    }

    pub fn with_config(mut self, config: FixupConfig) -> Self {
        self.config = config;
        self
    }

    pub fn info(&self) -> ModuleInfo {
        MODULE_INFO
    }

    /// Number of cameras the vendor module reports; zero when the vendor
    /// module cannot be resolved, matching the host contract for module
    /// level queries.
    pub fn get_number_of_cameras(&self) -> usize {
        trace!("get_number_of_cameras");
        let mut state = self.shared.state.lock().unwrap();
        match self.shared.resolve_vendor(&mut state) {
            Ok(vendor) => vendor.number_of_cameras(),
            Err(_) => 0,
        }
    }

    pub fn get_camera_info(&self, id: usize) -> Result<CameraInfo> {
        trace!("get_camera_info: camera {id}");
        let mut state = self.shared.state.lock().unwrap();
        let vendor = self.shared.resolve_vendor(&mut state)?;
        vendor.camera_info(id)
    }

    /// Opens the camera named by the service-assigned numeric id.
    ///
    /// The whole open sequence runs under the module lock: vendor module
    /// resolution, cache allocation and the vendor device open must not
    /// race with a concurrent open or close. A vendor open failure leaves
    /// no partially constructed device behind.
    pub fn open(&self, name: &str) -> Result<CameraWrapper<M>> {
        trace!("open: {name}");

        // Resolve the caller before taking the module lock; the lookup can
        // reenter process-wide state on some hosts.
        let caller = self.shared.caller_name().map(str::to_string);

        let mut state = self.shared.state.lock().unwrap();

        let num_cameras = {
            let vendor = self
                .shared
                .resolve_vendor(&mut state)
                .map_err(|_| invalid_arg_error!("vendor camera module unavailable"))?;
            vendor.number_of_cameras()
        };

        let id: usize = name
            .trim()
            .parse()
            .map_err(|_| invalid_arg_error!("camera name is not a numeric id"))?;

        let cache = state
            .cache
            .get_or_insert_with(|| Arc::new(ParamCache::new(num_cameras)))
            .clone();

        // Strict bound: the service hands out ids in [0, num_cameras).
        if id >= num_cameras {
            error!("camera service provided camera id out of bounds, id = {id}, num supported = {num_cameras}");
            return Err(out_of_range_error!("camera id exceeds vendor camera count"));
        }

        let vendor_camera = {
            let vendor = self
                .shared
                .resolve_vendor(&mut state)
                .map_err(|_| invalid_arg_error!("vendor camera module unavailable"))?;
            vendor
                .open(id)
                .inspect_err(|e| error!("vendor camera open failed: {e}"))?
        };

        debug!("opened vendor camera {id}");
        Ok(CameraWrapper::new(
            self.shared.clone(),
            id,
            vendor_camera,
            cache,
            self.config.clone(),
            caller,
        ))
    }

    /// Last outbound-patched parameter string for a camera id, if any. A
    /// diagnostic view of the patched-parameter cache.
    pub fn cached_set_params(&self, id: usize) -> Option<String> {
        let state = self.shared.state.lock().unwrap();
        state.cache.as_ref()?.get(id)
    }
}
