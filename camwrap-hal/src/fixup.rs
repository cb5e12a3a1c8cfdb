//! Parameter fixup engine.
//!
//! Two transformations, one per direction: `fixup_set_params` rewrites the
//! flattened parameter string the service pushes towards the vendor driver,
//! `fixup_get_params` rewrites the string the driver reports back. Each
//! rewrite family is independently togglable through [`FixupConfig`]; the
//! defaults are selected at build time by cargo features, one per supported
//! hardware variant quirk.

use log::debug;

use camwrap_core::params::keys;
use camwrap_core::Parameters;

/// Vendor-specific out-of-band command issued when switching the driver
/// into the zero-shutter-lag still capture path.
pub const VENDOR_CMD_ZSL_STREAM: i32 = 1508;

/// Preferred preview size forced when `video_preview_always_max` is set.
const MAX_VIDEO_PREVIEW_SIZE: &str = "1920x1080";

/// Callers for which the vendor camcorder mode must not be enabled; these
/// apps drive the camera in ways the vendor mode breaks.
const CAMCORDER_MODE_EXCLUDE: &[&str] = &["com.snapchat.android", "com.google.android.talk"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaceDetectionFixup {
    /// Leave face detection fields as the caller/vendor supplied them.
    #[default]
    Keep,
    /// Force face detection off for the front-facing camera only.
    FrontCamera,
    /// Force face detection off for every camera.
    AllCameras,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CancelAutoFocus {
    /// Forward `cancel_auto_focus` only while the preview is live. Some
    /// vendor drivers fault when the call arrives with the preview stopped.
    #[default]
    PreviewOnly,
    /// Never forward; the call succeeds as a no-op.
    Disabled,
}

/// Rewrite selection for one wrapper module.
///
/// `Default` mirrors the crate's enabled cargo features so a stock build
/// behaves like the equivalent `#ifdef` selection; tests construct values
/// directly to exercise each rewrite in isolation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixupConfig {
    /// Remap named ISO presets to their bare numeric form and advertise a
    /// per-camera supported-ISO list.
    pub iso_remap: bool,
    /// Include the HJR entry in the advertised ISO list.
    pub iso_hjr: bool,
    /// Include ISO1600 in the advertised ISO list.
    pub iso_1600: bool,
    /// Strip supported-video-sizes and the preferred video preview size.
    pub preview_size_fixup: bool,
    /// Force the preferred video preview size to the sensor maximum.
    pub video_preview_always_max: bool,
    pub face_detection: FaceDetectionFixup,
    /// Drive the vendor `cam_mode` field from the recording hint.
    pub camcorder_mode: bool,
    /// Toggle zero-shutter-lag inversely to the recording hint.
    pub zsl: bool,
    /// Issue [`VENDOR_CMD_ZSL_STREAM`] when entering the still-capture path.
    pub zsl_stream_command: bool,
    pub cancel_auto_focus: CancelAutoFocus,
    /// Camera id treated as front-facing for scoped rewrites.
    pub front_camera_id: usize,
}

impl FixupConfig {
    /// Configuration with every rewrite disabled; parameters pass through
    /// modulo canonical re-serialization.
    pub fn none() -> Self {
        Self {
            iso_remap: false,
            iso_hjr: false,
            iso_1600: false,
            preview_size_fixup: false,
            video_preview_always_max: false,
            face_detection: FaceDetectionFixup::Keep,
            camcorder_mode: false,
            zsl: false,
            zsl_stream_command: false,
            cancel_auto_focus: CancelAutoFocus::PreviewOnly,
            front_camera_id: 1,
        }
    }
}

impl Default for FixupConfig {
    fn default() -> Self {
        Self {
            iso_remap: cfg!(feature = "iso-remap"),
            iso_hjr: cfg!(feature = "iso-hjr"),
            iso_1600: cfg!(feature = "iso-1600"),
            preview_size_fixup: cfg!(feature = "preview-size-fixup"),
            video_preview_always_max: cfg!(feature = "video-preview-max"),
            face_detection: if cfg!(feature = "disable-face-detection-both") {
                FaceDetectionFixup::AllCameras
            } else if cfg!(feature = "disable-face-detection") {
                FaceDetectionFixup::FrontCamera
            } else {
                FaceDetectionFixup::Keep
            },
            camcorder_mode: cfg!(feature = "camcorder-mode"),
            zsl: cfg!(feature = "zsl"),
            zsl_stream_command: cfg!(feature = "zsl-stream-command"),
            cancel_auto_focus: if cfg!(feature = "disable-cancel-autofocus") {
                CancelAutoFocus::Disabled
            } else {
                CancelAutoFocus::PreviewOnly
            },
            front_camera_id: 1,
        }
    }
}

/// Result of the outbound fixup: the rewritten parameter string plus an
/// optional vendor command the dispatch layer must issue before forwarding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetParamsFixup {
    pub params: String,
    pub command: Option<(i32, i32, i32)>,
}

pub fn camcorder_mode_excluded(caller: &str) -> bool {
    CAMCORDER_MODE_EXCLUDE.contains(&caller)
}

fn remap_iso_preset(value: &str) -> Option<&'static str> {
    // HJR needs no remapping, it reads the same on both sides.
    match value {
        "ISO100" => Some("100"),
        "ISO200" => Some("200"),
        "ISO400" => Some("400"),
        "ISO800" => Some("800"),
        "ISO1600" => Some("1600"),
        _ => None,
    }
}

fn supported_iso_modes(config: &FixupConfig, id: usize) -> String {
    // Only the back sensor supports the named presets; every other camera
    // is limited to automatic ISO.
    if id != 0 {
        return "auto".to_string();
    }
    let mut modes = vec!["auto"];
    if config.iso_hjr {
        modes.push("ISO_HJR");
    }
    modes.extend(["ISO100", "ISO200", "ISO400", "ISO800"]);
    if config.iso_1600 {
        modes.push("ISO1600");
    }
    modes.join(",")
}

fn apply_face_detection_fixup(params: &mut Parameters, id: usize, config: &FixupConfig) {
    let apply = match config.face_detection {
        FaceDetectionFixup::Keep => false,
        FaceDetectionFixup::FrontCamera => id == config.front_camera_id,
        FaceDetectionFixup::AllCameras => true,
    };
    if !apply {
        return;
    }
    params.set(keys::MAX_NUM_DETECTED_FACES_HW, "0");
    params.set(keys::MAX_NUM_DETECTED_FACES_SW, "0");
    params.set(keys::FACE_DETECTION, "off");
    params.set(keys::SUPPORTED_FACE_DETECTION, "off");
}

/// Rewrites an outbound parameter string (service towards driver).
///
/// Deterministic for a fixed `(id, config, caller, settings)` tuple. No
/// rewrite assumes a field exists; face detection suppression runs after
/// the ISO and size rewrites so its forced values are final.
pub fn fixup_set_params(
    id: usize,
    config: &FixupConfig,
    caller: Option<&str>,
    settings: &str,
) -> SetParamsFixup {
    let mut params = Parameters::unflatten(settings);

    let is_video = params.get(keys::RECORDING_HINT) == Some(keys::TRUE_VALUE);

    if config.iso_remap {
        if let Some(numeric) = params.get(keys::ISO_MODE).and_then(remap_iso_preset) {
            params.set(keys::ISO_MODE, numeric);
        }
    }

    if config.preview_size_fixup {
        params.remove(keys::SUPPORTED_VIDEO_SIZES);
        params.remove(keys::PREFERRED_PREVIEW_SIZE_FOR_VIDEO);
    }

    apply_face_detection_fixup(&mut params, id, config);

    if config.camcorder_mode {
        match caller {
            Some(name) if camcorder_mode_excluded(name) => {
                debug!("camera opened by excluded app {name}, not enabling vendor camcorder mode");
            }
            _ => {
                // Unresolved caller: apply unconditionally, the lookup is
                // best-effort only.
                params.set(keys::VENDOR_CAMERA_MODE, if is_video { "1" } else { "0" });
            }
        }
    }

    let mut command = None;
    if config.zsl {
        params.set(keys::ZSL, if is_video { "off" } else { "on" });
        params.set(keys::CAMERA_MODE, if is_video { "0" } else { "1" });
        if !is_video && config.zsl_stream_command {
            command = Some((VENDOR_CMD_ZSL_STREAM, 0, 0));
        }
    }

    debug!("set parameters fixed up for camera {id}");
    SetParamsFixup {
        params: params.flatten(),
        command,
    }
}

/// Rewrites an inbound parameter string (driver back towards service).
pub fn fixup_get_params(id: usize, config: &FixupConfig, settings: &str) -> String {
    let mut params = Parameters::unflatten(settings);

    if config.iso_remap {
        params.set(keys::SUPPORTED_ISO_MODES, &supported_iso_modes(config, id));
    }

    if config.preview_size_fixup {
        params.remove(keys::SUPPORTED_VIDEO_SIZES);
        params.remove(keys::PREFERRED_PREVIEW_SIZE_FOR_VIDEO);
    }

    if config.video_preview_always_max {
        params.set(keys::PREFERRED_PREVIEW_SIZE_FOR_VIDEO, MAX_VIDEO_PREVIEW_SIZE);
    }

    apply_face_detection_fixup(&mut params, id, config);

    debug!("get parameters fixed up for camera {id}");
    params.flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_preset_remap_table() {
        assert_eq!(remap_iso_preset("ISO100"), Some("100"));
        assert_eq!(remap_iso_preset("ISO1600"), Some("1600"));
        assert_eq!(remap_iso_preset("ISO3200"), None);
        assert_eq!(remap_iso_preset("auto"), None);
        assert_eq!(remap_iso_preset("ISO_HJR"), None);
    }

    #[test]
    fn supported_iso_modes_per_camera() {
        let mut config = FixupConfig::none();
        config.iso_remap = true;
        assert_eq!(supported_iso_modes(&config, 0), "auto,ISO100,ISO200,ISO400,ISO800");
        assert_eq!(supported_iso_modes(&config, 1), "auto");

        config.iso_hjr = true;
        config.iso_1600 = true;
        assert_eq!(
            supported_iso_modes(&config, 0),
            "auto,ISO_HJR,ISO100,ISO200,ISO400,ISO800,ISO1600"
        );
        // Variant entries never leak to the front camera.
        assert_eq!(supported_iso_modes(&config, 1), "auto");
    }

    #[test]
    fn camcorder_exclusion_list() {
        assert!(camcorder_mode_excluded("com.snapchat.android"));
        assert!(camcorder_mode_excluded("com.google.android.talk"));
        assert!(!camcorder_mode_excluded("com.android.camera"));
    }

    #[test]
    fn fixups_with_everything_off_preserve_fields() {
        let config = FixupConfig::none();
        let blob = "face-detection=on;iso=ISO400;recording-hint=true;zsl=off";
        let fixed = fixup_set_params(0, &config, None, blob);
        assert_eq!(fixed.params, blob);
        assert_eq!(fixed.command, None);
        assert_eq!(fixup_get_params(0, &config, blob), blob);
    }
}
