//! Flattened camera parameter codec.
//!
//! The camera service and the vendor driver exchange configuration as a
//! single flattened ASCII string of `key=value` pairs separated by `;`.
//! The format is platform defined; this codec only needs to round-trip it
//! faithfully so individual fields can be read and rewritten in flight.

use std::collections::{btree_map, BTreeMap};

pub const PAIR_DELIMITER: char = ';';
pub const VALUE_DELIMITER: char = '=';

/// Well-known parameter keys touched by the fixup engine. Names follow the
/// platform's flattened wire format and must not be altered.
pub mod keys {
    pub const RECORDING_HINT: &str = "recording-hint";
    pub const ISO_MODE: &str = "iso";
    pub const SUPPORTED_ISO_MODES: &str = "iso-values";
    pub const SUPPORTED_VIDEO_SIZES: &str = "video-size-values";
    pub const PREFERRED_PREVIEW_SIZE_FOR_VIDEO: &str = "preferred-preview-size-for-video";
    pub const MAX_NUM_DETECTED_FACES_HW: &str = "max-num-detected-faces-hw";
    pub const MAX_NUM_DETECTED_FACES_SW: &str = "max-num-detected-faces-sw";
    pub const FACE_DETECTION: &str = "face-detection";
    pub const SUPPORTED_FACE_DETECTION: &str = "face-detection-values";
    pub const ZSL: &str = "zsl";
    pub const CAMERA_MODE: &str = "camera-mode";
    pub const VENDOR_CAMERA_MODE: &str = "cam_mode";

    pub const TRUE_VALUE: &str = "true";
    pub const FALSE_VALUE: &str = "false";
}

/// Parsed view of a flattened parameter string.
///
/// Parsing never fails: malformed entries (no `=`, empty key) are simply
/// absent from the mapping. Serialization is deterministic, so re-flattening
/// an unchanged mapping is byte-stable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parameters {
    map: BTreeMap<String, String>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unflatten(blob: &str) -> Self {
        let mut map = BTreeMap::new();
        for pair in blob.split(PAIR_DELIMITER) {
            let Some((key, value)) = pair.split_once(VALUE_DELIMITER) else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            map.insert(key.to_string(), value.to_string());
        }
        Self { map }
    }

    pub fn flatten(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.map {
            if !out.is_empty() {
                out.push(PAIR_DELIMITER);
            }
            out.push_str(key);
            out.push(VALUE_DELIMITER);
            out.push_str(value);
        }
        out
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
    }

    pub fn remove(&mut self, key: &str) {
        self.map.remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.map.iter(),
        }
    }
}

pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
