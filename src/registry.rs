// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! The process-wide packager registry.

Formats are registered once during process startup and read many times
afterwards. [register_defaults] installs the built-in `deb`, `rpm` and
`apk` packagers; callers with custom formats add theirs with [register].
*/

use {
    crate::{
        error::{PackagingError, Result},
        package_info::PackageInfo,
    },
    once_cell::sync::Lazy,
    std::{
        collections::BTreeMap,
        io::Write,
        sync::{Arc, RwLock},
    },
};

/// A component that turns a [PackageInfo] into a format-specific byte stream.
pub trait Packager: Send + Sync + std::fmt::Debug {
    /// The conventional file name of the artifact built from `info`.
    fn conventional_file_name(&self, info: &PackageInfo) -> String;

    /// Write a complete package described by `info` to `writer`.
    ///
    /// `info` must already have been through [PackageInfo::with_defaults]
    /// and [PackageInfo::validate]. It is treated as read-only except for
    /// `arch`, which is replaced with the format-native spelling.
    fn package(&self, info: &mut PackageInfo, writer: &mut dyn Write) -> Result<()>;
}

static PACKAGERS: Lazy<RwLock<BTreeMap<String, Arc<dyn Packager>>>> =
    Lazy::new(|| RwLock::new(BTreeMap::new()));

/// Install a packager for a format name. The last registration wins.
pub fn register(format: &str, packager: Arc<dyn Packager>) {
    PACKAGERS
        .write()
        .expect("packager registry lock poisoned")
        .insert(format.to_string(), packager);
}

/// Look up the packager registered for a format name.
pub fn get(format: &str) -> Result<Arc<dyn Packager>> {
    PACKAGERS
        .read()
        .expect("packager registry lock poisoned")
        .get(format)
        .cloned()
        .ok_or_else(|| PackagingError::UnknownFormat(format.to_string()))
}

/// The sorted format names currently registered.
pub fn registered_formats() -> Vec<String> {
    PACKAGERS
        .read()
        .expect("packager registry lock poisoned")
        .keys()
        .cloned()
        .collect()
}

/// Install the built-in packagers under their conventional names.
pub fn register_defaults() {
    register("apk", Arc::new(crate::apk::ApkPackager::new()));
    register("deb", Arc::new(crate::deb::DebPackager::new()));
    register("rpm", Arc::new(crate::rpm::RpmPackager::new()));
}
