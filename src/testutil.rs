// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Shared test fixtures. */

use {
    crate::package_info::{PackageInfo, Scripts},
    std::path::Path,
};

/// A fully populated package description whose sources live under `dir`.
///
/// The files are created with fixed content so sizes and checksums are
/// stable across runs.
pub(crate) fn example_info(dir: &Path) -> PackageInfo {
    std::fs::write(dir.join("fake"), b"#!/bin/sh\necho fake\n").unwrap();
    std::fs::write(dir.join("whatever.conf"), b"whatever = true\n").unwrap();

    let mut info = PackageInfo {
        name: "foo".to_string(),
        arch: "amd64".to_string(),
        version: "1.0.0".to_string(),
        description: "Foo does things".to_string(),
        priority: "extra".to_string(),
        maintainer: "Example Maintainer <maintainer@example.com>".to_string(),
        section: "default".to_string(),
        homepage: "http://example.com".to_string(),
        vendor: "nope".to_string(),
        license: "MIT".to_string(),
        ..Default::default()
    }
    .with_defaults();

    info.overridables.depends = vec!["bash".to_string(), "foo".to_string()];
    info.overridables.recommends = vec!["git".to_string(), "bar".to_string()];
    info.overridables.suggests = vec!["bash".to_string(), "lala".to_string()];
    info.overridables.replaces = vec!["svn".to_string(), "subversion".to_string()];
    info.overridables.provides = vec!["bzr".to_string(), "zzz".to_string()];
    info.overridables.conflicts = vec!["zsh".to_string(), "foobarsh".to_string()];
    info.overridables.files.insert(
        dir.join("fake").display().to_string(),
        "/usr/local/bin/fake".to_string(),
    );
    info.overridables.files.insert(
        dir.join("whatever.conf").display().to_string(),
        "/usr/share/doc/fake/fake.txt".to_string(),
    );
    info.overridables.config_files.insert(
        dir.join("whatever.conf").display().to_string(),
        "/etc/fake/fake.conf".to_string(),
    );
    info.overridables.empty_folders = vec![
        "/var/log/whatever".to_string(),
        "/usr/share/whatever".to_string(),
    ];

    info
}

/// Write the four maintainer scripts into `dir` and return a [Scripts]
/// pointing at them.
pub(crate) fn example_scripts(dir: &Path) -> Scripts {
    let scripts_dir = dir.join("scripts");
    std::fs::create_dir_all(&scripts_dir).unwrap();

    let mut scripts = Scripts::default();
    for (name, slot) in [
        ("preinstall.sh", &mut scripts.pre_install),
        ("postinstall.sh", &mut scripts.post_install),
        ("preremove.sh", &mut scripts.pre_remove),
        ("postremove.sh", &mut scripts.post_remove),
    ] {
        let path = scripts_dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\necho {}\n", name)).unwrap();
        *slot = Some(path);
    }

    scripts
}
