// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Debian `.deb` packages.

A deb is an `ar` archive whose members are a `debian-binary` version
marker, a `control.tar.gz` with package metadata and maintainer scripts,
a `data.tar.gz` with the installed files, and optionally a PGP signature
member (`_gpgorigin` or `_gpgbuilder`).
*/

mod builder;
mod control;

pub use builder::DebPackager;
pub(crate) use control::ControlParagraph;

/// Translate a normalized architecture into Debian's spelling.
pub(crate) fn debian_arch(arch: &str) -> &str {
    match arch {
        "386" => "i386",
        "arm5" | "arm6" => "armel",
        "arm" | "arm7" => "armhf",
        "mipsle" => "mipsel",
        "ppc64le" => "ppc64el",
        other => other,
    }
}
