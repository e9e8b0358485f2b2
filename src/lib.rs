// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Build Linux distribution packages from one declarative description.

This crate turns a single [package_info::PackageInfo] record into
installable Debian (`.deb`), RPM (`.rpm`), and Alpine (`.apk`) packages,
so release automation can target several distros without maintaining
per-format tooling.

# Goals

## One input, several formats

Everything a package needs (identity, relationships, files, maintainer
scripts, signing material) lives in one record. Per-format differences
are expressed as override blocks merged onto the base description, never
as separate descriptions.

## Determinism

Given the same input and a pinned build time, producers aim to emit
byte-for-byte identical artifacts. Archive entries are sorted by
destination, compression headers are pinned, and clocks are injectable.

# A Tour of Functionality

A description is usually loaded from YAML with [config::parse_file],
which also applies environment expansion and defaulting. Build an
artifact by fetching a packager from the [registry] (after
[registry::register_defaults]) or by using a producer directly:

```no_run
use linux_packaging::{config, deb::DebPackager, registry::Packager};

let info = config::parse_file("package.yaml")?;
let mut deb = info.for_format("deb")?;

let mut out = std::fs::File::create(
    DebPackager::new().conventional_file_name(&deb),
)?;
DebPackager::new().package(&mut deb, &mut out)?;
# Ok::<(), Box<dyn std::error::Error>>(())
```

Format internals live in [apk], [deb] and [rpm]. File staging (glob
expansion, ancestor synthesis, deterministic ordering) is shared across
producers in [staging], and all signing goes through the [sign] facade.
*/

pub mod apk;
pub mod config;
pub mod deb;
pub mod error;
pub mod io;
pub mod package_info;
pub mod registry;
pub mod rpm;
pub mod sign;
pub mod staging;

#[cfg(test)]
pub(crate) mod testutil;

pub use crate::{
    error::{PackagingError, Result},
    package_info::{Overridables, PackageInfo, Scripts},
    registry::{get, register, register_defaults, Packager},
};
