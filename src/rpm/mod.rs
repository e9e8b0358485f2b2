// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! RPM `.rpm` packages.

An rpm stream is four sections back to back: a 96-byte lead kept for
`file(1)`-era compatibility, a signature header, the main header with all
package metadata and the per-file arrays, and a gzip-compressed cpio
payload in the *New ASCII* (`070701`) format. Both headers share the same
index+store record layout, implemented in [header].
*/

mod builder;
pub(crate) mod header;
pub(crate) mod payload;

pub use builder::RpmPackager;

/// Translate a normalized architecture into RPM's spelling.
pub(crate) fn rpm_arch(arch: &str) -> &str {
    match arch {
        "386" => "i386",
        "amd64" => "x86_64",
        "arm5" => "armv5tel",
        "arm6" => "armv6hl",
        "arm" | "arm7" => "armv7hl",
        "arm64" => "aarch64",
        "mipsle" => "mipsel",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arch_translation_table() {
        let cases = [
            ("amd64", "x86_64"),
            ("386", "i386"),
            ("arm", "armv7hl"),
            ("arm5", "armv5tel"),
            ("arm6", "armv6hl"),
            ("arm7", "armv7hl"),
            ("arm64", "aarch64"),
            ("mipsle", "mipsel"),
            ("ppc64le", "ppc64le"),
            ("riscv64", "riscv64"),
            ("", ""),
        ];

        for (input, expected) in cases {
            assert_eq!(rpm_arch(input), expected, "arch {}", input);
        }
    }
}
