// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Configuration loading.

Deserializes a [PackageInfo] from YAML, expands environment variable
references in the `version` and `release` fields, and picks up signing
passphrases from the environment. The result is defaulted and validated,
so a loaded description is ready to hand to a packager.

Passphrase environment variables, from least to most specific:

- `NFPM_PASSPHRASE` applies to every format.
- `NFPM_DEB_PASSPHRASE`, `NFPM_RPM_PASSPHRASE` and `NFPM_APK_PASSPHRASE`
  override it per format.

A passphrase set explicitly in the document wins over the environment.
*/

use {
    crate::{error::Result, package_info::PackageInfo},
    std::{io::Read, path::Path},
};

/// Load a package description from a YAML file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<PackageInfo> {
    parse(std::fs::File::open(path)?)
}

/// Load a package description from a YAML reader.
pub fn parse(reader: impl Read) -> Result<PackageInfo> {
    let mut info: PackageInfo = serde_yaml::from_reader(reader)?;

    info.version = expand_env(&info.version, |name| std::env::var(name).ok());
    info.release = expand_env(&info.release, |name| std::env::var(name).ok());
    apply_passphrase_env(&mut info, |name| std::env::var(name).ok());

    let info = info.with_defaults();
    info.validate()?;

    Ok(info)
}

/// Expand `$NAME` and `${NAME}` references in a string.
///
/// Unset variables expand to the empty string, matching what release
/// pipelines expect from shell-style substitution.
fn expand_env(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        match chars.peek() {
            Some((_, '{')) => {
                chars.next();
                let mut name = String::new();
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    name.push(c);
                }
                result.push_str(&lookup(&name).unwrap_or_default());
            }
            Some((_, c)) if c.is_ascii_alphabetic() || *c == '_' => {
                let mut name = String::new();
                while let Some((_, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || *c == '_' {
                        name.push(*c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                result.push_str(&lookup(&name).unwrap_or_default());
            }
            _ => result.push('$'),
        }
    }

    result
}

fn apply_passphrase_env(info: &mut PackageInfo, lookup: impl Fn(&str) -> Option<String>) {
    let global = lookup("NFPM_PASSPHRASE");

    let slots = [
        ("NFPM_DEB_PASSPHRASE", &mut info.deb.signature.key_passphrase),
        ("NFPM_RPM_PASSPHRASE", &mut info.rpm.signature.key_passphrase),
        ("NFPM_APK_PASSPHRASE", &mut info.apk.signature.key_passphrase),
    ];

    for (name, slot) in slots {
        if !slot.is_empty() {
            continue;
        }
        if let Some(passphrase) = lookup(name).or_else(|| global.clone()) {
            *slot = passphrase;
        }
    }
}
