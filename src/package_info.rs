// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! The package description model.

[PackageInfo] is the normalized input every packager consumes. It is
typically deserialized from a YAML document (see [crate::config]), run
through [PackageInfo::with_defaults] and [PackageInfo::validate], then
narrowed to a target format with [PackageInfo::for_format] before being
handed to a [crate::registry::Packager].
*/

use {
    crate::error::{PackagingError, Result},
    serde::Deserialize,
    std::{collections::BTreeMap, path::PathBuf},
};

/// Fields whose effective value may be overridden per output format.
///
/// The `files`, `config_files` and `symlinks` maps are keyed by the source
/// on the builder host (a glob pattern, or the link target for symlinks);
/// the value is the absolute destination path inside the package.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Overridables {
    pub depends: Vec<String>,
    pub recommends: Vec<String>,
    pub suggests: Vec<String>,
    pub replaces: Vec<String>,
    pub provides: Vec<String>,
    pub conflicts: Vec<String>,
    pub files: BTreeMap<String, String>,
    pub config_files: BTreeMap<String, String>,
    pub symlinks: BTreeMap<String, String>,
    pub empty_folders: Vec<String>,
    pub scripts: Scripts,
}

/// Maintainer scripts, as paths on the builder host.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Scripts {
    pub pre_install: Option<PathBuf>,
    pub post_install: Option<PathBuf>,
    pub pre_remove: Option<PathBuf>,
    pub post_remove: Option<PathBuf>,
}

/// How a `.deb` should be signed.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DebSigType {
    /// Detached signature over the concatenated archive members, stored
    /// in a `_gpgorigin` member.
    #[default]
    Origin,
    /// dpkg-sig style cleartext-signed digest manifest, stored in a
    /// `_gpgbuilder` member.
    Builder,
}

/// PGP signature options for `.deb` output.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct DebSignature {
    pub key_file: Option<PathBuf>,
    pub key_passphrase: String,
    pub sig_type: DebSigType,
}

/// PGP signature options for `.rpm` output.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct RpmSignature {
    pub key_file: Option<PathBuf>,
    pub key_passphrase: String,
    /// Sign the main header only (signature tag 268). When false, the
    /// signature covers header and payload (signature tag 1002).
    pub header_only: bool,
}

impl Default for RpmSignature {
    fn default() -> Self {
        Self {
            key_file: None,
            key_passphrase: String::new(),
            header_only: true,
        }
    }
}

/// RSA signature options for `.apk` output.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct ApkSignature {
    pub key_file: Option<PathBuf>,
    /// Name of the public key as installed under `/etc/apk/keys/`. Becomes
    /// the `.SIGN.RSA.<key_name>` member of the signature stream.
    pub key_name: String,
    pub key_passphrase: String,
}

/// Debian-specific options.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct DebOptions {
    pub overrides: Overridables,
    /// Rendered as a `+metadata` suffix in the control file version.
    pub version_metadata: String,
    pub signature: DebSignature,
}

/// RPM-specific options.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct RpmOptions {
    pub overrides: Overridables,
    pub group: String,
    pub summary: String,
    pub signature: RpmSignature,
}

/// Alpine-specific options.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct ApkOptions {
    pub overrides: Overridables,
    pub signature: ApkSignature,
}

/// The normalized description of a package to build.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct PackageInfo {
    pub name: String,
    /// Architecture in the normalized (GOARCH-style) spelling. Packagers
    /// replace this with the format-native spelling while writing.
    pub arch: String,
    pub platform: String,
    pub version: String,
    /// Packaging iteration. Never derived from `version`.
    pub release: String,
    /// Extracted from `version` by [PackageInfo::with_defaults] when not
    /// set explicitly.
    pub prerelease: String,
    /// Integer rendered as a string.
    pub epoch: String,
    pub section: String,
    pub priority: String,
    pub maintainer: String,
    pub vendor: String,
    pub homepage: String,
    pub license: String,
    pub description: String,
    #[serde(flatten)]
    pub overridables: Overridables,
    pub deb: DebOptions,
    pub rpm: RpmOptions,
    pub apk: ApkOptions,
}

/// Split a version into (core, prerelease, metadata) with a tolerant
/// semver grammar. Returns `None` when the core is not dotted digits.
fn parse_semverish(version: &str) -> Option<(String, String, String)> {
    let v = version.strip_prefix('v').unwrap_or(version);

    let (core, rest) = match v.split_once('-') {
        Some((core, rest)) => (core, rest),
        None => (v, ""),
    };

    let (prerelease, metadata) = match rest.split_once('+') {
        Some((prerelease, metadata)) => (prerelease, metadata),
        None => (rest, ""),
    };

    let components = core.split('.').collect::<Vec<_>>();
    if components.is_empty() || components.len() > 3 {
        return None;
    }
    if !components
        .iter()
        .all(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    Some((core.to_string(), prerelease.to_string(), metadata.to_string()))
}

impl PackageInfo {
    /// Fill in derivable fields.
    ///
    /// The platform defaults to `linux`. A semver-looking `version` is
    /// normalized: the leading `v` and any `-prerelease+metadata` suffix
    /// are stripped from it, with the prerelease moved to `prerelease`
    /// unless that was already set. Build metadata is dropped; writers
    /// that want it take it from their format options instead. Versions
    /// that do not look like semver pass through untouched.
    ///
    /// This is idempotent.
    pub fn with_defaults(mut self) -> Self {
        if self.platform.is_empty() {
            self.platform = "linux".to_string();
        }

        if let Some((core, prerelease, _metadata)) = parse_semverish(&self.version) {
            self.version = core;
            if self.prerelease.is_empty() {
                self.prerelease = prerelease;
            }
        }

        self
    }

    /// Reject descriptions that no packager can work with.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(PackagingError::Validation(
                "package name must be provided".to_string(),
            ));
        }
        if self.arch.is_empty() {
            return Err(PackagingError::Validation(
                "package arch must be provided".to_string(),
            ));
        }
        if self.version.is_empty() {
            return Err(PackagingError::Validation(
                "package version must be provided".to_string(),
            ));
        }

        Ok(())
    }

    /// Obtain the effective view of this description for one output format.
    ///
    /// The returned record is this record with `overridables` replaced by
    /// the merge of the base overridables and the format's override block.
    /// Formats without an override block (including unknown format names)
    /// get an exact copy of the base record.
    pub fn for_format(&self, format: &str) -> Result<PackageInfo> {
        let mut effective = self.clone();

        match format {
            "deb" => effective.overridables = self.overridables.merged_with(&self.deb.overrides),
            "rpm" => effective.overridables = self.overridables.merged_with(&self.rpm.overrides),
            "apk" => effective.overridables = self.overridables.merged_with(&self.apk.overrides),
            _ => {}
        }

        Ok(effective)
    }
}

fn replace_if_present(base: &[String], over: &[String]) -> Vec<String> {
    if over.is_empty() {
        base.to_vec()
    } else {
        over.to_vec()
    }
}

fn merge_maps(
    base: &BTreeMap<String, String>,
    over: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = base.clone();
    merged.extend(over.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

impl Overridables {
    /// Merge an override block onto this base.
    ///
    /// Sequences follow replace-if-present semantics. Maps merge per key
    /// with the override winning. Script slots inherit individually.
    fn merged_with(&self, over: &Overridables) -> Overridables {
        Overridables {
            depends: replace_if_present(&self.depends, &over.depends),
            recommends: replace_if_present(&self.recommends, &over.recommends),
            suggests: replace_if_present(&self.suggests, &over.suggests),
            replaces: replace_if_present(&self.replaces, &over.replaces),
            provides: replace_if_present(&self.provides, &over.provides),
            conflicts: replace_if_present(&self.conflicts, &over.conflicts),
            files: merge_maps(&self.files, &over.files),
            config_files: merge_maps(&self.config_files, &over.config_files),
            symlinks: merge_maps(&self.symlinks, &over.symlinks),
            empty_folders: replace_if_present(&self.empty_folders, &over.empty_folders),
            scripts: Scripts {
                pre_install: over
                    .scripts
                    .pre_install
                    .clone()
                    .or_else(|| self.scripts.pre_install.clone()),
                post_install: over
                    .scripts
                    .post_install
                    .clone()
                    .or_else(|| self.scripts.post_install.clone()),
                pre_remove: over
                    .scripts
                    .pre_remove
                    .clone()
                    .or_else(|| self.scripts.pre_remove.clone()),
                post_remove: over
                    .scripts
                    .post_remove
                    .clone()
                    .or_else(|| self.scripts.post_remove.clone()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_plain_version() {
        let info = PackageInfo {
            version: "v1.0.0".to_string(),
            ..Default::default()
        }
        .with_defaults();

        assert_eq!(info.platform, "linux");
        assert_eq!(info.version, "1.0.0");
        assert_eq!(info.release, "");
        assert_eq!(info.prerelease, "");
    }

    #[test]
    fn defaults_prerelease_extraction() {
        for (input, prerelease) in [("v1.0.0-rc1", "rc1"), ("v1.0.0-beta1", "beta1")] {
            let info = PackageInfo {
                version: input.to_string(),
                ..Default::default()
            }
            .with_defaults();

            assert_eq!(info.version, "1.0.0");
            assert_eq!(info.release, "");
            assert_eq!(info.prerelease, prerelease);
        }
    }

    #[test]
    fn defaults_preserve_preset_fields() {
        for input in ["v1.0.0-1", "v1.0.0-1+xdg2"] {
            let info = PackageInfo {
                version: input.to_string(),
                release: "2".to_string(),
                prerelease: "beta1".to_string(),
                ..Default::default()
            }
            .with_defaults();

            assert_eq!(info.version, "1.0.0");
            assert_eq!(info.release, "2");
            assert_eq!(info.prerelease, "beta1");
            assert_eq!(info.deb.version_metadata, "");
        }
    }

    #[test]
    fn defaults_leave_non_semver_untouched() {
        let info = PackageInfo {
            platform: "darwin".to_string(),
            version: "20191212.2".to_string(),
            ..Default::default()
        };

        let got = info.clone().with_defaults();
        assert_eq!(got.platform, "darwin");
        assert_eq!(got.version, "20191212.2");

        let odd = PackageInfo {
            version: "not-a-version".to_string(),
            ..Default::default()
        }
        .with_defaults();
        assert_eq!(odd.version, "not-a-version");
    }

    #[test]
    fn defaults_idempotent() {
        let once = PackageInfo {
            version: "v1.0.0-rc1".to_string(),
            ..Default::default()
        }
        .with_defaults();
        let twice = once.clone().with_defaults();

        assert_eq!(once, twice);
    }

    #[test]
    fn validation_errors_in_order() {
        let cases = [
            (PackageInfo::default(), "package name must be provided"),
            (
                PackageInfo {
                    name: "fo".to_string(),
                    ..Default::default()
                },
                "package arch must be provided",
            ),
            (
                PackageInfo {
                    name: "as".to_string(),
                    arch: "asd".to_string(),
                    ..Default::default()
                },
                "package version must be provided",
            ),
        ];

        for (info, message) in cases {
            assert_eq!(info.validate().unwrap_err().to_string(), message);
        }

        let ok = PackageInfo {
            name: "as".to_string(),
            arch: "asd".to_string(),
            version: "1.2.3".to_string(),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    fn overridden_info() -> PackageInfo {
        let mut info = PackageInfo {
            name: "foo".to_string(),
            arch: "amd64".to_string(),
            version: "1.0.0".to_string(),
            ..Default::default()
        };
        info.overridables
            .config_files
            .insert("whatever.conf".to_string(), "/etc/foo/whatever.conf".to_string());
        info.deb.overrides.depends = vec!["deb_depend".to_string()];
        info.deb
            .overrides
            .config_files
            .insert("deb.conf".to_string(), "/etc/foo/deb.conf".to_string());
        info.rpm.overrides.depends = vec!["rpm_depend".to_string()];
        info.rpm
            .overrides
            .config_files
            .insert("rpm.conf".to_string(), "/etc/foo/rpm.conf".to_string());
        info
    }

    #[test]
    fn format_overrides_replace_sequences_and_merge_maps() {
        let info = overridden_info();

        let deb = info.for_format("deb").unwrap();
        assert!(deb.overridables.depends.contains(&"deb_depend".to_string()));
        assert!(!deb.overridables.depends.contains(&"rpm_depend".to_string()));
        assert!(deb.overridables.config_files.contains_key("deb.conf"));
        assert!(!deb.overridables.config_files.contains_key("rpm.conf"));
        assert!(deb.overridables.config_files.contains_key("whatever.conf"));
        assert_eq!(deb.arch, "amd64");

        let rpm = info.for_format("rpm").unwrap();
        assert!(rpm.overridables.depends.contains(&"rpm_depend".to_string()));
        assert!(!rpm.overridables.depends.contains(&"deb_depend".to_string()));
        assert!(rpm.overridables.config_files.contains_key("rpm.conf"));
        assert!(!rpm.overridables.config_files.contains_key("deb.conf"));
        assert!(rpm.overridables.config_files.contains_key("whatever.conf"));
        assert_eq!(rpm.arch, "amd64");
    }

    #[test]
    fn format_overrides_unknown_format_is_base_view() {
        let info = overridden_info();
        let got = info.for_format("doesnotexist").unwrap();
        assert_eq!(got, info);
    }

    #[test]
    fn script_slots_inherit_individually() {
        let mut info = PackageInfo::default();
        info.overridables.scripts.pre_install = Some(PathBuf::from("scripts/pre.sh"));
        info.deb.overrides.scripts.post_install = Some(PathBuf::from("scripts/deb-post.sh"));

        let deb = info.for_format("deb").unwrap();
        assert_eq!(
            deb.overridables.scripts.pre_install,
            Some(PathBuf::from("scripts/pre.sh"))
        );
        assert_eq!(
            deb.overridables.scripts.post_install,
            Some(PathBuf::from("scripts/deb-post.sh"))
        );
    }
}
