// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Create .apk package files. */

use {
    crate::{
        error::{PackagingError, Result},
        io::gzip_compress_data,
        package_info::{PackageInfo, Scripts},
        registry::Packager,
        sign::rsa_sign_sha1_digest,
        staging::{installed_size, paths_to_create, stage, StagedEntry, StagedKind},
    },
    digest::Digest,
    sha1::Sha1,
    sha2::Sha256,
    std::{
        collections::BTreeSet,
        fmt::Write as _,
        io::Write,
        time::SystemTime,
    },
};

/// Translate a normalized architecture into Alpine's spelling.
///
/// Unknown values pass through so custom architectures keep working.
pub(crate) fn alpine_arch(arch: &str) -> &str {
    match arch {
        "386" => "x86",
        "amd64" => "x86_64",
        "arm" | "arm6" | "arm7" => "armhf",
        "arm64" => "aarch64",
        other => other,
    }
}

/// Builds `.apk` packages.
#[derive(Debug)]
pub struct ApkPackager {
    mtime: Option<SystemTime>,
}

impl ApkPackager {
    pub fn new() -> Self {
        Self { mtime: None }
    }

    /// Pin the build timestamp used for archive members and `builddate`.
    ///
    /// If not called, the current time is used.
    pub fn set_mtime(mut self, time: Option<SystemTime>) -> Self {
        self.mtime = time;
        self
    }

    fn mtime(&self) -> u64 {
        self.mtime
            .unwrap_or_else(SystemTime::now)
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("times before UNIX epoch not accepted")
            .as_secs()
    }
}

impl Default for ApkPackager {
    fn default() -> Self {
        Self::new()
    }
}

impl Packager for ApkPackager {
    fn conventional_file_name(&self, info: &PackageInfo) -> String {
        format!("{}_{}_{}.apk", info.name, pkgver(info), info.arch)
    }

    fn package(&self, info: &mut PackageInfo, writer: &mut dyn Write) -> Result<()> {
        info.arch = alpine_arch(&info.arch).to_string();

        let entries = stage(&info.overridables)?;
        let installed = installed_size(&entries);
        let mtime = self.mtime();

        log::debug!(
            "building apk {} with {} staged entries",
            info.name,
            entries.len()
        );

        // The data stream is built first so .PKGINFO can carry its size
        // and hash, then the control stream so the signature can cover it.
        let data_tar = build_data_tar(&entries, mtime)?;
        let data_gz = gzip_compress_data(&data_tar)?;
        let datahash = hex::encode(Sha256::digest(&data_gz));

        let pkginfo = render_pkginfo(info, installed, &datahash, mtime);
        let control_gz = build_control_stream(&pkginfo, &info.overridables.scripts, mtime)?;
        let control_sha1 = Sha1::digest(&control_gz).to_vec();

        if let Some(key_file) = info.apk.signature.key_file.clone() {
            if info.apk.signature.key_name.is_empty() {
                return Err(PackagingError::Format(
                    "apk signing requires a key name".to_string(),
                ));
            }

            let signature = rsa_sign_sha1_digest(
                &control_sha1,
                &key_file,
                &info.apk.signature.key_passphrase,
            )?;
            let member = format!(".SIGN.RSA.{}", info.apk.signature.key_name);
            let signature_tar = build_signature_tar(&member, &signature, mtime)?;
            writer.write_all(&gzip_compress_data(&signature_tar)?)?;
        }

        writer.write_all(&control_gz)?;
        writer.write_all(&data_gz)?;

        Ok(())
    }
}

/// The `pkgver` value: `version-release`, or just the version when no
/// release is set.
fn pkgver(info: &PackageInfo) -> String {
    if info.release.is_empty() {
        info.version.clone()
    } else {
        format!("{}-{}", info.version, info.release)
    }
}

/// Render the `.PKGINFO` member.
///
/// Field order is fixed; installed size and the hash of the compressed
/// data stream are computed by the caller.
fn render_pkginfo(info: &PackageInfo, installed_size: u64, datahash: &str, builddate: u64) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "# Generated by {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    let _ = writeln!(out, "pkgname = {}", info.name);
    let _ = writeln!(out, "pkgver = {}", pkgver(info));
    let _ = writeln!(out, "arch = {}", info.arch);
    let _ = writeln!(out, "size = {}", installed_size);
    let _ = writeln!(out, "pkgdesc = {}", info.description);
    let _ = writeln!(out, "url = {}", info.homepage);
    let _ = writeln!(out, "maintainer = {}", info.maintainer);
    let _ = writeln!(out, "origin = {}", info.name);
    let _ = writeln!(out, "builddate = {}", builddate);
    let _ = writeln!(out, "datahash = {}", datahash);
    for depend in &info.overridables.depends {
        let _ = writeln!(out, "depend = {}", depend);
    }

    out
}

fn new_tar_header(mtime: u64, mode: u32) -> Result<tar::Header> {
    let mut header = tar::Header::new_gnu();
    header.set_uid(0);
    header.set_gid(0);
    header.set_username("root")?;
    header.set_groupname("root")?;
    header.set_mtime(mtime);
    header.set_mode(mode);

    Ok(header)
}

fn append_directory(
    builder: &mut tar::Builder<Vec<u8>>,
    seen: &mut BTreeSet<String>,
    path: &str,
    mtime: u64,
) -> Result<()> {
    if !seen.insert(path.to_string()) {
        return Ok(());
    }

    let mut header = new_tar_header(mtime, 0o755)?;
    header.set_entry_type(tar::EntryType::Directory);
    header.set_size(0);
    builder.append_data(&mut header, format!("{}/", path), std::io::empty())?;

    Ok(())
}

fn append_ancestors(
    builder: &mut tar::Builder<Vec<u8>>,
    seen: &mut BTreeSet<String>,
    dest: &str,
    mtime: u64,
) -> Result<()> {
    for dir in paths_to_create(dest) {
        append_directory(builder, seen, &dir, mtime)?;
    }

    Ok(())
}

/// Write the data stream tar: all staged entries, ancestors synthesized,
/// terminated with the regular tar end-of-archive marker.
fn build_data_tar(entries: &[StagedEntry], mtime: u64) -> Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());
    let mut seen_dirs = BTreeSet::new();

    for entry in entries {
        append_ancestors(&mut builder, &mut seen_dirs, &entry.dest, mtime)?;
        let name = entry.dest.trim_start_matches('/').to_string();

        match &entry.kind {
            StagedKind::Regular | StagedKind::Config => {
                let source = entry.source.as_ref().ok_or_else(|| {
                    PackagingError::Format(format!("staged file {} has no source", entry.dest))
                })?;

                let mut header = new_tar_header(mtime, entry.mode)?;
                header.set_size(entry.size);
                builder.append_data(&mut header, name, std::fs::File::open(source)?)?;
            }
            StagedKind::Symlink(target) => {
                let mut header = new_tar_header(mtime, entry.mode)?;
                header.set_entry_type(tar::EntryType::Symlink);
                header.set_size(0);
                builder.append_link(&mut header, name, target)?;
            }
            StagedKind::Dir => {
                append_directory(&mut builder, &mut seen_dirs, &name, mtime)?;
            }
        }
    }

    Ok(builder.into_inner()?)
}

/// Finish a tar segment: drop the two zero blocks of the end-of-archive
/// marker so the next gzip stream continues the archive.
fn finish_segment(builder: tar::Builder<Vec<u8>>) -> Result<Vec<u8>> {
    let mut data = builder.into_inner()?;
    data.truncate(data.len().saturating_sub(1024));

    Ok(data)
}

fn build_control_tar(pkginfo: &str, scripts: &Scripts, mtime: u64) -> Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());

    let mut header = new_tar_header(mtime, 0o644)?;
    header.set_size(pkginfo.len() as u64);
    builder.append_data(&mut header, ".PKGINFO", pkginfo.as_bytes())?;

    for (member, source) in [
        (".pre-install", &scripts.pre_install),
        (".post-install", &scripts.post_install),
        (".pre-deinstall", &scripts.pre_remove),
        (".post-deinstall", &scripts.post_remove),
    ] {
        if let Some(source) = source {
            let data = std::fs::read(source)?;
            let mut header = new_tar_header(mtime, 0o755)?;
            header.set_size(data.len() as u64);
            builder.append_data(&mut header, member, data.as_slice())?;
        }
    }

    finish_segment(builder)
}

/// Build the compressed control stream.
fn build_control_stream(pkginfo: &str, scripts: &Scripts, mtime: u64) -> Result<Vec<u8>> {
    gzip_compress_data(&build_control_tar(pkginfo, scripts, mtime)?)
}

fn build_signature_tar(member: &str, signature: &[u8], mtime: u64) -> Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());

    let mut header = new_tar_header(mtime, 0o644)?;
    header.set_size(signature.len() as u64);
    builder.append_data(&mut header, member, signature)?;

    finish_segment(builder)
}
