// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Create .deb package files. */

use {
    crate::{
        deb::{debian_arch, ControlParagraph},
        error::{PackagingError, Result},
        io::gzip_compress_data,
        package_info::{DebSigType, PackageInfo},
        registry::Packager,
        sign::{pgp_clearsign, pgp_detached_sign},
        staging::{installed_size, paths_to_create, stage, StagedEntry, StagedKind},
    },
    digest::Digest,
    md5::Md5,
    sha1::Sha1,
    std::{collections::BTreeSet, io::Write, time::SystemTime},
};

/// Builds `.deb` packages.
#[derive(Debug)]
pub struct DebPackager {
    mtime: Option<SystemTime>,
}

impl DebPackager {
    pub fn new() -> Self {
        Self { mtime: None }
    }

    /// Pin the timestamp used on all archive members.
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

impl Default for DebPackager {
    fn default() -> Self {
        Self::new()
    }
}

impl Packager for DebPackager {
    fn conventional_file_name(&self, info: &PackageInfo) -> String {
        format!("{}_{}_{}.deb", info.name, deb_version(info), info.arch)
    }

    fn package(&self, info: &mut PackageInfo, writer: &mut dyn Write) -> Result<()> {
        info.arch = debian_arch(&info.arch).to_string();

        let entries = stage(&info.overridables)?;
        let mtime = self.mtime();

        log::debug!(
            "building deb {} with {} staged entries",
            info.name,
            entries.len()
        );

        let (data_tar, md5sums) = build_data_tar(&entries, mtime)?;
        let data_gz = gzip_compress_data(&data_tar)?;

        let control_text = render_control(info, &entries);
        let control_tar = build_control_tar(info, &control_text, &md5sums, &entries, mtime)?;
        let control_gz = gzip_compress_data(&control_tar)?;

        let mut ar_builder = ar::Builder::new(writer);

        let debian_binary: &[u8] = b"2.0\n";
        append_ar_member(&mut ar_builder, b"debian-binary", debian_binary, mtime)?;
        append_ar_member(&mut ar_builder, b"control.tar.gz", &control_gz, mtime)?;
        append_ar_member(&mut ar_builder, b"data.tar.gz", &data_gz, mtime)?;

        if let Some(key_file) = info.deb.signature.key_file.clone() {
            let passphrase = info.deb.signature.key_passphrase.clone();

            match info.deb.signature.sig_type {
                DebSigType::Origin => {
                    let mut message =
                        Vec::with_capacity(debian_binary.len() + control_gz.len() + data_gz.len());
                    message.extend_from_slice(debian_binary);
                    message.extend_from_slice(&control_gz);
                    message.extend_from_slice(&data_gz);

                    let signature = pgp_detached_sign(&message, &key_file, &passphrase)?;
                    append_ar_member(&mut ar_builder, b"_gpgorigin", &signature, mtime)?;
                }
                DebSigType::Builder => {
                    let manifest = signature_manifest(
                        &[
                            ("debian-binary", debian_binary),
                            ("control.tar.gz", &control_gz),
                            ("data.tar.gz", &data_gz),
                        ],
                        mtime,
                    );

                    let signed = pgp_clearsign(&manifest, &key_file, &passphrase)?;
                    append_ar_member(&mut ar_builder, b"_gpgbuilder", signed.as_bytes(), mtime)?;
                }
            }
        }

        Ok(())
    }
}

fn append_ar_member(
    builder: &mut ar::Builder<&mut dyn Write>,
    name: &[u8],
    data: &[u8],
    mtime: u64,
) -> Result<()> {
    let mut header = ar::Header::new(name.to_vec(), data.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(mtime);
    header.set_uid(0);
    header.set_gid(0);
    builder.append(&header, data)?;

    Ok(())
}

/// The version string for the control file and conventional file names:
/// `[epoch:]version[~prerelease][+metadata][-release]`.
fn deb_version(info: &PackageInfo) -> String {
    let mut version = String::new();

    if !info.epoch.is_empty() {
        version.push_str(&info.epoch);
        version.push(':');
    }
    version.push_str(&info.version);
    if !info.prerelease.is_empty() {
        version.push('~');
        version.push_str(&info.prerelease);
    }
    if !info.deb.version_metadata.is_empty() {
        version.push('+');
        version.push_str(&info.deb.version_metadata);
    }
    if !info.release.is_empty() {
        version.push('-');
        version.push_str(&info.release);
    }

    version
}

fn render_control(info: &PackageInfo, entries: &[StagedEntry]) -> String {
    let mut paragraph = ControlParagraph::new();

    paragraph.add_field("Package", &info.name);
    paragraph.add_field("Version", &deb_version(info));
    paragraph.add_field_if_set("Section", &info.section);
    paragraph.add_field_if_set("Priority", &info.priority);
    paragraph.add_field("Architecture", &info.arch);
    paragraph.add_field_if_set("Maintainer", &info.maintainer);
    paragraph.add_field_if_set("Vendor", &info.vendor);
    paragraph.add_field(
        "Installed-Size",
        &(installed_size(entries) / 1024).to_string(),
    );
    paragraph.add_relationship_field("Replaces", &info.overridables.replaces);
    paragraph.add_relationship_field("Provides", &info.overridables.provides);
    paragraph.add_relationship_field("Depends", &info.overridables.depends);
    paragraph.add_relationship_field("Recommends", &info.overridables.recommends);
    paragraph.add_relationship_field("Suggests", &info.overridables.suggests);
    paragraph.add_relationship_field("Conflicts", &info.overridables.conflicts);
    paragraph.add_field_if_set("Homepage", &info.homepage);
    paragraph.add_field_if_set("Description", &info.description);

    paragraph.to_string()
}

fn new_tar_header(mtime: u64, mode: u32) -> Result<tar::Header> {
    let mut header = tar::Header::new_gnu();
    header.set_username("root")?;
    header.set_groupname("root")?;
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(mtime);
    header.set_mode(mode);

    Ok(header)
}

/// Copy as much of `name` as fits into the raw header name field.
///
/// Returns whether the whole name fit.
fn fill_name_field(header: &mut tar::Header, name: &[u8]) -> bool {
    let field = &mut header.as_old_mut().name;
    let keep = name.len().min(field.len());
    field[..keep].copy_from_slice(&name[..keep]);

    keep == name.len()
}

/// Emit a GNU long-name record for a member name over the field limit.
///
/// Readers that see the record use the NUL-terminated name it carries and
/// ignore the truncated name field of the member that follows.
fn write_gnu_long_name(builder: &mut tar::Builder<Vec<u8>>, name: &[u8]) -> Result<()> {
    let mut record = name.to_vec();
    record.push(0);

    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::GNULongName);
    fill_name_field(&mut header, b"././@LongLink");
    header.set_mode(0o644);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(0);
    header.set_size(record.len() as u64);
    header.set_cksum();
    builder.append(&header, record.as_slice())?;

    Ok(())
}

/// Store a `./`-prefixed member name on a GNU tar header.
///
/// `set_path` normalizes a leading `./` away for everything except the
/// bare root, so the name field is filled directly. Names that do not fit
/// get a long-name record ahead of the member.
fn set_member_name(
    builder: &mut tar::Builder<Vec<u8>>,
    header: &mut tar::Header,
    name: &str,
) -> Result<()> {
    if !fill_name_field(header, name.as_bytes()) {
        write_gnu_long_name(builder, name.as_bytes())?;
    }

    Ok(())
}

fn append_root_entry(builder: &mut tar::Builder<Vec<u8>>, mtime: u64) -> Result<()> {
    let mut header = new_tar_header(mtime, 0o755)?;
    header.set_path("./")?;
    header.set_entry_type(tar::EntryType::Directory);
    header.set_size(0);
    header.set_cksum();
    builder.append(&header, &mut std::io::empty())?;

    Ok(())
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
    set_member_name(builder, &mut header, &format!("./{}/", path))?;
    header.set_entry_type(tar::EntryType::Directory);
    header.set_size(0);
    header.set_cksum();
    builder.append(&header, &mut std::io::empty())?;

    Ok(())
}

/// Write the data tar and collect the `md5sums` lines for the control tar.
fn build_data_tar(entries: &[StagedEntry], mtime: u64) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut builder = tar::Builder::new(Vec::new());
    let mut seen_dirs = BTreeSet::new();
    let mut md5sums = vec![];

    append_root_entry(&mut builder, mtime)?;

    for entry in entries {
        for dir in paths_to_create(&entry.dest) {
            append_directory(&mut builder, &mut seen_dirs, &dir, mtime)?;
        }

        let member = entry.dest.trim_start_matches('/');

        match &entry.kind {
            StagedKind::Regular | StagedKind::Config => {
                let source = entry.source.as_ref().ok_or_else(|| {
                    PackagingError::Format(format!("staged file {} has no source", entry.dest))
                })?;
                let data = std::fs::read(source)?;

                let mut line = hex::encode(Md5::digest(&data)).into_bytes();
                line.extend_from_slice(b"  ");
                line.extend_from_slice(member.as_bytes());
                line.push(b'\n');
                md5sums.extend_from_slice(&line);

                let mut header = new_tar_header(mtime, entry.mode)?;
                set_member_name(&mut builder, &mut header, &format!("./{}", member))?;
                header.set_size(data.len() as u64);
                header.set_cksum();
                builder.append(&header, &*data)?;
            }
            StagedKind::Symlink(target) => {
                let mut header = new_tar_header(mtime, 0o777)?;
                set_member_name(&mut builder, &mut header, &format!("./{}", member))?;
                header.set_entry_type(tar::EntryType::Symlink);
                header.set_link_name(target)?;
                header.set_size(0);
                header.set_cksum();
                builder.append(&header, &mut std::io::empty())?;
            }
            StagedKind::Dir => {
                append_directory(&mut builder, &mut seen_dirs, member, mtime)?;
            }
        }
    }

    Ok((builder.into_inner()?, md5sums))
}

fn append_control_member(
    builder: &mut tar::Builder<Vec<u8>>,
    name: &str,
    data: &[u8],
    mode: u32,
    mtime: u64,
) -> Result<()> {
    let mut header = new_tar_header(mtime, mode)?;
    set_member_name(builder, &mut header, &format!("./{}", name))?;
    header.set_size(data.len() as u64);
    header.set_cksum();
    builder.append(&header, data)?;

    Ok(())
}

fn build_control_tar(
    info: &PackageInfo,
    control_text: &str,
    md5sums: &[u8],
    entries: &[StagedEntry],
    mtime: u64,
) -> Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());

    append_root_entry(&mut builder, mtime)?;
    append_control_member(&mut builder, "control", control_text.as_bytes(), 0o644, mtime)?;

    let conffiles = entries
        .iter()
        .filter(|e| e.is_config())
        .map(|e| format!("{}\n", e.dest))
        .collect::<String>();
    if !conffiles.is_empty() {
        append_control_member(&mut builder, "conffiles", conffiles.as_bytes(), 0o644, mtime)?;
    }

    append_control_member(&mut builder, "md5sums", md5sums, 0o644, mtime)?;

    let scripts = &info.overridables.scripts;
    for (member, source) in [
        ("preinst", &scripts.pre_install),
        ("postinst", &scripts.post_install),
        ("prerm", &scripts.pre_remove),
        ("postrm", &scripts.post_remove),
    ] {
        if let Some(source) = source {
            let data = std::fs::read(source)?;
            append_control_member(&mut builder, member, &data, 0o755, mtime)?;
        }
    }

    Ok(builder.into_inner()?)
}

/// The digest manifest covered by a `_gpgbuilder` signature.
fn signature_manifest(members: &[(&str, &[u8])], mtime: u64) -> String {
    let date = chrono::DateTime::<chrono::Utc>::from_timestamp(mtime as i64, 0)
        .map(|d| d.to_rfc2822())
        .unwrap_or_default();

    let mut manifest = String::new();
    manifest.push_str("Version: 4\n");
    manifest.push_str("Signer: \n");
    manifest.push_str(&format!("Date: {}\n", date));
    manifest.push_str("Role: builder\n");
    manifest.push_str("Files: \n");
    for (name, data) in members {
        manifest.push_str(&format!(
            "\t{} {} {} {}\n",
            hex::encode(Md5::digest(data)),
            hex::encode(Sha1::digest(data)),
            data.len(),
            name
        ));
    }

    manifest
}
