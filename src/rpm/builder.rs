// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Create .rpm package files. */

use {
    crate::{
        error::{PackagingError, Result},
        io::gzip_compress_data,
        package_info::PackageInfo,
        registry::Packager,
        rpm::{
            header::{self, HeaderBuilder, HeaderValue},
            payload::NewcWriter,
            rpm_arch,
        },
        sign::pgp_detached_sign,
        staging::{installed_size, stage, StagedKind},
    },
    digest::Digest,
    md5::Md5,
    sha1::Sha1,
    std::{io::Write, time::SystemTime},
};

/// Builds `.rpm` packages.
#[derive(Debug)]
pub struct RpmPackager {
    mtime: Option<SystemTime>,
}

impl RpmPackager {
    pub fn new() -> Self {
        Self { mtime: None }
    }

    /// Pin the build timestamp used for `BUILDTIME` and payload members.
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

impl Default for RpmPackager {
    fn default() -> Self {
        Self::new()
    }
}

/// The VERSION tag value. RPM separates version and release with `-`, so
/// a prerelease is attached with the tilde ordering operator instead.
fn rpm_version(info: &PackageInfo) -> String {
    if info.prerelease.is_empty() {
        info.version.clone()
    } else {
        format!("{}~{}", info.version, info.prerelease)
    }
}

fn rpm_release(info: &PackageInfo) -> String {
    if info.release.is_empty() {
        "1".to_string()
    } else {
        info.release.clone()
    }
}

/// The canonical arch number for the lead. Legacy-only; rpm itself reads
/// the ARCH tag.
fn lead_arch_num(arch: &str) -> u16 {
    match arch {
        "i386" | "x86_64" => 1,
        "mips" | "mipsel" => 11,
        "s390" | "s390x" => 15,
        "ppc64" | "ppc64le" => 16,
        "aarch64" => 19,
        a if a.starts_with("armv") => 12,
        _ => 0,
    }
}

fn write_lead(writer: &mut dyn Write, full_name: &str, arch: &str) -> Result<()> {
    let mut lead = [0u8; 96];
    lead[0..4].copy_from_slice(&[0xed, 0xab, 0xee, 0xdb]);
    lead[4] = 3; // version 3.0
    lead[5] = 0;
    // Bytes 6..8 are the package type: 0 = binary.
    lead[8..10].copy_from_slice(&lead_arch_num(arch).to_be_bytes());

    let name_bytes = full_name.as_bytes();
    let len = name_bytes.len().min(65);
    lead[10..10 + len].copy_from_slice(&name_bytes[..len]);

    lead[76..78].copy_from_slice(&1u16.to_be_bytes()); // os: linux
    lead[78..80].copy_from_slice(&5u16.to_be_bytes()); // header-style signature

    writer.write_all(&lead)?;

    Ok(())
}

/// Per-file metadata collected while writing the payload, in payload order.
#[derive(Default)]
struct FileArrays {
    dirnames: Vec<String>,
    dirindexes: Vec<i32>,
    basenames: Vec<String>,
    sizes: Vec<i32>,
    modes: Vec<u16>,
    rdevs: Vec<u16>,
    mtimes: Vec<i32>,
    digests: Vec<String>,
    linktos: Vec<String>,
    flags: Vec<i32>,
    users: Vec<String>,
    groups: Vec<String>,
    devices: Vec<i32>,
    inodes: Vec<i32>,
    langs: Vec<String>,
}

impl FileArrays {
    fn push(
        &mut self,
        dest: &str,
        size: i32,
        mode: u16,
        mtime: i32,
        digest: String,
        linkto: String,
        flags: i32,
        inode: i32,
    ) {
        let (dirname, basename) = match dest.rsplit_once('/') {
            Some((dir, base)) => (format!("{}/", dir), base.to_string()),
            None => ("/".to_string(), dest.to_string()),
        };

        let dirindex = match self.dirnames.iter().position(|d| *d == dirname) {
            Some(i) => i as i32,
            None => {
                self.dirnames.push(dirname);
                self.dirnames.len() as i32 - 1
            }
        };

        self.dirindexes.push(dirindex);
        self.basenames.push(basename);
        self.sizes.push(size);
        self.modes.push(mode);
        self.rdevs.push(0);
        self.mtimes.push(mtime);
        self.digests.push(digest);
        self.linktos.push(linkto);
        self.flags.push(flags);
        self.users.push("root".to_string());
        self.groups.push("root".to_string());
        self.devices.push(1);
        self.inodes.push(inode);
        self.langs.push(String::new());
    }

    fn is_empty(&self) -> bool {
        self.basenames.is_empty()
    }

    fn add_to_header(self, builder: &mut HeaderBuilder) {
        builder.add(header::TAG_FILESIZES, HeaderValue::Int32(self.sizes));
        builder.add(header::TAG_FILEMODES, HeaderValue::Int16(self.modes));
        builder.add(header::TAG_FILERDEVS, HeaderValue::Int16(self.rdevs));
        builder.add(header::TAG_FILEMTIMES, HeaderValue::Int32(self.mtimes));
        builder.add(header::TAG_FILEDIGESTS, HeaderValue::StringArray(self.digests));
        builder.add(header::TAG_FILELINKTOS, HeaderValue::StringArray(self.linktos));
        builder.add(header::TAG_FILEFLAGS, HeaderValue::Int32(self.flags));
        builder.add(header::TAG_FILEUSERNAME, HeaderValue::StringArray(self.users));
        builder.add(header::TAG_FILEGROUPNAME, HeaderValue::StringArray(self.groups));
        builder.add(header::TAG_FILEDEVICES, HeaderValue::Int32(self.devices));
        builder.add(header::TAG_FILEINODES, HeaderValue::Int32(self.inodes));
        builder.add(header::TAG_FILELANGS, HeaderValue::StringArray(self.langs));
        builder.add(header::TAG_DIRINDEXES, HeaderValue::Int32(self.dirindexes));
        builder.add(header::TAG_BASENAMES, HeaderValue::StringArray(self.basenames));
        builder.add(header::TAG_DIRNAMES, HeaderValue::StringArray(self.dirnames));
    }
}

fn add_dependency_arrays(
    builder: &mut HeaderBuilder,
    names: &[String],
    name_tag: u32,
    version_tag: u32,
    flags_tag: u32,
) {
    if names.is_empty() {
        return;
    }

    builder.add(name_tag, HeaderValue::StringArray(names.to_vec()));
    builder.add(
        version_tag,
        HeaderValue::StringArray(vec![String::new(); names.len()]),
    );
    builder.add(flags_tag, HeaderValue::Int32(vec![0; names.len()]));
}

impl Packager for RpmPackager {
    fn conventional_file_name(&self, info: &PackageInfo) -> String {
        format!(
            "{}-{}-{}.{}.rpm",
            info.name,
            rpm_version(info),
            rpm_release(info),
            info.arch
        )
    }

    fn package(&self, info: &mut PackageInfo, writer: &mut dyn Write) -> Result<()> {
        info.arch = rpm_arch(&info.arch).to_string();

        let entries = stage(&info.overridables)?;
        let installed = installed_size(&entries);
        let mtime = self.mtime();
        let release = rpm_release(info);

        log::debug!(
            "building rpm {} with {} staged entries",
            info.name,
            entries.len()
        );

        // Payload first: the main header carries per-file arrays that must
        // describe the cpio members in order.
        let mut cpio = NewcWriter::new(Vec::new());
        let mut files = FileArrays::default();

        for entry in &entries {
            let member = format!("./{}", entry.dest.trim_start_matches('/'));

            match &entry.kind {
                StagedKind::Regular | StagedKind::Config => {
                    let source = entry.source.as_ref().ok_or_else(|| {
                        PackagingError::Format(format!("staged file {} has no source", entry.dest))
                    })?;
                    let data = std::fs::read(source)?;

                    cpio.append_file(&member, entry.mode, mtime as u32, &data)?;
                    files.push(
                        &entry.dest,
                        data.len() as i32,
                        (0o100000 | entry.mode) as u16,
                        mtime as i32,
                        hex::encode(Md5::digest(&data)),
                        String::new(),
                        if entry.is_config() { header::FILEFLAG_CONFIG } else { 0 },
                        cpio.last_inode() as i32,
                    );
                }
                StagedKind::Symlink(target) => {
                    cpio.append_symlink(&member, mtime as u32, target)?;
                    files.push(
                        &entry.dest,
                        0,
                        0o120777u32 as u16,
                        mtime as i32,
                        String::new(),
                        target.clone(),
                        0,
                        cpio.last_inode() as i32,
                    );
                }
                StagedKind::Dir => {
                    cpio.append_dir(&member, entry.mode, mtime as u32)?;
                    files.push(
                        &entry.dest,
                        0,
                        (0o040000 | entry.mode) as u16,
                        mtime as i32,
                        String::new(),
                        String::new(),
                        0,
                        cpio.last_inode() as i32,
                    );
                }
            }
        }

        let payload = cpio.finish()?;
        let payload_gz = gzip_compress_data(&payload)?;

        let header_bytes = build_main_header(info, &release, files, installed, mtime)?;

        let mut signature = HeaderBuilder::new();
        signature.add(
            header::SIGTAG_SIZE,
            HeaderValue::Int32(vec![(header_bytes.len() + payload_gz.len()) as i32]),
        );
        signature.add(
            header::SIGTAG_PAYLOADSIZE,
            HeaderValue::Int32(vec![payload.len() as i32]),
        );
        signature.add(
            header::SIGTAG_SHA1,
            HeaderValue::String(hex::encode(Sha1::digest(&header_bytes))),
        );
        let mut md5 = Md5::new();
        md5.update(&header_bytes);
        md5.update(&payload_gz);
        signature.add(
            header::SIGTAG_MD5,
            HeaderValue::Bin(md5.finalize().to_vec()),
        );

        if let Some(key_file) = info.rpm.signature.key_file.clone() {
            let passphrase = info.rpm.signature.key_passphrase.clone();

            if info.rpm.signature.header_only {
                let sig = pgp_detached_sign(&header_bytes, &key_file, &passphrase)?;
                signature.add(header::SIGTAG_RSA, HeaderValue::Bin(sig));
            } else {
                let mut message =
                    Vec::with_capacity(header_bytes.len() + payload_gz.len());
                message.extend_from_slice(&header_bytes);
                message.extend_from_slice(&payload_gz);
                let sig = pgp_detached_sign(&message, &key_file, &passphrase)?;
                signature.add(header::SIGTAG_PGP, HeaderValue::Bin(sig));
            }
        }

        let signature_bytes = signature.build(header::TAG_HEADER_SIGNATURES);

        write_lead(
            writer,
            &format!("{}-{}-{}", info.name, rpm_version(info), release),
            &info.arch,
        )?;
        writer.write_all(&signature_bytes)?;
        // The main header starts on an 8-byte boundary.
        writer.write_all(&vec![0u8; (8 - signature_bytes.len() % 8) % 8])?;
        writer.write_all(&header_bytes)?;
        writer.write_all(&payload_gz)?;

        Ok(())
    }
}

fn build_main_header(
    info: &PackageInfo,
    release: &str,
    files: FileArrays,
    installed_size: u64,
    mtime: u64,
) -> Result<Vec<u8>> {
    let mut builder = HeaderBuilder::new();

    builder.add(header::TAG_NAME, HeaderValue::String(info.name.clone()));
    builder.add(header::TAG_VERSION, HeaderValue::String(rpm_version(info)));
    builder.add(header::TAG_RELEASE, HeaderValue::String(release.to_string()));

    if !info.epoch.is_empty() {
        let epoch = info.epoch.parse::<i32>().map_err(|_| {
            PackagingError::Format(format!("invalid epoch {}: must be an integer", info.epoch))
        })?;
        builder.add(header::TAG_EPOCH, HeaderValue::Int32(vec![epoch]));
    }

    let summary = if info.rpm.summary.is_empty() {
        info.description.lines().next().unwrap_or_default().to_string()
    } else {
        info.rpm.summary.clone()
    };
    builder.add(header::TAG_SUMMARY, HeaderValue::I18nString(summary));
    builder.add(
        header::TAG_DESCRIPTION,
        HeaderValue::I18nString(info.description.clone()),
    );

    let group = if info.rpm.group.is_empty() {
        "Unspecified".to_string()
    } else {
        info.rpm.group.clone()
    };
    builder.add(header::TAG_GROUP, HeaderValue::I18nString(group));

    builder.add(
        header::TAG_BUILDTIME,
        HeaderValue::Int32(vec![mtime as i32]),
    );
    builder.add(
        header::TAG_SIZE,
        HeaderValue::Int32(vec![installed_size as i32]),
    );

    if !info.vendor.is_empty() {
        builder.add(header::TAG_VENDOR, HeaderValue::String(info.vendor.clone()));
    }
    if !info.license.is_empty() {
        builder.add(header::TAG_LICENSE, HeaderValue::String(info.license.clone()));
    }
    if !info.maintainer.is_empty() {
        builder.add(
            header::TAG_PACKAGER,
            HeaderValue::String(info.maintainer.clone()),
        );
    }
    if !info.homepage.is_empty() {
        builder.add(header::TAG_URL, HeaderValue::String(info.homepage.clone()));
    }

    builder.add(header::TAG_OS, HeaderValue::String(info.platform.clone()));
    builder.add(header::TAG_ARCH, HeaderValue::String(info.arch.clone()));

    builder.add(
        header::TAG_PAYLOADFORMAT,
        HeaderValue::String("cpio".to_string()),
    );
    builder.add(
        header::TAG_PAYLOADCOMPRESSOR,
        HeaderValue::String("gzip".to_string()),
    );
    builder.add(
        header::TAG_PAYLOADFLAGS,
        HeaderValue::String("9".to_string()),
    );

    // The package always provides itself at its exact version.
    let evr = if info.epoch.is_empty() {
        format!("{}-{}", rpm_version(info), release)
    } else {
        format!("{}:{}-{}", info.epoch, rpm_version(info), release)
    };
    let mut provide_names = vec![info.name.clone()];
    let mut provide_versions = vec![evr];
    let mut provide_flags = vec![header::DEPFLAG_EQUAL];
    for name in &info.overridables.provides {
        provide_names.push(name.clone());
        provide_versions.push(String::new());
        provide_flags.push(0);
    }
    builder.add(
        header::TAG_PROVIDENAME,
        HeaderValue::StringArray(provide_names),
    );
    builder.add(
        header::TAG_PROVIDEVERSION,
        HeaderValue::StringArray(provide_versions),
    );
    builder.add(header::TAG_PROVIDEFLAGS, HeaderValue::Int32(provide_flags));

    add_dependency_arrays(
        &mut builder,
        &info.overridables.depends,
        header::TAG_REQUIRENAME,
        header::TAG_REQUIREVERSION,
        header::TAG_REQUIREFLAGS,
    );
    add_dependency_arrays(
        &mut builder,
        &info.overridables.conflicts,
        header::TAG_CONFLICTNAME,
        header::TAG_CONFLICTVERSION,
        header::TAG_CONFLICTFLAGS,
    );
    add_dependency_arrays(
        &mut builder,
        &info.overridables.replaces,
        header::TAG_OBSOLETENAME,
        header::TAG_OBSOLETEVERSION,
        header::TAG_OBSOLETEFLAGS,
    );
    add_dependency_arrays(
        &mut builder,
        &info.overridables.recommends,
        header::TAG_RECOMMENDNAME,
        header::TAG_RECOMMENDVERSION,
        header::TAG_RECOMMENDFLAGS,
    );
    add_dependency_arrays(
        &mut builder,
        &info.overridables.suggests,
        header::TAG_SUGGESTNAME,
        header::TAG_SUGGESTVERSION,
        header::TAG_SUGGESTFLAGS,
    );

    let scripts = &info.overridables.scripts;
    for (source, tag, prog_tag) in [
        (&scripts.pre_install, header::TAG_PREIN, header::TAG_PREINPROG),
        (&scripts.post_install, header::TAG_POSTIN, header::TAG_POSTINPROG),
        (&scripts.pre_remove, header::TAG_PREUN, header::TAG_PREUNPROG),
        (&scripts.post_remove, header::TAG_POSTUN, header::TAG_POSTUNPROG),
    ] {
        if let Some(source) = source {
            let content = std::fs::read_to_string(source)?;
            builder.add(tag, HeaderValue::String(content));
            builder.add(prog_tag, HeaderValue::String("/bin/sh".to_string()));
        }
    }

    if !files.is_empty() {
        files.add_to_header(&mut builder);
    }

    Ok(builder.build(header::TAG_HEADER_IMMUTABLE))
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            rpm::header::parse,
            sign, testutil,
        },
        pgp::packet::Packet,
        std::io::{Cursor, Read},
    };

    fn pinned_packager() -> RpmPackager {
        RpmPackager::new()
            .set_mtime(Some(SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(12345)))
    }

    struct ParsedRpm {
        signature: parse::ParsedHeader,
        header_bytes: Vec<u8>,
        payload_gz: Vec<u8>,
    }

    fn parse_rpm(data: &[u8]) -> ParsedRpm {
        assert_eq!(&data[0..4], &[0xed, 0xab, 0xee, 0xdb]);
        assert_eq!(data[4], 3);
        assert_eq!(&data[76..78], &1u16.to_be_bytes());
        assert_eq!(&data[78..80], &5u16.to_be_bytes());

        let signature = parse::parse_header(&data[96..]);
        let mut header_start = 96 + signature.len;
        header_start += (8 - header_start % 8) % 8;

        let header = parse::parse_header(&data[header_start..]);
        let header_end = header_start + header.len;

        ParsedRpm {
            signature,
            header_bytes: data[header_start..header_end].to_vec(),
            payload_gz: data[header_end..].to_vec(),
        }
    }

    #[test]
    fn stream_sections_parse_back() {
        let temp = tempfile::tempdir().unwrap();
        let mut info = testutil::example_info(temp.path());

        let mut rpm = vec![];
        pinned_packager().package(&mut info, &mut rpm).unwrap();

        let parsed = parse_rpm(&rpm);

        let header = parse::parse_header(&parsed.header_bytes);
        assert_eq!(parse::string(&header, header::TAG_NAME), "foo");
        assert_eq!(parse::string(&header, header::TAG_VERSION), "1.0.0");
        assert_eq!(parse::string(&header, header::TAG_RELEASE), "1");
        assert_eq!(parse::string(&header, header::TAG_OS), "linux");
        assert_eq!(parse::string(&header, header::TAG_ARCH), "x86_64");
        assert_eq!(parse::string(&header, header::TAG_PAYLOADFORMAT), "cpio");
        assert_eq!(parse::string(&header, header::TAG_PAYLOADCOMPRESSOR), "gzip");

        // Signature header digests cover the header and payload actually written.
        assert_eq!(
            parse::string(&parsed.signature, header::SIGTAG_SHA1),
            hex::encode(Sha1::digest(&parsed.header_bytes))
        );
        let mut md5 = Md5::new();
        md5.update(&parsed.header_bytes);
        md5.update(&parsed.payload_gz);
        assert_eq!(
            parse::bin(&parsed.signature, header::SIGTAG_MD5),
            md5.finalize().to_vec()
        );
        assert_eq!(
            parse::int32_array(&parsed.signature, header::SIGTAG_SIZE),
            vec![(parsed.header_bytes.len() + parsed.payload_gz.len()) as i32]
        );
    }

    #[test]
    fn file_arrays_describe_the_payload_in_order() {
        let temp = tempfile::tempdir().unwrap();
        let mut info = testutil::example_info(temp.path());

        let mut rpm = vec![];
        pinned_packager().package(&mut info, &mut rpm).unwrap();

        let parsed = parse_rpm(&rpm);
        let header = parse::parse_header(&parsed.header_bytes);

        let basenames = parse::string_array(&header, header::TAG_BASENAMES);
        assert_eq!(
            basenames,
            vec!["fake.conf", "fake", "fake.txt", "whatever", "whatever"]
        );

        let dirnames = parse::string_array(&header, header::TAG_DIRNAMES);
        let dirindexes = parse::int32_array(&header, header::TAG_DIRINDEXES);
        let full_paths = dirindexes
            .iter()
            .zip(&basenames)
            .map(|(i, base)| format!("{}{}", dirnames[*i as usize], base))
            .collect::<Vec<_>>();
        assert_eq!(
            full_paths,
            vec![
                "/etc/fake/fake.conf",
                "/usr/local/bin/fake",
                "/usr/share/doc/fake/fake.txt",
                "/usr/share/whatever",
                "/var/log/whatever",
            ]
        );

        // Config bit set exactly on the config file.
        let flags = parse::int32_array(&header, header::TAG_FILEFLAGS);
        assert_eq!(flags, vec![header::FILEFLAG_CONFIG, 0, 0, 0, 0]);

        // The payload holds the same members, ./-prefixed, plus a trailer.
        let mut decoder =
            libflate::gzip::Decoder::new(Cursor::new(&parsed.payload_gz)).unwrap();
        let mut payload = vec![];
        decoder.read_to_end(&mut payload).unwrap();
        let text = String::from_utf8_lossy(&payload);
        for path in ["./etc/fake/fake.conf", "./usr/local/bin/fake", "TRAILER!!!"] {
            assert!(text.contains(path), "{} missing from payload", path);
        }
    }

    #[test]
    fn self_provide_carries_the_exact_version() {
        let temp = tempfile::tempdir().unwrap();
        let mut info = testutil::example_info(temp.path());
        info.release = "3".to_string();

        let mut rpm = vec![];
        pinned_packager().package(&mut info, &mut rpm).unwrap();

        let parsed = parse_rpm(&rpm);
        let header = parse::parse_header(&parsed.header_bytes);

        let provides = parse::string_array(&header, header::TAG_PROVIDENAME);
        let versions = parse::string_array(&header, header::TAG_PROVIDEVERSION);
        assert_eq!(provides[0], "foo");
        assert_eq!(versions[0], "1.0.0-3");
        assert!(provides.contains(&"bzr".to_string()));

        let requires = parse::string_array(&header, header::TAG_REQUIRENAME);
        assert_eq!(requires, vec!["bash", "foo"]);
    }

    #[test]
    fn header_only_signature_verifies_over_the_header() {
        let temp = tempfile::tempdir().unwrap();
        let (key_path, public_key) = sign::testkeys::write_pgp_secret_key(temp.path(), "hunter2");

        let mut info = testutil::example_info(temp.path());
        info.rpm.signature.key_file = Some(key_path);
        info.rpm.signature.key_passphrase = "hunter2".to_string();

        let mut rpm = vec![];
        pinned_packager().package(&mut info, &mut rpm).unwrap();

        let parsed = parse_rpm(&rpm);
        let signature = parse::bin(&parsed.signature, header::SIGTAG_RSA);

        let packet = pgp::packet::PacketParser::new(Cursor::new(signature))
            .next()
            .unwrap()
            .unwrap();
        match packet {
            Packet::Signature(sig) => {
                sig.verify(&public_key, Cursor::new(parsed.header_bytes)).unwrap()
            }
            other => panic!("expected signature packet, got {:?}", other),
        }
    }

    #[test]
    fn empty_info_builds_a_valid_artifact() {
        let mut info = PackageInfo {
            name: "foo".to_string(),
            arch: "amd64".to_string(),
            version: "1.0.0".to_string(),
            ..Default::default()
        }
        .with_defaults();

        let mut rpm = vec![];
        pinned_packager().package(&mut info, &mut rpm).unwrap();

        let parsed = parse_rpm(&rpm);
        let header = parse::parse_header(&parsed.header_bytes);
        assert_eq!(parse::string(&header, header::TAG_NAME), "foo");
        assert!(!header.entries.contains_key(&header::TAG_BASENAMES));
    }

    #[test]
    fn invalid_epoch_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let mut info = testutil::example_info(temp.path());
        info.epoch = "not-a-number".to_string();

        let err = pinned_packager()
            .package(&mut info, &mut std::io::sink())
            .unwrap_err();
        assert!(matches!(err, PackagingError::Format(_)));
    }

    #[test]
    fn conventional_file_name_defaults_the_release() {
        let info = PackageInfo {
            name: "foo".to_string(),
            arch: "x86_64".to_string(),
            version: "1.0.0".to_string(),
            ..Default::default()
        };

        assert_eq!(
            RpmPackager::new().conventional_file_name(&info),
            "foo-1.0.0-1.x86_64.rpm"
        );
    }
}
