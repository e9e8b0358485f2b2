// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! The signing facade.

Producers depend on the free functions here rather than on a concrete
crypto library: raw RSA-PKCS1v15 over a SHA-1 digest for apk, OpenPGP
detached and cleartext signatures for deb and rpm. Every failure is
mapped to [PackagingError::Signing] so callers can discriminate signing
problems from I/O or format problems.
*/

use {
    crate::error::{PackagingError, Result},
    chrono::SubsecRound,
    digest::Digest,
    pgp::{
        crypto::HashAlgorithm,
        packet::{Packet, SignatureConfig, SignatureType, Subpacket},
        ser::Serialize,
        types::{KeyVersion, SecretKeyTrait},
        Deserializable, SignedSecretKey,
    },
    rsa::{
        pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey},
        pkcs8::{DecodePrivateKey, DecodePublicKey},
        Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey,
    },
    sha1::Sha1,
    smallvec::SmallVec,
    std::{io::Cursor, path::Path},
};

fn signing_error(e: impl std::fmt::Display) -> PackagingError {
    PackagingError::Signing(e.to_string())
}

/// Sign a SHA-1 digest with RSA-PKCS1v15.
///
/// The digest length is checked against the SHA-1 output size before any
/// key material is touched; a digest from another hash fails here.
pub fn rsa_sign_sha1_digest(digest: &[u8], key_file: &Path, passphrase: &str) -> Result<Vec<u8>> {
    if digest.len() != Sha1::output_size() {
        return Err(PackagingError::Signing(format!(
            "digest is not a SHA-1 digest: got {} bytes, want {}",
            digest.len(),
            Sha1::output_size()
        )));
    }

    let key = read_rsa_private_key(key_file, passphrase)?;

    key.sign(Pkcs1v15Sign::new::<Sha1>(), digest)
        .map_err(signing_error)
}

/// Verify an RSA-PKCS1v15 signature over a SHA-1 digest.
pub fn rsa_verify_sha1_digest(digest: &[u8], signature: &[u8], key_file: &Path) -> Result<()> {
    let pem = std::fs::read_to_string(key_file).map_err(signing_error)?;

    let key = if pem.contains("BEGIN RSA PUBLIC KEY") {
        RsaPublicKey::from_pkcs1_pem(&pem).map_err(signing_error)?
    } else {
        RsaPublicKey::from_public_key_pem(&pem).map_err(signing_error)?
    };

    key.verify(Pkcs1v15Sign::new::<Sha1>(), digest, signature)
        .map_err(signing_error)
}

fn read_rsa_private_key(key_file: &Path, passphrase: &str) -> Result<RsaPrivateKey> {
    let pem = std::fs::read_to_string(key_file).map_err(signing_error)?;

    if pem.contains("BEGIN ENCRYPTED PRIVATE KEY") {
        RsaPrivateKey::from_pkcs8_encrypted_pem(&pem, passphrase.as_bytes())
            .map_err(signing_error)
    } else if pem.contains("BEGIN RSA PRIVATE KEY") {
        RsaPrivateKey::from_pkcs1_pem(&pem).map_err(signing_error)
    } else {
        RsaPrivateKey::from_pkcs8_pem(&pem).map_err(signing_error)
    }
}

/// Read an ASCII armored PGP secret key from a file.
pub fn read_pgp_secret_key(key_file: &Path) -> Result<SignedSecretKey> {
    let data = std::fs::read(key_file).map_err(signing_error)?;

    let (key, _headers) =
        SignedSecretKey::from_armor_single(Cursor::new(data)).map_err(signing_error)?;

    Ok(key)
}

fn signature_config(key: &impl SecretKeyTrait, typ: SignatureType) -> SignatureConfig {
    let hashed_subpackets = vec![
        Subpacket::IssuerFingerprint(KeyVersion::V4, SmallVec::from_slice(&key.fingerprint())),
        Subpacket::SignatureCreationTime(chrono::Utc::now().trunc_subsecs(0)),
    ];
    let unhashed_subpackets = vec![Subpacket::Issuer(key.key_id())];

    SignatureConfig::new_v4(
        Default::default(),
        typ,
        key.algorithm(),
        HashAlgorithm::SHA2_256,
        hashed_subpackets,
        unhashed_subpackets,
    )
}

/// Produce a detached binary PGP signature over `data`.
///
/// The result is the binary serialization of a single signature packet,
/// which is the member format `.deb` signers and the RPM signature header
/// expect.
pub fn pgp_detached_sign(data: &[u8], key_file: &Path, passphrase: &str) -> Result<Vec<u8>> {
    let key = read_pgp_secret_key(key_file)?;

    let passphrase = passphrase.to_string();
    let signature = signature_config(&key, SignatureType::Binary)
        .sign(&key, || passphrase, Cursor::new(data.to_vec()))
        .map_err(signing_error)?;

    Packet::Signature(signature).to_bytes().map_err(signing_error)
}

/// Produce a cleartext-framework signature over `text`.
///
/// Returns the full multi-line message: header, hash identifier,
/// dash-escaped text, and the armored signature. Line endings in the
/// source are normalized to CRLF for signature creation as RFC 4880
/// requires.
pub fn pgp_clearsign(text: &str, key_file: &Path, passphrase: &str) -> Result<String> {
    let key = read_pgp_secret_key(key_file)?;

    let mut dashed_lines = vec![];
    let mut source_lines = vec![];

    for line in text.lines() {
        dashed_lines.push(if line.starts_with('-') || line.starts_with("From ") {
            format!("- {}", line.trim_end())
        } else {
            line.trim_end().to_string()
        });

        source_lines.push(line.trim_end().to_string());
    }

    let cleartext = source_lines.join("\r\n").into_bytes();

    let passphrase = passphrase.to_string();
    let signature = signature_config(&key, SignatureType::Text)
        .sign(&key, || passphrase, Cursor::new(cleartext))
        .map_err(signing_error)?;

    let packet = Packet::Signature(signature);
    let mut writer = Cursor::new(Vec::<u8>::new());
    pgp::armor::write(&packet, pgp::armor::BlockType::Signature, &mut writer, None)
        .map_err(signing_error)?;
    let signature_armor = String::from_utf8(writer.into_inner())
        .map_err(|e| signing_error(e.utf8_error()))?;

    let lines = vec![
        "-----BEGIN PGP SIGNED MESSAGE-----".to_string(),
        "Hash: SHA256".to_string(),
        String::new(),
    ]
    .into_iter()
    .chain(dashed_lines)
    .chain(std::iter::once(signature_armor))
    .collect::<Vec<_>>();

    Ok(lines.join("\n"))
}

#[cfg(test)]
pub(crate) mod testkeys {
    use {
        super::*,
        pgp::{
            crypto::SymmetricKeyAlgorithm,
            types::CompressionAlgorithm,
            KeyType, SecretKeyParamsBuilder, SignedPublicKey,
        },
        rsa::{
            pkcs1::EncodeRsaPrivateKey,
            pkcs8::{EncodePublicKey, LineEnding},
        },
        smallvec::smallvec,
        std::path::PathBuf,
    };

    /// Write a fresh RSA key pair into `dir`, returning (private, public)
    /// PEM paths.
    pub(crate) fn write_rsa_key_pair(dir: &Path) -> (PathBuf, PathBuf) {
        let mut rng = rand::thread_rng();
        let key = RsaPrivateKey::new(&mut rng, 1024).unwrap();

        let private_path = dir.join("rsa.priv");
        std::fs::write(
            &private_path,
            key.to_pkcs1_pem(LineEnding::LF).unwrap().as_bytes(),
        )
        .unwrap();

        let public_path = dir.join("rsa.pub");
        std::fs::write(
            &public_path,
            RsaPublicKey::from(&key)
                .to_public_key_pem(LineEnding::LF)
                .unwrap(),
        )
        .unwrap();

        (private_path, public_path)
    }

    /// Generate a self-signed PGP key pair, writing the armored secret key
    /// into `dir` and returning its path plus the public half.
    pub(crate) fn write_pgp_secret_key(dir: &Path, passphrase: &str) -> (PathBuf, SignedPublicKey) {
        let mut params = SecretKeyParamsBuilder::default();
        params
            .key_type(KeyType::Rsa(2048))
            .preferred_symmetric_algorithms(smallvec![SymmetricKeyAlgorithm::AES256])
            .preferred_hash_algorithms(smallvec![HashAlgorithm::SHA2_256])
            .preferred_compression_algorithms(smallvec![CompressionAlgorithm::ZLIB])
            .can_create_certificates(false)
            .can_sign(true)
            .primary_user_id("Test Signer <test@example.com>".to_string());

        let secret_key = params.build().unwrap().generate().unwrap();
        let pw = passphrase.to_string();
        let signed = secret_key.sign(|| pw).unwrap();

        let public_key = signed.public_key();
        let pw = passphrase.to_string();
        let signed_public = public_key.sign(&signed, || pw).unwrap();

        let path = dir.join("pgp.asc");
        std::fs::write(&path, signed.to_armored_string(None).unwrap()).unwrap();

        (path, signed_public)
    }
}
