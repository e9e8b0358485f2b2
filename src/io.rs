// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! I/O helpers. */

use {
    crate::error::Result,
    digest::Digest,
    std::io::{Read, Write},
};

/// Writer that tees everything written into a digest.
///
/// Producers use this to checksum a byte stream while emitting it, e.g.
/// the SHA-1 of an apk control stream that the signature stream covers.
pub struct DigestingWriter<W: Write, D: Digest> {
    inner: W,
    digest: D,
}

impl<W: Write, D: Digest> DigestingWriter<W, D> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            digest: D::new(),
        }
    }

    /// Unwrap into the inner writer and the finalized digest.
    pub fn finish(self) -> (W, Vec<u8>) {
        (self.inner, self.digest.finalize().to_vec())
    }
}

impl<W: Write, D: Digest> Write for DigestingWriter<W, D> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.digest.update(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// Gzip compress a stream.
///
/// The gzip header is pinned (no file name, no comment, zero mtime) so
/// identical input yields identical output.
pub fn gzip_compress(reader: &mut impl Read) -> Result<Vec<u8>> {
    let header = libflate::gzip::HeaderBuilder::new().modification_time(0).finish();

    let mut encoder = libflate::gzip::Encoder::with_options(
        Vec::new(),
        libflate::gzip::EncodeOptions::new().header(header),
    )?;
    std::io::copy(reader, &mut encoder)?;

    Ok(encoder.finish().into_result()?)
}

/// Gzip compress an in-memory buffer.
pub fn gzip_compress_data(data: &[u8]) -> Result<Vec<u8>> {
    gzip_compress(&mut std::io::Cursor::new(data))
}
