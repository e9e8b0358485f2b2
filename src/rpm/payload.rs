// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! The cpio payload writer (*New ASCII* format). */

use {
    crate::error::Result,
    std::io::Write,
};

pub(crate) const MAGIC: &[u8] = b"070701";

const TRAILER: &str = "TRAILER!!!";

/// Writes a `070701` cpio archive.
///
/// Inode numbers are assigned sequentially, all entries are owned by
/// root, and member names are expected with their `./` prefix already
/// applied.
pub(crate) struct NewcWriter<W: Write> {
    writer: W,
    inode: u32,
}

impl<W: Write> NewcWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, inode: 0 }
    }

    /// The inode assigned to the most recently appended entry.
    pub fn last_inode(&self) -> u32 {
        self.inode
    }

    pub fn append_file(&mut self, name: &str, mode: u32, mtime: u32, data: &[u8]) -> Result<()> {
        self.append_entry(name, 0o100000 | mode, mtime, data)
    }

    pub fn append_symlink(&mut self, name: &str, mtime: u32, target: &str) -> Result<()> {
        self.append_entry(name, 0o120777, mtime, target.as_bytes())
    }

    pub fn append_dir(&mut self, name: &str, mode: u32, mtime: u32) -> Result<()> {
        self.append_entry(name, 0o040000 | mode, mtime, &[])
    }

    fn append_entry(&mut self, name: &str, mode: u32, mtime: u32, data: &[u8]) -> Result<()> {
        self.inode += 1;
        self.write_header(self.inode, mode, mtime, data.len() as u32, name)?;
        self.writer.write_all(data)?;
        self.pad(data.len())?;

        Ok(())
    }

    fn write_header(
        &mut self,
        inode: u32,
        mode: u32,
        mtime: u32,
        file_size: u32,
        name: &str,
    ) -> Result<()> {
        let name_size = name.len() as u32 + 1;

        self.writer.write_all(MAGIC)?;
        for value in [
            inode,
            mode,
            0, // uid
            0, // gid
            1, // nlink
            mtime,
            file_size,
            0, // dev major
            0, // dev minor
            0, // rdev major
            0, // rdev minor
            name_size,
            0, // checksum, unused for 070701
        ] {
            write!(self.writer, "{:08x}", value)?;
        }

        self.writer.write_all(name.as_bytes())?;
        self.writer.write_all(&[0])?;

        // Header plus name pads to a 4-byte boundary.
        self.pad(MAGIC.len() + 13 * 8 + name_size as usize)?;

        Ok(())
    }

    fn pad(&mut self, written: usize) -> Result<()> {
        let over = written % 4;
        if over != 0 {
            self.writer.write_all(&vec![0u8; 4 - over])?;
        }

        Ok(())
    }

    /// Write the trailer record and unwrap the inner writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.write_all(MAGIC)?;
        for value in [0u32, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, TRAILER.len() as u32 + 1, 0] {
            write!(self.writer, "{:08x}", value)?;
        }
        self.writer.write_all(TRAILER.as_bytes())?;
        self.writer.write_all(&[0])?;
        self.pad(MAGIC.len() + 13 * 8 + TRAILER.len() + 1)?;

        Ok(self.writer)
    }
}
