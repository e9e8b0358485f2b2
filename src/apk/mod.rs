// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Alpine `.apk` packages.

An apk v2 file is the bitwise concatenation of up to three gzip streams:
an optional signature stream, a control stream with `.PKGINFO` and the
maintainer scripts, and a data stream with the installed files. The
signature and control streams are tar *segments*, written without the tar
end-of-archive marker, so apk-tools can peel them off the front of the
file; only the data stream is a terminated tar archive.
*/

mod builder;

pub use builder::ApkPackager;
