// OGG Vorbis stream support
//
// OGG Page Structure:
// - OGG Page Header (27 bytes)
//   - Capture Pattern: "OggS" (4 bytes)
//   - Version: 0 (1 byte)
//   - Header Type: 1=continuation, 2=bos, 4=eos (1 byte)
//   - Granule Position (8 bytes)
//   - Bitstream Serial Number (4 bytes)
//   - Page Sequence Number (4 bytes)
//   - CRC Checksum (4 bytes)
//   - Number of Page Segments (1 byte)
//   - Segment Table (variable)
//
// Vorbis Structure:
// 1. Identification Header (packet type 1, BOS page)
// 2. Comment Header (packet type 3) - Contains Vorbis Comment
// 3. Setup Header (packet type 5)
// 4. Audio Data pages
//
// A radio stream chains one such logical bitstream per track, so every
// track starts with a BOS page.

pub mod page;
pub mod vorbis;

pub use page::{OggPage, OggPageHeader};
pub use vorbis::{VorbisComment, VorbisHeader};

// OGG signature
pub const OGG_SIGNATURE: &[u8; 4] = b"OggS";

// OGG page header types
pub const OGG_HEADER_TYPE_CONTINUATION: u8 = 0x01;
pub const OGG_HEADER_TYPE_BOS: u8 = 0x02; // Beginning of Stream
pub const OGG_HEADER_TYPE_EOS: u8 = 0x04; // End of Stream
