use std::io::Read;

use crate::crc::{ogg_crc32, OggCrc};
use crate::error::{FormatError, Result};
use crate::ogg::{
    OGG_HEADER_TYPE_BOS, OGG_HEADER_TYPE_CONTINUATION, OGG_HEADER_TYPE_EOS, OGG_SIGNATURE,
};

/// OGG Page Header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OggPageHeader {
    pub version: u8,
    pub header_type: u8,
    pub granule_position: u64,
    pub bitstream_serial: u32,
    pub page_sequence: u32,
    pub crc: u32,
    pub segment_table: Vec<u8>,
}

/// OGG Page
///
/// `segments` holds logical segments: runs of 255-valued lacing values are
/// already joined with the value that terminates them. A page whose last
/// lacing value is 255 ends with a segment that continues on the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OggPage {
    pub header: OggPageHeader,
    pub segments: Vec<Vec<u8>>,
}

impl OggPageHeader {
    const SIZE: usize = 27;
    const CRC_RANGE: std::ops::Range<usize> = 22..26;

    /// Check if this is the beginning of a stream
    pub fn is_bos(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_BOS != 0
    }

    /// Check if this is the end of a stream
    pub fn is_eos(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_EOS != 0
    }

    /// Check if the first segment continues a packet from the previous page
    pub fn is_continuation(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_CONTINUATION != 0
    }

    /// Calculate total page data size from segment table
    pub fn data_size(&self) -> usize {
        self.segment_table.iter().map(|&x| x as usize).sum()
    }

    fn to_bytes(&self, crc: u32) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SIZE + self.segment_table.len());
        bytes.extend_from_slice(OGG_SIGNATURE);
        bytes.push(self.version);
        bytes.push(self.header_type);
        bytes.extend_from_slice(&self.granule_position.to_le_bytes());
        bytes.extend_from_slice(&self.bitstream_serial.to_le_bytes());
        bytes.extend_from_slice(&self.page_sequence.to_le_bytes());
        bytes.extend_from_slice(&crc.to_le_bytes());
        bytes.push(self.segment_table.len() as u8);
        bytes.extend_from_slice(&self.segment_table);
        bytes
    }
}

impl OggPage {
    /// Read one OGG page from a reader.
    ///
    /// Validates the capture pattern and the page checksum. Running out of
    /// data anywhere inside the page is `FormatError::IoTruncation`.
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut header = [0u8; OggPageHeader::SIZE];
        reader.read_exact(&mut header)?;

        if &header[0..4] != OGG_SIGNATURE {
            return Err(FormatError::HeaderMismatch.into());
        }

        let le_u32 = |at: usize| {
            u32::from_le_bytes([header[at], header[at + 1], header[at + 2], header[at + 3]])
        };
        let mut granule = [0u8; 8];
        granule.copy_from_slice(&header[6..14]);

        let version = header[4];
        let header_type = header[5];
        let granule_position = u64::from_le_bytes(granule);
        let bitstream_serial = le_u32(14);
        let page_sequence = le_u32(18);
        let crc = le_u32(22);
        let segment_count = header[26];

        // Read segment table
        let mut segment_table = vec![0u8; segment_count as usize];
        reader.read_exact(&mut segment_table)?;

        let page_header = OggPageHeader {
            version,
            header_type,
            granule_position,
            bitstream_serial,
            page_sequence,
            crc,
            segment_table,
        };

        // Read page data
        let mut data = vec![0u8; page_header.data_size()];
        reader.read_exact(&mut data)?;

        // The checksum covers the whole page with its own field zeroed
        header[OggPageHeader::CRC_RANGE].fill(0);
        let mut checked = OggCrc::new();
        checked.update(&header);
        checked.update(&page_header.segment_table);
        checked.update(&data);
        let computed = checked.finish();
        if computed != crc {
            return Err(FormatError::ChecksumMismatch { expected: crc, computed }.into());
        }

        let segments = split_segments(&page_header.segment_table, &data);
        Ok(OggPage {
            header: page_header,
            segments,
        })
    }

    /// Build a page from logical segments, lacing each one.
    ///
    /// The caller keeps the total lacing count within 255.
    pub fn new(
        header_type: u8,
        granule_position: u64,
        bitstream_serial: u32,
        page_sequence: u32,
        segments: Vec<Vec<u8>>,
    ) -> Self {
        let mut segment_table = Vec::new();
        for segment in &segments {
            segment_table.extend(create_lacing(segment.len()));
        }
        debug_assert!(segment_table.len() <= 255, "too many lacing values for one page");

        let mut page = OggPage {
            header: OggPageHeader {
                version: 0,
                header_type,
                granule_position,
                bitstream_serial,
                page_sequence,
                crc: 0,
                segment_table,
            },
            segments,
        };
        page.header.crc = ogg_crc32(&page.serialize(0));
        page
    }

    /// Serialize the page with a freshly computed checksum
    pub fn to_bytes(&self) -> Vec<u8> {
        let crc = ogg_crc32(&self.serialize(0));
        self.serialize(crc)
    }

    fn serialize(&self, crc: u32) -> Vec<u8> {
        let mut bytes = self.header.to_bytes(crc);
        for segment in &self.segments {
            bytes.extend_from_slice(segment);
        }
        bytes
    }
}

/// Lacing values for one logical segment of `size` bytes
fn create_lacing(size: usize) -> Vec<u8> {
    let mut table = vec![255u8; size / 255];
    table.push((size % 255) as u8);
    table
}

/// Join page data into logical segments following the lacing rule
fn split_segments(segment_table: &[u8], data: &[u8]) -> Vec<Vec<u8>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    let mut pos = 0;
    for &lacing in segment_table {
        let end = pos + lacing as usize;
        current.extend_from_slice(&data[pos..end]);
        pos = end;
        if lacing < 255 {
            segments.push(std::mem::take(&mut current));
        }
    }
    // Last segment continues on the next page
    if segment_table.last() == Some(&255) {
        segments.push(current);
    }
    segments
}
