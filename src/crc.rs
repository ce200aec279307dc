// CRC-32 checksums
//
// Two variants are needed:
// - Ogg pages use polynomial 0x04c11db7, MSB first, initial value 0 and no
//   final xor.
// - The ICY fallback name uses the common IEEE CRC-32 (reflected 0xedb88320,
//   initial value and final xor 0xffffffff), the one zlib and PNG use.

/// CRC lookup table for Ogg.
static OGG_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut r = (i as u32) << 24;
        let mut j = 0;
        while j < 8 {
            if r & 0x80000000 != 0 {
                r = (r << 1) ^ 0x04c11db7;
            } else {
                r <<= 1;
            }
            j += 1;
        }
        table[i] = r;
        i += 1;
    }
    table
};

/// CRC lookup table for IEEE CRC-32.
static IEEE_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut r = i as u32;
        let mut j = 0;
        while j < 8 {
            if r & 1 != 0 {
                r = (r >> 1) ^ 0xedb88320;
            } else {
                r >>= 1;
            }
            j += 1;
        }
        table[i] = r;
        i += 1;
    }
    table
};

/// Incremental Ogg CRC, so a page can be hashed piece by piece
#[derive(Debug, Clone, Copy, Default)]
pub struct OggCrc(u32);

impl OggCrc {
    pub fn new() -> Self {
        OggCrc(0)
    }

    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.0 = (self.0 << 8) ^ OGG_TABLE[((self.0 >> 24) as u8 ^ byte) as usize];
        }
    }

    pub fn finish(self) -> u32 {
        self.0
    }
}

/// Calculates CRC for Ogg page bytes.
pub fn ogg_crc32(data: &[u8]) -> u32 {
    let mut crc = OggCrc::new();
    crc.update(data);
    crc.finish()
}

/// Calculates IEEE CRC-32.
pub fn ieee_crc32(data: &[u8]) -> u32 {
    let mut crc = 0xffffffffu32;
    for &byte in data {
        crc = (crc >> 8) ^ IEEE_TABLE[((crc as u8) ^ byte) as usize];
    }
    !crc
}
