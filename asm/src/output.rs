use thiserror::Error;

use crate::image::{checksum, Image};

pub const MAGIC: &[u8; 4] = b"MR8C";
pub const VERSION: u8 = 1;
pub const HEADER_LEN: usize = 12;

// ----------------------------------------------------------------------------
// ROM binary

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RomError {
    #[error("ROM too short: {0} bytes")]
    TooShort(usize),

    #[error("Bad magic: {0:02X?}")]
    BadMagic([u8; 4]),

    #[error("Unsupported ROM version: {0}")]
    Version(u8),

    #[error("Size mismatch: header says {header} bytes, payload has {actual}")]
    Size { header: u16, actual: usize },

    #[error("Checksum mismatch: header {header:#06X}, computed {actual:#06X}")]
    Checksum { header: u16, actual: u16 },
}

/// ```text
/// 0  magic    "MR8C"
/// 4  version  u8
/// 5  reserved u8
/// 6  origin   u16
/// 8  size     u16
/// 10 checksum u16
/// ```
/// All fields little-endian. The payload follows directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RomHeader {
    pub version: u8,
    pub origin: u16,
    pub size: u16,
    pub checksum: u16,
}

impl RomHeader {
    pub fn new(origin: u16, payload: &[u8]) -> Self {
        RomHeader {
            version: VERSION,
            origin,
            size: payload.len() as u16,
            checksum: checksum(payload),
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0; HEADER_LEN];
        out[0..4].copy_from_slice(MAGIC);
        out[4] = self.version;
        out[6..8].copy_from_slice(&self.origin.to_le_bytes());
        out[8..10].copy_from_slice(&self.size.to_le_bytes());
        out[10..12].copy_from_slice(&self.checksum.to_le_bytes());
        out
    }

    /// Split a ROM file into its header and payload.
    pub fn parse(rom: &[u8]) -> Result<(RomHeader, &[u8]), RomError> {
        if rom.len() < HEADER_LEN {
            return Err(RomError::TooShort(rom.len()));
        }
        let word = |at: usize| u16::from_le_bytes([rom[at], rom[at + 1]]);

        let magic = [rom[0], rom[1], rom[2], rom[3]];
        if &magic != MAGIC {
            return Err(RomError::BadMagic(magic));
        }
        let version = rom[4];
        if version != VERSION {
            return Err(RomError::Version(version));
        }
        let header = RomHeader {
            version,
            origin: word(6),
            size: word(8),
            checksum: word(10),
        };
        Ok((header, &rom[HEADER_LEN..]))
    }

    /// Check the payload against the size and checksum fields.
    pub fn verify(&self, payload: &[u8]) -> Result<(), RomError> {
        if self.size as usize != payload.len() {
            return Err(RomError::Size {
                header: self.size,
                actual: payload.len(),
            });
        }
        let actual = checksum(payload);
        if actual != self.checksum {
            return Err(RomError::Checksum {
                header: self.checksum,
                actual,
            });
        }
        Ok(())
    }
}

/// Header followed by the image bytes. `origin` goes into the header as given.
pub fn to_rom(image: &Image, origin: u16) -> Vec<u8> {
    let header = RomHeader::new(origin, &image.bytes);
    let mut out = Vec::with_capacity(HEADER_LEN + image.bytes.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&image.bytes);
    out
}

// ----------------------------------------------------------------------------
// C/C++ array

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CppOptions {
    /// Array variable name. `{var}_ORIGIN` holds the origin.
    pub var: String,
    /// Bytes per row.
    pub columns: usize,
}

impl Default for CppOptions {
    fn default() -> Self {
        CppOptions {
            var: "ROM".to_string(),
            columns: 12,
        }
    }
}

pub fn to_cpp(image: &Image, origin: u16, opts: &CppOptions) -> String {
    let var = &opts.var;
    let mut out = format!("const uint16_t {var}_ORIGIN = 0x{origin:04X};\nconst uint8_t {var}[] = {{\n");
    if image.bytes.is_empty() {
        out.push_str("  // empty\n");
    }
    for row in image.bytes.chunks(opts.columns.max(1)) {
        let row: Vec<String> = row.iter().map(|b| format!("0x{b:02X},")).collect();
        out.push_str(&format!("  {}\n", row.join(" ")));
    }
    out.push_str("};\n");
    out
}
