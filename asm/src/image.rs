/// Contiguous run of bytes emitted between two `.org` statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub base: u16,
    pub bytes: Vec<u8>,
}

/// All segments merged into one contiguous buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub base: u16,
    pub bytes: Vec<u8>,
}

impl Image {
    /// Span every segment, filling gaps with `fill`. Later segments overwrite earlier
    /// ones where they overlap. Without segments the image is empty and based at `origin`.
    pub fn build(segments: &[Segment], origin: u16, fill: u8) -> Image {
        let Some(base) = segments.iter().map(|seg| seg.base).min() else {
            return Image {
                base: origin,
                bytes: vec![],
            };
        };
        let end = segments
            .iter()
            .map(|seg| seg.base as usize + seg.bytes.len())
            .max()
            .unwrap_or(base as usize);

        let mut bytes = vec![fill; end - base as usize];
        for seg in segments {
            let start = (seg.base - base) as usize;
            bytes[start..start + seg.bytes.len()].copy_from_slice(&seg.bytes);
        }
        Image { base, bytes }
    }

    /// Sum of all bytes modulo 65536.
    pub fn checksum(&self) -> u16 {
        checksum(&self.bytes)
    }
}

pub fn checksum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |sum, &byte| sum.wrapping_add(byte as u16))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(base: u16, bytes: &[u8]) -> Segment {
        Segment {
            base,
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn empty() {
        let image = Image::build(&[], 0x0100, 0xFF);
        assert_eq!(image.base, 0x0100);
        assert!(image.bytes.is_empty());
        assert_eq!(image.checksum(), 0);
    }

    #[test]
    fn gaps_are_filled() {
        let image = Image::build(&[seg(0x10, &[0xAA]), seg(0x00, &[0xBB])], 0, 0xFF);
        assert_eq!(image.base, 0);
        assert_eq!(image.bytes.len(), 17);
        assert_eq!(image.bytes[0], 0xBB);
        assert_eq!(image.bytes[16], 0xAA);
        assert!(image.bytes[1..16].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn later_segment_wins() {
        let image = Image::build(&[seg(0, &[1, 2, 3]), seg(1, &[9])], 0, 0);
        assert_eq!(image.bytes, vec![1, 9, 3]);
    }

    #[test]
    fn base_ignores_origin() {
        let image = Image::build(&[seg(0x8000, &[1])], 0, 0);
        assert_eq!(image.base, 0x8000);
    }

    #[test]
    fn checksum_wraps() {
        assert_eq!(checksum(&[0xFF; 300]), (0xFF * 300 % 65536) as u16);
        assert_eq!(checksum(&vec![0xFF; 1000]), (0xFFu32 * 1000 % 65536) as u16);
    }
}
