//! Reading big-endian numbers of arbitrary bit width from a byte stream, as needed
//! for sampled functions, mesh shadings and LZW codes.

/// A big-endian bit reader.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    /// Create a new bit reader.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Skip to the next byte boundary.
    pub fn align(&mut self) {
        self.bit_pos = self.bit_pos.next_multiple_of(8);
    }

    /// Whether fewer than `bits` bits are left.
    pub fn has_less_than(&self, bits: usize) -> bool {
        self.data.len() * 8 < self.bit_pos + bits
    }

    /// Read a number with the given bit width. Widths above 32 are rejected.
    pub fn read(&mut self, bits: u8) -> Option<u32> {
        if bits > 32 || self.has_less_than(bits as usize) {
            return None;
        }

        if bits == 8 && self.bit_pos.is_multiple_of(8) {
            let byte = self.data[self.bit_pos / 8];
            self.bit_pos += 8;

            return Some(byte as u32);
        }

        let mut value = 0u64;
        let mut remaining = bits as usize;

        while remaining > 0 {
            let byte = self.data[self.bit_pos / 8];
            let offset = self.bit_pos % 8;
            let take = remaining.min(8 - offset);
            let chunk = (byte >> (8 - offset - take)) & ((1u16 << take) - 1) as u8;

            value = (value << take) | chunk as u64;
            remaining -= take;
            self.bit_pos += take;
        }

        Some(value as u32)
    }

    /// Read a number and map it linearly from `[0, 2^bits - 1]` to `[min, max]`.
    pub fn read_scaled(&mut self, bits: u8, min: f32, max: f32) -> Option<f32> {
        let raw = self.read(bits)?;
        let max_value = ((1u64 << bits) - 1).max(1) as f64;

        Some(min + (raw as f64 / max_value) as f32 * (max - min))
    }
}

#[cfg(test)]
mod tests {
    use super::BitReader;

    #[test]
    fn mixed_widths() {
        let mut r = BitReader::new(&[0b1011_0011, 0b0101_1111, 0xff]);

        assert_eq!(r.read(1), Some(1));
        assert_eq!(r.read(3), Some(0b011));
        assert_eq!(r.read(6), Some(0b0011_01));
        assert_eq!(r.read(6), Some(0b01_1111));
        assert_eq!(r.read(8), Some(0xff));
        assert_eq!(r.read(1), None);
    }

    #[test]
    fn wide_values_and_alignment() {
        let mut r = BitReader::new(&[0x80, 0x12, 0x34, 0x56, 0x78]);

        assert_eq!(r.read(1), Some(1));
        r.align();
        assert_eq!(r.read(32), Some(0x1234_5678));
        assert_eq!(r.read(33), None);
    }

    #[test]
    fn scaled() {
        let mut r = BitReader::new(&[0xff, 0x00]);

        assert_eq!(r.read_scaled(8, 0.0, 10.0), Some(10.0));
        assert_eq!(r.read_scaled(8, -1.0, 1.0), Some(-1.0));
    }
}
