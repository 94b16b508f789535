use crate::cpu::Bus;

/// Size of the flat address space: the full 16-bit range.
pub const MEMORY_SIZE: usize = 0x1_0000;

/// Flat, byte-addressable memory image.
///
/// No banking and no memory-mapped peripheral semantics; every address in
/// 0..=0xFFFF is plain storage. Out-of-range addresses are impossible by
/// construction since the bus takes `u16`.
pub struct Memory {
    data: [u8; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            data: [0; MEMORY_SIZE],
        }
    }
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy a raw program image into memory starting at address 0.
    ///
    /// Partial images are accepted; the remainder of memory keeps its
    /// previous contents (zero after construction). Oversized images are
    /// truncated to the address space.
    pub fn load_image(&mut self, image: &[u8]) {
        let len = image.len().min(MEMORY_SIZE);
        if len < image.len() {
            log::warn!(
                "image is {} bytes, truncating to the {MEMORY_SIZE} byte address space",
                image.len()
            );
        }
        self.data[..len].copy_from_slice(&image[..len]);
        log::debug!("loaded {len} byte image at 0x0000");
    }
}

impl Bus for Memory {
    fn read8(&mut self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_image_leaves_rest_zero() {
        let mut mem = Memory::new();
        mem.load_image(&[0x11, 0x22, 0x33]);
        assert_eq!(mem.read8(0x0000), 0x11);
        assert_eq!(mem.read8(0x0002), 0x33);
        assert_eq!(mem.read8(0x0003), 0x00);
        assert_eq!(mem.read8(0xFFFF), 0x00);
    }

    #[test]
    fn oversized_image_is_truncated() {
        let mut mem = Memory::new();
        let image = vec![0xAA; MEMORY_SIZE + 16];
        mem.load_image(&image);
        assert_eq!(mem.read8(0x0000), 0xAA);
        assert_eq!(mem.read8(0xFFFF), 0xAA);
    }

    #[test]
    fn writes_read_back() {
        let mut mem = Memory::new();
        mem.write8(0xC000, 0x5A);
        assert_eq!(mem.read8(0xC000), 0x5A);
    }
}
