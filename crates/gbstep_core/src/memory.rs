use crate::error::{CoreError, Result};

/// Total addressable memory for the Game Boy (64 KiB).
pub const MEMORY_SIZE: usize = 0x10000;

/// Cartridge ROM window: 0x0000..0x8000.
pub const ROM_START: u16 = 0x0000;
pub const ROM_SIZE: usize = 0x8000;

/// Video RAM window: 0x8000..0xA000.
pub const VRAM_START: u16 = 0x8000;
pub const VRAM_SIZE: usize = 0x2000;

/// Flat memory map covering the whole 16-bit address range.
///
/// There is no banking or IO side-effect modelling: every address is a plain
/// byte cell, and the ROM/VRAM windows are views over the same buffer.
#[derive(Clone)]
pub struct AddressSpace {
    memory: Box<[u8]>,
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AddressSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressSpace")
            .field("size", &self.memory.len())
            .finish_non_exhaustive()
    }
}

impl AddressSpace {
    pub fn new() -> Self {
        Self {
            memory: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn read8(&self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    #[inline]
    pub fn write8(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }

    /// Little-endian word read. The high byte of a read at 0xFFFF comes
    /// from 0x0000.
    #[inline]
    pub fn read16(&self, addr: u16) -> u16 {
        let lo = self.read8(addr);
        let hi = self.read8(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Little-endian word write, wrapping at the top of the map like
    /// `read16`.
    #[inline]
    pub fn write16(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write8(addr, lo);
        self.write8(addr.wrapping_add(1), hi);
    }

    /// Copy a cartridge image into the ROM window.
    ///
    /// Bytes of the window past the end of the image are cleared so that a
    /// smaller cartridge never inherits the tail of a previous one. An image
    /// larger than the window is rejected before anything is written.
    pub fn load_cartridge(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > ROM_SIZE {
            return Err(CoreError::CapacityExceeded {
                size: rom.len(),
                capacity: ROM_SIZE,
            });
        }

        let window = self.rom_mut();
        window[..rom.len()].copy_from_slice(rom);
        window[rom.len()..].fill(0);
        Ok(())
    }

    pub fn rom(&self) -> &[u8] {
        let start = ROM_START as usize;
        &self.memory[start..start + ROM_SIZE]
    }

    pub fn rom_mut(&mut self) -> &mut [u8] {
        let start = ROM_START as usize;
        &mut self.memory[start..start + ROM_SIZE]
    }

    pub fn vram(&self) -> &[u8] {
        let start = VRAM_START as usize;
        &self.memory[start..start + VRAM_SIZE]
    }

    pub fn vram_mut(&mut self) -> &mut [u8] {
        let start = VRAM_START as usize;
        &mut self.memory[start..start + VRAM_SIZE]
    }

    /// The whole map, for memory viewers.
    pub fn as_slice(&self) -> &[u8] {
        &self.memory
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    /// Bounds-checked view of `len` bytes starting at `start`.
    ///
    /// Unlike the word accessors this does not wrap: a range that would
    /// cross 0xFFFF is reported as `InvalidAddress`.
    pub fn slice(&self, start: u16, len: usize) -> Result<&[u8]> {
        let begin = start as usize;
        match begin.checked_add(len) {
            Some(end) if end <= MEMORY_SIZE => Ok(&self.memory[begin..end]),
            _ => Err(CoreError::InvalidAddress { start, len }),
        }
    }
}
