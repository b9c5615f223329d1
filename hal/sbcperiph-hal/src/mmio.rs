//! Memory-mapped register abstractions
//!
//! Peripheral register banks that are reached through a mapped physical
//! window. Establishing the mapping is the host environment's job; this
//! module only models word access at byte offsets within it.

/// 32-bit memory-mapped register access
///
/// Offsets are in bytes from the start of the register bank and are always
/// word aligned. Access is assumed to succeed once the mapping exists.
pub trait MemoryRegisterChannel {
    /// Load the register at `byte_offset`
    fn read_word(&self, byte_offset: u32) -> u32;

    /// Store `value` to the register at `byte_offset`
    fn write_word(&mut self, byte_offset: u32, value: u32);
}

impl<T: MemoryRegisterChannel + ?Sized> MemoryRegisterChannel for &mut T {
    fn read_word(&self, byte_offset: u32) -> u32 {
        (**self).read_word(byte_offset)
    }

    fn write_word(&mut self, byte_offset: u32, value: u32) {
        (**self).write_word(byte_offset, value)
    }
}

/// A mapped register window accessed with volatile loads and stores
pub struct MmioRegion {
    base: *mut u32,
    len_words: usize,
}

#[allow(unsafe_code)]
impl MmioRegion {
    /// Wrap an already-mapped register window
    ///
    /// # Safety
    /// `base` must be word aligned and valid for volatile reads and writes
    /// of `len_words` consecutive `u32` registers for as long as the region
    /// is alive, and nothing else may create references into that memory.
    pub unsafe fn new(base: *mut u32, len_words: usize) -> Self {
        Self { base, len_words }
    }

    /// Size of the window in bytes
    pub fn len_bytes(&self) -> usize {
        self.len_words * 4
    }

    fn word_index(&self, byte_offset: u32) -> usize {
        let index = (byte_offset / 4) as usize;
        assert!(
            byte_offset % 4 == 0 && index < self.len_words,
            "register offset outside mapped window"
        );
        index
    }
}

#[allow(unsafe_code)]
impl MemoryRegisterChannel for MmioRegion {
    fn read_word(&self, byte_offset: u32) -> u32 {
        let index = self.word_index(byte_offset);
        // SAFETY: index is bounds checked against the window given to `new`
        unsafe { core::ptr::read_volatile(self.base.add(index)) }
    }

    fn write_word(&mut self, byte_offset: u32, value: u32) {
        let index = self.word_index(byte_offset);
        // SAFETY: index is bounds checked against the window given to `new`
        unsafe { core::ptr::write_volatile(self.base.add(index), value) }
    }
}
