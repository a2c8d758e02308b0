use crate::constants::MEMORY_WORDS;
use crate::error::LoadError;
use std::fs;
use std::path::Path;

/// Word-addressed program memory covering the whole 15-bit address space.
///
/// The loaded image sits at offset 0; everything past it starts zeroed.
#[derive(Clone)]
pub struct ProgramMemory {
    words: Vec<u16>,
    image_len: usize,
}

impl Default for ProgramMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramMemory {
    pub fn new() -> Self {
        Self {
            words: vec![0; MEMORY_WORDS],
            image_len: 0,
        }
    }

    /// Decode a program image of consecutive little-endian 16-bit words.
    pub fn from_image(blob: &[u8]) -> Result<Self, LoadError> {
        if blob.is_empty() {
            return Err(LoadError::Empty);
        }
        if blob.len() % 2 != 0 {
            return Err(LoadError::OddLength { len: blob.len() });
        }
        let words: Vec<u16> = blob
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Self::from_words(&words)
    }

    pub fn from_words(image: &[u16]) -> Result<Self, LoadError> {
        if image.len() > MEMORY_WORDS {
            return Err(LoadError::TooLarge {
                words: image.len(),
                max: MEMORY_WORDS,
            });
        }
        let mut memory = Self::new();
        memory.words[..image.len()].copy_from_slice(image);
        memory.image_len = image.len();
        Ok(memory)
    }

    /// Number of words that came from the program image.
    pub fn image_len(&self) -> usize {
        self.image_len
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn load(&self, offset: u16) -> Option<u16> {
        self.words.get(offset as usize).copied()
    }

    pub fn store(&mut self, offset: u16, value: u16) -> Option<()> {
        let slot = self.words.get_mut(offset as usize)?;
        *slot = value;
        Some(())
    }
}

/// Read a program image from disk.
pub fn load_image(path: &Path) -> Result<ProgramMemory, LoadError> {
    let blob = fs::read(path)?;
    ProgramMemory::from_image(&blob)
}
