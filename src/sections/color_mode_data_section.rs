//! The colour-mode data section. Always empty for RGB documents.

use std::io::{Seek, Write};

use crate::buffer::{PsdBuffer, PsdSerialize};

/// The (always empty) colour mode data section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorModeDataSection;

impl PsdSerialize for ColorModeDataSection {
    fn write<T>(&self, buffer: &mut PsdBuffer<T>)
    where
        T: Write + Seek,
    {
        buffer.write_sized(|_buf| {});
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn writes_zero_length_prefix() {
        let mut bytes: Vec<u8> = vec![];
        let mut buffer = PsdBuffer::new(Cursor::new(&mut bytes));
        ColorModeDataSection::default().write(&mut buffer);
        assert_eq!(bytes, vec![0, 0, 0, 0]);
    }
}
