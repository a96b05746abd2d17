//! The last section in the file: the merged composite's pixel data.
//!
//! Image data is stored in planar order: first all the red data, then all
//! the green data, then all the blue data, each plane in scan-line order.
//! The merged preview is always re-compressed with RLE at save time,
//! regardless of how individual layers were stored, since this section
//! shares one compression code across all of its channels.

use std::io::{Seek, Write};

use crate::buffer::{PsdBuffer, PsdSerialize};
use crate::image_store::PlanarImage;
use crate::packbits;

/// The merged composite's channel data, always RLE-compressed.
#[derive(Debug, Clone)]
pub struct ImageDataSection {
    width: u32,
    height: u32,
    red: Vec<(u16, Vec<u8>)>,
    green: Vec<(u16, Vec<u8>)>,
    blue: Vec<(u16, Vec<u8>)>,
}

impl ImageDataSection {
    /// Build the section from the document's merged composite.
    pub fn from_merged(image: &PlanarImage) -> Self {
        ImageDataSection {
            width: image.width(),
            height: image.height(),
            red: compress_channel(image.red(), image.width()),
            green: compress_channel(image.green(), image.width()),
            blue: compress_channel(image.blue(), image.width()),
        }
    }
}

fn compress_channel(planar: &[u8], width: u32) -> Vec<(u16, Vec<u8>)> {
    planar
        .chunks(width as usize)
        .map(|row| {
            let encoded = packbits::encode_row(row);
            (encoded.len() as u16, encoded)
        })
        .collect()
}

impl PsdSerialize for ImageDataSection {
    fn write<T>(&self, buffer: &mut PsdBuffer<T>)
    where
        T: Write + Seek,
    {
        buffer.write_u16(1); // shared compression: RLE

        for channel in [&self.red, &self.green, &self.blue] {
            for (count, _) in channel {
                buffer.write_u16(*count);
            }
        }
        for channel in [&self.red, &self.green, &self.blue] {
            for (_, bytes) in channel {
                buffer.write(bytes);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn row_count_matches_image_height() {
        let image = PlanarImage::solid(4, 3, 10, 20, 30);
        let section = ImageDataSection::from_merged(&image);
        assert_eq!(section.red.len(), 3);
        assert_eq!(section.width, 4);
    }

    #[test]
    fn writes_shared_compression_code_once() {
        let image = PlanarImage::solid(4, 4, 1, 2, 3);
        let section = ImageDataSection::from_merged(&image);
        let mut bytes = vec![];
        let mut buffer = PsdBuffer::new(Cursor::new(&mut bytes));
        section.write(&mut buffer);
        assert_eq!(&bytes[0..2], &[0, 1]);
    }
}
