//! The layer and mask information section: the layer list, each layer's
//! channel image data, the (always inactive) global layer mask, and the
//! document-level additional-info trio.

use std::io::{Seek, Write};

use crate::buffer::{PsdBuffer, PsdSerialize};
use crate::sections::layer_and_mask_information_section::additional_layer_info::DocumentAdditionalInfo;
pub use crate::sections::layer_and_mask_information_section::layer::{LayerRecord, LayerRect};

pub mod additional_layer_info;
pub mod layer;

/// The layer list plus the trailing global layer mask and document-level
/// additional info. Layer masks are not supported, so the global layer
/// mask is always emitted inactive (4 zero filler bytes).
#[derive(Debug, Clone)]
pub struct LayerAndMaskInformationSection {
    /// Every layer, in bottom-to-top stacking order.
    pub layers: Vec<LayerRecord>,
}

impl PsdSerialize for LayerAndMaskInformationSection {
    fn write<T>(&self, buffer: &mut PsdBuffer<T>)
    where
        T: Write + Seek,
    {
        buffer.write_sized(|buf| {
            buf.write_sized(|buf| {
                buf.write_u16(self.layers.len() as u16);
                for layer in &self.layers {
                    layer.write(buf);
                }
                for layer in &self.layers {
                    for channel in &layer.channels {
                        buf.write_u16(channel.compression_code);
                        for &count in &channel.row_bytecounts {
                            buf.write_u16(count);
                        }
                        buf.write(&channel.bytes);
                    }
                }

                buf.write_u16(0); // mystery null
            });

            buf.write([0u8; 4]); // global layer mask info: inactive

            DocumentAdditionalInfo::Patt.write(buf);
            DocumentAdditionalInfo::Fmsk.write(buf);
            DocumentAdditionalInfo::Cinf.write(buf);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_store::{ChannelData, ChannelKind, Compression};
    use std::io::Cursor;

    #[test]
    fn empty_layer_list_still_writes_trailing_blocks() {
        let section = LayerAndMaskInformationSection { layers: vec![] };
        let mut bytes = vec![];
        let mut buffer = PsdBuffer::new(Cursor::new(&mut bytes));
        section.write(&mut buffer);

        // total_length prefix + layer_info_length prefix + count(0) + mystery null
        // + global mask filler + 3 additional-info blocks must all be present.
        assert!(bytes.len() > 4 + 4 + 2 + 2 + 4);
    }

    #[test]
    fn layer_count_matches_number_of_layers() {
        let layer = LayerRecord {
            rect: LayerRect {
                top: 0,
                left: 0,
                bottom: 1,
                right: 1,
            },
            channels: vec![ChannelData::encode(ChannelKind::Red, &[1], 1, 1, Compression::None)],
            name: "Background".to_string(),
            layer_id: 1,
            is_background: true,
            visible: true,
            reference_point: (0.0, 0.0),
            created_at_unix_seconds: 0.0,
        };
        let expected_channel_bytes: u32 = layer.channels.iter().map(|c| c.length()).sum();
        let expected_inner = 2 // layer count
            + layer.length()
            + expected_channel_bytes
            + 2; // mystery null, inside the measured region

        let section = LayerAndMaskInformationSection { layers: vec![layer] };
        let mut bytes = vec![];
        let mut buffer = PsdBuffer::new(Cursor::new(&mut bytes));
        section.write(&mut buffer);

        let layer_info_length = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let count = u16::from_be_bytes([bytes[8], bytes[9]]);
        assert_eq!(count, 1);
        assert_eq!(layer_info_length, expected_inner);
    }
}
