//! A single layer record: its rect, channels, and additional-info blocks.

use std::io::{Seek, Write};

use crate::buffer::{PsdBuffer, PsdSerialize};
use crate::image_store::ChannelData;
use crate::sections::layer_and_mask_information_section::additional_layer_info::LayerAdditionalInfo;

/// The layer's bounding rect, in the order the file format writes it:
/// top, left, bottom, right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerRect {
    /// Top edge, in pixels from the canvas origin.
    pub top: u32,
    /// Left edge, in pixels from the canvas origin.
    pub left: u32,
    /// Bottom edge, in pixels from the canvas origin.
    pub bottom: u32,
    /// Right edge, in pixels from the canvas origin.
    pub right: u32,
}

/// A default, full-canvas "no blending range restriction" tuple, repeated
/// five times to make up the 40-byte blending ranges block (composite gray
/// plus R, G, B, and one further channel range).
const DEFAULT_BLENDING_RANGE: [u8; 8] = [0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0xFF, 0xFF];

/// One layer's full record: rect, channels, blend mode, flags, name, and
/// its required additional-info blocks.
#[derive(Debug, Clone)]
pub struct LayerRecord {
    /// The layer's bounding rect on the canvas.
    pub rect: LayerRect,
    /// The layer's channel payloads, in file write order.
    pub channels: Vec<ChannelData>,
    /// The layer's display name.
    pub name: String,
    /// 1-based id, unique within the document.
    pub layer_id: u32,
    /// Whether this is the bottom "Background" layer.
    pub is_background: bool,
    /// Whether the layer is shown when the document is composited.
    pub visible: bool,
    /// The layer's (x, y) origin, used for the `fxrp` block.
    pub reference_point: (f64, f64),
    /// Unix timestamp recorded in the layer's `cust` block.
    pub created_at_unix_seconds: f64,
}

impl LayerRecord {
    fn flags(&self) -> u8 {
        if self.is_background || self.visible {
            9
        } else {
            8
        }
    }

    fn additional_info(&self) -> Vec<LayerAdditionalInfo> {
        vec![
            LayerAdditionalInfo::Luni(self.name.clone()),
            LayerAdditionalInfo::Lnsr {
                is_background: self.is_background,
            },
            LayerAdditionalInfo::Lyid(self.layer_id),
            LayerAdditionalInfo::Clbl,
            LayerAdditionalInfo::Infx,
            LayerAdditionalInfo::Knko,
            LayerAdditionalInfo::Lspf {
                is_background: self.is_background,
            },
            LayerAdditionalInfo::Lclr,
            LayerAdditionalInfo::Shmd,
            LayerAdditionalInfo::Cust {
                created_at_unix_seconds: self.created_at_unix_seconds,
            },
            LayerAdditionalInfo::Fxrp {
                x: self.reference_point.0,
                y: self.reference_point.1,
            },
        ]
    }

    fn pascal_name_length(&self) -> u32 {
        let written = 1 + self.name.as_bytes().len();
        let padding = (4 - written % 4) % 4;
        (written + padding) as u32
    }

    /// `extra_data_length`: mask length field + blending ranges field and
    /// body + Pascal name + every additional-info block's total length.
    pub fn extra_data_length(&self) -> u32 {
        let mask_length_field = 4; // always 0 body: layer masks are unsupported
        let blending_ranges_field = 4 + 40;
        let name_length = self.pascal_name_length();
        let additional_info_length: u32 = self.additional_info().iter().map(|i| i.total_length()).sum();

        mask_length_field + blending_ranges_field + name_length + additional_info_length
    }

    /// The full on-disk length of this layer record (excluding channel
    /// image data, which is written separately).
    pub fn length(&self) -> u32 {
        let channel_info_length: u32 = self.channels.len() as u32 * 6; // i16 id + u32 length
        let fixed = 16 // rect
            + 2 // channel count
            + 4 // blend signature
            + 4 // blend key
            + 1 // opacity
            + 1 // clipping
            + 1 // flags
            + 1 // filler
            + 4; // extra_data_length field itself
        channel_info_length + fixed + self.extra_data_length()
    }
}

impl PsdSerialize for LayerRecord {
    fn write<T>(&self, buffer: &mut PsdBuffer<T>)
    where
        T: Write + Seek,
    {
        buffer.write_u32(self.rect.top);
        buffer.write_u32(self.rect.left);
        buffer.write_u32(self.rect.bottom);
        buffer.write_u32(self.rect.right);

        buffer.write_u16(self.channels.len() as u16);
        for channel in &self.channels {
            buffer.write_i16(channel.kind.id());
            buffer.write_u32(channel.length());
        }

        buffer.write(b"8BIM");
        buffer.write(b"norm");
        buffer.write_u8(255); // opacity
        buffer.write_u8(0); // clipping
        buffer.write_u8(self.flags());
        buffer.write_u8(0); // filler

        buffer.write_u32(self.extra_data_length());

        buffer.write_u32(0); // layer mask data length: no mask

        buffer.write_u32(40); // blending ranges length
        for _ in 0..5 {
            buffer.write(DEFAULT_BLENDING_RANGE);
        }

        buffer.write_pascal_string(&self.name);

        for info in self.additional_info() {
            info.write(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_store::{ChannelData, ChannelKind, Compression};
    use std::io::Cursor;

    fn sample_layer() -> LayerRecord {
        LayerRecord {
            rect: LayerRect {
                top: 0,
                left: 0,
                bottom: 2,
                right: 2,
            },
            channels: vec![
                ChannelData::encode(ChannelKind::Red, &[1, 2, 3, 4], 2, 2, Compression::None),
                ChannelData::encode(ChannelKind::Green, &[1, 2, 3, 4], 2, 2, Compression::None),
                ChannelData::encode(ChannelKind::Blue, &[1, 2, 3, 4], 2, 2, Compression::None),
            ],
            name: "Background".to_string(),
            layer_id: 1,
            is_background: true,
            visible: true,
            reference_point: (0.0, 0.0),
            created_at_unix_seconds: 0.0,
        }
    }

    #[test]
    fn length_matches_bytes_actually_written() {
        let layer = sample_layer();
        let mut bytes = vec![];
        let mut buffer = PsdBuffer::new(Cursor::new(&mut bytes));
        layer.write(&mut buffer);
        assert_eq!(bytes.len() as u32, layer.length());
    }

    #[test]
    fn background_layer_has_flags_nine() {
        let layer = sample_layer();
        assert_eq!(layer.flags(), 9);
    }

    #[test]
    fn invisible_non_background_layer_has_flags_eight() {
        let mut layer = sample_layer();
        layer.is_background = false;
        layer.visible = false;
        assert_eq!(layer.flags(), 8);
    }

    #[test]
    fn pascal_name_padding_is_multiple_of_four() {
        let layer = sample_layer();
        assert_eq!(layer.pascal_name_length() % 4, 0);
    }
}
