//! Pixel storage: the merged RGB composite, and per-layer channel data in
//! the planar (band-sequential) order the file format requires.

use crate::compositor::ChannelOrder;
use crate::packbits;

/// Which channel a piece of channel data represents, and the channel id the
/// file format records for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Transparency channel, id -1.
    Alpha,
    /// Red, id 0.
    Red,
    /// Green, id 1.
    Green,
    /// Blue, id 2.
    Blue,
}

impl ChannelKind {
    /// The signed channel id the file format records.
    pub fn id(self) -> i16 {
        match self {
            ChannelKind::Alpha => -1,
            ChannelKind::Red => 0,
            ChannelKind::Green => 1,
            ChannelKind::Blue => 2,
        }
    }
}

/// Whether a layer's channels were requested to be PackBits-compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Store raw planar bytes, compression code 0.
    None,
    /// PackBits-compress each row, compression code 1.
    Rle,
}

/// One channel's on-disk payload: a compression code, an optional per-row
/// byte-count table (RLE only), and the image bytes themselves.
#[derive(Debug, Clone)]
pub struct ChannelData {
    /// Which channel this payload belongs to.
    pub kind: ChannelKind,
    /// `0` for raw, `1` for PackBits RLE.
    pub compression_code: u16,
    /// Per-row compressed byte counts; empty when stored raw.
    pub row_bytecounts: Vec<u16>,
    /// The channel's image bytes, compressed or raw per `compression_code`.
    pub bytes: Vec<u8>,
}

impl ChannelData {
    /// Build one channel's on-disk payload from its planar bytes, choosing
    /// between raw and RLE storage per `should_compress`.
    pub fn encode(kind: ChannelKind, planar: &[u8], width: u32, height: u32, requested: Compression) -> Self {
        let want_rle = matches!(requested, Compression::Rle);
        if packbits::should_compress(want_rle, width, height) {
            let row_len = width as usize;
            let mut row_bytecounts = Vec::with_capacity(height as usize);
            let mut bytes = Vec::new();
            for row in planar.chunks(row_len) {
                let encoded = packbits::encode_row(row);
                row_bytecounts.push(encoded.len() as u16);
                bytes.extend_from_slice(&encoded);
            }
            ChannelData {
                kind,
                compression_code: 1,
                row_bytecounts,
                bytes,
            }
        } else {
            ChannelData {
                kind,
                compression_code: 0,
                row_bytecounts: Vec::new(),
                bytes: planar.to_vec(),
            }
        }
    }

    /// Total on-disk length: `2` (compression code) + the row bytecount
    /// table (RLE only) + the image bytes.
    pub fn length(&self) -> u32 {
        2 + (self.row_bytecounts.len() as u32 * 2) + self.bytes.len() as u32
    }
}

/// The merged RGB composite, grown by [`crate::compositor::composite_onto`]
/// as visible layers are added.
#[derive(Debug, Clone)]
pub struct PlanarImage {
    width: u32,
    height: u32,
    red: Vec<u8>,
    green: Vec<u8>,
    blue: Vec<u8>,
}

impl PlanarImage {
    /// A solid-colour image: every pixel set to `(r, g, b)`.
    pub fn solid(width: u32, height: u32, r: u8, g: u8, b: u8) -> Self {
        let count = (width as usize) * (height as usize);
        PlanarImage {
            width,
            height,
            red: vec![r; count],
            green: vec![g; count],
            blue: vec![b; count],
        }
    }

    /// The image's width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The image's height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The red plane, in scan-line order.
    pub fn red(&self) -> &[u8] {
        &self.red
    }

    /// The green plane, in scan-line order.
    pub fn green(&self) -> &[u8] {
        &self.green
    }

    /// The blue plane, in scan-line order.
    pub fn blue(&self) -> &[u8] {
        &self.blue
    }

    /// The red plane, mutable.
    pub fn red_mut(&mut self) -> &mut [u8] {
        &mut self.red
    }

    /// The green plane, mutable.
    pub fn green_mut(&mut self) -> &mut [u8] {
        &mut self.green
    }

    /// The blue plane, mutable.
    pub fn blue_mut(&mut self) -> &mut [u8] {
        &mut self.blue
    }
}

/// Convert a band-interleaved RGBA/BGRA pixel buffer into separate planar
/// channels, in A, R, G, B order (the order the file format writes channels
/// in for a layer that carries transparency).
pub fn deinterleave(pixels: &[u8], order: ChannelOrder, width: u32, height: u32) -> [Vec<u8>; 4] {
    let count = (width as usize) * (height as usize);
    let mut alpha = Vec::with_capacity(count);
    let mut red = Vec::with_capacity(count);
    let mut green = Vec::with_capacity(count);
    let mut blue = Vec::with_capacity(count);

    for pixel in pixels.chunks(4) {
        let (r, g, b, a) = match order {
            ChannelOrder::Rgba => (pixel[0], pixel[1], pixel[2], pixel[3]),
            ChannelOrder::Bgra => (pixel[2], pixel[1], pixel[0], pixel[3]),
        };
        alpha.push(a);
        red.push(r);
        green.push(g);
        blue.push(b);
    }

    [alpha, red, green, blue]
}
