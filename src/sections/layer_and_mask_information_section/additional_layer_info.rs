//! Additional layer info blocks: small, tagged, key/value records appended
//! to a layer record (and, for the document-level trio, after the global
//! layer mask info).
//!
//! Modelled as a closed tagged variant, not a trait-object hierarchy — the
//! set of keys this writer emits is fixed, so a `match` in `write` and
//! `total_length` is simpler than a vtable for a handful of cases.

use std::io::{Seek, Write};

use crate::buffer::{PsdBuffer, PsdSerialize};

const SIGNATURE: &[u8; 4] = b"8BIM";

/// `shmd`'s fixed metadata header. No length prefix is written for this key.
const SHMD_PAYLOAD: [u8; 8] = [0x00, 0x00, 0x00, 0x48, 0x00, 0x00, 0x00, 0x01];

/// `cust`'s undocumented preamble, copied verbatim. Unknown purpose, but it
/// does not vary between files; only the timestamp that follows it does.
const CUST_PREAMBLE: [u8; 51] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x34, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x01,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x08, 0x6D, 0x65, 0x74, 0x61, 0x64, 0x61, 0x74, 0x61, 0x00, 0x00,
    0x00, 0x01, 0x00, 0x00, 0x00, 0x09, 0x6C, 0x61, 0x79, 0x65, 0x72, 0x54, 0x69, 0x6D, 0x65, 0x64,
    0x6F, 0x75, 0x62,
];

/// The `cinf` descriptor blob: undocumented Adobe descriptor structures,
/// kept opaque and emitted verbatim.
const CINF_PAYLOAD: [u8; 452] = [
    0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x6E, 0x75,
    0x6C, 0x6C, 0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00, 0x00, 0x56, 0x72, 0x73, 0x6E, 0x4F, 0x62,
    0x6A, 0x63, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x6E, 0x75, 0x6C, 0x6C,
    0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0x05, 0x6D, 0x61, 0x6A, 0x6F, 0x72, 0x6C, 0x6F, 0x6E,
    0x67, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x05, 0x6D, 0x69, 0x6E, 0x6F, 0x72, 0x6C, 0x6F,
    0x6E, 0x67, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0x03, 0x66, 0x69, 0x78, 0x6C, 0x6F, 0x6E,
    0x67, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x09, 0x70, 0x73, 0x56, 0x65, 0x72, 0x73, 0x69,
    0x6F, 0x6E, 0x4F, 0x62, 0x6A, 0x63, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x6E, 0x75, 0x6C, 0x6C, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0x05, 0x6D, 0x61, 0x6A, 0x6F,
    0x72, 0x6C, 0x6F, 0x6E, 0x67, 0x00, 0x00, 0x00, 0x15, 0x00, 0x00, 0x00, 0x05, 0x6D, 0x69, 0x6E,
    0x6F, 0x72, 0x6C, 0x6F, 0x6E, 0x67, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x03, 0x66, 0x69,
    0x78, 0x6C, 0x6F, 0x6E, 0x67, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x0B, 0x64, 0x65, 0x73,
    0x63, 0x72, 0x69, 0x70, 0x74, 0x69, 0x6F, 0x6E, 0x54, 0x45, 0x58, 0x54, 0x00, 0x00, 0x00, 0x01,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x06, 0x72, 0x65, 0x61, 0x73, 0x6F, 0x6E, 0x54, 0x45, 0x58, 0x54,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x45, 0x6E, 0x67, 0x6E, 0x65, 0x6E,
    0x75, 0x6D, 0x00, 0x00, 0x00, 0x00, 0x45, 0x6E, 0x67, 0x6E, 0x00, 0x00, 0x00, 0x08, 0x63, 0x6F,
    0x6D, 0x70, 0x43, 0x6F, 0x72, 0x65, 0x00, 0x00, 0x00, 0x0E, 0x65, 0x6E, 0x61, 0x62, 0x6C, 0x65,
    0x43, 0x6F, 0x6D, 0x70, 0x43, 0x6F, 0x72, 0x65, 0x65, 0x6E, 0x75, 0x6D, 0x00, 0x00, 0x00, 0x06,
    0x65, 0x6E, 0x61, 0x62, 0x6C, 0x65, 0x00, 0x00, 0x00, 0x07, 0x66, 0x65, 0x61, 0x74, 0x75, 0x72,
    0x65, 0x00, 0x00, 0x00, 0x11, 0x65, 0x6E, 0x61, 0x62, 0x6C, 0x65, 0x43, 0x6F, 0x6D, 0x70, 0x43,
    0x6F, 0x72, 0x65, 0x47, 0x50, 0x55, 0x65, 0x6E, 0x75, 0x6D, 0x00, 0x00, 0x00, 0x06, 0x65, 0x6E,
    0x61, 0x62, 0x6C, 0x65, 0x00, 0x00, 0x00, 0x07, 0x66, 0x65, 0x61, 0x74, 0x75, 0x72, 0x65, 0x00,
    0x00, 0x00, 0x0F, 0x63, 0x6F, 0x6D, 0x70, 0x43, 0x6F, 0x72, 0x65, 0x53, 0x75, 0x70, 0x70, 0x6F,
    0x72, 0x74, 0x65, 0x6E, 0x75, 0x6D, 0x00, 0x00, 0x00, 0x06, 0x72, 0x65, 0x61, 0x73, 0x6F, 0x6E,
    0x00, 0x00, 0x00, 0x09, 0x73, 0x75, 0x70, 0x70, 0x6F, 0x72, 0x74, 0x65, 0x64, 0x00, 0x00, 0x00,
    0x12, 0x63, 0x6F, 0x6D, 0x70, 0x43, 0x6F, 0x72, 0x65, 0x47, 0x50, 0x55, 0x53, 0x75, 0x70, 0x70,
    0x6F, 0x72, 0x74, 0x65, 0x6E, 0x75, 0x6D, 0x00, 0x00, 0x00, 0x06, 0x72, 0x65, 0x61, 0x73, 0x6F,
    0x6E, 0x00, 0x00, 0x00, 0x0F, 0x66, 0x65, 0x61, 0x74, 0x75, 0x72, 0x65, 0x44, 0x69, 0x73, 0x61,
    0x62, 0x6C, 0x65, 0x64,
];

/// `FMsk`'s fixed document-level payload.
const FMSK_PAYLOAD: [u8; 12] = [0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x32];

/// One required per-layer additional-info block.
#[derive(Debug, Clone)]
pub enum LayerAdditionalInfo {
    /// Unicode layer name.
    Luni(String),
    /// Layer name source: the background layer is `bgnd`, others `layr`.
    Lnsr { is_background: bool },
    /// 1-based layer id.
    Lyid(u32),
    /// Section divider clipping flag: always `1, 0, 0, 0` here.
    Clbl,
    /// Blend interior elements: always zeroed.
    Infx,
    /// Knockout setting: always zeroed.
    Knko,
    /// Protect transparency/composite/position: set on the background only.
    Lspf { is_background: bool },
    /// Sheet colour: always "no colour".
    Lclr,
    /// Metadata header. No length prefix.
    Shmd,
    /// Undocumented timestamp block. No length prefix.
    Cust { created_at_unix_seconds: f64 },
    /// Reference point: the layer's (x, y) origin.
    Fxrp { x: f64, y: f64 },
}

impl LayerAdditionalInfo {
    fn key(&self) -> &'static [u8; 4] {
        match self {
            LayerAdditionalInfo::Luni(_) => b"luni",
            LayerAdditionalInfo::Lnsr { .. } => b"lnsr",
            LayerAdditionalInfo::Lyid(_) => b"lyid",
            LayerAdditionalInfo::Clbl => b"clbl",
            LayerAdditionalInfo::Infx => b"infx",
            LayerAdditionalInfo::Knko => b"knko",
            LayerAdditionalInfo::Lspf { .. } => b"lspf",
            LayerAdditionalInfo::Lclr => b"lclr",
            LayerAdditionalInfo::Shmd => b"shmd",
            LayerAdditionalInfo::Cust { .. } => b"cust",
            LayerAdditionalInfo::Fxrp { .. } => b"fxrp",
        }
    }

    /// Whether this key omits its length u32 prefix.
    fn omits_length_prefix(&self) -> bool {
        matches!(self, LayerAdditionalInfo::Shmd | LayerAdditionalInfo::Cust { .. })
    }

    fn payload_length(&self) -> u32 {
        match self {
            LayerAdditionalInfo::Luni(name) => {
                let units = name.encode_utf16().count() as u32;
                let padding = if units % 2 != 0 { 2 } else { 0 };
                4 + units * 2 + padding
            }
            LayerAdditionalInfo::Lnsr { .. } => 4,
            LayerAdditionalInfo::Lyid(_) => 4,
            LayerAdditionalInfo::Clbl => 4,
            LayerAdditionalInfo::Infx => 4,
            LayerAdditionalInfo::Knko => 4,
            LayerAdditionalInfo::Lspf { .. } => 4,
            LayerAdditionalInfo::Lclr => 8,
            LayerAdditionalInfo::Shmd => SHMD_PAYLOAD.len() as u32,
            LayerAdditionalInfo::Cust { .. } => CUST_PREAMBLE.len() as u32 + 8 + 1,
            LayerAdditionalInfo::Fxrp { .. } => 16,
        }
    }

    /// Total on-disk size: signature + key + (length prefix, unless omitted) + payload.
    pub fn total_length(&self) -> u32 {
        let header = if self.omits_length_prefix() { 8 } else { 12 };
        header + self.payload_length()
    }

    fn write_payload<T>(&self, buf: &mut PsdBuffer<T>)
    where
        T: Write + Seek,
    {
        match self {
            LayerAdditionalInfo::Luni(name) => buf.write_unicode_string(name),
            LayerAdditionalInfo::Lnsr { is_background } => {
                buf.write(if *is_background { b"bgnd" } else { b"layr" })
            }
            LayerAdditionalInfo::Lyid(id) => buf.write_u32(*id),
            LayerAdditionalInfo::Clbl => buf.write([1u8, 0, 0, 0]),
            LayerAdditionalInfo::Infx => buf.write([0u8; 4]),
            LayerAdditionalInfo::Knko => buf.write([0u8; 4]),
            LayerAdditionalInfo::Lspf { is_background } => {
                buf.write_u32(if *is_background { 0x0000000D } else { 0 })
            }
            LayerAdditionalInfo::Lclr => buf.write([0u8; 8]),
            LayerAdditionalInfo::Shmd => buf.write(SHMD_PAYLOAD),
            LayerAdditionalInfo::Cust {
                created_at_unix_seconds,
            } => {
                buf.write(CUST_PREAMBLE);
                buf.write_f64(*created_at_unix_seconds);
                buf.write_u8(0);
            }
            LayerAdditionalInfo::Fxrp { x, y } => {
                buf.write_f64(*x);
                buf.write_f64(*y);
            }
        }
    }
}

impl PsdSerialize for LayerAdditionalInfo {
    fn write<T>(&self, buffer: &mut PsdBuffer<T>)
    where
        T: Write + Seek,
    {
        buffer.write(SIGNATURE);
        buffer.write(self.key());
        if self.omits_length_prefix() {
            self.write_payload(buffer);
        } else {
            buffer.write_sized(|buf| self.write_payload(buf));
        }
    }
}

/// A required document-level additional-info block, emitted after the
/// global layer mask info.
#[derive(Debug, Clone, Copy)]
pub enum DocumentAdditionalInfo {
    /// Empty pattern list.
    Patt,
    /// Fixed 12-byte filter mask payload.
    Fmsk,
    /// The opaque ~400-byte descriptor blob.
    Cinf,
}

impl PsdSerialize for DocumentAdditionalInfo {
    fn write<T>(&self, buffer: &mut PsdBuffer<T>)
    where
        T: Write + Seek,
    {
        buffer.write(SIGNATURE);
        match self {
            DocumentAdditionalInfo::Patt => {
                buffer.write(b"Patt");
                buffer.write_sized(|_buf| {});
            }
            DocumentAdditionalInfo::Fmsk => {
                buffer.write(b"FMsk");
                buffer.write_sized(|buf| buf.write(FMSK_PAYLOAD));
            }
            DocumentAdditionalInfo::Cinf => {
                buffer.write(b"cinf");
                buffer.write_sized(|buf| buf.write(CINF_PAYLOAD));
            }
        }
    }
}
