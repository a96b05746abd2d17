//! The image resources section: resolution, optional ICC profile, and the
//! grid & guides block.

use std::io::{Seek, Write};

use crate::buffer::{PsdBuffer, PsdSerialize};

const RESOURCE_SIGNATURE: &[u8; 4] = b"8BIM";
const RESOURCE_ID_RESOLUTION_INFO: u16 = 1005;
const RESOURCE_ID_ICC_PROFILE: u16 = 1039;
const RESOURCE_ID_GRID_AND_GUIDES: u16 = 1032;

/// Write one `8BIM`-prefixed image resource block: signature, id, an empty
/// (unnamed) Pascal name, a length prefix, and the body, padded to an even
/// length.
fn write_resource_block<T, F>(buffer: &mut PsdBuffer<T>, id: u16, body: F)
where
    T: Write + Seek,
    F: FnOnce(&mut PsdBuffer<T>),
{
    buffer.write(RESOURCE_SIGNATURE);
    buffer.write_u16(id);
    buffer.write([0u8, 0u8]); // empty Pascal name: 1 length byte + 1 pad byte
    let start = buffer.position();
    buffer.write_sized(body);
    let end = buffer.position();
    if (end - start - 4) % 2 != 0 {
        buffer.write_u8(0);
    }
}

/// Resolution in pixels-per-inch, stored as Adobe's 16.16 fixed-point Fixed
/// type: an integer part and a fractional part scaled by 65536.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionInfo {
    /// Horizontal resolution, integer part.
    pub h_res_int: u16,
    /// Horizontal resolution, fractional part scaled by 65536.
    pub h_res_frac: u16,
    /// Vertical resolution, integer part.
    pub v_res_int: u16,
    /// Vertical resolution, fractional part scaled by 65536.
    pub v_res_frac: u16,
}

impl ResolutionInfo {
    /// 72 PPI, the default resolution for a newly created document.
    pub fn from_ppi(ppi: f64) -> Self {
        let int_part = ppi.floor() as u16;
        let frac_part = ((ppi - ppi.floor()) * 65536.0).round() as u16;
        ResolutionInfo {
            h_res_int: int_part,
            h_res_frac: frac_part,
            v_res_int: int_part,
            v_res_frac: frac_part,
        }
    }
}

impl PsdSerialize for ResolutionInfo {
    fn write<T>(&self, buffer: &mut PsdBuffer<T>)
    where
        T: Write + Seek,
    {
        write_resource_block(buffer, RESOURCE_ID_RESOLUTION_INFO, |buf| {
            buf.write_u16(self.h_res_int);
            buf.write_u16(self.h_res_frac);
            buf.write_u16(1); // hResUnit: pixels/inch
            buf.write_u16(2); // widthUnit: cm
            buf.write_u16(self.v_res_int);
            buf.write_u16(self.v_res_frac);
            buf.write_u16(1); // vResUnit: pixels/inch
            buf.write_u16(2); // heightUnit: cm
        });
    }
}

/// An embedded ICC colour profile, carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IccProfile {
    /// The profile file's raw bytes, carried verbatim.
    pub bytes: Vec<u8>,
}

impl PsdSerialize for IccProfile {
    fn write<T>(&self, buffer: &mut PsdBuffer<T>)
    where
        T: Write + Seek,
    {
        write_resource_block(buffer, RESOURCE_ID_ICC_PROFILE, |buf| {
            buf.write(&self.bytes);
        });
    }
}

/// A single guide line: position scaled by 32, and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guide {
    /// Position in pixels from the canvas origin (scaled by 32 on write).
    pub position: i32,
    /// Which axis the guide runs along.
    pub orientation: Orientation,
}

/// A guide's axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// A vertical guide, running top to bottom.
    Vertical,
    /// A horizontal guide, running left to right.
    Horizontal,
}

impl Orientation {
    fn code(self) -> u8 {
        match self {
            Orientation::Vertical => 0,
            Orientation::Horizontal => 1,
        }
    }
}

/// The grid & guides block: a grid cycle plus an ordered list of guides, in
/// the order they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridAndGuides {
    /// Grid spacing, in the document's native tick units.
    pub grid_cycle: u32,
    /// Guides, in the order they were added.
    pub guides: Vec<Guide>,
}

impl Default for GridAndGuides {
    fn default() -> Self {
        GridAndGuides {
            grid_cycle: 576,
            guides: Vec::new(),
        }
    }
}

impl PsdSerialize for GridAndGuides {
    fn write<T>(&self, buffer: &mut PsdBuffer<T>)
    where
        T: Write + Seek,
    {
        write_resource_block(buffer, RESOURCE_ID_GRID_AND_GUIDES, |buf| {
            buf.write_u32(1); // version
            buf.write_u32(self.grid_cycle);
            buf.write_u32(self.grid_cycle);
            buf.write_u32(self.guides.len() as u32);
            for guide in &self.guides {
                buf.write_i32(guide.position * 32);
                buf.write_u8(guide.orientation.code());
            }
        });
    }
}

/// The image resources section as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResourcesSection {
    /// The document's resolution.
    pub resolution: ResolutionInfo,
    /// The document's embedded ICC colour profile, if any.
    pub icc_profile: Option<IccProfile>,
    /// The document's grid and guide settings.
    pub grid_and_guides: GridAndGuides,
}

impl PsdSerialize for ImageResourcesSection {
    fn write<T>(&self, buffer: &mut PsdBuffer<T>)
    where
        T: Write + Seek,
    {
        buffer.write_sized(|buf| {
            self.resolution.write(buf);
            if let Some(icc) = &self.icc_profile {
                icc.write(buf);
            }
            self.grid_and_guides.write(buf);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn resolution_from_ppi_splits_integer_and_fractional_parts() {
        let res = ResolutionInfo::from_ppi(72.0);
        assert_eq!(res.h_res_int, 72);
        assert_eq!(res.h_res_frac, 0);
    }

    #[test]
    fn resolution_fractional_part_round_trips() {
        let res = ResolutionInfo::from_ppi(72.5);
        assert_eq!(res.h_res_int, 72);
        assert_eq!(res.h_res_frac, 32768);
    }

    #[test]
    fn guide_position_is_scaled_by_32() {
        let guides = GridAndGuides {
            grid_cycle: 576,
            guides: vec![Guide {
                position: 10,
                orientation: Orientation::Vertical,
            }],
        };
        let mut bytes: Vec<u8> = vec![];
        let mut buffer = PsdBuffer::new(Cursor::new(&mut bytes));
        guides.write(&mut buffer);

        // position 10 * 32 = 320 appears somewhere in the written bytes.
        let expected = 320i32.to_be_bytes();
        assert!(bytes.windows(4).any(|w| w == expected));
    }
}
