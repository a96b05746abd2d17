//! The top-level [`Document`]: the public API surface, orchestrating the
//! image store, compositor, and section writers through `save`.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use log::{debug, trace};

use crate::buffer::{PsdBuffer, PsdSerialize};
use crate::compositor::{self, ChannelOrder};
use crate::error::{PsdWriterError, Status};
use crate::image_store::{ChannelData, ChannelKind, Compression, PlanarImage};
use crate::sections::color_mode_data_section::ColorModeDataSection;
use crate::sections::file_header_section::FileHeaderSection;
use crate::sections::image_resources_section::{
    GridAndGuides, Guide, IccProfile, ImageResourcesSection, Orientation, ResolutionInfo,
};
use crate::sections::layer_and_mask_information_section::{
    LayerAndMaskInformationSection, LayerRecord, LayerRect,
};
use crate::sections::image_data_section::ImageDataSection;

/// A solid 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8 {
    /// Red, 0-255.
    pub r: u8,
    /// Green, 0-255.
    pub g: u8,
    /// Blue, 0-255.
    pub b: u8,
}

impl Rgb8 {
    /// The default background colour the original writer used when a
    /// caller had no particular colour in mind.
    pub const WHITE: Rgb8 = Rgb8 { r: 255, g: 255, b: 255 };
}

/// The maximum output file size this writer will produce; larger outputs
/// are treated as a write failure and the partial file is deleted.
const MAX_FILE_SIZE: u64 = 2 * 1024 * 1024 * 1024;

/// A PSD document under construction: one background layer plus any number
/// of additional layers, composited into a single merged preview as they
/// are added.
#[derive(Debug)]
pub struct Document {
    width: u32,
    height: u32,
    resolution: ResolutionInfo,
    icc_profile: Option<IccProfile>,
    grid_and_guides: GridAndGuides,
    layers: Vec<LayerRecord>,
    merged: PlanarImage,
    next_layer_id: u32,
    status: Status,
}

impl Document {
    /// Create a new document: width/height are clamped to `[1, 30000]`, and
    /// one "Background" layer filled with `background` is seeded at index 0.
    pub fn create(width: u32, height: u32, background: Rgb8) -> Document {
        let header = FileHeaderSection::new(width, height);
        let width = header.width.get();
        let height = header.height.get();

        let merged = PlanarImage::solid(width, height, background.r, background.g, background.b);

        let background_planar = {
            let count = (width as usize) * (height as usize);
            (
                vec![background.r; count],
                vec![background.g; count],
                vec![background.b; count],
            )
        };

        let background_layer = LayerRecord {
            rect: LayerRect {
                top: 0,
                left: 0,
                bottom: height,
                right: width,
            },
            channels: vec![
                ChannelData::encode(ChannelKind::Red, &background_planar.0, width, height, Compression::Rle),
                ChannelData::encode(ChannelKind::Green, &background_planar.1, width, height, Compression::Rle),
                ChannelData::encode(ChannelKind::Blue, &background_planar.2, width, height, Compression::Rle),
            ],
            name: "Background".to_string(),
            layer_id: 1,
            is_background: true,
            visible: true,
            reference_point: (0.0, 0.0),
            created_at_unix_seconds: 0.0,
        };

        debug!("created document {}x{}", width, height);

        Document {
            width,
            height,
            resolution: ResolutionInfo::from_ppi(72.0),
            icc_profile: None,
            grid_and_guides: GridAndGuides::default(),
            layers: vec![background_layer],
            merged,
            next_layer_id: 2,
            status: Status::Success,
        }
    }

    /// The outcome of the most recent fallible call, or `Success` if none
    /// has failed yet.
    pub fn status(&self) -> Status {
        self.status
    }

    fn fail(&mut self, err: PsdWriterError) -> PsdWriterError {
        self.status = Status::from(&err);
        err
    }

    /// Set the document's resolution in pixels per inch. Requires
    /// `1 <= ppi < 30000`.
    pub fn set_resolution(&mut self, ppi: f64) -> Result<(), PsdWriterError> {
        if !(1.0..30000.0).contains(&ppi) {
            return Err(self.fail(PsdWriterError::InvalidArgument(format!(
                "resolution must be in [1, 30000), got {ppi}"
            ))));
        }
        self.resolution = ResolutionInfo::from_ppi(ppi);
        self.status = Status::Success;
        Ok(())
    }

    /// Read an ICC profile from disk and embed it verbatim.
    pub fn set_profile(&mut self, path: impl AsRef<Path>) -> Result<(), PsdWriterError> {
        match fs::read(path.as_ref()) {
            Ok(bytes) => {
                self.icc_profile = Some(IccProfile { bytes });
                self.status = Status::Success;
                Ok(())
            }
            Err(err) => Err(self.fail(PsdWriterError::NoProfile(err))),
        }
    }

    /// Append a guide line.
    pub fn add_guide(&mut self, position: i32, orientation: Orientation) -> Result<(), PsdWriterError> {
        self.grid_and_guides.guides.push(Guide { position, orientation });
        self.status = Status::Success;
        Ok(())
    }

    /// Append a layer. Requires `rect` to describe a non-empty area and a
    /// name no longer than 251 bytes. Composites into the merged preview iff
    /// `visible`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_layer(
        &mut self,
        pixels: &[u8],
        rect: LayerRect,
        name: &str,
        visible: bool,
        channel_order: ChannelOrder,
        compression: Compression,
    ) -> Result<(), PsdWriterError> {
        let w = rect.right.saturating_sub(rect.left);
        let h = rect.bottom.saturating_sub(rect.top);

        if w == 0 || h == 0 {
            return Err(self.fail(PsdWriterError::InvalidArgument(
                "layer width and height must both be greater than zero".to_string(),
            )));
        }
        if name.as_bytes().len() > 251 {
            return Err(self.fail(PsdWriterError::InvalidArgument(
                "layer name must be at most 251 bytes".to_string(),
            )));
        }

        let [alpha, red, green, blue] = crate::image_store::deinterleave(pixels, channel_order, w, h);

        let channels = vec![
            ChannelData::encode(ChannelKind::Alpha, &alpha, w, h, compression),
            ChannelData::encode(ChannelKind::Red, &red, w, h, compression),
            ChannelData::encode(ChannelKind::Green, &green, w, h, compression),
            ChannelData::encode(ChannelKind::Blue, &blue, w, h, compression),
        ];

        let layer_id = self.next_layer_id;
        self.next_layer_id += 1;

        let x = rect.left;
        let y = rect.top;

        self.layers.push(LayerRecord {
            rect,
            channels,
            name: name.to_string(),
            layer_id,
            is_background: false,
            visible,
            reference_point: (x as f64, y as f64),
            created_at_unix_seconds: 0.0,
        });

        if visible {
            compositor::composite_onto(&mut self.merged, pixels, channel_order, x, y, w, h);
        }

        trace!("added layer '{name}' at ({x}, {y}) {w}x{h}, visible={visible}");

        self.status = Status::Success;
        Ok(())
    }

    /// Serialize and write the document to `path`. If `overwrite` is false
    /// and `path` already exists, fails with `FileExistsError` without
    /// touching the file.
    pub fn save(&mut self, path: impl AsRef<Path>, overwrite: bool) -> Result<(), PsdWriterError> {
        let path = path.as_ref();

        if !overwrite && path.exists() {
            return Err(self.fail(PsdWriterError::FileExists(path.to_path_buf())));
        }

        let bytes = self.serialize();

        if bytes.len() as u64 >= MAX_FILE_SIZE {
            return Err(self.fail(PsdWriterError::FileWrite(std::io::Error::new(
                std::io::ErrorKind::Other,
                "output would exceed the 2 GiB size limit",
            ))));
        }

        match fs::write(path, &bytes) {
            Ok(()) => {
                debug!("wrote {} bytes to {}", bytes.len(), path.display());
                self.status = Status::Success;
                Ok(())
            }
            Err(err) => {
                let _ = fs::remove_file(path);
                Err(self.fail(PsdWriterError::FileWrite(err)))
            }
        }
    }

    fn serialize(&self) -> Vec<u8> {
        let mut buffer = PsdBuffer::new(Cursor::new(Vec::new()));

        FileHeaderSection::new(self.width, self.height).write(&mut buffer);
        ColorModeDataSection::default().write(&mut buffer);

        let image_resources = ImageResourcesSection {
            resolution: self.resolution,
            icc_profile: self.icc_profile.clone(),
            grid_and_guides: self.grid_and_guides.clone(),
        };
        image_resources.write(&mut buffer);

        let layer_and_mask_info = LayerAndMaskInformationSection {
            layers: self.layers.clone(),
        };
        layer_and_mask_info.write(&mut buffer);

        ImageDataSection::from_merged(&self.merged).write(&mut buffer);

        buffer.into_inner().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn minimum_document_round_trips_header_bytes() {
        let mut doc = Document::create(1, 1, Rgb8 { r: 0, g: 0, b: 0 });
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.psd");

        assert!(doc.save(&path, true).is_ok());

        let mut bytes = vec![];
        fs::File::open(&path).unwrap().read_to_end(&mut bytes).unwrap();
        assert_eq!(&bytes[0..12], &[0x38, 0x42, 0x50, 0x53, 0x00, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(u32::from_be_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]), 1);
        assert_eq!(u32::from_be_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]), 1);
    }

    #[test]
    fn resolution_validation() {
        let mut doc = Document::create(10, 10, Rgb8::WHITE);
        assert!(matches!(doc.set_resolution(0.0), Err(PsdWriterError::InvalidArgument(_))));
        assert_eq!(doc.status(), Status::InvalidArgument);
        assert!(doc.set_resolution(72.0).is_ok());
        assert_eq!(doc.status(), Status::Success);
        assert_eq!(doc.resolution.h_res_int, 72);
        assert_eq!(doc.resolution.h_res_frac, 0);
    }

    #[test]
    fn missing_profile_does_not_block_save() {
        let mut doc = Document::create(4, 4, Rgb8::WHITE);
        assert!(matches!(doc.set_profile("/does/not/exist"), Err(PsdWriterError::NoProfile(_))));
        assert_eq!(doc.status(), Status::NoProfileError);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.psd");
        assert!(doc.save(&path, true).is_ok());
        assert!(doc.icc_profile.is_none());
    }

    #[test]
    fn existing_file_without_overwrite_is_rejected() {
        let mut doc = Document::create(4, 4, Rgb8::WHITE);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.psd");
        fs::write(&path, b"existing").unwrap();

        assert!(matches!(doc.save(&path, false), Err(PsdWriterError::FileExists(_))));
        assert_eq!(fs::read(&path).unwrap(), b"existing");
    }

    #[test]
    fn layer_ordering_matches_add_layer_calls() {
        let mut doc = Document::create(2, 2, Rgb8::WHITE);
        let pixels = [0u8, 0, 255, 128, 0, 0, 255, 128, 0, 0, 255, 128, 0, 0, 255, 128];
        let rect = LayerRect { top: 0, left: 0, bottom: 2, right: 2 };
        doc.add_layer(&pixels, rect, "Layer 1", true, ChannelOrder::Bgra, Compression::Rle).unwrap();

        assert_eq!(doc.layers.len(), 2);
        assert_eq!(doc.layers[0].name, "Background");
        assert_eq!(doc.layers[1].name, "Layer 1");
    }

    #[test]
    fn add_layer_rejects_zero_dimensions() {
        let mut doc = Document::create(2, 2, Rgb8::WHITE);
        let rect = LayerRect { top: 0, left: 0, bottom: 1, right: 0 };
        let result = doc.add_layer(&[], rect, "Empty", true, ChannelOrder::Rgba, Compression::None);
        assert!(matches!(result, Err(PsdWriterError::InvalidArgument(_))));
        assert_eq!(doc.status(), Status::InvalidArgument);
        assert_eq!(doc.layers.len(), 1);
    }
}
