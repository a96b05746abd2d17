//! End-to-end exercises of the public `Document` API, saving real files to
//! a temp directory and inspecting the raw bytes.

use anyhow::Result;
use psd_writer::{ChannelOrder, Compression, Document, LayerRect, Orientation, PsdWriterError, Rgb8, Status};
use std::io::Read;

fn read_file(path: &std::path::Path) -> Result<Vec<u8>> {
    let mut bytes = vec![];
    std::fs::File::open(path)?.read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[test]
fn minimum_one_pixel_document_has_a_valid_header() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("min.psd");

    let mut doc = Document::create(1, 1, Rgb8::WHITE);
    doc.save(&path, true)?;

    let bytes = read_file(&path)?;
    assert_eq!(&bytes[0..4], b"8BPS");
    assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]), 1); // version
    assert_eq!(u16::from_be_bytes([bytes[12], bytes[13]]), 3); // channel count
    assert_eq!(u32::from_be_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]), 1); // height
    assert_eq!(u32::from_be_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]), 1); // width
    assert_eq!(u16::from_be_bytes([bytes[22], bytes[23]]), 8); // depth
    assert_eq!(u16::from_be_bytes([bytes[24], bytes[25]]), 3); // RGB

    Ok(())
}

#[test]
fn dimensions_outside_range_are_clamped_not_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("clamped.psd");

    let mut doc = Document::create(0, 40_000, Rgb8::WHITE);
    doc.save(&path, true)?;

    let bytes = read_file(&path)?;
    assert_eq!(u32::from_be_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]), 30_000); // height
    assert_eq!(u32::from_be_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]), 1); // width

    Ok(())
}

#[test]
fn invalid_resolution_is_rejected_without_blocking_save() -> Result<()> {
    let mut doc = Document::create(4, 4, Rgb8::WHITE);
    assert!(matches!(doc.set_resolution(-1.0), Err(PsdWriterError::InvalidArgument(_))));
    assert_eq!(doc.status(), Status::InvalidArgument);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("still-saves.psd");
    doc.save(&path, true)?;
    assert_eq!(doc.status(), Status::Success);

    Ok(())
}

#[test]
fn saving_over_an_existing_file_requires_overwrite() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("exists.psd");
    std::fs::write(&path, b"not a psd")?;

    let mut doc = Document::create(4, 4, Rgb8::WHITE);
    assert!(matches!(doc.save(&path, false), Err(PsdWriterError::FileExists(_))));
    assert_eq!(std::fs::read(&path)?, b"not a psd");

    doc.save(&path, true)?;
    assert_ne!(std::fs::read(&path)?, b"not a psd");

    Ok(())
}

#[test]
fn two_layer_composite_saves_and_grows_the_layer_count() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("layers.psd");

    let mut doc = Document::create(2, 2, Rgb8::WHITE);
    let half_blue = [0u8, 0, 255, 128, 0, 0, 255, 128, 0, 0, 255, 128, 0, 0, 255, 128];
    doc.add_guide(10, Orientation::Vertical)?;
    doc.set_resolution(300.0)?;
    let rect = LayerRect { top: 0, left: 0, bottom: 2, right: 2 };
    doc.add_layer(&half_blue, rect, "Half-blue overlay", true, ChannelOrder::Bgra, Compression::Rle)?;

    doc.save(&path, true)?;

    let bytes = read_file(&path)?;
    assert!(bytes.len() > 26, "file must contain more than just the header");
    Ok(())
}

#[test]
fn layer_name_over_251_bytes_is_rejected() {
    let mut doc = Document::create(4, 4, Rgb8::WHITE);
    let too_long = "x".repeat(252);
    let pixels = vec![0u8; 4 * 4 * 4];
    let rect = LayerRect { top: 0, left: 0, bottom: 4, right: 4 };
    let result = doc.add_layer(&pixels, rect, &too_long, true, ChannelOrder::Rgba, Compression::None);
    assert!(matches!(result, Err(PsdWriterError::InvalidArgument(_))));
}
