//! The five major sections of a PSD file, written in order: file header,
//! colour mode data, image resources, layer and mask information, image
//! data.
//!
//! # [Adobe docs](https://www.adobe.com/devnet-apps/photoshop/fileformatashtml/)
//!
//! The Photoshop file format is divided into five major parts. The file
//! header has a fixed length; the other four sections are variable in
//! length and, apart from the final image data section, are prefixed with
//! a `u32` byte count.

pub mod color_mode_data_section;
pub mod file_header_section;
pub mod image_data_section;
pub mod image_resources_section;
pub mod layer_and_mask_information_section;
