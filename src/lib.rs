//! Compose layered RGB images and write them out as PSD files.
//!
//! You are encouraged to read the PSD specification before contributing to
//! this codebase. This will help you better understand the current approach
//! and discover ways to improve it.
//!
//! psd spec: <https://www.adobe.com/devnet-apps/photoshop/fileformatashtml/>
//!
//! ## PSB Support
//!
//! We do not currently support PSB (files at or above 2GiB). If you'd like
//! to support PSB please open an issue.

#![deny(missing_docs)]

mod buffer;
mod compositor;
mod document;
mod error;
mod image_store;
mod packbits;
mod sections;

pub use crate::compositor::ChannelOrder;
pub use crate::document::{Document, Rgb8};
pub use crate::error::{PsdWriterError, Status};
pub use crate::image_store::Compression;
pub use crate::sections::image_resources_section::Orientation;
pub use crate::sections::layer_and_mask_information_section::LayerRect;
