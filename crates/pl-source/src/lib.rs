/// Image sources for plotscii: decode files or in-memory bytes into RGBA frames.

pub mod image;

pub use crate::image::{decode_image, load_image};
