/// Configuration, types, and shared structures for plotscii.
///
/// This crate contains all shared types and configuration logic
/// used across the plotscii workspace.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod media;

pub use charset::CharacterRamp;
pub use color::CellColor;
pub use config::ConversionConfig;
pub use error::{CoreError, GeometryError, ImageError};
pub use frame::{CharGrid, FrameBuffer, GridCell};
pub use geometry::GridGeometry;
pub use media::MediaMode;
