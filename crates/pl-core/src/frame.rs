use crate::color::CellColor;
use crate::error::ImageError;

/// Decoded source image. Read-only for the conversion engine.
///
/// Stocke les pixels en RGBA row-major, 4 bytes par pixel.
///
/// # Example
/// ```
/// use pl_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer noir transparent aux dimensions données.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Wrap an existing RGBA buffer.
    ///
    /// # Errors
    /// `ImageError::InvalidDimensions` if either side is zero,
    /// `ImageError::PixelAccess` if `data.len() != width × height × 4`.
    ///
    /// # Example
    /// ```
    /// use pl_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::from_rgba(1, 1, vec![9, 8, 7, 255]).unwrap();
    /// assert_eq!(fb.pixel(0, 0), (9, 8, 7, 255));
    /// assert!(FrameBuffer::from_rgba(0, 1, vec![]).is_err());
    /// ```
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ImageError::PixelAccess {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build an image from a row-major list of RGB pixels (alpha = 255).
    ///
    /// # Errors
    /// Same as [`FrameBuffer::from_rgba`].
    pub fn from_rgb_pixels(
        width: u32,
        height: u32,
        pixels: &[(u8, u8, u8)],
    ) -> Result<Self, ImageError> {
        let data = pixels
            .iter()
            .flat_map(|&(r, g, b)| [r, g, b, 255])
            .collect();
        Self::from_rgba(width, height, data)
    }

    /// Single-color image.
    #[must_use]
    pub fn filled(width: u32, height: u32, rgb: (u8, u8, u8)) -> Self {
        let mut fb = Self::new(width, height);
        for px in fb.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[rgb.0, rgb.1, rgb.2, 255]);
        }
        fb
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }
}

/// Single cell in a character grid.
///
/// # Example
/// ```
/// use pl_core::frame::GridCell;
/// let cell = GridCell::BLANK;
/// assert!(cell.is_blank());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    /// Caractère à afficher.
    pub ch: char,
    /// Couleur, ou `Transparent` pour « pas de trait ».
    pub color: CellColor,
}

impl GridCell {
    /// Blank pen-path cell: space, no color.
    pub const BLANK: Self = Self {
        ch: ' ',
        color: CellColor::Transparent,
    };

    /// True when the glyph is a space (nothing to draw).
    #[inline(always)]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.ch == ' '
    }
}

impl Default for GridCell {
    fn default() -> Self {
        Self::BLANK
    }
}

/// Rectangular character grid, row-major.
///
/// Built once per conversion and never mutated afterwards by readers.
///
/// # Example
/// ```
/// use pl_core::frame::{CharGrid, GridCell};
/// use pl_core::color::CellColor;
/// let mut grid = CharGrid::new(4, 2);
/// grid.set(3, 1, GridCell { ch: '@', color: CellColor::WHITE });
/// assert_eq!(grid.get(3, 1).ch, '@');
/// assert_eq!(grid.rows().count(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharGrid {
    /// Flat array of cells, row-major.
    pub cells: Vec<GridCell>,
    /// Width in characters.
    pub width: u32,
    /// Height in characters.
    pub height: u32,
}

impl CharGrid {
    /// Crée une grille de cellules vides.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![GridCell::BLANK; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set a cell at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, cell: GridCell) {
        self.cells[y as usize * self.width as usize + x as usize] = cell;
    }

    /// Get a cell reference at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> &GridCell {
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Row `y` as a slice.
    #[must_use]
    pub fn row(&self, y: u32) -> &[GridCell] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.cells[start..start + w]
    }

    /// Rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks_exact(self.width.max(1) as usize)
    }

    /// Non-blank cells with their (column, row) position.
    pub fn marks(&self) -> impl Iterator<Item = (u32, u32, &GridCell)> {
        let w = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_blank())
            .map(move |(i, c)| (i as u32 % w, i as u32 / w, c))
    }

    /// Count of non-blank cells.
    #[must_use]
    pub fn mark_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_blank()).count()
    }
}
