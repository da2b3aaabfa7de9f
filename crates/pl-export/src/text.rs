use std::path::Path;

use anyhow::{Context, Result};
use pl_core::frame::CharGrid;

/// Characters row by row, one `\n` after every row. Color is ignored.
///
/// # Example
/// ```
/// use pl_core::frame::{CharGrid, GridCell};
/// use pl_core::color::CellColor;
/// use pl_export::text::grid_to_text;
/// let mut grid = CharGrid::new(2, 2);
/// grid.set(1, 0, GridCell { ch: '@', color: CellColor::WHITE });
/// assert_eq!(grid_to_text(&grid), " @\n  \n");
/// ```
#[must_use]
pub fn grid_to_text(grid: &CharGrid) -> String {
    let mut out = String::with_capacity((grid.width as usize + 1) * grid.height as usize);
    for row in grid.rows() {
        out.extend(row.iter().map(|c| c.ch));
        out.push('\n');
    }
    out
}

/// Write [`grid_to_text`] to `path`.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_text(grid: &CharGrid, path: &Path) -> Result<()> {
    std::fs::write(path, grid_to_text(grid))
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!("Texte exporté : {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_core::color::CellColor;
    use pl_core::frame::GridCell;

    #[test]
    fn colored_cells_export_only_characters() {
        let mut grid = CharGrid::new(3, 1);
        grid.set(0, 0, GridCell { ch: '#', color: CellColor::Rgb(200, 10, 10) });
        grid.set(2, 0, GridCell { ch: '.', color: CellColor::Rgb(40, 40, 40) });
        assert_eq!(grid_to_text(&grid), "# .\n");
    }

    #[test]
    fn line_count_matches_rows() {
        let grid = CharGrid::new(5, 4);
        let text = grid_to_text(&grid);
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().all(|l| l.chars().count() == 5));
    }

    #[test]
    fn write_text_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ascii-art.txt");
        let mut grid = CharGrid::new(1, 1);
        grid.set(0, 0, GridCell { ch: '█', color: CellColor::WHITE });
        write_text(&grid, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "█\n");
    }
}
