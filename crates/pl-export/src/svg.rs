use std::path::Path;

use anyhow::{Context, Result};
use pl_ascii::ConversionResult;
use pl_core::color::CellColor;
use pl_core::frame::CharGrid;
use pl_core::geometry::GridGeometry;

use crate::preview::{PEN1_SVG_COLOR, PEN2_SVG_COLOR, PreviewMode};
use crate::{ExportError, require_color};

/// Which pen path a single-path SVG holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pen {
    /// Cells brighter than the threshold.
    One,
    /// The complementary cells.
    Two,
}

/// Escape `< > & ' "` for text content and attributes.
///
/// # Example
/// ```
/// use pl_export::svg::escape_xml;
/// assert_eq!(escape_xml("<&>"), "&lt;&amp;&gt;");
/// ```
#[must_use]
pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_char(c: char) -> String {
    let mut buf = [0u8; 4];
    escape_xml(c.encode_utf8(&mut buf))
}

/// Opening `<svg>` tag: px in Auto, mm on fixed media, viewBox in canvas px.
fn svg_open(geometry: &GridGeometry) -> String {
    let (vw, vh) = (geometry.canvas_width_px, geometry.canvas_height_px);
    let (w, h, unit) = match geometry.physical_size_mm {
        Some((mm_w, mm_h)) => (mm_w.to_string(), mm_h.to_string(), "mm"),
        None => (vw.to_string(), vh.to_string(), "px"),
    };
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}{unit}" height="{h}{unit}" viewBox="0 0 {vw} {vh}">"#
    )
}

fn background(geometry: &GridGeometry) -> String {
    format!(
        r#"<rect width="{}" height="{}" fill="black"/>"#,
        geometry.canvas_width_px, geometry.canvas_height_px
    )
}

fn font_size(geometry: &GridGeometry) -> f32 {
    geometry.font_size_px.max(1.0)
}

/// Black background plus one self-styled `<text>` per non-blank cell.
fn colored_svg(grid: &CharGrid, geometry: &GridGeometry) -> String {
    let size = font_size(geometry);
    let mut parts = vec![svg_open(geometry), background(geometry)];
    for (col, row, cell) in grid.marks() {
        let (x, y) = geometry.cell_origin(col, row);
        let fill = match cell.color {
            CellColor::Transparent => "white".to_string(),
            color => color.to_string(),
        };
        parts.push(format!(
            r#"<text x="{x}" y="{y}" font-family="monospace" font-size="{size}" fill="{fill}" dominant-baseline="text-before-edge">{}</text>"#,
            escape_char(cell.ch)
        ));
    }
    parts.push("</svg>".into());
    parts.join("\n")
}

/// Full grid in its own colors.
///
/// # Example
/// ```
/// use pl_ascii::convert;
/// use pl_core::config::ConversionConfig;
/// use pl_core::frame::FrameBuffer;
/// use pl_export::svg::full_svg;
/// let result = convert(&FrameBuffer::filled(40, 40, (255, 255, 255)), &ConversionConfig::default()).unwrap();
/// let svg = full_svg(&result);
/// assert!(svg.starts_with("<svg"));
/// assert!(svg.ends_with("</svg>"));
/// ```
#[must_use]
pub fn full_svg(result: &ConversionResult) -> String {
    colored_svg(&result.full, &result.geometry)
}

/// One pen path in its own colors, on black.
///
/// # Errors
/// `ExportError::Precondition` for a grayscale conversion.
pub fn path_svg(result: &ConversionResult, pen: Pen) -> Result<String, ExportError> {
    let grid = match pen {
        Pen::One => {
            require_color(result, "Path 1 SVG")?;
            &result.pen1
        }
        Pen::Two => {
            require_color(result, "Path 2 SVG")?;
            &result.pen2
        }
    };
    Ok(colored_svg(grid, &result.geometry))
}

/// Two-pen plotter document: no background, one `<g>` per pen.
///
/// A pen with no marks gets no group.
///
/// # Errors
/// `ExportError::Precondition` for a grayscale conversion.
pub fn plotter_svg(result: &ConversionResult) -> Result<String, ExportError> {
    require_color(result, "2-Color Plotter SVG")?;
    let geometry = &result.geometry;
    let size = font_size(geometry);

    let mut parts = vec![svg_open(geometry)];
    for (grid, ink) in [(&result.pen1, PEN1_SVG_COLOR), (&result.pen2, PEN2_SVG_COLOR)] {
        let texts: String = grid
            .marks()
            .map(|(col, row, cell)| {
                let (x, y) = geometry.cell_origin(col, row);
                format!("\n<text x=\"{x}\" y=\"{y}\">{}</text>", escape_char(cell.ch))
            })
            .collect();
        if texts.is_empty() {
            continue;
        }
        parts.push(format!(
            r#"<g fill="{ink}" font-family="monospace" font-size="{size}" dominant-baseline="text-before-edge">{texts}"#
        ));
        parts.push("</g>".into());
    }
    parts.push("</svg>".into());
    Ok(parts.join("\n"))
}

/// SVG matching the preview: Dual → plotter document, otherwise full grid.
///
/// # Errors
/// `ExportError::Precondition` for Dual on a grayscale conversion.
pub fn current_view_svg(result: &ConversionResult, mode: PreviewMode) -> Result<String, ExportError> {
    match mode {
        PreviewMode::Dual => plotter_svg(result),
        PreviewMode::Single | PreviewMode::Path1 | PreviewMode::Path2 => Ok(full_svg(result)),
    }
}

/// Write an already-built SVG document.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_svg(svg: &str, path: &Path) -> Result<()> {
    std::fs::write(path, svg).with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!("SVG exporté : {}", path.display());
    Ok(())
}
