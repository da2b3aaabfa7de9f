use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use pl_ascii::ConversionResult;
use pl_export::rasterizer::{Rasterizer, save_raster};
use pl_export::svg::{self, Pen};
use pl_export::{ExportError, PreviewMode, require_result, text};

/// Output files requested on the command line.
#[derive(Clone, Debug, Default)]
pub struct ExportPlan {
    pub text: Option<PathBuf>,
    pub raster: Option<PathBuf>,
    pub svg: Option<PathBuf>,
    pub plotter_svg: Option<PathBuf>,
    pub path1_svg: Option<PathBuf>,
    pub path2_svg: Option<PathBuf>,
    pub font: Option<PathBuf>,
    pub preview: PreviewMode,
}

impl ExportPlan {
    /// True when no output was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.raster.is_none()
            && self.svg.is_none()
            && self.plotter_svg.is_none()
            && self.path1_svg.is_none()
            && self.path2_svg.is_none()
    }
}

/// Write every requested output from `result`.
///
/// Each export is attempted; failures are logged and counted.
///
/// # Errors
/// Returns an error if any export failed.
pub fn run_exports(result: Option<&ConversionResult>, plan: &ExportPlan) -> Result<()> {
    if plan.is_empty() {
        log::info!("Aucun export demandé");
        return Ok(());
    }
    let mut failures = 0usize;
    let mut attempt = |what: &str, outcome: Result<()>| {
        if let Err(e) = outcome {
            log::error!("Export {what} échoué : {e:#}");
            failures += 1;
        }
    };

    if let Some(path) = &plan.text {
        let outcome = require_result(result)
            .map_err(anyhow::Error::from)
            .and_then(|r| text::write_text(&r.full, path));
        attempt("texte", outcome);
    }
    if let Some(path) = &plan.raster {
        attempt("raster", export_raster(result, plan, path));
    }
    if let Some(path) = &plan.svg {
        attempt(
            "SVG",
            write_svg_with(result, path, |r| svg::current_view_svg(r, plan.preview)),
        );
    }
    if let Some(path) = &plan.plotter_svg {
        attempt("SVG traceur", write_svg_with(result, path, svg::plotter_svg));
    }
    if let Some(path) = &plan.path1_svg {
        attempt("SVG path 1", write_svg_with(result, path, |r| svg::path_svg(r, Pen::One)));
    }
    if let Some(path) = &plan.path2_svg {
        attempt("SVG path 2", write_svg_with(result, path, |r| svg::path_svg(r, Pen::Two)));
    }

    if failures > 0 {
        bail!("{failures} export(s) échoué(s)");
    }
    Ok(())
}

fn write_svg_with(
    result: Option<&ConversionResult>,
    path: &Path,
    build: impl FnOnce(&ConversionResult) -> Result<String, ExportError>,
) -> Result<()> {
    let doc = build(require_result(result)?)?;
    svg::write_svg(&doc, path)
}

fn export_raster(result: Option<&ConversionResult>, plan: &ExportPlan, path: &Path) -> Result<()> {
    let result = require_result(result)?;
    let Some(font) = &plan.font else {
        return Err(ExportError::Precondition(
            "raster export needs a TrueType/OpenType font; pass --font".into(),
        )
        .into());
    };
    let mut raster = Rasterizer::from_file(font)?;
    let img = raster.render(result, plan.preview)?;
    save_raster(&img, path)
}
