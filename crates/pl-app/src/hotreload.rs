use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use pl_core::config::ConversionConfig;

use crate::cli::Overrides;
use crate::export::{ExportPlan, run_exports};
use crate::session::Session;

/// Everything a reload needs, shared with the watcher thread.
pub struct ReloadContext {
    pub config_path: PathBuf,
    pub config: Arc<ArcSwap<ConversionConfig>>,
    pub session: Arc<Session>,
    pub overrides: Overrides,
    pub plan: ExportPlan,
}

impl ReloadContext {
    /// Reload the config file, re-convert and re-export.
    ///
    /// A bad config keeps the previous one.
    ///
    /// # Errors
    /// Returns an error if the config is invalid or the conversion or an export fails.
    pub fn reload(&self) -> Result<()> {
        let mut next = pl_core::config::load_config(&self.config_path)?;
        self.overrides.apply(&mut next)?;
        self.config.store(Arc::new(next));
        log::info!("Config rechargée depuis {}", self.config_path.display());

        let config = self.config.load();
        self.session.reconvert(&config)?;
        run_exports(self.session.result().as_deref(), &self.plan)
    }
}

/// Lance un thread qui surveille le fichier config et relance conversion + exports.
///
/// Retourne le Watcher (doit rester vivant tant que l'app tourne).
/// Events are handled in order, so the last write wins.
///
/// # Errors
/// Returns an error if the watcher cannot be created or the path cannot be watched.
pub fn spawn_config_watcher(ctx: Arc<ReloadContext>) -> Result<impl Watcher + use<>> {
    let watched = ctx.config_path.clone();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res {
            if matches!(event.kind, EventKind::Modify(_)) {
                if let Err(e) = ctx.reload() {
                    log::warn!("Erreur de rechargement : {e:#}");
                    // On garde l'ancienne config. Pas de panic.
                }
            }
        }
    })?;

    watcher.watch(&watched, RecursiveMode::NonRecursive)?;
    log::info!("Surveillance de {}", watched.display());
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_core::frame::FrameBuffer;
    use std::path::Path;

    fn context(dir: &Path, toml: &str) -> ReloadContext {
        let config_path = dir.join("plotscii.toml");
        std::fs::write(&config_path, toml).unwrap();
        let mut session = Session::default();
        session.set_image(FrameBuffer::filled(100, 80, (128, 128, 128)));
        ReloadContext {
            config_path,
            config: Arc::new(ArcSwap::from_pointee(ConversionConfig::default())),
            session: Arc::new(session),
            overrides: Overrides::default(),
            plan: ExportPlan {
                text: Some(dir.join("ascii-art.txt")),
                ..ExportPlan::default()
            },
        }
    }

    #[test]
    fn reload_applies_new_config_and_reexports() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), "[media]\nsize = \"a4\"\n");
        ctx.reload().unwrap();
        assert!(ctx.config.load().media.pixel_size().is_some());
        let result = ctx.session.result().unwrap();
        assert!(result.geometry.is_fixed_media());
        assert!(dir.path().join("ascii-art.txt").exists());
    }

    #[test]
    fn bad_config_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), "[conversion\nbroken");
        assert!(ctx.reload().is_err());
        assert_eq!(**ctx.config.load(), ConversionConfig::default());
    }

    #[test]
    fn overrides_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path(), "[conversion]\ninverted = false\n");
        ctx.overrides.invert = true;
        ctx.reload().unwrap();
        assert!(ctx.config.load().inverted);
    }
}
