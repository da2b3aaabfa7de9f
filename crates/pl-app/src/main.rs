use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use clap::Parser;
use pl_core::config::ConversionConfig;

pub mod cli;
pub mod export;
pub mod hotreload;
pub mod session;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config, puis les overrides CLI
    let overrides = cli.overrides();
    let mut config = resolve_config(&cli)?;
    overrides.apply(&mut config)?;
    let config = Arc::new(ArcSwap::from_pointee(config));

    // 4. Image source
    let mut session = session::Session::default();
    session.load_image(&cli.image)?;
    let session = Arc::new(session);

    // 5. Conversion + exports
    let plan = cli.export_plan();
    let converted = session.reconvert(&config.load());
    let exported = run_once(&session, &plan, converted.is_ok());

    if !cli.watch {
        converted?;
        return exported;
    }

    // 6. Hot-reload : la config est relue à chaque modification
    let ctx = Arc::new(hotreload::ReloadContext {
        config_path: cli.config.clone(),
        config,
        session,
        overrides,
        plan,
    });
    let _watcher = hotreload::spawn_config_watcher(ctx)?;
    log::warn!("Mode --watch actif. Ctrl-C pour quitter.");
    loop {
        std::thread::park();
    }
}

fn run_once(session: &session::Session, plan: &export::ExportPlan, converted: bool) -> Result<()> {
    if !converted {
        return Ok(());
    }
    let result = session.result();
    if let Some(r) = result.as_deref() {
        log::info!(
            "Grille {}×{} ({} marques pen 1, {} marques pen 2)",
            r.geometry.columns,
            r.geometry.rows,
            r.pen1.mark_count(),
            r.pen2.mark_count()
        );
    }
    export::run_exports(result.as_deref(), plan)
}

/// Resolve config: the TOML file when present, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<ConversionConfig> {
    if cli.config.exists() {
        pl_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(ConversionConfig::default())
    }
}
