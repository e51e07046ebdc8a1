//! Community energy planner entry point: CLI wiring and mode selection.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, bail};
use tracing::{info, warn};

use colab_planner::cli::{self, CliOptions};
use colab_planner::config::PlannerConfig;
use colab_planner::io::export::export_curves_csv;
use colab_planner::model::curve::LoadCurveGenerator;
use colab_planner::model::kpi::project;
use colab_planner::telemetry::{self, LogTarget};

/// Log file used while the terminal UI owns the screen.
const TUI_LOG_FILE: &str = "colab-planner.log";

fn load_config(opts: &CliOptions) -> anyhow::Result<PlannerConfig> {
    let mut config = match &opts.config {
        Some(path) => PlannerConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PlannerConfig::from_preset(opts.preset_name())?,
    };

    if let Some(pct) = opts.participation {
        config.strategy.participation_pct = pct;
    }
    if let Some(seed) = opts.seed {
        config.chart.seed = Some(seed);
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            warn!(field = %e.field, "{}", e.message);
        }
        let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("invalid configuration:\n{}", joined.join("\n"));
    }
    Ok(config)
}

#[cfg(feature = "tui")]
fn run_tui(config: PlannerConfig) -> anyhow::Result<()> {
    use colab_planner::app::App;
    use colab_planner::flows::clipboard::MemoryClipboard;
    use colab_planner::flows::store::JsonFileStore;

    let store = JsonFileStore::new(config.storage.path.clone());
    let app = App::new(config, Box::new(store), Box::new(MemoryClipboard::new()));
    colab_planner::tui::run(app).context("terminal UI failed")
}

#[cfg(not(feature = "tui"))]
fn run_tui(_config: PlannerConfig) -> anyhow::Result<()> {
    bail!("--tui requires building with `--features tui`")
}

#[cfg(feature = "api")]
fn run_api(config: &PlannerConfig, port: u16) -> anyhow::Result<()> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use colab_planner::api::{self, AppState};

    let state = Arc::new(AppState::from_config(config));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(api::serve(state, addr))
        .with_context(|| format!("API server on {addr} failed"))
}

#[cfg(not(feature = "api"))]
fn run_api(_config: &PlannerConfig, _port: u16) -> anyhow::Result<()> {
    bail!("--serve requires building with `--features api`")
}

fn main() -> anyhow::Result<()> {
    let opts = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(2);
        }
    };
    if opts.help {
        cli::print_usage();
        return Ok(());
    }

    let target = if opts.tui {
        LogTarget::File(PathBuf::from(TUI_LOG_FILE))
    } else {
        LogTarget::Stderr
    };
    telemetry::init(&target).context("failed to set up logging")?;

    let config = load_config(&opts)?;
    info!(
        participation = config.strategy.participation_pct,
        seed = ?config.chart.seed,
        "configuration loaded"
    );

    if let Some(path) = &opts.curves_out {
        let curves = LoadCurveGenerator::from_seed_option(config.chart.seed).generate();
        export_curves_csv(&curves, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("Load curves written to {}", path.display());
    }

    if opts.tui {
        return run_tui(config);
    }
    if opts.serve {
        return run_api(&config, opts.port);
    }

    println!("{}", project(&config.strategy.to_inputs()));
    Ok(())
}
