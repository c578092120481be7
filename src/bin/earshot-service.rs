use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info};

use earshot::models::{DEFAULT_MODEL, DEFAULT_MODEL_DIR, model_list_string, require_model};
use earshot::opts::DEFAULT_LANGUAGE;
use earshot::{Opts, Service, Transcriber, WhisperBackend};

#[derive(Parser, Debug)]
#[command(name = "earshot-service")]
#[command(about = "Transcribe length-prefixed f32 PCM frames from stdin to JSON lines on stdout")]
struct Params {
    /// Path to a whisper.cpp model file. Overrides `--model-size`.
    #[arg(short = 'm', long = "model")]
    model_path: Option<PathBuf>,

    /// Model size to load from `--model-dir` (see `--list-models`).
    #[arg(short = 's', long = "model-size", default_value = DEFAULT_MODEL)]
    model_size: String,

    /// Directory models are read from and downloaded into.
    #[arg(long = "model-dir", default_value = DEFAULT_MODEL_DIR)]
    model_dir: PathBuf,

    /// Fail instead of downloading a missing model.
    #[arg(long = "no-download", default_value_t = false)]
    no_download: bool,

    /// Language hint passed to the model; `auto` or "" detects it.
    #[arg(short = 'l', long = "language", default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// Allow half-precision attention.
    #[arg(long = "half-precision", default_value_t = false)]
    half_precision: bool,

    /// Allow GPU offload when whisper.cpp was built with GPU support.
    #[arg(long = "use-gpu", default_value_t = false)]
    use_gpu: bool,

    /// Answer a truncated frame with an error line instead of dropping it silently.
    #[arg(long = "report-truncated", default_value_t = false)]
    report_truncated: bool,

    /// List supported model sizes and exit.
    #[arg(long = "list-models", default_value_t = false)]
    list_models: bool,
}

impl Params {
    fn opts(&self) -> Opts {
        Opts {
            language: self.language.clone(),
            half_precision: self.half_precision,
            use_gpu: self.use_gpu,
            report_truncated: self.report_truncated,
        }
    }
}

fn main() {
    earshot::init_logging();

    if let Err(err) = run() {
        error!(error = ?err, "earshot-service failed");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let params = Params::parse();

    if params.list_models {
        print!("{}", model_list_string());
        return Ok(());
    }

    let model_path = resolve_model_path(&params)?;
    let opts = params.opts();

    info!(model = %model_path.display(), "loading whisper model");
    let backend = WhisperBackend::new(&model_path, &opts).context("failed to load model")?;
    info!(model = backend.model_path(), "whisper model loaded");

    let service = Service::new(Transcriber::new(backend, opts));
    earshot::signal::spawn_interrupt_watcher(service.shutdown_handle(), service.state_handle())?;

    info!("ready; waiting for audio");
    let stdin = io::stdin();
    let stdout = io::stdout();
    service
        .run(stdin.lock(), stdout.lock())
        .context("failed to write response")?;

    Ok(())
}

fn resolve_model_path(params: &Params) -> Result<PathBuf> {
    if let Some(path) = &params.model_path {
        return Ok(path.clone());
    }

    let spec = require_model(&params.model_size)?;
    let path = spec.path_in(&params.model_dir);
    if path.is_file() {
        return Ok(path);
    }

    if params.no_download {
        bail!(
            "model '{}' not found at '{}' and downloads are disabled",
            spec.name,
            path.display()
        );
    }

    Ok(earshot::fetch::ensure_model(spec, &params.model_dir)?)
}
