//! The `squarify normalize` command.

use clap::Args;
use serde::Serialize;
use squarify_core::pipeline::encode::to_base64;
use squarify_core::{Config, NormalizationSummary, Normalizer, RequestBuilder};
use std::path::{Path, PathBuf};

/// Arguments for the `normalize` command.
///
/// Exactly one of INPUT, `--base64` and `--stdin` selects the source.
#[derive(Args, Debug, Default)]
pub struct NormalizeArgs {
    /// Image file to normalize
    pub input: Option<PathBuf>,

    /// Base64-encoded image, or @FILE to read the base64 text from a file
    #[arg(long, value_name = "TEXT|@FILE")]
    pub base64: Option<String>,

    /// Read the image bytes from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Write the JPEG result to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the JPEG result as base64 on stdout
    #[arg(long)]
    pub emit_base64: bool,

    /// Height of the content region after resizing [default: from config]
    #[arg(long)]
    pub target_height: Option<u32>,

    /// Side length of the square canvas [default: from config]
    #[arg(long)]
    pub finish_size: Option<u32>,

    /// Gray level at or above which pixels count as background (0-255)
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Resize to the target height before detecting content
    #[arg(long)]
    pub pre_resize: bool,

    /// JPEG quality (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Worker threads for the content scan
    #[arg(long)]
    pub workers: Option<usize>,
}

/// JSON report printed when no base64 output is requested.
#[derive(Debug, Serialize)]
struct Report {
    #[serde(flatten)]
    summary: NormalizationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<PathBuf>,
    jpeg_bytes: usize,
}

/// Execute the normalize command.
pub async fn execute(args: NormalizeArgs, config: Config) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args);
    let normalizer = Normalizer::new(&config);

    let mut builder = normalizer.request();
    if args.pre_resize {
        builder = builder.pre_resize(true);
    }
    let request = add_sources(builder, &args)?.build()?;

    let result = tokio::task::spawn_blocking(move || normalizer.normalize(request)).await??;
    let jpeg = result.to_jpeg()?;

    let output = args.output.as_deref().map(expand_path);
    if let Some(ref path) = output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &jpeg)?;
        tracing::info!("Output written to {:?}", path);
    }

    println!("{}", stdout_text(&jpeg, result.summary(), output, args.emit_base64)?);
    Ok(())
}

/// Either the already-encoded JPEG as base64, or the JSON report.
fn stdout_text(
    jpeg: &[u8],
    summary: NormalizationSummary,
    output: Option<PathBuf>,
    emit_base64: bool,
) -> anyhow::Result<String> {
    if emit_base64 {
        return Ok(to_base64(jpeg));
    }
    let report = Report {
        summary,
        output,
        jpeg_bytes: jpeg.len(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Fold CLI flags into the loaded configuration.
fn apply_overrides(mut config: Config, args: &NormalizeArgs) -> Config {
    if let Some(target_height) = args.target_height {
        config.normalize.target_height = target_height;
    }
    if let Some(finish_size) = args.finish_size {
        config.normalize.finish_size = finish_size;
    }
    if let Some(threshold) = args.threshold {
        config.normalize.threshold = threshold;
    }
    if let Some(quality) = args.quality {
        config.output.jpeg_quality = quality;
    }
    if let Some(workers) = args.workers {
        config.normalize.scan_workers = workers;
    }
    config
}

/// Hand every source the user named to the builder; it rejects anything
/// other than exactly one.
fn add_sources(
    mut builder: RequestBuilder,
    args: &NormalizeArgs,
) -> anyhow::Result<RequestBuilder> {
    if let Some(ref input) = args.input {
        builder = builder.path(expand_path(input));
    }
    if let Some(ref base64) = args.base64 {
        builder = builder.base64(resolve_base64_arg(base64)?);
    }
    if args.stdin {
        builder = builder.stream(std::io::stdin());
    }
    Ok(builder)
}

/// `@path` reads the base64 text from a file; anything else is the text.
fn resolve_base64_arg(arg: &str) -> anyhow::Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => Ok(std::fs::read_to_string(expand_path(Path::new(path)))?),
        None => Ok(arg.to_string()),
    }
}

fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}
