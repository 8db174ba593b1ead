use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::info;

use scribblegen::{
    Canvas, DrawSurface, FailureKind, ImageUpload, ServiceConfig, StrokeScript, SurfaceMetrics,
};

#[derive(Parser)]
#[command(name = "scribblegen", version, about = "Turn sketches into generated images")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Replay a stroke script and write the sketch as PNG
    Render {
        /// Stroke script (JSON)
        #[arg(long)]
        strokes: PathBuf,
        /// Output PNG path
        #[arg(long)]
        out: PathBuf,
    },
    /// Submit a sketch or an image file with a prompt and print the result
    Generate {
        #[arg(long)]
        prompt: String,
        /// Image file to submit instead of a sketch
        #[arg(long, conflicts_with = "strokes")]
        image: Option<PathBuf>,
        /// Stroke script to draw and submit
        #[arg(long)]
        strokes: Option<PathBuf>,
        #[arg(long, default_value = scribblegen::DEFAULT_ENDPOINT)]
        endpoint: String,
        #[arg(long, default_value_t = 120_000)]
        timeout_ms: u64,
    },
}

fn render(strokes: PathBuf, out: PathBuf) -> anyhow::Result<()> {
    let script = StrokeScript::from_path(&strokes)?;
    let canvas = script.replay()?;
    let snapshot = canvas.export_snapshot()?;
    std::fs::write(&out, &snapshot.png_data)
        .with_context(|| format!("writing {}", out.display()))?;
    info!(
        "wrote {}x{} sketch to {} ({})",
        snapshot.width,
        snapshot.height,
        out.display(),
        snapshot.fingerprint
    );
    Ok(())
}

async fn generate(
    prompt: String,
    image: Option<PathBuf>,
    strokes: Option<PathBuf>,
    endpoint: String,
    timeout_ms: u64,
) -> anyhow::Result<()> {
    let config = ServiceConfig {
        endpoint,
        timeout_ms,
        ..Default::default()
    };
    let mut orchestrator = scribblegen::new_http_orchestrator(config)?;

    let canvas = match &strokes {
        Some(path) => StrokeScript::from_path(path)?.replay()?,
        None => Canvas::new(SurfaceMetrics::default())?,
    };
    if let Some(path) = image {
        orchestrator.select_upload(ImageUpload::from_path(path)?);
    }

    match orchestrator.submit(&prompt, &canvas).await {
        Ok(img) => {
            println!("{}", img.url);
            Ok(())
        }
        Err(e) => bail!("generation failed ({:?}): {}", FailureKind::of(&e), e),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Cmd::Render { strokes, out } => render(strokes, out),
        Cmd::Generate {
            prompt,
            image,
            strokes,
            endpoint,
            timeout_ms,
        } => generate(prompt, image, strokes, endpoint, timeout_ms).await,
    }
}
