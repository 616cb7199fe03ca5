//! Chroma CLI: colorize a local image without running the server.
//!
//! Uses the same model files as the server (MODEL_PATH, CLUSTER_CENTERS_PATH).

use anyhow::Context;
use chroma_cli::{colorize_file, init_tracing, DEFAULT_OUTPUT};
use chroma_processing::{Colorizer, OnnxChrominanceModel, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "chroma", about = "Automatic image colorization")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Colorize a grayscale image file
    Colorize {
        /// Path to the image to colorize
        input: PathBuf,
        /// Where to write the result; the extension picks the encoding
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
        /// ONNX colorization network
        #[arg(long, env = "MODEL_PATH", default_value = "colorization_release_v2.onnx")]
        model: PathBuf,
        /// Cluster centers (.npy) for the network head
        #[arg(long, env = "CLUSTER_CENTERS_PATH", default_value = "pts_in_hull.npy")]
        cluster_centers: PathBuf,
        /// JPEG quality when writing JPEG output
        #[arg(
            long,
            env = "JPEG_QUALITY",
            default_value_t = OutputFormat::DEFAULT_JPEG_QUALITY,
            value_parser = clap::value_parser!(u8).range(1..=100)
        )]
        quality: u8,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Colorize {
            input,
            output,
            model,
            cluster_centers,
            quality,
        } => {
            let model = OnnxChrominanceModel::load(&model, &cluster_centers)
                .context("Failed to load colorization model")?;
            let colorizer = Colorizer::new(Arc::new(model));
            let (width, height) = colorize_file(&colorizer, &input, &output, quality)?;
            println!("{} ({}x{})", output.display(), width, height);
        }
    }

    Ok(())
}
