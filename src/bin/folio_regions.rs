//! Extract ordered, normalized regions from page images.
//!
//! Usage:
//!   folio-regions --input scans/book
//!   folio-regions --input page.png --output-dir regions --debug-dir debug
//!   folio-regions --input scans/book --orientation double_column --confidence 0.8
//!
//! Region detection uses the endpoint in `FOLIO_DETECTOR_URL`; orientation is
//! classified through the Ollama chat API (`OLLAMA_HOST`, `OLLAMA_MODEL`,
//! `OLLAMA_API`) unless `--orientation` fixes it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use folio_regions::config::ServiceConfig;
use folio_regions::debug::{DebugOptions, DebugVisualizer};
use folio_regions::layout::PageOrientation;
use folio_regions::pipeline::{DocumentRegions, PipelineConfig, RegionPipeline};
use folio_regions::services::{
    FixedClassifier, HttpRegionDetector, OllamaOrientationClassifier, OrientationClassifier,
};
use folio_regions::source::ImageFileSource;

struct CliConfig {
    input: PathBuf,
    output_dir: Option<PathBuf>,
    debug_dir: Option<PathBuf>,
    confidence: Option<f32>,
    padding_y: Option<u32>,
    orientation: Option<PageOrientation>,
}

impl CliConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut input = None;
        let mut output_dir = None;
        let mut debug_dir = None;
        let mut confidence = None;
        let mut padding_y = None;
        let mut orientation = None;

        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = || {
                args.get(i + 1)
                    .cloned()
                    .ok_or_else(|| format!("{} requires a value", flag))
            };
            match flag {
                "--input" | "-i" => input = Some(PathBuf::from(value()?)),
                "--output-dir" | "-o" => output_dir = Some(PathBuf::from(value()?)),
                "--debug-dir" => debug_dir = Some(PathBuf::from(value()?)),
                "--confidence" => {
                    let raw = value()?;
                    confidence =
                        Some(raw.parse().map_err(|_| format!("invalid confidence: {}", raw))?);
                },
                "--padding-y" => {
                    let raw = value()?;
                    padding_y = Some(raw.parse().map_err(|_| format!("invalid padding: {}", raw))?);
                },
                "--orientation" => {
                    orientation = Some(value()?.parse().map_err(|e| format!("{}", e))?);
                },
                "--help" | "-h" => {
                    print_usage();
                    process::exit(0);
                },
                other => return Err(format!("unknown argument: {}", other)),
            }
            i += 2;
        }

        Ok(Self {
            input: input.ok_or("--input is required")?,
            output_dir,
            debug_dir,
            confidence,
            padding_y,
            orientation,
        })
    }

    fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        if let Some(threshold) = self.confidence {
            config = config.with_confidence_threshold(threshold);
        }
        if let Some(padding) = self.padding_y {
            config = config.with_padding_y(padding);
        }
        config
    }
}

fn print_usage() {
    println!("Usage: folio-regions --input <image or directory> [options]");
    println!();
    println!("Options:");
    println!("  -o, --output-dir DIR     Write normalized regions as PNG files");
    println!("      --debug-dir DIR      Write pages annotated with ordered regions");
    println!("      --confidence F       Minimum detector confidence (default 0.70)");
    println!("      --padding-y N        Vertical crop padding in pixels (default 10)");
    println!("      --orientation O      single_column or double_column; skips classification");
}

fn write_regions(output: &DocumentRegions, dir: &Path) -> folio_regions::Result<usize> {
    fs::create_dir_all(dir)?;
    let mut written = 0;
    for region in output.iter() {
        let path = dir.join(format!(
            "page_{:04}_region_{:03}.png",
            region.page_index + 1,
            region.rank
        ));
        if region.image.width() == 0 || region.image.height() == 0 {
            log::warn!("Skipping empty region image {}", path.display());
            continue;
        }
        region.image.save(&path)?;
        written += 1;
    }
    Ok(written)
}

fn run(cli: CliConfig) -> folio_regions::Result<()> {
    let services = ServiceConfig::from_env();
    let config = cli.pipeline_config();

    let classifier: Box<dyn OrientationClassifier> = match cli.orientation {
        Some(orientation) => Box::new(FixedClassifier::new(orientation)),
        None => Box::new(OllamaOrientationClassifier::from_config(&services)?),
    };
    let detector = HttpRegionDetector::from_config(&services)?;

    let mut pipeline = RegionPipeline::new(config, Box::new(detector), classifier)?;
    if let Some(dir) = &cli.debug_dir {
        let visualizer = DebugVisualizer::new(dir, DebugOptions::default())?;
        pipeline = pipeline.with_sink(Box::new(visualizer));
    }

    let source = ImageFileSource::open(&cli.input)?;
    let start = Instant::now();
    let output = pipeline.process(&source)?;
    let summary = output.summary();

    println!("Layout:      {}", output.orientation);
    println!("Pages:       {}", summary.pages);
    println!("Regions:     {}", output.total_regions());
    println!("Filtered:    {}", summary.filtered);
    println!("Degenerate:  {}", summary.degenerate);
    println!("Failed:      {}", summary.failed_pages);

    if let Some(dir) = &cli.output_dir {
        let written = write_regions(&output, dir)?;
        println!("Written:     {} files to {}", written, dir.display());
    }

    println!("Time:        {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn main() {
    env_logger::init();

    let cli = match CliConfig::from_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(2);
        },
    };

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
