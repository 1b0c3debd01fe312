use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};

use snapbooth::{
    compose::{GridLayout, StripComposer, StripSpec, ThemeKind},
    config::Config,
    export,
    filters::{apply_filter_to_image, FilterRegistry},
};

#[derive(Parser)]
#[command(
    name = "snapbooth",
    version,
    about = "Photobooth image filters and strip composition",
    long_about = "Snapbooth applies photobooth-style filters (fisheye, glitch, crosshatch, and a set of color filters) to still images and composes filtered photos into a bordered grid strip ready to save or share."
)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a filter to a single image
    Apply {
        /// Input image path
        #[arg(short, long)]
        input: PathBuf,

        /// Output image path
        #[arg(short, long)]
        output: PathBuf,

        /// Filter identifier (see `snapbooth filters`)
        #[arg(short, long, default_value = "none")]
        filter: String,
    },

    /// Compose photos into a grid strip
    Compose {
        /// Photo files, in capture order
        #[arg(required = true)]
        photos: Vec<PathBuf>,

        /// Output file; defaults to snapshot-photobooth-<millis>.jpg in the
        /// output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for default-named output
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Grid layout, e.g. 2x2; defaults to the best fit for the count
        #[arg(short, long)]
        layout: Option<GridLayout>,

        /// Filter identifier applied to every cell
        #[arg(short, long, default_value = "none")]
        filter: String,

        /// Strip theme (dark or light)
        #[arg(short, long)]
        theme: Option<String>,

        /// Header text drawn above the grid
        #[arg(long)]
        header: Option<String>,

        /// Append date and time to the footer signature
        #[arg(long)]
        timestamp: bool,
    },

    /// List the available filters
    Filters,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("Starting Snapbooth v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };
    config.validate()?;

    let registry = Arc::new(FilterRegistry::new());

    match cli.command {
        Command::Apply {
            input,
            output,
            filter,
        } => {
            info!("Applying {} to {:?}", registry.display_name(&filter), input);
            let bytes = tokio::fs::read(&input).await?;
            let filtered = apply_filter_to_image(&bytes, &filter, &registry)?;
            tokio::fs::write(&output, filtered).await?;
            info!("Saved filtered image to {:?}", output);
        }

        Command::Compose {
            photos,
            output,
            out_dir,
            layout,
            filter,
            theme,
            header,
            timestamp,
        } => {
            let mut encoded = Vec::with_capacity(photos.len());
            for path in &photos {
                encoded.push(tokio::fs::read(path).await?);
            }

            let layout = layout.unwrap_or_else(|| GridLayout::best_layout(encoded.len() as u32));
            let theme = match theme.as_deref() {
                Some("light") => ThemeKind::Light,
                Some("dark") => ThemeKind::Dark,
                None => config.strip.theme,
                Some(other) => {
                    warn!("unknown theme {:?}, using configured default", other);
                    config.strip.theme
                }
            };

            let spec = StripSpec {
                layout,
                filter,
                theme,
                header_text: header.or_else(|| {
                    if config.strip.header_text.is_empty() {
                        None
                    } else {
                        Some(config.strip.header_text.clone())
                    }
                }),
                show_timestamp: timestamp || config.capture.show_timestamp,
            };

            info!(
                "Composing {} photo(s) into a {} strip",
                encoded.len(),
                spec.layout
            );
            let composer =
                StripComposer::with_threads(Arc::clone(&registry), config.processing.threads);
            let composite = match composer.compose(&encoded, &spec).await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!("composition failed: {}", e.user_message());
                    None
                }
            };

            match output {
                Some(path) => {
                    let bytes = composite
                        .ok_or_else(|| anyhow::anyhow!("composition failed, nothing to write"))?;
                    tokio::fs::write(&path, bytes).await?;
                    info!("Saved strip to {:?}", path);
                }
                None => {
                    let saved =
                        export::save_with_fallback(&out_dir, composite.as_deref(), &encoded)?;
                    info!("Saved {:?}", saved.path());
                }
            }
        }

        Command::Filters => {
            for key in registry.available_filters() {
                let kind = if registry.is_pixel_effect(&key) {
                    "pixel effect"
                } else {
                    "css"
                };
                println!(
                    "{:<14} {:<12} {:<12} {}",
                    key,
                    registry.display_name(&key),
                    kind,
                    registry.css_expression(&key)
                );
            }
        }
    }

    Ok(())
}
