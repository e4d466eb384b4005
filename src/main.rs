//! flexagon - generate paper strips for hexaflexagons
//!
//! Writes the strip as Wavefront OBJ (+ MTL) or JSON, checks generated strips, and prints the
//! fold-order tables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use itertools::Itertools;

use flexagon::{
    create_materials, export, face_order_table, validate, Flexagon, FlexagonParams, Strip,
    UvSeed, SUPPORTED_SIDES,
};

#[derive(Parser)]
#[command(name = "flexagon")]
#[command(about = "Procedural hexaflexagon strip generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a flexagon strip and write it to disk
    Generate {
        #[command(flatten)]
        shape: ShapeArgs,

        /// How UV points are laid out before the apex correction
        #[arg(long, value_enum)]
        uv_seed: Option<UvSeed>,

        /// TOML file with generation parameters (flags override it)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file format
        #[arg(short, long, value_enum, default_value_t = Format::Obj)]
        format: Format,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Base name of the output files (default: derived from the number of sides)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Build a strip and print its validation report
    Check {
        #[command(flatten)]
        shape: ShapeArgs,
    },

    /// Print the fold-order tables and side colors
    Tables,
}

#[derive(clap::Args)]
struct ShapeArgs {
    /// Edge length of every triangle (default: 1.0)
    #[arg(short, long)]
    scale: Option<f32>,

    /// Number of sides of the folded flexagon, 3 or 6 (default: 3)
    #[arg(long)]
    sides: Option<usize>,
}

impl ShapeArgs {
    fn apply(&self, params: &mut FlexagonParams) {
        if let Some(scale) = self.scale {
            params.scale = scale;
        }
        if let Some(sides) = self.sides {
            params.sides = sides;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Obj,
    Json,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            shape,
            uv_seed,
            config,
            format,
            output,
            name,
        } => {
            let mut params = match &config {
                Some(path) => FlexagonParams::load(path)
                    .with_context(|| format!("Failed to load parameters from {path:?}"))?,
                None => FlexagonParams::default(),
            };
            shape.apply(&mut params);
            if let Some(uv_seed) = uv_seed {
                params.uv_seed = uv_seed;
            }

            let flexagon = Flexagon::generate(&params).context("Failed to generate flexagon")?;
            let name = name.unwrap_or_else(|| default_name(params.sides));
            std::fs::create_dir_all(&output)
                .with_context(|| format!("Failed to create output directory {output:?}"))?;
            match format {
                Format::Obj => {
                    export::write_obj(&flexagon, &output, &name).context("Failed to write OBJ")?;
                }
                Format::Json => {
                    export::write_json(&flexagon, &output, &name)
                        .context("Failed to write JSON")?;
                }
            }
            tracing::info!("Done!");
        }

        Commands::Check { shape } => {
            let mut params = FlexagonParams::default();
            shape.apply(&mut params);
            params.validate()?;
            let strip = Strip::build(params.scale, params.sides);
            let report = validate(&strip);
            println!("{report}");
            if report.has_issues() {
                anyhow::bail!("Strip has {} issues", report.issue_count());
            }
        }

        Commands::Tables => {
            for sides in SUPPORTED_SIDES {
                let table = face_order_table(sides)?;
                println!("{} ({sides} sides):", default_name(sides));
                for row in table.chunks(12) {
                    println!("  {}", row.iter().join(", "));
                }
            }
            println!("Side colors:");
            for m in create_materials(flexagon::MAX_SIDES)? {
                println!(
                    "  {}: #{:02x}{:02x}{:02x}",
                    m.name, m.color.r, m.color.g, m.color.b
                );
            }
        }
    }

    Ok(())
}

fn default_name(sides: usize) -> String {
    match sides {
        3 => "trihexaflexagon".to_owned(),
        6 => "hexahexaflexagon".to_owned(),
        _ => format!("{sides}-flexagon"),
    }
}
