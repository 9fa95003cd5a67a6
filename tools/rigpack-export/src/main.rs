//! rigpack-export - scene export tool
//!
//! Converts a glTF/GLB scene into a directory of engine-ready files
//! (mesh_<i>.mesh, skeleton.json, material_<i>.material.json, anim_<i>.anim, scene.json)

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use rigpack_export::config::{Basis, ExportConfig, load_config};
use rigpack_export::pipeline;

#[derive(Parser)]
#[command(name = "rigpack-export")]
#[command(about = "rigpack scene export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export meshes, skeleton, materials, animations and scene.json
    Convert {
        /// Input glTF/GLB file
        input: PathBuf,

        /// Output directory (default: input file stem, in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        options: ConfigArgs,
    },

    /// Export only skeleton.json
    Skeleton {
        /// Input glTF/GLB file
        input: PathBuf,

        /// Output file (default: <input stem>.skeleton.json in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        options: ConfigArgs,
    },

    /// List meshes, bones, materials and animations
    Info {
        /// Input glTF/GLB file
        input: PathBuf,
    },
}

/// Settings shared by the exporting commands; flags override the config file
#[derive(clap::Args)]
struct ConfigArgs {
    /// Path to a rigpack.toml config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Uniform scale for positions and translations (e.g. 0.01 for cm -> m)
    #[arg(long)]
    scale: Option<f32>,

    /// Mirror Z to write a left-handed scene
    #[arg(long)]
    left_handed: bool,

    /// Write texture V as 1 - v
    #[arg(long)]
    flip_uvs: bool,

    /// Reverse triangle winding
    #[arg(long)]
    flip_winding: bool,
}

impl ConfigArgs {
    fn resolve(&self) -> Result<ExportConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ExportConfig::default(),
        };
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if self.left_handed {
            config.basis = Basis::LeftHanded;
        }
        config.flip_uvs |= self.flip_uvs;
        config.flip_winding |= self.flip_winding;
        Ok(config)
    }
}

fn default_skeleton_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("scene");
    PathBuf::from(format!("{stem}.skeleton.json"))
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
        Commands::Convert {
            input,
            output,
            options,
        } => {
            let config = options.resolve()?;
            let summary = pipeline::export_file(&input, output.as_deref(), &config)?;
            tracing::info!(
                "Done! {} meshes, {} bones, {} materials, {} animations -> {:?}",
                summary.meshes,
                summary.bones,
                summary.materials,
                summary.animations,
                summary.out_dir
            );
        }

        Commands::Skeleton {
            input,
            output,
            options,
        } => {
            let config = options.resolve()?;
            let output = output.unwrap_or_else(|| default_skeleton_output(&input));
            tracing::info!("Exporting skeleton {:?} -> {:?}", input, output);
            pipeline::export_skeleton_file(&input, &output, &config)?;
            tracing::info!("Done!");
        }

        Commands::Info { input } => {
            pipeline::list_contents(&input)?;
        }
    }

    Ok(())
}
