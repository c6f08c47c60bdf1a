use std::path::{Path, PathBuf};

use clap::{value_parser, Parser};
use hamster_level::config::{BakeConfig, Rgb8};

#[derive(Parser, Debug)]
#[command(name = "bake_level")]
#[command(version)]
#[command(about = "Bakes a glTF scene into a binary level file")]
pub struct CliArgs {
    /// The .gltf or .glb scene to convert.
    pub input: PathBuf,

    /// Defaults to the input path with a .lvl extension.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON file with `background`, `ambient` and `export_textures`.
    #[arg(long, env = "BAKE_LEVEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// "r,g,b" or "#rrggbb"
    #[arg(long, value_parser = value_parser!(Rgb8))]
    pub background: Option<Rgb8>,

    /// "r,g,b" or "#rrggbb"
    #[arg(long, value_parser = value_parser!(Rgb8))]
    pub ambient: Option<Rgb8>,

    /// Don't write the textures folder next to the output.
    #[arg(long)]
    pub no_textures: bool,
}

impl CliArgs {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output(&self.input))
    }

    /// Flags win over the config file, which wins over the defaults.
    pub fn apply(&self, mut config: BakeConfig) -> BakeConfig {
        if let Some(background) = self.background {
            config.background = background;
        }
        if let Some(ambient) = self.ambient {
            config.ambient = ambient;
        }
        if self.no_textures {
            config.export_textures = false;
        }
        config
    }
}

pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("lvl")
}
