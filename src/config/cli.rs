use crate::config::toml_config::TomlConfig;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "studio-billing")]
#[command(about = "Turns a studio activity export into a billing CSV")]
pub struct CliConfig {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the run report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Move the raw export from the download folder into the input directory
    Ingest,
    /// Bill the classes of one activity export
    Process(ProcessArgs),
    /// Ingest, then process
    Run(ProcessArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ProcessArgs {
    /// Input CSV; skips discovery in the input directory
    #[arg(long)]
    pub input: Option<String>,

    /// Instructor whose classes are billed
    #[arg(long)]
    pub instructor: Option<String>,

    /// Base hourly rate in euros
    #[arg(long)]
    pub base_rate: Option<f64>,

    /// Directory for the processed CSV
    #[arg(long)]
    pub output_dir: Option<String>,
}

impl ProcessArgs {
    pub fn apply_to(&self, config: &mut TomlConfig) {
        if let Some(input) = &self.input {
            config.processing.input_file = Some(input.clone());
            tracing::info!("🔧 Input file overridden to: {}", input);
        }
        if let Some(instructor) = &self.instructor {
            config.processing.instructor = instructor.clone();
            tracing::info!("🔧 Instructor overridden to: {}", instructor);
        }
        if let Some(rate) = self.base_rate {
            config.processing.base_hourly_rate = rate;
            tracing::info!("🔧 Base hourly rate overridden to: {}", rate);
        }
        if let Some(dir) = &self.output_dir {
            config.processing.output_directory = dir.clone();
            tracing::info!("🔧 Output directory overridden to: {}", dir);
        }
    }
}
