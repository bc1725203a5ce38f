use super::commands;
use abpack_io::DEFAULT_ANGLE_TOOL;
use abpack_model::MlpConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract interface and loop residues from a directory of structures
    Extract {
        #[arg(short, long)]
        dir: PathBuf,
        #[arg(short, long)]
        out: PathBuf,
        /// Position list file; the classic interface set when omitted
        #[arg(short, long)]
        positions: Option<PathBuf>,
        /// Also keep CDR loop residues for loop-length features
        #[arg(long)]
        loops: bool,
    },
    /// Measure packing angles over a directory of structures
    Angles {
        #[arg(short, long)]
        dir: PathBuf,
        #[arg(short, long)]
        out: PathBuf,
        /// External measurement tool to invoke per structure
        #[arg(long, default_value = DEFAULT_ANGLE_TOOL)]
        tool: String,
    },
    /// Encode residues into a labelled feature table
    Encode {
        #[arg(short, long)]
        residues: PathBuf,
        #[arg(short, long)]
        angles: PathBuf,
        #[arg(short, long)]
        out: PathBuf,
        #[arg(short, long)]
        positions: Option<PathBuf>,
        #[arg(long)]
        loops: bool,
    },
    /// Drop rows whose interface features duplicate an earlier row
    Nonred {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Fit the regressor on a training table
    Train {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        model: PathBuf,
        #[arg(long, default_value_t = MlpConfig::default().hidden_units)]
        hidden_units: usize,
        #[arg(long, default_value_t = MlpConfig::default().epochs)]
        epochs: usize,
        #[arg(long, default_value_t = MlpConfig::default().learning_rate)]
        learning_rate: f64,
        #[arg(long, default_value_t = MlpConfig::default().seed)]
        seed: u64,
        #[arg(long, default_value_t = MlpConfig::default().batch_size)]
        batch_size: usize,
    },
    /// Predict angles for a labelled table and report the errors
    Predict {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        model: PathBuf,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Predict the angle for a single sequence file
    PredictSeq {
        #[arg(short, long)]
        seq: PathBuf,
        #[arg(short, long)]
        model: PathBuf,
    },
    /// Render charts for a prediction table
    Plot {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        out_dir: PathBuf,
        #[arg(long, default_value_t = 12)]
        bins: usize,
    },
    /// Run the whole pipeline: extract, measure, encode, fit, evaluate
    Run {
        #[arg(long)]
        train_dir: PathBuf,
        #[arg(long)]
        test_dir: PathBuf,
        #[arg(short, long)]
        out_dir: PathBuf,
        #[arg(short, long)]
        positions: Option<PathBuf>,
        #[arg(long)]
        loops: bool,
        #[arg(long, default_value = DEFAULT_ANGLE_TOOL)]
        tool: String,
        #[arg(long, default_value_t = MlpConfig::default().hidden_units)]
        hidden_units: usize,
        #[arg(long, default_value_t = MlpConfig::default().epochs)]
        epochs: usize,
        #[arg(long, default_value_t = MlpConfig::default().learning_rate)]
        learning_rate: f64,
        #[arg(long, default_value_t = MlpConfig::default().seed)]
        seed: u64,
        #[arg(long, default_value_t = MlpConfig::default().batch_size)]
        batch_size: usize,
    },
}

fn mlp_config(
    hidden_units: usize,
    epochs: usize,
    learning_rate: f64,
    seed: u64,
    batch_size: usize,
) -> MlpConfig {
    MlpConfig {
        hidden_units,
        epochs,
        learning_rate,
        seed,
        batch_size,
    }
}

impl Cli {
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Extract {
                dir,
                out,
                positions,
                loops,
            } => commands::extract::execute(&dir, &out, positions.as_deref(), loops),
            Commands::Angles { dir, out, tool } => commands::angles::execute(&dir, &out, &tool),
            Commands::Encode {
                residues,
                angles,
                out,
                positions,
                loops,
            } => commands::encode::execute(&residues, &angles, &out, positions.as_deref(), loops),
            Commands::Nonred { input, out } => commands::nonred::execute(&input, &out),
            Commands::Train {
                input,
                model,
                hidden_units,
                epochs,
                learning_rate,
                seed,
                batch_size,
            } => commands::train::execute(
                &input,
                &model,
                mlp_config(hidden_units, epochs, learning_rate, seed, batch_size),
            ),
            Commands::Predict { input, model, out } => {
                commands::predict::execute(&input, &model, &out)
            }
            Commands::PredictSeq { seq, model } => commands::predict_seq::execute(&seq, &model),
            Commands::Plot {
                input,
                out_dir,
                bins,
            } => commands::plot::execute(&input, &out_dir, bins),
            Commands::Run {
                train_dir,
                test_dir,
                out_dir,
                positions,
                loops,
                tool,
                hidden_units,
                epochs,
                learning_rate,
                seed,
                batch_size,
            } => commands::run::execute(commands::run::RunArgs {
                train_dir,
                test_dir,
                out_dir,
                positions,
                loops,
                tool,
                config: mlp_config(hidden_units, epochs, learning_rate, seed, batch_size),
            }),
        }
    }
}
