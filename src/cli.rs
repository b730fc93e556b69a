//! CLI interface for the resume ranker

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-ranker")]
#[command(about = "Rank resumes against job descriptions by semantic similarity")]
#[command(
    long_about = "Normalizes resume text, extracts TF-IDF keyword summaries, embeds them with a Model2Vec model, and produces a ranked result set per job description"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank a directory of resumes against job descriptions
    Rank {
        /// Directory of resume files (PDF, TXT, MD)
        #[arg(short, long)]
        resumes: PathBuf,

        /// JSON file of job postings
        #[arg(short, long)]
        jobs: PathBuf,

        /// Embedding model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Keywords retained per resume (overrides config)
        #[arg(long)]
        top_k: Option<usize>,

        /// Maximum vocabulary size (overrides config)
        #[arg(long)]
        max_vocab: Option<usize>,

        /// Embed full normalized text instead of keyword summaries
        #[arg(long)]
        full_text: bool,

        /// Directory to write per-job JSON result files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show per-document details and exclusion reasons
        #[arg(short, long)]
        detailed: bool,
    },

    /// Extract TF-IDF keyword summaries for a directory of resumes
    Keywords {
        /// Directory of resume files (PDF, TXT, MD)
        #[arg(short, long)]
        resumes: PathBuf,

        /// Keywords retained per resume (overrides config)
        #[arg(long)]
        top_k: Option<usize>,

        /// Maximum vocabulary size (overrides config)
        #[arg(long)]
        max_vocab: Option<usize>,

        /// File to write the keyword summaries to (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List available embedding models
    List,

    /// Download an embedding model
    Download {
        /// Model name or HuggingFace repo ID
        model: String,

        /// Force re-download if model exists
        #[arg(short, long)]
        force: bool,
    },

    /// Remove a downloaded model
    Remove {
        /// Model name to remove
        model: String,
    },

    /// Show model information
    Info {
        /// Model name
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Validate file extension
pub fn validate_file_extension(path: &PathBuf, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
