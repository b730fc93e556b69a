//! Resume ranker: rank resumes against job descriptions by semantic similarity

mod cli;
mod config;
mod error;
mod input;
mod output;
mod processing;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction, ModelAction};
use config::Config;
use error::{Result, ResumeRankerError};
use indicatif::{ProgressBar, ProgressStyle};
use input::jobs;
use input::manager::InputManager;
use log::{error, info};
use processing::document::Corpus;
use processing::embeddings::EmbeddingEngine;
use processing::matcher::MatchEngine;
use processing::model_manager::ModelManager;
use processing::normalizer::TextNormalizer;
use std::path::PathBuf;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Rank {
            resumes,
            jobs: jobs_path,
            model,
            top_k,
            max_vocab,
            full_text,
            output,
            detailed,
        } => {
            if let Some(top_k) = top_k {
                config.matching.top_k = top_k;
            }
            if let Some(max_vocab) = max_vocab {
                config.matching.max_vocab = max_vocab;
            }
            if full_text {
                config.matching.embed_full_text = true;
            }
            // Fail fast on bad parameters before touching any file.
            config.validate()?;

            cli::validate_file_extension(&jobs_path, &["json"])
                .map_err(|e| ResumeRankerError::InvalidInput(format!("Jobs file: {}", e)))?;

            let postings = jobs::load_jobs(&jobs_path).await?;
            info!("Loaded {} job posting(s)", postings.len());

            let corpus = build_corpus(&resumes, &config).await?;

            let engine = init_match_engine(&config, model).await?;

            let spinner = spinner("Embedding corpus documents...");
            let embed_failures = engine.precompute_embeddings(&corpus).await;
            spinner.finish_and_clear();
            if !embed_failures.is_empty() {
                info!("{} document(s) could not be embedded", embed_failures.len());
            }
            println!(
                "Cached embeddings for {} of {} documents ({} dimensions)",
                engine.embeddings().cache_size(),
                corpus.len(),
                engine.embeddings().dimension()
            );

            // Jobs are independent: one job whose query cannot be
            // embedded is reported and skipped, the rest still run.
            for posting in &postings {
                match engine.match_job(posting, &corpus).await {
                    Ok(report) => {
                        output::report::print_run_report(&report, detailed || config.output.detailed, config.output.color_output);

                        if let Some(dir) = &output {
                            let path = output::report::save_run_report(&report, dir)?;
                            println!("Saved {}", path.display());
                        }
                    }
                    Err(e) => {
                        error!("Skipping job {} ({}): {}", posting.job_id, posting.job_title, e);
                    }
                }
            }
        }

        Commands::Keywords {
            resumes,
            top_k,
            max_vocab,
            output,
        } => {
            if let Some(top_k) = top_k {
                config.matching.top_k = top_k;
            }
            if let Some(max_vocab) = max_vocab {
                config.matching.max_vocab = max_vocab;
            }
            config.validate()?;

            let corpus = build_corpus(&resumes, &config).await?;
            output::report::print_keyword_summaries(&corpus, config.output.color_output);

            if let Some(path) = output {
                output::report::save_keyword_summaries(&corpus, &path)?;
                println!("Saved {}", path.display());
            }
        }

        Commands::Models { action } => match action {
            ModelAction::List => {
                let manager = ModelManager::new(config.get_models_dir()).await?;
                println!("Available embedding models:\n");
                for model in manager.list_available_models() {
                    let status = if manager.is_model_downloaded(&resolve_key(&manager, &model.repo_id)) {
                        "downloaded"
                    } else {
                        "available"
                    };
                    println!(
                        "  {} ({}) - {} MB, {} dims [{}]",
                        model.name, model.repo_id, model.size_mb, model.dimensions, status
                    );
                    println!("    {}", model.description);
                }
            }

            ModelAction::Download { model, force } => {
                let mut manager = ModelManager::new(config.get_models_dir()).await?;
                let model_id = manager
                    .resolve_model_id(&model)
                    .ok_or_else(|| ResumeRankerError::ModelNotFound(model.clone()))?;

                if !force && manager.is_model_downloaded(&model_id) {
                    println!("Model '{}' is already downloaded (use --force to re-download)", model_id);
                    return Ok(());
                }

                let path = manager.download_model(&model_id).await?;
                println!("Model '{}' downloaded to {}", model_id, path.display());
            }

            ModelAction::Remove { model } => {
                let manager = ModelManager::new(config.get_models_dir()).await?;
                let model_id = manager
                    .resolve_model_id(&model)
                    .ok_or_else(|| ResumeRankerError::ModelNotFound(model.clone()))?;

                if !manager.is_model_downloaded(&model_id) {
                    println!("Model '{}' is not downloaded", model_id);
                    return Ok(());
                }

                let model_path = config.get_models_dir().join(&model_id);
                std::fs::remove_dir_all(&model_path)?;
                println!("Removed {}", model_path.display());
            }

            ModelAction::Info { model } => {
                let manager = ModelManager::new(config.get_models_dir()).await?;
                let model_id = manager
                    .resolve_model_id(&model)
                    .ok_or_else(|| ResumeRankerError::ModelNotFound(model.clone()))?;
                let info = manager
                    .get_model_info(&model_id)
                    .ok_or_else(|| ResumeRankerError::ModelNotFound(model_id.clone()))?;

                println!("Name: {}", info.name);
                println!("Repository: {}", info.repo_id);
                println!("Size: {} MB", info.size_mb);
                println!("Dimensions: {}", info.dimensions);
                println!("Description: {}", info.description);
                println!(
                    "Status: {}",
                    if manager.is_model_downloaded(&model_id) {
                        "downloaded"
                    } else {
                        "available for download"
                    }
                );
            }
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("Models directory: {}", config.models_dir().display());
                println!("Default model: {}", config.models.default_model);
                println!("top_k: {}", config.matching.top_k);
                println!("max_vocab: {}", config.matching.max_vocab);
                println!("embed_full_text: {}", config.matching.embed_full_text);
                println!("batch_size: {}", config.processing.batch_size);
                println!("max_concurrent_embeds: {}", config.processing.max_concurrent_embeds);
                println!("embed_timeout_secs: {}", config.processing.embed_timeout_secs);
            }

            Some(ConfigAction::Reset) => {
                let default_config = Config::default();
                default_config.save()?;
                println!("Configuration reset to defaults");
            }
        },
    }

    Ok(())
}

/// Ingest a resume directory and build one corpus snapshot: all
/// documents normalized, vocabulary fit, summaries extracted.
async fn build_corpus(resumes_dir: &PathBuf, config: &Config) -> Result<Corpus> {
    let mut input_manager = InputManager::new().with_cache(config.processing.enable_caching);
    let load = input_manager.load_corpus(resumes_dir).await?;
    output::report::print_load_failures(&load.failures);
    info!("Ingested {} resume(s)", load.documents.len());

    let normalizer = TextNormalizer::new();
    Corpus::build(load.documents, &normalizer, &config.matching)
}

async fn init_match_engine(config: &Config, model_override: Option<String>) -> Result<MatchEngine> {
    let mut manager = ModelManager::new(config.get_models_dir()).await?;

    let model_id = match model_override {
        Some(input) => manager
            .resolve_model_id(&input)
            .ok_or_else(|| ResumeRankerError::ModelNotFound(input))?,
        None => {
            if manager.is_model_downloaded(&config.models.default_model) {
                config.models.default_model.clone()
            } else {
                manager.auto_select_model()
            }
        }
    };

    let model_path = manager.ensure_model_available(&model_id).await?;
    let embeddings = EmbeddingEngine::load(&model_path, &model_id, config)?;

    Ok(MatchEngine::new(embeddings, config))
}

fn resolve_key(manager: &ModelManager, repo_id: &str) -> String {
    manager.resolve_model_id(repo_id).unwrap_or_else(|| repo_id.to_string())
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template("{spinner} {msg}").expect("Invalid spinner template"));
    bar.set_message(message.to_string());
    bar.enable_steady_tick(std::time::Duration::from_millis(100));
    bar
}
