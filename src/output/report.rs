//! Console rendering and JSON export of match reports

use crate::error::{Exclusion, Result, ResumeRankerError};
use crate::processing::document::Corpus;
use crate::processing::matcher::RunReport;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Print one job's ranked result set to the console.
pub fn print_run_report(report: &RunReport, detailed: bool, color: bool) {
    colored::control::set_override(color);

    println!();
    println!(
        "{} {} — {}",
        "Job".bold(),
        report.job_id.bold(),
        report.job_title.bold()
    );
    println!("Model: {}", report.model);

    if report.results.is_empty() {
        println!("{}", "No resumes could be ranked for this job.".yellow());
    } else {
        println!();
        for (rank, result) in report.results.iter().enumerate() {
            let score = format!("{:.3}", result.score);
            println!("  {:>3}. {}  {}", rank + 1, score.green(), result.filename);
            if detailed {
                println!("       keywords: {}", result.keywords.dimmed());
            }
        }
    }

    if !report.exclusions.is_empty() {
        println!();
        println!(
            "{} {} document(s) excluded:",
            "!".yellow().bold(),
            report.exclusions.len()
        );
        for exclusion in &report.exclusions {
            if detailed {
                println!(
                    "  - {} ({:?}): {}",
                    exclusion.filename, exclusion.kind, exclusion.detail
                );
            } else {
                println!("  - {} ({:?})", exclusion.filename, exclusion.kind);
            }
        }
    }
}

/// Print corpus-load failures once, up front.
pub fn print_load_failures(failures: &[Exclusion]) {
    if failures.is_empty() {
        return;
    }
    println!(
        "{} {} file(s) could not be ingested:",
        "!".yellow().bold(),
        failures.len()
    );
    for failure in failures {
        println!("  - {}: {}", failure.filename, failure.detail);
    }
}

/// Save one job's report as `{job_id}_{job_title}.json` under `dir`.
pub fn save_run_report(report: &RunReport, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let filename = format!(
        "{}_{}.json",
        sanitize_component(&report.job_id),
        sanitize_component(&report.job_title)
    );
    let path = dir.join(filename);

    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

#[derive(Serialize)]
struct KeywordRow<'a> {
    filename: &'a str,
    keywords: &'a str,
}

/// Save per-document keyword summaries, ordered alphabetically by
/// filename (a presentation contract only).
pub fn save_keyword_summaries(corpus: &Corpus, path: &Path) -> Result<()> {
    let rows: Vec<KeywordRow> = corpus
        .by_filename()
        .into_iter()
        .map(|doc| KeywordRow {
            filename: &doc.filename,
            keywords: &doc.keywords,
        })
        .collect();

    let json = serde_json::to_string_pretty(&rows)?;
    std::fs::write(path, json).map_err(ResumeRankerError::Io)?;
    Ok(())
}

/// Print keyword summaries to the console, alphabetically by filename.
pub fn print_keyword_summaries(corpus: &Corpus, color: bool) {
    colored::control::set_override(color);

    for doc in corpus.by_filename() {
        println!("{}", doc.filename.bold());
        println!("  {}", doc.keywords);
    }
}

fn sanitize_component(component: &str) -> String {
    component
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::matcher::RunReport;
    use crate::processing::ranker::MatchResult;
    use chrono::Utc;

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("J42"), "J42");
        assert_eq!(sanitize_component("Backend Engineer / SRE"), "Backend_Engineer___SRE");
    }

    #[test]
    fn test_save_run_report_writes_job_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let report = RunReport {
            job_id: "J1".to_string(),
            job_title: "Data Engineer".to_string(),
            model: "potion-base-8M".to_string(),
            generated_at: Utc::now(),
            results: vec![MatchResult {
                filename: "r1.pdf".to_string(),
                keywords: "python, sql".to_string(),
                score: 0.921,
            }],
            exclusions: vec![],
        };

        let path = save_run_report(&report, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "J1_Data_Engineer.json");

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["results"][0]["score"], 0.921);
        assert_eq!(parsed["job_id"], "J1");
    }
}
