//! Job posting input

use crate::error::{Result, ResumeRankerError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;

/// A job posting to rank the corpus against. The composite text fed to
/// the pipeline concatenates description, skills, and experience with a
/// fixed template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub job_id: String,
    pub job_title: String,
    pub description: String,
    #[serde(default)]
    pub required_skills: String,
    #[serde(default)]
    pub experience: String,
}

impl JobPosting {
    pub fn composite_text(&self) -> String {
        format!(
            "{} Skills Required: {} Experience: {}",
            self.description, self.required_skills, self.experience
        )
    }
}

/// Load job postings from a JSON array file. Job IDs must be unique.
pub async fn load_jobs(path: &Path) -> Result<Vec<JobPosting>> {
    let content = fs::read_to_string(path).await.map_err(ResumeRankerError::Io)?;
    let jobs: Vec<JobPosting> = serde_json::from_str(&content)?;

    if jobs.is_empty() {
        return Err(ResumeRankerError::InvalidInput(format!(
            "No job postings found in {}",
            path.display()
        )));
    }

    let mut seen = HashSet::new();
    for job in &jobs {
        if !seen.insert(job.job_id.as_str()) {
            return Err(ResumeRankerError::InvalidInput(format!(
                "Duplicate job ID: {}",
                job.job_id
            )));
        }
    }

    Ok(jobs)
}
