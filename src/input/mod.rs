//! Input processing module
//! Handles file detection, text extraction, corpus loading, and job postings

pub mod file_detector;
pub mod jobs;
pub mod manager;
pub mod text_extractor;
