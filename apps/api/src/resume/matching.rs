//! Resume matching pipeline: extract, parse, embed, query, narrate.
//!
//! Each step awaits the previous one. Extraction, embedding and query failures
//! abort the run and discard partial results. The two language-model calls
//! degrade instead of failing.

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::embedding::{Embedder, EmbeddingError, EmbeddingRole};
use crate::jobs::search::JobMatch;
use crate::llm_client::NarrativeService;
use crate::resume::extract::{extract_text_blocking, ParseError};
use crate::resume::parser::parse_fields;
use crate::resume::prompts::analysis_prompt;
use crate::resume::skills::{extract_skills, SkillExtraction};
use crate::vector_store::{VectorStore, VectorStoreError};

pub const DEFAULT_RESUME_TOP_K: usize = 8;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector store error: {0}")]
    Store(#[from] VectorStoreError),
}

/// Collaborators the pipeline talks to.
pub struct MatchServices<'a> {
    pub embedder: &'a Embedder,
    pub store: &'a dyn VectorStore,
    pub llm: &'a dyn NarrativeService,
}

/// Everything read out of one resume. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: SkillExtraction,
    pub full_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Narrative {
    Generated { text: String },
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub resume: ResumeRecord,
    pub matches: Vec<JobMatch>,
    pub narrative: Narrative,
    /// The resume was embedded with the hash fallback; match scores carry no
    /// semantic meaning.
    pub embedding_fallback_used: bool,
}

pub async fn analyze_resume(
    services: MatchServices<'_>,
    file_name: String,
    bytes: Bytes,
    top_k: usize,
) -> Result<MatchReport, MatchError> {
    let text = extract_text_blocking(file_name.clone(), bytes).await?;
    info!("Extracted {} characters from {file_name}", text.chars().count());

    let fields = parse_fields(&text);
    let skills = extract_skills(&text, services.llm).await;

    let embedding = services.embedder.embed(&text, EmbeddingRole::Query).await?;
    let records = services.store.query(&embedding.values, top_k, true).await?;
    let matches: Vec<JobMatch> = records.into_iter().map(JobMatch::from).collect();
    info!("Resume {file_name} matched {} jobs", matches.len());

    let narrative = generate_narrative(&text, &matches, services.llm).await;

    Ok(MatchReport {
        resume: ResumeRecord {
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            skills,
            full_text: text,
        },
        matches,
        narrative,
        embedding_fallback_used: embedding.fallback_used,
    })
}

async fn generate_narrative(
    resume_text: &str,
    matches: &[JobMatch],
    llm: &dyn NarrativeService,
) -> Narrative {
    match llm.generate(&analysis_prompt(resume_text, matches)).await {
        Ok(text) => Narrative::Generated { text },
        Err(e) => {
            warn!("Narrative generation unavailable: {e}");
            Narrative::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}
