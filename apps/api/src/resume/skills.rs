use serde::Serialize;
use tracing::warn;

use crate::llm_client::NarrativeService;
use crate::resume::prompts::skills_prompt;

pub const MAX_SKILLS: usize = 10;

/// Outcome of the skill-extraction call. A service failure is kept apart from
/// a resume that simply lists no skills.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SkillExtraction {
    Extracted { skills: Vec<String> },
    Unavailable { reason: String },
}

impl SkillExtraction {
    pub fn skills(&self) -> &[String] {
        match self {
            SkillExtraction::Extracted { skills } => skills.as_slice(),
            SkillExtraction::Unavailable { .. } => &[],
        }
    }
}

/// Asks the language model for a comma-separated skill list. Never fails.
pub async fn extract_skills(resume_text: &str, llm: &dyn NarrativeService) -> SkillExtraction {
    match llm.generate(&skills_prompt(resume_text)).await {
        Ok(response) => SkillExtraction::Extracted {
            skills: parse_skill_list(&response),
        },
        Err(e) => {
            warn!("Skill extraction unavailable: {e}");
            SkillExtraction::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}

fn parse_skill_list(response: &str) -> Vec<String> {
    response
        .split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .take(MAX_SKILLS)
        .map(str::to_string)
        .collect()
}
