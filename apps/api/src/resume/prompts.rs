// Prompt templates for the resume pipeline. Placeholders in `{braces}` are
// filled with `str::replace` before sending.

use crate::jobs::metadata::truncate_chars;
use crate::jobs::search::JobMatch;

pub const SKILLS_RESUME_LIMIT: usize = 2000;
pub const ANALYSIS_RESUME_LIMIT: usize = 3000;
/// Only the best few matches are shown to the narrative model.
pub const ANALYSIS_JOB_COUNT: usize = 3;
const JOB_DESCRIPTION_LIMIT: usize = 300;
const JOB_REQUIREMENTS_LIMIT: usize = 200;

/// Skill extraction prompt. Replace `{resume_text}`.
pub const SKILLS_PROMPT_TEMPLATE: &str = "\
Extract the key technical and professional skills from this resume text.
Return only a comma-separated list of skills, no explanations.
Focus on technical skills, programming languages, tools, certifications, and relevant professional skills.

Resume text:
{resume_text}";

/// Career analysis prompt. Replace `{resume_text}` and `{jobs_text}`.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = "\
As an expert career counselor and resume analyst, provide a comprehensive analysis of this resume and job matching results.

## RESUME TEXT:
{resume_text}

## TOP MATCHING JOBS:
{jobs_text}

Please provide a detailed analysis covering these sections:

## Resume Strengths
Identify and explain the key strengths in this resume.

## Areas for Improvement
Suggest specific improvements for the resume.

## Job Match Analysis
Analyze why these jobs are good matches and what might be missing.

## Skill Gap Analysis
Identify skills that are in demand but missing from the resume.

## Career Recommendations
Provide actionable career advice and next steps.

## Resume Optimization Tips
Suggest specific ways to optimize the resume for better job matches.

Keep the analysis practical and actionable. Use bullet points where appropriate.";

pub fn skills_prompt(resume_text: &str) -> String {
    SKILLS_PROMPT_TEMPLATE.replace(
        "{resume_text}",
        truncate_chars(resume_text, SKILLS_RESUME_LIMIT),
    )
}

pub fn analysis_prompt(resume_text: &str, matches: &[JobMatch]) -> String {
    let jobs_text = matches
        .iter()
        .take(ANALYSIS_JOB_COUNT)
        .enumerate()
        .map(|(i, job)| {
            format!(
                "Job {}: {} at {}\nLocation: {}\nMatch Score: {:.2}\n\
                 Description: {}...\nRequirements: {}...\n",
                i + 1,
                job.job_title,
                job.company,
                job.location,
                job.score,
                truncate_chars(&job.description, JOB_DESCRIPTION_LIMIT),
                truncate_chars(&job.requirements, JOB_REQUIREMENTS_LIMIT),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    ANALYSIS_PROMPT_TEMPLATE
        .replace("{resume_text}", truncate_chars(resume_text, ANALYSIS_RESUME_LIMIT))
        .replace("{jobs_text}", &jobs_text)
}
