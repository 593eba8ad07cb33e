use crate::jobs::models::JobPosting;
use crate::vector_store::Metadata;

pub const DESCRIPTION_LIMIT: usize = 1000;
pub const REQUIREMENTS_LIMIT: usize = 500;
pub const BENEFITS_LIMIT: usize = 500;
pub const FULL_TEXT_LIMIT: usize = 2000;

/// Keeps at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Builds the metadata stored next to a job vector. Long fields are cut to
/// the per-field limits; `full_text` is the canonical text.
pub fn job_metadata(job: &JobPosting, full_text: &str) -> Metadata {
    let fields = [
        ("job_title", job.title.as_str()),
        ("company", job.company.as_str()),
        ("location", job.location.as_str()),
        ("description", truncate_chars(&job.description, DESCRIPTION_LIMIT)),
        (
            "requirements",
            truncate_chars(optional(&job.requirements), REQUIREMENTS_LIMIT),
        ),
        ("salary", optional(&job.salary)),
        ("employment_type", optional(&job.employment_type)),
        ("experience_level", optional(&job.experience_level)),
        (
            "benefits",
            truncate_chars(optional(&job.benefits), BENEFITS_LIMIT),
        ),
        ("full_text", truncate_chars(full_text, FULL_TEXT_LIMIT)),
    ];

    fields
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn optional(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_long_fields_are_cut_to_limits() {
        let job = JobPosting {
            title: "Engineer".into(),
            company: "Acme".into(),
            location: "Remote".into(),
            description: "d".repeat(5000),
            requirements: Some("r".repeat(900)),
            benefits: Some("é".repeat(800)),
            ..Default::default()
        };
        let metadata = job_metadata(&job, &"f".repeat(4000));

        assert_eq!(metadata["description"].chars().count(), DESCRIPTION_LIMIT);
        assert_eq!(metadata["requirements"].chars().count(), REQUIREMENTS_LIMIT);
        assert_eq!(metadata["benefits"].chars().count(), BENEFITS_LIMIT);
        assert_eq!(metadata["full_text"].chars().count(), FULL_TEXT_LIMIT);
        assert_eq!(metadata["job_title"], "Engineer");
    }

    #[test]
    fn test_absent_optionals_are_empty_strings() {
        let metadata = job_metadata(&JobPosting::default(), "");
        assert_eq!(metadata.len(), 10);
        assert_eq!(metadata["salary"], "");
        assert_eq!(metadata["benefits"], "");
    }
}
