use crate::jobs::models::JobPosting;

const SEPARATOR: &str = " | ";

/// Flattens a posting into the text that gets embedded.
///
/// Fields are rendered as `Label: value` in a fixed order and joined with
/// `" | "`. Blank fields are left out, so an empty posting yields `""`.
pub fn canonicalize(job: &JobPosting) -> String {
    let fields: [(&str, Option<&str>); 9] = [
        ("Job Title", Some(job.title.as_str())),
        ("Company", Some(job.company.as_str())),
        ("Location", Some(job.location.as_str())),
        ("Description", Some(job.description.as_str())),
        ("Requirements", job.requirements.as_deref()),
        ("Salary", job.salary.as_deref()),
        ("Employment Type", job.employment_type.as_deref()),
        ("Experience Level", job.experience_level.as_deref()),
        ("Benefits", job.benefits.as_deref()),
    ];

    fields
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .filter(|v| !v.trim().is_empty())
                .map(|v| format!("{label}: {v}"))
        })
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_company_only() {
        let job = JobPosting {
            title: "A".into(),
            company: "B".into(),
            ..Default::default()
        };
        assert_eq!(canonicalize(&job), "Job Title: A | Company: B");
    }

    #[test]
    fn test_empty_posting_is_empty_string() {
        assert_eq!(canonicalize(&JobPosting::default()), "");
    }

    #[test]
    fn test_full_posting_uses_fixed_order() {
        let job = JobPosting {
            title: "Engineer".into(),
            company: "Acme".into(),
            location: "Remote".into(),
            description: "Build things".into(),
            requirements: Some("Rust".into()),
            salary: Some("$100k".into()),
            employment_type: Some("Full-time".into()),
            experience_level: Some("Senior Level".into()),
            benefits: Some("Dental".into()),
        };
        assert_eq!(
            canonicalize(&job),
            "Job Title: Engineer | Company: Acme | Location: Remote | Description: Build things | \
             Requirements: Rust | Salary: $100k | Employment Type: Full-time | \
             Experience Level: Senior Level | Benefits: Dental"
        );
    }

    #[test]
    fn test_blank_optional_fields_are_omitted() {
        let job = JobPosting {
            title: "Engineer".into(),
            description: "Build".into(),
            salary: Some("   ".into()),
            benefits: Some(String::new()),
            employment_type: Some("Contract".into()),
            ..Default::default()
        };
        assert_eq!(
            canonicalize(&job),
            "Job Title: Engineer | Description: Build | Employment Type: Contract"
        );
    }
}
