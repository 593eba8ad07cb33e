use serde::{Deserialize, Serialize};

/// Field names a batch file must provide.
pub const REQUIRED_FIELDS: [&str; 4] = ["job_title", "company", "location", "description"];

/// A job posting as submitted by a user or read from a batch file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(rename = "job_title", alias = "title", default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub requirements: Option<String>,
    pub salary: Option<String>,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
    pub benefits: Option<String>,
}

impl JobPosting {
    /// Names of required fields that are blank.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("job_title", &self.title),
            ("company", &self.company),
            ("location", &self.location),
            ("description", &self.description),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Title used in logs and failure reports.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Unknown"
        } else {
            &self.title
        }
    }
}
