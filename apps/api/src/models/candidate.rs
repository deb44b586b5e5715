use serde::{Deserialize, Serialize};

/// Read-only candidate snapshot for the duration of one generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    pub name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub skills: Vec<String>,
    pub certifications: Vec<String>,
    pub education: Vec<String>,
    pub languages: Vec<String>,
    pub experience: Vec<ExperienceRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceRecord {
    pub company: String,
    pub role: String,
    pub dates: Option<String>,
    pub responsibilities: Vec<String>,
}

/// Optional job description context for relevance-aware enrichment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobContext {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Vec<String>,
    pub skills: Vec<String>,
}

impl CandidateProfile {
    /// Contact fields in display order, skipping blanks.
    pub fn contact_fields(&self) -> Vec<&str> {
        [&self.email, &self.phone, &self.location, &self.linkedin]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_deserializes_with_missing_fields() {
        let json = serde_json::json!({ "name": "Jane Doe", "email": "jane@example.com" });
        let candidate: CandidateProfile = serde_json::from_value(json).unwrap();
        assert_eq!(candidate.name, "Jane Doe");
        assert!(candidate.skills.is_empty());
        assert!(candidate.experience.is_empty());
    }

    #[test]
    fn test_contact_fields_skip_blank_values() {
        let candidate = CandidateProfile {
            name: "Jane".to_string(),
            email: Some("jane@example.com".to_string()),
            phone: Some("   ".to_string()),
            location: Some("Paris".to_string()),
            ..Default::default()
        };
        assert_eq!(candidate.contact_fields(), vec!["jane@example.com", "Paris"]);
    }
}
