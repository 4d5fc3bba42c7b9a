use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;
use crate::models::domain::ExperienceLevel;

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Engagement window of a coaching request
///
/// Dates are kept as submitted (RFC 3339 or `YYYY-MM-DD`) and parsed where
/// they are used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(rename = "startDate", default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(rename = "endDate", default, deserialize_with = "null_as_default")]
    pub end_date: String,
}

/// Request to find coaches for a coaching program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MatchingRequest {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "requiredSkills", default, deserialize_with = "null_as_default")]
    pub required_skills: Vec<String>,
    #[serde(rename = "preferredExperience", default, deserialize_with = "null_as_default")]
    pub preferred_experience: ExperienceLevel,
    /// Hourly ceiling; zero or negative means "no budget given"
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timeline: Timeline,
    #[serde(rename = "teamMembers", default, deserialize_with = "null_as_default")]
    pub team_members: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub goals: Vec<String>,
}

/// Request to accept or reject a proposed coach
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DecisionRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "requestId")]
    pub request_id: String,
    #[validate(length(min = 1))]
    #[serde(rename = "coachId")]
    pub coach_id: String,
    pub decision: String,
    #[serde(default)]
    pub reason: Option<String>,
}
