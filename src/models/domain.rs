use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seniority of a coach, or the seniority a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperienceLevel {
    Junior,
    MidLevel,
    Senior,
    Expert,
}

impl ExperienceLevel {
    /// Parse a label such as `"senior"` or `"mid-level"`.
    /// Unknown labels fall back to mid-level.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "junior" => ExperienceLevel::Junior,
            "senior" => ExperienceLevel::Senior,
            "expert" => ExperienceLevel::Expert,
            _ => ExperienceLevel::MidLevel,
        }
    }

    /// Map years in the profession onto a level
    pub fn from_years(years: f64) -> Self {
        if years < 2.0 {
            ExperienceLevel::Junior
        } else if years < 5.0 {
            ExperienceLevel::MidLevel
        } else if years < 10.0 {
            ExperienceLevel::Senior
        } else {
            ExperienceLevel::Expert
        }
    }

    /// Ordinal position used by the experience sub-score (1..=4)
    pub fn ordinal(self) -> u8 {
        match self {
            ExperienceLevel::Junior => 1,
            ExperienceLevel::MidLevel => 2,
            ExperienceLevel::Senior => 3,
            ExperienceLevel::Expert => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "junior",
            ExperienceLevel::MidLevel => "mid-level",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Expert => "expert",
        }
    }
}

impl Default for ExperienceLevel {
    fn default() -> Self {
        ExperienceLevel::MidLevel
    }
}

impl Serialize for ExperienceLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExperienceLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(ExperienceLevel::from_label(&label))
    }
}

/// How soon a coach can start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    Immediate,
    ThisWeek,
    NextWeek,
    Later,
}

impl Availability {
    /// Parse a label such as `"this_week"`. Anything unrecognised is `Later`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "immediate" => Availability::Immediate,
            "this_week" => Availability::ThisWeek,
            "next_week" => Availability::NextWeek,
            _ => Availability::Later,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Availability::Immediate => "immediate",
            Availability::ThisWeek => "this_week",
            Availability::NextWeek => "next_week",
            Availability::Later => "later",
        }
    }
}

impl Default for Availability {
    fn default() -> Self {
        Availability::Later
    }
}

impl Serialize for Availability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Availability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Availability::from_label(&label))
    }
}

/// Matching weights configured by platform administrators
///
/// Each field is a percentage; the five are meant to sum to 100 but this is
/// not enforced. Scores scale proportionally with the sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchingWeights {
    #[serde(rename = "skillMatch")]
    pub skill_match: f64,
    pub experience: f64,
    pub rating: f64,
    pub availability: f64,
    pub price: f64,
}

impl MatchingWeights {
    /// Weights applied whenever the configuration source cannot be read
    pub const FALLBACK: MatchingWeights = MatchingWeights {
        skill_match: 30.0,
        experience: 25.0,
        rating: 20.0,
        availability: 15.0,
        price: 10.0,
    };

    pub fn total(&self) -> f64 {
        self.skill_match + self.experience + self.rating + self.availability + self.price
    }

    /// All weights finite and non-negative
    pub fn is_well_formed(&self) -> bool {
        [
            self.skill_match,
            self.experience,
            self.rating,
            self.availability,
            self.price,
        ]
        .iter()
        .all(|w| w.is_finite() && *w >= 0.0)
    }
}

impl Default for MatchingWeights {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// A coach's matchable attributes, in canonical shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachCandidate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: ExperienceLevel,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub availability: Availability,
    #[serde(rename = "hourlyRate")]
    pub hourly_rate: f64,
    #[serde(rename = "profileImage", default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(rename = "yearsExperience", default)]
    pub years_experience: f64,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub timezone: String,
}

/// Scored coach returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachMatch {
    #[serde(flatten)]
    pub coach: CoachCandidate,
    #[serde(rename = "matchScore")]
    pub match_score: f64,
    #[serde(rename = "matchReasons")]
    pub match_reasons: Vec<String>,
    /// Planning estimate for the whole engagement, not a billing figure
    #[serde(rename = "estimatedCost")]
    pub estimated_cost: f64,
}

/// Output of one matching run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingResult {
    #[serde(rename = "requestId")]
    pub request_id: String,
    pub matches: Vec<CoachMatch>,
    #[serde(rename = "algorithmVersion")]
    pub algorithm_version: String,
    #[serde(rename = "configUsed")]
    pub config_used: MatchingWeights,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Length of `matches`, not the size of the candidate pool
    #[serde(rename = "totalMatches")]
    pub total_matches: usize,
}

/// Accept or reject outcome for a proposed coach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    Accepted,
    Rejected,
}

impl DecisionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionStatus::Accepted => "accepted",
            DecisionStatus::Rejected => "rejected",
        }
    }
}

/// A company admin's decision about one proposed coach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDecision {
    pub id: uuid::Uuid,
    #[serde(rename = "requestId")]
    pub request_id: String,
    #[serde(rename = "coachId")]
    pub coach_id: String,
    pub status: DecisionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl MatchDecision {
    pub fn accept(request_id: &str, coach_id: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            request_id: request_id.to_string(),
            coach_id: coach_id.to_string(),
            status: DecisionStatus::Accepted,
            reason: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn reject(request_id: &str, coach_id: &str, reason: Option<String>) -> Self {
        let reason = reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| "No reason provided".to_string());

        Self {
            id: uuid::Uuid::new_v4(),
            request_id: request_id.to_string(),
            coach_id: coach_id.to_string(),
            status: DecisionStatus::Rejected,
            reason: Some(reason),
            timestamp: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_labels() {
        assert_eq!(ExperienceLevel::from_label("senior"), ExperienceLevel::Senior);
        assert_eq!(ExperienceLevel::from_label("Mid-Level"), ExperienceLevel::MidLevel);
        assert_eq!(ExperienceLevel::from_label("wizard"), ExperienceLevel::MidLevel);
        assert_eq!(ExperienceLevel::MidLevel.as_str(), "mid-level");
    }

    #[test]
    fn test_experience_from_years() {
        assert_eq!(ExperienceLevel::from_years(1.0), ExperienceLevel::Junior);
        assert_eq!(ExperienceLevel::from_years(2.0), ExperienceLevel::MidLevel);
        assert_eq!(ExperienceLevel::from_years(7.0), ExperienceLevel::Senior);
        assert_eq!(ExperienceLevel::from_years(10.0), ExperienceLevel::Expert);
    }

    #[test]
    fn test_weights_serialize_camel_case() {
        let json = serde_json::to_value(MatchingWeights::FALLBACK).unwrap();
        assert_eq!(json["skillMatch"], 30.0);
        assert_eq!(json["price"], 10.0);
    }

    #[test]
    fn test_malformed_weights_detected() {
        let mut weights = MatchingWeights::FALLBACK;
        assert!(weights.is_well_formed());
        weights.rating = -5.0;
        assert!(!weights.is_well_formed());
        weights.rating = f64::NAN;
        assert!(!weights.is_well_formed());
    }

    #[test]
    fn test_reject_defaults_reason() {
        let decision = MatchDecision::reject("req_1", "coach_1", None);
        assert_eq!(decision.status, DecisionStatus::Rejected);
        assert_eq!(decision.reason.as_deref(), Some("No reason provided"));
    }
}
