use serde_json::Value;
use crate::models::{Availability, CoachCandidate, ExperienceLevel};

/// Title used when the directory has none
pub const DEFAULT_TITLE: &str = "Professional Coach";
pub const DEFAULT_HOURLY_RATE: f64 = 120.0;
pub const DEFAULT_YEARS_EXPERIENCE: f64 = 3.0;
pub const DEFAULT_TIMEZONE: &str = "EST";
pub const DEFAULT_BIO: &str =
    "Experienced professional coach dedicated to helping individuals and teams achieve their goals.";

/// Adapt a coach directory record into the canonical `CoachCandidate` shape
///
/// This is the only place that knows about the directory's field-name
/// variants. Missing or mistyped fields are defaulted so the coach can still
/// be scored. Returns `None` only when the record has no usable `id`.
///
/// Canonical shape and sources, in order of preference:
/// - `name`: `name`, else `firstName lastName`
/// - `skills`: `skills`, else `coaching[].name`
/// - `experience`: years from `yearsExperience` or a numeric `experience`,
///   else the label in `experience`, else mid-level
/// - `rating`: `metrics.averageRating`, else `rating`, else 0
/// - `availability`: `availability` label, else derived from `status`
/// - `hourlyRate`: `hourlyRate`, else 120
pub fn adapt_coach_record(record: &Value) -> Option<CoachCandidate> {
    let id = identity(record)?;

    let name = text(record, "name").unwrap_or_else(|| {
        let first = text(record, "firstName").unwrap_or_default();
        let last = text(record, "lastName").unwrap_or_default();
        format!("{} {}", first, last).trim().to_string()
    });

    let skills = string_list(record.get("skills"))
        .or_else(|| {
            record.get("coaching").and_then(Value::as_array).map(|areas| {
                areas
                    .iter()
                    .filter_map(|area| text(area, "name"))
                    .collect()
            })
        })
        .unwrap_or_default();

    let years_experience = positive_number(record, "yearsExperience")
        .or_else(|| positive_number(record, "experience"));

    let experience = match (years_experience, text(record, "experience")) {
        (Some(years), _) => ExperienceLevel::from_years(years),
        (None, Some(label)) => ExperienceLevel::from_label(&label),
        (None, None) => ExperienceLevel::default(),
    };

    let rating = record
        .get("metrics")
        .and_then(|metrics| positive_number(metrics, "averageRating"))
        .or_else(|| positive_number(record, "rating"))
        .unwrap_or(0.0);

    let availability = match text(record, "availability") {
        Some(label) => Availability::from_label(&label),
        None => match text(record, "status").as_deref() {
            Some("active") => Availability::Immediate,
            Some(_) => Availability::NextWeek,
            None => Availability::Later,
        },
    };

    Some(CoachCandidate {
        id,
        name,
        title: text(record, "title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        skills,
        experience,
        rating,
        availability,
        hourly_rate: positive_number(record, "hourlyRate").unwrap_or(DEFAULT_HOURLY_RATE),
        profile_image: text(record, "profilePicture").or_else(|| text(record, "avatar")),
        bio: text(record, "bio").unwrap_or_else(|| DEFAULT_BIO.to_string()),
        expertise: string_list(record.get("specializations"))
            .or_else(|| string_list(record.get("expertise")))
            .unwrap_or_default(),
        years_experience: years_experience.unwrap_or(DEFAULT_YEARS_EXPERIENCE),
        languages: string_list(record.get("languages"))
            .filter(|langs| !langs.is_empty())
            .unwrap_or_else(|| vec!["English".to_string()]),
        timezone: text(record, "timezone").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
    })
}

/// Adapt a batch of records, dropping (and logging) those without identity
pub fn adapt_coach_records(records: &[Value]) -> Vec<CoachCandidate> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let candidate = adapt_coach_record(record);
            if candidate.is_none() {
                tracing::warn!(
                    "Excluding coach record at position {} from the candidate pool: missing id",
                    index
                );
            }
            candidate
        })
        .collect()
}

fn identity(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Non-empty string field
fn text(record: &Value, field: &str) -> Option<String> {
    record
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Numeric field that is finite and greater than zero
fn positive_number(record: &Value, field: &str) -> Option<f64> {
    record
        .get(field)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite() && *n > 0.0)
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    value.and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_record_passes_through() {
        let record = json!({
            "id": "coach_1",
            "name": "Sarah Wilson",
            "title": "Tech Lead",
            "skills": ["React", "TypeScript"],
            "experience": "senior",
            "rating": 4.9,
            "availability": "immediate",
            "hourlyRate": 120,
            "yearsExperience": 8,
            "languages": ["English", "Spanish"],
            "timezone": "PST"
        });

        let coach = adapt_coach_record(&record).unwrap();

        assert_eq!(coach.id, "coach_1");
        assert_eq!(coach.skills, vec!["React", "TypeScript"]);
        assert_eq!(coach.experience, ExperienceLevel::Senior);
        assert_eq!(coach.rating, 4.9);
        assert_eq!(coach.availability, Availability::Immediate);
        assert_eq!(coach.hourly_rate, 120.0);
        assert_eq!(coach.years_experience, 8.0);
    }

    #[test]
    fn test_platform_record_variants() {
        let record = json!({
            "id": 42,
            "firstName": "Michael",
            "lastName": "Chen",
            "coaching": [{"name": "React"}, {"name": "GraphQL"}],
            "yearsExperience": 12,
            "metrics": {"averageRating": 4.7},
            "rating": 3.0,
            "status": "active",
            "avatar": "https://img.test/mc.png",
            "specializations": ["Design Systems"]
        });

        let coach = adapt_coach_record(&record).unwrap();

        assert_eq!(coach.id, "42");
        assert_eq!(coach.name, "Michael Chen");
        assert_eq!(coach.skills, vec!["React", "GraphQL"]);
        assert_eq!(coach.experience, ExperienceLevel::Expert);
        assert_eq!(coach.rating, 4.7);
        assert_eq!(coach.availability, Availability::Immediate);
        assert_eq!(coach.profile_image.as_deref(), Some("https://img.test/mc.png"));
        assert_eq!(coach.expertise, vec!["Design Systems"]);
    }

    #[test]
    fn test_numeric_experience_field() {
        let record = json!({"id": "c", "experience": 3});
        let coach = adapt_coach_record(&record).unwrap();

        assert_eq!(coach.experience, ExperienceLevel::MidLevel);
        assert_eq!(coach.years_experience, 3.0);
    }

    #[test]
    fn test_missing_fields_defaulted() {
        let record = json!({"id": "bare", "rating": "five stars", "hourlyRate": null});
        let coach = adapt_coach_record(&record).unwrap();

        assert_eq!(coach.title, DEFAULT_TITLE);
        assert_eq!(coach.experience, ExperienceLevel::MidLevel);
        assert_eq!(coach.rating, 0.0);
        assert_eq!(coach.availability, Availability::Later);
        assert_eq!(coach.hourly_rate, DEFAULT_HOURLY_RATE);
        assert_eq!(coach.languages, vec!["English"]);
        assert!(coach.skills.is_empty());
    }

    #[test]
    fn test_inactive_status_is_next_week() {
        let record = json!({"id": "c", "status": "on_leave"});
        let coach = adapt_coach_record(&record).unwrap();
        assert_eq!(coach.availability, Availability::NextWeek);
    }

    #[test]
    fn test_record_without_id_excluded() {
        let records = vec![
            json!({"name": "No Id"}),
            json!({"id": "  ", "name": "Blank Id"}),
            json!({"id": "ok"}),
        ];

        let coaches = adapt_coach_records(&records);

        assert_eq!(coaches.len(), 1);
        assert_eq!(coaches[0].id, "ok");
    }
}
