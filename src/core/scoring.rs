use crate::models::{Availability, CoachCandidate, ExperienceLevel, MatchingRequest, MatchingWeights};

/// Budget assumed when a request gives none (or a non-positive one)
pub const DEFAULT_BUDGET: f64 = 200.0;

/// Reason used when no individual sub-score stands out
pub const BASIC_COMPATIBILITY_REASON: &str = "Basic compatibility match";

/// Calculate a match score (0.0-1.0 under 100-sum weights) and the reasons behind it
///
/// Scoring formula:
/// score = (
///     skill_score        * skillMatch   / 100 +
///     experience_score   * experience   / 100 +
///     rating_score       * rating       / 100 +
///     availability_score * availability / 100 +
///     price_score        * price        / 100
/// ), rounded to 2 decimals
///
/// Weights are applied literally. If they do not sum to 100 the score scales
/// with their sum and is not clamped.
///
/// Reasons are emitted in the fixed order skill, experience, rating,
/// availability, price, and are never empty.
pub fn calculate_match_score(
    coach: &CoachCandidate,
    request: &MatchingRequest,
    weights: &MatchingWeights,
) -> (f64, Vec<String>) {
    let mut reasons = Vec::new();

    // 1. Skill overlap
    let skill_score = calculate_skill_score(&coach.skills, &request.required_skills);
    if skill_score > 0.7 {
        reasons.push(format!(
            "Strong skill match ({}%)",
            (skill_score * 100.0).round() as i64
        ));
    }

    // 2. Experience distance
    let experience_score = calculate_experience_score(coach.experience, request.preferred_experience);
    if experience_score > 0.8 {
        reasons.push("Perfect experience level match".to_string());
    }

    // 3. Rating
    let rating_score = calculate_rating_score(coach.rating);
    if coach.rating >= 4.5 {
        reasons.push(format!("Excellent rating ({}/5)", coach.rating));
    }

    // 4. Availability
    let availability_score = calculate_availability_score(coach.availability);
    if availability_score >= 0.8 {
        reasons.push("Quick availability".to_string());
    }

    // 5. Price against budget
    let budget = effective_budget(request.budget);
    let price_score = calculate_price_score(coach.hourly_rate, budget);
    if coach.hourly_rate <= budget * 0.8 {
        reasons.push(format!("Within budget (${}/hr)", coach.hourly_rate));
    }

    let total_score = skill_score * (weights.skill_match / 100.0)
        + experience_score * (weights.experience / 100.0)
        + rating_score * (weights.rating / 100.0)
        + availability_score * (weights.availability / 100.0)
        + price_score * (weights.price / 100.0);

    if reasons.is_empty() {
        reasons.push(BASIC_COMPATIBILITY_REASON.to_string());
    }

    (round_score(total_score), reasons)
}

/// Round to 2 decimal places
#[inline]
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

/// Budget used by the price sub-score
#[inline]
pub fn effective_budget(budget: f64) -> f64 {
    if budget.is_finite() && budget > 0.0 {
        budget
    } else {
        DEFAULT_BUDGET
    }
}

/// Calculate skill score (0-1)
/// Share of required skills covered by coach skills that overlap one of them
/// (case-insensitive substring in either direction)
#[inline]
pub fn calculate_skill_score(coach_skills: &[String], required_skills: &[String]) -> f64 {
    let required: Vec<String> = required_skills.iter().map(|s| s.to_lowercase()).collect();

    let overlap = coach_skills
        .iter()
        .map(|s| s.to_lowercase())
        .filter(|skill| {
            required
                .iter()
                .any(|req| skill.contains(req.as_str()) || req.contains(skill.as_str()))
        })
        .count();

    let denominator = required_skills.len().max(1) as f64;

    (overlap as f64 / denominator).min(1.0)
}

/// Calculate experience score (0-1)
/// Each step between levels costs a third of the score
#[inline]
pub fn calculate_experience_score(coach: ExperienceLevel, requested: ExperienceLevel) -> f64 {
    let distance = (coach.ordinal() as f64 - requested.ordinal() as f64).abs();
    (1.0 - distance / 3.0).max(0.0)
}

/// Calculate rating score (0-1) from a 0-5 rating
#[inline]
pub fn calculate_rating_score(rating: f64) -> f64 {
    if !rating.is_finite() || rating <= 0.0 {
        return 0.0;
    }
    (rating / 5.0).min(1.0)
}

#[inline]
pub fn calculate_availability_score(availability: Availability) -> f64 {
    match availability {
        Availability::Immediate => 1.0,
        Availability::ThisWeek => 0.8,
        Availability::NextWeek => 0.6,
        Availability::Later => 0.4,
    }
}

/// Calculate price score (0-1)
/// Full score at or under budget, falling linearly to zero at twice the budget
#[inline]
pub fn calculate_price_score(hourly_rate: f64, budget: f64) -> f64 {
    let overage = (hourly_rate - budget).max(0.0);
    (1.0 - overage / budget).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timeline;

    fn create_test_coach(skills: &[&str], rating: f64, hourly_rate: f64) -> CoachCandidate {
        CoachCandidate {
            id: "coach_1".to_string(),
            name: "Sarah Wilson".to_string(),
            title: "Tech Lead".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience: ExperienceLevel::Senior,
            rating,
            availability: Availability::Immediate,
            hourly_rate,
            profile_image: None,
            bio: String::new(),
            expertise: vec![],
            years_experience: 8.0,
            languages: vec!["English".to_string()],
            timezone: "PST".to_string(),
        }
    }

    fn create_test_request(skills: &[&str], budget: f64) -> MatchingRequest {
        MatchingRequest {
            id: "req_1".to_string(),
            title: "Frontend program".to_string(),
            description: String::new(),
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            preferred_experience: ExperienceLevel::Senior,
            budget,
            timeline: Timeline::default(),
            team_members: vec![],
            goals: vec![],
        }
    }

    #[test]
    fn test_calculate_match_score_strong_candidate() {
        let coach = create_test_coach(&["React", "TypeScript", "Node.js"], 4.9, 120.0);
        let request = create_test_request(&["React", "TypeScript"], 150.0);

        let (score, reasons) = calculate_match_score(&coach, &request, &MatchingWeights::FALLBACK);

        assert_eq!(score, 1.0);
        assert_eq!(
            reasons,
            vec![
                "Strong skill match (100%)",
                "Perfect experience level match",
                "Excellent rating (4.9/5)",
                "Quick availability",
                "Within budget ($120/hr)",
            ]
        );
    }

    #[test]
    fn test_skill_score_substring_both_directions() {
        let coach: Vec<String> = vec!["react native".into(), "go".into()];
        let required: Vec<String> = vec!["React".into(), "Golang".into()];

        assert_eq!(calculate_skill_score(&coach, &required), 1.0);
    }

    #[test]
    fn test_skill_score_empty_required() {
        let coach: Vec<String> = vec!["React".into()];
        assert_eq!(calculate_skill_score(&coach, &[]), 0.0);
    }

    #[test]
    fn test_skill_score_capped() {
        let coach: Vec<String> = vec!["React".into(), "React Native".into(), "Preact".into()];
        let required: Vec<String> = vec!["react".into()];
        assert_eq!(calculate_skill_score(&coach, &required), 1.0);
    }

    #[test]
    fn test_experience_score() {
        assert_eq!(calculate_experience_score(ExperienceLevel::Senior, ExperienceLevel::Senior), 1.0);
        assert_eq!(calculate_experience_score(ExperienceLevel::Junior, ExperienceLevel::Expert), 0.0);

        let one_step = calculate_experience_score(ExperienceLevel::MidLevel, ExperienceLevel::Senior);
        assert!((one_step - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rating_score() {
        assert!((calculate_rating_score(4.9) - 0.98).abs() < 1e-9);
        assert_eq!(calculate_rating_score(0.0), 0.0);
        assert_eq!(calculate_rating_score(7.0), 1.0);
    }

    #[test]
    fn test_price_score_far_over_budget() {
        assert_eq!(calculate_price_score(500.0, 100.0), 0.0);
        assert_eq!(calculate_price_score(80.0, 100.0), 1.0);
        assert!((calculate_price_score(150.0, 100.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_no_budget_uses_default() {
        assert_eq!(effective_budget(0.0), DEFAULT_BUDGET);
        assert_eq!(effective_budget(-10.0), DEFAULT_BUDGET);
        assert_eq!(effective_budget(f64::NAN), DEFAULT_BUDGET);
        assert_eq!(effective_budget(150.0), 150.0);
    }

    #[test]
    fn test_over_budget_has_no_budget_reason() {
        let coach = create_test_coach(&["React"], 4.9, 500.0);
        let request = create_test_request(&["React"], 100.0);

        let (_, reasons) = calculate_match_score(&coach, &request, &MatchingWeights::FALLBACK);

        assert!(reasons.iter().all(|r| !r.starts_with("Within budget")));
    }

    #[test]
    fn test_basic_compatibility_fallback_reason() {
        let mut coach = create_test_coach(&["Cooking"], 3.0, 500.0);
        coach.experience = ExperienceLevel::Junior;
        coach.availability = Availability::Later;
        let request = create_test_request(&["Rust"], 100.0);

        let (score, reasons) = calculate_match_score(&coach, &request, &MatchingWeights::FALLBACK);

        assert_eq!(reasons, vec![BASIC_COMPATIBILITY_REASON]);
        assert!(score > 0.0);
    }

    #[test]
    fn test_unnormalized_weights_scale_score() {
        let coach = create_test_coach(&["React"], 5.0, 100.0);
        let request = create_test_request(&["React"], 150.0);
        let doubled = MatchingWeights {
            skill_match: 60.0,
            experience: 50.0,
            rating: 40.0,
            availability: 30.0,
            price: 20.0,
        };

        let (score, _) = calculate_match_score(&coach, &request, &doubled);

        assert_eq!(score, 2.0);
    }

    #[test]
    fn test_zero_weights_give_zero_score() {
        let coach = create_test_coach(&["React"], 5.0, 100.0);
        let request = create_test_request(&["React"], 150.0);
        let zero = MatchingWeights {
            skill_match: 0.0,
            experience: 0.0,
            rating: 0.0,
            availability: 0.0,
            price: 0.0,
        };

        let (score, reasons) = calculate_match_score(&coach, &request, &zero);

        assert_eq!(score, 0.0);
        assert!(!reasons.is_empty());
    }
}
