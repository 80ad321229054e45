//! User profile data model.

use serde::{Deserialize, Serialize};

/// Name used when a profile has no usable first name.
pub const FALLBACK_NAME: &str = "there";

/// Gender as stored on the profile. Anything unrecognized is `Other`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "male" => Self::Male,
            "female" => Self::Female,
            _ => Self::Other,
        })
    }
}

/// Three-way BMI band used by the chat copy.
///
/// Only `<` and `>` are used, so 18.5 and 25 both land in `Healthy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiBand {
    Underweight,
    Healthy,
    Overweight,
}

impl BmiBand {
    pub fn of(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi > 25.0 {
            Self::Overweight
        } else {
            Self::Healthy
        }
    }
}

/// Read-only snapshot of a user's wellness profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness_goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_points: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
    #[serde(default)]
    pub profile_completed: bool,
}

impl Profile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.full_name = Some(name.to_string());
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_goal(mut self, goal: &str) -> Self {
        self.fitness_goal = Some(goal.to_string());
        self
    }

    pub fn with_bmi(mut self, bmi: f64) -> Self {
        self.bmi = Some(bmi);
        self
    }

    pub fn with_points(mut self, points: i64) -> Self {
        self.total_points = Some(points);
        self
    }

    pub fn with_profession(mut self, profession: &str) -> Self {
        self.profession = Some(profession.to_string());
        self
    }

    /// Text before the first whitespace of the full name, or `"there"` when that is empty.
    pub fn first_name(&self) -> &str {
        self.full_name
            .as_deref()
            .and_then(|n| n.split(char::is_whitespace).next())
            .filter(|t| !t.is_empty())
            .unwrap_or(FALLBACK_NAME)
    }

    /// Goal with underscores rendered as spaces (`muscle_building` → `muscle building`).
    pub fn goal_label(&self) -> Option<String> {
        self.fitness_goal
            .as_deref()
            .filter(|g| !g.is_empty())
            .map(|g| g.replace('_', " "))
    }

    /// The raw goal token, if set and non-empty.
    pub fn goal(&self) -> Option<&str> {
        self.fitness_goal.as_deref().filter(|g| !g.is_empty())
    }

    /// BMI if it carries a usable value. Zero and non-finite values count as unset.
    pub fn bmi(&self) -> Option<f64> {
        self.bmi.filter(|b| b.is_finite() && *b != 0.0)
    }

    /// Total points, with zero treated as unset.
    pub fn points(&self) -> Option<i64> {
        self.total_points.filter(|p| *p != 0)
    }

    pub fn is_female(&self) -> bool {
        self.gender == Some(Gender::Female)
    }

    pub fn is_male(&self) -> bool {
        self.gender == Some(Gender::Male)
    }

    pub fn is_student(&self) -> bool {
        self.profession
            .as_deref()
            .is_some_and(|p| p.to_lowercase().contains("student"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_name_takes_first_token() {
        let profile = Profile::new("u1").with_name("Alex Smith");
        assert_eq!(profile.first_name(), "Alex");
    }

    #[test]
    fn first_name_falls_back() {
        assert_eq!(Profile::new("u1").first_name(), "there");
        assert_eq!(Profile::new("u1").with_name("").first_name(), "there");
        assert_eq!(Profile::new("u1").with_name("   ").first_name(), "there");
        assert_eq!(Profile::new("u1").with_name(" Alex Smith").first_name(), "there");
    }

    #[test]
    fn goal_label_replaces_every_underscore() {
        let profile = Profile::new("u1").with_goal("build_lean_muscle");
        assert_eq!(profile.goal_label().as_deref(), Some("build lean muscle"));
        assert_eq!(Profile::new("u1").with_goal("").goal_label(), None);
    }

    #[test]
    fn bmi_bands_use_strict_comparisons() {
        assert_eq!(BmiBand::of(18.4), BmiBand::Underweight);
        assert_eq!(BmiBand::of(18.5), BmiBand::Healthy);
        assert_eq!(BmiBand::of(25.0), BmiBand::Healthy);
        assert_eq!(BmiBand::of(25.01), BmiBand::Overweight);
    }

    #[test]
    fn zero_values_are_unset() {
        let profile = Profile::new("u1").with_bmi(0.0).with_points(0);
        assert_eq!(profile.bmi(), None);
        assert_eq!(profile.points(), None);
    }

    #[test]
    fn student_check_ignores_case() {
        assert!(Profile::new("u1").with_profession("Grad STUDENT").is_student());
        assert!(!Profile::new("u1").with_profession("Engineer").is_student());
        assert!(!Profile::new("u1").is_student());
    }

    #[test]
    fn unknown_gender_deserializes_as_other() {
        let profile: Profile =
            serde_json::from_str(r#"{"id":"u1","gender":"non_binary"}"#).unwrap();
        assert_eq!(profile.gender, Some(Gender::Other));
        assert!(!profile.is_female() && !profile.is_male());
    }
}
