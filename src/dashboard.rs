//! Dashboard content: time-of-day greeting, BMI status, tips and weekly points.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::Serialize;

use crate::error::DatabaseError;
use crate::profile::{Gender, Profile};
use crate::store::Database;

/// Number of tips shown on the dashboard.
pub const MAX_TIPS: usize = 3;

/// Four-way BMI classification shown on the dashboard badge.
///
/// Uses its own cut-offs: 25 is already `Overweight` here.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum BmiStatus {
    Underweight,
    Healthy,
    Overweight,
    Obese,
}

impl BmiStatus {
    pub fn of(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Healthy
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}

/// "Good morning, Alex!" style greeting for the given local hour.
pub fn greeting(hour: u32, profile: &Profile) -> String {
    let salutation = match hour {
        12..=16 => "Good afternoon",
        h if h >= 17 => "Good evening",
        _ => "Good morning",
    };
    format!("{salutation}, {}!", profile.first_name())
}

/// Up to three tips, most specific first.
pub fn personalized_tips(profile: &Profile) -> Vec<&'static str> {
    let mut tips = Vec::new();

    match profile.gender {
        Some(Gender::Female) => {
            tips.push("💪 Consider cycle syncing your workouts for optimal results");
            tips.push("🌸 Track your menstrual cycle to align nutrition and exercise");
        }
        Some(Gender::Male) => {
            tips.push("💪 Focus on compound movements for maximum muscle engagement");
            tips.push("🏋️ Progressive overload is key for strength development");
        }
        _ => {}
    }

    match profile.bmi().map(BmiStatus::of) {
        Some(BmiStatus::Underweight) => {
            tips.push("🍽️ Focus on caloric surplus with nutrient-dense foods")
        }
        Some(BmiStatus::Overweight) => {
            tips.push("🏃 Combine cardio with strength training for best results")
        }
        _ => {}
    }

    tips.push("💧 Stay hydrated - aim for 8 glasses of water daily");
    tips.push("😴 Quality sleep is crucial for recovery and wellness");

    tips.truncate(MAX_TIPS);
    tips
}

/// Everything the dashboard header needs for one user.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub greeting: String,
    pub bmi: Option<f64>,
    pub bmi_status: Option<BmiStatus>,
    pub tips: Vec<&'static str>,
    pub weekly_points: i64,
    pub total_points: i64,
}

/// Assemble the dashboard for `profile` as of `now`.
pub async fn summarize(
    db: &dyn Database,
    profile: &Profile,
    now: DateTime<Utc>,
) -> Result<DashboardSummary, DatabaseError> {
    let weekly_points = db
        .points_since(&profile.id, now - Duration::days(7))
        .await?;
    Ok(DashboardSummary {
        greeting: greeting(now.hour(), profile),
        bmi: profile.bmi(),
        bmi_status: profile.bmi().map(BmiStatus::of),
        tips: personalized_tips(profile),
        weekly_points,
        total_points: profile.total_points.unwrap_or(0),
    })
}
