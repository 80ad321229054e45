//! Personalised welcome message shown when a chat has no history.

use crate::profile::{BmiBand, Profile};

pub const FEMALE_BLOCK: &str = "💃 As a woman, I can provide cycle-synced workout suggestions and nutrition tips that align with your hormonal patterns. ";
pub const MALE_BLOCK: &str = "💪 I can suggest male-focused workout routines and nutrition strategies optimized for your goals. ";

const MENU: &str = "What would you like to talk about today? I can help with:\n\
                    • Workout recommendations\n\
                    • Nutrition advice\n\
                    • Stress management\n\
                    • Sleep optimization\n\
                    • Motivation tips\n\n\
                    Just ask me anything! 😊";

/// Compose the welcome text for a profile. Pure: same profile, same output.
pub fn compose(profile: &Profile) -> String {
    let mut welcome = format!(
        "Hi {}! I'm your AI wellness coach. I'm here to help you on your journey! 🌟\n\n",
        profile.first_name()
    );

    if let Some(goal) = profile.goal_label() {
        welcome.push_str(&format!("I see your goal is {goal}. That's fantastic! "));
    }

    if let Some(bmi) = profile.bmi() {
        let sentence = match BmiBand::of(bmi) {
            BmiBand::Underweight => format!(
                "With your current BMI of {bmi}, I can suggest some great strategies for healthy weight gain and muscle building. "
            ),
            BmiBand::Overweight => format!(
                "With your current BMI of {bmi}, I can help you create a sustainable plan for healthy weight management. "
            ),
            BmiBand::Healthy => format!(
                "Your BMI of {bmi} is in the healthy range - great job! I can help you maintain this and work toward your fitness goals. "
            ),
        };
        welcome.push_str(&sentence);
    }

    if profile.is_female() {
        welcome.push_str("\n\n");
        welcome.push_str(FEMALE_BLOCK);
    } else if profile.is_male() {
        welcome.push_str("\n\n");
        welcome.push_str(MALE_BLOCK);
    }

    welcome.push_str("\n\n");
    welcome.push_str(MENU);
    welcome
}
