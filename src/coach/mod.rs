//! Rule-based wellness coach.
//!
//! Two independent pieces share the `Profile` input:
//! - `welcome::compose` builds the greeting for an empty chat.
//! - `ResponseSelector` classifies a message by ordered keyword rules and
//!   renders the matching reply, falling back to one of three generic prompts.

pub mod chooser;
pub mod replies;
pub mod rules;
pub mod welcome;

use serde::Serialize;

pub use chooser::{FallbackChooser, RandomChooser};
pub use rules::{RulesEngine, Topic, TopicRule};
pub use welcome::compose;

use crate::profile::Profile;

/// A computed coach reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub topic: Topic,
    pub text: String,
}

/// Selects a reply for a user message.
pub struct ResponseSelector {
    rules: RulesEngine,
    chooser: Box<dyn FallbackChooser>,
}

impl ResponseSelector {
    /// Standard rules with a random fallback.
    pub fn new() -> Self {
        Self::with_chooser(RandomChooser)
    }

    /// Standard rules with the given fallback chooser.
    pub fn with_chooser(chooser: impl FallbackChooser + 'static) -> Self {
        Self {
            rules: RulesEngine::default_rules(),
            chooser: Box::new(chooser),
        }
    }

    pub fn with_rules(mut self, rules: RulesEngine) -> Self {
        self.rules = rules;
        self
    }

    pub fn classify(&self, message: &str, profile: &Profile) -> Topic {
        self.rules.classify(message, profile)
    }

    pub fn reply(&self, message: &str, profile: &Profile) -> Reply {
        if let Some(rule) = self.rules.evaluate(message, profile) {
            return Reply {
                topic: rule.topic,
                text: (rule.reply)(profile),
            };
        }

        let options = replies::fallbacks(profile);
        let idx = self.chooser.choose(options.len()) % options.len();
        let [a, b, c] = options;
        let text = match idx {
            0 => a,
            1 => b,
            _ => c,
        };
        Reply {
            topic: Topic::Fallback,
            text,
        }
    }

    pub fn respond(&self, message: &str, profile: &Profile) -> String {
        self.reply(message, profile).text
    }
}

impl Default for ResponseSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Gender;

    fn fixed(idx: usize) -> ResponseSelector {
        ResponseSelector::with_chooser(move |_len: usize| idx)
    }

    #[test]
    fn alex_workout_scenario() {
        let profile = Profile::new("alex")
            .with_name("Alex Smith")
            .with_gender(Gender::Male)
            .with_goal("muscle_building")
            .with_bmi(27.0);
        let reply = ResponseSelector::new().reply("any workout tips?", &profile);
        assert_eq!(reply.topic, Topic::Workout);
        assert!(reply.text.contains("**Push Day:**"));
        assert!(reply.text.contains(replies::PROGRESSIVE_OVERLOAD));
        assert!(!reply.text.contains(replies::MALE_CARDIO));
        assert!(!reply.text.contains(replies::FEMALE_COMPOUND_CARDIO));
    }

    #[test]
    fn tired_gets_stress_reply() {
        let reply = ResponseSelector::new().reply("I'm so tired", &Profile::new("u1"));
        assert_eq!(reply.topic, Topic::Stress);
        assert!(reply.text.starts_with("💙"));
    }

    #[test]
    fn cycle_for_non_female_falls_back() {
        let profile = Profile::new("u1").with_gender(Gender::Male);
        let reply = fixed(1).reply("tell me about my cycle", &profile);
        assert_eq!(reply.topic, Topic::Fallback);
        assert_eq!(reply.text, replies::fallbacks(&profile)[1]);
        assert!(!reply.text.contains("Cycle syncing"));
    }

    #[test]
    fn fallback_is_reproducible_with_fixed_chooser() {
        let profile = Profile::new("u1").with_goal("stress_relief");
        let options = replies::fallbacks(&profile);
        for idx in 0..3 {
            let selector = fixed(idx);
            let first = selector.respond("hello", &profile);
            assert_eq!(first, options[idx]);
            assert_eq!(first, selector.respond("hello", &profile));
        }
    }

    #[test]
    fn out_of_range_choice_wraps() {
        let profile = Profile::new("u1");
        assert_eq!(
            fixed(4).respond("hello", &profile),
            replies::fallbacks(&profile)[1]
        );
    }

    #[test]
    fn random_fallback_stays_in_set() {
        let profile = Profile::new("u1");
        let options = replies::fallbacks(&profile);
        let selector = ResponseSelector::new();
        for _ in 0..50 {
            let text = selector.respond("hi", &profile);
            assert!(options.contains(&text));
        }
    }

    #[test]
    fn chooser_sees_three_options() {
        let selector = ResponseSelector::with_chooser(|len: usize| {
            assert_eq!(len, 3);
            0
        });
        selector.respond("hello", &Profile::new("u1"));
    }
}
