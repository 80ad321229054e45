//! Ordered topic rules for the coach.
//!
//! Each rule pairs a keyword matcher (plus an optional profile guard) with a
//! reply builder. Rules are evaluated in order and the first match wins:
//! - workout / exercise / training → Workout
//! - diet / nutrition / food / meal → Nutrition
//! - stress / anxiety / mental / tired / overwhelmed → Stress
//! - sleep / tired / insomnia → Sleep
//! - motivated / give up / hard / difficult / discouraged → Motivation
//! - period / menstrual / cycle, female profiles only → Cycle
//!
//! "tired" appears in both Stress and Sleep; Stress is listed first and
//! therefore always claims it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::replies;
use crate::profile::Profile;

/// Classification outcome for an inbound message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Workout,
    Nutrition,
    Stress,
    Sleep,
    Motivation,
    Cycle,
    Fallback,
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Workout => "workout",
            Self::Nutrition => "nutrition",
            Self::Stress => "stress",
            Self::Sleep => "sleep",
            Self::Motivation => "motivation",
            Self::Cycle => "cycle",
            Self::Fallback => "fallback",
        };
        f.write_str(s)
    }
}

/// Builds a reply for a matched topic.
pub type ReplyFn = fn(&Profile) -> String;

/// Extra condition on the profile that must also hold for a rule to fire.
pub type ProfileGuard = fn(&Profile) -> bool;

/// A single topic rule.
#[derive(Debug, Clone)]
pub struct TopicRule {
    pub topic: Topic,
    /// Trigger words, lower-case.
    pub keywords: Vec<&'static str>,
    /// Alternation over the escaped keywords.
    pub regex: Regex,
    pub guard: Option<ProfileGuard>,
    pub reply: ReplyFn,
}

impl TopicRule {
    pub fn new(topic: Topic, keywords: &[&'static str], reply: ReplyFn) -> Self {
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        Self {
            topic,
            keywords: keywords.to_vec(),
            regex: Regex::new(&alternation).expect("escaped keyword alternation is a valid regex"),
            guard: None,
            reply,
        }
    }

    pub fn with_guard(mut self, guard: ProfileGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// `lowered` must already be lower-cased.
    pub fn matches(&self, lowered: &str, profile: &Profile) -> bool {
        self.regex.is_match(lowered) && self.guard.is_none_or(|guard| guard(profile))
    }
}

/// Ordered rule list with first-match-wins evaluation.
pub struct RulesEngine {
    rules: Vec<TopicRule>,
}

impl RulesEngine {
    /// The coach's standard topic table.
    pub fn default_rules() -> Self {
        let rules = vec![
            TopicRule::new(
                Topic::Workout,
                &["workout", "exercise", "training"],
                replies::workout,
            ),
            TopicRule::new(
                Topic::Nutrition,
                &["diet", "nutrition", "food", "meal"],
                replies::nutrition,
            ),
            TopicRule::new(
                Topic::Stress,
                &["stress", "anxiety", "mental", "tired", "overwhelmed"],
                replies::stress,
            ),
            TopicRule::new(Topic::Sleep, &["sleep", "tired", "insomnia"], replies::sleep),
            TopicRule::new(
                Topic::Motivation,
                &["motivated", "give up", "hard", "difficult", "discouraged"],
                replies::motivation,
            ),
            TopicRule::new(
                Topic::Cycle,
                &["period", "menstrual", "cycle"],
                replies::cycle,
            )
            .with_guard(Profile::is_female),
        ];
        Self { rules }
    }

    /// An engine with no rules; everything falls through.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule after the existing ones.
    pub fn push(&mut self, rule: TopicRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[TopicRule] {
        &self.rules
    }

    /// First rule matching the message, or `None` to fall back.
    pub fn evaluate(&self, message: &str, profile: &Profile) -> Option<&TopicRule> {
        let lowered = message.to_lowercase();
        let matched = self.rules.iter().find(|rule| rule.matches(&lowered, profile));
        match matched {
            Some(rule) => debug!(topic = %rule.topic, "Message matched topic rule"),
            None => debug!("No topic rule matched, using fallback"),
        }
        matched
    }

    pub fn classify(&self, message: &str, profile: &Profile) -> Topic {
        self.evaluate(message, profile)
            .map(|rule| rule.topic)
            .unwrap_or(Topic::Fallback)
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::default_rules()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Gender;

    fn engine() -> RulesEngine {
        RulesEngine::default_rules()
    }

    #[test]
    fn rules_are_in_priority_order() {
        let topics: Vec<Topic> = engine().rules().iter().map(|r| r.topic).collect();
        assert_eq!(
            topics,
            vec![
                Topic::Workout,
                Topic::Nutrition,
                Topic::Stress,
                Topic::Sleep,
                Topic::Motivation,
                Topic::Cycle,
            ]
        );
    }

    #[test]
    fn tired_is_stress_not_sleep() {
        let profile = Profile::new("u1");
        assert_eq!(engine().classify("I'm so tired", &profile), Topic::Stress);
    }

    #[test]
    fn sleep_without_tired() {
        let profile = Profile::new("u1");
        assert_eq!(engine().classify("I have insomnia", &profile), Topic::Sleep);
        assert_eq!(engine().classify("How do I sleep better?", &profile), Topic::Sleep);
    }

    #[test]
    fn matching_ignores_case() {
        let profile = Profile::new("u1");
        assert_eq!(engine().classify("WORKOUT plan please", &profile), Topic::Workout);
        assert_eq!(engine().classify("Meal ideas?", &profile), Topic::Nutrition);
    }

    #[test]
    fn earlier_rule_wins_on_overlap() {
        let profile = Profile::new("u1");
        // workout + food: workout comes first
        assert_eq!(
            engine().classify("what food before a workout", &profile),
            Topic::Workout
        );
        // stress + hard: stress comes first
        assert_eq!(engine().classify("this is hard and stressful", &profile), Topic::Stress);
    }

    #[test]
    fn substring_match_inside_words() {
        let profile = Profile::new("u1");
        // "hard" inside "hardly" still counts
        assert_eq!(engine().classify("I hardly move", &profile), Topic::Motivation);
        assert_eq!(engine().classify("I want to give up", &profile), Topic::Motivation);
    }

    #[test]
    fn cycle_requires_female_profile() {
        let female = Profile::new("u1").with_gender(Gender::Female);
        let male = Profile::new("u2").with_gender(Gender::Male);
        let unset = Profile::new("u3");

        assert_eq!(engine().classify("tell me about my cycle", &female), Topic::Cycle);
        assert_eq!(engine().classify("tell me about my cycle", &male), Topic::Fallback);
        assert_eq!(engine().classify("tell me about my cycle", &unset), Topic::Fallback);
    }

    #[test]
    fn unmatched_is_fallback() {
        let profile = Profile::new("u1");
        assert_eq!(engine().classify("hello there", &profile), Topic::Fallback);
        assert!(engine().evaluate("hello there", &profile).is_none());
    }

    #[test]
    fn empty_engine_always_falls_back() {
        let profile = Profile::new("u1");
        assert_eq!(RulesEngine::empty().classify("workout", &profile), Topic::Fallback);
    }

    #[test]
    fn custom_rule_is_appended() {
        let mut engine = RulesEngine::empty();
        engine.push(TopicRule::new(Topic::Sleep, &["nap"], replies::sleep));
        assert_eq!(engine.classify("quick nap?", &Profile::new("u1")), Topic::Sleep);
    }
}
