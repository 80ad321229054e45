//! Canned coach replies, one builder per topic.
//!
//! Each builder takes the profile snapshot and fills in its few
//! personalised slots. Goal tokens are rendered with spaces.

use crate::profile::{BmiBand, Profile};

pub const APOLOGY: &str = "I apologize, but I encountered an error. Please try again!";

pub const PROGRESSIVE_OVERLOAD: &str = "Focus on progressive overload - increase weight by 2.5-5lbs when you can complete all sets!";
pub const MALE_CARDIO: &str = "Mix in some cardio 2-3x per week for overall health!";
pub const FEMALE_COMPOUND_CARDIO: &str =
    "Focus on compound movements and add 20-30 min cardio after strength training!";
pub const FEMALE_CARDIO: &str = "Add some cardio 2-3x per week for heart health!";

pub const GAIN_ADVICE: &str = "Focus on calorie-dense, nutritious foods like nuts, avocados, and protein shakes to gain healthy weight.";
pub const LOSS_ADVICE: &str = "Create a moderate calorie deficit with plenty of protein, vegetables, and whole grains for sustainable weight loss.";
pub const BALANCED_ADVICE: &str =
    "Maintain a balanced diet with adequate protein, healthy fats, and complex carbohydrates.";
pub const PERIOD_NUTRITION: &str =
    "During your period, increase iron-rich foods like spinach, lean meat, and legumes!";

pub const STUDENT_STRESS: &str = "As a student, also try: study groups, campus counseling services, and breaking large projects into smaller tasks.";

pub fn workout(profile: &Profile) -> String {
    if profile.is_female() {
        let cardio = match profile.bmi() {
            Some(bmi) if bmi > 25.0 => FEMALE_COMPOUND_CARDIO,
            _ => FEMALE_CARDIO,
        };
        format!(
            "🏋️‍♀️ Here are some great workout suggestions for you!\n\n\
             Based on your profile, I recommend:\n\n\
             **Upper Body (Week 1-2 of cycle):**\n\
             • Push-ups: 3 sets of 8-12\n\
             • Dumbbell rows: 3 sets of 10-15\n\
             • Shoulder presses: 3 sets of 8-12\n\n\
             **Lower Body (Week 3 of cycle):**\n\
             • Squats: 3 sets of 12-15\n\
             • Lunges: 3 sets of 10 per leg\n\
             • Glute bridges: 3 sets of 15-20\n\n\
             **Active Recovery (Week 4):**\n\
             • Yoga or light stretching\n\
             • 20-30 min walks\n\
             • Swimming or gentle cycling\n\n\
             {cardio}\n\n\
             Would you like me to create a specific weekly plan for you?"
        )
    } else if profile.is_male() {
        let focus = if profile.goal() == Some("muscle_building") {
            PROGRESSIVE_OVERLOAD
        } else {
            MALE_CARDIO
        };
        format!(
            "💪 Let's build that strength! Here's a solid workout plan:\n\n\
             **Push Day:**\n\
             • Bench press: 4 sets of 6-8\n\
             • Overhead press: 3 sets of 8-10\n\
             • Dips: 3 sets of 10-12\n\
             • Push-ups: 2 sets to failure\n\n\
             **Pull Day:**\n\
             • Pull-ups/Rows: 4 sets of 6-10\n\
             • Lat pulldowns: 3 sets of 8-12\n\
             • Bicep curls: 3 sets of 10-15\n\n\
             **Leg Day:**\n\
             • Squats: 4 sets of 6-8\n\
             • Deadlifts: 3 sets of 5-6\n\
             • Lunges: 3 sets of 10 per leg\n\
             • Calf raises: 4 sets of 15-20\n\n\
             {focus}\n\n\
             Need help with form tips or nutrition to support your workouts?"
        )
    } else {
        "🏃‍♀️ Great question about workouts! Here's a balanced routine:\n\n\
         **Full Body Workout (3x/week):**\n\
         • Squats: 3 sets of 10-15\n\
         • Push-ups: 3 sets of 8-12\n\
         • Rows: 3 sets of 10-12\n\
         • Planks: 3 sets of 30-60 seconds\n\
         • Walking lunges: 2 sets of 10 per leg\n\n\
         **Cardio Days:**\n\
         • 30-45 min walking/jogging\n\
         • Dance or cycling\n\
         • Swimming\n\n\
         Start with what feels comfortable and gradually increase intensity. Listen to your body!\n\n\
         What type of exercises do you enjoy most?"
            .to_string()
    }
}

pub fn nutrition(profile: &Profile) -> String {
    let advice = match profile.bmi().map(BmiBand::of) {
        Some(BmiBand::Underweight) => GAIN_ADVICE,
        Some(BmiBand::Overweight) => LOSS_ADVICE,
        _ => BALANCED_ADVICE,
    };
    let protein = if profile.is_male() {
        "1.6-2.2g per kg body weight"
    } else {
        "1.2-1.8g per kg body weight"
    };
    let period = if profile.is_female() {
        PERIOD_NUTRITION
    } else {
        ""
    };
    format!(
        "🥗 Nutrition is so important! Here's what I recommend:\n\n\
         **Daily Essentials:**\n\
         • Protein: {protein}\n\
         • Water: 8-10 glasses daily\n\
         • Fruits & vegetables: 5-9 servings\n\n\
         **Sample Meal Plan:**\n\
         **Breakfast:** Oatmeal with berries and nuts\n\
         **Snack:** Greek yogurt with honey\n\
         **Lunch:** Grilled chicken salad with quinoa\n\
         **Snack:** Apple with almond butter\n\
         **Dinner:** Salmon with sweet potato and broccoli\n\n\
         {advice}\n\n\
         {period}\n\n\
         Want me to suggest specific recipes or meal prep ideas?"
    )
}

pub fn stress(profile: &Profile) -> String {
    let student = if profile.is_student() {
        STUDENT_STRESS
    } else {
        ""
    };
    format!(
        "💙 I understand - stress management is crucial for overall wellness. Here are some strategies:\n\n\
         **Immediate Relief:**\n\
         • Deep breathing: 4-7-8 technique (inhale 4, hold 7, exhale 8)\n\
         • 5-minute meditation or mindfulness\n\
         • Quick walk outside\n\n\
         **Daily Habits:**\n\
         • Morning routine: 10 min meditation or journaling\n\
         • Regular exercise (even 15-20 min helps!)\n\
         • Consistent sleep schedule\n\
         • Limit caffeine and screen time before bed\n\n\
         **Professional Life:**\n\
         • Time blocking for tasks\n\
         • Take regular breaks (Pomodoro technique)\n\
         • Set boundaries with work hours\n\n\
         {student}\n\n\
         Remember: It's okay to ask for help. Consider talking to a counselor if stress feels overwhelming.\n\n\
         What's your biggest stress trigger right now?"
    )
}

pub fn sleep(_profile: &Profile) -> String {
    "😴 Quality sleep is essential! Here's how to improve it:\n\n\
     **Sleep Hygiene:**\n\
     • Same bedtime/wake time daily (even weekends!)\n\
     • Cool, dark room (60-67°F)\n\
     • No screens 1 hour before bed\n\
     • Comfortable mattress and pillows\n\n\
     **Evening Routine:**\n\
     • Dim lights 2 hours before bed\n\
     • Light stretching or reading\n\
     • Herbal tea (chamomile, passionflower)\n\
     • Gratitude journaling\n\n\
     **What to Avoid:**\n\
     • Caffeine after 2 PM\n\
     • Large meals 3 hours before bed\n\
     • Intense exercise close to bedtime\n\
     • Alcohol (disrupts sleep quality)\n\n\
     **Natural Sleep Aids:**\n\
     • Magnesium supplement\n\
     • Melatonin (consult doctor first)\n\
     • White noise or earplugs\n\n\
     Aim for 7-9 hours nightly. Your body repairs and recovers during sleep - it's when the magic happens!\n\n\
     Are you having trouble falling asleep or staying asleep?"
        .to_string()
}

pub fn motivation(profile: &Profile) -> String {
    let points = profile
        .points()
        .map(|p| format!("Plus, you've earned {p} points!"))
        .unwrap_or_default();
    let goal = profile
        .goal_label()
        .map(|g| {
            format!(
                "Your goal of {g} is absolutely achievable. Let's break it down into smaller steps."
            )
        })
        .unwrap_or_default();
    format!(
        "🌟 I believe in you! Every wellness journey has ups and downs - that's completely normal.\n\n\
         **Remember:**\n\
         • Progress isn't always linear\n\
         • Small steps lead to big changes\n\
         • You've already started - that's huge!\n\
         • Every healthy choice matters\n\n\
         **Quick Motivation Boosters:**\n\
         • Set micro-goals (drink one extra glass of water today)\n\
         • Celebrate small wins\n\
         • Find an accountability buddy\n\
         • Track progress (not just weight - energy, mood, sleep!)\n\
         • Remember your 'why'\n\n\
         **Your Journey So Far:**\n\
         • You created a profile ✓\n\
         • You're asking questions ✓\n\
         • You're committed to change ✓\n\n\
         That's already more than most people do! {points}\n\n\
         {goal}\n\n\
         What's one small thing you could do today to move forward?"
    )
}

pub fn cycle(_profile: &Profile) -> String {
    "🌸 Cycle syncing can really optimize your wellness! Here's how:\n\n\
     **Menstrual Phase (Days 1-5):**\n\
     • Light movement: yoga, walking, stretching\n\
     • Iron-rich foods: spinach, lean meat, beans\n\
     • Rest and recovery focus\n\n\
     **Follicular Phase (Days 1-13):**\n\
     • Try new workouts - your energy is building!\n\
     • Great time for strength training\n\
     • Focus on fresh, light foods\n\n\
     **Ovulatory Phase (Days 14):**\n\
     • Peak energy - perfect for HIIT or challenging workouts\n\
     • Social activities and group fitness\n\
     • Anti-inflammatory foods\n\n\
     **Luteal Phase (Days 15-28):**\n\
     • Strength training and pilates\n\
     • Complex carbs for serotonin\n\
     • Self-care and stress management\n\n\
     **PMS Support:**\n\
     • Magnesium and B6 supplements\n\
     • Reduce caffeine and sugar\n\
     • Gentle movement and heating pads\n\n\
     Tracking your cycle can help you work WITH your body, not against it!\n\n\
     Would you like specific workout or nutrition recommendations for where you are in your cycle?"
        .to_string()
}

/// The three generic prompts used when no topic matches.
pub fn fallbacks(profile: &Profile) -> [String; 3] {
    let about = profile
        .goal_label()
        .map(|g| format!("regarding your {g} goal"))
        .unwrap_or_else(|| "your wellness journey".to_string());
    [
        format!(
            "That's a great question! Based on your profile, I'd love to help you with that. \
             Could you tell me more about what specifically you'd like to know about {about}?"
        ),
        "I'm here to support your wellness journey! Whether it's about workouts, nutrition, \
         stress management, or motivation - I've got you covered. What's on your mind today?"
            .to_string(),
        "Thanks for reaching out! I can help with personalized advice for fitness, nutrition, \
         mental wellness, and more. What would you like to focus on right now?"
            .to_string(),
    ]
}
