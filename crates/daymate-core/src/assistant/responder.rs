//! Rule-based responder.
//!
//! Lower-cases the input and tests it for keyword substrings, category by
//! category in a fixed priority order. The first category with a hit wins;
//! there is no scoring. Matching is plain substring search, so "this"
//! counts as a greeting through "hi".

use chrono::NaiveTime;
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use tracing::debug;

use super::Reply;

/// Keyword categories, listed in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Greeting,
    Schedule,
    Alarm,
    Weather,
    Help,
    TimeQuery,
    Stress,
    Default,
}

/// Keywords, canned responses and suggestion chips for one category.
#[derive(Debug)]
pub struct ResponseCategory {
    pub category: Category,
    pub keywords: &'static [&'static str],
    pub responses: &'static [&'static str],
    pub suggestions: &'static [&'static str],
}

/// The response table in priority order. `Default` is not listed; it is
/// [`DEFAULT_CATEGORY`].
pub static CATEGORIES: &[ResponseCategory] = &[
    ResponseCategory {
        category: Category::Greeting,
        keywords: &["hello", "hi", "hey"],
        responses: &[
            "Hello! How can I help you today?",
            "Hi there! What would you like to do?",
            "Good to see you! How's your day going?",
            "Hey! Ready to tackle the day together?",
        ],
        suggestions: &["Set my alarm", "Show my schedule", "Plan my day", "What can you do?"],
    },
    ResponseCategory {
        category: Category::Schedule,
        keywords: &["schedule", "plan", "agenda"],
        responses: &[
            "I can help you manage your schedule. What would you like to add or check?",
            "Let's organize your day! What's on your agenda?",
            "I'm here to help with your schedule. What do you need to plan?",
        ],
        suggestions: &["Add new event", "View today's schedule", "Set reminder", "Plan tomorrow"],
    },
    ResponseCategory {
        category: Category::Alarm,
        keywords: &["alarm", "wake", "wake up"],
        responses: &[
            "I can set up smart alarms for you. What time would you like to wake up?",
            "Let's set up your wake-up routine! When do you want to start your day?",
            "I'll help you wake up refreshed. What's your ideal wake-up time?",
        ],
        suggestions: &["Set 7 AM alarm", "Set 8 AM alarm", "Set smart alarm", "View alarms"],
    },
    ResponseCategory {
        category: Category::Weather,
        keywords: &["weather", "rain", "sunny"],
        responses: &[
            "I don't have weather data right now, but I can help you plan your day based on your schedule!",
            "For weather updates, you might want to check a weather app, but I can help you plan around your activities!",
        ],
        suggestions: &[
            "Plan indoor activities",
            "Check my schedule",
            "Set reminder to check weather",
        ],
    },
    ResponseCategory {
        category: Category::Help,
        keywords: &["help", "what can you do", "capabilities"],
        responses: &[
            "I can help you with:\n\u{2022} Managing your daily schedule\n\u{2022} Setting smart alarms\n\u{2022} Planning your day\n\u{2022} Chatting and keeping you company\n\nWhat would you like to do?",
            "Here's what I can do for you:\n\u{2022} Schedule management\n\u{2022} Alarm and wake-up assistance\n\u{2022} Daily planning\n\u{2022} Friendly conversation\n\nHow can I assist you today?",
        ],
        suggestions: &["Set alarm", "Manage schedule", "Plan my day", "Chat with me"],
    },
    // Text is built from the current time, see `time_reply`.
    ResponseCategory {
        category: Category::TimeQuery,
        keywords: &["time", "what time"],
        responses: &[],
        suggestions: &["Set alarm", "Check schedule", "Plan next activity", "Take a break"],
    },
    ResponseCategory {
        category: Category::Stress,
        keywords: &["tired", "exhausted", "stressed"],
        responses: &[
            "I understand you're feeling tired. Let me help you take care of yourself. Would you like me to set a reminder for a break or help you plan some rest time?",
        ],
        suggestions: &[
            "Set break reminder",
            "Plan relaxation time",
            "Adjust schedule",
            "Set earlier bedtime",
        ],
    },
];

pub static DEFAULT_CATEGORY: ResponseCategory = ResponseCategory {
    category: Category::Default,
    keywords: &[],
    responses: &[
        "That's interesting! I'm here to help you manage your schedule, set alarms, and chat. Could you tell me more about what you'd like to do?",
    ],
    suggestions: &["Set alarm", "Manage schedule", "Plan my day", "What can you do?"],
};

/// First category whose keywords occur in `input`, or the default.
pub fn classify(input: &str) -> &'static ResponseCategory {
    let lower = input.to_lowercase();
    CATEGORIES
        .iter()
        .find(|c| c.keywords.iter().any(|k| lower.contains(k)))
        .unwrap_or(&DEFAULT_CATEGORY)
}

fn time_reply(now: NaiveTime) -> String {
    format!(
        "It's currently {}. How can I help you make the most of your day?",
        now.format("%H:%M")
    )
}

/// Canned-response assistant with an injectable random source.
pub struct Responder<R = Mcg128Xsl64> {
    rng: R,
}

impl Responder<Mcg128Xsl64> {
    /// Deterministic responder for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(Mcg128Xsl64::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(Mcg128Xsl64::from_entropy())
    }

    /// Seeded when `seed` is set, random otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> Responder<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Answer `input`. `now` is only read by the time-of-day category.
    pub fn respond(&mut self, input: &str, now: NaiveTime) -> Reply {
        let category = classify(input);
        debug!(category = ?category.category, "matched response category");

        let text = match category.category {
            Category::TimeQuery => time_reply(now),
            _ => {
                let idx = self.rng.gen_range(0..category.responses.len());
                category.responses[idx].to_string()
            }
        };

        Reply {
            text,
            suggestions: category.suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Uniform draw in `[lo, hi]`, used for the simulated reply delay.
    pub(crate) fn jitter(&mut self, lo: u64, hi: u64) -> u64 {
        if lo >= hi {
            lo
        } else {
            self.rng.gen_range(lo..=hi)
        }
    }
}
