use chrono::Local;
use std::sync::LazyLock;
use regex::Regex;

fn keyword_set(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).expect("valid keyword regex")
}

pub static GREETING: LazyLock<Regex> = LazyLock::new(|| {
    keyword_set(&[
        "hi",
        "hello",
        "hey",
        "good morning",
        "good afternoon",
        "good evening",
        "namaste",
        "salam",
    ])
});
pub static HOW_ARE_YOU: LazyLock<Regex> =
    LazyLock::new(|| keyword_set(&["how are you", "how r u", "how's it going", "how are things"]));
pub static THANKS: LazyLock<Regex> =
    LazyLock::new(|| keyword_set(&["thank you", "thanks", "thank u", "thx", "shukriya"]));
pub static FAREWELL: LazyLock<Regex> =
    LazyLock::new(|| keyword_set(&["bye", "goodbye", "good night", "goodnight", "see you"]));
pub static TIME_DATE: LazyLock<Regex> =
    LazyLock::new(|| keyword_set(&["time", "date", "what day", "today's date"]));
pub static JOKE: LazyLock<Regex> = LazyLock::new(|| keyword_set(&["joke", "jokes", "funny", "laugh"]));
pub static FUN_FACT: LazyLock<Regex> =
    LazyLock::new(|| keyword_set(&["fun fact", "fact", "facts", "interesting"]));

pub fn greeting(lower: &str) -> String {
    if lower.contains("good morning") {
        "Good morning! ☀️ I hope you're having a wonderful day. What can I assist you with?".into()
    } else if lower.contains("good afternoon") {
        "Good afternoon! 🌞 How can I help you this afternoon?".into()
    } else if lower.contains("good evening") {
        "Good evening! 🌙 What brings you here this evening?".into()
    } else {
        "Hello! 👋 How can I help you today?".into()
    }
}

pub const HOW_ARE_YOU_REPLY: &str = "I'm doing great, thank you for asking! I'm here and ready to help you with anything you need. How are you doing?";

pub const THANKS_REPLY: &str =
    "You're very welcome! 😊 I'm glad I could help. Is there anything else you'd like to know or discuss?";

pub const FAREWELL_REPLY: &str =
    "Goodbye! 👋 Have a great day, and come back whenever you have more questions.";

pub fn time_and_date() -> String {
    let now = Local::now();
    format!(
        "**Current Time & Date:** 🕐\n\n**Time:** {}\n**Date:** {}\n\nIs there anything specific about time or dates you'd like to know?",
        now.format("%H:%M:%S"),
        now.format("%A, %B %-d, %Y")
    )
}

pub const JOKES: &[&str] = &[
    "**Joke:** 😄 Why don't scientists trust atoms? Because they make up everything!",
    "**Joke:** 😄 What do you call a fake noodle? An impasta!",
    "**Joke:** 😄 Why did the scarecrow win an award? He was outstanding in his field!",
    "**Joke:** 😄 What do you call a bear with no teeth? A gummy bear!",
    "**Joke:** 😄 Why don't eggs tell jokes? They'd crack each other up!",
    "**Joke:** 😄 What do you call a dinosaur that crashes his car? Tyrannosaurus Wrecks!",
];

pub const FUN_FACTS: &[&str] = &[
    "**Fun Fact:** 🐙 Octopuses have three hearts and blue blood!",
    "**Fun Fact:** 🌍 Earth is the only planet in our solar system not named after a god!",
    "**Fun Fact:** 🦒 A giraffe's tongue can be up to 20 inches long!",
    "**Fun Fact:** 🐝 Honey never spoils - archaeologists have found edible honey in ancient Egyptian tombs!",
    "**Fun Fact:** 🦋 Butterflies taste with their feet!",
    "**Fun Fact:** 🐨 Koalas sleep 18-22 hours per day!",
    "**Fun Fact:** 🌙 The Moon is moving away from Earth at about 1.5 inches per year!",
    "**Fun Fact:** 🐧 Penguins can jump as high as 6 feet in the air!",
];
