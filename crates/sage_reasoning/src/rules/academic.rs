//! Study helpers: tips per subject, formula sheets, the help menu.

use std::sync::LazyLock;
use regex::Regex;
use sage_core::SessionMode;

pub static STUDY_TIPS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:study\s+tips?|how\s+to\s+study|tips\s+for\s+studying|exam\s+preparation)\b")
        .expect("valid regex")
});
pub static FORMULA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bformulas?\b|\bformulae\b").expect("valid regex"));
pub static MATH_HELP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:math|maths|calculate|calculation|solve)\b").expect("valid regex")
});
pub static HELP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:help|what\s+can\s+you\s+do)\b").expect("valid regex")
});

pub fn study_tips(lower: &str) -> String {
    let (subject, tips): (&str, &[&str]) = if lower.contains("math") {
        (
            "Mathematics",
            &[
                "Practise problems every day, not just before the exam",
                "Understand why a formula works before memorising it",
                "Redo the examples from class without looking at the solution",
                "Keep a list of mistakes you make and review it weekly",
            ],
        )
    } else if lower.contains("science")
        || lower.contains("physics")
        || lower.contains("chemistry")
        || lower.contains("biology")
    {
        (
            "Science",
            &[
                "Draw diagrams of processes and label every step",
                "Connect each concept to a real-world example",
                "Learn units and derive formulas instead of cramming them",
                "Summarise each chapter in your own words",
            ],
        )
    } else if lower.contains("literature") || lower.contains("english") {
        (
            "Literature",
            &[
                "Read actively and annotate themes, characters and quotes",
                "Write short summaries after each chapter",
                "Discuss the text with classmates to hear other readings",
                "Practise timed essay outlines",
            ],
        )
    } else {
        (
            "General",
            &[
                "Study in focused 25-minute blocks with short breaks (Pomodoro)",
                "Test yourself instead of re-reading notes (active recall)",
                "Space your reviews over several days",
                "Sleep well before the exam; memory consolidates overnight",
            ],
        )
    };

    let mut out = format!("**Study Tips: {}** 📚\n", subject);
    for (i, tip) in tips.iter().enumerate() {
        out.push_str(&format!("\n{}. {}", i + 1, tip));
    }
    out.push_str("\n\nWant tips for a specific subject? Try \"study tips for math\".");
    out
}

pub fn formula(lower: &str) -> String {
    if lower.contains("quadratic") {
        "**Quadratic Formula** 📐\n\nFor ax² + bx + c = 0:\n\nx = (-b ± √(b² - 4ac)) / 2a\n\nThe discriminant b² - 4ac tells you how many real roots there are.".into()
    } else if lower.contains("pythagoras") || lower.contains("pythagorean") {
        "**Pythagorean Theorem** 📐\n\na² + b² = c²\n\nwhere c is the hypotenuse of a right triangle.".into()
    } else if lower.contains("slope") {
        "**Slope of a Line** 📈\n\nm = (y₂ - y₁) / (x₂ - x₁)\n\nSlope-intercept form: y = mx + b".into()
    } else if lower.contains("newton") || lower.contains("force") {
        "**Newton's Second Law** 🍎\n\nF = m × a\n\nForce (N) equals mass (kg) times acceleration (m/s²).".into()
    } else if lower.contains("kinetic") {
        "**Kinetic Energy** ⚡\n\nKE = ½ m v²\n\nwhere m is mass (kg) and v is velocity (m/s).".into()
    } else if lower.contains("gas") {
        "**Ideal Gas Law** 🎈\n\nPV = nRT\n\nR = 8.314 J/(mol·K)".into()
    } else {
        "**Common Formulas** 📋\n\n• Quadratic: x = (-b ± √(b² - 4ac)) / 2a\n• Pythagorean: a² + b² = c²\n• Slope: m = (y₂ - y₁) / (x₂ - x₁)\n• Newton's 2nd law: F = ma\n• Kinetic energy: KE = ½mv²\n• Ideal gas: PV = nRT\n\nAsk for one by name for more detail.".into()
    }
}

pub const MATH_HELP_REPLY: &str = "**Math Help** 🔢\n\nI can solve arithmetic for you! Just type an expression such as:\n\n• \"2 + 2\"\n• \"(3 + 4) * 2\"\n• \"10 divided by 4\"\n• \"5 times 6\"\n\nI'll show the result and the steps.";

pub fn help_menu(mode: SessionMode) -> String {
    format!(
        "**Here's what I can do** 🤖 (current mode: {})\n\n**🔢 Math:** solve expressions like \"2 + 2\" or \"12 divided by 4\"\n**📚 Knowledge:** \"what is photosynthesis\", \"define gravity\"\n**📐 Formulas:** \"quadratic formula\", \"kinetic energy formula\"\n**📝 Study tips:** \"study tips for science\"\n**🎭 Modes:** \"exam mode\", \"learning mode\", \"mentor mode\", \"tech mode\", \"advisor mode\"\n**😄 Fun:** \"tell me a joke\", \"fun fact\"\n**🕐 Time:** \"what time is it\"",
        mode.name()
    )
}

pub const DEFAULT_REPLY: &str = "I'm not sure I understood that, but I'd love to help! 🤔 Here's what you can ask me:\n\n**📚 Learning:** \"what is gravity\", \"explain machine learning\"\n**🔢 Math:** \"2 + 2\", \"15 divided by 3\"\n**📐 Formulas:** \"quadratic formula\"\n**📝 Study:** \"study tips\"\n**🎭 Modes:** \"exam mode\", \"mentor mode\"\n**😄 Fun:** \"tell me a joke\", \"fun fact\"\n\nType \"help\" to see everything I can do.";
