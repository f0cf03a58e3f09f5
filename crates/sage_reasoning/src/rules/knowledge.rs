//! Static topic table and "what is X" lookups.

use std::sync::LazyLock;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no knowledge entry for {0:?}")]
    UnknownTopic(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeEntry {
    /// Lower-case match keys. The first is the canonical topic name.
    pub keys: &'static [&'static str],
    pub title: &'static str,
    pub definition: &'static str,
    pub examples: &'static [&'static str],
    pub applications: &'static [&'static str],
    pub types: &'static [&'static str],
    /// Extended explanation served to "tell me more" follow-ups.
    pub more: Option<&'static str>,
}

impl KnowledgeEntry {
    pub fn key(&self) -> &'static str {
        self.keys.first().copied().unwrap_or(self.title)
    }

    fn matches(&self, topic: &str) -> bool {
        self.keys.iter().any(|key| key_matches(key, topic))
    }

    /// Structured answer. Terse answers carry only the definition.
    pub fn render(&self, terse: bool) -> String {
        if terse {
            return format!("**{}**: {}", self.title, self.definition);
        }
        let mut out = format!("**{}**\n\n{}", self.title, self.definition);
        for (heading, items) in [
            ("Examples", self.examples),
            ("Applications", self.applications),
            ("Types", self.types),
        ] {
            if items.is_empty() {
                continue;
            }
            out.push_str(&format!("\n\n**{}:**", heading));
            for item in items {
                out.push_str(&format!("\n• {}", item));
            }
        }
        out.push_str("\n\nWould you like to know more? Just say \"tell me more\".");
        out
    }

    pub fn render_more(&self) -> String {
        match self.more {
            Some(more) => format!("**More about {}**\n\n{}", self.title, more),
            None => format!(
                "**More about {}**\n\n{}\n\nThat's the core of it! Ask me about a specific example or application of {} and I'll go deeper.",
                self.title,
                self.definition,
                self.key()
            ),
        }
    }
}

/// Short keys ("ai") would hit inside unrelated words, so they must match a
/// whole word. Longer keys match as substrings in either direction.
fn key_matches(key: &str, topic: &str) -> bool {
    if topic.is_empty() {
        return false;
    }
    if key.chars().count() <= 2 {
        return topic
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == key);
    }
    topic.contains(key) || (topic.chars().count() >= 3 && key.contains(topic))
}

static TOPIC_QUESTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^\s*(?:what\s+is|what\s+are|what's|whats|define|meaning\s+of|explain|tell\s+me\s+about)\s+(.+)$",
    )
    .expect("valid regex")
});

static WHAT_DOES_MEAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*what\s+does\s+(.+?)\s+mean\b").expect("valid regex")
});

/// Trim, lower-case, drop surrounding punctuation and a leading article.
pub fn normalize_topic(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let trimmed = lower.trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());
    let without_article = ["a ", "an ", "the "]
        .iter()
        .find_map(|a| trimmed.strip_prefix(*a))
        .unwrap_or(trimmed);
    without_article.trim().to_string()
}

/// Topic of a "what is X" / "define X" style question, normalised.
pub fn extract_topic(text: &str) -> Option<String> {
    let caps = WHAT_DOES_MEAN
        .captures(text)
        .or_else(|| TOPIC_QUESTION.captures(text))?;
    let topic = normalize_topic(caps.get(1)?.as_str());
    (!topic.is_empty()).then_some(topic)
}

pub fn is_topic_question(text: &str) -> bool {
    extract_topic(text).is_some()
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN.to_vec())
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// First entry, in table order, whose key matches the normalised topic.
    pub fn lookup(&self, topic: &str) -> Result<&KnowledgeEntry, LookupError> {
        let topic = normalize_topic(topic);
        self.entries
            .iter()
            .find(|e| e.matches(&topic))
            .ok_or(LookupError::UnknownTopic(topic))
    }

    /// Answer to a lookup miss.
    pub fn unknown_topic_prompt(&self, topic: &str) -> String {
        let known: Vec<&str> = self.entries.iter().map(|e| e.key()).collect();
        format!(
            "Great question about \"{}\"! 🤔 I don't have a detailed entry for that yet. Could you tell me more about what you'd like to know?\n\n**I can explain topics such as:**\n• Basic elements: water, fire, air, earth\n• Science: physics, chemistry, biology, photosynthesis, gravity\n• Technology: computers, programming, AI, machine learning\n• Maths: the Pythagorean theorem, the quadratic formula, calculations\n• Society: democracy, economics, business\n\nKnown topics: {}",
            topic,
            known.join(", ")
        )
    }
}

// ============================================================================
// Built-in table. Order is significant: the first match wins.
// ============================================================================

static BUILTIN: &[KnowledgeEntry] = &[
    KnowledgeEntry {
        keys: &["water"],
        title: "Water 💧",
        definition: "Water (H₂O: two hydrogen atoms and one oxygen atom) is a transparent, tasteless, odourless liquid essential for all known forms of life. It freezes at 0°C (32°F), boils at 100°C (212°F) and expands when it freezes.",
        examples: &["Oceans cover about 71% of Earth's surface", "The human body is 60-70% water", "Only about 3% of Earth's water is fresh water"],
        applications: &["Drinking and all biological processes", "Agriculture and industry", "Universal solvent in chemistry"],
        types: &["Liquid (water)", "Solid (ice)", "Gas (steam)"],
        more: Some("**The Water Cycle:**\n• **Evaporation**: water turns to vapour and rises\n• **Condensation**: vapour forms clouds\n• **Precipitation**: rain, snow and hail fall to Earth\n• **Collection**: water gathers in rivers, lakes and oceans\n\n**Water in the human body:**\n• Regulates body temperature\n• Transports nutrients and oxygen\n• Removes waste products\n• Lubricates joints\n\n**Interesting facts:**\n• A person can survive weeks without food but only days without water\n• Water molecules are attracted to each other (cohesion)\n\nWould you like to know about water pollution, the ocean, or something else about water?"),
    },
    KnowledgeEntry {
        keys: &["fire"],
        title: "Fire 🔥",
        definition: "Fire is rapid oxidation (burning): a chemical reaction between a fuel and oxygen that releases heat, light and gases.",
        examples: &["Campfires", "Gas stove flames", "Forest fires"],
        applications: &["Cooking and heating", "Metalworking", "Generating electricity in power plants"],
        types: &["The fire triangle: fuel, heat, oxygen"],
        more: Some("**How fire works:**\n• Heat breaks down fuel molecules\n• Oxygen combines with the fuel\n• New molecules form and energy is released as heat and light\n\n**Fire safety:**\n• Keep flammable materials away from heat sources\n• Know how to use a fire extinguisher\n• Have smoke detectors at home\n\nDifferent fuels burn with different coloured flames, and fires can exceed 1,000°C."),
    },
    KnowledgeEntry {
        keys: &["air"],
        title: "Air 💨",
        definition: "Air is the invisible mixture of gases that makes up Earth's atmosphere: about 78% nitrogen, 21% oxygen and 1% other gases such as argon, carbon dioxide and water vapour.",
        examples: &["Wind", "The breath we inhale", "Air pressure of about 14.7 psi at sea level"],
        applications: &["Breathing", "Flight for birds and aeroplanes", "Carrying sound waves"],
        types: &[],
        more: Some("**Properties of air:**\n• Has weight and exerts pressure\n• Can be compressed and expanded\n• Gets thinner at higher altitudes\n• Holds water vapour, creating humidity\n\nWithout air there would be no sound and no weather."),
    },
    KnowledgeEntry {
        keys: &["earth"],
        title: "Earth 🌍",
        definition: "Earth is the third planet from the Sun and the only known planet with life. It is about 4.5 billion years old and is made of rock, metal, water and air.",
        examples: &["Crust: the thin outer layer", "Mantle: hot, flowing rock", "Outer core: liquid metal", "Inner core: solid metal"],
        applications: &[],
        types: &[],
        more: Some("**Why Earth is special:**\n• The right distance from the Sun for liquid water\n• A magnetic field that shields us from solar radiation\n• An atmosphere rich in oxygen\n\nEarth rotates once every 24 hours, orbits the Sun at about 67,000 mph and has one natural satellite, the Moon."),
    },
    KnowledgeEntry {
        keys: &["computer"],
        title: "Computer 💻",
        definition: "A computer is an electronic device that processes data by following instructions (programs). It can store, retrieve and process information.",
        examples: &["Desktop", "Laptop", "Tablet", "Smartphone", "Server"],
        applications: &["Communication over the internet", "Science and engineering simulations", "Office work and entertainment"],
        types: &["CPU: processes instructions", "RAM: temporary memory", "Storage: permanent files", "Motherboard: connects components"],
        more: Some("**How a computer works:**\n• **Input**: keyboard, mouse, touch screen\n• **Processing**: the CPU executes instructions\n• **Storage**: RAM for running programs, disks for files\n• **Output**: screen, speakers, printer\n\nComputers represent everything in binary (1s and 0s); a modern smartphone outperforms early supercomputers."),
    },
    KnowledgeEntry {
        keys: &["photosynthesis"],
        title: "Photosynthesis 🌱",
        definition: "Photosynthesis is the process by which green plants use sunlight to turn water and carbon dioxide into glucose and oxygen: 6CO₂ + 6H₂O + light → C₆H₁₂O₆ + 6O₂.",
        examples: &["Leaves of trees", "Algae in oceans", "Cyanobacteria"],
        applications: &["Producing the oxygen we breathe", "The base of almost every food chain"],
        types: &["Light-dependent reactions", "Calvin cycle (light-independent)"],
        more: None,
    },
    KnowledgeEntry {
        keys: &["gravity"],
        title: "Gravity 🍎",
        definition: "Gravity is the force that attracts two bodies with mass towards each other. On Earth it gives weight to objects and accelerates them at about 9.8 m/s².",
        examples: &["An apple falling from a tree", "The Moon orbiting Earth", "Ocean tides"],
        applications: &["Satellite orbits", "Hydroelectric power"],
        types: &[],
        more: None,
    },
    KnowledgeEntry {
        keys: &["pythagorean theorem", "pythagoras"],
        title: "Pythagorean Theorem 📐",
        definition: "In a right triangle, a² + b² = c², where c is the hypotenuse.",
        examples: &["Legs 3 and 4: 9 + 16 = 25, so c = 5"],
        applications: &["Distances on a grid", "Construction and surveying"],
        types: &[],
        more: None,
    },
    KnowledgeEntry {
        keys: &["quadratic formula", "quadratic equation"],
        title: "Quadratic Formula 📐",
        definition: "x = (-b ± √(b²-4ac)) / 2a solves any equation of the form ax² + bx + c = 0.",
        examples: &["x² - 5x + 6 = 0 gives x = 3 or x = 2"],
        applications: &["Projectile motion", "Area and optimisation problems"],
        types: &[],
        more: None,
    },
    KnowledgeEntry {
        keys: &["democracy"],
        title: "Democracy 🗳️",
        definition: "Democracy is a system of government in which citizens exercise power by voting.",
        examples: &["Parliamentary democracies", "Presidential republics"],
        applications: &[],
        types: &["Direct democracy", "Representative democracy"],
        more: None,
    },
    KnowledgeEntry {
        keys: &["machine learning"],
        title: "Machine Learning 🤖",
        definition: "Machine Learning is a subset of AI that lets computers learn and improve from experience without being explicitly programmed.",
        examples: &["Neural networks", "Decision trees", "Linear regression", "K-means"],
        applications: &["Predictive analytics", "Image and speech recognition", "Fraud detection"],
        types: &["Supervised", "Unsupervised", "Reinforcement", "Semi-supervised"],
        more: None,
    },
    KnowledgeEntry {
        keys: &["deep learning"],
        title: "Deep Learning 🧠",
        definition: "Deep Learning uses artificial neural networks with many layers to model complex patterns in data.",
        examples: &["CNNs", "RNNs and LSTMs", "Transformers", "GANs"],
        applications: &["Image recognition", "Language translation", "Medical imaging"],
        types: &[],
        more: None,
    },
    KnowledgeEntry {
        keys: &["web development"],
        title: "Web Development 🌐",
        definition: "Web development is the process of building and maintaining websites and web applications.",
        examples: &["Frontend: HTML, CSS, JavaScript, React", "Backend: Node.js, Django, Rails", "Databases: PostgreSQL, MongoDB"],
        applications: &[],
        types: &["Frontend", "Backend", "Full stack"],
        more: None,
    },
    KnowledgeEntry {
        keys: &["programming", "coding"],
        title: "Programming 👩‍💻",
        definition: "Programming is the process of writing instructions for computers to carry out specific tasks.",
        examples: &["Python", "JavaScript", "Java", "C++", "Rust"],
        applications: &["Apps and websites", "Automation", "Games"],
        types: &["Object-oriented", "Functional", "Procedural", "Event-driven"],
        more: None,
    },
    KnowledgeEntry {
        keys: &["mathematics", "maths"],
        title: "Mathematics 🔢",
        definition: "Mathematics is the study of numbers, shapes, patterns and logical reasoning.",
        examples: &["Algebra", "Geometry", "Calculus", "Statistics", "Probability"],
        applications: &["Engineering", "Physics", "Computer science", "Economics", "Cryptography"],
        types: &[],
        more: None,
    },
    KnowledgeEntry {
        keys: &["physics"],
        title: "Physics ⚛️",
        definition: "Physics is the natural science that studies matter, energy and their interactions.",
        examples: &["Newton's laws", "Laws of thermodynamics", "Maxwell's equations", "Relativity"],
        applications: &[],
        types: &["Classical mechanics", "Quantum mechanics", "Thermodynamics", "Electromagnetism"],
        more: None,
    },
    KnowledgeEntry {
        keys: &["chemistry"],
        title: "Chemistry 🧪",
        definition: "Chemistry is the study of matter, its properties and composition, and the changes it undergoes.",
        examples: &["Atoms and molecules", "Chemical bonds", "Reactions and equilibrium"],
        applications: &[],
        types: &["Organic", "Inorganic", "Physical", "Analytical", "Biochemistry"],
        more: None,
    },
    KnowledgeEntry {
        keys: &["biology"],
        title: "Biology 🧬",
        definition: "Biology is the study of living organisms and their interactions with each other and their environment.",
        examples: &["DNA", "Proteins", "Ecosystems", "Homeostasis"],
        applications: &[],
        types: &["Cell biology", "Genetics", "Evolution", "Ecology", "Microbiology"],
        more: None,
    },
    KnowledgeEntry {
        keys: &["economics"],
        title: "Economics 📈",
        definition: "Economics is the study of how societies use scarce resources to produce valuable goods and distribute them among people.",
        examples: &["Supply and demand", "Inflation", "Opportunity cost"],
        applications: &[],
        types: &["Microeconomics", "Macroeconomics"],
        more: None,
    },
    KnowledgeEntry {
        keys: &["business"],
        title: "Business 💼",
        definition: "Business is the organised effort of individuals to produce and sell goods and services for profit.",
        examples: &["Sole proprietorship", "Partnership", "Corporation", "Non-profit"],
        applications: &["Marketing", "Finance", "Operations", "Human resources"],
        types: &[],
        more: None,
    },
    KnowledgeEntry {
        keys: &["artificial intelligence", "ai"],
        title: "Artificial Intelligence 🤖",
        definition: "Artificial Intelligence is the simulation of human intelligence in machines that are programmed to think and learn.",
        examples: &["Chatbots", "Recommendation systems", "Autonomous vehicles", "Medical diagnosis"],
        applications: &["Natural language processing", "Computer vision", "Robotics"],
        types: &[],
        more: Some("AI research began in the 1950s with pioneers like Alan Turing and John McCarthy. Today it is expected to transform healthcare, education and transportation."),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive_and_substring_based() {
        let kb = KnowledgeBase::builtin();
        let a = kb.lookup("water?").unwrap();
        let b = kb.lookup("WATER").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.key(), "water");
        assert_eq!(kb.lookup("a glass of water").unwrap().key(), "water");
        // Key contains the input.
        assert_eq!(kb.lookup("photosynth").unwrap().key(), "photosynthesis");
    }

    #[test]
    fn test_first_entry_wins() {
        let kb = KnowledgeBase::new(vec![
            KnowledgeEntry {
                keys: &["water"],
                title: "First",
                definition: "one",
                examples: &[],
                applications: &[],
                types: &[],
                more: None,
            },
            KnowledgeEntry {
                keys: &["salt water"],
                title: "Second",
                definition: "two",
                examples: &[],
                applications: &[],
                types: &[],
                more: None,
            },
        ]);
        assert_eq!(kb.lookup("salt water").unwrap().title, "First");
    }

    #[test]
    fn test_short_keys_need_whole_words() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.lookup("ai").unwrap().key(), "artificial intelligence");
        assert!(matches!(kb.lookup("rain"), Err(LookupError::UnknownTopic(_))));
    }

    #[test]
    fn test_unknown_topic() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(
            kb.lookup("quasar"),
            Err(LookupError::UnknownTopic("quasar".into()))
        );
        assert!(kb.lookup("").is_err());
        let prompt = kb.unknown_topic_prompt("quasar");
        assert!(prompt.contains("quasar"));
        assert!(prompt.contains("water"));
    }

    #[test]
    fn test_extract_topic() {
        assert_eq!(extract_topic("What is water?").as_deref(), Some("water"));
        assert_eq!(extract_topic("what is a computer").as_deref(), Some("computer"));
        assert_eq!(extract_topic("define democracy").as_deref(), Some("democracy"));
        assert_eq!(extract_topic("What does gravity mean?").as_deref(), Some("gravity"));
        assert_eq!(extract_topic("tell me about Physics").as_deref(), Some("physics"));
        assert_eq!(extract_topic("what is"), None);
        assert_eq!(extract_topic("water"), None);
    }

    #[test]
    fn test_render() {
        let kb = KnowledgeBase::builtin();
        let water = kb.lookup("water").unwrap();
        let full = water.render(false);
        assert!(full.contains("H₂O"));
        assert!(full.contains("**Examples:**"));
        let terse = water.render(true);
        assert!(!terse.contains("**Examples:**"));
        assert!(water.render_more().contains("Water Cycle"));
    }
}
