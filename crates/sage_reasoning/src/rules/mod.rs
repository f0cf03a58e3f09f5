//! Local rule engine used once a session has fallen back from the gateway.
//!
//! Rules are tried in [`Rule::PRIORITY`] order and the first match answers.
//! The engine is total: every input, including an empty transcript, gets a
//! non-empty reply.

pub mod academic;
pub mod knowledge;
pub mod math;
pub mod selector;
pub mod smalltalk;

use std::sync::Arc;

use sage_core::{SessionMode, SessionState, Transcript};

pub use knowledge::{KnowledgeBase, KnowledgeEntry, LookupError};
pub use math::MathError;
pub use selector::{FixedSelector, RandomSelector, Selector};

/// Texts that ask to continue the previous topic.
const FOLLOW_UP_TEXTS: [&str; 4] = ["yes", "more", "elaborate", "tell me more"];

/// Everything a rule may look at while answering one message.
pub struct RuleContext<'a> {
    pub text: &'a str,
    pub lower: String,
    pub transcript: &'a Transcript,
    pub mode: SessionMode,
    pub knowledge: &'a KnowledgeBase,
    pub selector: &'a dyn Selector,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        text: &'a str,
        transcript: &'a Transcript,
        mode: SessionMode,
        knowledge: &'a KnowledgeBase,
        selector: &'a dyn Selector,
    ) -> Self {
        Self {
            text,
            lower: text.trim().to_lowercase(),
            transcript,
            mode,
            knowledge,
            selector,
        }
    }
}

/// Mode named by a "<name> mode" directive, if any.
pub fn mode_directive(lower: &str) -> Option<SessionMode> {
    SessionMode::SWITCHABLE
        .into_iter()
        .find(|m| lower.contains(&format!("{} mode", m.name())))
}

fn mode_acknowledgement(mode: SessionMode) -> &'static str {
    match mode {
        SessionMode::Exam => "📝 **EXAM MODE ACTIVATED**\n\nI'll keep answers short and to the point so you can revise quickly. Ask me anything!",
        SessionMode::Learning => "📚 **LEARNING MODE ACTIVATED**\n\nI'll explain topics in depth with examples and applications. What would you like to learn today?",
        SessionMode::Mentor => "🧭 **MENTOR MODE ACTIVATED**\n\nI'm here to guide you. Tell me about your goals or what you're struggling with.",
        SessionMode::Tech => "💻 **TECH MODE ACTIVATED**\n\nLet's talk technology: programming, computers, AI and more. What are you working on?",
        SessionMode::Advisor => "🎯 **ADVISOR MODE ACTIVATED**\n\nI'll help you think through decisions about study plans and careers. What's on your mind?",
        SessionMode::General => "Back to general mode. How can I help?",
    }
}

fn is_follow_up(lower: &str) -> bool {
    let normalized = lower
        .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    FOLLOW_UP_TEXTS.contains(&normalized.as_str())
}

fn follow_up(ctx: &RuleContext<'_>) -> String {
    let entry = ctx.transcript.previous_user().and_then(|turn| {
        let topic = knowledge::extract_topic(&turn.content)
            .unwrap_or_else(|| knowledge::normalize_topic(&turn.content));
        ctx.knowledge.lookup(&topic).ok()
    });
    match entry {
        Some(entry) => entry.render_more(),
        None => "I'd be happy to go deeper! 🤔 What would you like more detail on? Ask me something like \"what is gravity\" first, then say \"tell me more\".".to_string(),
    }
}

/// One matching rule. Variants are listed in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    ModeSwitch,
    Math,
    Greeting,
    HowAreYou,
    Thanks,
    Farewell,
    TimeDate,
    Joke,
    FunFact,
    Knowledge,
    FollowUp,
    StudyTips,
    Formula,
    MathHelp,
    Help,
}

impl Rule {
    pub const PRIORITY: [Rule; 15] = [
        Rule::ModeSwitch,
        Rule::Math,
        Rule::Greeting,
        Rule::HowAreYou,
        Rule::Thanks,
        Rule::Farewell,
        Rule::TimeDate,
        Rule::Joke,
        Rule::FunFact,
        Rule::Knowledge,
        Rule::FollowUp,
        Rule::StudyTips,
        Rule::Formula,
        Rule::MathHelp,
        Rule::Help,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rule::ModeSwitch => "mode_switch",
            Rule::Math => "math",
            Rule::Greeting => "greeting",
            Rule::HowAreYou => "how_are_you",
            Rule::Thanks => "thanks",
            Rule::Farewell => "farewell",
            Rule::TimeDate => "time_date",
            Rule::Joke => "joke",
            Rule::FunFact => "fun_fact",
            Rule::Knowledge => "knowledge",
            Rule::FollowUp => "follow_up",
            Rule::StudyTips => "study_tips",
            Rule::Formula => "formula",
            Rule::MathHelp => "math_help",
            Rule::Help => "help",
        }
    }

    pub fn matches(&self, ctx: &RuleContext<'_>) -> bool {
        let lower = ctx.lower.as_str();
        match self {
            Rule::ModeSwitch => mode_directive(lower).is_some(),
            Rule::Math => math::is_math_expression(ctx.text),
            Rule::Greeting => smalltalk::GREETING.is_match(lower),
            Rule::HowAreYou => smalltalk::HOW_ARE_YOU.is_match(lower),
            Rule::Thanks => smalltalk::THANKS.is_match(lower),
            Rule::Farewell => smalltalk::FAREWELL.is_match(lower),
            Rule::TimeDate => smalltalk::TIME_DATE.is_match(lower),
            Rule::Joke => smalltalk::JOKE.is_match(lower),
            Rule::FunFact => smalltalk::FUN_FACT.is_match(lower),
            Rule::Knowledge => knowledge::is_topic_question(ctx.text),
            Rule::FollowUp => is_follow_up(lower),
            Rule::StudyTips => academic::STUDY_TIPS.is_match(lower),
            Rule::Formula => academic::FORMULA.is_match(lower),
            Rule::MathHelp => academic::MATH_HELP.is_match(lower),
            Rule::Help => academic::HELP.is_match(lower),
        }
    }

    /// Reply text for a message this rule matched. Mode changes are applied by
    /// the engine, not here.
    pub fn respond(&self, ctx: &RuleContext<'_>) -> String {
        let lower = ctx.lower.as_str();
        match self {
            Rule::ModeSwitch => mode_directive(lower)
                .map(mode_acknowledgement)
                .unwrap_or(academic::DEFAULT_REPLY)
                .to_string(),
            Rule::Math => math::reply(ctx.text),
            Rule::Greeting => smalltalk::greeting(lower),
            Rule::HowAreYou => smalltalk::HOW_ARE_YOU_REPLY.to_string(),
            Rule::Thanks => smalltalk::THANKS_REPLY.to_string(),
            Rule::Farewell => smalltalk::FAREWELL_REPLY.to_string(),
            Rule::TimeDate => smalltalk::time_and_date(),
            Rule::Joke => selector::choose(ctx.selector, smalltalk::JOKES).to_string(),
            Rule::FunFact => selector::choose(ctx.selector, smalltalk::FUN_FACTS).to_string(),
            Rule::Knowledge => {
                let topic = knowledge::extract_topic(ctx.text).unwrap_or_default();
                match ctx.knowledge.lookup(&topic) {
                    Ok(entry) => entry.render(ctx.mode.is_terse()),
                    Err(LookupError::UnknownTopic(t)) => ctx.knowledge.unknown_topic_prompt(&t),
                }
            }
            Rule::FollowUp => follow_up(ctx),
            Rule::StudyTips => academic::study_tips(lower),
            Rule::Formula => academic::formula(lower),
            Rule::MathHelp => academic::MATH_HELP_REPLY.to_string(),
            Rule::Help => academic::help_menu(ctx.mode),
        }
    }
}

/// Ordered rule list plus the data the rules answer from.
pub struct RuleEngine {
    rules: Vec<Rule>,
    knowledge: KnowledgeBase,
    selector: Arc<dyn Selector>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    pub fn new() -> Self {
        Self {
            rules: Rule::PRIORITY.to_vec(),
            knowledge: KnowledgeBase::builtin(),
            selector: Arc::new(RandomSelector),
        }
    }

    pub fn with_selector(mut self, selector: Arc<dyn Selector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_knowledge(mut self, knowledge: KnowledgeBase) -> Self {
        self.knowledge = knowledge;
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn matching_rule(&self, ctx: &RuleContext<'_>) -> Option<Rule> {
        self.rules.iter().copied().find(|rule| rule.matches(ctx))
    }

    /// Answer the latest user turn of `transcript`, updating `state.mode` when
    /// the message is a mode directive.
    pub fn respond(&self, state: &mut SessionState, transcript: &Transcript) -> String {
        let text = transcript
            .latest_user()
            .map(|t| t.content.as_str())
            .unwrap_or_default();
        self.apply(state, text, transcript)
    }

    /// Answer `text` against `transcript` as context.
    pub fn apply(&self, state: &mut SessionState, text: &str, transcript: &Transcript) -> String {
        let ctx = RuleContext::new(
            text,
            transcript,
            state.mode,
            &self.knowledge,
            self.selector.as_ref(),
        );

        let reply = match self.matching_rule(&ctx) {
            Some(rule) => {
                tracing::debug!("Local rule '{}' matched", rule.name());
                if rule == Rule::ModeSwitch {
                    if let Some(mode) = mode_directive(&ctx.lower) {
                        tracing::info!("Session mode -> {}", mode.name());
                        state.mode = mode;
                    }
                }
                rule.respond(&ctx)
            }
            None => academic::DEFAULT_REPLY.to_string(),
        };

        if reply.trim().is_empty() {
            academic::DEFAULT_REPLY.to_string()
        } else {
            reply
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_core::Turn;

    fn engine() -> RuleEngine {
        RuleEngine::new().with_selector(Arc::new(FixedSelector(0)))
    }

    fn ask(engine: &RuleEngine, state: &mut SessionState, history: &[&str]) -> String {
        let mut transcript = Transcript::new();
        for (i, text) in history.iter().enumerate() {
            if i % 2 == 0 {
                transcript.push(Turn::user(*text));
            } else {
                transcript.push(Turn::assistant(*text));
            }
        }
        engine.respond(state, &transcript)
    }

    fn rule_for(engine: &RuleEngine, text: &str) -> Option<Rule> {
        let transcript = Transcript::new();
        let selector = FixedSelector(0);
        let ctx = RuleContext::new(
            text,
            &transcript,
            SessionMode::General,
            engine.knowledge(),
            &selector,
        );
        engine.matching_rule(&ctx)
    }

    #[test]
    fn test_priority_order() {
        let engine = engine();
        assert_eq!(rule_for(&engine, "exam mode please"), Some(Rule::ModeSwitch));
        assert_eq!(rule_for(&engine, "2+2"), Some(Rule::Math));
        assert_eq!(rule_for(&engine, "hello"), Some(Rule::Greeting));
        assert_eq!(rule_for(&engine, "what is water"), Some(Rule::Knowledge));
        assert_eq!(rule_for(&engine, "tell me more"), Some(Rule::FollowUp));
        assert_eq!(rule_for(&engine, "study tips"), Some(Rule::StudyTips));
        assert_eq!(rule_for(&engine, "xyzzy"), None);
    }

    #[test]
    fn test_machine_learning_is_not_a_greeting() {
        let engine = engine();
        assert_eq!(
            rule_for(&engine, "what is machine learning"),
            Some(Rule::Knowledge)
        );
    }

    #[test]
    fn test_mode_switch_updates_state() {
        let engine = engine();
        let mut state = SessionState::new();
        let reply = ask(&engine, &mut state, &["exam mode"]);
        assert!(reply.contains("EXAM MODE ACTIVATED"));
        assert_eq!(state.mode, SessionMode::Exam);

        let terse = ask(&engine, &mut state, &["what is gravity"]);
        assert!(!terse.contains("**Examples:**"));

        state.mode = SessionMode::Learning;
        let full = ask(&engine, &mut state, &["what is gravity"]);
        assert!(full.contains("**Examples:**"));
    }

    #[test]
    fn test_follow_up_uses_previous_user_turn() {
        let engine = engine();
        let mut state = SessionState::new();
        let reply = ask(
            &engine,
            &mut state,
            &["what is water", "**Water 💧** ...", "yes"],
        );
        assert!(reply.to_lowercase().contains("water"));
    }

    #[test]
    fn test_follow_up_without_topic() {
        let engine = engine();
        let mut state = SessionState::new();
        let reply = ask(&engine, &mut state, &["more"]);
        assert!(reply.contains("What would you like more detail on"));
    }

    #[test]
    fn test_unknown_topic_prompt() {
        let engine = engine();
        let mut state = SessionState::new();
        let reply = ask(&engine, &mut state, &["what is a zorblax"]);
        assert!(reply.contains("zorblax"));
    }

    #[test]
    fn test_fixed_selector_joke() {
        let engine = engine();
        let mut state = SessionState::new();
        assert_eq!(
            ask(&engine, &mut state, &["tell me a joke"]),
            smalltalk::JOKES[0]
        );
    }

    #[test]
    fn test_empty_transcript_gets_default() {
        let engine = engine();
        let mut state = SessionState::new();
        assert_eq!(
            engine.respond(&mut state, &Transcript::new()),
            academic::DEFAULT_REPLY
        );
    }
}
