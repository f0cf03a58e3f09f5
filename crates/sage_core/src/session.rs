use serde::{Deserialize, Serialize};

/// Where replies come from for the rest of a session.
///
/// Transitions only move forward: `Probing → Remote → Local` or
/// `Probing → Local`. Once `Local`, the session never talks to the gateway again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Probing,
    Remote,
    Local,
}

/// Answer style selected by the user with a "<name> mode" directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    #[default]
    General,
    Exam,
    Learning,
    Mentor,
    Tech,
    Advisor,
}

impl SessionMode {
    /// Modes a user can switch to, in directive-matching order.
    pub const SWITCHABLE: [SessionMode; 5] = [
        SessionMode::Exam,
        SessionMode::Learning,
        SessionMode::Mentor,
        SessionMode::Tech,
        SessionMode::Advisor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SessionMode::General => "general",
            SessionMode::Exam => "exam",
            SessionMode::Learning => "learning",
            SessionMode::Mentor => "mentor",
            SessionMode::Tech => "tech",
            SessionMode::Advisor => "advisor",
        }
    }

    /// Exam mode asks for short, direct answers.
    pub fn is_terse(&self) -> bool {
        matches!(self, SessionMode::Exam)
    }
}

/// Per-session state, passed explicitly through the resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    pub mode: SessionMode,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn using_remote(&self) -> bool {
        self.phase != Phase::Local
    }

    /// Record a successful probe. Ignored once the session is local.
    pub fn confirm_remote(&mut self) {
        if self.phase == Phase::Probing {
            self.phase = Phase::Remote;
        }
    }

    /// Switch to local answers for good. Returns true only on the first call.
    pub fn degrade(&mut self) -> bool {
        if self.phase == Phase::Local {
            return false;
        }
        self.phase = Phase::Local;
        true
    }
}
