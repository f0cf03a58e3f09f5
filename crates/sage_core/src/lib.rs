pub mod config;
pub mod error;
pub mod session;
pub mod transcript;

pub use config::SageConfig;
pub use error::GatewayError;
pub use session::{Phase, SessionMode, SessionState};
pub use transcript::{Role, Transcript, Turn};
