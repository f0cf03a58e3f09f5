pub mod api_types;
pub mod llm;
pub mod providers;
pub mod remote;
pub mod resolver;
pub mod rules;
pub mod session_store;

pub use llm::{Completion, CompletionParams, LlmClient, ProviderError};
pub use remote::{HttpGatewayClient, RemoteCompletion};
pub use resolver::{Reply, ReplySource, Resolver, SubmitError};
pub use rules::RuleEngine;
