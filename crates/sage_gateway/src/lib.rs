pub mod relay;
pub mod server;
pub mod simple;
pub mod types;

pub use relay::CompletionGateway;
pub use server::GatewayServer;
pub use types::{ErrorBody, TestReport};
