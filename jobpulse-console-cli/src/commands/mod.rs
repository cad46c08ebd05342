//! CLI command implementations

pub mod check_config;
pub mod logout;
pub mod serve;

pub use check_config::CheckConfigCommand;
pub use logout::LogoutCommand;
pub use serve::ServeCommand;
