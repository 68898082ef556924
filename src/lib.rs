pub mod api_router;
pub mod auth;
pub mod billing;
pub mod chat;
pub mod config;
pub mod extract;
pub mod llm;
pub mod shared;
pub mod tickets;
pub mod voice;
