pub mod cli;
pub mod config;
pub mod error;
pub mod helpers;
pub mod icon;
pub mod iconset;
pub mod layout;
pub mod logger;
pub mod manifest;
pub mod push;
pub mod silhouette;

pub use config::ToolConfig;
pub use error::ToolError;
pub use layout::ProjectLayout;
