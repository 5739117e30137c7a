//! News Q&A chat client library (session, renderer, HTTP client, config).
//! Used by the `news-qa` CLI and the browser front end.

pub mod client;
pub mod config;
pub mod messages;
pub mod render;
pub mod session;
pub mod surface;
pub mod transcript;

pub use client::{AskError, Client, DEFAULT_ENDPOINT};
pub use config::{default_config_path, ApiSection, Config, ConfigError, UiSection};
pub use messages::{Answer, Source};
pub use render::RenderOptions;
pub use session::{exchange, ChatSession, SessionSettings};
pub use surface::{Bubble, HtmlSurface, Surface, TerminalSurface};
pub use transcript::{Message, Sender, Transcript};
