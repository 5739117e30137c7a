//! Conversation renderer: turns messages into transcript markup.
//!
//! User text is always escaped. Bot text goes through markdown and is inserted as
//! markup, so it must come from a trusted answer service; raw HTML inside the
//! markdown is passed through untouched.

use pulldown_cmark::{html, Options, Parser};

use crate::transcript::{Message, Sender};

/// Element id of the typing placeholder. At most one element carries it.
pub const TYPING_MARKER: &str = "typing-indicator";

/// Heading of the cited-sources block.
pub const DEFAULT_SOURCES_LABEL: &str = "แหล่งข่าวอ้างอิง:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub sources_label: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sources_label: DEFAULT_SOURCES_LABEL.into(),
        }
    }
}

/// Escape text so it is shown literally inside element content or attributes.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Full bubble markup for `message`, sources block included when non-empty.
pub fn message_html(message: &Message, options: &RenderOptions) -> String {
    let content = match message.sender {
        Sender::User => escape_html(&message.text),
        Sender::Bot => markdown_to_html(&message.text),
    };

    let mut out = format!(
        r#"<div class="chat-message {}"><div class="message-content">{}</div>"#,
        message.sender.as_class(),
        content
    );

    if !message.sources.is_empty() {
        out.push_str(r#"<div class="source-list"><strong>"#);
        out.push_str(&escape_html(&options.sources_label));
        out.push_str("</strong>");
        for source in &message.sources {
            out.push_str(&format!(
                r#"<div class="source-item"><a href="{}" target="_blank" rel="noopener noreferrer">{}</a></div>"#,
                escape_html(&source.url),
                escape_html(&source.title)
            ));
        }
        out.push_str("</div>");
    }

    out.push_str("</div>");
    out
}

/// Placeholder bubble shown while a question is outstanding. The three spans are
/// animated by the page stylesheet.
pub fn typing_html() -> String {
    format!(
        r#"<div id="{}" class="chat-message bot"><div class="message-content"><span></span><span></span><span></span></div></div>"#,
        TYPING_MARKER
    )
}

/// Plain-text rendering for terminals. Bot markdown is left as written.
pub fn message_text(message: &Message, options: &RenderOptions) -> String {
    let mut out = match message.sender {
        Sender::User => format!("> {}", message.text),
        Sender::Bot => message.text.trim_end().to_string(),
    };
    if !message.sources.is_empty() {
        out.push('\n');
        out.push_str(&options.sources_label);
        for source in &message.sources {
            out.push_str(&format!("\n  - {} <{}>", source.title, source.url));
        }
    }
    out
}
