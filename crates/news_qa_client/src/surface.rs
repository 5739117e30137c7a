//! Surfaces the session draws on: the transcript container plus the text input.
//!
//! `HtmlSurface` is an in-memory page (used for tests and transcript export),
//! `TerminalSurface` writes turns to a terminal. The browser crate binds the same
//! trait to real DOM elements.

use std::io::Write;

use crate::render::{self, RenderOptions, TYPING_MARKER};
use crate::transcript::Message;

/// Something appended to the end of the transcript.
#[derive(Debug, Clone, Copy)]
pub enum Bubble<'a> {
    Message(&'a Message),
    /// The pending placeholder, identified by [`TYPING_MARKER`].
    Typing,
}

pub trait Surface {
    fn append(&mut self, bubble: Bubble<'_>);
    /// Remove the element identified by `marker`. No-op when absent.
    fn remove(&mut self, marker: &str);
    fn scroll_to_bottom(&mut self);
    fn read_input(&self) -> String;
    fn write_input(&mut self, text: &str);
}

/// One element of the in-memory transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlNode {
    pub id: Option<String>,
    pub html: String,
}

/// In-memory chat page.
#[derive(Debug, Clone, Default)]
pub struct HtmlSurface {
    options: RenderOptions,
    nodes: Vec<HtmlNode>,
    input: String,
    scroll_top: usize,
}

impl HtmlSurface {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn nodes(&self) -> &[HtmlNode] {
        &self.nodes
    }

    /// Number of typing placeholders currently in the transcript.
    pub fn typing_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.id.as_deref() == Some(TYPING_MARKER))
            .count()
    }

    /// Index of the node the view is scrolled to.
    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    /// Whether the view shows the newest node.
    pub fn is_pinned_to_bottom(&self) -> bool {
        self.nodes.is_empty() || self.scroll_top + 1 == self.nodes.len()
    }

    /// Inner markup of the `#chat-box` container.
    pub fn transcript_html(&self) -> String {
        self.nodes.iter().map(|n| n.html.as_str()).collect()
    }

    /// Standalone page with the transcript, for saving to disk.
    pub fn to_document(&self, title: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<div id=\"chat-box\">{}</div>\n</body>\n</html>\n",
            render::escape_html(title),
            self.transcript_html()
        )
    }
}

impl Surface for HtmlSurface {
    fn append(&mut self, bubble: Bubble<'_>) {
        let node = match bubble {
            Bubble::Message(message) => HtmlNode {
                id: None,
                html: render::message_html(message, &self.options),
            },
            Bubble::Typing => HtmlNode {
                id: Some(TYPING_MARKER.to_string()),
                html: render::typing_html(),
            },
        };
        self.nodes.push(node);
    }

    fn remove(&mut self, marker: &str) {
        if let Some(pos) = self
            .nodes
            .iter()
            .position(|n| n.id.as_deref() == Some(marker))
        {
            self.nodes.remove(pos);
            self.scroll_top = self.scroll_top.min(self.nodes.len().saturating_sub(1));
        }
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.nodes.len().saturating_sub(1);
    }

    fn read_input(&self) -> String {
        self.input.clone()
    }

    fn write_input(&mut self, text: &str) {
        self.input = text.to_string();
    }
}

/// Writes each turn to `out` as it is appended. The typing placeholder goes to
/// stderr so `out` carries only the conversation.
pub struct TerminalSurface<W: Write> {
    out: W,
    options: RenderOptions,
    input: String,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, options: RenderOptions) -> Self {
        Self {
            out,
            options,
            input: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn append(&mut self, bubble: Bubble<'_>) {
        let result = match bubble {
            Bubble::Message(message) => writeln!(
                self.out,
                "{}\n",
                render::message_text(message, &self.options)
            ),
            Bubble::Typing => {
                eprintln!("...");
                Ok(())
            }
        };
        if let Err(e) = result {
            log::warn!("failed to write transcript: {}", e);
        }
    }

    fn remove(&mut self, _marker: &str) {}

    fn scroll_to_bottom(&mut self) {
        if let Err(e) = self.out.flush() {
            log::warn!("failed to flush transcript: {}", e);
        }
    }

    fn read_input(&self) -> String {
        self.input.clone()
    }

    fn write_input(&mut self, text: &str) {
        self.input = text.to_string();
    }
}
