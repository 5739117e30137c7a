//! Chat session controller: input capture, pending indicator and rendering of
//! replies, all behind one object that owns the transcript and the surface.

use std::cell::RefCell;

use crate::client::{AskError, Client};
use crate::messages::Answer;
use crate::render::TYPING_MARKER;
use crate::surface::{Bubble, Surface};
use crate::transcript::{Message, Transcript};

/// Bot reply shown when a question fails for any reason.
pub const DEFAULT_ERROR_MESSAGE: &str =
    "ขออภัยค่ะ เกิดข้อผิดพลาดในการเชื่อมต่อกับเซิร์ฟเวอร์ กรุณาลองใหม่อีกครั้ง";

/// Suggestion triggers offered when none are configured.
pub const DEFAULT_SUGGESTIONS: &[&str] = &[
    "ราคาทองวันนี้",
    "สรุปข่าวเศรษฐกิจล่าสุด",
    "ข่าวเทคโนโลยีวันนี้มีอะไรบ้าง",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub suggestions: Vec<String>,
    pub error_message: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            suggestions: DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            error_message: DEFAULT_ERROR_MESSAGE.into(),
        }
    }
}

/// Owns the transcript and the single typing-indicator slot. All mutation goes
/// through its methods.
pub struct ChatSession<S> {
    surface: S,
    transcript: Transcript,
    typing: bool,
    /// Questions submitted and not yet resolved.
    pending: usize,
    settings: SessionSettings,
    failed: usize,
}

impl<S: Surface> ChatSession<S> {
    pub fn new(surface: S, settings: SessionSettings) -> Self {
        Self {
            surface,
            transcript: Transcript::new(),
            typing: false,
            pending: 0,
            settings,
            failed: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn suggestions(&self) -> &[String] {
        &self.settings.suggestions
    }

    /// Questions that ended with the apology instead of an answer.
    pub fn failed_exchanges(&self) -> usize {
        self.failed
    }

    /// Handle a form submit. Returns the trimmed question to send, or `None` when
    /// the input is blank (nothing is appended and the input is left as is).
    pub fn submit(&mut self) -> Option<String> {
        let query = self.surface.read_input().trim().to_string();
        if query.is_empty() {
            return None;
        }

        self.append(Message::user(query.clone()));
        self.surface.write_input("");
        self.pending += 1;
        self.show_typing();
        Some(query)
    }

    /// Put `phrase` in the input and submit it, exactly as if it had been typed.
    pub fn trigger_suggestion(&mut self, phrase: &str) -> Option<String> {
        self.surface.write_input(phrase);
        self.submit()
    }

    /// Fire the configured suggestion at `index`.
    pub fn suggestion(&mut self, index: usize) -> Option<String> {
        let phrase = self.settings.suggestions.get(index)?.clone();
        self.trigger_suggestion(&phrase)
    }

    pub fn show_typing(&mut self) {
        if self.typing {
            return;
        }
        self.typing = true;
        self.surface.append(Bubble::Typing);
        self.surface.scroll_to_bottom();
    }

    pub fn hide_typing(&mut self) {
        self.surface.remove(TYPING_MARKER);
        self.typing = false;
    }

    /// Render the outcome of one question. The indicator is gone before the reply
    /// is appended, and comes back after it while other questions are outstanding.
    pub fn resolve(&mut self, outcome: Result<Answer, AskError>) {
        self.pending = self.pending.saturating_sub(1);
        self.hide_typing();
        let message = match outcome {
            Ok(answer) => Message::from(answer),
            Err(e) => {
                log::error!("Error fetching API: {}", e);
                self.failed += 1;
                Message::bot(self.settings.error_message.clone(), Vec::new())
            }
        };
        self.append(message);
        if self.pending > 0 {
            self.show_typing();
        }
    }

    fn append(&mut self, message: Message) {
        let message = self.transcript.push(message);
        self.surface.append(Bubble::Message(message));
        self.surface.scroll_to_bottom();
    }
}

/// One question's round trip: ask, then render the reply. The session is only
/// borrowed after the response arrives, so other submits can run meanwhile.
pub async fn exchange<S: Surface>(
    session: &RefCell<ChatSession<S>>,
    client: &Client,
    query: String,
) {
    let outcome = client.ask(&query).await;
    session.borrow_mut().resolve(outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Source;
    use crate::render::RenderOptions;
    use crate::surface::HtmlSurface;
    use crate::transcript::Sender;

    fn session() -> ChatSession<HtmlSurface> {
        ChatSession::new(
            HtmlSurface::new(RenderOptions::default()),
            SessionSettings::default(),
        )
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut s = session();
        for input in ["", "   ", "\n\t "] {
            s.surface_mut().write_input(input);
            assert_eq!(s.submit(), None);
            assert_eq!(s.surface().read_input(), input);
        }
        assert!(s.transcript().is_empty());
        assert!(s.surface().nodes().is_empty());
        assert!(!s.is_typing());
    }

    #[test]
    fn submit_appends_trimmed_user_message_and_shows_indicator() {
        let mut s = session();
        s.surface_mut().write_input("  ข่าวล่าสุด  ");
        assert_eq!(s.submit().as_deref(), Some("ข่าวล่าสุด"));

        let msgs = s.transcript().messages();
        assert_eq!(msgs, &[Message::user("ข่าวล่าสุด")]);
        assert_eq!(s.surface().read_input(), "");
        assert!(s.is_typing());
        assert_eq!(s.surface().typing_count(), 1);
        assert!(s.surface().is_pinned_to_bottom());
    }

    #[test]
    fn show_is_idempotent() {
        let mut s = session();
        s.show_typing();
        s.show_typing();
        assert_eq!(s.surface().typing_count(), 1);
        s.hide_typing();
        s.hide_typing();
        assert_eq!(s.surface().typing_count(), 0);
    }

    #[test]
    fn answer_replaces_indicator() {
        let mut s = session();
        s.surface_mut().write_input("q");
        s.submit();
        s.resolve(Ok(Answer {
            answer: "**hi**".into(),
            sources: vec![Source::new("Doc", "http://x")],
        }));

        assert!(!s.is_typing());
        assert_eq!(s.surface().typing_count(), 0);
        let last = s.surface().nodes().last().unwrap();
        assert!(last.html.contains("<strong>hi</strong>"));
        assert!(last.html.contains(r#"href="http://x""#));
        assert_eq!(s.failed_exchanges(), 0);
    }

    #[test]
    fn indicator_stays_while_questions_are_outstanding() {
        let mut s = session();
        s.surface_mut().write_input("slow");
        s.submit();
        s.surface_mut().write_input("fast");
        s.submit();
        assert_eq!(s.pending(), 2);
        assert_eq!(s.surface().typing_count(), 1);

        s.resolve(Ok(Answer {
            answer: "fast answer".into(),
            sources: Vec::new(),
        }));
        assert_eq!(s.pending(), 1);
        assert!(s.is_typing());
        assert_eq!(s.surface().typing_count(), 1);
        // The reply sits above the placeholder, not below it.
        let nodes = s.surface().nodes();
        assert!(nodes[nodes.len() - 2].html.contains("fast answer"));
        assert!(nodes[nodes.len() - 1].html.contains("typing-indicator"));

        s.resolve(Err(AskError::Status(502)));
        assert_eq!(s.pending(), 0);
        assert!(!s.is_typing());
        assert_eq!(s.surface().typing_count(), 0);
        assert!(s.surface().nodes().last().unwrap().html.contains(DEFAULT_ERROR_MESSAGE));
    }

    #[test]
    fn failure_renders_apology_without_sources() {
        let mut s = session();
        s.surface_mut().write_input("q");
        s.submit();
        s.resolve(Err(AskError::Status(500)));

        let last = s.transcript().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, DEFAULT_ERROR_MESSAGE);
        assert!(last.sources.is_empty());
        assert_eq!(s.surface().typing_count(), 0);
        assert_eq!(s.failed_exchanges(), 1);
    }

    #[test]
    fn suggestion_matches_typed_input() {
        let mut typed = session();
        typed.surface_mut().write_input("ราคาทองวันนี้");
        typed.submit();

        let mut clicked = session();
        assert_eq!(clicked.suggestion(0).as_deref(), Some("ราคาทองวันนี้"));

        assert_eq!(typed.transcript().messages(), clicked.transcript().messages());
        assert_eq!(typed.surface().nodes(), clicked.surface().nodes());
        assert_eq!(clicked.suggestion(99), None);
    }

    #[test]
    fn sequential_exchanges_alternate() {
        let mut s = session();
        for i in 0..3 {
            s.surface_mut().write_input(&format!("q{}", i));
            s.submit();
            s.resolve(Ok(Answer {
                answer: format!("a{}", i),
                sources: Vec::new(),
            }));
        }
        let texts: Vec<_> = s
            .transcript()
            .messages()
            .iter()
            .map(|m| (m.sender, m.text.as_str()))
            .collect();
        assert_eq!(
            texts,
            vec![
                (Sender::User, "q0"),
                (Sender::Bot, "a0"),
                (Sender::User, "q1"),
                (Sender::Bot, "a1"),
                (Sender::User, "q2"),
                (Sender::Bot, "a2"),
            ]
        );
    }
}
