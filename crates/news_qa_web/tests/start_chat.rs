//! Browser tests for the page wiring done by `start_chat`: form submit and chip
//! clicks. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use news_qa_web::start_chat;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, Event, EventInit, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

// Nothing listens here; replies arrive later as the apology and are not awaited.
const ENDPOINT: &str = "http://127.0.0.1:9/ask";

fn page() -> Document {
    let document = web_sys::window().unwrap().document().unwrap();
    document.body().unwrap().set_inner_html(
        r#"<div id="chat-box"></div>
<form id="chat-form"><input id="user-input"></form>
<span class="chip">ราคาทองวันนี้</span>"#,
    );
    document
}

fn element(document: &Document, selector: &str) -> Element {
    document.query_selector(selector).unwrap().unwrap()
}

fn input(document: &Document) -> HtmlInputElement {
    element(document, "#user-input").dyn_into().unwrap()
}

/// Fire a cancelable `submit` on the form; returns whether the default ran.
fn submit(document: &Document) -> bool {
    let init = EventInit::new();
    init.set_cancelable(true);
    let event = Event::new_with_event_init_dict("submit", &init).unwrap();
    element(document, "#chat-form").dispatch_event(&event).unwrap()
}

fn typing_count(document: &Document) -> u32 {
    document
        .query_selector_all("#typing-indicator")
        .unwrap()
        .length()
}

#[wasm_bindgen_test]
fn blank_submit_leaves_page_unchanged() {
    let document = page();
    start_chat(Some(ENDPOINT.into())).unwrap();

    input(&document).set_value("   ");
    let default_ran = submit(&document);

    assert!(!default_ran, "submit must not navigate");
    assert_eq!(element(&document, "#chat-box").inner_html(), "");
    assert_eq!(input(&document).value(), "   ");
    assert_eq!(typing_count(&document), 0);
}

#[wasm_bindgen_test]
fn typed_submit_appends_user_bubble_and_indicator() {
    let document = page();
    start_chat(Some(ENDPOINT.into())).unwrap();

    input(&document).set_value("  ข่าวกีฬา  ");
    let default_ran = submit(&document);

    assert!(!default_ran, "submit must not navigate");
    let user = element(&document, "#chat-box .chat-message.user .message-content");
    assert_eq!(user.text_content().as_deref(), Some("ข่าวกีฬา"));
    assert_eq!(input(&document).value(), "");
    assert_eq!(typing_count(&document), 1);
}

#[wasm_bindgen_test]
fn chip_click_submits_its_text() {
    let document = page();
    start_chat(Some(ENDPOINT.into())).unwrap();

    let click = Event::new("click").unwrap();
    element(&document, ".chip").dispatch_event(&click).unwrap();

    let user = element(&document, "#chat-box .chat-message.user .message-content");
    assert_eq!(user.text_content().as_deref(), Some("ราคาทองวันนี้"));
    assert_eq!(typing_count(&document), 1);

    // A second question while the first is outstanding keeps a single indicator.
    input(&document).set_value("ข่าวกีฬา");
    submit(&document);
    let users = document
        .query_selector_all("#chat-box .chat-message.user")
        .unwrap();
    assert_eq!(users.length(), 2);
    assert_eq!(typing_count(&document), 1);
}
