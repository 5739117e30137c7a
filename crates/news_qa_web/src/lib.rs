//! News Q&A chat page: binds a [`ChatSession`] to the browser DOM.
//!
//! Expects `#chat-box`, `#chat-form`, `#user-input` and any number of `.chip`
//! suggestion elements in the page.

use std::cell::RefCell;
use std::rc::Rc;

use news_qa_client::{
    exchange, ChatSession, Client, RenderOptions, SessionSettings, DEFAULT_ENDPOINT,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event};

pub mod dom;

use dom::DomSurface;

type Session = Rc<RefCell<ChatSession<DomSurface>>>;

/// Set up panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("News Q&A initialized");
}

/// Wire the form and suggestion chips to a new session talking to `endpoint`
/// (default `http://127.0.0.1:8010/ask`).
#[wasm_bindgen]
pub fn start_chat(endpoint: Option<String>) -> Result<(), JsValue> {
    let document = document()?;
    let client = Client::new(endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()));

    let chips = dom::query_all(&document, ".chip")?;
    let settings = SessionSettings {
        suggestions: chips.iter().filter_map(|c| c.text_content()).collect(),
        ..SessionSettings::default()
    };
    let surface = DomSurface::new(document.clone(), RenderOptions::default())?;
    let session: Session = Rc::new(RefCell::new(ChatSession::new(surface, settings)));

    let form = dom::get_element_by_id(&document, "chat-form")?;
    {
        let session = Rc::clone(&session);
        let client = client.clone();
        let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            let query = session.borrow_mut().submit();
            if let Some(query) = query {
                spawn_exchange(&session, &client, query);
            }
        });
        form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
        on_submit.forget();
    }

    for chip in chips {
        let session = Rc::clone(&session);
        let client = client.clone();
        let phrase = chip.text_content().unwrap_or_default();
        let on_click = Closure::<dyn FnMut()>::new(move || {
            let query = session.borrow_mut().trigger_suggestion(&phrase);
            if let Some(query) = query {
                spawn_exchange(&session, &client, query);
            }
        });
        chip.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }

    log::info!("chat wired to {}", client.endpoint());
    Ok(())
}

/// One task per submit; overlapping questions render in arrival order.
fn spawn_exchange(session: &Session, client: &Client, query: String) {
    let session = Rc::clone(session);
    let client = client.clone();
    wasm_bindgen_futures::spawn_local(async move {
        exchange(&session, &client, query).await;
    });
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document object"))
}
