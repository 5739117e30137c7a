use news_qa_client::render::{self, RenderOptions};
use news_qa_client::{Bubble, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement};

/// Get element by ID
pub fn get_element_by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Element not found: {}", id)))
}

/// Get input element by ID
pub fn get_input_by_id(document: &Document, id: &str) -> Result<HtmlInputElement, JsValue> {
    let element = get_element_by_id(document, id)?;
    element
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| JsValue::from_str(&format!("Element is not HtmlInputElement: {}", id)))
}

/// All elements matching `selector`, in document order.
pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// The page's `#chat-box` transcript and `#user-input` field.
pub struct DomSurface {
    chat_box: Element,
    input: HtmlInputElement,
    options: RenderOptions,
}

impl DomSurface {
    pub fn new(document: Document, options: RenderOptions) -> Result<Self, JsValue> {
        let chat_box = get_element_by_id(&document, "chat-box")?;
        let input = get_input_by_id(&document, "user-input")?;
        Ok(Self {
            chat_box,
            input,
            options,
        })
    }
}

impl Surface for DomSurface {
    fn append(&mut self, bubble: Bubble<'_>) {
        let html = match bubble {
            Bubble::Message(message) => render::message_html(message, &self.options),
            Bubble::Typing => render::typing_html(),
        };
        if let Err(e) = self.chat_box.insert_adjacent_html("beforeend", &html) {
            log::error!("failed to append bubble: {:?}", e);
        }
    }

    fn remove(&mut self, marker: &str) {
        // Only look inside this transcript.
        match self.chat_box.query_selector(&format!("#{}", marker)) {
            Ok(Some(element)) => element.remove(),
            Ok(None) => {}
            Err(e) => log::error!("failed to look up {}: {:?}", marker, e),
        }
    }

    fn scroll_to_bottom(&mut self) {
        self.chat_box.set_scroll_top(self.chat_box.scroll_height());
    }

    fn read_input(&self) -> String {
        self.input.value()
    }

    fn write_input(&mut self, text: &str) {
        self.input.set_value(text);
    }
}
