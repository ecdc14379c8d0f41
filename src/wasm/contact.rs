use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlTextAreaElement, Request, RequestInit, RequestMode, Response, Window,
};

use crate::contact::{ContactController, ContactView, Field, HttpResponse, Transport};
use crate::error::TransportError;

const IDLE_LABEL: &str = "Send Message";
const BUSY_LABEL: &str = "Sending...";

/// `fetch`-backed transport.
pub struct FetchTransport {
    window: Window,
}

impl FetchTransport {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Transport for FetchTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError> {
        let init = RequestInit::new();
        init.set_method("POST");
        init.set_mode(RequestMode::Cors);
        init.set_body(&JsValue::from_str(&body));
        let request = Request::new_with_str_and_init(url, &init)
            .map_err(|e| TransportError::Request(describe(&e)))?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| TransportError::Request(describe(&e)))?;

        // fetch only rejects when no response was received at all.
        let value = JsFuture::from(self.window.fetch_with_request(&request))
            .await
            .map_err(|e| TransportError::NoResponse(describe(&e)))?;
        let response: Response = value
            .dyn_into()
            .map_err(|e| TransportError::Request(describe(&e)))?;
        let body = match response.text() {
            Ok(promise) => JsFuture::from(promise)
                .await
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default(),
            Err(_) => String::new(),
        };
        Ok(HttpResponse {
            status: response.status(),
            body,
        })
    }
}

fn describe(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_default()
}

/// Text input or textarea bound to one form field.
enum Control {
    Input(HtmlInputElement),
    Area(HtmlTextAreaElement),
}

impl Control {
    fn lookup(form: &HtmlFormElement, field: Field) -> Option<Self> {
        let selector = format!("[name=\"{}\"]", field.input_name());
        let el = form.query_selector(&selector).ok()??;
        Self::from_element(el)
    }

    fn from_element(el: Element) -> Option<Self> {
        match el.dyn_into::<HtmlInputElement>() {
            Ok(input) => Some(Control::Input(input)),
            Err(el) => el.dyn_into::<HtmlTextAreaElement>().ok().map(Control::Area),
        }
    }

    fn name(&self) -> String {
        match self {
            Control::Input(c) => c.name(),
            Control::Area(c) => c.name(),
        }
    }

    fn value(&self) -> String {
        match self {
            Control::Input(c) => c.value(),
            Control::Area(c) => c.value(),
        }
    }

    fn set_value(&self, value: &str) {
        // Rewriting an unchanged value would move the caret.
        if self.value() == value {
            return;
        }
        match self {
            Control::Input(c) => c.set_value(value),
            Control::Area(c) => c.set_value(value),
        }
    }

    fn set_disabled(&self, disabled: bool) {
        match self {
            Control::Input(c) => c.set_disabled(disabled),
            Control::Area(c) => c.set_disabled(disabled),
        }
    }
}

/// DOM wiring for `#contact-form`. Dropping it removes the listeners and
/// detaches the controller, so responses still in flight are ignored.
pub struct ContactBinding {
    controller: Rc<ContactController<FetchTransport>>,
    form: HtmlFormElement,
    on_input: Closure<dyn FnMut(Event)>,
    on_submit: Closure<dyn FnMut(Event)>,
}

impl ContactBinding {
    /// Wire up `#contact-form`. `Ok(None)` when the page has no contact form;
    /// an error when `#contact-form` is not a `<form>` or a listener cannot be added.
    pub fn bind(
        window: &Window,
        document: &Document,
        endpoint: &str,
    ) -> Result<Option<Self>, JsValue> {
        let Some(form) = document.get_element_by_id("contact-form") else {
            return Ok(None);
        };
        let form: HtmlFormElement = form.dyn_into()?;
        let transport = FetchTransport::new(window.clone());
        let controller = Rc::new(ContactController::new(endpoint, transport));

        let controls: Vec<(Field, Control)> = Field::ALL
            .into_iter()
            .filter_map(|f| Control::lookup(&form, f).map(|c| (f, c)))
            .collect();
        for (field, control) in &controls {
            controller.set_field(*field, control.value());
        }
        let button = document
            .get_element_by_id("contact-submit")
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
        let status_el = document
            .get_element_by_id("contact-status")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        controller.on_change(move |view| {
            render(view, &controls, button.as_ref(), status_el.as_ref());
        });

        let on_input = {
            let controller = controller.clone();
            Closure::wrap(Box::new(move |event: Event| {
                let Some(control) = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(Control::from_element)
                else {
                    return;
                };
                if let Some(field) = Field::from_input_name(&control.name()) {
                    controller.set_field(field, control.value());
                }
            }) as Box<dyn FnMut(Event)>)
        };
        form.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;

        let on_submit = {
            let controller = controller.clone();
            Closure::wrap(Box::new(move |event: Event| {
                event.prevent_default();
                let controller = controller.clone();
                spawn_local(async move {
                    controller.submit().await;
                });
            }) as Box<dyn FnMut(Event)>)
        };
        form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;

        log::info!("contact form bound to {endpoint}");
        Ok(Some(Self {
            controller,
            form,
            on_input,
            on_submit,
        }))
    }

    pub fn controller(&self) -> &ContactController<FetchTransport> {
        &self.controller
    }
}

impl Drop for ContactBinding {
    fn drop(&mut self) {
        self.controller.detach();
        let target: &web_sys::EventTarget = self.form.as_ref();
        for (kind, cb) in [("input", &self.on_input), ("submit", &self.on_submit)] {
            let listener = cb.as_ref().unchecked_ref();
            if let Err(e) = target.remove_event_listener_with_callback(kind, listener) {
                log::debug!("failed to remove {kind} listener: {e:?}");
            }
        }
    }
}

fn render(
    view: &ContactView,
    controls: &[(Field, Control)],
    button: Option<&HtmlButtonElement>,
    status_el: Option<&HtmlElement>,
) {
    let busy = view.submitting;
    for (field, control) in controls {
        control.set_value(view.form.get(*field));
        control.set_disabled(busy);
    }
    if let Some(button) = button {
        button.set_disabled(busy);
        button.set_text_content(Some(if busy { BUSY_LABEL } else { IDLE_LABEL }));
    }
    if let Some(el) = status_el {
        match &view.status {
            Some(status) => {
                el.set_class_name(&format!("contact-status {}", status.kind.as_str()));
                el.set_text_content(Some(&status.message));
                el.set_hidden(false);
            }
            None => {
                el.set_text_content(None);
                el.set_hidden(true);
            }
        }
    }
}
