use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Element, Event, HtmlElement, MouseEvent, Window};

use super::render::{window_viewport, Timer};
use crate::config::TypewriterConfig;
use crate::glow::{css_percent, pointer_percent, POINTER_X_VAR, POINTER_Y_VAR};
use crate::repeat::RepeatingTask;
use crate::typewriter::Typewriter;

/// Type the hero headline into `target`; the task ends itself once the text is complete.
pub fn start_typewriter(
    window: &Window,
    target: Element,
    cfg: &TypewriterConfig,
) -> RepeatingTask<Timer> {
    let mut writer = Typewriter::new(cfg.text.as_str());
    target.set_text_content(Some(""));
    let timer = Timer::new(window.clone(), cfg.interval_ms);
    RepeatingTask::start(timer, move |_| {
        let flow = writer.tick();
        target.set_text_content(Some(writer.visible()));
        if flow.is_break() {
            log::debug!("hero headline complete");
        }
        flow
    })
}

/// Publishes the pointer position over `section` as `--pointer-x` / `--pointer-y`
/// on its inline style; the hero glow overlay is centred on them. The
/// `mousemove` listener is removed on drop.
pub struct PointerGlow {
    section: HtmlElement,
    callback: Closure<dyn FnMut(Event)>,
}

impl PointerGlow {
    pub fn follow(window: &Window, section: HtmlElement) -> Result<Self, JsValue> {
        let callback = {
            let window = window.clone();
            let section = section.clone();
            Closure::wrap(Box::new(move |event: Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let (x, y) = (event.client_x() as f64, event.client_y() as f64);
                let Some((px, py)) = pointer_percent(x, y, window_viewport(&window)) else {
                    return;
                };
                let style = section.style();
                for (var, value) in [(POINTER_X_VAR, px), (POINTER_Y_VAR, py)] {
                    if let Err(e) = style.set_property(var, &css_percent(value)) {
                        log::debug!("failed to set {var}: {e:?}");
                    }
                }
            }) as Box<dyn FnMut(Event)>)
        };
        section.add_event_listener_with_callback("mousemove", callback.as_ref().unchecked_ref())?;
        Ok(Self { section, callback })
    }
}

impl Drop for PointerGlow {
    fn drop(&mut self) {
        let callback = self.callback.as_ref().unchecked_ref();
        if let Err(e) = self
            .section
            .remove_event_listener_with_callback("mousemove", callback)
        {
            log::debug!("failed to remove mousemove listener: {e:?}");
        }
    }
}
