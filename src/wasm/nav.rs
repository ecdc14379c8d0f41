use std::cell::Cell;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, Window};

use crate::nav::{NavState, SectionBounds, SECTIONS};

/// Highlights the header link of the section under the active line and marks
/// the header `scrolled` once the page has moved. The `scroll` listener is
/// removed on drop.
pub struct ScrollSpy {
    window: Window,
    callback: Closure<dyn FnMut()>,
}

struct Targets {
    header: Element,
    links: Vec<(&'static str, Element)>,
    sections: Vec<(&'static str, Element)>,
}

impl Targets {
    fn find(document: &Document) -> Result<Option<Self>, JsValue> {
        let Some(header) = document.query_selector(".site-header")? else {
            return Ok(None);
        };
        let mut links = Vec::new();
        let mut sections = Vec::new();
        for id in SECTIONS {
            if let Some(link) = header.query_selector(&format!("nav a[href=\"#{id}\"]"))? {
                links.push((id, link));
            }
            if let Some(section) = document.get_element_by_id(id) {
                sections.push((id, section));
            }
        }
        Ok(Some(Self {
            header,
            links,
            sections,
        }))
    }

    fn bounds(&self) -> Vec<SectionBounds> {
        self.sections
            .iter()
            .map(|&(id, ref el)| {
                let rect = el.get_bounding_client_rect();
                SectionBounds {
                    id,
                    top: rect.top(),
                    bottom: rect.bottom(),
                }
            })
            .collect()
    }

    fn apply(&self, nav: NavState) {
        let mark = |el: &Element, class: &str, on: bool| {
            if let Err(e) = el.class_list().toggle_with_force(class, on) {
                log::debug!("failed to toggle .{class}: {e:?}");
            }
        };
        mark(&self.header, "scrolled", nav.scrolled);
        for (id, link) in &self.links {
            mark(link, "active", *id == nav.active);
        }
    }
}

impl ScrollSpy {
    pub fn watch(window: &Window, document: &Document) -> Result<Option<Self>, JsValue> {
        let Some(targets) = Targets::find(document)? else {
            return Ok(None);
        };
        let state = Cell::new(NavState::default());
        let refresh = {
            let window = window.clone();
            move |force: bool| {
                let mut nav = state.get();
                let scroll_y = window.scroll_y().unwrap_or(0.0);
                if nav.update(scroll_y, &targets.bounds()) || force {
                    targets.apply(nav);
                }
                state.set(nav);
            }
        };
        refresh(true);
        let callback = Closure::wrap(Box::new(move || refresh(false)) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref())?;
        log::debug!("scroll spy watching {} sections", SECTIONS.len());
        Ok(Some(Self {
            window: window.clone(),
            callback,
        }))
    }
}

impl Drop for ScrollSpy {
    fn drop(&mut self) {
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("scroll", self.callback.as_ref().unchecked_ref())
        {
            log::debug!("failed to remove scroll listener: {e:?}");
        }
    }
}
