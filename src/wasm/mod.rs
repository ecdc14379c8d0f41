//! Browser glue: mounts the page's animations, scroll spy, hero glow and
//! contact form, and follows the page lifecycle.

use std::cell::{Cell, RefCell};

use fastrand::Rng;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlCanvasElement, HtmlElement, PageTransitionEvent, Window};

use crate::config::SiteConfig;
use crate::repeat::RepeatingTask;

pub mod contact;
pub mod hero;
pub mod nav;
pub mod render;

use contact::ContactBinding;
use hero::PointerGlow;
use nav::ScrollSpy;
use render::{AnimationFrames, MountedCanvas, Timer};

/// Everything mounted on the page. Dropping it returns every part to Idle.
struct Page {
    cosmic: Option<MountedCanvas<AnimationFrames>>,
    rain: Option<MountedCanvas<Timer>>,
    typewriter: Option<RepeatingTask<Timer>>,
    glow: Option<PointerGlow>,
    nav: Option<ScrollSpy>,
    contact: Option<ContactBinding>,
}

impl Page {
    fn parts(&self) -> Vec<&'static str> {
        [
            ("cosmic", self.cosmic.is_some()),
            ("rain", self.rain.is_some()),
            ("typewriter", self.typewriter.is_some()),
            ("glow", self.glow.is_some()),
            ("nav", self.nav.is_some()),
            ("contact", self.contact.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
    static LIFECYCLE_WATCHED: Cell<bool> = const { Cell::new(false) };
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    watch_lifecycle()?;
    mount()
}

/// Start every part found in the document. A part that cannot start is logged
/// and left out; the rest still run. Does nothing while already mounted.
#[wasm_bindgen]
pub fn mount() -> Result<(), JsValue> {
    if is_mounted() {
        log::debug!("page already mounted");
        return Ok(());
    }
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let config = load_config(&document);
    let mut rng = Rng::with_seed(config.seed.unwrap_or_else(random_seed));

    let cosmic = canvas_by_id(&document, "cosmic-bg").and_then(|canvas| {
        let mounted = MountedCanvas::cosmic(&window, canvas, &mut rng, config.particle_count);
        started("cosmic background", mounted)
    });
    let rain = canvas_by_id(&document, "matrix-rain").and_then(|canvas| {
        let mounted = MountedCanvas::rain(&window, canvas, &config.rain, rng.fork());
        started("matrix rain", mounted)
    });
    let typewriter = document
        .get_element_by_id("typed-text")
        .map(|el| hero::start_typewriter(&window, el, &config.typewriter));
    let glow = document
        .get_element_by_id("home")
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .and_then(|home| started("hero glow", PointerGlow::follow(&window, home)));
    let nav = ScrollSpy::watch(&window, &document);
    let nav = started("scroll spy", nav).flatten();
    let contact = ContactBinding::bind(&window, &document, &config.contact_endpoint);
    let contact = started("contact form", contact).flatten();
    if contact.is_none() {
        log::warn!("contact form disabled");
    }

    let page = Page {
        cosmic,
        rain,
        typewriter,
        glow,
        nav,
        contact,
    };
    log::info!("mounted: {}", page.parts().join(", "));
    PAGE.with(|slot| *slot.borrow_mut() = Some(page));
    Ok(())
}

/// Stop every animation, remove every listener and detach the contact form.
#[wasm_bindgen]
pub fn teardown() {
    let Some(page) = PAGE.with(|slot| slot.borrow_mut().take()) else {
        return;
    };
    if let Some(cosmic) = page.cosmic {
        cosmic.unmount();
    }
    if let Some(rain) = page.rain {
        rain.unmount();
    }
    if let Some(typewriter) = page.typewriter {
        typewriter.stop();
    }
    drop(page.glow);
    drop(page.nav);
    drop(page.contact);
    log::info!("page torn down");
}

#[wasm_bindgen]
pub fn is_mounted() -> bool {
    PAGE.with(|slot| slot.borrow().is_some())
}

/// Names of the parts currently running, empty when nothing is mounted.
pub fn mounted_parts() -> Vec<&'static str> {
    PAGE.with(|slot| match slot.borrow().as_ref() {
        Some(page) => page.parts(),
        None => Vec::new(),
    })
}

/// Tear down on `pagehide` unless the page is going into the back/forward
/// cache, and remount when a cached page is shown again. Installed once.
pub fn watch_lifecycle() -> Result<(), JsValue> {
    if LIFECYCLE_WATCHED.with(|watched| watched.replace(true)) {
        return Ok(());
    }
    let window = web_sys::window().ok_or("no window")?;
    listen_forever(&window, "pagehide", |persisted| {
        if persisted {
            log::debug!("page entering back/forward cache; staying mounted");
        } else {
            teardown();
        }
    })?;
    listen_forever(&window, "pageshow", |persisted| {
        if persisted && !is_mounted() {
            if let Err(e) = mount() {
                log::error!("remount after back/forward navigation failed: {e:?}");
            }
        }
    })
}

fn listen_forever(
    window: &Window,
    kind: &str,
    handler: impl Fn(bool) + 'static,
) -> Result<(), JsValue> {
    let callback = Closure::wrap(Box::new(move |event: Event| {
        let persisted = event
            .dyn_ref::<PageTransitionEvent>()
            .is_some_and(|e| e.persisted());
        handler(persisted);
    }) as Box<dyn FnMut(Event)>);
    window.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
    // Lives as long as the page.
    callback.forget();
    Ok(())
}

fn started<T>(part: &str, result: Result<T, JsValue>) -> Option<T> {
    match result {
        Ok(mounted) => Some(mounted),
        Err(e) => {
            log::error!("{part} disabled: {e:?}");
            None
        }
    }
}

fn load_config(document: &Document) -> SiteConfig {
    let Some(src) = document
        .get_element_by_id("site-config")
        .and_then(|el| el.text_content())
    else {
        return SiteConfig::default();
    };
    match SiteConfig::from_json(&src) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("ignoring #site-config: {e}");
            SiteConfig::default()
        }
    }
}

fn canvas_by_id(document: &Document, id: &str) -> Option<HtmlCanvasElement> {
    let Some(el) = document.get_element_by_id(id) else {
        log::warn!("canvas #{id} not found; skipping");
        return None;
    };
    match el.dyn_into::<HtmlCanvasElement>() {
        Ok(canvas) => Some(canvas),
        Err(_) => {
            log::error!("#{id} is not a <canvas>; skipping");
            None
        }
    }
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64 ^ js_sys::Date::now() as u64
}
