use std::cell::RefCell;
use std::f64::consts::TAU;
use std::ops::ControlFlow;

use fastrand::Rng;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use crate::config::RainConfig;
use crate::cosmic::CosmicScene;
use crate::paint::{Fill, Paint, Surface, Viewport};
use crate::rain::MatrixRain;
use crate::repeat::{RepeatingTask, Scheduler, Tick};

/// 2D canvas context behind the [`Surface`] trait. Every command runs between
/// `save`/`restore`, so styles never carry over from one command to the next.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2D canvas not supported")?
            .dyn_into()?;
        Ok(Self { canvas, ctx })
    }

    fn draw(&self, cmd: &Paint) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let vp = self.viewport();
        match *cmd {
            Paint::Clear => ctx.clear_rect(0.0, 0.0, vp.width, vp.height),
            Paint::Cover { fill, alpha } => {
                ctx.set_global_alpha(alpha);
                self.set_fill(&fill)?;
                ctx.fill_rect(0.0, 0.0, vp.width, vp.height);
            }
            Paint::Line {
                from,
                to,
                color,
                width,
            } => {
                ctx.set_stroke_style_str(&color.to_string());
                ctx.set_line_width(width);
                ctx.begin_path();
                ctx.move_to(from.x, from.y);
                ctx.line_to(to.x, to.y);
                ctx.stroke();
            }
            Paint::Disc {
                center,
                radius,
                fill,
                alpha,
            } => {
                ctx.set_global_alpha(alpha);
                self.set_fill(&fill)?;
                ctx.begin_path();
                ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU)?;
                ctx.fill();
            }
            Paint::Glyph {
                ch,
                at,
                font_px,
                color,
            } => {
                ctx.set_fill_style_str(&color.to_string());
                ctx.set_font(&format!("{font_px}px monospace"));
                let mut buf = [0u8; 4];
                ctx.fill_text(ch.encode_utf8(&mut buf), at.x, at.y)?;
            }
        }
        Ok(())
    }

    fn set_fill(&self, fill: &Fill) -> Result<(), JsValue> {
        match fill {
            Fill::Solid(color) => self.ctx.set_fill_style_str(&color.to_string()),
            Fill::Radial(g) => {
                let (x, y) = (g.center.x, g.center.y);
                let radius = g.radius.max(0.0);
                let gradient = self.ctx.create_radial_gradient(x, y, 0.0, x, y, radius)?;
                for stop in g.stops {
                    gradient.add_color_stop(stop.offset as f32, &stop.color.to_string())?;
                }
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
        }
        Ok(())
    }
}

impl Surface for CanvasSurface {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn paint(&mut self, cmd: &Paint) {
        self.ctx.save();
        let res = self.draw(cmd);
        self.ctx.restore();
        if let Err(e) = res {
            log::debug!("canvas command {cmd:?} failed: {e:?}");
        }
    }
}

/// Display-synchronised ticks via `requestAnimationFrame`.
pub struct AnimationFrames {
    window: Window,
    // One closure per chain; created on first use and re-registered every frame.
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl AnimationFrames {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callback: RefCell::new(None),
        }
    }
}

impl Scheduler for AnimationFrames {
    fn schedule_once(&self, tick: &Tick) -> Option<i32> {
        let mut slot = self.callback.borrow_mut();
        let callback = slot.get_or_insert_with(|| {
            let tick = tick.clone();
            Closure::wrap(Box::new(move |t: f64| tick(t)) as Box<dyn FnMut(f64)>)
        });
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|e| log::warn!("requestAnimationFrame failed: {e:?}"))
            .ok()
    }

    fn cancel(&self, handle: i32) {
        if let Err(e) = self.window.cancel_animation_frame(handle) {
            log::debug!("cancelAnimationFrame failed: {e:?}");
        }
    }
}

/// Fixed-delay ticks via `setTimeout`, re-armed after each run.
pub struct Timer {
    window: Window,
    delay_ms: i32,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Timer {
    pub fn new(window: Window, delay_ms: u32) -> Self {
        let delay_ms = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        Self {
            window,
            delay_ms,
            callback: RefCell::new(None),
        }
    }
}

impl Scheduler for Timer {
    fn schedule_once(&self, tick: &Tick) -> Option<i32> {
        let mut slot = self.callback.borrow_mut();
        let callback = slot.get_or_insert_with(|| {
            let tick = tick.clone();
            let window = self.window.clone();
            Closure::wrap(Box::new(move || tick(now_ms(&window))) as Box<dyn FnMut()>)
        });
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                self.delay_ms,
            )
            .map_err(|e| log::warn!("setTimeout failed: {e:?}"))
            .ok()
    }

    fn cancel(&self, handle: i32) {
        self.window.clear_timeout_with_handle(handle);
    }
}

fn now_ms(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}

/// Inner size of the window in CSS pixels; zero when unavailable.
pub fn window_viewport(window: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0)
    };
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

/// Keeps a canvas sized to the window; the listener is removed on drop.
pub struct ResizeListener {
    window: Window,
    callback: Closure<dyn FnMut()>,
}

impl ResizeListener {
    pub fn fit(window: &Window, canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        fit_to_viewport(window, canvas);
        let callback = {
            let window = window.clone();
            let canvas = canvas.clone();
            Closure::wrap(Box::new(move || {
                fit_to_viewport(&window, &canvas);
            }) as Box<dyn FnMut()>)
        };
        window.add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())?;
        Ok(Self {
            window: window.clone(),
            callback,
        })
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("resize", self.callback.as_ref().unchecked_ref())
        {
            log::debug!("failed to remove resize listener: {e:?}");
        }
    }
}

fn fit_to_viewport(window: &Window, canvas: &HtmlCanvasElement) {
    let vp = window_viewport(window);
    canvas.set_width(vp.width as u32);
    canvas.set_height(vp.height as u32);
}

/// A canvas animation that is Running until dropped or unmounted.
pub struct MountedCanvas<S: Scheduler + 'static> {
    task: RepeatingTask<S>,
    _resize: ResizeListener,
}

impl MountedCanvas<AnimationFrames> {
    pub fn cosmic(
        window: &Window,
        canvas: HtmlCanvasElement,
        rng: &mut Rng,
        particles: usize,
    ) -> Result<Self, JsValue> {
        let mut surface = CanvasSurface::new(canvas.clone())?;
        let resize = ResizeListener::fit(window, &canvas)?;
        let mut scene = CosmicScene::new(rng, particles, surface.viewport());
        let frames = AnimationFrames::new(window.clone());
        let task = RepeatingTask::start(frames, move |t| {
            scene.frame(&mut surface, t, js_sys::Date::now());
            ControlFlow::Continue(())
        });
        log::info!("cosmic background running with {particles} particles");
        Ok(Self {
            task,
            _resize: resize,
        })
    }
}

impl MountedCanvas<Timer> {
    pub fn rain(
        window: &Window,
        canvas: HtmlCanvasElement,
        cfg: &RainConfig,
        rng: Rng,
    ) -> Result<Self, JsValue> {
        let mut surface = CanvasSurface::new(canvas.clone())?;
        let resize = ResizeListener::fit(window, &canvas)?;
        let mut rain = MatrixRain::new(cfg, surface.viewport(), rng);
        log::info!("matrix rain running with {} columns", rain.drops().len());
        let timer = Timer::new(window.clone(), cfg.interval_ms);
        let task = RepeatingTask::start(timer, move |_| {
            rain.tick(&mut surface);
            ControlFlow::Continue(())
        });
        Ok(Self {
            task,
            _resize: resize,
        })
    }
}

impl<S: Scheduler + 'static> MountedCanvas<S> {
    /// Cancel the pending callback and remove the resize listener.
    pub fn unmount(self) {
        self.task.stop();
    }
}
