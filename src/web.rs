//! Browser bindings: DOM-backed capabilities and a `wasm-bindgen`
//! wrapper around the [`Choreographer`].
//!
//! The host page keeps its own router and rendering; it forwards intents
//! to [`WebChoreographer`], calls `tick()` from `requestAnimationFrame`
//! and draws overlays from the JSON returned by `frame()`.

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, History, HtmlElement, ScrollBehavior, ScrollToOptions, Window,
};
use web_time::Instant;

use crate::engine::{AnimationTarget, Choreographer, Command};
use crate::error::SegueError;
use crate::geometry::{Rect, Viewport};
use crate::host::{HistoryPort, Host, PageChrome, RectProvider, Router};
use crate::options::Options;
use crate::scroll::ScrollController;
use crate::shared_element::Direction;
use crate::split_reveal::{SplitPhase, SplitRequest};

/// Install the console logger and panic hook. Safe to call repeatedly.
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}

fn window() -> Result<Window, SegueError> {
    web_sys::window()
        .ok_or_else(|| SegueError::Navigation("no window".to_owned()))
}

fn js_error(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

/// Call `target[method](...args)` if `target` has such a function.
fn call_method(target: &JsValue, method: &str, args: &[JsValue]) -> bool {
    let Ok(f) = Reflect::get(target, &JsValue::from_str(method)) else {
        return false;
    };
    let Ok(f) = f.dyn_into::<Function>() else {
        return false;
    };
    let result = match args {
        [] => f.call0(target),
        [a] => f.call1(target, a),
        [a, b, ..] => f.call2(target, a, b),
    };
    if let Err(e) = result {
        log::warn!("{method}() failed: {}", js_error(&e));
    }
    true
}

/// The page's smooth-scroll engine at `window.lenis`, falling back to
/// native window scrolling when it is absent.
pub struct LenisScroll {
    window: Window,
}

impl LenisScroll {
    /// Bind to the current window.
    pub fn new() -> Result<Self, SegueError> {
        Ok(Self { window: window()? })
    }

    fn lenis(&self) -> Option<JsValue> {
        Reflect::get(&self.window, &JsValue::from_str("lenis"))
            .ok()
            .filter(|v| v.is_object())
    }
}

impl ScrollController for LenisScroll {
    fn suspend(&mut self) {
        if let Some(lenis) = self.lenis() {
            let _ = call_method(&lenis, "stop", &[]);
        }
    }

    fn resume(&mut self) {
        if let Some(lenis) = self.lenis() {
            let _ = call_method(&lenis, "start", &[]);
        }
    }

    fn scroll_to(&mut self, y: f32, immediate: bool) {
        if let Some(lenis) = self.lenis() {
            let options = Object::new();
            let _ = Reflect::set(
                &options,
                &JsValue::from_str("immediate"),
                &JsValue::from_bool(immediate),
            );
            let args = [JsValue::from_f64(f64::from(y)), options.into()];
            if call_method(&lenis, "scrollTo", &args) {
                return;
            }
        }
        let options = ScrollToOptions::new();
        options.set_top(f64::from(y));
        options.set_behavior(if immediate {
            ScrollBehavior::Instant
        } else {
            ScrollBehavior::Smooth
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn scroll_y(&self) -> f32 {
        self.window.scroll_y().unwrap_or(0.0) as f32
    }
}

/// Thumbnail measurement through `[data-gallery-image]` elements.
pub struct DomRects {
    window: Window,
    document: Document,
}

impl DomRects {
    /// Bind to the current document.
    pub fn new() -> Result<Self, SegueError> {
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| SegueError::Navigation("no document".to_owned()))?;
        Ok(Self { window, document })
    }
}

impl RectProvider for DomRects {
    fn thumbnail_rect(&self, slug: &str) -> Option<Rect> {
        let selector =
            format!(r#"[data-gallery-image][data-project-slug="{slug}"]"#);
        let container = self.document.query_selector(&selector).ok()??;
        // The rendered image, not its cropping container.
        let element = container
            .query_selector("img")
            .ok()
            .flatten()
            .unwrap_or(container);
        let r = element.get_bounding_client_rect();
        Some(Rect::new(
            r.top() as f32,
            r.left() as f32,
            r.width() as f32,
            r.height() as f32,
        ))
    }

    fn viewport(&self) -> Viewport {
        let dim = |v: Result<JsValue, JsValue>| {
            v.ok().and_then(|v| v.as_f64()).map(|v| v as f32)
        };
        match (dim(self.window.inner_width()), dim(self.window.inner_height())) {
            (Some(width), Some(height)) => Viewport::new(width, height),
            _ => Viewport::default(),
        }
    }
}

/// `window.history`.
pub struct BrowserHistory {
    history: History,
}

impl BrowserHistory {
    /// Bind to the current window's history.
    pub fn new() -> Result<Self, SegueError> {
        let history = window()?
            .history()
            .map_err(|e| SegueError::Navigation(js_error(&e)))?;
        Ok(Self { history })
    }
}

impl HistoryPort for BrowserHistory {
    fn push_state(&mut self, url: &str) {
        if let Err(e) =
            self.history.push_state_with_url(&JsValue::NULL, "", Some(url))
        {
            log::warn!("pushState({url}) failed: {}", js_error(&e));
        }
    }
}

/// The site `<nav>` and the document body.
pub struct DomChrome {
    document: Document,
}

impl DomChrome {
    /// Bind to the current document.
    pub fn new() -> Result<Self, SegueError> {
        let document = window()?
            .document()
            .ok_or_else(|| SegueError::Navigation("no document".to_owned()))?;
        Ok(Self { document })
    }

    fn nav(&self) -> Option<HtmlElement> {
        self.document
            .query_selector("nav")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }
}

impl PageChrome for DomChrome {
    fn set_nav_opacity(&mut self, opacity: f32) {
        if let Some(nav) = self.nav() {
            let _ = nav.style().set_property("opacity", &opacity.to_string());
        }
    }

    fn set_body_scroll_locked(&mut self, locked: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        let style = body.style();
        let _ = if locked {
            style.set_property("overflow", "hidden")
        } else {
            style.remove_property("overflow").map(drop)
        };
    }
}

/// Routes through a JavaScript callback, typically the framework
/// router's `push`.
pub struct JsRouter {
    push: Function,
}

impl JsRouter {
    /// Router calling `push(href)`.
    #[must_use]
    pub fn new(push: Function) -> Self {
        Self { push }
    }
}

impl Router for JsRouter {
    fn push(&mut self, href: &str) -> Result<(), SegueError> {
        self.push
            .call1(&JsValue::NULL, &JsValue::from_str(href))
            .map(drop)
            .map_err(|e| SegueError::Navigation(js_error(&e)))
    }
}

fn to_js(e: &SegueError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// The choreographer, exported to JavaScript.
#[wasm_bindgen]
pub struct WebChoreographer {
    inner: Choreographer,
}

impl WebChoreographer {
    fn run(&mut self, command: Command) -> bool {
        self.inner.execute(command, Instant::now()).is_accepted()
    }
}

#[wasm_bindgen]
impl WebChoreographer {
    /// Engine bound to the current page. `options_toml` may be empty.
    #[wasm_bindgen(constructor)]
    pub fn new(
        route: &str,
        router_push: Function,
        options_toml: &str,
    ) -> Result<Self, JsValue> {
        init_logging();
        let options = if options_toml.trim().is_empty() {
            Options::default()
        } else {
            Options::from_toml(options_toml).map_err(|e| to_js(&e))?
        };
        let host = Host::new(
            JsRouter::new(router_push),
            BrowserHistory::new().map_err(|e| to_js(&e))?,
            DomChrome::new().map_err(|e| to_js(&e))?,
            DomRects::new().map_err(|e| to_js(&e))?,
        );
        let scroll = LenisScroll::new().map_err(|e| to_js(&e))?;
        Ok(Self {
            inner: Choreographer::new(options, host, scroll, route),
        })
    }

    /// Plain navigation link.
    pub fn navigate(&mut self, href: &str) -> bool {
        self.run(Command::navigate(href))
    }

    /// Router reports the rendered pathname.
    #[wasm_bindgen(js_name = routeChanged)]
    pub fn route_changed(&mut self, pathname: &str) -> bool {
        self.run(Command::route_changed(pathname))
    }

    /// Split-reveal trigger clicked; `center_y` is the clicked element's
    /// vertical center.
    #[wasm_bindgen(js_name = startSplit)]
    pub fn start_split(
        &mut self,
        center_y: f32,
        route: &str,
        category: &str,
    ) -> bool {
        let scroll_position = self.inner.scroll().scroll_y();
        self.run(Command::StartSplit(SplitRequest {
            split_y: center_y,
            target_route: route.to_owned(),
            target_category: category.to_owned(),
            scroll_position,
            direction: Direction::Forward,
        }))
    }

    /// The page's exit visuals finished; close the cover.
    #[wasm_bindgen(js_name = beginCover)]
    pub fn begin_cover(&mut self) -> bool {
        self.run(Command::SetSplitPhase(SplitPhase::Covering))
    }

    /// Thumbnail click leading to a detail route.
    #[wasm_bindgen(js_name = selectProject)]
    pub fn select_project(
        &mut self,
        slug: &str,
        image: &str,
        href: &str,
    ) -> bool {
        self.run(Command::SelectProject {
            slug: slug.to_owned(),
            image: image.to_owned(),
            href: href.to_owned(),
        })
    }

    /// Detail page mounted.
    #[wasm_bindgen(js_name = mountDetail)]
    pub fn mount_detail(&mut self, slug: &str) -> bool {
        self.run(Command::MountDetail {
            slug: slug.to_owned(),
        })
    }

    /// Back link on a detail page.
    #[wasm_bindgen(js_name = detailBack)]
    pub fn detail_back(&mut self, slug: &str, href: &str) -> bool {
        self.run(Command::DetailBack {
            slug: slug.to_owned(),
            href: href.to_owned(),
        })
    }

    /// Gallery mounted with `location.search`.
    #[wasm_bindgen(js_name = mountGallery)]
    pub fn mount_gallery(&mut self, query: &str) -> bool {
        self.run(Command::MountGallery {
            query: query.to_owned(),
        })
    }

    /// Thumbnail click opening the modal.
    #[wasm_bindgen(js_name = openModal)]
    pub fn open_modal(&mut self, slug: &str) -> bool {
        self.run(Command::OpenModal {
            slug: slug.to_owned(),
        })
    }

    /// Close button.
    #[wasm_bindgen(js_name = closeModal)]
    pub fn close_modal(&mut self) -> bool {
        self.run(Command::CloseModal)
    }

    /// `popstate`. Returns whether the event was consumed by the modal.
    #[wasm_bindgen(js_name = popState)]
    pub fn pop_state(&mut self) -> bool {
        self.run(Command::PopState)
    }

    /// An overlay finished animating (`"modal"` or `"detail"`).
    #[wasm_bindgen(js_name = animationComplete)]
    pub fn animation_complete(&mut self, target: &str) -> bool {
        let target = match target {
            "modal" => AnimationTarget::Modal,
            "detail" => AnimationTarget::Detail,
            other => {
                log::warn!("unknown animation target {other}");
                return false;
            }
        };
        self.run(Command::AnimationComplete(target))
    }

    /// Advance timed phases. Call once per animation frame.
    pub fn tick(&mut self) {
        self.inner.tick(Instant::now());
    }

    /// Overlay snapshot as JSON.
    pub fn frame(&self) -> Result<String, JsValue> {
        self.inner
            .frame(Instant::now())
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
