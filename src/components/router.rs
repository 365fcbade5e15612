//! Application router component.
//!
//! The URL hash is the source of truth. Commands that open another view
//! (`edit`, `mem_view`) change the hash; a `hashchange` listener feeds it
//! back into the route signal, so browser back/forward work as well.

use leptos::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::Closure;

use crate::app::AppContext;
use crate::components::external::ExternalView;
use crate::components::terminal::Terminal;
use crate::models::AppRoute;
use crate::utils::dom::focus_terminal_input;

/// Main application router.
///
/// - `#/` → Terminal
/// - `#/editor/<id>` → Editor hand-off
/// - `#/memory` → Memory viewer hand-off
#[component]
pub fn AppRouter() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");
    let route = ctx.route;

    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        let closure = Closure::wrap(Box::new(move || {
            route.set(AppRoute::current());
        }) as Box<dyn Fn()>);

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
        }

        // Keep the closure alive for the lifetime of the app
        closure.forget();
    }

    // Focus terminal input when returning from another view
    Effect::new(move |was_away: Option<bool>| {
        let away = route.get() != AppRoute::Terminal;
        if was_away == Some(true) && !away {
            focus_terminal_input();
        }
        away
    });

    view! {
        <Show
            when=move || route.get() == AppRoute::Terminal
            fallback=move || view! { <ExternalView route=route /> }
        >
            <Terminal />
        </Show>
    }
}
