//! Placeholder for views served outside the terminal.

use leptos::prelude::*;

use crate::models::AppRoute;

stylance::import_crate_style!(css, "src/components/external.module.css");

/// Shows which external view was requested, with a way back.
#[component]
pub fn ExternalView(route: RwSignal<AppRoute>) -> impl IntoView {
    let title = move || match route.get() {
        AppRoute::Editor(id) => format!("Editor: file {}", id),
        AppRoute::Memory => "Memory viewer".to_string(),
        AppRoute::Terminal => String::new(),
    };

    view! {
        <div class=css::panel>
            <h2 class=css::title>{title}</h2>
            <p class=css::hint>"This view is provided by the host application."</p>
            <button class=css::back on:click=move |_| AppRoute::Terminal.push()>
                "Back to terminal"
            </button>
        </div>
    }
}
