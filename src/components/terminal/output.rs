use leptos::prelude::*;

stylance::import_crate_style!(css, "src/components/terminal/output.module.css");

/// One transcript line. Blank lines keep their height; tabs are preserved.
#[component]
pub fn Output(line: String) -> impl IntoView {
    if line.trim().is_empty() {
        view! { <div class=css::lineEmpty></div> }.into_any()
    } else {
        view! { <div class=css::line>{line}</div> }.into_any()
    }
}
