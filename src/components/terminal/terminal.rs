//! Terminal view component.
//!
//! The transcript and the prompt line. Every submission goes through
//! [`AppContext::submit`]; input stays disabled until it settles.

use leptos::prelude::*;

use crate::app::AppContext;
use crate::components::terminal::{Input, Output};
use crate::config::APP_NAME;
use crate::utils::dom::focus_terminal_input;

stylance::import_crate_style!(css, "src/components/terminal/terminal.module.css");

#[component]
pub fn Terminal() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");
    let output_ref = NodeRef::<leptos::html::Div>::new();

    let prompt = Signal::derive(move || ctx.terminal.prompt.get());
    let busy = Signal::derive(move || ctx.terminal.busy.get());
    let on_submit = Callback::new(move |input: String| ctx.submit(input));
    let on_history_nav =
        Callback::new(move |direction: i32| ctx.terminal.navigate_history(direction));

    // Keep the newest line in view
    Effect::new(move || {
        ctx.terminal.lines.track();
        if let Some(output) = output_ref.get() {
            output.set_scroll_top(output.scroll_height());
        }
    });

    view! {
        <div class=css::container on:click=move |_| focus_terminal_input()>
            <div class=css::title>{APP_NAME}</div>
            <div node_ref=output_ref class=css::output>
                <For
                    each=move || ctx.terminal.lines.get().into_iter().enumerate()
                    key=|(index, line)| (*index, line.clone())
                    children=|(_, line)| view! { <Output line=line /> }
                />
            </div>
            <div class=css::inputArea>
                <Input prompt=prompt busy=busy on_submit=on_submit on_history_nav=on_history_nav />
            </div>
        </div>
    }
}
