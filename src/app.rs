//! Root application module.
//!
//! Contains the main App component, AppContext definition, TerminalState,
//! and the glue that drives the interpreter session from the UI.

use leptos::prelude::*;
use vosh_core::config::{
    API_BASE_STORAGE_KEY, DEFAULT_API_BASE, GatewayConfig, TOKEN_STORAGE_KEY, USER_STORAGE_KEY,
};
use vosh_core::{HttpGateway, Shell};

use crate::components::AppRouter;
use crate::config::MAX_COMMAND_HISTORY;
use crate::models::AppRoute;
use crate::utils::dom;

/// Interpreter session type used by the browser shell.
pub type Session = Shell<HttpGateway>;

// ============================================================================
// TerminalState
// ============================================================================

/// Terminal state managed with Leptos signals.
///
/// Mirrors the session's transcript and prompt after every submission and
/// tracks whether a submission is still in flight.
#[derive(Clone, Copy)]
pub struct TerminalState {
    /// Transcript lines, oldest first.
    pub lines: RwSignal<Vec<String>>,
    pub prompt: RwSignal<String>,
    /// A submission is awaiting the backend; input is blocked.
    pub busy: RwSignal<bool>,
    /// Command history for up/down navigation.
    pub command_history: RwSignal<Vec<String>>,
    /// Current position in command history (for navigation).
    pub history_index: RwSignal<Option<usize>>,
}

impl TerminalState {
    pub fn new() -> Self {
        Self {
            lines: RwSignal::new(Vec::new()),
            prompt: RwSignal::new(String::new()),
            busy: RwSignal::new(true),
            command_history: RwSignal::new(Vec::new()),
            history_index: RwSignal::new(None),
        }
    }

    /// Copy transcript and prompt out of the session.
    pub fn sync(&self, session: &Session) {
        self.lines.set(session.transcript().lines().to_vec());
        self.prompt.set(session.prompt());
    }

    pub fn add_to_command_history(&self, cmd: &str) {
        if !cmd.trim().is_empty() {
            self.command_history.update(|h| {
                if h.last().map(|s| s.as_str()) != Some(cmd) {
                    h.push(cmd.to_string());
                    if h.len() > MAX_COMMAND_HISTORY {
                        h.remove(0);
                    }
                }
            });
        }
        self.history_index.set(None);
    }

    pub fn navigate_history(&self, direction: i32) -> Option<String> {
        let history = self.command_history.get();
        if history.is_empty() {
            return None;
        }

        let current_index = self.history_index.get();
        let new_index = match current_index {
            None if direction < 0 => Some(history.len() - 1),
            Some(i) if direction < 0 && i > 0 => Some(i - 1),
            Some(i) if direction > 0 && i < history.len() - 1 => Some(i + 1),
            Some(_) if direction > 0 => None,
            _ => current_index,
        };

        self.history_index.set(new_index);
        new_index.map(|i| history[i].clone())
    }
}

impl Default for TerminalState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// The session itself is not reactive: it is moved out of its slot for the
/// duration of one submission and put back afterwards, so a second line can
/// never start while the first is awaiting the backend.
#[derive(Clone, Copy)]
pub struct AppContext {
    pub terminal: TerminalState,
    pub route: RwSignal<AppRoute>,
    session: StoredValue<Option<Session>, LocalStorage>,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            terminal: TerminalState::new(),
            route: RwSignal::new(AppRoute::current()),
            session: StoredValue::new_local(Some(new_session())),
        }
    }

    /// Load the working directory listing and show the welcome banner.
    pub fn boot(&self) {
        let ctx = *self;
        let Some(mut session) = ctx.take_session() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            session.start().await;
            ctx.finish(session);
        });
    }

    /// Submit one line to the interpreter.
    ///
    /// Ignored while a previous submission is still running.
    pub fn submit(&self, input: String) {
        let ctx = *self;
        let Some(mut session) = ctx.take_session() else {
            log::debug!("submission dropped while busy");
            return;
        };
        if !session.mode().is_capturing() {
            ctx.terminal.add_to_command_history(input.trim());
        }

        wasm_bindgen_futures::spawn_local(async move {
            let navigation = session.submit(&input).await;
            ctx.finish(session);
            if let Some(nav) = navigation {
                AppRoute::from(nav).push();
            }
        });
    }

    fn take_session(&self) -> Option<Session> {
        let mut taken = None;
        self.session.update_value(|slot| taken = slot.take());
        if taken.is_some() {
            self.terminal.busy.set(true);
        }
        taken
    }

    fn finish(&self, session: Session) {
        self.terminal.sync(&session);
        self.session.set_value(Some(session));
        self.terminal.busy.set(false);
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a session from the credentials stored by the login screen.
fn new_session() -> Session {
    let base_url =
        dom::stored_item(API_BASE_STORAGE_KEY).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let token = dom::stored_item(TOKEN_STORAGE_KEY);
    if token.is_none() {
        log::warn!("no bearer token in localStorage; backend calls will be rejected");
    }

    let gateway = HttpGateway::new(GatewayConfig::new(base_url, token));
    let session = Shell::new(gateway, |message: &str| dom::confirm(message));
    match dom::stored_item(USER_STORAGE_KEY) {
        Some(user) => session.with_user(user),
        None => session,
    }
}

/// Root application component with error boundary.
///
/// This component:
/// - Creates and provides the global AppContext
/// - Starts the interpreter session
/// - Wraps the app in an ErrorBoundary for graceful error handling
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);
    ctx.boot();

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div style="
                    display: flex;
                    flex-direction: column;
                    align-items: center;
                    justify-content: center;
                    height: 100vh;
                    padding: 2rem;
                    background: #0a0a0f;
                    color: #00ff9f;
                    font-family: monospace;
                ">
                    <h1>"Something went wrong"</h1>
                    <ul>
                        {move || errors.get()
                            .into_iter()
                            .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                            .collect::<Vec<_>>()
                        }
                    </ul>
                    <button on:click=move |_| {
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().reload();
                        }
                    }>
                        "Reload Page"
                    </button>
                </div>
            }
        >
            <AppRouter />
        </ErrorBoundary>
    }
}
