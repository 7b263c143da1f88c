use leptos::prelude::*;

use crate::state::WidgetState;

/// Floating button shown while the chat window is closed.
#[component]
pub fn Launcher() -> impl IntoView {
    let state = expect_context::<WidgetState>();

    view! {
        <button
            class="chat-launcher"
            aria-label="Open chat"
            on:click=move |_| state.is_open.set(true)
        >
            "💬"
        </button>
    }
}
