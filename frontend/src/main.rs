mod api;
mod components;
mod state;

use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::chat::ChatWindow;
use components::launcher::Launcher;
use state::WidgetState;

/// Root widget component.
#[component]
fn App() -> impl IntoView {
    let state = WidgetState::provide();

    view! {
        <div class="chat-widget">
            <Show when=move || state.is_open.get() fallback=|| view! { <Launcher /> }>
                <ChatWindow />
            </Show>
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
