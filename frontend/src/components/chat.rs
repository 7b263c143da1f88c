use caviaar_chat::service::QUICK_REPLIES;
use leptos::ev;
use leptos::html::Div;
use leptos::prelude::*;

use crate::api::STOREFRONT_URL;
use crate::components::message::MessageBubble;
use crate::state::WidgetState;

/// The open chat window: header, transcript, quick replies, input.
#[component]
pub fn ChatWindow() -> impl IntoView {
    let state = expect_context::<WidgetState>();

    view! {
        <div class="chat-window" class:minimized=move || state.is_minimized.get()>
            <ChatHeader />
            <Show when=move || !state.is_minimized.get()>
                <MessageList />
                <QuickReplies />
                <ChatInput />
                <div class="chat-footer">
                    <span>"Powered by Caviaar Mode AI"</span>
                    <a href=STOREFRONT_URL target="_blank" rel="noopener noreferrer">
                        "Visit Store ↗"
                    </a>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn ChatHeader() -> impl IntoView {
    let state = expect_context::<WidgetState>();

    view! {
        <div class="chat-header">
            <div class="brand">
                <span class="avatar">"CM"</span>
                <div>
                    <h3>"Caviaar Mode"</h3>
                    <p>"AI Assistant"</p>
                </div>
            </div>
            <div class="header-actions">
                <button on:click=move |_| state.is_minimized.update(|m| *m = !*m)>
                    {move || if state.is_minimized.get() { "▢" } else { "–" }}
                </button>
                <button on:click=move |_| state.is_open.set(false)>"✕"</button>
            </div>
        </div>
    }
}

/// Transcript plus the typing indicator; follows the newest message.
#[component]
fn MessageList() -> impl IntoView {
    let state = expect_context::<WidgetState>();
    let end_ref = NodeRef::<Div>::new();

    Effect::new(move |_| {
        state.message_count();
        if let Some(end) = end_ref.get() {
            end.scroll_into_view();
        }
    });

    view! {
        <div class="messages-container">
            <For
                each=move || state.messages()
                key=|m| m.id.clone()
                let:msg
            >
                <MessageBubble message=msg />
            </For>
            <Show when=move || state.is_pending()>
                <div class="message assistant">
                    <div class="bubble typing">"Typing..."</div>
                </div>
            </Show>
            <div node_ref=end_ref></div>
        </div>
    }
}

/// Canned prompts; clicking one fills the input box.
#[component]
fn QuickReplies() -> impl IntoView {
    let state = expect_context::<WidgetState>();

    view! {
        <div class="quick-replies">
            {QUICK_REPLIES
                .iter()
                .map(|reply| {
                    view! {
                        <button
                            class="quick-reply"
                            disabled=move || state.is_pending()
                            on:click=move |_| state.input.set(reply.to_string())
                        >
                            {*reply}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// Chat input form with text field and send button.
#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<WidgetState>();
    let is_sending = move || state.is_pending();

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Enter" {
            ev.prevent_default();
            state.submit();
        }
    };

    view! {
        <div class="input-area">
            <input
                type="text"
                placeholder="Type your message..."
                prop:value=move || state.input.get()
                on:input=move |ev| state.input.set(event_target_value(&ev))
                on:keydown=on_keydown
                disabled=is_sending
            />
            <button
                class="send-btn"
                on:click=move |_| state.submit()
                disabled=move || is_sending() || state.input.get().trim().is_empty()
            >
                {move || if is_sending() { "…" } else { "Send" }}
            </button>
        </div>
    }
}
