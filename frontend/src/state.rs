use caviaar_chat::presentation::LinkPolicy;
use caviaar_chat::{Message, RequestDispatcher, Transport};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{GlooTransport, STOREFRONT_DOMAIN};

/// Widget state, provided via Leptos context.
///
/// The dispatcher lives in a signal owned by the widget's reactive scope.
/// When the widget unmounts the signal is disposed, and a reply arriving
/// afterwards finds nothing to update.
#[derive(Clone, Copy)]
pub struct WidgetState {
    pub dispatcher: RwSignal<RequestDispatcher>,
    pub input: RwSignal<String>,
    pub is_open: RwSignal<bool>,
    pub is_minimized: RwSignal<bool>,
    pub link_policy: StoredValue<LinkPolicy>,
}

impl WidgetState {
    /// Mount: fresh session token and greeting.
    pub fn provide() -> Self {
        let state = Self {
            dispatcher: RwSignal::new(RequestDispatcher::new()),
            input: RwSignal::new(String::new()),
            is_open: RwSignal::new(true),
            is_minimized: RwSignal::new(false),
            link_policy: StoredValue::new(LinkPolicy::new(STOREFRONT_DOMAIN)),
        };
        provide_context(state);
        state
    }

    pub fn messages(&self) -> Vec<Message> {
        self.dispatcher.with(|d| d.snapshot().to_vec())
    }

    pub fn message_count(&self) -> usize {
        self.dispatcher.with(|d| d.snapshot().len())
    }

    pub fn is_pending(&self) -> bool {
        self.dispatcher.with(|d| d.is_pending())
    }

    /// Submits the input box. Blank input or a pending reply make this a no-op.
    pub fn submit(&self) {
        let text = self.input.get_untracked();
        if text.trim().is_empty() || self.dispatcher.with_untracked(|d| d.is_pending()) {
            return;
        }
        let Some(query) = self.dispatcher.try_update(|d| d.begin(&text)).flatten() else {
            return;
        };
        self.input.set(String::new());

        let dispatcher = self.dispatcher;
        spawn_local(async move {
            let outcome = GlooTransport.post_chat(query.request).await;
            if let Err(e) = &outcome {
                log::error!("Chat error: {e}");
            }
            let settled = dispatcher.try_update(|d| d.settle(query.ticket, outcome));
            if settled.is_none() {
                log::debug!("Widget unmounted before the reply arrived");
            }
        });
    }
}
