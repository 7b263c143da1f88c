//! Conversation core of the Caviaar Mode shopping-assistant widget.
//!
//! [`RequestDispatcher`] is the `Idle | Pending` machine that owns the
//! transcript and the session token; [`ChatWidget`] drives it over a
//! [`Transport`]; [`presentation`] turns messages into displayable blocks.

pub mod clock;
pub mod config;
pub mod errors;
pub mod ids;
pub mod models;
pub mod presentation;
pub mod service;
pub mod store;
pub mod transport;

pub use config::WidgetConfig;
pub use errors::{ConfigError, StoreError, TransportError};
pub use models::{ChatRequest, ChatResponse, Message, MessageRole, Product};
pub use service::{ChatWidget, DispatchState, RequestDispatcher, Settlement};
pub use transport::Transport;
