pub mod dispatcher;
pub mod widget;

pub use dispatcher::{
    DispatchState, OutboundQuery, RequestDispatcher, Settlement, Ticket, FALLBACK_REPLY, GREETING,
    QUICK_REPLIES,
};
pub use widget::{ChatWidget, InFlight};
