use tracing::{debug, error, warn};

use crate::clock::{Clock, SystemClock};
use crate::errors::{StoreError, TransportError};
use crate::ids::{IdGenerator, UuidGenerator};
use crate::models::{ChatRequest, ChatResponse, Message};
use crate::store::{ConversationStore, SessionIdentity};

pub const GREETING: &str = "👋 Hi! I'm your Caviaar Mode assistant. I can help you with orders, \
                            returns, payments, and product questions. How can I assist you today?";

pub const FALLBACK_REPLY: &str = "I'm having trouble connecting right now. \
                                  Please try again in a moment or contact support.";

pub const QUICK_REPLIES: [&str; 6] = [
    "Size guide",
    "Return policy",
    "Payment methods",
    "Suggest shirts",
    "Current offers",
    "Shipping info",
];

/// Identifies one trip through `Pending`. A settlement only applies to the
/// ticket that is currently outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Pending { ticket: Ticket, user_message_id: String },
}

/// What [`RequestDispatcher::begin`] hands to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundQuery {
    pub ticket: Ticket,
    pub request: ChatRequest,
}

/// How a pending request was folded back into the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// The backend's reply was appended.
    Answered { message_id: String },
    /// The fallback apology was appended.
    Fallback { message_id: String, error: TransportError },
    /// Nothing was appended: the widget is gone or the ticket is stale.
    Detached,
}

/// The `Idle | Pending` machine that owns the transcript and the session
/// token. It never awaits anything; callers run the network call between
/// [`begin`](Self::begin) and [`settle`](Self::settle).
#[derive(Debug, Clone)]
pub struct RequestDispatcher<G = UuidGenerator, C = SystemClock> {
    state: DispatchState,
    store: ConversationStore,
    session: SessionIdentity,
    next_ticket: u64,
    ids: G,
    clock: C,
}

impl RequestDispatcher {
    pub fn new() -> Self {
        Self::with_sources(UuidGenerator, SystemClock)
    }
}

impl Default for RequestDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: IdGenerator, C: Clock> RequestDispatcher<G, C> {
    /// Mounts a widget instance: initialises the session token and seeds the
    /// transcript with the greeting.
    pub fn with_sources(ids: G, clock: C) -> Self {
        let mut session = SessionIdentity::new();
        session.initialize(&ids);
        let greeting = Message::assistant(ids.next_id(), GREETING.to_string(), clock.now(), vec![]);

        Self {
            state: DispatchState::Idle,
            store: ConversationStore::seed(greeting),
            session,
            next_ticket: 0,
            ids,
            clock,
        }
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DispatchState::Pending { .. })
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn snapshot(&self) -> &[Message] {
        self.store.snapshot()
    }

    pub fn session(&self) -> &SessionIdentity {
        &self.session
    }

    pub fn quick_replies(&self) -> &'static [&'static str] {
        &QUICK_REPLIES
    }

    /// `Idle --send(text)--> Pending`.
    ///
    /// Returns `None` without touching anything when the trimmed text is empty
    /// or a request is already outstanding. Otherwise the user message is in
    /// the transcript before the query is returned.
    pub fn begin(&mut self, text: &str) -> Option<OutboundQuery> {
        let query = text.trim();
        if query.is_empty() {
            debug!("Ignoring blank input");
            return None;
        }
        if self.is_pending() {
            debug!("Ignoring input while a reply is pending");
            return None;
        }

        let message = Message::user(self.ids.next_id(), query.to_string(), self.clock.now());
        let user_message_id = message.id.clone();
        if let Err(e) = self.store.append(message) {
            invariant_violated(&e);
            return None;
        }

        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.state = DispatchState::Pending { ticket, user_message_id };
        debug!("Dispatching {ticket:?} for session {}", self.session.current());

        Some(OutboundQuery {
            ticket,
            request: ChatRequest {
                query: query.to_string(),
                session_id: self.session.current().to_string(),
            },
        })
    }

    /// `Pending --settle--> Idle`, appending exactly one assistant message.
    pub fn settle(
        &mut self,
        ticket: Ticket,
        outcome: Result<ChatResponse, TransportError>,
    ) -> Settlement {
        let user_message_id = match &self.state {
            DispatchState::Pending { ticket: current, user_message_id } if *current == ticket => {
                user_message_id.clone()
            }
            _ => {
                warn!("Dropping settlement for {ticket:?}: it is not the outstanding request");
                return Settlement::Detached;
            }
        };

        let settlement = match outcome.and_then(validate) {
            Ok(response) => {
                debug!("Reply to message {user_message_id} received");
                let (content, session_id, products) = response.into_parts();
                if let Some(token) = session_id {
                    self.session.adopt(&token);
                }
                let message =
                    Message::assistant(self.ids.next_id(), content, self.clock.now(), products);
                let message_id = message.id.clone();
                if self.commit(message) {
                    Settlement::Answered { message_id }
                } else {
                    Settlement::Detached
                }
            }
            Err(error) => {
                warn!("Reply to message {user_message_id} failed: {error}");
                let message = Message::assistant(
                    self.ids.next_id(),
                    FALLBACK_REPLY.to_string(),
                    self.clock.now(),
                    vec![],
                );
                let message_id = message.id.clone();
                if self.commit(message) {
                    Settlement::Fallback { message_id, error }
                } else {
                    Settlement::Detached
                }
            }
        };

        self.state = DispatchState::Idle;
        settlement
    }

    fn commit(&mut self, message: Message) -> bool {
        match self.store.append(message) {
            Ok(()) => true,
            Err(e) => {
                invariant_violated(&e);
                false
            }
        }
    }
}

fn validate(response: ChatResponse) -> Result<ChatResponse, TransportError> {
    let invalid = response
        .suggested_products
        .iter()
        .flatten()
        .find(|p| !p.has_valid_price())
        .map(|p| format!("product {} has invalid price {}", p.id, p.price));
    match invalid {
        Some(message) => Err(TransportError::Malformed { message }),
        None => Ok(response),
    }
}

/// Duplicate ids mean the id source is broken: loud in debug builds, logged
/// in release builds.
fn invariant_violated(err: &StoreError) {
    error!("Conversation invariant violated: {err}");
    if cfg!(debug_assertions) {
        panic!("{err}");
    }
}
