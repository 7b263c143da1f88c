use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures_util::future::{FutureExt, LocalBoxFuture};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::errors::TransportError;
use crate::ids::{IdGenerator, UuidGenerator};
use crate::models::{ChatResponse, Message};
use crate::service::dispatcher::{RequestDispatcher, Settlement, Ticket};
use crate::transport::Transport;

/// A reply in flight. Drive it to completion on the event loop; dropping it
/// early still settles the request (as a failure).
pub type InFlight = LocalBoxFuture<'static, Settlement>;

/// One mounted chat widget: a dispatcher plus the transport it talks through.
///
/// Dropping the widget is teardown. Replies still in flight afterwards settle
/// as [`Settlement::Detached`] and touch nothing.
pub struct ChatWidget<G = UuidGenerator, C = SystemClock> {
    dispatcher: Rc<RefCell<RequestDispatcher<G, C>>>,
    transport: Rc<dyn Transport>,
}

impl ChatWidget {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_dispatcher(RequestDispatcher::new(), transport)
    }
}

impl<G, C> ChatWidget<G, C>
where
    G: IdGenerator + 'static,
    C: Clock + 'static,
{
    pub fn with_dispatcher(
        dispatcher: RequestDispatcher<G, C>,
        transport: impl Transport + 'static,
    ) -> Self {
        Self {
            dispatcher: Rc::new(RefCell::new(dispatcher)),
            transport: Rc::new(transport),
        }
    }

    /// Commits the user message and returns the reply to drive, or `None`
    /// when the input is blank or a reply is already pending.
    pub fn send(&self, text: &str) -> Option<InFlight> {
        let query = self.dispatcher.borrow_mut().begin(text)?;
        let guard = SettleGuard {
            dispatcher: Some(Rc::downgrade(&self.dispatcher)),
            ticket: query.ticket,
        };
        let transport = Rc::clone(&self.transport);

        Some(
            async move {
                let outcome = transport.post_chat(query.request).await;
                guard.settle(outcome)
            }
            .boxed_local(),
        )
    }

    /// Sends and waits for the settlement. Rejected input yields `None`.
    pub async fn ask(&self, text: &str) -> Option<Settlement> {
        match self.send(text) {
            Some(reply) => Some(reply.await),
            None => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.dispatcher.borrow().is_pending()
    }

    pub fn session_token(&self) -> String {
        self.dispatcher.borrow().session().current().to_string()
    }

    /// Copy of the transcript. The dispatcher is never borrowed past a call,
    /// so an abandoned reply can always settle.
    pub fn snapshot(&self) -> Vec<Message> {
        self.dispatcher.borrow().snapshot().to_vec()
    }

    pub fn last_message(&self) -> Option<Message> {
        self.dispatcher.borrow().store().last().cloned()
    }

    pub fn quick_replies(&self) -> &'static [&'static str] {
        self.dispatcher.borrow().quick_replies()
    }
}

/// Holds a weak handle so a late settlement cannot keep a torn-down widget
/// alive, and settles on drop if the reply future was abandoned.
struct SettleGuard<G: IdGenerator, C: Clock> {
    dispatcher: Option<Weak<RefCell<RequestDispatcher<G, C>>>>,
    ticket: Ticket,
}

impl<G: IdGenerator, C: Clock> SettleGuard<G, C> {
    fn settle(mut self, outcome: Result<ChatResponse, TransportError>) -> Settlement {
        match self.dispatcher.take().and_then(|weak| weak.upgrade()) {
            Some(dispatcher) => {
                let mut dispatcher = dispatcher.borrow_mut();
                dispatcher.settle(self.ticket, outcome)
            }
            None => {
                debug!("Widget torn down before {:?} settled; dropping reply", self.ticket);
                Settlement::Detached
            }
        }
    }
}

impl<G: IdGenerator, C: Clock> Drop for SettleGuard<G, C> {
    fn drop(&mut self) {
        let Some(dispatcher) = self.dispatcher.take().and_then(|weak| weak.upgrade()) else {
            return;
        };
        // Abandoned mid-flight. No borrow of the dispatcher escapes a
        // `ChatWidget` method, so this cannot collide with a reader.
        warn!("Reply for {:?} dropped before it settled", self.ticket);
        dispatcher.borrow_mut().settle(self.ticket, Err(TransportError::Abandoned));
    }
}
