#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use caviaar_chat::clock::Clock;
use caviaar_chat::ids::IdGenerator;
use caviaar_chat::service::{ChatWidget, RequestDispatcher};
use caviaar_chat::{ChatRequest, ChatResponse, Product, Transport, TransportError};
use chrono::{DateTime, TimeZone, Utc};
use futures_util::future::{FutureExt, LocalBoxFuture};
use tokio::sync::oneshot;

pub struct SequentialIds(Cell<u32>);

impl SequentialIds {
    pub fn new() -> Self {
        Self(Cell::new(0))
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        self.0.set(self.0.get() + 1);
        format!("id-{}", self.0.get())
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 20, 12, 0, 0).unwrap()
}

pub type Outcome = Result<ChatResponse, TransportError>;

pub enum Scripted {
    Now(Outcome),
    Later(oneshot::Receiver<Outcome>),
}

pub type RequestLog = Rc<RefCell<Vec<ChatRequest>>>;

/// Answers from a queue and records every request it was asked to send.
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Scripted>>,
    log: RequestLog,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Scripted>) -> (Self, RequestLog) {
        let log = RequestLog::default();
        let transport = Self {
            replies: RefCell::new(replies.into_iter().collect()),
            log: Rc::clone(&log),
        };
        (transport, log)
    }

    pub fn answering(outcomes: impl IntoIterator<Item = Outcome>) -> (Self, RequestLog) {
        Self::new(outcomes.into_iter().map(Scripted::Now))
    }
}

impl Transport for ScriptedTransport {
    fn post_chat(&self, request: ChatRequest) -> LocalBoxFuture<'_, Outcome> {
        self.log.borrow_mut().push(request);
        let next = self.replies.borrow_mut().pop_front();
        match next {
            Some(Scripted::Now(outcome)) => async move { outcome }.boxed_local(),
            Some(Scripted::Later(rx)) => async move {
                rx.await
                    .unwrap_or_else(|_| Err(TransportError::network("gate dropped")))
            }
            .boxed_local(),
            None => async { Err(TransportError::network("no scripted reply")) }.boxed_local(),
        }
    }
}

pub type TestWidget = ChatWidget<SequentialIds, FixedClock>;

pub fn widget(transport: impl Transport + 'static) -> TestWidget {
    let dispatcher = RequestDispatcher::with_sources(SequentialIds::new(), FixedClock(noon()));
    ChatWidget::with_dispatcher(dispatcher, transport)
}

pub fn reply(text: &str) -> Outcome {
    Ok(ChatResponse::text(text))
}

pub fn shirt(id: u64, name: &str, price: f64) -> Product {
    Product {
        id,
        name: name.to_string(),
        price,
        currency: "INR".to_string(),
        image_url: format!("https://caviaarmode.com/images/{id}.jpg"),
        url: format!("https://caviaarmode.com/products/{id}"),
        category: "shirts".to_string(),
    }
}
