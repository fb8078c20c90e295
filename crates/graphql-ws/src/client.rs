//! Subscription driver
//!
//! Socket callbacks and cancellation requests are funnelled into a single
//! channel so the driver can run as one `spawn_local` task. Every socket
//! gets a generation number; events from an older socket are ignored.

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::{self, Either};
use futures::StreamExt;
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use crate::backoff::ReconnectPolicy;
use crate::protocol::{ClientMessage, GraphqlError, ServerMessage, SubscribePayload, SUBPROTOCOL};
use crate::SubscriptionError;

/// Id of the single operation carried by each socket
const OPERATION_ID: &str = "1";

/// Where and how to connect
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub url: String,
    /// Sent as the `connection_init` payload (typically auth)
    pub connection_params: Option<Value>,
    pub policy: ReconnectPolicy,
}

/// What the subscriber sees
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionEvent<T> {
    /// Server acknowledged the connection and the operation was sent
    Connected { reconnected: bool },
    Data(T),
    /// A `next` payload carried field errors
    Errors(Vec<GraphqlError>),
    Reconnecting { attempt: u32, delay_ms: u32 },
    /// Server finished the operation
    Completed,
    /// Terminal failure, no further events follow
    Failed(SubscriptionError),
}

/// Cancels the subscription. Dropping the handle does not.
#[derive(Debug, Clone)]
pub struct SubscriptionHandle {
    tx: UnboundedSender<Signal>,
}

impl SubscriptionHandle {
    pub fn cancel(&self) {
        let _ = self.tx.unbounded_send(Signal::Cancel);
    }
}

#[derive(Debug)]
enum Signal {
    Socket { generation: u32, event: SocketEvent },
    Cancel,
}

#[derive(Debug)]
enum SocketEvent {
    Open,
    Message(String),
    Closed { code: u16, reason: String },
    Error,
}

enum Outcome {
    /// Socket went away, retry per policy
    Dropped,
    Cancelled,
    Finished,
    Fatal(SubscriptionError),
}

/// Start a subscription; `on_event` runs on the browser event loop.
pub fn subscribe<T, F>(options: ConnectOptions, payload: SubscribePayload, on_event: F) -> SubscriptionHandle
where
    T: DeserializeOwned + 'static,
    F: Fn(SubscriptionEvent<T>) + 'static,
{
    let (tx, rx) = mpsc::unbounded();
    let handle = SubscriptionHandle { tx: tx.clone() };
    wasm_bindgen_futures::spawn_local(run(options, payload, tx, rx, on_event));
    handle
}

async fn run<T, F>(
    options: ConnectOptions,
    payload: SubscribePayload,
    tx: UnboundedSender<Signal>,
    mut rx: UnboundedReceiver<Signal>,
    on_event: F,
) where
    T: DeserializeOwned,
    F: Fn(SubscriptionEvent<T>),
{
    let mut generation = 0u32;
    let mut failures = 0u32;
    let mut connected_once = false;

    loop {
        generation += 1;
        let outcome = match Connection::open(&options.url, generation, &tx) {
            Ok(conn) => {
                let mut session = Session {
                    conn: &conn,
                    generation,
                    options: &options,
                    payload: &payload,
                    connected_once: &mut connected_once,
                    acked_at: None,
                    saw_data: false,
                };
                let outcome = session.drive(&mut rx, &on_event).await;
                let connected_for_ms = session.acked_at.map(|at| js_sys::Date::now() - at);
                if options.policy.resets_failures(session.saw_data, connected_for_ms) {
                    failures = 0;
                }
                outcome
            }
            Err(err) => {
                log::warn!("[WS] {}", err);
                Outcome::Dropped
            }
        };

        match outcome {
            Outcome::Cancelled | Outcome::Finished => return,
            Outcome::Fatal(err) => {
                on_event(SubscriptionEvent::Failed(err));
                return;
            }
            Outcome::Dropped => {}
        }

        failures += 1;
        let Some(delay_ms) = options.policy.delay_for(failures) else {
            on_event(SubscriptionEvent::Failed(SubscriptionError::Exhausted(failures - 1)));
            return;
        };
        log::info!("[WS] reconnect attempt {} in {}ms", failures, delay_ms);
        on_event(SubscriptionEvent::Reconnecting { attempt: failures, delay_ms });
        if wait_or_cancel(delay_ms, &mut rx).await {
            return;
        }
    }
}

/// Sleep for `delay_ms`; true if cancelled meanwhile
async fn wait_or_cancel(delay_ms: u32, rx: &mut UnboundedReceiver<Signal>) -> bool {
    let mut sleep = TimeoutFuture::new(delay_ms);
    loop {
        match future::select(&mut sleep, rx.next()).await {
            Either::Left(_) => return false,
            Either::Right((Some(Signal::Cancel), _)) | Either::Right((None, _)) => return true,
            // stale socket events from the dropped connection
            Either::Right((Some(_), _)) => continue,
        }
    }
}

/// Close codes after which reconnecting cannot help
pub(crate) fn is_fatal_close(code: u16) -> bool {
    matches!(code, 4400 | 4401 | 4403 | 4406 | 4409)
}

struct Session<'a> {
    conn: &'a Connection,
    generation: u32,
    options: &'a ConnectOptions,
    payload: &'a SubscribePayload,
    connected_once: &'a mut bool,
    /// `Date.now()` at `connection_ack`
    acked_at: Option<f64>,
    saw_data: bool,
}

impl Session<'_> {
    async fn drive<T, F>(&mut self, rx: &mut UnboundedReceiver<Signal>, on_event: &F) -> Outcome
    where
        T: DeserializeOwned,
        F: Fn(SubscriptionEvent<T>),
    {
        let mut ack_deadline = Some(TimeoutFuture::new(self.options.policy.ack_timeout_ms));
        loop {
            let signal = match ack_deadline.as_mut() {
                Some(deadline) => match future::select(deadline, rx.next()).await {
                    Either::Left(_) => {
                        log::warn!(
                            "[WS] no connection_ack within {}ms",
                            self.options.policy.ack_timeout_ms
                        );
                        return Outcome::Dropped;
                    }
                    Either::Right((signal, _)) => signal,
                },
                None => rx.next().await,
            };
            let Some(signal) = signal else {
                return Outcome::Cancelled;
            };
            let event = match signal {
                Signal::Cancel => {
                    let _ = self.conn.send(&ClientMessage::Complete { id: OPERATION_ID.to_string() });
                    return Outcome::Cancelled;
                }
                Signal::Socket { generation, .. } if generation != self.generation => continue,
                Signal::Socket { event, .. } => event,
            };

            match event {
                SocketEvent::Open => {
                    let init = ClientMessage::ConnectionInit {
                        payload: self.options.connection_params.clone(),
                    };
                    if let Err(err) = self.conn.send(&init) {
                        log::warn!("[WS] {}", err);
                        return Outcome::Dropped;
                    }
                }
                SocketEvent::Message(text) => {
                    if let Some(outcome) = self.on_message(&text, on_event) {
                        return outcome;
                    }
                    if self.acked_at.is_some() {
                        ack_deadline = None;
                    }
                }
                SocketEvent::Closed { code, reason } => {
                    log::info!("[WS] socket closed: code={} reason={:?}", code, reason);
                    if is_fatal_close(code) {
                        return Outcome::Fatal(SubscriptionError::Protocol(format!(
                            "closed with {}: {}",
                            code, reason
                        )));
                    }
                    return Outcome::Dropped;
                }
                // a close event always follows
                SocketEvent::Error => log::warn!("[WS] socket error"),
            }
        }
    }

    fn on_message<T, F>(&mut self, text: &str, on_event: &F) -> Option<Outcome>
    where
        T: DeserializeOwned,
        F: Fn(SubscriptionEvent<T>),
    {
        let message = match serde_json::from_str::<ServerMessage>(text) {
            Ok(message) => message,
            Err(err) => {
                log::warn!("[WS] ignoring malformed message: {}", err);
                return None;
            }
        };

        match message {
            ServerMessage::ConnectionAck => {
                self.acked_at = Some(js_sys::Date::now());
                let subscribe = ClientMessage::Subscribe {
                    id: OPERATION_ID.to_string(),
                    payload: self.payload.clone(),
                };
                if let Err(err) = self.conn.send(&subscribe) {
                    log::warn!("[WS] {}", err);
                    return Some(Outcome::Dropped);
                }
                on_event(SubscriptionEvent::Connected { reconnected: *self.connected_once });
                *self.connected_once = true;
            }
            ServerMessage::Next { id, payload } if id == OPERATION_ID => {
                self.saw_data = true;
                if let Some(errors) = payload.errors.filter(|errors| !errors.is_empty()) {
                    on_event(SubscriptionEvent::Errors(errors));
                }
                if let Some(data) = payload.data {
                    match serde_json::from_value::<T>(data) {
                        Ok(data) => on_event(SubscriptionEvent::Data(data)),
                        Err(err) => log::warn!("[WS] payload did not match operation: {}", err),
                    }
                }
            }
            ServerMessage::Error { id, payload } if id == OPERATION_ID => {
                return Some(Outcome::Fatal(SubscriptionError::Rejected(payload)));
            }
            ServerMessage::Complete { id } if id == OPERATION_ID => {
                on_event(SubscriptionEvent::Completed);
                return Some(Outcome::Finished);
            }
            ServerMessage::Ping => {
                if let Err(err) = self.conn.send(&ClientMessage::Pong) {
                    log::warn!("[WS] {}", err);
                }
            }
            other => log::debug!("[WS] ignoring {:?}", other),
        }
        None
    }
}

/// One browser socket plus the callbacks keeping it wired to the channel
struct Connection {
    socket: WebSocket,
    _on_open: Closure<dyn FnMut(Event)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
}

impl Connection {
    fn open(url: &str, generation: u32, tx: &UnboundedSender<Signal>) -> Result<Self, SubscriptionError> {
        let socket = WebSocket::new_with_str(url, SUBPROTOCOL)
            .map_err(|e| SubscriptionError::Connect(describe(&e)))?;

        let emit = {
            let tx = tx.clone();
            move |event: SocketEvent| {
                let _ = tx.unbounded_send(Signal::Socket { generation, event });
            }
        };

        let on_open = {
            let emit = emit.clone();
            Closure::<dyn FnMut(Event)>::new(move |_: Event| emit(SocketEvent::Open))
        };
        let on_message = {
            let emit = emit.clone();
            Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
                if let Some(text) = ev.data().as_string() {
                    emit(SocketEvent::Message(text));
                }
            })
        };
        let on_close = {
            let emit = emit.clone();
            Closure::<dyn FnMut(CloseEvent)>::new(move |ev: CloseEvent| {
                emit(SocketEvent::Closed { code: ev.code(), reason: ev.reason() })
            })
        };
        let on_error = Closure::<dyn FnMut(Event)>::new(move |_: Event| emit(SocketEvent::Error));

        socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        Ok(Self {
            socket,
            _on_open: on_open,
            _on_message: on_message,
            _on_close: on_close,
            _on_error: on_error,
        })
    }

    fn send(&self, message: &ClientMessage) -> Result<(), SubscriptionError> {
        self.socket
            .send_with_str(&message.to_text())
            .map_err(|e| SubscriptionError::Send(describe(&e)))
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.socket.set_onopen(None);
        self.socket.set_onmessage(None);
        self.socket.set_onclose(None);
        self.socket.set_onerror(None);
        let _ = self.socket.close();
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
