//! WebSocket hooks for Dioxus components.
//!
//! A socket belongs to the component that created it and is closed when that
//! component unmounts. Socket callbacks may run off the UI thread, so they
//! never touch signals directly: values go through a channel and a task owned
//! by the component applies them.

use dioxus::prelude::*;
use futures_channel::mpsc::{unbounded, UnboundedSender};
use futures_util::StreamExt;

use super::connection::{ConnectionState, WsClient};
use super::variants::{AssistantClient, CourseCreatorClient, QaClient};

/// Anything wrapping a [`WsClient`].
pub trait HasSocket {
    fn socket(&self) -> &WsClient;
}

impl HasSocket for WsClient {
    fn socket(&self) -> &WsClient {
        self
    }
}

impl HasSocket for AssistantClient {
    fn socket(&self) -> &WsClient {
        self.ws()
    }
}

impl HasSocket for CourseCreatorClient {
    fn socket(&self) -> &WsClient {
        self.ws()
    }
}

impl HasSocket for QaClient {
    fn socket(&self) -> &WsClient {
        self.ws()
    }
}

/// Returns a sender whose values are handed to `apply` inside this component.
pub fn use_event_bridge<E>(mut apply: impl FnMut(E) + 'static) -> UnboundedSender<E>
where
    E: Send + 'static,
{
    use_hook(move || {
        let (tx, mut rx) = unbounded::<E>();
        spawn(async move {
            while let Some(event) = rx.next().await {
                apply(event);
            }
        });
        tx
    })
}

/// Build a client once per component and mirror its state into a signal.
///
/// `build` gets the client before anything is connected, so event handlers
/// registered there never miss a frame. Connecting is up to the caller; the
/// client is disconnected in `use_drop`.
pub fn use_ws_client<C>(build: impl FnOnce() -> C) -> (C, Signal<ConnectionState>)
where
    C: HasSocket + Clone + 'static,
{
    let mut state = use_signal(|| ConnectionState::Disconnected);
    let states = use_event_bridge(move |next: ConnectionState| state.set(next));

    let client = use_hook(move || {
        let client = build();
        client.socket().handlers().on_state_change(move |next| {
            let _ = states.unbounded_send(next);
        });
        client
    });

    let owned = client.clone();
    use_drop(move || owned.socket().disconnect());

    (client, state)
}
