use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dioxus_logger::tracing::{debug, error, info, warn};
use shared_types::{parse_push, PushMessage, PushTopic};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, ErrorEvent, Event, MessageEvent, WebSocket};

use crate::error::{DashboardError, Result};

/// One open topic socket. Dropping it detaches every handler and closes
/// the socket without reporting a close event.
pub struct PushChannel {
    topic: PushTopic,
    ws: WebSocket,
    closing: Rc<Cell<bool>>,
    _on_open: Closure<dyn FnMut(Event)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(ErrorEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl PushChannel {
    pub fn topic(&self) -> PushTopic {
        self.topic
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Opened(PushTopic),
    Message(PushMessage),
    Closed(PushTopic),
}

pub fn http_to_ws_url(http_url: &str) -> String {
    if let Some(rest) = http_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if let Some(rest) = http_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if http_url.is_empty() {
        let protocol = web_sys::window()
            .and_then(|w| w.location().protocol().ok())
            .unwrap_or_else(|| "http:".to_string());
        let host = web_sys::window()
            .and_then(|w| w.location().host().ok())
            .unwrap_or_else(|| "localhost".to_string());

        if protocol == "https:" {
            format!("wss://{host}")
        } else {
            format!("ws://{host}")
        }
    } else {
        format!("ws://{http_url}")
    }
}

pub fn channel_url(api_base: &str, topic: PushTopic) -> String {
    format!("{}{}", http_to_ws_url(api_base), topic.path())
}

pub fn connect_channel<F>(topic: PushTopic, on_event: F) -> Result<PushChannel>
where
    F: FnMut(ChannelEvent) + 'static,
{
    let url = channel_url(crate::api::api_base(), topic);
    info!("Connecting to {:?} channel: {}", topic, url);

    let ws = WebSocket::new(&url).map_err(|e| {
        error!("Failed to create WebSocket for {:?}: {:?}", topic, e);
        DashboardError::Channel(format!("{url}: {e:?}"))
    })?;

    let closing = Rc::new(Cell::new(false));
    let on_event = Rc::new(RefCell::new(on_event));
    let on_event_open = on_event.clone();
    let on_event_close = on_event.clone();
    let closing_for_close = closing.clone();

    let on_open = Closure::wrap(Box::new(move |_e: Event| {
        info!("{:?} channel connected", topic);
        on_event_open.borrow_mut()(ChannelEvent::Opened(topic));
    }) as Box<dyn FnMut(Event)>);
    ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));

    let on_message = Closure::wrap(Box::new(move |e: MessageEvent| {
        let Some(text) = e.data().as_string() else {
            return;
        };
        match parse_push(topic, &text) {
            Some(message) => on_event.borrow_mut()(ChannelEvent::Message(message)),
            None => debug!("Ignoring malformed {:?} message: {}", topic, text),
        }
    }) as Box<dyn FnMut(MessageEvent)>);
    ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

    let on_error = Closure::wrap(Box::new(move |e: ErrorEvent| {
        log::error!("{:?} channel error: {}", topic, e.message());
    }) as Box<dyn FnMut(ErrorEvent)>);
    ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    let on_close = Closure::wrap(Box::new(move |e: CloseEvent| {
        if closing_for_close.get() {
            return;
        }
        warn!(
            "{:?} channel closed unexpectedly (code {}); updates stop until reload",
            topic,
            e.code()
        );
        on_event_close.borrow_mut()(ChannelEvent::Closed(topic));
    }) as Box<dyn FnMut(CloseEvent)>);
    ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

    Ok(PushChannel {
        topic,
        ws,
        closing,
        _on_open: on_open,
        _on_message: on_message,
        _on_error: on_error,
        _on_close: on_close,
    })
}

impl Drop for PushChannel {
    fn drop(&mut self) {
        self.closing.set(true);
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);
        let _ = self.ws.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_urls_follow_the_api_scheme() {
        assert_eq!(
            channel_url("http://localhost:8000", PushTopic::Log),
            "ws://localhost:8000/ws/log/"
        );
        assert_eq!(
            channel_url("https://titan.example", PushTopic::Queued),
            "wss://titan.example/ws/queued/"
        );
        assert_eq!(
            channel_url("10.0.0.2:8000", PushTopic::Instance),
            "ws://10.0.0.2:8000/ws/instance/"
        );
    }
}
