//! EventSource Channel
//!
//! Browser push channel for live updates. The handle owns the callbacks, so
//! dropping it after `close` frees them.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventSource, MessageEvent};

use house_cup::PushChannel;

/// An open `EventSource` and its callbacks
pub struct EventSourceHandle {
    source: EventSource,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
}

impl EventSourceHandle {
    /// Open `url`. `on_message` runs for every unnamed event; `on_error`
    /// runs when the browser reports a failure.
    pub fn open(
        url: &str,
        mut on_message: impl FnMut() + 'static,
        mut on_error: impl FnMut() + 'static,
    ) -> Result<Self, String> {
        let source =
            EventSource::new(url).map_err(|e| format!("EventSource open failed: {:?}", e))?;

        let on_message = Closure::wrap(Box::new(move |_: MessageEvent| {
            on_message();
        }) as Box<dyn FnMut(MessageEvent)>);
        source.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        let on_error = Closure::wrap(Box::new(move |_: Event| {
            web_sys::console::warn_1(&"Live updates stopped: event stream error".into());
            on_error();
        }) as Box<dyn FnMut(Event)>);
        source.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        Ok(Self {
            source,
            _on_message: on_message,
            _on_error: on_error,
        })
    }
}

impl PushChannel for EventSourceHandle {
    fn close(&mut self) {
        self.source.set_onmessage(None);
        self.source.set_onerror(None);
        self.source.close();
    }
}
