//! Outbound event dispatch from the form to the line-item handler
//!
//! The relay is the click-side half of the form: on activation it reads
//! the container's current values and forwards them as one named event.
//! It holds no field state of its own. The handler is the remote
//! collaborator, a task that acknowledges each event over a reply
//! channel drained by the app's tick pass.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::form::{self, LineItemForm};

/// The one event name the handler listens for
pub const ADD_TEMP_LINE_ITEM: &str = "add_temp_line_item_from_inputs";

/// Flat field-value record carried by the event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemParams {
    pub description: String,
    pub quantity: String,
    pub amount: String,
}

/// A named event bound for the handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEvent {
    pub name: &'static str,
    pub params: LineItemParams,
}

/// What the handler sends back
#[derive(Debug, Clone)]
pub enum HandlerReply {
    TempLineItemAdded(LineItemParams),
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay is not attached")]
    Detached,
    #[error("line-item handler is gone")]
    Closed,
}

pub type EventSink = mpsc::UnboundedSender<OutboundEvent>;

#[derive(Debug, Default)]
pub struct LineItemRelay {
    sink: Option<EventSink>,
}

impl LineItemRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the dispatch sink. Rebinding replaces the previous binding,
    /// so a re-mounted relay never dispatches twice.
    pub fn attach(&mut self, sink: EventSink) {
        self.sink = Some(sink);
    }

    /// Drop the binding. Safe to call repeatedly, or before any attach.
    pub fn detach(&mut self) {
        self.sink = None;
    }

    pub fn is_attached(&self) -> bool {
        self.sink.is_some()
    }

    /// Read the named fields from the container and dispatch one event.
    /// Missing or blank fields become empty strings rather than errors.
    pub fn activate(&self, container: &LineItemForm) -> Result<(), RelayError> {
        let sink = self.sink.as_ref().ok_or(RelayError::Detached)?;
        let params = read_params(container);
        sink.send(OutboundEvent {
            name: ADD_TEMP_LINE_ITEM,
            params,
        })
        .map_err(|_| RelayError::Closed)
    }
}

/// Current container values as a flat record, one entry per known field
pub fn read_params(container: &LineItemForm) -> LineItemParams {
    let value = |name| container.value_of(name).unwrap_or_default().to_string();
    LineItemParams {
        description: value(form::DESCRIPTION),
        quantity: value(form::QUANTITY),
        amount: value(form::AMOUNT),
    }
}

/// Spawn the line-item handler and hand back the channel ends the app
/// needs: the event sink for the relay and the reply stream for tick.
pub fn spawn_handler() -> (EventSink, mpsc::UnboundedReceiver<HandlerReply>) {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<OutboundEvent>();
    let (reply_tx, reply_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event.name {
                ADD_TEMP_LINE_ITEM => {
                    match serde_json::to_string(&event.params) {
                        Ok(payload) => tracing::debug!("handling {}: {}", event.name, payload),
                        Err(e) => tracing::warn!("unserializable params: {}", e),
                    }
                    if reply_tx
                        .send(HandlerReply::TempLineItemAdded(event.params))
                        .is_err()
                    {
                        break;
                    }
                }
                other => tracing::warn!("dropping unknown event: {}", other),
            }
        }
    });

    (event_tx, reply_rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{InputField, DESCRIPTION, QUANTITY};

    fn attached_relay() -> (LineItemRelay, mpsc::UnboundedReceiver<OutboundEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut relay = LineItemRelay::new();
        relay.attach(tx);
        (relay, rx)
    }

    #[test]
    fn test_complete_inputs_dispatch_verbatim() {
        let (relay, mut rx) = attached_relay();

        let mut form = LineItemForm::new();
        for c in "Consulting".chars() {
            form.field_mut(DESCRIPTION).unwrap().push_char(c);
        }
        form.field_mut(QUANTITY).unwrap().push_char('2');
        for c in "150.00".chars() {
            form.field_mut(crate::form::AMOUNT).unwrap().push_char(c);
        }

        relay.activate(&form).unwrap();

        let event = rx.try_recv().unwrap();
        assert_eq!(event.name, ADD_TEMP_LINE_ITEM);
        assert_eq!(
            event.params,
            LineItemParams {
                description: "Consulting".into(),
                quantity: "2".into(),
                amount: "150.00".into(),
            }
        );
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let (relay, mut rx) = attached_relay();

        // Only the description input exists in this container
        let form = LineItemForm::with_fields(vec![InputField::with_value(DESCRIPTION, "Travel")]);
        relay.activate(&form).unwrap();

        let event = rx.try_recv().unwrap();
        assert_eq!(
            event.params,
            LineItemParams {
                description: "Travel".into(),
                quantity: "".into(),
                amount: "".into(),
            }
        );
    }

    #[test]
    fn test_field_default_law() {
        // Present, absent, and blank fields all collapse to a three-field
        // record of plain strings.
        let containers = vec![
            LineItemForm::with_fields(vec![]),
            LineItemForm::with_fields(vec![InputField::new(QUANTITY)]),
            LineItemForm::with_fields(vec![
                InputField::with_value(QUANTITY, "3"),
                InputField::with_value(crate::form::AMOUNT, ""),
            ]),
            LineItemForm::new(),
        ];

        for container in &containers {
            let params = read_params(container);
            assert_eq!(
                params.description,
                container.value_of(DESCRIPTION).unwrap_or("")
            );
            assert_eq!(params.quantity, container.value_of(QUANTITY).unwrap_or(""));
            assert_eq!(
                params.amount,
                container.value_of(crate::form::AMOUNT).unwrap_or("")
            );
        }
    }

    #[test]
    fn test_detached_relay_does_not_dispatch() {
        let (mut relay, mut rx) = attached_relay();
        relay.detach();

        let result = relay.activate(&LineItemForm::new());
        assert!(matches!(result, Err(RelayError::Detached)));
        assert!(rx.try_recv().is_err(), "no event may leak after detach");

        // Repeated teardown stays a no-op
        relay.detach();
        relay.detach();
        assert!(!relay.is_attached());
    }

    #[test]
    fn test_rebinding_replaces_the_old_sink() {
        let (mut relay, mut old_rx) = attached_relay();
        let (new_tx, mut new_rx) = mpsc::unbounded_channel();
        relay.attach(new_tx);

        relay.activate(&LineItemForm::new()).unwrap();
        assert!(old_rx.try_recv().is_err());
        assert!(new_rx.try_recv().is_ok());
    }

    #[test]
    fn test_payload_wire_shape() {
        let params = LineItemParams {
            description: "Consulting".into(),
            quantity: "2".into(),
            amount: "150.00".into(),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "description": "Consulting",
                "quantity": "2",
                "amount": "150.00",
            })
        );
    }

    #[tokio::test]
    async fn test_handler_acknowledges_each_event() {
        let (sink, mut replies) = spawn_handler();

        let mut relay = LineItemRelay::new();
        relay.attach(sink);

        let form = LineItemForm::with_fields(vec![InputField::with_value(DESCRIPTION, "Hosting")]);
        relay.activate(&form).unwrap();

        match replies.recv().await {
            Some(HandlerReply::TempLineItemAdded(params)) => {
                assert_eq!(params.description, "Hosting");
                assert_eq!(params.quantity, "");
            }
            None => panic!("handler hung up"),
        }
    }
}
