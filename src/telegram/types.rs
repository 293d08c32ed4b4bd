//! Bot API wire types and update decoding

use crate::geo::Coordinates;
use crate::runtime::{ChatId, UserId};
use crate::state_machine::{CallbackAction, Event};
use serde::Deserialize;

/// Envelope around every Bot API result
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
    pub location: Option<Location>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    /// Message the pressed button was attached to
    pub message: Option<Message>,
    pub data: Option<String>,
}

/// A decoded update
#[derive(Debug)]
pub struct Incoming {
    pub user: UserId,
    /// Where replies go
    pub chat: ChatId,
    /// `None` for callback buttons whose payload is not recognized
    pub event: Option<Event>,
    /// Callback queries must be answered whether or not they decode
    pub callback_id: Option<String>,
}

impl Update {
    /// Decode into a session event. Messages without text or location and
    /// other update kinds yield `None`.
    pub fn into_incoming(self) -> Option<Incoming> {
        if let Some(callback) = self.callback_query {
            let event = callback
                .data
                .as_deref()
                .and_then(CallbackAction::decode)
                .map(Event::from);
            let chat = callback
                .message
                .map_or(callback.from.id, |message| message.chat.id);
            return Some(Incoming {
                user: UserId(callback.from.id),
                chat: ChatId(chat),
                event,
                callback_id: Some(callback.id),
            });
        }

        let message = self.message?;
        let chat = ChatId(message.chat.id);
        let user = UserId(message.from.map_or(message.chat.id, |u| u.id));
        let event = if let Some(location) = message.location {
            Event::LocationShared {
                location: Coordinates::new(location.latitude, location.longitude),
            }
        } else {
            Event::from_text(message.text.as_deref()?)
        };

        Some(Incoming {
            user,
            chat,
            event: Some(event),
            callback_id: None,
        })
    }
}
