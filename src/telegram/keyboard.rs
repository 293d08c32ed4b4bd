//! Reply and inline keyboards

use crate::facility::{Category, CUSTOM_QUERY_LABEL};
use crate::state_machine::event::{CLEAR_COMMAND, STOP_BACK_LABEL};
use crate::state_machine::{CallbackAction, Prompt, ShortId};
use serde::Serialize;

pub const SHARE_LOCATION_LABEL: &str = "Send location 📍";
pub const DIRECTIONS_LABEL: &str = "🚶‍♂️ Get Directions";
pub const MORE_RESULTS_LABEL: &str = "➡️ More Results";

/// Quick picks offered on the radius keyboard, in meters
const RADIUS_CHOICES: [u32; 4] = [500, 1000, 2000, 5000];

/// Facility buttons per keyboard row
const FACILITY_COLUMNS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Keyboard {
        keyboard: Vec<Vec<KeyboardButton>>,
        resize_keyboard: bool,
    },
    Inline {
        inline_keyboard: Vec<Vec<InlineButton>>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub request_location: bool,
}

impl KeyboardButton {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            request_location: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

fn reply_keyboard(rows: Vec<Vec<KeyboardButton>>) -> ReplyMarkup {
    ReplyMarkup::Keyboard {
        keyboard: rows,
        resize_keyboard: true,
    }
}

/// Rows every in-flow keyboard ends with
fn navigation_rows() -> Vec<Vec<KeyboardButton>> {
    vec![
        vec![KeyboardButton::text(STOP_BACK_LABEL)],
        vec![KeyboardButton::text(CLEAR_COMMAND)],
    ]
}

/// Keyboard that accompanies a prompt
pub fn for_prompt(prompt: Prompt) -> ReplyMarkup {
    match prompt {
        Prompt::ShareLocation => location_request(),
        Prompt::ChooseRadius => radius_choices(),
        Prompt::ChooseFacility => facility_choices(),
        Prompt::TypeQuery => reply_keyboard(navigation_rows()),
    }
}

pub fn location_request() -> ReplyMarkup {
    reply_keyboard(vec![vec![KeyboardButton {
        text: SHARE_LOCATION_LABEL.to_string(),
        request_location: true,
    }]])
}

pub fn radius_choices() -> ReplyMarkup {
    let mut rows: Vec<Vec<KeyboardButton>> = RADIUS_CHOICES
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|m| KeyboardButton::text(format!("{m}m")))
                .collect()
        })
        .collect();
    rows.extend(navigation_rows());
    reply_keyboard(rows)
}

pub fn facility_choices() -> ReplyMarkup {
    let mut rows: Vec<Vec<KeyboardButton>> = Category::ALL
        .chunks(FACILITY_COLUMNS)
        .map(|row| row.iter().map(|c| KeyboardButton::text(c.label())).collect())
        .collect();
    rows.push(vec![KeyboardButton::text(CUSTOM_QUERY_LABEL)]);
    rows.extend(navigation_rows());
    reply_keyboard(rows)
}

fn inline_button(label: &str, action: &CallbackAction) -> ReplyMarkup {
    ReplyMarkup::Inline {
        inline_keyboard: vec![vec![InlineButton {
            text: label.to_string(),
            callback_data: action.encode(),
        }]],
    }
}

pub fn directions_button(id: &ShortId) -> ReplyMarkup {
    inline_button(DIRECTIONS_LABEL, &CallbackAction::Directions(id.clone()))
}

pub fn more_results_button() -> ReplyMarkup {
    inline_button(MORE_RESULTS_LABEL, &CallbackAction::MoreResults)
}
