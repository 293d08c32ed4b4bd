//! Bot API HTTP client

use super::keyboard::ReplyMarkup;
use super::types::{ApiResponse, Update};
use super::TelegramError;
use reqwest::Client;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

const PARSE_MODE: &str = "Markdown";

/// Slack on top of the long-poll timeout before the HTTP request gives up
const POLL_GRACE: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct GetUpdates<'a> {
    offset: i64,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a ReplyMarkup>,
}

#[derive(Serialize)]
struct SendPhoto<'a> {
    chat_id: i64,
    photo: &'a str,
    caption: &'a str,
    parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a ReplyMarkup>,
}

#[derive(Serialize)]
struct AnswerCallbackQuery<'a> {
    callback_query_id: &'a str,
}

pub struct TelegramClient {
    client: Client,
    /// `{api_url}/bot{token}`
    bot_url: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    pub fn new(token: &str, api_url: &str, poll_timeout: Duration) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(poll_timeout + POLL_GRACE)
            .build()?;

        Ok(Self {
            client,
            bot_url: format!("{}/bot{token}", api_url.trim_end_matches('/')),
            poll_timeout,
        })
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TelegramError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{method}", self.bot_url))
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;

        // Error replies carry the same envelope with ok=false
        let envelope: ApiResponse<T> = serde_json::from_str(&text).map_err(|e| {
            TelegramError::InvalidResponse(format!("{method}: {e} (status {status})"))
        })?;

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(TelegramError::Api {
                status,
                description: description.unwrap_or_else(|| format!("{method} failed")),
            }),
        }
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: self.poll_timeout.as_secs(),
                allowed_updates: &["message", "callback_query"],
            },
        )
        .await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&ReplyMarkup>,
    ) -> Result<(), TelegramError> {
        let _: IgnoredAny = self
            .call(
                "sendMessage",
                &SendMessage {
                    chat_id,
                    text,
                    parse_mode: PARSE_MODE,
                    disable_web_page_preview: true,
                    reply_markup,
                },
            )
            .await?;
        Ok(())
    }

    /// Send a photo by URL; Telegram fetches it itself
    pub async fn send_photo(
        &self,
        chat_id: i64,
        photo_url: &str,
        caption: &str,
        reply_markup: Option<&ReplyMarkup>,
    ) -> Result<(), TelegramError> {
        let _: IgnoredAny = self
            .call(
                "sendPhoto",
                &SendPhoto {
                    chat_id,
                    photo: photo_url,
                    caption,
                    parse_mode: PARSE_MODE,
                    reply_markup,
                },
            )
            .await?;
        Ok(())
    }

    /// Acknowledge a button press so the client stops its spinner
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TelegramError> {
        let _: IgnoredAny = self
            .call(
                "answerCallbackQuery",
                &AnswerCallbackQuery { callback_query_id },
            )
            .await?;
        Ok(())
    }
}
