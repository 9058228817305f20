use std::sync::Arc;

use tracing::{debug, info};

use crate::chat::{CURRENT_WEATHER_BUTTON, ChatPlatform, MAIN_KEYBOARD, Reply, TextFormat};
use crate::provider::WeatherProvider;
use crate::render::render;

pub const WELCOME_TEXT: &str = "👋 Hi! Send me a city name.";
pub const USAGE_TEXT: &str = "Example: /weather Moscow";
pub const CITY_PROMPT_TEXT: &str = "Send a city name:";

/// What an inbound text asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Start,
    /// `/weather`, with the city if one was given.
    Weather(Option<String>),
    /// The "current weather" button.
    CityPrompt,
    /// Keyboard labels without a handler of their own, and commands
    /// addressed to another bot.
    Ignored,
    City(String),
}

impl Route {
    /// Classify without knowing our username: any `@mention` is accepted.
    pub fn classify(text: &str) -> Route {
        Route::classify_for(text, None)
    }

    /// Classify `text` for the bot named `bot_username`.
    pub fn classify_for(text: &str, bot_username: Option<&str>) -> Route {
        if let Some(command) = Command::parse(text) {
            match command.name {
                "start" | "weather" if !command.is_addressed_to(bot_username) => {
                    return Route::Ignored;
                }
                "start" => return Route::Start,
                "weather" => {
                    let city = command
                        .args
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join(" ");
                    return Route::Weather((!city.is_empty()).then_some(city));
                }
                _ => {}
            }
        }

        if text == CURRENT_WEATHER_BUTTON {
            return Route::CityPrompt;
        }

        let city = text.trim();
        if city.is_empty() || MAIN_KEYBOARD.contains(&city) {
            return Route::Ignored;
        }

        Route::City(city.to_string())
    }
}

/// ` /name@bot rest` → name `name`, mention `bot`, args `rest`.
struct Command<'a> {
    name: &'a str,
    mention: Option<&'a str>,
    args: &'a str,
}

impl<'a> Command<'a> {
    fn parse(text: &'a str) -> Option<Self> {
        let rest = text.trim_start().strip_prefix('/')?;
        let (head, args) = match rest.find(char::is_whitespace) {
            Some(idx) => rest.split_at(idx),
            None => (rest, ""),
        };
        let (name, mention) = match head.split_once('@') {
            Some((name, mention)) => (name, Some(mention)),
            None => (head, None),
        };
        Some(Self {
            name,
            mention,
            args,
        })
    }

    fn is_addressed_to(&self, bot_username: Option<&str>) -> bool {
        match (self.mention, bot_username) {
            (Some(mention), Some(username)) => mention.eq_ignore_ascii_case(username),
            _ => true,
        }
    }
}

/// Dispatches inbound chat text to the weather lookup and sends the reply.
#[derive(Debug, Clone)]
pub struct MessageRouter {
    provider: Arc<dyn WeatherProvider>,
    bot_username: Option<String>,
}

impl MessageRouter {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            bot_username: None,
        }
    }

    /// Only answer commands whose `@mention` matches this username.
    pub fn with_bot_username(mut self, username: Option<String>) -> Self {
        self.bot_username = username;
        self
    }

    /// Handles one inbound text. Lookup failures are rendered as replies;
    /// only errors from the chat platform itself are returned.
    pub async fn handle(
        &self,
        chat: &dyn ChatPlatform,
        chat_id: i64,
        text: &str,
    ) -> anyhow::Result<()> {
        let route = Route::classify_for(text, self.bot_username.as_deref());
        debug!(chat_id, ?route, "Routing message");

        match route {
            Route::Start => {
                let reply = Reply::plain(WELCOME_TEXT).with_keyboard();
                chat.send_reply(chat_id, &reply).await
            }
            Route::Weather(Some(city)) | Route::City(city) => {
                self.reply_with_weather(chat, chat_id, &city).await
            }
            Route::Weather(None) => chat.send_reply(chat_id, &Reply::plain(USAGE_TEXT)).await,
            Route::CityPrompt => chat.send_reply(chat_id, &Reply::plain(CITY_PROMPT_TEXT)).await,
            Route::Ignored => Ok(()),
        }
    }

    async fn reply_with_weather(
        &self,
        chat: &dyn ChatPlatform,
        chat_id: i64,
        city: &str,
    ) -> anyhow::Result<()> {
        chat.send_typing(chat_id).await?;

        let result = self.provider.fetch(city).await;
        info!(chat_id, city, success = result.is_success(), "Weather lookup finished");

        let format = if result.is_success() {
            TextFormat::Html
        } else {
            TextFormat::Plain
        };
        let reply = Reply {
            text: render(&result, format),
            format,
            keyboard: true,
        };
        chat.send_reply(chat_id, &reply).await
    }
}
