//! Outbound side of the chat platform, as seen by the router.

use async_trait::async_trait;

/// Reply-keyboard labels, one button per row.
pub const CURRENT_WEATHER_BUTTON: &str = "🌤 Current weather";
pub const FORECAST_BUTTON: &str = "📅 3-day forecast";
pub const HELP_BUTTON: &str = "ℹ️ Help";

pub const MAIN_KEYBOARD: [&str; 3] = [CURRENT_WEATHER_BUTTON, FORECAST_BUTTON, HELP_BUTTON];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    /// Telegram-flavoured HTML (`<b>` etc).
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub format: TextFormat,
    /// Attach [`MAIN_KEYBOARD`].
    pub keyboard: bool,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
            keyboard: false,
        }
    }

    pub fn with_keyboard(mut self) -> Self {
        self.keyboard = true;
        self
    }
}

#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Show the "typing…" indicator in `chat_id`.
    async fn send_typing(&self, chat_id: i64) -> anyhow::Result<()>;

    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> anyhow::Result<()>;
}
