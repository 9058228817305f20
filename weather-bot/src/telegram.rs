use std::{convert::Infallible, sync::Arc};

use async_trait::async_trait;
use teloxide::{
    payloads::SendMessageSetters,
    prelude::*,
    types::{ChatAction, ChatId, KeyboardButton, KeyboardMarkup, ParseMode, Update},
    utils::command::BotCommands,
};
use tracing::{debug, error, info};
use weather_core::{ChatPlatform, MAIN_KEYBOARD, MessageRouter, Reply, TextFormat};

/// Commands shown in the Telegram command menu. Parsing is done by
/// [`weather_core::Route`]; this only registers the descriptions.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    /// Show the welcome message and keyboard.
    Start,
    /// Current weather for a city, e.g. /weather Moscow.
    Weather(String),
}

/// [`ChatPlatform`] over a teloxide [`Bot`].
pub struct TelegramChat {
    bot: Bot,
}

impl TelegramChat {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn main_keyboard() -> KeyboardMarkup {
    let rows = MAIN_KEYBOARD
        .iter()
        .map(|label| vec![KeyboardButton::new(*label)]);
    let mut markup = KeyboardMarkup::new(rows);
    markup.resize_keyboard = true;
    markup
}

#[async_trait]
impl ChatPlatform for TelegramChat {
    async fn send_typing(&self, chat_id: i64) -> anyhow::Result<()> {
        self.bot
            .send_chat_action(ChatId(chat_id), ChatAction::Typing)
            .await?;
        Ok(())
    }

    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> anyhow::Result<()> {
        let mut request = self.bot.send_message(ChatId(chat_id), reply.text.clone());
        if reply.format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if reply.keyboard {
            request = request.reply_markup(main_keyboard());
        }
        request.await?;
        Ok(())
    }
}

/// Long-poll Telegram and hand every text message to `router`.
/// Each update runs as its own task, so replies may arrive out of order.
pub async fn run(bot: Bot, router: MessageRouter) {
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        error!(error = %e, "Failed to register bot commands");
    }

    let username = match bot.get_me().await {
        Ok(me) => me.username.clone(),
        Err(e) => {
            error!(error = %e, "Failed to fetch bot profile, accepting any command mention");
            None
        }
    };
    let router = Arc::new(router.with_bot_username(username));

    info!("Polling for updates");

    Dispatcher::builder(bot, Update::filter_message().endpoint(handle_message))
        .dependencies(dptree::deps![router])
        .distribution_function(no_distribution)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

/// No distribution key: updates are never queued behind others from the same chat.
fn no_distribution(_: &Update) -> Option<Infallible> {
    None
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    router: Arc<MessageRouter>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    let Some(text) = msg.text() else {
        debug!(chat_id, "Ignoring non-text message");
        return Ok(());
    };

    let user_id = msg.from.as_ref().map(|u| u.id.0).unwrap_or(0);
    info!(chat_id, user_id, message_content = %text, "Received message");

    let chat = TelegramChat::new(bot);
    if let Err(e) = router.handle(&chat, chat_id, text).await {
        error!(chat_id, error = %e, "Failed to reply");
    }

    Ok(())
}
