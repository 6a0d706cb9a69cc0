//! Telegram bot.
//!
//! The bot is a thin dispatcher: it turns Telegram updates into engine
//! calls and renders the structured results back as chat replies. All
//! budget state lives in the [`engine`] crate, in process memory.

use std::sync::Arc;

use teloxide::prelude::*;

mod commands;
mod exports;
mod handlers;
mod ui;

const DEFAULT_PAYPAL_LINK: &str = "https://paypal.me/YourName/1";

#[derive(Clone)]
pub struct ConfigParameters {
    allowed_users: Option<Vec<UserId>>,
    engine: Arc<engine::Engine>,
    paypal_link: String,
}

pub struct Bot {
    token: String,
    allowed_users: Option<Vec<UserId>>,
    paypal_link: String,
    preview_categories: usize,
}

impl Bot {
    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);
        let engine = Arc::new(
            engine::Engine::builder()
                .preview_categories(self.preview_categories)
                .build(),
        );

        let parameters = ConfigParameters {
            allowed_users: self.allowed_users.clone(),
            engine,
            paypal_link: self.paypal_link.clone(),
        };

        Dispatcher::builder(bot, handlers::schema())
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::warn!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

#[derive(Debug)]
pub struct BotBuilder {
    token: String,
    allowed_users: Option<Vec<UserId>>,
    paypal_link: String,
    preview_categories: usize,
}

impl Default for BotBuilder {
    fn default() -> Self {
        Self {
            token: String::new(),
            allowed_users: None,
            paypal_link: DEFAULT_PAYPAL_LINK.to_string(),
            preview_categories: engine::DEFAULT_PREVIEW_CATEGORIES,
        }
    }
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    pub fn allowed_users(mut self, allowed_users: Vec<u64>) -> BotBuilder {
        if !allowed_users.is_empty() {
            self.allowed_users = Some(allowed_users.into_iter().map(UserId).collect());
        }
        self
    }

    pub fn paypal_link(mut self, link: &str) -> BotBuilder {
        if !link.is_empty() {
            self.paypal_link = link.to_string();
        }
        self
    }

    pub fn preview_categories(mut self, limit: usize) -> BotBuilder {
        self.preview_categories = limit;
        self
    }

    pub fn build(self) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");
        if self.token.is_empty() {
            return Err("telegram bot token is not set".to_string());
        }

        Ok(Bot {
            token: self.token,
            allowed_users: self.allowed_users,
            paypal_link: self.paypal_link,
            preview_categories: self.preview_categories,
        })
    }
}
