mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "budget_wizard={level},telegram_bot={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let Some(telegram) = settings.telegram else {
        return Err("no [telegram] section in settings.toml, nothing to run".into());
    };

    let preview_categories = settings
        .report
        .preview_categories
        .unwrap_or(engine::DEFAULT_PREVIEW_CATEGORIES);

    tasks.spawn(async move {
        tracing::info!("Found telegram settings...");
        let mut builder = telegram_bot::Bot::builder()
            .token(&telegram.token)
            .allowed_users(telegram.allowed_users)
            .preview_categories(preview_categories);
        if let Some(link) = telegram.paypal_link.as_deref() {
            builder = builder.paypal_link(link);
        }
        match builder.build() {
            Ok(bot) => bot.run().await,
            Err(err) => tracing::error!("failed to initialize telegram bot: {err}"),
        }
    });

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}
