//! MortalShop Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use teloxide::utils::command::BotCommands as TeloxideBotCommands;
use tracing::{error, info, warn};

use MortalShop::{
    config::Settings,
    handlers::{callbacks, commands, messages},
    services::{AdminForwarder, AttachmentStore, SubmissionStore},
    state::SessionStore,
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration and fail fast on missing token or admin id
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    logging::init_logging(&settings.logging)?;

    info!("Starting {}...", MortalShop::info());

    // Make sure the data directory exists before any flow completes
    tokio::fs::create_dir_all(&settings.storage.data_dir).await?;
    info!(data_dir = %settings.storage.data_dir, "User data directory ready");

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);

    // Initialize state and storage services
    let session_store = SessionStore::new();
    let attachments = AttachmentStore::new(&settings.storage.data_dir);
    let submissions = SubmissionStore::new(&settings.storage.data_dir, attachments.clone());
    let forwarder = AdminForwarder::new(
        bot.clone(),
        settings.bot.admin_id,
        submissions.clone(),
        attachments.clone(),
    );

    info!("Setting up bot handlers...");
    let handler = create_handler();

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![
            Arc::new(settings),
            session_store,
            attachments,
            submissions,
            forwarder
        ])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("MortalShop bot is ready!");
    dispatcher.dispatch().await;

    info!("MortalShop bot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    // Handle commands
                    dptree::entry()
                        .filter_command::<BotCommand>()
                        .endpoint(handle_commands),
                )
                .branch(
                    // Handle regular messages and uploads
                    dptree::endpoint(handle_messages),
                ),
        )
        .branch(
            // Handle callback queries
            Update::filter_callback_query().endpoint(handle_callbacks),
        )
}

#[derive(TeloxideBotCommands, Clone)]
#[command(rename_rule = "snake_case", description = "MortalShop Bot Commands")]
enum BotCommand {
    #[command(description = "Show the main menu")]
    Start,
    #[command(description = "Send your saved request to the administrator")]
    SendToAdmin,
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: BotCommand,
    session_store: SessionStore,
    forwarder: AdminForwarder,
) -> HandlerResult {
    let chat_id = msg.chat.id;

    let result = match cmd {
        BotCommand::Start => commands::handle_start(bot.clone(), msg, session_store).await,
        BotCommand::SendToAdmin => {
            commands::handle_send_to_admin(bot.clone(), msg, forwarder).await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Error handling command");
        let _ = bot.send_message(chat_id, e.user_message()).await;
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    session_store: SessionStore,
    attachments: AttachmentStore,
    submissions: SubmissionStore,
    settings: Arc<Settings>,
) -> HandlerResult {
    let chat_id = msg.chat.id;

    if let Err(e) = messages::handle_message(
        bot.clone(),
        msg,
        session_store,
        attachments,
        submissions,
        settings,
    )
    .await
    {
        error!(error = %e, "Error handling message");
        let _ = bot.send_message(chat_id, e.user_message()).await;
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: teloxide::types::CallbackQuery,
    session_store: SessionStore,
) -> HandlerResult {
    let chat_id = query.message.as_ref().map(|m| m.chat().id);

    if let Err(e) = callbacks::handle_callback_query(bot.clone(), query, session_store).await {
        error!(error = %e, "Error handling callback query");
        if let Some(chat_id) = chat_id {
            let _ = bot.send_message(chat_id, e.user_message()).await;
        }
    }

    Ok(())
}
