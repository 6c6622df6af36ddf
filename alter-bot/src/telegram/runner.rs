//! Long-polling runner: resolves the bot identity, converts each teloxide
//! message to the core model, and hands it to the handler chain in a
//! spawned task so slow turns never block polling.

use std::sync::Arc;

use anyhow::Result;
use bot_core::HandlerChain;
use teloxide::prelude::*;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use super::{to_core_message, BotIdentity};

/// Starts the polling loop with the given teloxide Bot and handler chain.
/// `get_me` is called first to populate [`BotIdentity`] (mention and
/// reply-to-bot detection need it).
#[instrument(skip(bot, handler_chain, identity))]
pub async fn run_polling(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    identity: Arc<RwLock<BotIdentity>>,
) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => {
            let mut ident = identity.write().await;
            ident.username = me.user.username.clone();
            ident.id = Some(me.user.id.0 as i64);
            info!(username = ?ident.username, "bot identity resolved before polling");
        }
        Err(e) => error!(error = %e, "get_me failed; mention detection disabled until restart"),
    }

    let chain = handler_chain;
    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = chain.clone();
        let identity = identity.clone();

        async move {
            if msg.text().is_none() && msg.caption().is_none() {
                return Ok(());
            }
            let bot_user_id = identity.read().await.id;
            let core_msg = to_core_message(&msg, bot_user_id);
            info!(
                user_id = core_msg.user.id,
                chat_id = core_msg.chat.id,
                chat_type = core_msg.chat.kind.as_str(),
                "received message"
            );

            // Each message runs in its own task; turns across chats overlap.
            tokio::spawn(async move {
                if let Err(e) = chain.handle(&core_msg).await {
                    error!(error = %e, user_id = core_msg.user.id, "handler chain failed");
                }
            });

            Ok(())
        }
    })
    .await;

    Ok(())
}
