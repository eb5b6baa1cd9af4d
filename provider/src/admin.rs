use clap::Subcommand;
use simpleauth_common::{PlayerIdentity, PlayerUpdate};
use tracing::info;

use crate::{database::PlayerRecordStore, error::StoreError};

/// Operator commands. Every command acts on an offline identity.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    /// Print a player's record
    Show { name: String },
    /// Register a player with an already computed credential hash
    Register { name: String, hash: String },
    /// Remove a player's registration
    Unregister { name: String },
    /// Change selected columns of a player's record
    Update {
        name: String,
        #[arg(long)]
        last_ip: Option<String>,
        #[arg(long)]
        ip: Option<String>,
        #[arg(long)]
        login_date: Option<i64>,
        #[arg(long)]
        cid: Option<i64>,
        #[arg(long)]
        skin_hash: Option<String>,
        /// `0` clears the PIN
        #[arg(long)]
        pin: Option<i64>,
    },
}

/// Runs one command and returns the text to print.
pub async fn run(store: &PlayerRecordStore, command: AdminCommand) -> Result<String, StoreError> {
    match command {
        AdminCommand::Show { name } => {
            let player = PlayerIdentity::offline(&name);
            match store.get_player(&player).await? {
                Some(data) => Ok(to_json(&data)),
                None => Ok(format!("{} is not registered", player.normalized_name())),
            }
        }
        AdminCommand::Register { name, hash } => {
            let player = PlayerIdentity::offline(&name);
            let data = store.register_player(&player, &hash).await?;
            info!(name = %player.normalized_name(), "registered offline player");
            Ok(to_json(&data))
        }
        AdminCommand::Unregister { name } => {
            let player = PlayerIdentity::offline(&name);
            store.unregister_player(&player).await?;
            Ok(format!("{} unregistered", player.normalized_name()))
        }
        AdminCommand::Update { name, last_ip, ip, login_date, cid, skin_hash, pin } => {
            let player = PlayerIdentity::offline(&name);
            let update = PlayerUpdate { last_ip, ip, login_date, cid, skin_hash, pin };
            if update.is_empty() {
                return Ok("nothing to update".to_string());
            }
            store.update_player(&player, &update).await?;
            Ok(format!("{} updated", player.normalized_name()))
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unprintable record: {e}>"))
}
