use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

pub const OFFLINE_IP: &str = "0.0.0.0";
pub const OFFLINE_CLIENT_ID: i64 = 0;
pub const OFFLINE_SKIN_HASH: &str = "0";

/// Whitespace stripped from both ends of a name. Other Unicode spaces are kept.
const NAME_TRIM_CHARS: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Storage key for a player name: ASCII letters lower-cased, surrounding
/// ASCII whitespace and NUL removed. Non-ASCII characters are stored as-is,
/// matching keys already written by the plugin.
pub fn normalize_name(name: &str) -> String {
    name.to_ascii_lowercase().trim_matches(NAME_TRIM_CHARS).to_string()
}

/// Lowercase hex MD5 of a skin payload.
pub fn skin_checksum(skin_data: &[u8]) -> String {
    hex::encode(Md5::digest(skin_data))
}

/// A player with a live connection to the game server.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OnlinePlayer {
    pub name: String,
    pub address: String,
    pub client_id: i64,
    pub skin_hash: String,
}

impl OnlinePlayer {
    pub fn with_skin_data(name: &str, address: &str, client_id: i64, skin_data: &[u8]) -> Self {
        OnlinePlayer {
            name: name.to_string(),
            address: address.to_string(),
            client_id,
            skin_hash: skin_checksum(skin_data),
        }
    }
}

/// A player known only by name, e.g. one registered by an administrator.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OfflinePlayer {
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum PlayerIdentity {
    #[serde(rename = "online")]
    Online(OnlinePlayer),
    #[serde(rename = "offline")]
    Offline(OfflinePlayer),
}

/// Connection details written alongside a registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionFields {
    pub ip: String,
    pub cid: i64,
    pub skin_hash: String,
}

impl PlayerIdentity {
    pub fn online(name: &str, address: &str, client_id: i64, skin_hash: &str) -> Self {
        PlayerIdentity::Online(OnlinePlayer {
            name: name.to_string(),
            address: address.to_string(),
            client_id,
            skin_hash: skin_hash.to_string(),
        })
    }

    pub fn offline(name: &str) -> Self {
        PlayerIdentity::Offline(OfflinePlayer { name: name.to_string() })
    }

    pub fn name(&self) -> &str {
        match self {
            PlayerIdentity::Online(player) => &player.name,
            PlayerIdentity::Offline(player) => &player.name,
        }
    }

    pub fn normalized_name(&self) -> String {
        normalize_name(self.name())
    }

    pub fn is_online(&self) -> bool {
        matches!(self, PlayerIdentity::Online(_))
    }

    /// Real session values for online players, sentinels for offline ones.
    pub fn session_fields(&self) -> SessionFields {
        match self {
            PlayerIdentity::Online(player) => SessionFields {
                ip: player.address.clone(),
                cid: player.client_id,
                skin_hash: player.skin_hash.clone(),
            },
            PlayerIdentity::Offline(_) => SessionFields {
                ip: OFFLINE_IP.to_string(),
                cid: OFFLINE_CLIENT_ID,
                skin_hash: OFFLINE_SKIN_HASH.to_string(),
            },
        }
    }
}

impl From<OnlinePlayer> for PlayerIdentity {
    fn from(player: OnlinePlayer) -> Self {
        PlayerIdentity::Online(player)
    }
}

impl From<OfflinePlayer> for PlayerIdentity {
    fn from(player: OfflinePlayer) -> Self {
        PlayerIdentity::Offline(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Alice"), "alice");
        assert_eq!(normalize_name(" ALICE "), "alice");
        assert_eq!(normalize_name("\talice\n"), "alice");
        assert_eq!(normalize_name("Steve Jobs"), "steve jobs");
        assert_eq!(normalize_name("\0\x0Bbob\r"), "bob");
    }

    #[test]
    fn test_normalize_name_keeps_non_ascii() {
        assert_eq!(normalize_name("ÉLISE"), "Élise");
        assert_eq!(normalize_name("Élise"), "Élise");
        assert_eq!(normalize_name("ÉLISE\u{a0}"), "Élise\u{a0}");
        assert_eq!(normalize_name(" \u{a0}Bob"), "\u{a0}bob");
    }

    #[test]
    fn test_skin_checksum_is_md5_hex() {
        assert_eq!(skin_checksum(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(skin_checksum(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_offline_session_uses_sentinels() {
        let fields = PlayerIdentity::offline("Herobrine").session_fields();
        assert_eq!(fields.ip, "0.0.0.0");
        assert_eq!(fields.cid, 0);
        assert_eq!(fields.skin_hash, "0");
    }

    #[test]
    fn test_online_session_uses_connection_details() {
        let player = OnlinePlayer::with_skin_data("Bob", "1.2.3.4", 99, b"abc");
        let identity = PlayerIdentity::from(player);

        assert!(identity.is_online());
        assert_eq!(identity.normalized_name(), "bob");

        let fields = identity.session_fields();
        assert_eq!(fields.ip, "1.2.3.4");
        assert_eq!(fields.cid, 99);
        assert_eq!(fields.skin_hash, "900150983cd24fb0d6963f7d28e17f72");
    }
}
