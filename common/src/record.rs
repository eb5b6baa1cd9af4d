use serde::{Deserialize, Serialize};

/// A stored registration, keyed externally by the normalized player name.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PlayerData {
    #[serde(rename = "registerdate")]
    pub register_date: i64,
    #[serde(rename = "logindate")]
    pub login_date: i64,
    #[serde(rename = "lastip")]
    pub last_ip: Option<String>,
    pub hash: String,
    pub ip: String,
    pub cid: i64,
    #[serde(rename = "skinhash")]
    pub skin_hash: String,
    pub pin: Option<i64>,
}

/// Selective changes to a stored record. `None` leaves a column untouched.
///
/// A `pin` of `Some(0)` clears the PIN instead of storing zero.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerUpdate {
    pub last_ip: Option<String>,
    pub ip: Option<String>,
    pub login_date: Option<i64>,
    pub cid: Option<i64>,
    pub skin_hash: Option<String>,
    pub pin: Option<i64>,
}

impl PlayerUpdate {
    pub fn is_empty(&self) -> bool {
        self.last_ip.is_none()
            && self.ip.is_none()
            && self.login_date.is_none()
            && self.cid.is_none()
            && self.skin_hash.is_none()
            && self.pin.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_data_uses_column_names() {
        let data = PlayerData {
            register_date: 10,
            login_date: 20,
            last_ip: None,
            hash: "abc123".to_string(),
            ip: "1.2.3.4".to_string(),
            cid: 99,
            skin_hash: "deadbeef".to_string(),
            pin: None,
        };

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "registerdate": 10,
                "logindate": 20,
                "lastip": null,
                "hash": "abc123",
                "ip": "1.2.3.4",
                "cid": 99,
                "skinhash": "deadbeef",
                "pin": null
            })
        );
    }

    #[test]
    fn test_update_is_empty() {
        assert!(PlayerUpdate::default().is_empty());

        let update = PlayerUpdate { pin: Some(0), ..Default::default() };
        assert!(!update.is_empty());
    }
}
