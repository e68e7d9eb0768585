//! Raw network message decoding.
//!
//! Only the two message types the policy engine reacts to are decoded;
//! everything else is passed over.

use xregions_domain::PlayerId;

/// Message discriminant for a player's PvP toggle.
pub const MSG_TOGGLE_PVP: u8 = 30;
/// Message discriminant for a player taking damage.
pub const MSG_PLAYER_HURT: u8 = 117;

/// A network message as handed over by the host, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub msg_id: u8,
    pub payload: Vec<u8>,
    /// Already consumed by another handler upstream.
    pub handled: bool,
}

impl RawMessage {
    pub fn new(msg_id: u8, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            msg_id,
            payload: payload.into(),
            handled: false,
        }
    }

    pub fn handled(mut self) -> Self {
        self.handled = true;
        self
    }
}

/// Decoded messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packet {
    TogglePvp { player: PlayerId, pvp: bool },
    /// Only the leading player slot is read; the damage fields that follow
    /// are irrelevant here.
    PlayerHurt { player: PlayerId },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PacketError {
    #[error("Message {msg_id} truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        msg_id: u8,
        expected: usize,
        actual: usize,
    },
}

impl Packet {
    /// Decode a raw message. `Ok(None)` for message types nobody here cares
    /// about.
    pub fn decode(message: &RawMessage) -> Result<Option<Self>, PacketError> {
        let payload = message.payload.as_slice();
        match message.msg_id {
            MSG_TOGGLE_PVP => match payload {
                [player, pvp, ..] => Ok(Some(Packet::TogglePvp {
                    player: PlayerId::new(*player),
                    pvp: *pvp != 0,
                })),
                _ => Err(truncated(message.msg_id, 2, payload.len())),
            },
            MSG_PLAYER_HURT => match payload.first() {
                Some(player) => Ok(Some(Packet::PlayerHurt {
                    player: PlayerId::new(*player),
                })),
                None => Err(truncated(message.msg_id, 1, 0)),
            },
            _ => Ok(None),
        }
    }
}

fn truncated(msg_id: u8, expected: usize, actual: usize) -> PacketError {
    PacketError::Truncated {
        msg_id,
        expected,
        actual,
    }
}
