//! API layer - host-facing entry points.

pub mod commands;
pub mod dispatcher;
pub mod packets;

pub use commands::{CommandSender, Reply, XRegionCommands};
pub use dispatcher::{Dispatcher, EventSender, HostEvent};
pub use packets::{Packet, PacketError, RawMessage};
