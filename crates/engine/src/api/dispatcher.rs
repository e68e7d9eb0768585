//! Host event dispatcher.
//!
//! The host's networking and game loop push typed [`HostEvent`]s into a
//! bounded channel; [`Dispatcher::run`] drains it in arrival order and routes
//! each event to its use case.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use xregions_domain::{PlayerId, RegionName};

use super::commands::{CommandSender, Reply, XRegionCommands};
use super::packets::{Packet, RawMessage};
use crate::infrastructure::ports::PlayerGateway;
use crate::use_cases::RegionEventUseCases;

/// Everything the host tells the policy engine about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    RegionEntered { player: PlayerId, region: RegionName },
    RegionLeft { player: PlayerId, region: RegionName },
    RegionDeleted { region: RegionName },
    NetMessage(RawMessage),
    WorldTick,
    PlayerDisconnected { player: PlayerId },
    Command { sender: CommandSender, args: Vec<String> },
}

pub type EventSender = mpsc::Sender<HostEvent>;

pub fn channel(buffer: usize) -> (EventSender, mpsc::Receiver<HostEvent>) {
    mpsc::channel(buffer.max(1))
}

pub struct Dispatcher {
    events: Arc<RegionEventUseCases>,
    commands: Arc<XRegionCommands>,
    players: Arc<dyn PlayerGateway>,
}

impl Dispatcher {
    pub fn new(
        events: Arc<RegionEventUseCases>,
        commands: Arc<XRegionCommands>,
        players: Arc<dyn PlayerGateway>,
    ) -> Self {
        Self {
            events,
            commands,
            players,
        }
    }

    /// Consume events until every sender is dropped or `cancel` fires.
    pub async fn run(&self, mut rx: mpsc::Receiver<HostEvent>, cancel: CancellationToken) {
        tracing::info!("Region event dispatcher started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Region event dispatcher shutting down");
                    break;
                }
                event = rx.recv() => match event {
                    Some(event) => self.handle(event).await,
                    None => {
                        tracing::info!("All event senders dropped, dispatcher stopping");
                        break;
                    }
                },
            }
        }
    }

    /// Route a single event. Usable directly when the host calls in from
    /// its own tasks instead of through the channel.
    pub async fn handle(&self, event: HostEvent) {
        match event {
            HostEvent::RegionEntered { player, region } => {
                self.events.enter_region.execute(player, &region).await;
            }
            HostEvent::RegionLeft { player, region } => {
                self.events.leave_region.execute(player, &region).await;
            }
            HostEvent::RegionDeleted { region } => {
                if let Err(e) = self.events.delete_region.execute(&region).await {
                    tracing::error!(region = %region, error = %e, "Failed to drop policy of deleted region");
                }
            }
            HostEvent::NetMessage(message) => self.handle_net_message(message).await,
            HostEvent::WorldTick => {
                self.events.suppress_mobs.execute().await;
            }
            HostEvent::PlayerDisconnected { player } => {
                self.events.player_disconnect.execute(player).await;
            }
            HostEvent::Command { sender, args } => {
                let replies = self.commands.execute(sender, &args).await;
                self.deliver(sender, replies);
            }
        }
    }

    async fn handle_net_message(&self, message: RawMessage) {
        if message.handled {
            return;
        }

        match Packet::decode(&message) {
            Ok(Some(Packet::TogglePvp { player, pvp })) => {
                self.events.toggle_pvp.execute(player, pvp).await;
            }
            Ok(Some(Packet::PlayerHurt { player })) => {
                self.events.player_hurt.execute(player).await;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed network message");
            }
        }
    }

    fn deliver(&self, sender: CommandSender, replies: Vec<Reply>) {
        match sender {
            CommandSender::Player(player) => {
                for reply in replies {
                    self.players.send_message(player, reply.kind, &reply.text);
                }
            }
            CommandSender::Console => {
                for reply in replies {
                    tracing::info!(target: "xregions::console", kind = ?reply.kind, "{}", reply.text);
                }
            }
        }
    }
}
