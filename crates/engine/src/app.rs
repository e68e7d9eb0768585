//! Application state and composition.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use xregions_domain::PolicyError;

use crate::api::commands::XRegionCommands;
use crate::api::dispatcher::{self, Dispatcher, EventSender};
use crate::infrastructure::{
    clock::SystemClock,
    config::EngineConfig,
    ports::{ClockPort, GroupDirectory, PlayerGateway, PolicyRepo, RegionEngine, WorldGateway},
    sqlite::SqlitePolicyRepo,
};
use crate::stores::{PolicyStore, SessionStore};
use crate::use_cases::region_events::{
    DeleteRegion, EnterRegion, LeaveRegion, PlayerDisconnect, PlayerHurt, SuppressMobs, TogglePvp,
};
use crate::use_cases::RegionEventUseCases;

/// The host game server, as seen through its ports.
#[derive(Clone)]
pub struct HostPorts {
    pub regions: Arc<dyn RegionEngine>,
    pub groups: Arc<dyn GroupDirectory>,
    pub players: Arc<dyn PlayerGateway>,
    pub world: Arc<dyn WorldGateway>,
}

/// Main application state.
pub struct App {
    pub config: EngineConfig,
    pub policies: Arc<PolicyStore>,
    pub sessions: Arc<SessionStore>,
    pub region_events: Arc<RegionEventUseCases>,
    pub commands: Arc<XRegionCommands>,
    pub dispatcher: Arc<Dispatcher>,
}

impl App {
    /// Wire everything together. Nothing is loaded yet.
    pub fn new(
        config: EngineConfig,
        repo: Arc<dyn PolicyRepo>,
        host: HostPorts,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let policies = Arc::new(PolicyStore::new(repo, host.regions.clone()));
        let sessions = Arc::new(SessionStore::new());

        let region_events = Arc::new(RegionEventUseCases {
            enter_region: Arc::new(EnterRegion::new(
                policies.clone(),
                sessions.clone(),
                host.players.clone(),
            )),
            leave_region: Arc::new(LeaveRegion::new(
                policies.clone(),
                sessions.clone(),
                host.players.clone(),
            )),
            delete_region: Arc::new(DeleteRegion::new(policies.clone())),
            toggle_pvp: Arc::new(TogglePvp::new(
                policies.clone(),
                host.regions.clone(),
                host.players.clone(),
            )),
            player_hurt: Arc::new(PlayerHurt::new(
                policies.clone(),
                host.regions.clone(),
                host.players.clone(),
            )),
            suppress_mobs: Arc::new(
                SuppressMobs::new(
                    policies.clone(),
                    host.world.clone(),
                    clock,
                    config.tick_interval,
                )
                .with_stop_after_first(config.tick_stop_after_first_suppression),
            ),
            player_disconnect: Arc::new(PlayerDisconnect::new(
                sessions.clone(),
                host.players.clone(),
            )),
        });

        let commands = Arc::new(XRegionCommands::new(
            policies.clone(),
            host.regions.clone(),
            host.groups.clone(),
            host.players.clone(),
            config.command_specifier.clone(),
        ));

        let dispatcher = Arc::new(Dispatcher::new(
            region_events.clone(),
            commands.clone(),
            host.players,
        ));

        Self {
            config,
            policies,
            sessions,
            region_events,
            commands,
            dispatcher,
        }
    }

    /// Open the SQLite store and load every policy.
    ///
    /// # Errors
    ///
    /// `PolicyError::StorageUnavailable` if the database can't be opened or
    /// read. The host should refuse to enable the plugin in that case rather
    /// than run with an empty catalog.
    pub async fn initialize(config: EngineConfig, host: HostPorts) -> Result<Self, PolicyError> {
        tracing::info!(db = %config.db_path, "Opening region policy database");
        let repo = SqlitePolicyRepo::connect(&config.db_path)
            .await
            .map_err(|e| PolicyError::StorageUnavailable(e.to_string()))?;

        let app = Self::new(config, Arc::new(repo), host, Arc::new(SystemClock::new()));
        app.policies
            .load_all()
            .await
            .map_err(|e| PolicyError::StorageUnavailable(e.to_string()))?;
        Ok(app)
    }

    /// Spawn the dispatcher on the current runtime.
    ///
    /// Feed host events into the returned sender; cancel `shutdown` (or drop
    /// every sender) to stop.
    pub fn start(&self, shutdown: CancellationToken) -> (EventSender, JoinHandle<()>) {
        let (tx, rx) = dispatcher::channel(self.config.event_buffer);
        let dispatcher = self.dispatcher.clone();
        let handle = tokio::spawn(async move { dispatcher.run(rx, shutdown).await });
        (tx, handle)
    }
}
