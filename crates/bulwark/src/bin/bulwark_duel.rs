//! # Bulwark Duel
//!
//! A relay server and two clients wired together over loopback transports.
//!
//! West fires one shot north at East. East holds its shield toward West,
//! sees the shot reflect on its screen, and then sees it vanish when the
//! owner's copy hits the arena wall.
//!
//! Run with: `RUST_LOG=debug cargo run --bin bulwark_duel [config.toml]`

use std::process::ExitCode;

use bulwark::{
    ClientSimulation, Clock, CombatConfig, CombatEvent, Contact, DirectionalFlags, EventChannel,
    InputFrame, Ownership, TickLoop,
};
use bulwark_networking::{
    ChannelTransport, PeerId, RelayServer, ServerCommand, ServerConfig, Transport,
};
use bulwark_shared::Vec3;
use crossbeam_channel::Receiver;

/// Radius around an avatar where its shield catches projectiles.
const SHIELD_RADIUS: f32 = 2.0;

/// Half the side of the square arena.
const ARENA_HALF_EXTENT: f32 = 50.0;

/// Demo length in seconds.
const DUEL_SECONDS: f32 = 4.0;

/// Tick on which West pulls the trigger.
const FIRE_TICK: u64 = 30;

struct Player {
    name: &'static str,
    peer: PeerId,
    /// Server's end of this player's loopback link.
    link: ChannelTransport,
    sim: ClientSimulation<ChannelTransport>,
    events: EventChannel<CombatEvent>,
}

impl Player {
    fn new(name: &'static str, peer: PeerId, spawn: Vec3, config: &CombatConfig) -> Self {
        let (client_end, server_end) = ChannelTransport::pair(64);
        let events = EventChannel::new(config.event_capacity);
        let sim = ClientSimulation::new(config, spawn, client_end, events.publisher());
        Self {
            name,
            peer,
            link: server_end,
            sim,
            events,
        }
    }

    fn receive(&mut self) {
        while let Some(frame) = self.sim.transport_mut().recv() {
            self.sim.on_receive(&frame);
        }
    }

    /// Stand-in physics: shield hits on mirrored shots, wall hits on our own.
    fn detect_contacts(&mut self) {
        let avatar = self.sim.avatar().position();
        let contacts: Vec<_> = self
            .sim
            .projectiles()
            .iter()
            .filter_map(|p| {
                let shield_hit = p.ownership == Ownership::Remote
                    && !p.has_resolved_shield
                    && (p.position - avatar).length() < SHIELD_RADIUS;
                let wall_hit = p.ownership == Ownership::Local
                    && (p.position.x.abs() > ARENA_HALF_EXTENT
                        || p.position.z.abs() > ARENA_HALF_EXTENT);
                if shield_hit {
                    Some((p.key(), Contact::Shield))
                } else if wall_hit {
                    Some((p.key(), Contact::Obstacle))
                } else {
                    None
                }
            })
            .collect();

        for (key, contact) in contacts {
            let outcome = self.sim.on_contact(key, contact);
            tracing::info!("[{}] {:?} contact on {:?}: {:?}", self.name, contact, key, outcome);
        }
    }

    fn report_events(&self) {
        for event in self.events.drain() {
            match event {
                CombatEvent::ShieldFacingChanged { angle } => {
                    tracing::debug!("[{}] shield facing {:.1}", self.name, angle);
                }
                other => tracing::info!("[{}] {:?}", self.name, other),
            }
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config() -> Result<CombatConfig, bulwark::ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => CombatConfig::load(path),
        None => Ok(CombatConfig::default()),
    }
}

/// Moves frames between the players and the server.
fn route(server: &mut RelayServer, commands: &Receiver<ServerCommand>, players: &mut [Player]) {
    for player in players.iter_mut() {
        for frame in player.link.drain() {
            server.handle_frame(player.peer, &frame);
        }
    }

    for ServerCommand::Send { peer, frame } in commands.try_iter() {
        let Some(player) = players.iter_mut().find(|p| p.peer == peer) else {
            tracing::warn!(%peer, "command for unknown peer");
            continue;
        };
        if let Err(e) = player.link.send(&frame) {
            tracing::warn!(%peer, error = %e, "link refused frame");
        }
    }

    for player in players.iter_mut() {
        player.receive();
    }
}

fn main() -> ExitCode {
    init_tracing();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (mut server, commands) = RelayServer::new(&ServerConfig::default());
    let mut players = [
        Player::new("west", PeerId(1), Vec3::ZERO, &config),
        Player::new("east", PeerId(2), Vec3::new(0.0, 0.0, 30.0), &config),
    ];
    for player in &mut players {
        player.sim.connect();
    }

    // East holds its shield toward -Z, facing West
    let east_input = InputFrame {
        shield: DirectionalFlags::new(false, true, false, false),
        ..InputFrame::IDLE
    };

    let mut clock = TickLoop::new(bulwark_shared::TICK_RATE);
    let total_ticks = (DUEL_SECONDS / clock.fixed_delta_time()).ceil() as u64;
    tracing::info!("Duel starting: {} ticks", total_ticks);

    while clock.tick_count() < total_ticks {
        while clock.should_tick() && clock.tick_count() < total_ticks {
            let start = clock.begin_tick();

            route(&mut server, &commands, &mut players);

            let west_input = if clock.tick_count() == FIRE_TICK {
                InputFrame::firing()
            } else {
                InputFrame::IDLE
            };
            players[0].sim.advance(&clock, &west_input);
            players[1].sim.advance(&clock, &east_input);

            for player in &mut players {
                player.detect_contacts();
                player.report_events();
            }

            clock.end_tick(start);
        }
        clock.wait_for_next_tick();
    }

    // Deliver whatever the last tick produced
    route(&mut server, &commands, &mut players);
    for player in &players {
        player.report_events();
        let stats = player.sim.stats();
        tracing::info!(
            "[{}] index {:?}, fired {}, suppressed {}, send failures {}, live {}/{}",
            player.name,
            player.sim.session().player_index(),
            stats.shots_fired,
            stats.shots_suppressed,
            stats.send_failures,
            player.sim.projectiles().local_count(),
            player.sim.projectiles().remote_count(),
        );
    }
    let server_stats = server.stats();
    tracing::info!(
        "Server: {} players, {} frames relayed, {} dropped",
        server.player_count(),
        server_stats.frames_relayed,
        server_stats.frames_dropped,
    );
    let tick_stats = clock.stats();
    tracing::info!(
        "Ticks: {} run, avg {}us, max {}us, {} late, {} dropped",
        tick_stats.total_ticks,
        tick_stats.avg_tick_us,
        tick_stats.max_tick_us,
        tick_stats.late_ticks,
        tick_stats.dropped_ticks,
    );

    ExitCode::SUCCESS
}
