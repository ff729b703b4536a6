//! # Client Simulation
//!
//! One client's combat state, advanced by an explicit tick.
//!
//! ## Tick Order
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ 1. Shield: take intent, turn toward target                 │
//! │ 2. Avatar: move, update aim, count down cooldown           │
//! │ 3. Fire (if requested and allowed)                         │
//! │ 4. Projectiles: move, count down TTL, expire               │
//! │ 5. Flush outbox → transport                                │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Received frames and contacts are handled between ticks through
//! [`ClientSimulation::on_receive`] and [`ClientSimulation::on_contact`].

use bulwark_networking::{ClientState, GameClient, Inbound, Transport};
use bulwark_shared::Vec3;

use crate::avatar::Avatar;
use crate::config::CombatConfig;
use crate::error::CombatError;
use crate::integration::{Clock, CombatEvent, EventPublisher, InputSource};
use crate::projectiles::{Contact, ContactOutcome, ProjectileKey, ProjectileManager};
use crate::shield::ShieldController;

/// Simulation counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Ticks run.
    pub ticks: u64,
    /// Projectiles fired.
    pub shots_fired: u64,
    /// Shots suppressed because every slot was taken.
    pub shots_suppressed: u64,
    /// Frames the transport refused.
    pub send_failures: u64,
}

/// A client's combat simulation.
pub struct ClientSimulation<T: Transport> {
    session: GameClient,
    transport: T,
    shield: ShieldController,
    avatar: Avatar,
    projectiles: ProjectileManager,
    events: EventPublisher<CombatEvent>,
    stats: SimulationStats,
}

impl<T: Transport> ClientSimulation<T> {
    /// Creates a simulation with its avatar at `spawn`.
    #[must_use]
    pub fn new(
        config: &CombatConfig,
        spawn: Vec3,
        transport: T,
        events: EventPublisher<CombatEvent>,
    ) -> Self {
        Self {
            session: GameClient::new(),
            transport,
            shield: ShieldController::new(config.shield_angular_speed, config.frame_time),
            avatar: Avatar::new(spawn, config),
            projectiles: ProjectileManager::new(config, events.clone()),
            events,
            stats: SimulationStats::default(),
        }
    }

    /// Sends the connect request.
    pub fn connect(&mut self) {
        let frame = self.session.create_connect_frame();
        self.send(&frame);
    }

    /// Session state.
    #[must_use]
    pub const fn session(&self) -> &GameClient {
        &self.session
    }

    /// Shield state.
    #[must_use]
    pub const fn shield(&self) -> &ShieldController {
        &self.shield
    }

    /// Avatar state.
    #[must_use]
    pub const fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    /// Projectile state.
    #[must_use]
    pub const fn projectiles(&self) -> &ProjectileManager {
        &self.projectiles
    }

    /// Counters.
    #[must_use]
    pub const fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// The transport, for the driver to pull received frames from.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Advances the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32, input: &impl InputSource) {
        self.step(dt, dt, input);
    }

    /// Advances one fixed step of `clock`.
    ///
    /// The shield turns by the clock's measured frame time; movement,
    /// cooldowns and projectiles advance by its fixed step.
    pub fn advance(&mut self, clock: &impl Clock, input: &impl InputSource) {
        self.step(clock.delta_time(), clock.fixed_delta_time(), input);
    }

    fn step(&mut self, frame_dt: f32, dt: f32, input: &impl InputSource) {
        self.stats.ticks += 1;

        // 1. Shield
        self.shield.set_input(input.directional_flags());
        if let Some(angle) = self.shield.update(frame_dt) {
            self.events.publish(CombatEvent::ShieldFacingChanged { angle });
        }

        // 2. Avatar
        self.avatar.update(dt, input.movement_axes());

        // 3. Fire
        if input.fire_requested() {
            match self.avatar.fire(&mut self.projectiles) {
                Ok(Some(_)) => self.stats.shots_fired += 1,
                Ok(None) => {}
                Err(CombatError::Full { capacity }) => {
                    self.stats.shots_suppressed += 1;
                    tracing::debug!(capacity, "all projectile slots busy, shot suppressed");
                }
            }
        }

        // 4. Projectiles
        self.projectiles.tick(dt);

        // 5. Flush
        self.flush();
    }

    /// Handles one frame from the transport.
    pub fn on_receive(&mut self, frame: &[u8]) {
        let inbound = self.session.handle_frame(frame);

        if self.session.state() == ClientState::Connected {
            if let Some(index) = self.session.player_index() {
                if index != self.projectiles.owner_index() {
                    self.projectiles.set_owner_index(index);
                }
            }
        }

        match inbound {
            Some(Inbound::ProjectileCreate(create)) => self.projectiles.spawn_remote(create),
            Some(Inbound::ProjectileDestroy(destroy)) => {
                self.projectiles.destroy_remote(destroy.slot_id);
            }
            None => {}
        }
    }

    /// Reports a contact found by the physics layer.
    pub fn on_contact(&mut self, key: ProjectileKey, contact: Contact) -> ContactOutcome {
        let outcome = self
            .projectiles
            .resolve_contact(key, contact, self.shield.current());
        self.flush();
        outcome
    }

    fn flush(&mut self) {
        for frame in self.projectiles.drain_outbox() {
            self.send(&frame);
        }
    }

    fn send(&mut self, frame: &[u8]) {
        if let Err(e) = self.transport.send(frame) {
            self.stats.send_failures += 1;
            tracing::warn!(error = %e, len = frame.len(), "failed to send frame");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::{EventChannel, InputFrame};
    use crate::shield::DirectionalFlags;
    use bulwark_networking::{
        ChannelTransport, Message, MessageType, PlayerIdAssignment, ProjectileCreate,
        ProjectileDestroy, TransportError,
    };
    use bulwark_shared::FRAME_TIME;

    /// Transport that records frames, optionally refusing them.
    #[derive(Default)]
    struct Recorder {
        sent: Vec<Vec<u8>>,
        refuse: bool,
    }

    impl Transport for Recorder {
        fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
            if self.refuse {
                return Err(TransportError::QueueFull);
            }
            self.sent.push(frame.to_vec());
            Ok(())
        }
    }

    fn simulation() -> (ClientSimulation<Recorder>, EventChannel<CombatEvent>) {
        let events = EventChannel::new(256);
        let sim = ClientSimulation::new(
            &CombatConfig::default(),
            Vec3::ZERO,
            Recorder::default(),
            events.publisher(),
        );
        (sim, events)
    }

    fn sent_kinds(sim: &mut ClientSimulation<Recorder>) -> Vec<MessageType> {
        std::mem::take(&mut sim.transport_mut().sent)
            .iter()
            .map(|f| Message::from_frame(f).unwrap().kind())
            .collect()
    }

    #[test]
    fn test_connect_sends_request() {
        let (mut sim, _) = simulation();
        sim.connect();
        assert_eq!(sent_kinds(&mut sim), vec![MessageType::ConnectRequest]);
        assert_eq!(sim.session().state(), ClientState::Connecting);
    }

    #[test]
    fn test_assignment_stamps_owner_index() {
        let (mut sim, _) = simulation();
        sim.connect();
        sim.on_receive(&Message::from(PlayerIdAssignment { player_index: 3 }).to_frame());
        assert_eq!(sim.projectiles().owner_index(), 3);

        sim.tick(FRAME_TIME, &InputFrame::firing());
        let frame = sim.transport_mut().sent.pop().unwrap();
        match Message::from_frame(&frame).unwrap() {
            Message::ProjectileCreate(create) => assert_eq!(create.owner_index, 3),
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let (mut sim, _) = simulation();
        for _ in 0..30 {
            sim.tick(FRAME_TIME, &InputFrame::firing());
        }
        assert_eq!(sim.stats().shots_fired, 1);
        assert_eq!(sent_kinds(&mut sim), vec![MessageType::ProjectileCreate]);
    }

    #[test]
    fn test_projectile_expires_with_destroy_frame() {
        let (mut sim, _) = simulation();
        sim.tick(FRAME_TIME, &InputFrame::firing());
        for _ in 0..(5 * 60 + 2) {
            sim.tick(FRAME_TIME, &InputFrame::IDLE);
        }
        assert_eq!(
            sent_kinds(&mut sim),
            vec![MessageType::ProjectileCreate, MessageType::ProjectileDestroy]
        );
        assert_eq!(sim.projectiles().local_count(), 0);
    }

    #[test]
    fn test_shield_turn_publishes_events() {
        let (mut sim, events) = simulation();
        let input = InputFrame {
            shield: DirectionalFlags::new(false, true, false, false),
            ..InputFrame::IDLE
        };
        for _ in 0..40 {
            sim.tick(FRAME_TIME, &input);
        }
        assert!((sim.shield().current() - 90.0).abs() < 1e-3);

        let turns: Vec<f32> = events
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                CombatEvent::ShieldFacingChanged { angle } => Some(angle),
                _ => None,
            })
            .collect();
        assert!(!turns.is_empty());
        assert!((turns.last().copied().unwrap() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_remote_projectile_mirrored_and_deflected_quietly() {
        let (mut sim, _) = simulation();
        sim.on_receive(&Message::from(PlayerIdAssignment { player_index: 0 }).to_frame());
        sim.on_receive(
            &Message::from(ProjectileCreate {
                slot_id: 1,
                owner_index: 1,
                position: Vec3::new(0.0, 0.0, 10.0),
                velocity: Vec3::new(-20.0, 0.0, 0.0),
            })
            .to_frame(),
        );
        assert_eq!(sim.projectiles().remote_count(), 1);

        // Shield faces 0, projectile heads 180: head-on
        let key = ProjectileKey::Remote {
            owner_index: 1,
            slot_id: 1,
        };
        assert!(matches!(
            sim.on_contact(key, Contact::Shield),
            ContactOutcome::Deflected(_)
        ));
        assert!(sim.transport_mut().sent.is_empty());

        sim.on_receive(&Message::from(ProjectileDestroy { slot_id: 1 }).to_frame());
        assert_eq!(sim.projectiles().remote_count(), 0);
    }

    #[test]
    fn test_obstacle_contact_broadcasts_destroy() {
        let (mut sim, _) = simulation();
        sim.tick(FRAME_TIME, &InputFrame::firing());
        let _ = sent_kinds(&mut sim);

        assert_eq!(
            sim.on_contact(ProjectileKey::Local(0), Contact::Obstacle),
            ContactOutcome::Destroyed
        );
        assert_eq!(sent_kinds(&mut sim), vec![MessageType::ProjectileDestroy]);
    }

    #[test]
    fn test_send_failures_are_counted_not_fatal() {
        let (mut sim, _) = simulation();
        sim.transport_mut().refuse = true;
        sim.tick(FRAME_TIME, &InputFrame::firing());
        assert_eq!(sim.stats().send_failures, 1);
        assert_eq!(sim.projectiles().local_count(), 1);
    }

    /// Clock whose frame time runs long against its fixed step.
    struct Stutter;

    impl Clock for Stutter {
        fn delta_time(&self) -> f32 {
            0.1
        }

        fn fixed_delta_time(&self) -> f32 {
            FRAME_TIME
        }
    }

    #[test]
    fn test_snap_threshold_follows_config() {
        let events = EventChannel::new(16);
        let config = CombatConfig {
            shield_angular_speed: 90.0,
            frame_time: 0.05,
            ..CombatConfig::default()
        };
        let sim = ClientSimulation::new(&config, Vec3::ZERO, Recorder::default(), events.publisher());
        assert!((sim.shield().snap_threshold() - 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_advance_splits_frame_and_fixed_time() {
        let (mut sim, _) = simulation();
        let input = InputFrame {
            shield: DirectionalFlags::new(false, true, false, false),
            movement: (1.0, 0.0),
            ..InputFrame::IDLE
        };

        sim.advance(&Stutter, &input);
        // Shield turned by 180 deg/s * 0.1 s
        assert!((sim.shield().current() - 18.0).abs() < 1e-3);
        // Avatar moved by 10 u/s * 1/60 s
        assert!((sim.avatar().position().x - 10.0 * FRAME_TIME).abs() < 1e-4);

        for _ in 0..10 {
            sim.advance(&Stutter, &input);
        }
        assert_eq!(sim.shield().current().to_bits(), sim.shield().target().to_bits());
        assert_eq!(sim.stats().ticks, 11);
    }

    #[test]
    fn test_loopback_transport_carries_frames() {
        let (near, mut far) = ChannelTransport::pair(16);
        let events = EventChannel::new(64);
        let mut sim = ClientSimulation::new(
            &CombatConfig::default(),
            Vec3::ZERO,
            near,
            events.publisher(),
        );
        sim.connect();
        assert_eq!(far.recv(), Some(vec![0]));
    }
}
