//! # Projectile Lifecycle
//!
//! Owns every projectile this client knows about.
//!
//! ## Ownership
//!
//! ```text
//! ┌──────────────────────────────┐   ┌──────────────────────────────────┐
//! │ LOCAL (fired here)           │   │ REMOTE (fired by a peer)         │
//! │ fixed slot table, ids 0..N   │   │ keyed by (owner index, slot id)  │
//! │ create/destroy go on the wire│   │ never re-broadcast, only drawn   │
//! └──────────────────────────────┘   └──────────────────────────────────┘
//! ```
//!
//! ## Slot Reuse
//!
//! A local slot id is reused only after its `ProjectileDestroy` frame has
//! been queued. Destroying an empty slot queues nothing.
//!
//! Frames are queued in an outbox; the caller drains it into a transport.

pub mod slots;

pub use slots::SlotTable;

use std::collections::BTreeMap;

use bulwark_networking::{Message, ProjectileCreate, ProjectileDestroy};
use bulwark_shared::Vec3;

use crate::config::CombatConfig;
use crate::error::{CombatError, CombatResult};
use crate::integration::{CombatEvent, EventPublisher};
use crate::shield::{self, DeflectionOutcome};

/// Slot identifier as it travels on the wire.
pub type SlotId = i32;

/// Who fired a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    /// Fired by this client. Lifecycle changes are broadcast.
    Local,
    /// Fired by a peer. This client only mirrors it.
    Remote,
}

/// Addresses one projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProjectileKey {
    /// One of our slots.
    Local(SlotId),
    /// A peer's slot.
    Remote {
        /// Owning player.
        owner_index: i32,
        /// Owner's slot.
        slot_id: SlotId,
    },
}

/// What a projectile ran into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    /// A player's shield.
    Shield,
    /// Anything else: walls, avatars, out-of-bounds volumes.
    Obstacle,
}

/// Result of a contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactOutcome {
    /// The shield turned the projectile; it lives on.
    Deflected(DeflectionOutcome),
    /// The projectile was removed.
    Destroyed,
    /// No such projectile (already gone).
    Missing,
}

/// A live projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    /// Owner's slot.
    pub slot_id: SlotId,
    /// Owning player.
    pub owner_index: i32,
    /// Local or mirrored.
    pub ownership: Ownership,
    /// Current position.
    pub position: Vec3,
    /// Current velocity.
    pub velocity: Vec3,
    /// Seconds left to live.
    pub time_to_live: f32,
    /// Set by the first shield reflection. A second shield contact destroys.
    pub has_resolved_shield: bool,
}

impl Projectile {
    /// Moves the projectile and counts down its life. Returns true once
    /// expired.
    fn advance(&mut self, dt: f32) -> bool {
        self.position = self.position + self.velocity * dt;
        self.time_to_live -= dt;
        self.time_to_live <= 0.0
    }

    /// Key addressing this projectile.
    #[must_use]
    pub const fn key(&self) -> ProjectileKey {
        match self.ownership {
            Ownership::Local => ProjectileKey::Local(self.slot_id),
            Ownership::Remote => ProjectileKey::Remote {
                owner_index: self.owner_index,
                slot_id: self.slot_id,
            },
        }
    }
}

/// Projectile lifecycle manager.
#[derive(Debug)]
pub struct ProjectileManager {
    /// Our projectiles.
    local: SlotTable<Projectile>,
    /// Peers' projectiles, keyed by (owner index, slot id).
    remote: BTreeMap<(i32, SlotId), Projectile>,
    /// Our player index, stamped into create frames.
    owner_index: i32,
    /// Speed applied to fire directions.
    speed: f32,
    /// Lifetime of every new projectile.
    time_to_live: f32,
    /// Frames waiting for the transport.
    outbox: Vec<Vec<u8>>,
    /// Event sink.
    events: EventPublisher<CombatEvent>,
}

impl ProjectileManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new(config: &CombatConfig, events: EventPublisher<CombatEvent>) -> Self {
        Self {
            local: SlotTable::new(config.slot_count),
            remote: BTreeMap::new(),
            owner_index: 0,
            speed: config.projectile_speed,
            time_to_live: config.projectile_ttl,
            outbox: Vec::new(),
            events,
        }
    }

    /// Sets the player index stamped into future create frames.
    pub fn set_owner_index(&mut self, owner_index: i32) {
        self.owner_index = owner_index;
    }

    /// Returns the player index stamped into create frames.
    #[inline]
    #[must_use]
    pub const fn owner_index(&self) -> i32 {
        self.owner_index
    }

    /// Number of live local projectiles.
    #[inline]
    #[must_use]
    pub const fn local_count(&self) -> usize {
        self.local.len()
    }

    /// Number of mirrored remote projectiles.
    #[inline]
    #[must_use]
    pub fn remote_count(&self) -> usize {
        self.remote.len()
    }

    /// Looks up a projectile.
    #[must_use]
    pub fn get(&self, key: ProjectileKey) -> Option<&Projectile> {
        match key {
            ProjectileKey::Local(slot_id) => self.local.get(usize::try_from(slot_id).ok()?),
            ProjectileKey::Remote {
                owner_index,
                slot_id,
            } => self.remote.get(&(owner_index, slot_id)),
        }
    }

    fn get_mut(&mut self, key: ProjectileKey) -> Option<&mut Projectile> {
        match key {
            ProjectileKey::Local(slot_id) => self.local.get_mut(usize::try_from(slot_id).ok()?),
            ProjectileKey::Remote {
                owner_index,
                slot_id,
            } => self.remote.get_mut(&(owner_index, slot_id)),
        }
    }

    /// Iterates every projectile, local first.
    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.local
            .iter()
            .map(|(_, p)| p)
            .chain(self.remote.values())
    }

    /// Fires a projectile from `position` along `direction`.
    ///
    /// Takes the lowest free slot, queues a `ProjectileCreate` frame, and
    /// returns the slot id.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::Full`] if every slot is taken. Nothing is
    /// created or queued.
    pub fn fire(&mut self, direction: Vec3, position: Vec3) -> CombatResult<SlotId> {
        let velocity = direction * self.speed;
        let owner_index = self.owner_index;
        let time_to_live = self.time_to_live;

        let index = self
            .local
            .insert_with(|index| Projectile {
                slot_id: index as SlotId,
                owner_index,
                ownership: Ownership::Local,
                position,
                velocity,
                time_to_live,
                has_resolved_shield: false,
            })
            .ok_or(CombatError::Full {
                capacity: self.local.capacity(),
            })?;
        let slot_id = index as SlotId;

        self.outbox.push(
            Message::from(ProjectileCreate {
                slot_id,
                owner_index,
                position,
                velocity,
            })
            .to_frame(),
        );
        self.events.publish(CombatEvent::ProjectileCreated {
            owner_index,
            slot_id,
            position,
            velocity,
        });
        tracing::debug!(slot_id, ?position, ?velocity, "fired");

        Ok(slot_id)
    }

    /// Destroys a local projectile and queues its `ProjectileDestroy` frame.
    ///
    /// Returns false, queuing nothing, if the slot was already empty.
    pub fn destroy(&mut self, slot_id: SlotId) -> bool {
        let Some(projectile) = usize::try_from(slot_id)
            .ok()
            .and_then(|index| self.local.remove(index))
        else {
            return false;
        };

        self.outbox
            .push(Message::from(ProjectileDestroy { slot_id }).to_frame());
        self.events.publish(CombatEvent::ProjectileDestroyed {
            owner_index: projectile.owner_index,
            slot_id,
        });
        tracing::debug!(slot_id, "destroyed");
        true
    }

    /// Advances every projectile by `dt` seconds.
    ///
    /// Expired local projectiles are destroyed (frame queued). Expired
    /// remote projectiles are dropped without touching the wire.
    pub fn tick(&mut self, dt: f32) {
        let expired: Vec<SlotId> = self
            .local
            .iter_mut()
            .filter_map(|(_, p)| p.advance(dt).then_some(p.slot_id))
            .collect();
        for slot_id in expired {
            tracing::debug!(slot_id, "expired");
            self.destroy(slot_id);
        }

        let events = &self.events;
        self.remote.retain(|_, p| {
            if p.advance(dt) {
                events.publish(CombatEvent::ProjectileDestroyed {
                    owner_index: p.owner_index,
                    slot_id: p.slot_id,
                });
                false
            } else {
                true
            }
        });
    }

    /// Mirrors a peer's projectile.
    ///
    /// A create for an (owner, slot) pair that is already mirrored replaces
    /// it: the owner only reuses a slot after destroying its occupant.
    pub fn spawn_remote(&mut self, create: ProjectileCreate) {
        let projectile = Projectile {
            slot_id: create.slot_id,
            owner_index: create.owner_index,
            ownership: Ownership::Remote,
            position: create.position,
            velocity: create.velocity,
            time_to_live: self.time_to_live,
            has_resolved_shield: false,
        };
        if self
            .remote
            .insert((create.owner_index, create.slot_id), projectile)
            .is_some()
        {
            tracing::debug!(
                owner = create.owner_index,
                slot_id = create.slot_id,
                "remote create replaced a live projectile"
            );
        }
        self.events.publish(CombatEvent::ProjectileCreated {
            owner_index: create.owner_index,
            slot_id: create.slot_id,
            position: create.position,
            velocity: create.velocity,
        });
    }

    /// Drops every mirrored projectile in `slot_id`, whoever owns it.
    ///
    /// Returns how many were removed.
    pub fn destroy_remote(&mut self, slot_id: SlotId) -> usize {
        let before = self.remote.len();
        let events = &self.events;
        self.remote.retain(|&(owner_index, slot), _| {
            if slot == slot_id {
                events.publish(CombatEvent::ProjectileDestroyed {
                    owner_index,
                    slot_id,
                });
                false
            } else {
                true
            }
        });
        before - self.remote.len()
    }

    /// Resolves a contact using the shield facing at contact time.
    ///
    /// Shield contacts go through deflection; a reflection updates the
    /// velocity and spends the one-shot flag. Every other contact, and a
    /// failed deflection, destroys the projectile.
    pub fn resolve_contact(
        &mut self,
        key: ProjectileKey,
        contact: Contact,
        shield_facing: f32,
    ) -> ContactOutcome {
        let Some(projectile) = self.get_mut(key) else {
            return ContactOutcome::Missing;
        };

        if contact == Contact::Shield {
            let outcome = shield::resolve(
                projectile.velocity,
                shield_facing,
                projectile.has_resolved_shield,
            );
            if let Some(velocity) = outcome.apply(projectile.velocity) {
                projectile.velocity = velocity;
                projectile.has_resolved_shield = true;
                let event = CombatEvent::ProjectileDeflected {
                    owner_index: projectile.owner_index,
                    slot_id: projectile.slot_id,
                    outcome,
                    velocity,
                };
                tracing::debug!(?key, ?outcome, "deflected");
                self.events.publish(event);
                return ContactOutcome::Deflected(outcome);
            }
        }

        self.remove(key);
        ContactOutcome::Destroyed
    }

    fn remove(&mut self, key: ProjectileKey) {
        match key {
            ProjectileKey::Local(slot_id) => {
                self.destroy(slot_id);
            }
            ProjectileKey::Remote {
                owner_index,
                slot_id,
            } => {
                if self.remote.remove(&(owner_index, slot_id)).is_some() {
                    self.events.publish(CombatEvent::ProjectileDestroyed {
                        owner_index,
                        slot_id,
                    });
                }
            }
        }
    }

    /// Takes every frame queued since the last drain, in order.
    #[must_use]
    pub fn drain_outbox(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.outbox)
    }
}
