//! # Lobby Seats
//!
//! Maps player indices to the peers sitting in them.
//!
//! ## Design
//!
//! - Fixed number of seats, allocated once
//! - Lowest free seat wins, so indices are reused after a leave
//! - The seat number is the player index sent on the wire

use std::fmt;

/// Opaque identifier the I/O layer gives each remote endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u32);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer#{}", self.0)
    }
}

/// Fixed-size seat table.
#[derive(Debug)]
pub(crate) struct Lobby {
    seats: Box<[Option<PeerId>]>,
}

impl Lobby {
    pub(crate) fn new(max_players: usize) -> Self {
        Self {
            seats: vec![None; max_players].into_boxed_slice(),
        }
    }

    /// Seat of `peer`, if it has joined.
    pub(crate) fn seat_of(&self, peer: PeerId) -> Option<i32> {
        self.seats
            .iter()
            .position(|seat| *seat == Some(peer))
            .map(|index| index as i32)
    }

    /// Seats `peer` in the lowest free seat. `None` when the lobby is full.
    pub(crate) fn join(&mut self, peer: PeerId) -> Option<i32> {
        let index = self.seats.iter().position(Option::is_none)?;
        self.seats[index] = Some(peer);
        Some(index as i32)
    }

    /// Frees the seat held by `peer` and returns it.
    pub(crate) fn leave(&mut self, peer: PeerId) -> Option<i32> {
        let index = self.seat_of(peer)?;
        self.seats[index as usize] = None;
        Some(index)
    }

    /// Occupied seats in index order.
    pub(crate) fn occupied(&self) -> impl Iterator<Item = (i32, PeerId)> + '_ {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(index, seat)| seat.map(|peer| (index as i32, peer)))
    }

    pub(crate) fn len(&self) -> usize {
        self.seats.iter().filter(|seat| seat.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowest_free_seat() {
        let mut lobby = Lobby::new(3);
        assert_eq!(lobby.join(PeerId(10)), Some(0));
        assert_eq!(lobby.join(PeerId(11)), Some(1));
        assert_eq!(lobby.leave(PeerId(10)), Some(0));
        assert_eq!(lobby.join(PeerId(12)), Some(0));
        assert_eq!(lobby.join(PeerId(13)), Some(2));
        assert_eq!(lobby.join(PeerId(14)), None);
        assert_eq!(lobby.len(), 3);
    }

    #[test]
    fn test_occupied_in_order() {
        let mut lobby = Lobby::new(4);
        lobby.join(PeerId(7));
        lobby.join(PeerId(8));
        lobby.join(PeerId(9));
        lobby.leave(PeerId(8));
        assert_eq!(
            lobby.occupied().collect::<Vec<_>>(),
            vec![(0, PeerId(7)), (2, PeerId(9))]
        );
        assert_eq!(lobby.seat_of(PeerId(8)), None);
        assert_eq!(lobby.leave(PeerId(8)), None);
    }
}
