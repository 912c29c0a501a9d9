use super::{clipmove, systems, InputCmd};
use crate::world::Level;
use crate::world::geometry::EntityId;
use std::time::{Duration, Instant};

pub const SIM_FPS: u32 = 35;
pub const DT: f32 = 1.0 / SIM_FPS as f32;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// Drives the player entity at a fixed tic rate, independent of the
/// frame rate of whoever calls `pump`.
pub struct TicRunner {
    player: EntityId,
    last: Instant,
    tics: u64,
}

impl TicRunner {
    pub fn new(player: EntityId) -> Self {
        Self {
            player,
            last: Instant::now(),
            tics: 0,
        }
    }

    #[inline]
    pub fn player(&self) -> EntityId {
        self.player
    }

    /// Tics simulated so far.
    #[inline]
    pub fn tics(&self) -> u64 {
        self.tics
    }

    /// Advance enough tics to synchronise simulation with real time.
    /// Returns how many ran.
    pub fn pump(&mut self, level: &mut Level, cmd: InputCmd) -> u32 {
        let mut ran = 0;
        while self.last.elapsed() >= TIC {
            self.tick(level, cmd);
            self.last += TIC;
            ran += 1;
        }
        ran
    }

    /* ---------------------------------------------------------------- */
    /* run one fixed-rate game tic                                      */
    /* ---------------------------------------------------------------- */
    pub fn tick(&mut self, level: &mut Level, cmd: InputCmd) {
        let wish = systems::player_input(level, self.player, cmd, DT);
        clipmove::entity_accelerate(level, self.player, wish, DT);
        clipmove::entity_integrate(level, self.player, DT);
        self.tics += 1;
    }
}
