use glam::Vec2;

use super::InputCmd;
use crate::world::Level;
use crate::world::camera::Camera;
use crate::world::geometry::EntityId;

/// Degrees per second at full turn input.
pub const TURN_RATE: f32 = 200.0;

/// Apply the turn part of `cmd` to `player` and return the wish
/// direction (length ≤ 1) to accelerate along.
///
/// Positive `turn` increases yaw, which is a right turn when the map is
/// viewed with +Y pointing down the screen.
pub fn player_input(level: &mut Level, player: EntityId, cmd: InputCmd, dt: f32) -> Vec2 {
    let ent = level.entity_mut(player);
    if cmd.turn != 0.0 {
        ent.yaw = (ent.yaw + cmd.turn * TURN_RATE * dt).rem_euclid(360.0);
    }

    if cmd.forward == 0.0 && cmd.strafe == 0.0 {
        return Vec2::ZERO;
    }
    let cam = Camera::from_entity(ent);
    let fwd = cam.forward();
    let right = cam.right.truncate();
    (fwd * cmd.forward + right * cmd.strafe).clamp_length_max(1.0)
}
