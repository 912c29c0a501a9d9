mod clipmove;
mod components;
mod systems;
mod tic;

pub use clipmove::{
    entity_accelerate, entity_clipmove, entity_integrate, entity_place, entity_update_sector,
};
pub use components::InputCmd;
pub use systems::{TURN_RATE, player_input};
pub use tic::{DT, SIM_FPS, TicRunner};
