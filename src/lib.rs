pub mod config;
pub mod game_interface;
pub mod grid;
pub mod pairs;
pub mod render;
pub mod scorer;
pub mod session;
pub mod tensor;
