pub mod movement_controller;

pub use movement_controller::configure;
