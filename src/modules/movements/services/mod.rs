pub mod movement_service;

pub use movement_service::{MovementService, RecordedMovement};
