pub mod movement_repository;

pub use movement_repository::{MovementFilter, MovementRepository};
