pub mod movement;

pub use movement::{CashMovement, MovementRefs};
