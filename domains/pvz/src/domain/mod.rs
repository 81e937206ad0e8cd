//! Domain layer for pickup points, receptions and products

pub mod entities;
pub mod state;
pub mod tree;
