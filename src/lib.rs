// Skeleton assembly: a character built from collectible body parts

pub mod core;
pub mod engine;
pub mod game;
