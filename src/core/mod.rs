// Shared helpers used by both engine and game code

pub mod math;
