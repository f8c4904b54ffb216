pub mod controller;
pub mod engine;
pub mod renderer; // Pure view of a session
pub mod round;
pub mod session;
