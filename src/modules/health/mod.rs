pub mod controller;

pub use controller::health;
