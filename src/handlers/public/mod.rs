pub mod health;

pub use health::get as health_get;
