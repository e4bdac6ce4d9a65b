pub mod health;
pub mod reconstruction;
