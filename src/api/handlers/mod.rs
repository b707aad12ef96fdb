pub mod check_in;
pub mod guest;
pub mod health;
