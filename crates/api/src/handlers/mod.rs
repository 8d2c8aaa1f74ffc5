pub mod door;
pub mod session;
