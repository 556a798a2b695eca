pub mod collector;
pub mod memory;
pub mod network;
