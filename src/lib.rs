pub mod buffer;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod tasks {
    pub mod controller;
    pub mod input;
    pub mod viewer;
}
