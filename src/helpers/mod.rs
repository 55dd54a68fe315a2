pub mod embed;
pub mod links;
pub mod reddit;
pub mod reply;
pub mod system;
pub mod views;
