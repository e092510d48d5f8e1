mod health;
mod link;

pub use health::health_handler;
pub use link::{get_link_handler, save_link_handler};
