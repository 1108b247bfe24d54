pub mod config;
pub mod error;
pub mod hand;
pub mod input;
pub mod level;
pub mod player;
pub mod rhythm;
pub mod traits;
pub mod util;

pub use player::AutoPlayer;
