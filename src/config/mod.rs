mod player_config;

pub use player_config::{CONFIG_FILE, PlayerConfig};
