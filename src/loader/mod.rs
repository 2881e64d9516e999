//! Card template loading and game setup

pub mod game_init;
pub mod sets;
pub mod template;

pub use game_init::GameInitializer;
pub use template::CardTemplate;
