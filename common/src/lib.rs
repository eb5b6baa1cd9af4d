mod player;
mod record;

pub mod utils;

pub use player::*;
pub use record::*;
pub use utils::time;
