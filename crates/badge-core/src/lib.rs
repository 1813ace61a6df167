pub mod color;
pub mod compose;
pub mod config;
pub mod error;
pub mod io;
pub mod presence;
pub mod readme;
pub mod render;
pub mod select;
pub mod store;
pub mod time;
pub mod types;

pub use error::{BadgeError, Result};
pub use render::{construct_badge, BadgeOutput, RenderedBadge};
