pub mod colors;
pub mod date;
pub mod formatting;
pub mod path;
pub mod table;
pub mod time;
pub mod zone;

pub use formatting::format_minutes_to_hours;
