pub mod edited_by;
pub mod field;
pub mod location;
pub mod period;
pub mod record;
