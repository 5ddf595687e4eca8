//! Terminal front end

pub mod play;
pub mod view_state;
