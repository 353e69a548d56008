pub mod confirm;
pub mod status;
