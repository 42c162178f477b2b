pub mod license;
pub mod reminder;
