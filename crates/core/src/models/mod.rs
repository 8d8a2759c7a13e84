pub mod holding;
pub mod quote;
pub mod record;
pub mod settings;
