pub mod format;
pub mod logging;

pub use format::format_currency;
pub use logging::truncate_text;
