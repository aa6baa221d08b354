mod header;
mod spinner;

pub use header::Header;
pub use spinner::Spinner;
