pub mod pdf_loader;

pub use pdf_loader::{load_pdf_batch, load_pdf_file};
