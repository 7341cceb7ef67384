pub mod types;

pub use types::{DuplicateName, GenerateResponse, TitleRecord};
