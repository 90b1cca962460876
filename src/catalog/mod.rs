pub mod client;
pub mod language;
pub mod models;
pub mod operations;

pub use client::{ApiError, CatalogClient, CatalogClientBuilder, CatalogSource, DEFAULT_BASE_URL};
pub use language::{Language, UnsupportedLanguage};
pub use models::{Book, Character};
pub use operations::{
    NO_BOOKS, NO_CHARACTERS, characters_path, get_books, get_characters, get_random_book,
    get_random_character,
};
