use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Display;

use super::client::{ApiError, CatalogSource};
use super::language::Language;
use super::models::{Book, Character};

/// Text returned when the books listing is empty.
pub const NO_BOOKS: &str = "No books found.";
/// Text returned when the characters listing is empty.
pub const NO_CHARACTERS: &str = "No characters found.";

/// Builds the path for `GET /{lang}/characters`, with the search term when one is given.
pub fn characters_path(language: Language, search: Option<&str>) -> String {
    let mut path = format!("/{}/characters", language);
    if let Some(term) = search.filter(|term| !term.is_empty()) {
        path.push_str("?search=");
        path.push_str(&urlencoding::encode(term));
    }
    path
}

/// Lists every book for `language`, in upstream order.
pub async fn get_books(source: &dyn CatalogSource, language: Language) -> Result<String, ApiError> {
    let json = source.get_json(&format!("/{}/books", language)).await?;
    let books: Vec<Book> = decode(json)?;
    Ok(render_list(&books, NO_BOOKS))
}

/// Fetches one random book for `language`.
pub async fn get_random_book(
    source: &dyn CatalogSource,
    language: Language,
) -> Result<String, ApiError> {
    let json = source.get_json(&format!("/{}/books/random", language)).await?;
    let book: Book = decode(json)?;
    Ok(book.to_string())
}

/// Lists characters for `language`. Matching on `search` is left to the upstream.
pub async fn get_characters(
    source: &dyn CatalogSource,
    language: Language,
    search: Option<&str>,
) -> Result<String, ApiError> {
    let json = source.get_json(&characters_path(language, search)).await?;
    let characters: Vec<Character> = decode(json)?;
    Ok(render_list(&characters, NO_CHARACTERS))
}

/// Fetches one random character for `language`.
pub async fn get_random_character(
    source: &dyn CatalogSource,
    language: Language,
) -> Result<String, ApiError> {
    let json = source
        .get_json(&format!("/{}/characters/random", language))
        .await?;
    let character: Character = decode(json)?;
    Ok(character.to_string())
}

fn decode<T: DeserializeOwned>(json: Value) -> Result<T, ApiError> {
    serde_json::from_value(json).map_err(ApiError::Decode)
}

fn render_list<T: Display>(records: &[T], empty: &str) -> String {
    if records.is_empty() {
        return empty.to_string();
    }

    records
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
