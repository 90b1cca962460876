//! Upstream record shapes and their text rendering.
//!
//! Decoding is strict: every property must be present. String properties
//! holding `null` read as empty text, matching how the records are rendered.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// A book as returned by the `/{lang}/books` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(deserialize_with = "nullable_string")]
    pub original_title: String,
    pub number: i64,
    #[serde(deserialize_with = "nullable_string")]
    pub release_date: String,
    #[serde(deserialize_with = "nullable_string")]
    pub description: String,
    pub pages: i64,
    #[serde(deserialize_with = "nullable_string")]
    pub cover: String,
}

/// A character as returned by the `/{lang}/characters` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    #[serde(deserialize_with = "nullable_string")]
    pub full_name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub nick_name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub hogwarts_house: String,
    #[serde(deserialize_with = "nullable_string")]
    pub interpreted_by: String,
    pub children: Vec<Option<String>>,
    #[serde(deserialize_with = "nullable_string")]
    pub image: String,
    #[serde(deserialize_with = "nullable_string")]
    pub birthdate: String,
}

/// Required property whose value may be `null`.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Original Title: {}", self.original_title)?;
        writeln!(f, "Number: {}", self.number)?;
        writeln!(f, "Release Date: {}", self.release_date)?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "Pages: {}", self.pages)?;
        write!(f, "Cover: {}", self.cover)
    }
}

impl Character {
    /// Children names joined with `", "`; missing names stay as empty segments.
    pub fn children_line(&self) -> String {
        self.children
            .iter()
            .map(|child| child.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FullName: {}", self.full_name)?;
        writeln!(f, "NickName: {}", self.nick_name)?;
        writeln!(f, "HogwartsHouse: {}", self.hogwarts_house)?;
        writeln!(f, "InterpretedBy: {}", self.interpreted_by)?;
        writeln!(f, "Children: {}", self.children_line())?;
        writeln!(f, "Image: {}", self.image)?;
        write!(f, "Birthdate: {}", self.birthdate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn harry() -> serde_json::Value {
        json!({
            "fullName": "Harry Potter",
            "nickName": "The Boy Who Lived",
            "hogwartsHouse": "Gryffindor",
            "interpretedBy": "Daniel Radcliffe",
            "children": ["James Sirius", "Albus Severus", "Lily Luna"],
            "image": "harry.jpg",
            "birthdate": "31 July 1980"
        })
    }

    #[test]
    fn test_character_record_format() {
        let character: Character = serde_json::from_value(harry()).unwrap();
        assert_eq!(
            character.to_string(),
            "FullName: Harry Potter\n\
             NickName: The Boy Who Lived\n\
             HogwartsHouse: Gryffindor\n\
             InterpretedBy: Daniel Radcliffe\n\
             Children: James Sirius, Albus Severus, Lily Luna\n\
             Image: harry.jpg\n\
             Birthdate: 31 July 1980"
        );
    }

    #[test]
    fn test_book_record_format() {
        let book: Book = serde_json::from_value(json!({
            "number": 1,
            "title": "Harry Potter and the Sorcerer's Stone",
            "originalTitle": "Harry Potter and the Philosopher's Stone",
            "releaseDate": "Jun 26, 1997",
            "description": "On his birthday, Harry Potter discovers...",
            "pages": 223,
            "cover": "https://example.test/cover1.png",
            "index": 0
        }))
        .unwrap();

        let rendered = book.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Title: Harry Potter and the Sorcerer's Stone",
                "Original Title: Harry Potter and the Philosopher's Stone",
                "Number: 1",
                "Release Date: Jun 26, 1997",
                "Description: On his birthday, Harry Potter discovers...",
                "Pages: 223",
                "Cover: https://example.test/cover1.png",
            ]
        );
        assert!(!rendered.ends_with('\n'));
    }

    #[test]
    fn test_missing_property_is_rejected() {
        let mut value = harry();
        value.as_object_mut().unwrap().remove("hogwartsHouse");
        let err = serde_json::from_value::<Character>(value).unwrap_err();
        assert!(err.to_string().contains("hogwartsHouse"));
    }

    #[test]
    fn test_missing_children_is_rejected() {
        let mut value = harry();
        value.as_object_mut().unwrap().remove("children");
        assert!(serde_json::from_value::<Character>(value).is_err());
    }

    #[test]
    fn test_null_and_empty_children_render_as_empty_segments() {
        let mut value = harry();
        value["children"] = json!(["James", null, ""]);
        let character: Character = serde_json::from_value(value).unwrap();
        assert_eq!(character.children_line(), "James, , ");
    }

    #[test]
    fn test_empty_children_list_is_allowed() {
        let mut value = harry();
        value["children"] = json!([]);
        let character: Character = serde_json::from_value(value).unwrap();
        assert!(character.to_string().contains("\nChildren: \n"));
    }

    #[test]
    fn test_null_nickname_renders_empty() {
        let mut value = harry();
        value["nickName"] = serde_json::Value::Null;
        let character: Character = serde_json::from_value(value).unwrap();
        assert_eq!(character.nick_name, "");
        assert!(character.to_string().contains("\nNickName: \n"));
    }

    #[test]
    fn test_non_integer_pages_is_rejected() {
        let value = json!({
            "number": 1,
            "title": "t",
            "originalTitle": "o",
            "releaseDate": "r",
            "description": "d",
            "pages": "many",
            "cover": "c"
        });
        assert!(serde_json::from_value::<Book>(value).is_err());
    }
}
