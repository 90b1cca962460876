//! The four catalog tools exposed over MCP.

use async_trait::async_trait;
use schemars::JsonSchema;
use schemars::r#gen::SchemaSettings;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::catalog::{self, CatalogSource, Language};
use crate::tool::{Tool, ToolError, ToolRegistry, ToolResult};

/// Arguments for `GetBooks`.
#[derive(Debug, Default, Deserialize, JsonSchema)]
struct BooksArgs {
    /// Language of the books. Default is English (en).
    #[serde(default)]
    language: Language,
}

/// Arguments for `GetRandomBook`.
#[derive(Debug, Default, Deserialize, JsonSchema)]
struct RandomBookArgs {
    /// Language of the book. Default is English (en).
    #[serde(default)]
    language: Language,
}

/// Arguments for `GetCharacters`.
#[derive(Debug, Default, Deserialize, JsonSchema)]
struct CharactersArgs {
    /// Language of the characters. Default is English (en).
    #[serde(default)]
    language: Language,
    /// Searches all items and returns the best matches
    #[serde(default)]
    search: Option<String>,
}

/// Arguments for `GetRandomCharacter`.
#[derive(Debug, Default, Deserialize, JsonSchema)]
struct RandomCharacterArgs {
    /// Language of the character. Default is English (en).
    #[serde(default)]
    language: Language,
}

/// Generates an inline JSON Schema for a tool's argument struct.
fn input_schema<T: JsonSchema>() -> Value {
    let schema = SchemaSettings::draft07()
        .with(|settings| {
            settings.inline_subschemas = true;
            settings.meta_schema = None;
        })
        .into_generator()
        .into_root_schema_for::<T>();
    serde_json::to_value(schema).unwrap_or_else(|_| serde_json::json!({"type": "object"}))
}

/// Parses tool arguments; a missing argument object means all defaults.
fn parse_args<T: DeserializeOwned + Default>(args: Value) -> Result<T, ToolError> {
    if args.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Lists every book in the chosen language.
#[derive(Clone)]
pub struct GetBooksTool {
    source: Arc<dyn CatalogSource>,
}

impl GetBooksTool {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for GetBooksTool {
    fn name(&self) -> &str {
        "GetBooks"
    }

    fn description(&self) -> &str {
        "Get a list of Harry Potter books"
    }

    fn parameters_schema(&self) -> Value {
        input_schema::<BooksArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let args: BooksArgs = parse_args(args)?;
        let output = catalog::get_books(self.source.as_ref(), args.language).await?;
        Ok(ToolResult::ok(output))
    }
}

/// Picks one random book.
#[derive(Clone)]
pub struct GetRandomBookTool {
    source: Arc<dyn CatalogSource>,
}

impl GetRandomBookTool {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for GetRandomBookTool {
    fn name(&self) -> &str {
        "GetRandomBook"
    }

    fn description(&self) -> &str {
        "Get a random Harry Potter book"
    }

    fn parameters_schema(&self) -> Value {
        input_schema::<RandomBookArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let args: RandomBookArgs = parse_args(args)?;
        let output = catalog::get_random_book(self.source.as_ref(), args.language).await?;
        Ok(ToolResult::ok(output))
    }
}

/// Lists characters, optionally narrowed by an upstream search.
#[derive(Clone)]
pub struct GetCharactersTool {
    source: Arc<dyn CatalogSource>,
}

impl GetCharactersTool {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for GetCharactersTool {
    fn name(&self) -> &str {
        "GetCharacters"
    }

    fn description(&self) -> &str {
        "Get a list of Harry Potter characters"
    }

    fn parameters_schema(&self) -> Value {
        input_schema::<CharactersArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let args: CharactersArgs = parse_args(args)?;
        let output = catalog::get_characters(
            self.source.as_ref(),
            args.language,
            args.search.as_deref(),
        )
        .await?;
        Ok(ToolResult::ok(output))
    }
}

/// Picks one random character.
#[derive(Clone)]
pub struct GetRandomCharacterTool {
    source: Arc<dyn CatalogSource>,
}

impl GetRandomCharacterTool {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for GetRandomCharacterTool {
    fn name(&self) -> &str {
        "GetRandomCharacter"
    }

    fn description(&self) -> &str {
        "Get a random Harry Potter character"
    }

    fn parameters_schema(&self) -> Value {
        input_schema::<RandomCharacterArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let args: RandomCharacterArgs = parse_args(args)?;
        let output = catalog::get_random_character(self.source.as_ref(), args.language).await?;
        Ok(ToolResult::ok(output))
    }
}

/// Registers the four catalog tools, all sharing `source`.
pub fn register_catalog_tools(registry: &mut ToolRegistry, source: Arc<dyn CatalogSource>) {
    registry.register(Arc::new(GetBooksTool::new(source.clone())));
    registry.register(Arc::new(GetRandomBookTool::new(source.clone())));
    registry.register(Arc::new(GetCharactersTool::new(source.clone())));
    registry.register(Arc::new(GetRandomCharacterTool::new(source)));
}

/// Builds a registry holding only the catalog tools.
pub fn catalog_registry(source: Arc<dyn CatalogSource>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    register_catalog_tools(&mut registry, source);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::client::MockCatalogSource;
    use crate::catalog::{ApiError, NO_CHARACTERS};
    use serde_json::json;

    fn expecting(path: &'static str, body: Value) -> Arc<dyn CatalogSource> {
        let mut source = MockCatalogSource::new();
        source
            .expect_get_json()
            .withf(move |p: &str| p == path)
            .times(1)
            .returning(move |_| Ok(body.clone()));
        Arc::new(source)
    }

    #[test]
    fn test_registry_lists_tools_by_name() {
        let registry = catalog_registry(Arc::new(MockCatalogSource::new()));
        let names: Vec<String> = registry
            .to_tool_definitions()
            .into_iter()
            .map(|def| def.name)
            .collect();
        assert_eq!(
            names,
            vec!["GetBooks", "GetCharacters", "GetRandomBook", "GetRandomCharacter"]
        );
    }

    #[test]
    fn test_characters_schema_has_language_enum_and_search() {
        let schema = input_schema::<CharactersArgs>();
        assert_eq!(schema["type"], "object");

        let properties = schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("search"));
        assert_eq!(properties["language"]["default"], "en");
        assert_eq!(
            properties["language"]["description"],
            "Language of the characters. Default is English (en)."
        );
        assert!(schema.get("definitions").is_none());

        let text = serde_json::to_string(&properties["language"]).unwrap();
        for lang in Language::ALL {
            assert!(text.contains(&format!("\"{}\"", lang)));
        }
        for name in ["English", "Spanish", "French", "Italian", "Portuguese", "Ukrainian"] {
            assert!(text.contains(name), "schema is missing {}", name);
        }
    }

    #[test]
    fn test_definition_serializes_camel_case() {
        let tool = GetBooksTool::new(Arc::new(MockCatalogSource::new()));
        let json = serde_json::to_value(tool.to_definition()).unwrap();
        assert_eq!(json["name"], "GetBooks");
        assert!(json.get("inputSchema").is_some());
    }

    #[tokio::test]
    async fn test_null_arguments_use_english() {
        let tool = GetBooksTool::new(expecting("/en/books", json!([])));
        let result = tool.execute(Value::Null).await.unwrap();
        assert_eq!(result, ToolResult::ok("No books found."));
    }

    #[tokio::test]
    async fn test_language_argument_selects_path() {
        let tool = GetRandomBookTool::new(expecting(
            "/it/books/random",
            json!({
                "number": 4,
                "title": "Harry Potter e il calice di fuoco",
                "originalTitle": "Harry Potter and the Goblet of Fire",
                "releaseDate": "8 lug 2000",
                "description": "...",
                "pages": 636,
                "cover": "cover.png"
            }),
        ));
        let result = tool.execute(json!({"language": "it"})).await.unwrap();
        assert!(result.output.starts_with("Title: Harry Potter e il calice di fuoco\n"));
        assert!(!result.is_error);
    }

    #[tokio::test]
    async fn test_search_argument_is_passed_through() {
        let tool = GetCharactersTool::new(expecting("/en/characters?search=Dobby%20Elf", json!([])));
        let result = tool
            .execute(json!({"search": "Dobby Elf"}))
            .await
            .unwrap();
        assert_eq!(result.output, NO_CHARACTERS);
    }

    #[tokio::test]
    async fn test_null_search_is_absent() {
        let tool = GetCharactersTool::new(expecting("/uk/characters", json!([])));
        let result = tool
            .execute(json!({"language": "uk", "search": null}))
            .await
            .unwrap();
        assert_eq!(result.output, NO_CHARACTERS);
    }

    #[tokio::test]
    async fn test_unsupported_language_is_invalid_arguments() {
        let tool = GetRandomCharacterTool::new(Arc::new(MockCatalogSource::new()));
        let err = tool.execute(json!({"language": "de"})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_upstream_error_is_propagated() {
        let mut source = MockCatalogSource::new();
        source.expect_get_json().times(1).returning(|path| {
            Err(ApiError::Status {
                status: 404,
                path: path.to_string(),
            })
        });
        let tool = GetRandomCharacterTool::new(Arc::new(source));
        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::Upstream(ApiError::Status { status: 404, .. })));
    }
}
