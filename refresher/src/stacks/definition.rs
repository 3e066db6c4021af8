//! Stack definition resolution

use tracing::{debug, warn};

use crate::errors::RefreshError;
use crate::http::stacks::StackApi;
use crate::models::outcome::ContentSource;
use crate::models::stack::StackDefinition;

/// A fetched definition and how its content was resolved
#[derive(Debug, Clone)]
pub struct FetchedDefinition {
    pub definition: StackDefinition,
    pub content_source: ContentSource,

    /// Set when content could not be resolved; the update still proceeds
    pub warning: Option<String>,
}

/// Fetches the full definition of one stack
pub struct DefinitionFetcher<'a> {
    api: &'a dyn StackApi,
}

impl<'a> DefinitionFetcher<'a> {
    pub fn new(api: &'a dyn StackApi) -> Self {
        Self { api }
    }

    /// Fetch the definition, falling back to the file endpoint for content
    ///
    /// Errors on the detail call are returned; errors on the fallback call
    /// only downgrade the result to [`ContentSource::Missing`].
    pub async fn fetch(&self, id: i64) -> Result<FetchedDefinition, RefreshError> {
        debug!("Fetching details for stack ID {}...", id);
        let mut definition = StackDefinition::from(self.api.get_stack(id).await?);

        if definition.content.is_some() {
            return Ok(FetchedDefinition {
                definition,
                content_source: ContentSource::Inline,
                warning: None,
            });
        }

        debug!("Stack ID {} has no inline content, fetching its stack file", id);
        let reason = match self.api.get_stack_file(id).await {
            Ok(file) => match file.stack_file_content.filter(|c| !c.is_empty()) {
                Some(content) => {
                    definition.content = Some(content);
                    return Ok(FetchedDefinition {
                        definition,
                        content_source: ContentSource::Fallback,
                        warning: None,
                    });
                }
                None => "the stack file is empty".to_string(),
            },
            Err(e) => format!("the stack file could not be retrieved: {}", e),
        };

        let warning = format!(
            "Stack {} has no deployable content ({}); it may be deployed from Git. Updating without content",
            definition.summary, reason
        );
        warn!("{}", warning);

        Ok(FetchedDefinition {
            definition,
            content_source: ContentSource::Missing,
            warning: Some(warning),
        })
    }
}
