//! Update request construction

use portainer_models::StackUpdateRequest;

use crate::models::stack::StackDefinition;

/// Derive the update request for a refresh
///
/// Environment, prune flag and content are copied as fetched; only the
/// re-pull flag is forced on. Nothing is recomputed or defaulted here.
pub fn build(definition: &StackDefinition) -> StackUpdateRequest {
    StackUpdateRequest {
        pull_image: true,
        prune_services: definition.prune,
        env: definition.env.clone(),
        stack_file_content: definition.content.clone(),
    }
}
