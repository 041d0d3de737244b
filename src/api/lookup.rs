//! Name lookup seam for clone-name generation.

use async_trait::async_trait;

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::types::EntityKind;

/// Source of existing record names for one kind.
///
/// Duplication needs names, not whole records, so the flow takes this trait
/// instead of the full client. The production implementation queries the
/// backend; tests feed a fixed list.
#[async_trait]
pub trait NameLookup: Send + Sync {
    /// Names of `kind` records whose name contains `fragment`.
    async fn names_matching(
        &self,
        kind: EntityKind,
        fragment: &str,
    ) -> Result<Vec<String>, ApiError>;
}

#[async_trait]
impl NameLookup for ApiClient {
    async fn names_matching(
        &self,
        kind: EntityKind,
        fragment: &str,
    ) -> Result<Vec<String>, ApiError> {
        self.search_names(kind, fragment).await
    }
}
