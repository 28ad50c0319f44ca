use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::{check_role, empty_string_as_none};
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::collection::{Collection, CollectionListQuery};
use crate::forms::collections::AddCollectionForm;
use crate::repository::{CollectionReader, CollectionWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the collections page.
#[derive(Debug, Default, Deserialize)]
pub struct CollectionsQuery {
    /// Optional search string matched against collection names.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
}

/// Data required to render the collections template.
pub struct CollectionsPageData {
    pub collections: Vec<Collection>,
    /// Search query echoed back to the view when present.
    pub search: Option<String>,
}

/// Lists the collections of the user's hub with their product counts.
pub fn load_collections<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CollectionsQuery,
) -> ServiceResult<CollectionsPageData>
where
    R: CollectionReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let mut list_query = CollectionListQuery::new(user.hub_id);
    if let Some(term) = query.search.as_ref() {
        list_query = list_query.search(term);
    }

    let collections = repo
        .list_collections(list_query)
        .map_err(ServiceError::from)?;

    Ok(CollectionsPageData {
        collections,
        search: query.search,
    })
}

pub fn create_collection<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddCollectionForm,
) -> ServiceResult<Collection>
where
    R: CollectionWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let new_collection = form
        .into_new_collection(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_collection(&new_collection)
        .map_err(ServiceError::from)
}
