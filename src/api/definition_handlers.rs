use axum::{extract::State, response::Json, Extension};

use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::handlers::{AppState, DELETED};
use crate::logic::validate_definition;
use crate::model::{Definition, DefinitionTable, Id};
use crate::store::traits::Store;

// Read a definition back after writing it
async fn refetch_definition<S: Store>(store: &S, table: DefinitionTable, id: Id) -> Result<Definition, ApiError> {
    match store.get_definition(table, id).await {
        Ok(Some(definition)) => Ok(definition),
        Ok(None) => Err(ApiError::Internal(format!(
            "new entry not found: {} {}",
            table.label(),
            id
        ))),
        Err(e) => Err(ApiError::refetch("new entry not found", e)),
    }
}

pub async fn add_definition<S: Store>(
    State(store): State<AppState<S>>,
    Extension(table): Extension<DefinitionTable>,
    ApiJson(definition): ApiJson<Definition>,
) -> Result<Json<Definition>, ApiError> {
    log::info!("[handlers] adding {} '{}'...", table.label(), definition.name);

    validate_definition(&definition)
        .map_err(|e| ApiError::validation(&format!("invalid {}", table.label()), e))?;

    let id = store
        .add_definition(table, &definition)
        .await
        .map_err(|e| ApiError::from_store(&format!("unable to add {}", table.label()), e))?;

    let added = refetch_definition(&*store, table, id).await?;
    log::info!(
        "[handlers] successfully added {} '{}' with id {}",
        table.label(),
        added.name,
        added.id
    );
    Ok(Json(added))
}

pub async fn edit_definition<S: Store>(
    State(store): State<AppState<S>>,
    Extension(table): Extension<DefinitionTable>,
    ApiJson(definition): ApiJson<Definition>,
) -> Result<Json<Definition>, ApiError> {
    log::info!("[handlers] editing {} {}...", table.label(), definition.id);

    validate_definition(&definition)
        .map_err(|e| ApiError::validation(&format!("invalid {}", table.label()), e))?;

    let edited = store
        .edit_definition(table, &definition)
        .await
        .map_err(|e| ApiError::from_store("edit failed", e))?;
    if !edited {
        return Err(ApiError::NotFound(format!(
            "{} {} not found",
            table.label(),
            definition.id
        )));
    }

    let updated = refetch_definition(&*store, table, definition.id).await?;
    Ok(Json(updated))
}

/// `PUT /<definitions>/:id`; the path id wins over any id in the body
pub async fn edit_definition_by_id<S: Store>(
    state: State<AppState<S>>,
    table: Extension<DefinitionTable>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(definition): ApiJson<Definition>,
) -> Result<Json<Definition>, ApiError> {
    edit_definition(state, table, ApiJson(definition.with_id(id))).await
}

pub async fn get_definition<S: Store>(
    State(store): State<AppState<S>>,
    Extension(table): Extension<DefinitionTable>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<Definition>, ApiError> {
    log::info!("[handlers] getting {} with ID: {}", table.label(), id);

    match store.get_definition(table, id).await {
        Ok(Some(definition)) => Ok(Json(definition)),
        Ok(None) => Err(ApiError::NotFound(format!("{} {} not found", table.label(), id))),
        Err(e) => Err(ApiError::from_store("accessor error", e)),
    }
}

pub async fn list_definitions<S: Store>(
    State(store): State<AppState<S>>,
    Extension(table): Extension<DefinitionTable>,
) -> Result<Json<Vec<Definition>>, ApiError> {
    log::info!("[handlers] fetching all {} rows...", table.table_name());

    store
        .list_definitions(table)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store("accessor error", e))
}

pub async fn delete_definition<S: Store>(
    State(store): State<AppState<S>>,
    Extension(table): Extension<DefinitionTable>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<&'static str>, ApiError> {
    log::info!("[handlers] deleting {} {}...", table.label(), id);

    let deleted = store
        .delete_definition(table, id)
        .await
        .map_err(|e| ApiError::from_store("unable to delete definition", e))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("{} {} not found", table.label(), id)));
    }
    Ok(Json(DELETED))
}
