use std::collections::HashMap;

use axum::{extract::State, response::Json, Extension};

use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiPath, RawText};
use crate::api::handlers::{AppState, DELETED};
use crate::logic::validate_batch;
use crate::model::{BatchMode, Id, Mapping, MappingSpec, MappingTable};
use crate::store::traits::Store;

async fn refetch_mapping<S: Store>(store: &S, table: MappingTable, id: Id) -> Result<Mapping, ApiError> {
    match store.get_mapping(table, id).await {
        Ok(Some(mapping)) => Ok(mapping),
        Ok(None) => Err(ApiError::Internal(format!(
            "new entry not found: {} {}",
            table.label(),
            id
        ))),
        Err(e) => Err(ApiError::refetch("new entry not found", e)),
    }
}

async fn insert_mapping<S: Store>(store: &S, table: MappingTable, spec: MappingSpec) -> Result<Mapping, ApiError> {
    let id = store
        .add_mapping(table, &spec)
        .await
        .map_err(|e| ApiError::from_store("unable to add mapping", e))?;

    let mapping = refetch_mapping(store, table, id).await?;
    log::info!(
        "[handlers] successfully added {} {} (class {}, designation {}, definition {})",
        table.label(),
        mapping.id,
        mapping.class_id,
        mapping.designation_id,
        mapping.definition_id
    );
    Ok(mapping)
}

async fn update_mapping<S: Store>(store: &S, table: MappingTable, id: Id, spec: MappingSpec) -> Result<Mapping, ApiError> {
    let edited = store
        .edit_mapping(table, id, &spec)
        .await
        .map_err(|e| ApiError::from_store("unable to edit mapping", e))?;
    if !edited {
        return Err(ApiError::NotFound(format!("{} {} not found", table.label(), id)));
    }

    refetch_mapping(store, table, id).await
}

/// `POST /<mappings>/class/:class_id/designation/:designation_id/:label/:definition_id`
/// with the value as the raw body
pub async fn add_mapping_from_path<S: Store>(
    State(store): State<AppState<S>>,
    Extension(table): Extension<MappingTable>,
    ApiPath((class_id, designation_id, label, definition_id)): ApiPath<(Id, Id, String, Id)>,
    RawText(body): RawText,
) -> Result<Json<Mapping>, ApiError> {
    log::info!("[handlers] binding new {} for {} {}...", table.label(), label, definition_id);

    let spec = MappingSpec::new(class_id, designation_id, definition_id, table.decode_value(&body));
    insert_mapping(&*store, table, spec).await.map(Json)
}

/// `PUT /<mappings>/:id/class/:class_id/designation/:designation_id/:label/:definition_id`
pub async fn edit_mapping_from_path<S: Store>(
    State(store): State<AppState<S>>,
    Extension(table): Extension<MappingTable>,
    ApiPath((id, class_id, designation_id, label, definition_id)): ApiPath<(Id, Id, Id, String, Id)>,
    RawText(body): RawText,
) -> Result<Json<Mapping>, ApiError> {
    log::info!("[handlers] editing {} {} for {} {}...", table.label(), id, label, definition_id);

    let spec = MappingSpec::new(class_id, designation_id, definition_id, table.decode_value(&body));
    update_mapping(&*store, table, id, spec).await.map(Json)
}

pub async fn add_mapping<S: Store>(
    State(store): State<AppState<S>>,
    Extension(table): Extension<MappingTable>,
    ApiJson(spec): ApiJson<MappingSpec>,
) -> Result<Json<Mapping>, ApiError> {
    log::info!("[handlers] binding new {}...", table.label());
    insert_mapping(&*store, table, spec).await.map(Json)
}

pub async fn edit_mapping<S: Store>(
    State(store): State<AppState<S>>,
    Extension(table): Extension<MappingTable>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(spec): ApiJson<MappingSpec>,
) -> Result<Json<Mapping>, ApiError> {
    log::info!("[handlers] editing {} {}...", table.label(), id);
    update_mapping(&*store, table, id, spec).await.map(Json)
}

/// Insert a batch, then answer with the rows as the store persisted them, in
/// the order they were submitted.
pub async fn add_mappings<S: Store>(
    State(store): State<AppState<S>>,
    Extension(table): Extension<MappingTable>,
    Extension(mode): Extension<BatchMode>,
    ApiJson(specs): ApiJson<Vec<MappingSpec>>,
) -> Result<Json<Vec<Mapping>>, ApiError> {
    log::info!("[handlers] adding {} {} rows ({:?})...", specs.len(), table.label(), mode);

    validate_batch(&specs).map_err(|e| ApiError::validation("variables not added", e))?;

    let ids = store
        .add_mappings(table, &specs, mode)
        .await
        .map_err(|e| ApiError::from_store("variables not added", e))?;

    let rows = store
        .get_mappings_by_ids(table, &ids)
        .await
        .map_err(|e| ApiError::refetch("new entries not found", e))?;
    let mut by_id: HashMap<Id, Mapping> = rows.into_iter().map(|row| (row.id, row)).collect();

    let mut entries = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(row) = by_id.remove(&id) else {
            return Err(ApiError::Internal(format!(
                "new entries not found: {} {}",
                table.label(),
                id
            )));
        };
        entries.push(row);
    }

    log::info!("[handlers] successfully added {} {} rows", entries.len(), table.label());
    Ok(Json(entries))
}

pub async fn get_mapping<S: Store>(
    State(store): State<AppState<S>>,
    Extension(table): Extension<MappingTable>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<Mapping>, ApiError> {
    log::info!("[handlers] getting {} with ID: {}", table.label(), id);

    match store.get_mapping(table, id).await {
        Ok(Some(mapping)) => Ok(Json(mapping)),
        Ok(None) => Err(ApiError::NotFound(format!("{} {} not found", table.label(), id))),
        Err(e) => Err(ApiError::from_store("accessor error", e)),
    }
}

pub async fn list_mappings<S: Store>(
    State(store): State<AppState<S>>,
    Extension(table): Extension<MappingTable>,
) -> Result<Json<Vec<Mapping>>, ApiError> {
    log::info!("[handlers] fetching all {} rows...", table.table_name());

    store
        .list_mappings(table)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_store("accessor error", e))
}

pub async fn delete_mapping<S: Store>(
    State(store): State<AppState<S>>,
    Extension(table): Extension<MappingTable>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<&'static str>, ApiError> {
    log::info!("[handlers] deleting {} with id {}...", table.label(), id);

    let deleted = store
        .delete_mapping(table, id)
        .await
        .map_err(|e| ApiError::from_store("unable to delete mapping", e))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("{} {} not found", table.label(), id)));
    }
    Ok(Json(DELETED))
}
