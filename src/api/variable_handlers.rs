use axum::{extract::State, response::Json};

use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::handlers::AppState;
use crate::logic::validate_variable;
use crate::model::{Id, Variable};
use crate::store::traits::Store;

/// Turn a designation name into its id. An unknown name is a bad request, not
/// a missing target.
async fn resolve_designation<S: Store>(store: &S, name: &str) -> Result<Id, ApiError> {
    match store.get_designation_by_name(name).await {
        Ok(Some(designation)) => Ok(designation.id),
        Ok(None) => Err(ApiError::MissingReference(format!(
            "designation '{}' not found",
            name
        ))),
        Err(e) => Err(ApiError::from_store("unable to resolve designation", e)),
    }
}

async fn refetch_variable<S: Store>(store: &S, designation_id: Id, variable: Variable) -> Result<Variable, ApiError> {
    match store.get_variable(designation_id, &variable.key).await {
        Ok(Some(value)) => Ok(Variable {
            value,
            ..variable.resolved(designation_id)
        }),
        Ok(None) => Err(ApiError::Internal(format!(
            "new entry not found: variable '{}'",
            variable.key
        ))),
        Err(e) => Err(ApiError::refetch("new entry not found", e)),
    }
}

pub async fn add_variable<S: Store>(
    State(store): State<AppState<S>>,
    ApiJson(variable): ApiJson<Variable>,
) -> Result<Json<Variable>, ApiError> {
    log::info!(
        "[handlers] adding variable '{}' for designation '{}'...",
        variable.key,
        variable.designation.name
    );

    validate_variable(&variable).map_err(|e| ApiError::validation("invalid variable", e))?;
    let designation_id = resolve_designation(&*store, &variable.designation.name).await?;

    let exists = store
        .variable_exists(designation_id, &variable.key)
        .await
        .map_err(|e| ApiError::from_store("unable to check variable", e))?;
    if exists {
        return Err(ApiError::Conflict(format!(
            "variable '{}' already exists for designation '{}'",
            variable.key, variable.designation.name
        )));
    }

    store
        .add_variable(designation_id, &variable)
        .await
        .map_err(|e| ApiError::from_store("unable to add variable", e))?;

    let added = refetch_variable(&*store, designation_id, variable).await?;
    log::info!("[handlers] successfully added variable '{}'", added.key);
    Ok(Json(added))
}

pub async fn edit_variable<S: Store>(
    State(store): State<AppState<S>>,
    ApiJson(variable): ApiJson<Variable>,
) -> Result<Json<Variable>, ApiError> {
    log::info!(
        "[handlers] editing variable '{}' for designation '{}'...",
        variable.key,
        variable.designation.name
    );

    validate_variable(&variable).map_err(|e| ApiError::validation("invalid variable", e))?;
    let designation_id = resolve_designation(&*store, &variable.designation.name).await?;

    let edited = store
        .edit_variable(designation_id, &variable)
        .await
        .map_err(|e| ApiError::from_store("unable to edit variable", e))?;
    if !edited {
        return Err(ApiError::NotFound(format!(
            "variable '{}' not found for designation '{}'",
            variable.key, variable.designation.name
        )));
    }

    refetch_variable(&*store, designation_id, variable).await.map(Json)
}

/// `GET /variables/:designation/:key`
pub async fn get_variable<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath((designation, key)): ApiPath<(String, String)>,
) -> Result<Json<Variable>, ApiError> {
    log::info!("[handlers] getting variable '{}' for designation '{}'", key, designation);

    let designation_id = resolve_designation(&*store, &designation).await?;
    match store.get_variable(designation_id, &key).await {
        Ok(Some(value)) => Ok(Json(Variable::new(designation, key, value).resolved(designation_id))),
        Ok(None) => Err(ApiError::NotFound(format!(
            "variable '{}' not found for designation '{}'",
            key, designation
        ))),
        Err(e) => Err(ApiError::from_store("accessor error", e)),
    }
}
