use axum::{
    routing::{get, post, put},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::{definition_handlers, handlers, mapping_handlers, variable_handlers};
use crate::model::{BatchMode, DefinitionTable, MappingTable};
use crate::store::traits::Store;

pub const fn definition_path(table: DefinitionTable) -> &'static str {
    match table {
        DefinitionTable::Microservice => "/microservice-definitions",
        DefinitionTable::Variable => "/variable-definitions",
        DefinitionTable::Class => "/classes",
        DefinitionTable::Designation => "/designations",
    }
}

pub const fn mapping_path(table: MappingTable) -> &'static str {
    match table {
        MappingTable::Microservice => "/microservice-mappings",
        MappingTable::Variable => "/variable-mappings",
    }
}

pub fn create_router<S: Store + 'static>(batch_mode: BatchMode) -> Router<Arc<S>> {
    let mut router = Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Variables by designation name
        .route(
            "/variables",
            post(variable_handlers::add_variable::<S>).put(variable_handlers::edit_variable::<S>),
        )
        .route(
            "/variables/:designation/:key",
            get(variable_handlers::get_variable::<S>),
        );

    for table in DefinitionTable::ALL {
        router = router.nest(definition_path(table), definition_routes::<S>(table));
    }
    for table in MappingTable::ALL {
        router = router.nest(mapping_path(table), mapping_routes::<S>(table, batch_mode));
    }

    router
}

fn definition_routes<S: Store + 'static>(table: DefinitionTable) -> Router<Arc<S>> {
    Router::new()
        .route(
            "/",
            get(definition_handlers::list_definitions::<S>)
                .post(definition_handlers::add_definition::<S>)
                .put(definition_handlers::edit_definition::<S>),
        )
        .route(
            "/:id",
            get(definition_handlers::get_definition::<S>)
                .put(definition_handlers::edit_definition_by_id::<S>)
                .delete(definition_handlers::delete_definition::<S>),
        )
        .layer(Extension(table))
}

fn mapping_routes<S: Store + 'static>(table: MappingTable, batch_mode: BatchMode) -> Router<Arc<S>> {
    Router::new()
        .route(
            "/",
            get(mapping_handlers::list_mappings::<S>).post(mapping_handlers::add_mapping::<S>),
        )
        .route("/batch", post(mapping_handlers::add_mappings::<S>))
        .route(
            "/:id",
            get(mapping_handlers::get_mapping::<S>)
                .put(mapping_handlers::edit_mapping::<S>)
                .delete(mapping_handlers::delete_mapping::<S>),
        )
        .route(
            "/class/:class_id/designation/:designation_id/:label/:definition_id",
            post(mapping_handlers::add_mapping_from_path::<S>),
        )
        .route(
            "/:id/class/:class_id/designation/:designation_id/:label/:definition_id",
            put(mapping_handlers::edit_mapping_from_path::<S>),
        )
        .layer(Extension(table))
        .layer(Extension(batch_mode))
}
