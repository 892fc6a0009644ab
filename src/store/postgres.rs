use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, PgPool, Postgres, Row};

use crate::model::{BatchMode, Definition, DefinitionTable, Id, Mapping, MappingSpec, MappingTable, Variable};
use crate::store::error::{StoreError, StoreResult};
use crate::store::traits::{DefinitionStore, MappingStore, VariableStore};

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run the embedded migrations in `migrations/`
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn definition_from_row(row: &PgRow) -> Definition {
    Definition {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
    }
}

fn mapping_from_row(row: &PgRow) -> Mapping {
    Mapping {
        id: row.get("id"),
        class_id: row.get("class_id"),
        designation_id: row.get("designation_id"),
        definition_id: row.get("definition_id"),
        value: row.get("value"),
    }
}

/// Column list aliasing the table-specific columns to the `Mapping` field names
fn mapping_columns(table: MappingTable) -> String {
    format!(
        "id, class_id, designation_id, {} AS definition_id, {} AS value",
        table.definition_column(),
        table.value_column()
    )
}

async fn insert_mapping<'e, E>(executor: E, table: MappingTable, spec: &MappingSpec) -> StoreResult<Id>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let sql = format!(
        "INSERT INTO {} (class_id, designation_id, {}, {}) VALUES ($1, $2, $3, $4) RETURNING id",
        table.table_name(),
        table.definition_column(),
        table.value_column()
    );
    let id = sqlx::query_scalar::<_, Id>(&sql)
        .bind(spec.class_id)
        .bind(spec.designation_id)
        .bind(spec.definition_id)
        .bind(&spec.value)
        .fetch_one(executor)
        .await?;
    Ok(id)
}

#[async_trait::async_trait]
impl DefinitionStore for PostgresStore {
    async fn add_definition(&self, table: DefinitionTable, definition: &Definition) -> StoreResult<Id> {
        let sql = format!(
            "INSERT INTO {} (name, description) VALUES ($1, $2) RETURNING id",
            table.table_name()
        );
        let id = sqlx::query_scalar::<_, Id>(&sql)
            .bind(&definition.name)
            .bind(&definition.description)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn edit_definition(&self, table: DefinitionTable, definition: &Definition) -> StoreResult<bool> {
        let sql = format!(
            "UPDATE {} SET name = $1, description = $2 WHERE id = $3",
            table.table_name()
        );
        let result = sqlx::query(&sql)
            .bind(&definition.name)
            .bind(&definition.description)
            .bind(definition.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_definition(&self, table: DefinitionTable, id: Id) -> StoreResult<Option<Definition>> {
        let sql = format!(
            "SELECT id, name, description FROM {} WHERE id = $1",
            table.table_name()
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(definition_from_row))
    }

    async fn list_definitions(&self, table: DefinitionTable) -> StoreResult<Vec<Definition>> {
        let sql = format!(
            "SELECT id, name, description FROM {} ORDER BY id",
            table.table_name()
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(definition_from_row).collect())
    }

    async fn delete_definition(&self, table: DefinitionTable, id: Id) -> StoreResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table.table_name());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl MappingStore for PostgresStore {
    async fn add_mapping(&self, table: MappingTable, spec: &MappingSpec) -> StoreResult<Id> {
        insert_mapping(&self.pool, table, spec).await
    }

    async fn add_mappings(&self, table: MappingTable, specs: &[MappingSpec], mode: BatchMode) -> StoreResult<Vec<Id>> {
        let mut ids = Vec::with_capacity(specs.len());
        match mode {
            BatchMode::Atomic => {
                let mut tx = self.pool.begin().await?;
                for (index, spec) in specs.iter().enumerate() {
                    // Dropping the transaction on error rolls the batch back
                    let id = insert_mapping(&mut *tx, table, spec)
                        .await
                        .map_err(|e| StoreError::batch_row(index, 0, e))?;
                    ids.push(id);
                }
                tx.commit().await?;
            }
            BatchMode::BestEffort => {
                for (index, spec) in specs.iter().enumerate() {
                    let id = insert_mapping(&self.pool, table, spec)
                        .await
                        .map_err(|e| StoreError::batch_row(index, ids.len(), e))?;
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    async fn edit_mapping(&self, table: MappingTable, id: Id, spec: &MappingSpec) -> StoreResult<bool> {
        let sql = format!(
            "UPDATE {} SET class_id = $1, designation_id = $2, {} = $3, {} = $4 WHERE id = $5",
            table.table_name(),
            table.definition_column(),
            table.value_column()
        );
        let result = sqlx::query(&sql)
            .bind(spec.class_id)
            .bind(spec.designation_id)
            .bind(spec.definition_id)
            .bind(&spec.value)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_mapping(&self, table: MappingTable, id: Id) -> StoreResult<Option<Mapping>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            mapping_columns(table),
            table.table_name()
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(mapping_from_row))
    }

    async fn get_mappings_by_ids(&self, table: MappingTable, ids: &[Id]) -> StoreResult<Vec<Mapping>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ANY($1) ORDER BY id",
            mapping_columns(table),
            table.table_name()
        );
        let rows = sqlx::query(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(mapping_from_row).collect())
    }

    async fn list_mappings(&self, table: MappingTable) -> StoreResult<Vec<Mapping>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id",
            mapping_columns(table),
            table.table_name()
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(mapping_from_row).collect())
    }

    async fn delete_mapping(&self, table: MappingTable, id: Id) -> StoreResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table.table_name());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl VariableStore for PostgresStore {
    async fn get_designation_by_name(&self, name: &str) -> StoreResult<Option<Definition>> {
        let row = sqlx::query("SELECT id, name, description FROM designations WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(definition_from_row))
    }

    async fn variable_exists(&self, designation_id: Id, key: &str) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM variables WHERE designation_id = $1 AND key = $2)",
        )
        .bind(designation_id)
        .bind(key)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn get_variable(&self, designation_id: Id, key: &str) -> StoreResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM variables WHERE designation_id = $1 AND key = $2",
        )
        .bind(designation_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value)
    }

    async fn add_variable(&self, designation_id: Id, variable: &Variable) -> StoreResult<()> {
        sqlx::query("INSERT INTO variables (designation_id, key, value) VALUES ($1, $2, $3)")
            .bind(designation_id)
            .bind(&variable.key)
            .bind(&variable.value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn edit_variable(&self, designation_id: Id, variable: &Variable) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE variables SET value = $1 WHERE designation_id = $2 AND key = $3")
            .bind(&variable.value)
            .bind(designation_id)
            .bind(&variable.key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_columns_alias_table_specific_names() {
        assert_eq!(
            mapping_columns(MappingTable::Microservice),
            "id, class_id, designation_id, microservice_id AS definition_id, yaml AS value"
        );
        assert_eq!(
            mapping_columns(MappingTable::Variable),
            "id, class_id, designation_id, variable_id AS definition_id, value AS value"
        );
    }
}
