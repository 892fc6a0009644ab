use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::model::{BatchMode, Definition, DefinitionTable, Id, Mapping, MappingSpec, MappingTable, Variable};
use crate::store::error::{StoreError, StoreResult};
use crate::store::traits::{DefinitionStore, MappingStore, VariableStore};

/// Store kept entirely in process memory.
///
/// Enforces the same unique and reference rules as the PostgreSQL schema in
/// `migrations/`, so handlers see the same error classes from both backends.
/// All operations serialize on one lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    definitions: HashMap<DefinitionTable, BTreeMap<Id, Definition>>,
    mappings: HashMap<MappingTable, BTreeMap<Id, Mapping>>,
    /// (designation id, key) → value
    variables: BTreeMap<(Id, String), String>,
    /// Last id handed out per table name
    sequences: HashMap<&'static str, Id>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryState {
    fn next_id(&mut self, table: &'static str) -> Id {
        let last = self.sequences.entry(table).or_insert(0);
        *last += 1;
        *last
    }

    fn definition_exists(&self, table: DefinitionTable, id: Id) -> bool {
        self.definitions
            .get(&table)
            .is_some_and(|rows| rows.contains_key(&id))
    }

    fn check_definition_name(&self, table: DefinitionTable, name: &str, except: Option<Id>) -> StoreResult<()> {
        let taken = self.definitions.get(&table).is_some_and(|rows| {
            rows.values()
                .any(|row| row.name == name && Some(row.id) != except)
        });
        if taken {
            return Err(StoreError::UniqueViolation(format!(
                "{} named '{}' already exists",
                table.label(),
                name
            )));
        }
        Ok(())
    }

    fn check_mapping(&self, table: MappingTable, spec: &MappingSpec, except: Option<Id>) -> StoreResult<()> {
        let duplicate = self.mappings.get(&table).is_some_and(|rows| {
            rows.values().any(|row| {
                (row.class_id, row.designation_id, row.definition_id) == spec.triple()
                    && Some(row.id) != except
            })
        });
        if duplicate {
            return Err(duplicate_mapping(table, spec));
        }

        let references = [
            (DefinitionTable::Class, spec.class_id),
            (DefinitionTable::Designation, spec.designation_id),
            (table.definition_table(), spec.definition_id),
        ];
        for (referenced, id) in references {
            if !self.definition_exists(referenced, id) {
                return Err(StoreError::ForeignKeyViolation(format!(
                    "{} {} does not exist",
                    referenced.label(),
                    id
                )));
            }
        }
        Ok(())
    }

    fn insert_mapping(&mut self, table: MappingTable, spec: &MappingSpec) -> StoreResult<Id> {
        self.check_mapping(table, spec, None)?;
        let id = self.next_id(table.table_name());
        self.mappings
            .entry(table)
            .or_default()
            .insert(id, spec.clone().into_mapping(id));
        Ok(id)
    }

    /// Check a whole batch without writing anything. Rows are checked against
    /// the stored mappings and against the rows before them in the batch.
    fn check_batch(&self, table: MappingTable, specs: &[MappingSpec]) -> StoreResult<()> {
        for (index, spec) in specs.iter().enumerate() {
            self.check_mapping(table, spec, None)
                .map_err(|e| StoreError::batch_row(index, 0, e))?;
            if specs[..index].iter().any(|earlier| earlier.triple() == spec.triple()) {
                return Err(StoreError::batch_row(index, 0, duplicate_mapping(table, spec)));
            }
        }
        Ok(())
    }

    /// Whether any mapping or variable still points at the definition
    fn is_referenced(&self, table: DefinitionTable, id: Id) -> bool {
        let mappings = self.mappings.iter().any(|(mapping_table, rows)| {
            rows.values().any(|row| match table {
                DefinitionTable::Class => row.class_id == id,
                DefinitionTable::Designation => row.designation_id == id,
                _ => mapping_table.definition_table() == table && row.definition_id == id,
            })
        });
        let variables = table == DefinitionTable::Designation
            && self.variables.keys().any(|(designation_id, _)| *designation_id == id);
        mappings || variables
    }
}

fn duplicate_mapping(table: MappingTable, spec: &MappingSpec) -> StoreError {
    StoreError::UniqueViolation(format!(
        "{} for class {}, designation {}, definition {} already exists",
        table.label(),
        spec.class_id,
        spec.designation_id,
        spec.definition_id
    ))
}

#[async_trait::async_trait]
impl DefinitionStore for MemoryStore {
    async fn add_definition(&self, table: DefinitionTable, definition: &Definition) -> StoreResult<Id> {
        let mut state = self.state.write().await;
        state.check_definition_name(table, &definition.name, None)?;
        let id = state.next_id(table.table_name());
        state
            .definitions
            .entry(table)
            .or_default()
            .insert(id, definition.clone().with_id(id));
        Ok(id)
    }

    async fn edit_definition(&self, table: DefinitionTable, definition: &Definition) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if !state.definition_exists(table, definition.id) {
            return Ok(false);
        }
        state.check_definition_name(table, &definition.name, Some(definition.id))?;
        state
            .definitions
            .entry(table)
            .or_default()
            .insert(definition.id, definition.clone());
        Ok(true)
    }

    async fn get_definition(&self, table: DefinitionTable, id: Id) -> StoreResult<Option<Definition>> {
        let state = self.state.read().await;
        Ok(state
            .definitions
            .get(&table)
            .and_then(|rows| rows.get(&id))
            .cloned())
    }

    async fn list_definitions(&self, table: DefinitionTable) -> StoreResult<Vec<Definition>> {
        let state = self.state.read().await;
        Ok(state
            .definitions
            .get(&table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete_definition(&self, table: DefinitionTable, id: Id) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if !state.definition_exists(table, id) {
            return Ok(false);
        }
        if state.is_referenced(table, id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "{} {} is still referenced",
                table.label(),
                id
            )));
        }
        if let Some(rows) = state.definitions.get_mut(&table) {
            rows.remove(&id);
        }
        Ok(true)
    }
}

#[async_trait::async_trait]
impl MappingStore for MemoryStore {
    async fn add_mapping(&self, table: MappingTable, spec: &MappingSpec) -> StoreResult<Id> {
        let mut state = self.state.write().await;
        state.insert_mapping(table, spec)
    }

    async fn add_mappings(&self, table: MappingTable, specs: &[MappingSpec], mode: BatchMode) -> StoreResult<Vec<Id>> {
        let mut state = self.state.write().await;
        let mut ids = Vec::with_capacity(specs.len());
        match mode {
            BatchMode::Atomic => {
                // Nothing is written until every row has been accepted
                state.check_batch(table, specs)?;
                for (index, spec) in specs.iter().enumerate() {
                    let id = state
                        .insert_mapping(table, spec)
                        .map_err(|e| StoreError::batch_row(index, ids.len(), e))?;
                    ids.push(id);
                }
            }
            BatchMode::BestEffort => {
                for (index, spec) in specs.iter().enumerate() {
                    let id = state
                        .insert_mapping(table, spec)
                        .map_err(|e| StoreError::batch_row(index, ids.len(), e))?;
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    async fn edit_mapping(&self, table: MappingTable, id: Id, spec: &MappingSpec) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let exists = state
            .mappings
            .get(&table)
            .is_some_and(|rows| rows.contains_key(&id));
        if !exists {
            return Ok(false);
        }
        state.check_mapping(table, spec, Some(id))?;
        state
            .mappings
            .entry(table)
            .or_default()
            .insert(id, spec.clone().into_mapping(id));
        Ok(true)
    }

    async fn get_mapping(&self, table: MappingTable, id: Id) -> StoreResult<Option<Mapping>> {
        let state = self.state.read().await;
        Ok(state.mappings.get(&table).and_then(|rows| rows.get(&id)).cloned())
    }

    async fn get_mappings_by_ids(&self, table: MappingTable, ids: &[Id]) -> StoreResult<Vec<Mapping>> {
        let state = self.state.read().await;
        let Some(rows) = state.mappings.get(&table) else {
            return Ok(Vec::new());
        };
        Ok(rows
            .values()
            .filter(|row| ids.contains(&row.id))
            .cloned()
            .collect())
    }

    async fn list_mappings(&self, table: MappingTable) -> StoreResult<Vec<Mapping>> {
        let state = self.state.read().await;
        Ok(state
            .mappings
            .get(&table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete_mapping(&self, table: MappingTable, id: Id) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        Ok(state
            .mappings
            .get_mut(&table)
            .is_some_and(|rows| rows.remove(&id).is_some()))
    }
}

#[async_trait::async_trait]
impl VariableStore for MemoryStore {
    async fn get_designation_by_name(&self, name: &str) -> StoreResult<Option<Definition>> {
        let state = self.state.read().await;
        Ok(state
            .definitions
            .get(&DefinitionTable::Designation)
            .and_then(|rows| rows.values().find(|row| row.name == name))
            .cloned())
    }

    async fn variable_exists(&self, designation_id: Id, key: &str) -> StoreResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .variables
            .contains_key(&(designation_id, key.to_string())))
    }

    async fn get_variable(&self, designation_id: Id, key: &str) -> StoreResult<Option<String>> {
        let state = self.state.read().await;
        Ok(state
            .variables
            .get(&(designation_id, key.to_string()))
            .cloned())
    }

    async fn add_variable(&self, designation_id: Id, variable: &Variable) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let slot = (designation_id, variable.key.clone());
        if state.variables.contains_key(&slot) {
            return Err(StoreError::UniqueViolation(format!(
                "variable '{}' already exists for designation {}",
                variable.key, designation_id
            )));
        }
        if !state.definition_exists(DefinitionTable::Designation, designation_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "designation {} does not exist",
                designation_id
            )));
        }
        state.variables.insert(slot, variable.value.clone());
        Ok(())
    }

    async fn edit_variable(&self, designation_id: Id, variable: &Variable) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        match state.variables.get_mut(&(designation_id, variable.key.clone())) {
            Some(value) => {
                *value = variable.value.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
