use crate::model::{BatchMode, Definition, DefinitionTable, Id, Mapping, MappingSpec, MappingTable, Variable};
use crate::store::error::StoreResult;

#[async_trait::async_trait]
pub trait DefinitionStore: Send + Sync {
    /// Insert a definition and return its generated id
    async fn add_definition(&self, table: DefinitionTable, definition: &Definition) -> StoreResult<Id>;
    /// Overwrite a definition by id; `false` when no row has that id
    async fn edit_definition(&self, table: DefinitionTable, definition: &Definition) -> StoreResult<bool>;
    async fn get_definition(&self, table: DefinitionTable, id: Id) -> StoreResult<Option<Definition>>;
    async fn list_definitions(&self, table: DefinitionTable) -> StoreResult<Vec<Definition>>;
    async fn delete_definition(&self, table: DefinitionTable, id: Id) -> StoreResult<bool>;
}

#[async_trait::async_trait]
pub trait MappingStore: Send + Sync {
    async fn add_mapping(&self, table: MappingTable, spec: &MappingSpec) -> StoreResult<Id>;
    /// Insert every spec and return the generated ids in submission order
    async fn add_mappings(&self, table: MappingTable, specs: &[MappingSpec], mode: BatchMode) -> StoreResult<Vec<Id>>;
    async fn edit_mapping(&self, table: MappingTable, id: Id, spec: &MappingSpec) -> StoreResult<bool>;
    async fn get_mapping(&self, table: MappingTable, id: Id) -> StoreResult<Option<Mapping>>;
    /// Rows for the given ids, ordered by id; unknown ids are skipped
    async fn get_mappings_by_ids(&self, table: MappingTable, ids: &[Id]) -> StoreResult<Vec<Mapping>>;
    async fn list_mappings(&self, table: MappingTable) -> StoreResult<Vec<Mapping>>;
    async fn delete_mapping(&self, table: MappingTable, id: Id) -> StoreResult<bool>;
}

#[async_trait::async_trait]
pub trait VariableStore: Send + Sync {
    async fn get_designation_by_name(&self, name: &str) -> StoreResult<Option<Definition>>;
    async fn variable_exists(&self, designation_id: Id, key: &str) -> StoreResult<bool>;
    /// Current value of a variable, if present
    async fn get_variable(&self, designation_id: Id, key: &str) -> StoreResult<Option<String>>;
    async fn add_variable(&self, designation_id: Id, variable: &Variable) -> StoreResult<()>;
    /// Replace a variable's value; `false` when it does not exist
    async fn edit_variable(&self, designation_id: Id, variable: &Variable) -> StoreResult<bool>;
}

pub trait Store: DefinitionStore + MappingStore + VariableStore + Send + Sync {}
impl<T: DefinitionStore + MappingStore + VariableStore + Send + Sync> Store for T {}
