use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChecklistError {
    #[error("Unknown checklist type: {0} (expected MEQ, DRM or RMQ)")]
    UnknownKind(String),

    #[error("Unknown field type: {0}")]
    UnknownCellType(String),

    #[error("No actor row with id {0}")]
    UnknownActorRow(Uuid),

    #[error("No task row with id {0}")]
    UnknownTaskRow(Uuid),

    #[error("No column named '{0}'")]
    UnknownColumn(String),

    #[error("Column name cannot be empty")]
    EmptyColumnName,

    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("Custom cell tag cannot be empty")]
    EmptyTag,

    #[error("No custom cell at position {0}")]
    UnknownCustomCell(usize),

    #[error("Not a number: {0}")]
    InvalidNumber(String),

    #[error("Cell has no field type yet")]
    BlankCell,

    #[error("Expected a {expected} value, got {actual}")]
    CellTypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Team and designation are resolved at run time for realtime actors")]
    RealtimeActor,

    #[error("Select an entity type before choosing entity objects")]
    NoEntityType,

    #[error("At least one task with a name and a matched action is required")]
    NoPublishableTasks,
}
