use serde_json::Value;

use crate::checklist::{ActorRecord, EntityTaxonomy};

/// The three reference fetches made when a checklist opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Actors,
    Entities,
    Step,
}

impl FetchSource {
    pub fn label(&self) -> &'static str {
        match self {
            FetchSource::Actors => "actors",
            FetchSource::Entities => "entity data",
            FetchSource::Step => "workflow step",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Tick,

    NextSection,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,

    EditCell,
    ToggleCell,
    AddRow,
    DeleteRow,
    OpenColumns,
    OpenFieldType,
    OpenCustomCell,

    DialogUp,
    DialogDown,
    DialogToggle,
    DialogNextField,
    DialogBeginInput,
    DialogInput(char),
    DialogBackspace,
    DialogDelete,
    DialogSubmit,
    DialogCancel,

    RequestPublish,
    ConfirmPublish,
    Reload,

    ToggleHelp,
    ToggleLogs,

    ActorsLoaded(Vec<ActorRecord>),
    EntitiesLoaded(EntityTaxonomy),
    StepLoaded(Option<Value>),
    FetchFailed { source: FetchSource, error: String },
    PublishSucceeded,
    PublishFailed { error: String },
}
