pub mod action;
pub mod config;
pub mod dialog;
mod editor;
pub mod state;

pub use action::{Action, FetchSource};
pub use config::{ApiConfig, Config, GlobalConfig, LogLevel as ConfigLogLevel, ProxyConfig, UiConfig};
pub use dialog::{
    ColumnDialogState, CustomCellDialogState, Dialog, EditTarget, FieldTypeDialogState,
    FieldTypeFocus, MultiPickerState, PickerOption, PickerState, TextInputState,
};
pub use state::{
    AppState, Cursor, LoadingState, LogEntry, LogLevel, Section, Toast, ToastLevel,
    ACTOR_COLUMNS,
};
