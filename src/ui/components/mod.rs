pub mod actor_table;
pub mod column_dialog;
pub mod custom_cell_dialog;
pub mod field_type_dialog;
pub mod help_overlay;
pub mod modal;
pub mod picker;
pub mod status_bar;
pub mod task_table;
pub mod toast;

pub use actor_table::ActorTableWidget;
pub use column_dialog::ColumnDialog;
pub use custom_cell_dialog::CustomCellDialog;
pub use field_type_dialog::FieldTypeDialog;
pub use help_overlay::HelpOverlay;
pub use modal::{render_confirm_modal, render_input_modal};
pub use picker::{MultiPickerWidget, PickerWidget};
pub use status_bar::StatusBarWidget;
pub use task_table::TaskTableWidget;
pub use toast::ToastWidget;
