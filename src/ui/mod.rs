pub mod app;
pub mod components;
pub mod helpers;

pub use app::AppWidget;
pub use helpers::{
    bottom_rect, centered_rect, key_hints, render_field_line, truncate, wrap_text, CursorType, FieldLineOptions,
    STYLE_FOOTER, STYLE_HIGHLIGHT, STYLE_KEY, STYLE_LABEL, STYLE_LABEL_SELECTED,
    STYLE_SELECTED_ROW, STYLE_SEPARATOR, STYLE_TOGGLE, STYLE_TOGGLE_SELECTED, STYLE_VALUE,
    STYLE_VALUE_SELECTED,
};
