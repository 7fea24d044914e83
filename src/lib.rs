pub mod app;
pub mod checklist;
pub mod proxy;
pub mod ui;
pub mod workflow;
