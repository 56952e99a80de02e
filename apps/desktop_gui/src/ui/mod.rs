pub mod app;
pub mod event_flow;
