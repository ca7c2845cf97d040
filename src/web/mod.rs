//! HTML page layer (askama templates + view models)

pub mod handlers;
pub mod view_models;
