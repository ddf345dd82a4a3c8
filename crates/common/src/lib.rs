//! Shared types, error definitions, and utilities used across all visage crates.

pub mod error;
pub mod types;

pub use {
    error::{Error, FromMessage, Result, VisageError},
    types::{
        ContextScope, DisguisePolicy, DisguiseState, DisplayField, DisplayOptions, NameField,
        UserRecord, ViewContext,
    },
};
