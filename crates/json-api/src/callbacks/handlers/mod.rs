//! Callback Handlers

pub(crate) mod failure;
pub(crate) mod success;
