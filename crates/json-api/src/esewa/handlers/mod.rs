//! eSewa Handlers

pub(crate) mod status;
