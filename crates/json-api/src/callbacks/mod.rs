//! Gateway callback endpoints

mod handlers;

pub(crate) use handlers::*;
