//! Order listing endpoints

mod handlers;

pub(crate) use handlers::*;
