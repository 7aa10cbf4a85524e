//! Simulated eSewa gateway endpoints

mod handlers;

pub(crate) use handlers::*;
