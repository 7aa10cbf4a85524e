//! Failure Callback Handler
//!
//! Marks the transaction failed when it is known and always 302s to the
//! failure page; an unknown uuid is logged upstream, not an error here.

use std::sync::Arc;

use salvo::{prelude::*, writing::Redirect};

use crate::{extensions::*, state::State};

/// Failure Callback Handler
#[handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let transaction_uuid = req.query::<String>("transaction_uuid").unwrap_or_default();

    let outcome = state
        .app
        .reconciliation
        .failure_callback(&transaction_uuid)
        .await;

    res.render(Redirect::found(state.pages.redirect_target(&outcome)));

    Ok(())
}
