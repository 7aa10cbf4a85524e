//! Success Callback Handler
//!
//! eSewa redirects the shopper here with a base64 `data` payload after a
//! payment attempt. Reconciliation never errors; every path ends in a 302
//! to a storefront page so the gateway never sees a 5xx.

use std::sync::Arc;

use salvo::{prelude::*, writing::Redirect};

use crate::{extensions::*, state::State};

/// Success Callback Handler
#[handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let data = req.query::<String>("data").unwrap_or_default();

    let outcome = state.app.reconciliation.success_callback(&data).await;

    res.render(Redirect::found(state.pages.redirect_target(&outcome)));

    Ok(())
}
