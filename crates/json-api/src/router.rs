//! App Router

use salvo::Router;

use crate::{callbacks, esewa, healthcheck, orders, payments};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("api")
                .push(
                    Router::with_path("payment")
                        .push(Router::with_path("initiate").post(payments::initiate::handler))
                        .push(
                            Router::with_path("status/{transaction_uuid}")
                                .get(payments::status::handler),
                        ),
                )
                .push(Router::with_path("esewa/status").get(esewa::status::handler))
                .push(Router::with_path("orders").get(orders::index::handler)),
        )
        .push(
            Router::with_path("payment")
                .push(Router::with_path("success").get(callbacks::success::handler))
                .push(Router::with_path("failure").get(callbacks::failure::handler)),
        )
}
