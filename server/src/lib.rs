pub mod cors;
pub mod rate_limit;
pub mod routes;
pub mod store;

use rocket::{Build, Rocket, routes};

use crate::{
    cors::create_cors,
    rate_limit::create_rate_limiter,
    routes::{get_scores, submit_score},
    store::SharedStore,
};

/// Assemble the rocket instance around a storage backend.
pub fn build(store: SharedStore) -> Rocket<Build> {
    rocket::build()
        .attach(create_cors())
        .manage(store)
        .manage(create_rate_limiter())
        .mount("/", routes![get_scores, submit_score])
}
