use minefield_common::{
    models::{Difficulty, ScoreRecord},
    protocol::{LeaderboardQuery, SortOrder, SubmitResponse},
};
use rocket::{State, get, http::Status, post, serde::json::Json};
use tracing::{error, info, instrument, warn};

use crate::{
    rate_limit::{ClientIp, RateLimiter, check_rate_limit},
    store::SharedStore,
};

#[get("/scores?<limit>&<difficulty>&<order>")]
#[instrument(level = "trace", skip(store))]
pub fn get_scores(
    limit: Option<usize>,
    difficulty: Option<&str>,
    order: Option<&str>,
    store: &State<SharedStore>,
) -> Result<Json<Vec<ScoreRecord>>, Status> {
    let mut query = LeaderboardQuery::default();

    if let Some(limit) = limit {
        query.limit = limit;
    }
    if let Some(label) = difficulty {
        match Difficulty::from_label(label) {
            Some(difficulty) => query.difficulty = Some(difficulty),
            None => {
                warn!("Rejecting leaderboard query with unknown difficulty: {label}");
                return Err(Status::BadRequest);
            }
        }
    }
    if let Some(label) = order {
        match SortOrder::from_label(label) {
            Some(order) => query.order = order,
            None => {
                warn!("Rejecting leaderboard query with unknown sort order: {label}");
                return Err(Status::BadRequest);
            }
        }
    }

    store.top(&query).map(Json).map_err(|e| {
        error!("Failed to read leaderboard: {}", e);
        Status::InternalServerError
    })
}

#[post("/scores", data = "<record>")]
#[instrument(level = "trace", skip(store, rate_limiter, record), fields(client_ip = %client_ip.0, player = %record.player_name))]
pub fn submit_score(
    record: Json<ScoreRecord>,
    store: &State<SharedStore>,
    rate_limiter: &State<RateLimiter>,
    client_ip: ClientIp,
) -> Result<Json<SubmitResponse>, Status> {
    if let Err(status) = check_rate_limit(rate_limiter, client_ip.0) {
        warn!("Rate limit exceeded for client {}", client_ip.0);
        return Err(status);
    }

    if record.player_name.trim().is_empty() {
        warn!("Rejecting score submission without a player name");
        return Err(Status::BadRequest);
    }

    match store.insert(record.0) {
        Ok(stored) => {
            info!(
                "Stored score {} for player {}",
                stored.score, stored.player_name
            );
            Ok(Json(SubmitResponse { success: true }))
        }
        Err(e) => {
            error!("Failed to store score: {}", e);
            Err(Status::InternalServerError)
        }
    }
}
