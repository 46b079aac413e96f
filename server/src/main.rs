use minefield_server::{build, store::create_store};
use rocket::{Build, Rocket};
use tracing::info;

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    tracing_subscriber::fmt::init();
    info!("🚀 Starting minefield leaderboard server");

    let store = create_store().expect("Failed to initialize score store");

    info!("🌐 Server configured with CORS, rate limiting and score storage");
    info!("📡 Endpoints: GET /scores, POST /scores");

    build(store)
}
