use rocket::http::Method;
use rocket_cors::{AllowedOrigins, CorsOptions};
use std::env;

pub fn create_cors() -> rocket_cors::Cors {
    let allowed_origins_env = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string());

    // The leaderboard is read and written by a static browser frontend, so
    // the default is wide open; deployments can pin exact origins.
    let allowed_origins = if allowed_origins_env.trim() == "*" {
        AllowedOrigins::all()
    } else {
        let origins: Vec<String> = allowed_origins_env
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        AllowedOrigins::some_exact(&origins)
    };

    CorsOptions {
        allowed_origins,
        allowed_methods: vec![Method::Get, Method::Post, Method::Options]
            .into_iter()
            .map(|m| m.into())
            .collect(),
        allowed_headers: rocket_cors::AllowedHeaders::some(&["Accept", "Content-Type"]),
        allow_credentials: false,
        ..Default::default()
    }
    .to_cors()
    .expect("Failed to create CORS configuration")
}
