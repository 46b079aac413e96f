use minefield_client::{
    Difficulty, LeaderboardClient, LeaderboardQuery, ScoreRecord, SortOrder,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Create a client connecting to the leaderboard server
    let client = LeaderboardClient::new("http://localhost:8000")?;

    // Submit a finished game
    let record = ScoreRecord {
        id: None,
        player_name: "example-player".to_string(),
        score: 7100,
        elapsed_seconds: 42,
        rows: 9,
        cols: 9,
        mine_count: 10,
        difficulty: Difficulty::Beginner,
        won: true,
        timestamp: None,
    };
    client.submit(&record).await?;
    println!("Submitted score {} for {}", record.score, record.player_name);

    // Fetch the overall top ten
    let top = client.top_scores(&LeaderboardQuery::default()).await?;
    println!("Top {} scores:", top.len());
    for (rank, entry) in top.iter().enumerate() {
        println!(
            "{}. {} with {} points ({}s, {})",
            rank + 1,
            entry.player_name,
            entry.score,
            entry.elapsed_seconds,
            entry.difficulty.label()
        );
    }

    // Fetch the fastest beginner clears
    let fastest = client
        .top_scores(&LeaderboardQuery {
            limit: 5,
            difficulty: Some(Difficulty::Beginner),
            order: SortOrder::Time,
        })
        .await?;
    println!("Fastest beginner clears:");
    for entry in &fastest {
        println!("  {} in {}s", entry.player_name, entry.elapsed_seconds);
    }

    Ok(())
}
