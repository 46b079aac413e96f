use minefield_client::{CellView, Difficulty, GameEvent, MinefieldGame, Pos};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Create an offline game handle
    let game = MinefieldGame::new("example-player");

    // Subscribe to game events for background listening
    let mut event_receiver = game.subscribe_to_events().await;

    // Spawn background task to handle events
    let event_handler = tokio::spawn(async move {
        while let Some(event) = event_receiver.recv().await {
            match event {
                GameEvent::CellRevealed {
                    pos,
                    is_mine,
                    adjacent,
                } => {
                    if is_mine {
                        println!("💣 Hit a mine at ({}, {})", pos.row, pos.col);
                    } else {
                        println!(
                            "📋 Revealed ({}, {}) with {} mine neighbors",
                            pos.row, pos.col, adjacent
                        );
                    }
                }
                GameEvent::CascadeRevealed { cells } => {
                    println!("📋 Cascade opened {} cells", cells.len());
                }
                GameEvent::FlagToggled {
                    pos,
                    flagged,
                    mines_remaining,
                } => {
                    println!(
                        "🚩 Cell ({}, {}) flagged: {}, mines remaining: {}",
                        pos.row, pos.col, flagged, mines_remaining
                    );
                }
                GameEvent::GameWon {
                    score,
                    elapsed_seconds,
                } => {
                    println!("🎉 You won! Score {} after {}s", score, elapsed_seconds);
                }
                GameEvent::GameLost { trigger } => {
                    println!("💥 Game over at ({}, {})", trigger.row, trigger.col);
                }
            }
        }
    });

    // Start a beginner game
    game.new_game_with_difficulty(Difficulty::Beginner).await?;
    println!("Started a beginner game (9x9, 10 mines)");

    // Flag and unflag a corner to show the counter moving
    game.flag(Pos { row: 0, col: 8 }).await?;
    game.flag(Pos { row: 0, col: 8 }).await?;

    // Sweep the board until the game ends one way or the other
    'sweep: for row in 0..9 {
        for col in 0..9 {
            if game.is_finished().await {
                break 'sweep;
            }
            game.reveal(Pos { row, col }).await?;
        }
    }

    if let Some(board) = game.board_view().await {
        display_board(&board);
    }
    println!(
        "Final phase: {:?}, score: {:?}, elapsed: {:?}s",
        game.phase().await,
        game.score().await,
        game.elapsed_seconds().await
    );

    // Drop the session and clean up
    game.abandon().await;
    event_handler.abort();
    let _ = event_handler.await;

    Ok(())
}

fn display_board(board: &[Vec<CellView>]) {
    println!("Board state:");
    for (row, cells) in board.iter().enumerate() {
        print!("  ");
        for cell in cells {
            let symbol = match cell {
                CellView::Hidden => "·".to_string(),
                CellView::Flagged => "F".to_string(),
                CellView::Revealed { adjacent: 0 } => " ".to_string(),
                CellView::Revealed { adjacent } => adjacent.to_string(),
                CellView::Mine => "💣".to_string(),
            };
            print!("{:2}", symbol);
        }
        println!("  {}", row);
    }

    if let Some(first_row) = board.first() {
        print!("  ");
        for col in 0..first_row.len() {
            print!("{:2}", col);
        }
        println!();
    }
}
