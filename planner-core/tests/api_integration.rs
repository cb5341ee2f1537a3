//! Integration tests that call the real Claude API.
//!
//! These tests require ANTHROPIC_API_KEY to be set (via .env file or environment).
//! Run with: `cargo test -p planner-core --test api_integration -- --ignored`
//!
//! These are marked #[ignore] by default to avoid:
//! - API costs in CI
//! - Test failures when no API key is available
//! - Slow test runs (API calls take seconds)

use claude::Claude;
use planner_core::{ArtifactKind, Board, BoardConfig, Card};
use std::time::Duration;

/// Load environment variables from .env file
fn setup() {
    let _ = dotenvy::dotenv();
}

/// Check if API key is available
fn has_api_key() -> bool {
    std::env::var("ANTHROPIC_API_KEY").is_ok()
}

fn live_board() -> Board<Claude> {
    let client = Claude::from_env().expect("Failed to create client");
    let config = BoardConfig::from_env()
        .expect("Invalid PLANNER_* settings")
        .with_max_tokens(1024)
        .with_timeout(Duration::from_secs(120));
    Board::new(client, config)
}

#[tokio::test]
#[ignore] // Run with: cargo test -p planner-core --test api_integration -- --ignored
async fn test_requirement_to_tasks_live() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: ANTHROPIC_API_KEY not set");
        return;
    }

    let mut board = live_board();
    let req = board
        .add_requirement("Registered users can reset a forgotten password by email")
        .unwrap();

    let epic = board
        .convert_to_epic(req)
        .await
        .expect("epic generation should succeed")
        .expect("model should return epic text");
    println!("EPIC:\n{}\n", board.store().epic(epic).unwrap().text());

    let stories = board
        .expand_epic_to_stories(epic)
        .await
        .expect("story generation should succeed");
    assert!(!stories.is_empty(), "expected at least one story");
    for story in board.store().stories() {
        assert!(!story.text().contains("<<<SPLIT>>>"));
        assert_eq!(story.epic_id(), epic);
    }

    let tasks = board
        .break_story(stories[0])
        .await
        .expect("task generation should succeed");
    assert!(!tasks.is_empty(), "expected at least one task");
    for task in board.store().tasks_of_story(stories[0]) {
        println!("TASK #{}: {}", task.id(), task.text());
        assert!(!task.text().contains("<<<TASK_SPLIT>>>"));
    }

    board.select_task(tasks[0]);
    let lit = board.view().highlighted().len();
    assert_eq!(lit, 4);
    assert_eq!(board.store().len(ArtifactKind::Requirement), 1);
}

#[tokio::test]
#[ignore]
async fn test_bad_api_key_is_generation_failure() {
    setup();

    let client = Claude::new("sk-ant-invalid");
    let mut board = Board::new(client, BoardConfig::new());
    let req = board.add_requirement("Anything").unwrap();

    let err = board.convert_to_epic(req).await.unwrap_err();
    println!("Error (expected): {err}");
    assert!(err.to_string().starts_with("epic generation failed"));
    assert_eq!(board.store().len(ArtifactKind::Epic), 0);
}
