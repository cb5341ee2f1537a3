//! Sprint planning board with LLM-assisted decomposition.
//!
//! This crate provides:
//! - The artifact model: requirements, epics, user stories and tasks
//! - An in-memory store with id allocation and ancestor links
//! - A generation pipeline behind the [`CompletionBackend`] seam
//! - A [`Board`] controller and a render-ready [`BoardView`]
//!
//! # Quick Start
//!
//! ```ignore
//! use claude::Claude;
//! use planner_core::{Board, BoardConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut board = Board::new(Claude::from_env()?, BoardConfig::from_env()?);
//!
//!     let req = board.add_requirement("Shoppers can pay by card").unwrap();
//!     if let Some(epic) = board.convert_to_epic(req).await? {
//!         let stories = board.expand_epic_to_stories(epic).await?;
//!         println!("{} stories", stories.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod board;
pub mod completion;
pub mod id;
pub mod pipeline;
pub mod store;
pub mod testing;
pub mod view;

// Primary public API
pub use artifact::{ArtifactKind, ArtifactRef, Card, Epic, ParentField, Requirement, Story, Task, UnknownKind};
pub use board::{Board, BoardConfig, BoardError, ConfigError, DEFAULT_MODEL};
pub use completion::{CompletionBackend, CompletionError, CompletionParams};
pub use id::{ArtifactId, IdAllocator};
pub use pipeline::{GenerationError, GenerationStage, Generator};
pub use store::ArtifactStore;
pub use testing::{MockBackend, TestHarness};
pub use view::{BoardView, CardView, Intent, Outcome, PREVIEW_CHARS};
