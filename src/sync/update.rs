use tracing::info;

use super::resolver::resolve_board;
use crate::error::Result;
use crate::model::board::{BoardRef, ListRef};
use crate::providers::BoardProvider;

/// Resolve the board and enumerate its lists. No cards are touched.
pub async fn enumerate_lists(
    provider: &dyn BoardProvider,
    board_name: &str,
) -> Result<(BoardRef, Vec<ListRef>)> {
    let board = resolve_board(provider, board_name).await?;
    let lists = provider.list_lists(&board.id).await?;
    info!("Board '{}' has {} lists.", board.name, lists.len());
    for list in &lists {
        info!("List '{}' ({}) on board {}", list.name, list.id, list.board_id);
    }
    Ok((board, lists))
}
