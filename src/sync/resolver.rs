use tracing::{error, info};

use crate::error::{Result, SyncError};
use crate::model::board::{BoardRef, CustomFieldRef, LabelIndex, ListRef, MemberIndex};
use crate::providers::BoardProvider;

pub async fn resolve_board(provider: &dyn BoardProvider, name: &str) -> Result<BoardRef> {
    let boards = provider.list_boards().await?;
    match boards.into_iter().find(|b| b.name == name) {
        Some(board) => Ok(board),
        None => {
            error!("Board '{name}' not found.");
            Err(SyncError::BoardNotFound(name.to_string()))
        }
    }
}

pub async fn resolve_list(
    provider: &dyn BoardProvider,
    board: &BoardRef,
    name: &str,
) -> Result<ListRef> {
    let lists = provider.list_lists(&board.id).await?;
    match lists.into_iter().find(|l| l.name == name) {
        Some(list) => Ok(list),
        None => {
            error!("List '{name}' not found.");
            Err(SyncError::ListNotFound(name.to_string()))
        }
    }
}

pub async fn build_member_index(
    provider: &dyn BoardProvider,
    board: &BoardRef,
) -> Result<MemberIndex> {
    Ok(provider
        .list_members(&board.id)
        .await?
        .into_iter()
        .map(|m| (m.full_name, m.id))
        .collect())
}

/// Unnamed labels are skipped; they can never match a status.
pub async fn build_label_index(
    provider: &dyn BoardProvider,
    board: &BoardRef,
) -> Result<LabelIndex> {
    Ok(provider
        .list_labels(&board.id)
        .await?
        .into_iter()
        .filter(|l| !l.name.is_empty())
        .map(|l| (l.name.clone(), l))
        .collect())
}

pub async fn find_custom_field(
    provider: &dyn BoardProvider,
    board: &BoardRef,
    name: &str,
) -> Result<Option<CustomFieldRef>> {
    Ok(provider
        .list_custom_fields(&board.id)
        .await?
        .into_iter()
        .find(|f| f.name == name))
}

/// Everything the synchronizer needs to know about the target board,
/// fetched once per run.
#[derive(Debug, Clone)]
pub struct BoardContext {
    pub board: BoardRef,
    pub list: ListRef,
    pub members: MemberIndex,
    pub labels: LabelIndex,
    pub order_volume: Option<CustomFieldRef>,
}

impl BoardContext {
    pub async fn resolve(
        provider: &dyn BoardProvider,
        board_name: &str,
        list_name: &str,
        custom_field: &str,
    ) -> Result<Self> {
        let board = resolve_board(provider, board_name).await?;
        let list = resolve_list(provider, &board, list_name).await?;
        let members = build_member_index(provider, &board).await?;
        let labels = build_label_index(provider, &board).await?;
        let order_volume = find_custom_field(provider, &board, custom_field).await?;
        match &order_volume {
            Some(field) => info!("Custom field '{}' ({}) found.", field.name, field.field_type),
            None => info!("Custom field '{custom_field}' not found on board; it will not be set."),
        }
        Ok(Self {
            board,
            list,
            members,
            labels,
            order_volume,
        })
    }
}
