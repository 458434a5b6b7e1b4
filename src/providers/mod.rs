pub mod trello;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::board::{
    BoardRef, CardRef, CustomFieldRef, LabelRef, ListRef, MemberRef, NewCard,
};

/// The remote kanban board as seen by the sync job.
///
/// Every call is a single request; collections are assumed to come back
/// complete (no pagination).
#[async_trait]
pub trait BoardProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn list_boards(&self) -> Result<Vec<BoardRef>>;
    async fn list_lists(&self, board_id: &str) -> Result<Vec<ListRef>>;
    async fn list_members(&self, board_id: &str) -> Result<Vec<MemberRef>>;
    async fn list_labels(&self, board_id: &str) -> Result<Vec<LabelRef>>;
    async fn list_custom_fields(&self, board_id: &str) -> Result<Vec<CustomFieldRef>>;
    async fn create_card(&self, card: &NewCard<'_>) -> Result<CardRef>;
    async fn add_label(&self, card_id: &str, label_id: &str) -> Result<()>;
    async fn assign_member(&self, card_id: &str, member_id: &str) -> Result<()>;
    async fn set_custom_number(&self, card_id: &str, field_id: &str, value: f64) -> Result<()>;
}
