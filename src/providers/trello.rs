use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::BoardProvider;
use crate::config::Credentials;
use crate::error::{Result, SyncError};
use crate::model::board::{
    BoardRef, CardRef, CustomFieldRef, LabelRef, ListRef, MemberRef, NewCard,
};

pub struct TrelloProvider {
    api_key: String,
    token: String,
    client: reqwest::Client,
    base_url: String,
}

impl TrelloProvider {
    pub fn new(credentials: &Credentials, base_url: impl Into<String>) -> Self {
        Self {
            api_key: credentials.api_key.clone(),
            token: credentials.token.clone(),
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn auth_params(&self) -> [(&str, &str); 2] {
        [("key", &self.api_key), ("token", &self.token)]
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let resp = self
            .client
            .get(self.url(path))
            .query(&self.auth_params())
            .query(query)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }
}

/// Turn non-2xx responses into `SyncError::Api` carrying the body text.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SyncError::Api {
        status: status.as_u16(),
        body,
    })
}

#[derive(Deserialize)]
struct Board {
    id: String,
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrelloList {
    id: String,
    name: String,
    id_board: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Member {
    id: String,
    full_name: Option<String>,
}

#[derive(Deserialize)]
struct TrelloLabel {
    id: String,
    #[serde(default)]
    name: String,
    color: Option<String>,
}

#[derive(Deserialize)]
struct CustomField {
    id: String,
    name: String,
    #[serde(rename = "type")]
    field_type: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Card {
    id: String,
    name: String,
    short_url: Option<String>,
}

#[async_trait]
impl BoardProvider for TrelloProvider {
    fn name(&self) -> &str {
        "Trello"
    }

    async fn list_boards(&self) -> Result<Vec<BoardRef>> {
        let boards: Vec<Board> = self
            .get_json("members/me/boards", &[("fields", "id,name"), ("filter", "all")])
            .await?;
        Ok(boards
            .into_iter()
            .map(|b| BoardRef {
                id: b.id,
                name: b.name,
            })
            .collect())
    }

    async fn list_lists(&self, board_id: &str) -> Result<Vec<ListRef>> {
        let lists: Vec<TrelloList> = self
            .get_json(
                &format!("boards/{board_id}/lists"),
                &[("fields", "id,name,idBoard"), ("filter", "all")],
            )
            .await?;
        Ok(lists
            .into_iter()
            .map(|l| ListRef {
                id: l.id,
                name: l.name,
                board_id: l.id_board.unwrap_or_else(|| board_id.to_string()),
            })
            .collect())
    }

    async fn list_members(&self, board_id: &str) -> Result<Vec<MemberRef>> {
        let members: Vec<Member> = self
            .get_json(
                &format!("boards/{board_id}/members"),
                &[("fields", "id,fullName")],
            )
            .await?;
        Ok(members
            .into_iter()
            .map(|m| MemberRef {
                id: m.id,
                full_name: m.full_name.unwrap_or_default(),
            })
            .collect())
    }

    async fn list_labels(&self, board_id: &str) -> Result<Vec<LabelRef>> {
        let labels: Vec<TrelloLabel> = self
            .get_json(
                &format!("boards/{board_id}/labels"),
                &[("fields", "id,name,color"), ("limit", "1000")],
            )
            .await?;
        Ok(labels
            .into_iter()
            .map(|l| LabelRef {
                id: l.id,
                name: l.name,
                color: l.color,
            })
            .collect())
    }

    async fn list_custom_fields(&self, board_id: &str) -> Result<Vec<CustomFieldRef>> {
        let fields: Vec<CustomField> = self
            .get_json(&format!("boards/{board_id}/customFields"), &[])
            .await?;
        Ok(fields
            .into_iter()
            .map(|f| CustomFieldRef {
                id: f.id,
                name: f.name,
                field_type: f.field_type,
            })
            .collect())
    }

    async fn create_card(&self, card: &NewCard<'_>) -> Result<CardRef> {
        let body = serde_json::json!({
            "idList": card.list_id,
            "name": card.name,
            "desc": card.desc,
            "due": card.due,
        });
        let resp = self
            .client
            .post(self.url("cards"))
            .query(&self.auth_params())
            .json(&body)
            .send()
            .await?;
        let created: Card = check(resp).await?.json().await?;
        Ok(CardRef {
            id: created.id,
            name: created.name,
            url: created.short_url,
        })
    }

    async fn add_label(&self, card_id: &str, label_id: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.url(&format!("cards/{card_id}/idLabels")))
            .query(&self.auth_params())
            .query(&[("value", label_id)])
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    async fn assign_member(&self, card_id: &str, member_id: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.url(&format!("cards/{card_id}/idMembers")))
            .query(&self.auth_params())
            .query(&[("value", member_id)])
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    async fn set_custom_number(&self, card_id: &str, field_id: &str, value: f64) -> Result<()> {
        // Trello wants number values as strings.
        let body = serde_json::json!({ "value": { "number": value.to_string() } });
        let resp = self
            .client
            .put(self.url(&format!("cards/{card_id}/customField/{field_id}/item")))
            .query(&self.auth_params())
            .json(&body)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }
}
