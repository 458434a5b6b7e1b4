use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRef {
    pub id: String,
    pub name: String,
    pub board_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    pub id: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRef {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
}

/// Board-level definition of a custom field (e.g. "Order Volume").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFieldRef {
    pub id: String,
    pub name: String,
    pub field_type: String,
}

/// A card as returned by the create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRef {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
}

/// Payload for a new card on a list.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCard<'a> {
    pub list_id: &'a str,
    pub name: &'a str,
    pub desc: &'a str,
    pub due: Option<&'a str>,
}

/// Full member name -> member id.
pub type MemberIndex = HashMap<String, String>;

/// Label name -> label.
pub type LabelIndex = HashMap<String, LabelRef>;
