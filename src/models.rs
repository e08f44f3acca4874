// Read-only views over API responses. Field names follow the remote JSON
// (camelCase); anything the tool does not display is ignored on decode.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An organization the token has access to. Entries without an id are still
/// listed but can only be picked by number, not by select-all.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Organization {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A terminal group after flattening; active and dormant groups look the same.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TerminalGroup {
    pub id: String,
    pub name: Option<String>,
    pub organization_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RestaurantSection {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tables: Vec<Table>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Table {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub number: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `/api/1/access_token`.
#[derive(Deserialize, Debug)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Body of `/api/1/organizations`.
#[derive(Deserialize, Debug)]
pub(crate) struct OrganizationsResponse {
    #[serde(default)]
    pub organizations: Vec<Organization>,
}

/// Body of `/api/1/terminal_groups`. Both arrays hold per-organization
/// containers whose `items` are the actual groups.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TerminalGroupsResponse {
    #[serde(default)]
    pub terminal_groups: Vec<GroupContainer>,
    #[serde(default)]
    pub terminal_groups_in_sleep: Vec<GroupContainer>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GroupContainer {
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub items: Vec<GroupItem>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GroupItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
}

impl TerminalGroupsResponse {
    /// Concatenate active then dormant containers and emit every item that
    /// has an id, in response order. Duplicates are kept.
    pub fn flatten(self) -> Vec<TerminalGroup> {
        self.terminal_groups
            .into_iter()
            .chain(self.terminal_groups_in_sleep)
            .flat_map(|container| {
                let owner = container.organization_id;
                container.items.into_iter().filter_map(move |item| {
                    let id = item.id?;
                    Some(TerminalGroup {
                        id,
                        name: item.name,
                        organization_id: item.organization_id.or_else(|| owner.clone()),
                    })
                })
            })
            .collect()
    }
}

/// Body of `/api/1/reserve/available_restaurant_sections`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SectionsResponse {
    #[serde(default)]
    pub restaurant_sections: Vec<RestaurantSection>,
}

/// Body of `/api/1/order/by_table`.
#[derive(Deserialize, Debug)]
pub(crate) struct OrdersResponse {
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// An order exactly as the API returned it.
///
/// The nested shape varies between deployments, so the raw JSON is kept and
/// fields are read through [`Order::text`], which yields `None` for anything
/// missing or of an unexpected type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct Order(pub Value);

impl Order {
    /// Walk `path` through nested objects and render a scalar leaf.
    pub fn text(&self, path: &[&str]) -> Option<String> {
        let leaf = path.iter().try_fold(&self.0, |node, key| node.get(key))?;
        match leaf {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Table ids from `order.tableIds`; non-string entries are skipped.
    pub fn table_ids(&self) -> Vec<String> {
        self.0
            .pointer("/order/tableIds")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }
}
