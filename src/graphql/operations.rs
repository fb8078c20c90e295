//! Operation Documents
//!
//! Documents, variables and result shapes for every operation the views use,
//! with one async wrapper per operation.

use serde::{Deserialize, Serialize};

use super::{GraphqlClient, Operation};
use crate::error::ApiError;
use crate::models::{Item, TodoList};

// ========================
// Variables
// ========================

#[derive(Debug, Serialize)]
pub struct NoVariables {}

#[derive(Debug, Serialize)]
pub struct ListVariables {
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListIdVariables {
    pub list_id: String,
}

#[derive(Debug, Serialize)]
pub struct InputVariables<T> {
    pub input: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListItemInput {
    pub list_id: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CompleteListItemInput {
    pub id: String,
    pub complete: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateListInput {
    pub name: String,
}

// ========================
// Results
// ========================

#[derive(Debug, Clone, Deserialize)]
pub struct ListData {
    pub list: TodoList,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListsData {
    pub lists: Vec<TodoList>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListItemData {
    pub create_list_item: Item,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteListItemData {
    pub complete_list_item: Item,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCompletedListItemsData {
    pub remove_completed_list_items: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListData {
    pub create_list: TodoList,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemChangedData {
    #[serde(default)]
    pub list_item_changed: Option<Item>,
}

// ========================
// Documents
// ========================

pub struct ListQuery;
pub struct ListsQuery;
pub struct CreateListItemMutation;
pub struct CompleteListItemMutation;
pub struct RemoveCompletedListItemsMutation;
pub struct CreateListMutation;
pub struct OnListItemChangedSubscription;

impl Operation for ListQuery {
    const NAME: &'static str = "List";
    const DOCUMENT: &'static str = r#"query List($id: ID!) {
  list(id: $id) {
    id
    name
    shared
    owner { id username }
    items { id description position complete }
  }
}"#;
    type Variables = ListVariables;
    type Data = ListData;
}

impl Operation for ListsQuery {
    const NAME: &'static str = "Lists";
    const DOCUMENT: &'static str = r#"query Lists {
  lists {
    id
    name
    shared
    owner { id username }
  }
}"#;
    type Variables = NoVariables;
    type Data = ListsData;
}

impl Operation for CreateListItemMutation {
    const NAME: &'static str = "CreateListItem";
    const DOCUMENT: &'static str = r#"mutation CreateListItem($input: CreateListItemInput!) {
  createListItem(input: $input) { id description position complete }
}"#;
    type Variables = InputVariables<CreateListItemInput>;
    type Data = CreateListItemData;
}

impl Operation for CompleteListItemMutation {
    const NAME: &'static str = "CompleteListItem";
    const DOCUMENT: &'static str = r#"mutation CompleteListItem($input: CompleteListItemInput!) {
  completeListItem(input: $input) { id description position complete }
}"#;
    type Variables = InputVariables<CompleteListItemInput>;
    type Data = CompleteListItemData;
}

impl Operation for RemoveCompletedListItemsMutation {
    const NAME: &'static str = "RemoveCompletedListItems";
    const DOCUMENT: &'static str = r#"mutation RemoveCompletedListItems($listId: ID!) {
  removeCompletedListItems(listId: $listId)
}"#;
    type Variables = ListIdVariables;
    type Data = RemoveCompletedListItemsData;
}

impl Operation for CreateListMutation {
    const NAME: &'static str = "CreateList";
    const DOCUMENT: &'static str = r#"mutation CreateList($input: CreateListInput!) {
  createList(input: $input) {
    id
    name
    shared
    owner { id username }
  }
}"#;
    type Variables = InputVariables<CreateListInput>;
    type Data = CreateListData;
}

impl Operation for OnListItemChangedSubscription {
    const NAME: &'static str = "OnListItemChanged";
    const DOCUMENT: &'static str = r#"subscription OnListItemChanged($listId: ID!) {
  listItemChanged(listId: $listId) { id description position complete }
}"#;
    type Variables = ListIdVariables;
    type Data = ListItemChangedData;
}

// ========================
// Calls
// ========================

pub async fn fetch_list(client: &GraphqlClient, id: &str) -> Result<TodoList, ApiError> {
    let vars = ListVariables { id: id.to_string() };
    Ok(client.execute::<ListQuery>(&vars).await?.list)
}

pub async fn fetch_lists(client: &GraphqlClient) -> Result<Vec<TodoList>, ApiError> {
    Ok(client.execute::<ListsQuery>(&NoVariables {}).await?.lists)
}

pub async fn create_list_item(client: &GraphqlClient, list_id: &str, description: &str) -> Result<Item, ApiError> {
    let vars = InputVariables {
        input: CreateListItemInput {
            list_id: list_id.to_string(),
            description: description.to_string(),
        },
    };
    Ok(client.execute::<CreateListItemMutation>(&vars).await?.create_list_item)
}

pub async fn complete_list_item(client: &GraphqlClient, id: &str, complete: bool) -> Result<Item, ApiError> {
    let vars = InputVariables {
        input: CompleteListItemInput {
            id: id.to_string(),
            complete,
        },
    };
    Ok(client.execute::<CompleteListItemMutation>(&vars).await?.complete_list_item)
}

/// True when the server removed the completed items
pub async fn remove_completed_list_items(client: &GraphqlClient, list_id: &str) -> Result<bool, ApiError> {
    let vars = ListIdVariables {
        list_id: list_id.to_string(),
    };
    Ok(client
        .execute::<RemoveCompletedListItemsMutation>(&vars)
        .await?
        .remove_completed_list_items)
}

pub async fn create_list(client: &GraphqlClient, name: &str) -> Result<TodoList, ApiError> {
    let vars = InputVariables {
        input: CreateListInput { name: name.to_string() },
    };
    Ok(client.execute::<CreateListMutation>(&vars).await?.create_list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mutation_variables_shape() {
        let vars = InputVariables {
            input: CreateListItemInput {
                list_id: "42".to_string(),
                description: "milk".to_string(),
            },
        };
        assert_eq!(
            serde_json::to_value(&vars).unwrap(),
            json!({ "input": { "listId": "42", "description": "milk" } })
        );
        assert_eq!(serde_json::to_value(NoVariables {}).unwrap(), json!({}));
    }

    #[test]
    fn test_documents_name_their_operation() {
        assert!(CreateListItemMutation::DOCUMENT.starts_with("mutation CreateListItem("));
        assert!(RemoveCompletedListItemsMutation::DOCUMENT.contains("removeCompletedListItems(listId: $listId)"));
        assert!(OnListItemChangedSubscription::DOCUMENT.starts_with("subscription OnListItemChanged("));
        assert!(ListsQuery::DOCUMENT.starts_with("query Lists "));
    }

    #[test]
    fn test_item_changed_payload() {
        let data: ListItemChangedData = serde_json::from_value(json!({
            "listItemChanged": { "id": "3", "description": "eggs", "position": 2, "complete": true }
        }))
        .unwrap();
        assert!(data.list_item_changed.unwrap().complete);

        let empty: ListItemChangedData = serde_json::from_value(json!({ "listItemChanged": null })).unwrap();
        assert!(empty.list_item_changed.is_none());
    }
}
