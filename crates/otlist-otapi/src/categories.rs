//! Reshaping of category navigation responses into the public category
//! shape.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::types::{CategoryListResponse, ErrorCode, RawCategory};

/// Public view of one category node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Category {
    pub category_id: Option<String>,
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_parent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<String>,
}

impl From<&RawCategory> for Category {
    fn from(raw: &RawCategory) -> Self {
        Self {
            category_id: raw.id.clone(),
            name: raw.name.clone(),
            external_id: raw.external_id.clone(),
            is_parent: raw.is_parent,
            provider_type: raw.provider_type.clone(),
        }
    }
}

/// Envelope returned by every category endpoint. Upstream status and
/// request metadata pass through untouched.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryEnvelope {
    pub error_code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    pub content: Vec<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategories_by_parent_id: Option<BTreeMap<String, Vec<Category>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_time: Option<Value>,
}

/// How a navigation response is reshaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryShape {
    /// Flat list with hidden categories dropped.
    Visible,
    /// Breadcrumb path; every node is kept in upstream order.
    Path,
    /// Roots plus their children grouped by parent id.
    Tree,
}

impl CategoryEnvelope {
    /// Reshapes an upstream response. An error-coded response yields an
    /// envelope with empty content rather than an error.
    #[must_use]
    pub fn from_response(mut response: CategoryListResponse, shape: CategoryShape) -> Self {
        let success = response.error_code.is_success();
        let raw = if success {
            response.take_categories()
        } else {
            Vec::new()
        };

        let (content, subcategories_by_parent_id) = match shape {
            CategoryShape::Visible => (visible(&raw), None),
            CategoryShape::Path => (raw.iter().map(Category::from).collect(), None),
            CategoryShape::Tree => {
                let (roots, children) = build_tree(&raw);
                (roots, Some(children))
            }
        };

        Self {
            error_code: response.error_code,
            error_description: response.error_description,
            content,
            subcategories_by_parent_id,
            request_id: response.request_id,
            request_time: response.request_time,
        }
    }
}

fn is_hidden(raw: &RawCategory) -> bool {
    raw.is_hidden.unwrap_or(false)
}

fn visible(raw: &[RawCategory]) -> Vec<Category> {
    raw.iter()
        .filter(|c| !is_hidden(c))
        .map(Category::from)
        .collect()
}

fn parent_id(raw: &RawCategory) -> Option<&str> {
    raw.parent_id
        .as_deref()
        .or(raw.parent_category_id.as_deref())
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

/// Splits a two-level category list into roots and children by parent id.
///
/// Two upstream layouts exist: roots with nested `Subcategories` (or
/// `Children`) arrays, and a flat list where children carry a parent id.
/// The first element decides which layout is in play.
#[must_use]
pub fn build_tree(raw: &[RawCategory]) -> (Vec<Category>, BTreeMap<String, Vec<Category>>) {
    let mut roots = Vec::new();
    let mut children: BTreeMap<String, Vec<Category>> = BTreeMap::new();

    let nested = raw
        .first()
        .is_some_and(|c| c.subcategories.is_some() || c.children.is_some());

    if nested {
        let use_subcategories = raw.first().is_some_and(|c| c.subcategories.is_some());
        for root in raw.iter().filter(|c| !is_hidden(c)) {
            roots.push(Category::from(root));
            let nested_children = if use_subcategories {
                root.subcategories.as_deref()
            } else {
                root.children.as_deref()
            };
            let subs = visible(nested_children.unwrap_or_default());
            if let (Some(id), false) = (root.id.as_ref(), subs.is_empty()) {
                children.insert(id.clone(), subs);
            }
        }
    } else {
        for category in raw.iter().filter(|c| !is_hidden(c)) {
            let parent = parent_id(category);
            if parent.is_none() || category.level == Some(0) {
                roots.push(Category::from(category));
            }
            if let Some(parent) = parent {
                children
                    .entry(parent.to_owned())
                    .or_default()
                    .push(Category::from(category));
            }
        }
    }

    (roots, children)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(value: Value) -> CategoryListResponse {
        serde_json::from_value(value).expect("valid category response")
    }

    #[test]
    fn visible_shape_drops_hidden_categories() {
        let envelope = CategoryEnvelope::from_response(
            response(json!({
                "ErrorCode": "Ok",
                "CategoryInfoList": {"Content": [
                    {"Id": "otc-1", "Name": "Ropa", "IsParent": true, "ProviderType": "Taobao"},
                    {"Id": "otc-2", "Name": "Oculta", "IsHidden": true}
                ]},
                "RequestId": "r-1"
            })),
            CategoryShape::Visible,
        );
        assert_eq!(envelope.content.len(), 1);
        assert_eq!(envelope.content[0].category_id.as_deref(), Some("otc-1"));
        assert_eq!(envelope.content[0].is_parent, Some(true));
        assert!(envelope.subcategories_by_parent_id.is_none());
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["RequestId"], "r-1");
        assert_eq!(json["Content"][0]["CategoryId"], "otc-1");
    }

    #[test]
    fn error_code_yields_empty_content() {
        let envelope = CategoryEnvelope::from_response(
            response(json!({
                "ErrorCode": "InvalidInstanceKey",
                "ErrorDescription": "bad key",
                "Content": [{"Id": "otc-1"}]
            })),
            CategoryShape::Tree,
        );
        assert!(envelope.content.is_empty());
        assert_eq!(envelope.subcategories_by_parent_id, Some(BTreeMap::new()));
        assert_eq!(envelope.error_description.as_deref(), Some("bad key"));
    }

    #[test]
    fn path_shape_keeps_hidden_nodes_in_order() {
        let envelope = CategoryEnvelope::from_response(
            response(json!({
                "ErrorCode": 0,
                "CategoryPath": [
                    {"Id": "root", "Name": "Root"},
                    {"Id": "mid", "Name": "Mid", "IsHidden": true},
                    {"Id": "leaf", "Name": "Leaf"}
                ]
            })),
            CategoryShape::Path,
        );
        let ids: Vec<_> = envelope
            .content
            .iter()
            .filter_map(|c| c.category_id.as_deref())
            .collect();
        assert_eq!(ids, ["root", "mid", "leaf"]);
    }

    #[test]
    fn tree_from_nested_children() {
        let raw: Vec<RawCategory> = serde_json::from_value(json!([
            {"Id": "a", "Name": "A", "Subcategories": [
                {"Id": "a1", "Name": "A1"},
                {"Id": "a2", "Name": "A2", "IsHidden": true}
            ]},
            {"Id": "b", "Name": "B", "Subcategories": []},
            {"Id": "c", "Name": "C", "IsHidden": true, "Subcategories": [{"Id": "c1"}]}
        ]))
        .unwrap();
        let (roots, children) = build_tree(&raw);
        assert_eq!(roots.len(), 2);
        assert_eq!(children.len(), 1);
        assert_eq!(children["a"].len(), 1);
        assert_eq!(children["a"][0].category_id.as_deref(), Some("a1"));
    }

    #[test]
    fn tree_from_flat_parent_ids() {
        let raw: Vec<RawCategory> = serde_json::from_value(json!([
            {"Id": "a", "Name": "A"},
            {"Id": "b", "Name": "B", "ParentId": " "},
            {"Id": "a1", "Name": "A1", "ParentId": "a"},
            {"Id": "b1", "Name": "B1", "ParentCategoryId": 77},
            {"Id": "h", "Name": "H", "ParentId": "a", "IsHidden": true}
        ]))
        .unwrap();
        let (roots, children) = build_tree(&raw);
        let root_ids: Vec<_> = roots.iter().filter_map(|c| c.category_id.as_deref()).collect();
        assert_eq!(root_ids, ["a", "b"]);
        assert_eq!(children["a"].len(), 1);
        assert_eq!(children["77"][0].category_id.as_deref(), Some("b1"));
    }
}
