use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Category, SubSubcategory, Subcategory};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "crate::dto::not_blank")
    )]
    pub name: String,
    #[validate(length(max = 200))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 2048))]
    pub image: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "crate::dto::not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 2048))]
    pub image: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubcategoryRequest {
    pub category_id: Uuid,
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "crate::dto::not_blank")
    )]
    pub name: String,
    #[validate(length(max = 200))]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubcategoryRequest {
    pub category_id: Option<Uuid>,
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "crate::dto::not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubSubcategoryRequest {
    pub subcategory_id: Uuid,
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "crate::dto::not_blank")
    )]
    pub name: String,
    #[validate(length(max = 200))]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubSubcategoryRequest {
    pub subcategory_id: Option<Uuid>,
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "crate::dto::not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct SubcategoryList {
    #[schema(value_type = Vec<Subcategory>)]
    pub items: Vec<Subcategory>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct SubSubcategoryList {
    #[schema(value_type = Vec<SubSubcategory>)]
    pub items: Vec<SubSubcategory>,
}

/// A subcategory with its third-level children.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryNode {
    #[serde(flatten)]
    pub subcategory: Subcategory,
    pub sub_subcategories: Vec<SubSubcategory>,
}

/// A category with its full subtree, as served to the storefront menu.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub subcategories: Vec<SubcategoryNode>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryTree {
    #[schema(value_type = Vec<CategoryNode>)]
    pub items: Vec<CategoryNode>,
}

impl CategoryTree {
    /// Assemble the three levels from flat lists. Children whose parent is
    /// not in the input are dropped. Input order is kept at every level.
    pub fn build(
        categories: Vec<Category>,
        subcategories: Vec<Subcategory>,
        sub_subcategories: Vec<SubSubcategory>,
    ) -> Self {
        let mut leaves = sub_subcategories;
        let subcategory_nodes: Vec<SubcategoryNode> = subcategories
            .into_iter()
            .map(|subcategory| {
                let (mine, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut leaves)
                    .into_iter()
                    .partition(|s| s.subcategory_id == subcategory.id);
                leaves = rest;
                SubcategoryNode {
                    subcategory,
                    sub_subcategories: mine,
                }
            })
            .collect();

        let mut remaining = subcategory_nodes;
        let items = categories
            .into_iter()
            .map(|category| {
                let (mine, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut remaining)
                    .into_iter()
                    .partition(|n| n.subcategory.category_id == category.id);
                remaining = rest;
                CategoryNode {
                    category,
                    subcategories: mine,
                }
            })
            .collect();

        Self { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: name.to_lowercase(),
            description: None,
            image: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn subcategory(parent: &Category, name: &str) -> Subcategory {
        Subcategory {
            id: Uuid::new_v4(),
            category_id: parent.id,
            name: name.into(),
            slug: name.to_lowercase(),
            description: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn leaf(parent: &Subcategory, name: &str, sort_order: i32) -> SubSubcategory {
        SubSubcategory {
            id: Uuid::new_v4(),
            subcategory_id: parent.id,
            name: name.into(),
            slug: name.to_lowercase(),
            description: None,
            sort_order,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn nests_three_levels_under_their_parents() {
        let men = category("Men");
        let women = category("Women");
        let shirts = subcategory(&men, "Shirts");
        let dresses = subcategory(&women, "Dresses");
        let polo = leaf(&shirts, "Polo", 1);
        let tee = leaf(&shirts, "Tee", 2);
        let maxi = leaf(&dresses, "Maxi", 1);

        let tree = CategoryTree::build(
            vec![men.clone(), women.clone()],
            vec![shirts.clone(), dresses.clone()],
            vec![polo, tee, maxi],
        );

        assert_eq!(tree.items.len(), 2);
        let men_node = &tree.items[0];
        assert_eq!(men_node.category.id, men.id);
        assert_eq!(men_node.subcategories.len(), 1);
        let names: Vec<_> = men_node.subcategories[0]
            .sub_subcategories
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Polo", "Tee"]);

        let women_node = &tree.items[1];
        assert_eq!(women_node.subcategories[0].subcategory.id, dresses.id);
        assert_eq!(women_node.subcategories[0].sub_subcategories.len(), 1);
    }

    #[test]
    fn drops_children_of_missing_parents() {
        let men = category("Men");
        let hidden = category("Hidden");
        let orphan = subcategory(&hidden, "Orphan");
        let orphan_leaf = leaf(&orphan, "Leaf", 0);

        let tree = CategoryTree::build(vec![men], vec![orphan], vec![orphan_leaf]);

        assert_eq!(tree.items.len(), 1);
        assert!(tree.items[0].subcategories.is_empty());
    }

    #[test]
    fn serializes_children_alongside_parent_fields() {
        let men = category("Men");
        let shirts = subcategory(&men, "Shirts");
        let tree = CategoryTree::build(vec![men], vec![shirts], vec![]);

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json[0]["slug"], "men");
        assert_eq!(json[0]["subcategories"][0]["name"], "Shirts");
        assert!(json[0]["subcategories"][0]["subSubcategories"].is_array());
    }
}
