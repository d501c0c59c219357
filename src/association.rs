use serde::Serialize;

use crate::types::{ContentCategory, ContentPage, Id, Subcategory};

/// Category names never shown in the content hub
pub const DEFAULT_HIDDEN_CATEGORIES: &[&str] = &["News", "Meetings"];

/// Colours assigned to categories that do not carry their own
pub const DEFAULT_PALETTE: &[&str] = &[
    "#3498db", "#e74c3c", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c", "#e67e22", "#34495e",
    "#f1c40f", "#e91e63",
];

/// A category that survived the denylist, with its resolved display colour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleCategory<'a> {
    pub category: &'a ContentCategory,
    pub color: String,
}

/// Drop denylisted categories, then give each survivor its colour, taking
/// `palette[index % len]` by position among the survivors when it has none
pub fn visible_categories<'a, S: AsRef<str>, P: AsRef<str>>(
    categories: &'a [ContentCategory],
    hidden: &[S],
    palette: &[P],
) -> Vec<VisibleCategory<'a>> {
    categories
        .iter()
        .filter(|c| !hidden.iter().any(|h| h.as_ref() == c.name))
        .enumerate()
        .map(|(index, category)| {
            let color = match (&category.color, palette.is_empty()) {
                (Some(color), _) => color.clone(),
                (None, false) => palette[index % palette.len()].as_ref().to_string(),
                (None, true) => category.color_or_default().to_string(),
            };
            VisibleCategory { category, color }
        })
        .collect()
}

/// Pages whose parent category has exactly this identifier
pub fn pages_for_category<'a>(pages: &[&'a ContentPage], id: &Id) -> Vec<&'a ContentPage> {
    pages
        .iter()
        .copied()
        .filter(|p| p.category.as_ref().is_some_and(|c| &c.id == id))
        .collect()
}

/// Pages whose subcategory has exactly this identifier
pub fn pages_for_subcategory<'a>(pages: &[&'a ContentPage], id: &Id) -> Vec<&'a ContentPage> {
    pages
        .iter()
        .copied()
        .filter(|p| p.subcategory.as_ref().is_some_and(|s| &s.id == id))
        .collect()
}

/// A category is worth rendering when it has a direct page or a non-empty
/// subcategory
pub fn has_displayable_content(category: &ContentCategory, pages: &[&ContentPage]) -> bool {
    !pages_for_category(pages, &category.id).is_empty()
        || category
            .subcategories
            .iter()
            .any(|sub| !pages_for_subcategory(pages, &sub.id).is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategorySection<'a> {
    pub subcategory: &'a Subcategory,
    pub pages: Vec<&'a ContentPage>,
}

/// One content-hub block: a category with its pages grouped by subcategory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySection<'a> {
    pub category: &'a ContentCategory,
    pub color: String,
    /// Pages whose parent category is this one
    pub pages: Vec<&'a ContentPage>,
    /// Subcategories that hold at least one page
    pub subcategories: Vec<SubcategorySection<'a>>,
}

/// Group `pages` under the visible categories, skipping categories with
/// nothing to show
pub fn sections<'a>(
    categories: Vec<VisibleCategory<'a>>,
    pages: &[&'a ContentPage],
) -> Vec<CategorySection<'a>> {
    categories
        .into_iter()
        .filter(|v| has_displayable_content(v.category, pages))
        .map(|VisibleCategory { category, color }| {
            let subcategories = category
                .subcategories
                .iter()
                .map(|subcategory| SubcategorySection {
                    subcategory,
                    pages: pages_for_subcategory(pages, &subcategory.id),
                })
                .filter(|s| !s.pages.is_empty())
                .collect();

            CategorySection {
                category,
                color,
                pages: pages_for_category(pages, &category.id),
                subcategories,
            }
        })
        .collect()
}
