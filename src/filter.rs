use std::collections::BTreeSet;

use crate::types::{ContentCategory, ContentPage, Councillor, Event, Id};

/// Filter result indicating whether a record should be kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    Keep,
    FilterOut,
}

impl From<bool> for FilterResult {
    fn from(keep: bool) -> Self {
        if keep {
            FilterResult::Keep
        } else {
            FilterResult::FilterOut
        }
    }
}

/// A record that can be narrowed by tag selection and free-text search
pub trait Filterable {
    /// Identifiers of the tags or categories this record belongs to
    fn association_ids(&self) -> Vec<&Id>;

    /// Text fields matched against the search query
    fn search_fields(&self) -> Vec<&str>;
}

impl Filterable for Event {
    fn association_ids(&self) -> Vec<&Id> {
        self.details.categories.iter().map(|c| &c.id).collect()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.details.short_description.as_deref());
        fields
    }
}

impl Filterable for Councillor {
    fn association_ids(&self) -> Vec<&Id> {
        self.tags.iter().map(|t| &t.id).collect()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.intro.as_deref());
        fields
    }
}

impl Filterable for ContentPage {
    fn association_ids(&self) -> Vec<&Id> {
        self.category
            .iter()
            .chain(self.subcategory.iter())
            .map(|parent| &parent.id)
            .collect()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.short_description.as_deref());
        fields.extend(self.category.as_ref().map(|c| c.name.as_str()));
        fields
    }
}

/// Selected tag identifiers plus an optional search term
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    tag_ids: BTreeSet<Id>,
    query: Option<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Id>,
    {
        self.tag_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.set_query(query);
        self
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.query = if query.trim().is_empty() {
            None
        } else {
            Some(query.to_lowercase())
        };
    }

    /// Select the tag if it is not selected, deselect it otherwise
    pub fn toggle(&mut self, id: impl Into<Id>) {
        let id = id.into();
        if !self.tag_ids.remove(&id) {
            self.tag_ids.insert(id);
        }
    }

    pub fn clear_tags(&mut self) {
        self.tag_ids.clear();
    }

    pub fn clear(&mut self) {
        self.tag_ids.clear();
        self.query = None;
    }

    pub fn tag_ids(&self) -> &BTreeSet<Id> {
        &self.tag_ids
    }

    /// The case-folded query, if one is active
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.tag_ids.is_empty() && self.query.is_none()
    }

    /// Check whether a record survives this selection
    pub fn should_keep<T: Filterable + ?Sized>(&self, record: &T) -> FilterResult {
        if !self.tag_ids.is_empty()
            && !record
                .association_ids()
                .into_iter()
                .any(|id| self.tag_ids.contains(id))
        {
            return FilterResult::FilterOut;
        }

        if let Some(query) = &self.query {
            return contains_folded(record.search_fields(), query).into();
        }

        FilterResult::Keep
    }
}

fn contains_folded<'a>(fields: impl IntoIterator<Item = &'a str>, folded_query: &str) -> bool {
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(folded_query))
}

/// Narrow `records` to those matching `selection`, preserving input order
pub fn filter<'a, T, I>(records: I, selection: &FilterSelection) -> Vec<&'a T>
where
    T: Filterable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter(|record| selection.should_keep(*record) == FilterResult::Keep)
        .collect()
}

/// Content-hub category search: name, description, or any subcategory's name
/// or description
pub fn category_matches(category: &ContentCategory, query: &str) -> bool {
    let folded = query.to_lowercase();
    let own = std::iter::once(category.name.as_str()).chain(category.description.as_deref());
    let subs = category
        .subcategories
        .iter()
        .flat_map(|sub| std::iter::once(sub.name.as_str()).chain(sub.description.as_deref()));
    contains_folded(own.chain(subs), &folded)
}

/// Categories matching `query`; a missing or blank query keeps them all
pub fn filter_categories<'a>(
    categories: &'a [ContentCategory],
    query: Option<&str>,
) -> Vec<&'a ContentCategory> {
    match query.filter(|q| !q.trim().is_empty()) {
        Some(query) => categories
            .iter()
            .filter(|category| category_matches(category, query))
            .collect(),
        None => categories.iter().collect(),
    }
}
