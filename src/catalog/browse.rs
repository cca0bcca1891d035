//! Filtering, sorting and pagination over an already-unified catalog.
//!
//! Every browse parameter is passed in explicitly; nothing is remembered
//! between calls.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::types::*;

pub const DEFAULT_PAGE_SIZE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Label,
    Source,
    Category,
}

fn default_ascending() -> bool {
    true
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Browse parameters sent by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Case-insensitive substring match on the label.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub source: Option<SourceRelation>,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
    /// Zero-based page number.
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            text: None,
            category: None,
            source: None,
            sort: SortKey::default(),
            ascending: true,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of the filtered, sorted catalog plus the option lists a caller
/// needs to render its filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPage {
    pub items: Vec<ItemDescriptor>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub categories: Vec<String>,
    pub sources: Vec<SourceRelation>,
}

pub fn browse_catalog(catalog: &[ItemDescriptor], query: &CatalogQuery) -> CatalogPage {
    let categories: Vec<String> = catalog
        .iter()
        .filter_map(|item| item.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let sources: Vec<SourceRelation> = catalog
        .iter()
        .map(|item| item.source_relation)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let needle = query
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase);

    let mut filtered: Vec<&ItemDescriptor> = catalog
        .iter()
        .filter(|item| match &needle {
            Some(n) => item
                .label
                .as_deref()
                .is_some_and(|label| label.to_lowercase().contains(n.as_str())),
            None => true,
        })
        .filter(|item| match &query.category {
            Some(c) => item.category.as_deref() == Some(c.as_str()),
            None => true,
        })
        .filter(|item| match query.source {
            Some(s) => item.source_relation == s,
            None => true,
        })
        .collect();

    filtered.sort_by(|a, b| compare_items(a, b, query.sort, query.ascending));

    let page_size = if query.page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        query.page_size
    };
    let total_items = filtered.len();
    let total_pages = total_items.div_ceil(page_size);

    let items = filtered
        .into_iter()
        .skip(query.page.saturating_mul(page_size))
        .take(page_size)
        .cloned()
        .collect();

    CatalogPage {
        items,
        page: query.page,
        page_size,
        total_pages,
        total_items,
        categories,
        sources,
    }
}

fn compare_items(
    a: &ItemDescriptor,
    b: &ItemDescriptor,
    key: SortKey,
    ascending: bool,
) -> Ordering {
    match key {
        SortKey::Label => compare_missing_last(a.label.as_deref(), b.label.as_deref(), ascending),
        SortKey::Category => {
            compare_missing_last(a.category.as_deref(), b.category.as_deref(), ascending)
        }
        SortKey::Source => {
            let ord = a.source_relation.as_str().cmp(b.source_relation.as_str());
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        }
    }
}

/// Missing values sort after present ones in both directions.
fn compare_missing_last(a: Option<&str>, b: Option<&str>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) if ascending => x.cmp(y),
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, relation: SourceRelation, label: Option<&str>, category: Option<&str>) -> ItemDescriptor {
        ItemDescriptor {
            item_id: id,
            source_relation: relation,
            label: label.map(String::from),
            category: category.map(String::from),
            abbreviation: None,
            observation_count: 1,
        }
    }

    fn sample_catalog() -> Vec<ItemDescriptor> {
        vec![
            item(220045, SourceRelation::Chart, Some("Heart Rate"), Some("Routine Vital Signs")),
            item(220210, SourceRelation::Chart, Some("Respiratory Rate"), Some("Respiratory")),
            item(50820, SourceRelation::Lab, Some("pH"), Some("Blood Gas")),
            item(226559, SourceRelation::Output, Some("Foley"), Some("Output")),
            item(1, SourceRelation::Prescription, Some("Aspirin"), Some("PO")),
            item(2, SourceRelation::Chart, None, None),
        ]
    }

    #[test]
    fn default_query_sorts_by_label_with_missing_last() {
        let page = browse_catalog(&sample_catalog(), &CatalogQuery::default());
        let labels: Vec<_> = page.items.iter().map(|i| i.label.clone()).collect();
        assert_eq!(
            labels,
            vec![
                Some("Aspirin".to_string()),
                Some("Foley".to_string()),
                Some("Heart Rate".to_string()),
                Some("Respiratory Rate".to_string()),
                Some("pH".to_string()),
                None,
            ]
        );
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_items, 6);
    }

    #[test]
    fn descending_keeps_missing_last() {
        let query = CatalogQuery {
            ascending: false,
            ..CatalogQuery::default()
        };
        let page = browse_catalog(&sample_catalog(), &query);
        assert_eq!(page.items[0].label.as_deref(), Some("pH"));
        assert_eq!(page.items.last().unwrap().label, None);
    }

    #[test]
    fn text_filter_is_case_insensitive() {
        let query = CatalogQuery {
            text: Some("RATE".into()),
            ..CatalogQuery::default()
        };
        let page = browse_catalog(&sample_catalog(), &query);
        assert_eq!(page.total_items, 2);
        assert!(page.items.iter().all(|i| i.label.as_deref().unwrap().contains("Rate")));
    }

    #[test]
    fn category_and_source_filters_combine() {
        let query = CatalogQuery {
            category: Some("Respiratory".into()),
            source: Some(SourceRelation::Chart),
            ..CatalogQuery::default()
        };
        let page = browse_catalog(&sample_catalog(), &query);
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].item_id, 220210);
    }

    #[test]
    fn option_lists_cover_unfiltered_catalog() {
        let query = CatalogQuery {
            source: Some(SourceRelation::Lab),
            ..CatalogQuery::default()
        };
        let page = browse_catalog(&sample_catalog(), &query);
        assert_eq!(page.categories.len(), 5);
        assert_eq!(page.sources.len(), 4);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn pagination_splits_items() {
        let catalog: Vec<_> = (0..32)
            .map(|i| item(i, SourceRelation::Chart, Some(&format!("Item {i:02}")), None))
            .collect();

        let first = browse_catalog(&catalog, &CatalogQuery::default());
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.items.len(), 15);

        let last = browse_catalog(
            &catalog,
            &CatalogQuery {
                page: 2,
                ..CatalogQuery::default()
            },
        );
        assert_eq!(last.items.len(), 2);
        assert_eq!(last.items[0].label.as_deref(), Some("Item 30"));

        let beyond = browse_catalog(
            &catalog,
            &CatalogQuery {
                page: 9,
                ..CatalogQuery::default()
            },
        );
        assert!(beyond.items.is_empty());
    }

    #[test]
    fn sort_by_source_uses_table_name() {
        let query = CatalogQuery {
            sort: SortKey::Source,
            ..CatalogQuery::default()
        };
        let page = browse_catalog(&sample_catalog(), &query);
        assert_eq!(page.items[0].source_relation, SourceRelation::Chart);
        assert_eq!(page.items.last().unwrap().source_relation, SourceRelation::Prescription);
    }

    #[test]
    fn empty_catalog_has_no_pages() {
        let page = browse_catalog(&[], &CatalogQuery::default());
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
        assert!(page.categories.is_empty());
    }
}
