use crate::types::{FilterState, NewsItem, SectorCatalog, SectorDefinition};

/// Selects the visible subset of a news collection.
///
/// Matching is plain substring search on lowercased text, so a keyword also
/// matches inside longer words ("gas" matches "Las Vegas").
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    sectors: SectorCatalog,
}

impl FilterEngine {
    pub fn new(sectors: SectorCatalog) -> Self {
        Self { sectors }
    }

    pub fn sectors(&self) -> &SectorCatalog {
        &self.sectors
    }

    /// Keep items matching both the sector (if any) and the query (if
    /// non-empty). Input order is preserved. An unknown sector id has no
    /// keywords and so matches nothing.
    pub fn apply<'a>(&self, items: &'a [NewsItem], sector: Option<&str>, query: &str) -> Vec<&'a NewsItem> {
        let sector = sector.map(|id| self.sectors.get(id));
        let query = query.to_lowercase();

        items
            .iter()
            .filter(|item| match sector {
                Some(definition) => matches_sector(item, definition),
                None => true,
            })
            .filter(|item| query.is_empty() || item.title.to_lowercase().contains(&query))
            .collect()
    }

    pub fn apply_state<'a>(&self, items: &'a [NewsItem], state: &FilterState) -> Vec<&'a NewsItem> {
        self.apply(items, state.active_sector(), state.search_query())
    }
}

fn matches_sector(item: &NewsItem, sector: Option<&SectorDefinition>) -> bool {
    let Some(sector) = sector else {
        return false;
    };
    let text = format!("{} {}", item.title, item.description).to_lowercase();
    sector.keywords.iter().any(|keyword| text.contains(keyword.as_str()))
}
