use serde::{Deserialize, Serialize};

/// Session filter applied to the news collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    active_sector: Option<String>,
    search_query: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterAction {
    /// Selecting the sector that is already active clears it.
    SelectSector(String),
    ClearSector,
    SetQuery(String),
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_sector(&self) -> Option<&str> {
        self.active_sector.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn is_unfiltered(&self) -> bool {
        self.active_sector.is_none() && self.search_query.is_empty()
    }

    /// Applies one action and reports whether anything changed.
    pub fn apply(&mut self, action: FilterAction) -> bool {
        let before = self.clone();
        match action {
            FilterAction::SelectSector(sector) => {
                if self.active_sector.as_deref() == Some(sector.as_str()) {
                    self.active_sector = None;
                } else {
                    self.active_sector = Some(sector);
                }
            }
            FilterAction::ClearSector => self.active_sector = None,
            FilterAction::SetQuery(query) => self.search_query = query,
        }
        *self != before
    }
}
