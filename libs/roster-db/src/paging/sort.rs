//! Sort keys and the property → column map used to apply them.

use std::collections::HashMap;

use sea_orm::{EntityTrait, QueryOrder, sea_query::Order};
use serde::{Deserialize, Serialize};

use super::PagingError;
use super::request::PageError;

// Ordering primitives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDir {
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

impl From<SortDir> for Order {
    fn from(dir: SortDir) -> Self {
        match dir {
            SortDir::Asc => Order::Asc,
            SortDir::Desc => Order::Desc,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderKey {
    pub property: String,
    pub dir: SortDir,
}

/// Ordered list of sort keys; the first key is the primary order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct Sort(pub Vec<OrderKey>);

impl Sort {
    pub fn unsorted() -> Self {
        Self(vec![])
    }

    pub fn by(property: impl Into<String>, dir: SortDir) -> Self {
        Self(vec![OrderKey {
            property: property.into(),
            dir,
        }])
    }

    pub fn then(mut self, property: impl Into<String>, dir: SortDir) -> Self {
        self.0.push(OrderKey {
            property: property.into(),
            dir,
        });
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse signed tokens, e.g. `"name,-age"` or `"+name,-age"`.
    /// An unsigned token sorts ascending.
    ///
    /// # Errors
    /// Returns `PageError::InvalidSort` if a token has no property name.
    pub fn parse(signed: &str) -> Result<Self, PageError> {
        let mut out = Vec::new();
        for seg in signed.split(',') {
            let seg = seg.trim();
            if seg.is_empty() {
                continue;
            }
            let (dir, name) = if let Some(name) = seg.strip_prefix('-') {
                (SortDir::Desc, name)
            } else if let Some(name) = seg.strip_prefix('+') {
                (SortDir::Asc, name)
            } else {
                (SortDir::Asc, seg)
            };
            if name.trim().is_empty() {
                return Err(PageError::InvalidSort(seg.to_owned()));
            }
            out.push(OrderKey {
                property: name.trim().to_owned(),
                dir,
            });
        }
        Ok(Self(out))
    }

    /// Append tiebreaker if missing
    pub fn ensure_tiebreaker(mut self, tiebreaker: &str, dir: SortDir) -> Self {
        if !self
            .0
            .iter()
            .any(|k| k.property.eq_ignore_ascii_case(tiebreaker))
        {
            self.0.push(OrderKey {
                property: tiebreaker.to_owned(),
                dir,
            });
        }
        self
    }
}

impl std::fmt::Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(none)");
        }
        let formatted: Vec<String> = self
            .0
            .iter()
            .map(|key| {
                let dir_str = match key.dir {
                    SortDir::Asc => "asc",
                    SortDir::Desc => "desc",
                };
                format!("{} {}", key.property, dir_str)
            })
            .collect();
        write!(f, "{}", formatted.join(", "))
    }
}

/// Maps API-visible sort property names onto entity columns.
///
/// Lookups are case-insensitive.
#[derive(Clone)]
#[must_use]
pub struct SortMap<E: EntityTrait> {
    map: HashMap<String, E::Column>,
}

impl<E: EntityTrait> Default for SortMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> SortMap<E> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn insert(mut self, property: impl Into<String>, col: E::Column) -> Self {
        self.map.insert(property.into().to_lowercase(), col);
        self
    }

    #[must_use]
    pub fn get(&self, property: &str) -> Option<&E::Column> {
        self.map.get(&property.to_lowercase())
    }

    /// Apply every key of `sort` to `select`, in order.
    ///
    /// # Errors
    /// Returns `PagingError::UnknownSortProperty` for a property missing from the map.
    pub fn apply(
        &self,
        select: sea_orm::Select<E>,
        sort: &Sort,
    ) -> Result<sea_orm::Select<E>, PagingError>
    where
        E::Column: Copy,
    {
        let mut query = select;
        for key in &sort.0 {
            let col = self
                .get(&key.property)
                .copied()
                .ok_or_else(|| PagingError::UnknownSortProperty(key.property.clone()))?;
            query = query.order_by(col, Order::from(key.dir));
        }
        Ok(query)
    }
}
