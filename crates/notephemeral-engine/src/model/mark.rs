use serde::{Deserialize, Serialize};

/// A non-structural decoration attached to a text run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mark {
    /// A hyperlink. Non-inclusive: typing at the edge of a linked run
    /// starts a fresh unmarked run.
    Link {
        href: String,
        #[serde(default)]
        title: Option<String>,
    },
}

/// The kind of a [`Mark`], without its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
    Link,
}

impl Mark {
    /// Creates a link mark without a title.
    pub fn link(href: impl Into<String>) -> Self {
        Mark::Link {
            href: href.into(),
            title: None,
        }
    }

    pub fn kind(&self) -> MarkKind {
        match self {
            Mark::Link { .. } => MarkKind::Link,
        }
    }

    /// Returns a copy of `set` with this mark added.
    ///
    /// A text run holds at most one mark of each kind, so an existing mark of
    /// the same kind is replaced.
    pub fn add_to_set(&self, set: &[Mark]) -> Vec<Mark> {
        let mut out: Vec<Mark> = set
            .iter()
            .filter(|m| m.kind() != self.kind())
            .cloned()
            .collect();
        out.push(self.clone());
        out
    }
}

/// Returns a copy of `set` without marks of `kind`.
pub fn remove_kind(set: &[Mark], kind: MarkKind) -> Vec<Mark> {
    set.iter().filter(|m| m.kind() != kind).cloned().collect()
}

/// The `href` of the first link mark in `set`, if any.
pub fn link_href(set: &[Mark]) -> Option<&str> {
    set.iter().find_map(|m| match m {
        Mark::Link { href, .. } => Some(href.as_str()),
    })
}
