use std::fmt;

/// Class selector prefix for badge elements; the entity id is appended.
pub const BADGE_SELECTOR_PREFIX: &str = ".website-status-";

/// Selector of the element whose presence enables polling.
pub const DEFAULT_CONTAINER_SELECTOR: &str = ".website-status-container";

/// Every class the poller may apply. Exactly one is active after an update.
pub const STATUS_CLASSES: [&str; 4] = [
    BadgeClass::Success.css_class(),
    BadgeClass::Primary.css_class(),
    BadgeClass::Danger.css_class(),
    BadgeClass::Secondary.css_class(),
];

/// One entity's reported state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusEntry {
    pub id: String,
    pub status: String,
    pub name: Option<String>,
    pub last_scraped: Option<String>,
    pub product_count: Option<u64>,
}

impl StatusEntry {
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            ..Self::default()
        }
    }

    pub fn kind(&self) -> StatusKind {
        StatusKind::parse(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusKind {
    Completed,
    Scraping,
    Failed,
    Other(String),
}

impl StatusKind {
    /// Exact, case-sensitive match; anything unknown is passed through.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "completed" => StatusKind::Completed,
            "scraping" => StatusKind::Scraping,
            "failed" => StatusKind::Failed,
            other => StatusKind::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeClass {
    Success,
    Primary,
    Danger,
    Secondary,
}

impl BadgeClass {
    pub const fn css_class(self) -> &'static str {
        match self {
            BadgeClass::Success => "bg-success",
            BadgeClass::Primary => "bg-primary",
            BadgeClass::Danger => "bg-danger",
            BadgeClass::Secondary => "bg-secondary",
        }
    }

    pub fn from_css_class(class: &str) -> Option<Self> {
        match class {
            "bg-success" => Some(BadgeClass::Success),
            "bg-primary" => Some(BadgeClass::Primary),
            "bg-danger" => Some(BadgeClass::Danger),
            "bg-secondary" => Some(BadgeClass::Secondary),
            _ => None,
        }
    }
}

impl fmt::Display for BadgeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

/// Class and label a badge should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeView {
    pub class: BadgeClass,
    pub label: String,
}

/// A badge view resolved against the selector convention, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeUpdate {
    pub id: String,
    pub selector: String,
    pub view: BadgeView,
}

impl BadgeUpdate {
    pub fn from_entry(entry: &StatusEntry) -> Self {
        Self {
            id: entry.id.clone(),
            selector: badge_selector(&entry.id),
            view: badge_for(&entry.status),
        }
    }
}

pub fn badge_for(status: &str) -> BadgeView {
    let (class, label) = match StatusKind::parse(status) {
        StatusKind::Completed => (BadgeClass::Success, "Completed".to_string()),
        StatusKind::Scraping => (BadgeClass::Primary, "Scraping".to_string()),
        StatusKind::Failed => (BadgeClass::Danger, "Failed".to_string()),
        StatusKind::Other(raw) => (BadgeClass::Secondary, raw),
    };
    BadgeView { class, label }
}

/// Deterministic id → selector mapping: `.website-status-{id}`.
pub fn badge_selector(id: &str) -> String {
    format!("{BADGE_SELECTOR_PREFIX}{id}")
}
