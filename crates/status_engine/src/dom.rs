use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Mutex, PoisonError};

/// Mutable view of one badge element: its class list and text content.
pub trait BadgeElement {
    fn remove_class(&mut self, class: &str);
    fn add_class(&mut self, class: &str);
    fn set_text(&mut self, text: &str);
}

/// Element lookup the poller runs against instead of a global document.
pub trait BadgeDom: Send + Sync {
    /// Whether an element matching `selector` exists on the page.
    fn has_container(&self, selector: &str) -> bool;

    /// Runs `apply` on the badge matching `selector`.
    ///
    /// Returns `false` without calling `apply` when no badge matches.
    fn update_badge(&self, selector: &str, apply: &mut dyn FnMut(&mut dyn BadgeElement)) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InMemoryBadge {
    pub classes: BTreeSet<String>,
    pub text: String,
}

impl InMemoryBadge {
    pub fn new(classes: &[&str], text: impl Into<String>) -> Self {
        Self {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            text: text.into(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

impl BadgeElement for InMemoryBadge {
    fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

#[derive(Debug, Default)]
struct DomInner {
    containers: HashSet<String>,
    badges: BTreeMap<String, InMemoryBadge>,
}

/// A page stand-in keyed by selector. Used by tests and the terminal board.
#[derive(Debug, Default)]
pub struct InMemoryDom {
    inner: Mutex<DomInner>,
}

impl InMemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(self, selector: impl Into<String>) -> Self {
        self.add_container(selector);
        self
    }

    pub fn with_badge(self, selector: impl Into<String>, badge: InMemoryBadge) -> Self {
        self.insert_badge(selector, badge);
        self
    }

    pub fn add_container(&self, selector: impl Into<String>) {
        self.lock().containers.insert(selector.into());
    }

    pub fn insert_badge(&self, selector: impl Into<String>, badge: InMemoryBadge) {
        self.lock().badges.insert(selector.into(), badge);
    }

    pub fn badge(&self, selector: &str) -> Option<InMemoryBadge> {
        self.lock().badges.get(selector).cloned()
    }

    /// All badges ordered by selector.
    pub fn snapshot(&self) -> Vec<(String, InMemoryBadge)> {
        self.lock()
            .badges
            .iter()
            .map(|(selector, badge)| (selector.clone(), badge.clone()))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DomInner> {
        // Every mutation leaves the maps consistent, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BadgeDom for InMemoryDom {
    fn has_container(&self, selector: &str) -> bool {
        self.lock().containers.contains(selector)
    }

    fn update_badge(&self, selector: &str, apply: &mut dyn FnMut(&mut dyn BadgeElement)) -> bool {
        let mut inner = self.lock();
        match inner.badges.get_mut(selector) {
            Some(badge) => {
                apply(badge as &mut dyn BadgeElement);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_reports_missing_badge() {
        let dom = InMemoryDom::new().with_badge(".b", InMemoryBadge::default());
        let mut calls = 0;
        assert!(!dom.update_badge(".missing", &mut |_| calls += 1));
        assert!(dom.update_badge(".b", &mut |el| {
            calls += 1;
            el.add_class("bg-danger");
            el.set_text("Failed");
        }));
        assert_eq!(calls, 1);
        assert_eq!(dom.badge(".b").unwrap(), InMemoryBadge::new(&["bg-danger"], "Failed"));
    }

    #[test]
    fn container_lookup_is_exact() {
        let dom = InMemoryDom::new().with_container(".website-status-container");
        assert!(dom.has_container(".website-status-container"));
        assert!(!dom.has_container("#website-status-container"));
    }
}
