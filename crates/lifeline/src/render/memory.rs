//! In-memory render target.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

use super::{ids, Card, RenderTarget, View};
use crate::views::Page;

#[derive(Debug, Default, Clone)]
struct Element {
    text: String,
    classes: BTreeSet<String>,
    cards: Vec<Card>,
    value: String,
}

#[derive(Debug, Default)]
struct Surface {
    elements: BTreeMap<String, Element>,
    focused: Option<String>,
    view: View,
    mutations: u64,
}

/// A [`RenderTarget`] that keeps every element in memory.
///
/// Only registered ids exist; writes to anything else are dropped.
#[derive(Debug, Default)]
pub struct MemoryTarget {
    surface: Mutex<Surface>,
}

impl MemoryTarget {
    /// A target with only the given element ids.
    #[must_use]
    pub fn with_elements<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let elements = ids
            .into_iter()
            .map(|id| (id.into(), Element::default()))
            .collect();
        Self {
            surface: Mutex::new(Surface {
                elements,
                ..Surface::default()
            }),
        }
    }

    /// A target carrying every fixed element plus the page and nav element
    /// of each known page.
    #[must_use]
    pub fn standard() -> Self {
        let pages = Page::ALL
            .iter()
            .flat_map(|page| [ids::page(page.id()), ids::nav(page.id())]);
        Self::with_elements(ids::ALL.iter().map(ToString::to_string).chain(pages))
    }

    fn lock(&self) -> MutexGuard<'_, Surface> {
        self.surface.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate(&self, id: &str, f: impl FnOnce(&mut Element)) {
        let mut surface = self.lock();
        let Some(element) = surface.elements.get_mut(id) else {
            trace!(id, "write to missing element dropped");
            return;
        };
        f(element);
        surface.mutations += 1;
    }

    /// Text of an element.
    #[must_use]
    pub fn text(&self, id: &str) -> Option<String> {
        self.lock().elements.get(id).map(|e| e.text.clone())
    }

    /// Whether an element carries a class.
    #[must_use]
    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.lock()
            .elements
            .get(id)
            .is_some_and(|e| e.classes.contains(class))
    }

    /// Cards in a container.
    #[must_use]
    pub fn cards(&self, id: &str) -> Vec<Card> {
        self.lock()
            .elements
            .get(id)
            .map(|e| e.cards.clone())
            .unwrap_or_default()
    }

    /// Value of an input.
    #[must_use]
    pub fn value(&self, id: &str) -> Option<String> {
        self.lock().elements.get(id).map(|e| e.value.clone())
    }

    /// Currently focused element.
    #[must_use]
    pub fn focused(&self) -> Option<String> {
        self.lock().focused.clone()
    }

    /// Current top-level view.
    #[must_use]
    pub fn view(&self) -> View {
        self.lock().view
    }

    /// Number of writes that landed on an element.
    #[must_use]
    pub fn mutation_count(&self) -> u64 {
        self.lock().mutations
    }

    /// Plain-text rendering of the whole surface.
    #[must_use]
    pub fn dump(&self) -> String {
        let surface = self.lock();
        let mut out = String::new();
        let _ = writeln!(out, "view: {}", surface.view);
        for (id, element) in &surface.elements {
            if element.text.is_empty() && element.classes.is_empty() && element.cards.is_empty() {
                continue;
            }
            let _ = write!(out, "{id}:");
            if !element.text.is_empty() {
                let _ = write!(out, " {}", element.text);
            }
            if !element.classes.is_empty() {
                let classes: Vec<&str> = element.classes.iter().map(String::as_str).collect();
                let _ = write!(out, " [{}]", classes.join(" "));
            }
            out.push('\n');
            for card in &element.cards {
                let _ = writeln!(out, "  {card}");
            }
        }
        out
    }
}

impl RenderTarget for MemoryTarget {
    fn has_element(&self, id: &str) -> bool {
        self.lock().elements.contains_key(id)
    }

    fn set_text(&self, id: &str, text: &str) {
        self.mutate(id, |e| text.clone_into(&mut e.text));
    }

    fn set_class(&self, id: &str, class: &str, on: bool) {
        self.mutate(id, |e| {
            if on {
                e.classes.insert(class.to_string());
            } else {
                e.classes.remove(class);
            }
        });
    }

    fn clear(&self, id: &str) {
        self.mutate(id, |e| e.cards.clear());
    }

    fn append_card(&self, container: &str, card: Card) {
        self.mutate(container, |e| e.cards.push(card));
    }

    fn set_value(&self, id: &str, value: &str) {
        self.mutate(id, |e| value.clone_into(&mut e.value));
    }

    fn focus(&self, id: &str) {
        let mut surface = self.lock();
        if surface.elements.contains_key(id) {
            surface.focused = Some(id.to_string());
            surface.mutations += 1;
        }
    }

    fn show_view(&self, view: View) {
        let mut surface = self.lock();
        surface.view = view;
        surface.mutations += 1;
    }
}
