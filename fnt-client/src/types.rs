use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// Free-form string metadata attached to a tiddler.
pub type Fields = BTreeMap<String, String>;

/// The server-side collection a tiddler is addressed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container<'a> {
    Bag(&'a str),
    Recipe(&'a str),
}

/// A titled document held in a bag or exposed through a recipe.
///
/// The title is fixed at construction. Addressing (`host`, `bag`, `recipe`)
/// belongs to the caller and survives a read; the authorship and revision
/// metadata belong to the server and are only filled in by decoding a
/// server document.
#[derive(Debug, Clone, PartialEq)]
pub struct Tiddler {
    title: String,

    host: Option<String>,
    bag: Option<String>,
    recipe: Option<String>,

    pub text: Option<String>,
    pub tags: Vec<String>,
    /// Content type, e.g. `text/x-markdown`. `None` means the server default.
    pub tiddler_type: Option<String>,
    pub fields: Fields,

    pub(crate) render: Option<String>,
    pub(crate) modifier: Option<String>,
    pub(crate) modified: Option<DateTime<Utc>>,
    pub(crate) creator: Option<String>,
    pub(crate) created: Option<DateTime<Utc>>,
    pub(crate) revision: Option<String>,
}

/// Empty strings count as unset, matching how the server treats them.
fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

impl Tiddler {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            host: None,
            bag: None,
            recipe: None,
            text: None,
            tags: Vec::new(),
            tiddler_type: None,
            fields: Fields::new(),
            render: None,
            modifier: None,
            modified: None,
            creator: None,
            created: None,
            revision: None,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.set_host(host);
        self
    }

    pub fn in_bag(mut self, bag: impl Into<String>) -> Self {
        self.set_bag(bag);
        self
    }

    pub fn in_recipe(mut self, recipe: impl Into<String>) -> Self {
        self.set_recipe(recipe);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = non_empty(host.into());
    }

    pub fn bag(&self) -> Option<&str> {
        self.bag.as_deref()
    }

    pub fn set_bag(&mut self, bag: impl Into<String>) {
        self.bag = non_empty(bag.into());
    }

    pub fn recipe(&self) -> Option<&str> {
        self.recipe.as_deref()
    }

    pub fn set_recipe(&mut self, recipe: impl Into<String>) {
        self.recipe = non_empty(recipe.into());
    }

    /// The container used for addressing. A bag wins over a recipe.
    pub fn container(&self) -> Option<Container<'_>> {
        match (self.bag.as_deref(), self.recipe.as_deref()) {
            (Some(bag), _) => Some(Container::Bag(bag)),
            (None, Some(recipe)) => Some(Container::Recipe(recipe)),
            (None, None) => None,
        }
    }

    /// Server-rendered HTML, present only after a read that asked for it.
    pub fn render(&self) -> Option<&str> {
        self.render.as_deref()
    }

    pub fn modifier(&self) -> Option<&str> {
        self.modifier.as_deref()
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified
    }

    pub fn creator(&self) -> Option<&str> {
        self.creator.as_deref()
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    /// Opaque revision marker assigned by the server.
    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }
}
