//! Suggestion sources and the one-shot continuation they answer through.
//!
//! A source receives the query text and a [`Responder`]. It may answer right
//! away, later from another task, or never. `Responder::respond` consumes the
//! responder, so a query is answered at most once.
//!
//! ```rust
//! use bubbletea_autocomplete::source::{Responder, StaticSource, SuggestionSource};
//!
//! // Any closure works as a source.
//! let echo = |query: &str, responder: Responder| responder.respond(vec![query.to_uppercase()]);
//! let (responder, mut rx) = Responder::channel();
//! echo.request("abc", responder);
//! assert_eq!(rx.try_recv().unwrap()[0].value(), "ABC");
//!
//! // Or a fixed list filtered by substring.
//! let cities = StaticSource::new(["Berlin", "Bern", "Boston"]);
//! let (responder, mut rx) = Responder::channel();
//! cities.request("ber", responder);
//! assert_eq!(rx.try_recv().unwrap().len(), 2);
//! ```

use crate::render::Suggestion;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use tokio::sync::oneshot;

/// Receiving half of a [`Responder`].
pub type Receiver = oneshot::Receiver<Vec<Suggestion>>;

/// Continuation handed to a source. Answering consumes it.
#[derive(Debug)]
pub struct Responder {
    tx: oneshot::Sender<Vec<Suggestion>>,
}

impl Responder {
    /// Creates a responder and the receiver its answer arrives on.
    pub fn channel() -> (Self, Receiver) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Delivers the ordered suggestion list.
    pub fn respond<I, S>(self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Suggestion>,
    {
        // The engine may already be gone; the answer is simply dropped then.
        let _ = self.tx.send(items.into_iter().map(Into::into).collect());
    }
}

/// Produces suggestions for a query.
pub trait SuggestionSource: Send + Sync {
    /// Starts a lookup for `query`. The answer goes through `responder`.
    fn request(&self, query: &str, responder: Responder);
}

impl<F> SuggestionSource for F
where
    F: Fn(&str, Responder) + Send + Sync,
{
    fn request(&self, query: &str, responder: Responder) {
        self(query, responder)
    }
}

/// A fixed list filtered by case-insensitive substring, in list order.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    items: Vec<Suggestion>,
}

impl StaticSource {
    /// Creates a source over `items`.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Suggestion>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// The matches for `query`.
    pub fn matches(&self, query: &str) -> Vec<Suggestion> {
        let needle = query.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.label().to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

impl SuggestionSource for StaticSource {
    fn request(&self, query: &str, responder: Responder) {
        responder.respond(self.matches(query));
    }
}

/// A fixed list ranked by fuzzy score, best first.
#[derive(Debug, Clone, Default)]
pub struct FuzzySource {
    items: Vec<Suggestion>,
}

impl FuzzySource {
    /// Creates a source over `items`.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Suggestion>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// The matches for `query`, best score first; ties keep list order.
    pub fn matches(&self, query: &str) -> Vec<Suggestion> {
        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, usize)> = self
            .items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                matcher
                    .fuzzy_match(item.label(), query)
                    .map(|score| (score, index))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        scored
            .into_iter()
            .map(|(_, index)| self.items[index].clone())
            .collect()
    }
}

impl SuggestionSource for FuzzySource {
    fn request(&self, query: &str, responder: Responder) {
        responder.respond(self.matches(query));
    }
}
