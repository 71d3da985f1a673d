//! Ordered fallback strategies.
//!
//! Every stage of an export (locating documents, reading titles, reading
//! content, detecting the page) is a list of named alternatives tried in
//! priority order. The first alternative that returns a usable value wins.
//! An alternative that returns `Err` is logged and treated as "no match";
//! errors never escape [`StrategyList::first_success`].

use std::borrow::Cow;

use tracing::debug;

use crate::Result;

/// Values a strategy can produce, and whether they count as a match.
pub trait Usable {
    /// `true` when the value is non-empty and well-formed.
    fn is_usable(&self) -> bool;
}

impl<T> Usable for Vec<T> {
    fn is_usable(&self) -> bool {
        !self.is_empty()
    }
}

impl Usable for String {
    fn is_usable(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Usable for bool {
    fn is_usable(&self) -> bool {
        *self
    }
}

impl<T: Usable> Usable for Option<T> {
    fn is_usable(&self) -> bool {
        self.as_ref().is_some_and(Usable::is_usable)
    }
}

type StrategyFn<'a, I, T> = Box<dyn Fn(&I) -> Result<T> + 'a>;

struct Strategy<'a, I: ?Sized, T> {
    name: Cow<'a, str>,
    run: StrategyFn<'a, I, T>,
}

/// The winning strategy and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit<'s, T> {
    /// Name of the strategy that matched.
    pub strategy: &'s str,

    /// Position of the strategy in the list.
    pub rank: usize,

    /// The usable value it produced.
    pub value: T,
}

/// An ordered list of named alternatives for one extraction goal.
///
/// # Example
///
/// ```rust
/// use kb_exporter::strategy::StrategyList;
///
/// let strategies = StrategyList::new("greeting")
///     .with("empty", |_: &str| Ok(String::new()))
///     .with("shout", |name: &str| Ok(name.to_uppercase()));
///
/// let hit = strategies.first_success("ada").expect("second strategy matches");
/// assert_eq!(hit.strategy, "shout");
/// assert_eq!(hit.value, "ADA");
/// ```
pub struct StrategyList<'a, I: ?Sized, T> {
    goal: &'static str,
    strategies: Vec<Strategy<'a, I, T>>,
}

impl<'a, I: ?Sized, T: Usable> StrategyList<'a, I, T> {
    /// Empty list; `goal` names the list in log output.
    #[must_use]
    pub fn new(goal: &'static str) -> Self {
        Self {
            goal,
            strategies: Vec::new(),
        }
    }

    /// Append an alternative with the lowest priority so far.
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<Cow<'a, str>>, run: F) -> Self
    where
        F: Fn(&I) -> Result<T> + 'a,
    {
        self.push(name, run);
        self
    }

    /// Append an alternative with the lowest priority so far.
    pub fn push<F>(&mut self, name: impl Into<Cow<'a, str>>, run: F)
    where
        F: Fn(&I) -> Result<T> + 'a,
    {
        self.strategies.push(Strategy {
            name: name.into(),
            run: Box::new(run),
        });
    }

    /// Number of alternatives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// `true` when the list has no alternatives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Strategy names in priority order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.strategies.iter().map(|s| s.name.as_ref())
    }

    /// Run the alternatives in order and return the first usable value.
    ///
    /// Alternatives after the winner are never run. Returns `None` when every
    /// alternative failed or produced an unusable value.
    pub fn first_success(&self, input: &I) -> Option<Hit<'_, T>> {
        for (rank, strategy) in self.strategies.iter().enumerate() {
            match (strategy.run)(input) {
                Ok(value) if value.is_usable() => {
                    debug!(goal = self.goal, strategy = %strategy.name, rank, "strategy matched");
                    return Some(Hit {
                        strategy: strategy.name.as_ref(),
                        rank,
                        value,
                    });
                }
                Ok(_) => {}
                Err(err) => {
                    debug!(goal = self.goal, strategy = %strategy.name, error = %err, "strategy failed");
                }
            }
        }
        debug!(goal = self.goal, tried = self.strategies.len(), "no strategy matched");
        None
    }
}
