//! Snapshot differencer: decides whether a feed needs re-rendering.
//!
//! [`Memo`] is the generic memoized-render gate, parameterized by an
//! [`Equivalence`] strategy. The default strategy compares canonical JSON
//! serializations; [`StructuralEq`] compares values with `PartialEq` and never
//! builds a string. [`SnapshotDiffer`] keeps one memo per feed.

use std::borrow::Borrow;
use std::marker::PhantomData;

use serde::Serialize;

use crate::model::{ChatMessage, LeaderboardEntry};

/// How a payload is reduced to a comparable form and compared.
pub trait Equivalence<T: ?Sized> {
    type Form;

    /// `None` means the payload cannot be compared and must be rendered.
    fn canonical(&self, value: &T) -> Option<Self::Form>;

    fn equivalent(&self, cached: &Self::Form, fresh: &Self::Form) -> bool;
}

/// Compares canonical `serde_json` serializations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializedEq;

impl<T: Serialize + ?Sized> Equivalence<T> for SerializedEq {
    type Form = String;

    fn canonical(&self, value: &T) -> Option<String> {
        serde_json::to_string(value).ok()
    }

    fn equivalent(&self, cached: &String, fresh: &String) -> bool {
        cached == fresh
    }
}

/// Compares owned copies with `PartialEq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralEq;

impl<T> Equivalence<T> for StructuralEq
where
    T: ToOwned + PartialEq + ?Sized,
{
    type Form = T::Owned;

    fn canonical(&self, value: &T) -> Option<T::Owned> {
        Some(value.to_owned())
    }

    fn equivalent(&self, cached: &T::Owned, fresh: &T::Owned) -> bool {
        let cached: &T = cached.borrow();
        let fresh: &T = fresh.borrow();
        cached == fresh
    }
}

/// Remembers the last payload seen for one feed.
pub struct Memo<T: ?Sized, E: Equivalence<T> = SerializedEq> {
    eq: E,
    cached: Option<E::Form>,
    _payload: PhantomData<fn(&T)>,
}

impl<T: ?Sized, E: Equivalence<T> + Default> Default for Memo<T, E> {
    fn default() -> Self {
        Self::with_equivalence(E::default())
    }
}

impl<T: ?Sized, E: Equivalence<T>> Memo<T, E> {
    pub fn with_equivalence(eq: E) -> Self {
        Self {
            eq,
            cached: None,
            _payload: PhantomData,
        }
    }

    /// Returns `false` iff `value` is equivalent to the cached payload.
    /// The cache always ends up holding `value`'s form.
    pub fn should_render(&mut self, value: &T) -> bool {
        let fresh = self.eq.canonical(value);
        let unchanged = match (&self.cached, &fresh) {
            (Some(cached), Some(fresh)) => self.eq.equivalent(cached, fresh),
            _ => false,
        };
        self.cached = fresh;
        !unchanged
    }
}

/// One of the two independently diffed and rendered list feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Leaderboard,
    Messages,
}

/// A feed payload borrowed from a snapshot.
#[derive(Debug, Clone, Copy)]
pub enum FeedPayload<'a> {
    Leaderboard(&'a [LeaderboardEntry]),
    Messages(&'a [ChatMessage]),
}

impl FeedPayload<'_> {
    pub fn feed(&self) -> Feed {
        match self {
            FeedPayload::Leaderboard(_) => Feed::Leaderboard,
            FeedPayload::Messages(_) => Feed::Messages,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FeedPayload::Leaderboard(items) => items.is_empty(),
            FeedPayload::Messages(items) => items.is_empty(),
        }
    }
}

/// Per-feed render cache.
pub struct SnapshotDiffer<E = SerializedEq>
where
    E: Equivalence<[LeaderboardEntry]> + Equivalence<[ChatMessage]>,
{
    leaderboard: Memo<[LeaderboardEntry], E>,
    messages: Memo<[ChatMessage], E>,
}

impl Default for SnapshotDiffer {
    fn default() -> Self {
        Self::new(SerializedEq)
    }
}

impl<E> SnapshotDiffer<E>
where
    E: Equivalence<[LeaderboardEntry]> + Equivalence<[ChatMessage]> + Clone,
{
    pub fn new(eq: E) -> Self {
        Self {
            leaderboard: Memo::with_equivalence(eq.clone()),
            messages: Memo::with_equivalence(eq),
        }
    }

    pub fn should_render(&mut self, payload: FeedPayload<'_>) -> bool {
        match payload {
            FeedPayload::Leaderboard(items) => self.leaderboard.should_render(items),
            FeedPayload::Messages(items) => self.messages.should_render(items),
        }
    }
}
