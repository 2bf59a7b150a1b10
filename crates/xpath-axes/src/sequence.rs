//! Pull-based lazy sequences.
//!
//! A [`SequenceCursor`] produces one value per pull and keeps its whole
//! position in its own fields, so a paused cursor can be resumed after any
//! amount of unrelated work. Every pull carries an [`IterationHint`] from the
//! consumer.

use core::fmt;

/// Per-pull request from the consumer to the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IterationHint {
    #[default]
    None,
    /// Do not descend into the subtree of the value returned by the previous
    /// pull. Affects only this pull; siblings are still produced.
    SkipDescendants,
}

pub trait SequenceCursor {
    type Item;

    fn next_item(&mut self, hint: IterationHint) -> Option<Self::Item>;

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

/// Fused lazy sequence over a boxed cursor.
///
/// Once the cursor reports exhaustion it is dropped; later pulls keep
/// returning `None`.
pub struct Sequence<'a, T> {
    cursor: Option<Box<dyn SequenceCursor<Item = T> + 'a>>,
}

impl<'a, T: 'a> Sequence<'a, T> {
    pub fn from_cursor(cursor: impl SequenceCursor<Item = T> + 'a) -> Self {
        Self { cursor: Some(Box::new(cursor)) }
    }

    pub fn empty() -> Self {
        Self { cursor: None }
    }

    pub fn singleton(value: T) -> Self {
        Self::from_cursor(OnceCursor { value: Some(value) })
    }

    pub fn next_item(&mut self, hint: IterationHint) -> Option<T> {
        let cursor = self.cursor.as_mut()?;
        let item = cursor.next_item(hint);
        if item.is_none() {
            self.cursor = None;
        }
        item
    }

    pub fn is_done(&self) -> bool {
        self.cursor.is_none()
    }

    /// Lazily drops values rejected by `predicate`. The predicate runs only
    /// when a value is pulled through the filter.
    pub fn filter<P>(self, predicate: P) -> Sequence<'a, T>
    where
        P: FnMut(&T) -> bool + 'a,
    {
        match self.cursor {
            Some(inner) => Sequence::from_cursor(FilterCursor { inner, predicate }),
            None => Sequence::empty(),
        }
    }

    pub fn first(mut self) -> Option<T> {
        self.next_item(IterationHint::None)
    }

    pub fn materialize(self) -> Vec<T> {
        self.collect()
    }
}

impl<'a, T: 'a> Iterator for Sequence<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.next_item(IterationHint::None)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.cursor {
            Some(c) => c.size_hint(),
            None => (0, Some(0)),
        }
    }
}

impl<T> fmt::Debug for Sequence<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence").field("done", &self.cursor.is_none()).finish()
    }
}

struct OnceCursor<T> {
    value: Option<T>,
}

impl<T> SequenceCursor for OnceCursor<T> {
    type Item = T;

    fn next_item(&mut self, _hint: IterationHint) -> Option<T> {
        self.value.take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::from(self.value.is_some());
        (n, Some(n))
    }
}

struct FilterCursor<'a, T, P> {
    inner: Box<dyn SequenceCursor<Item = T> + 'a>,
    predicate: P,
}

impl<T, P> SequenceCursor for FilterCursor<'_, T, P>
where
    P: FnMut(&T) -> bool,
{
    type Item = T;

    fn next_item(&mut self, hint: IterationHint) -> Option<T> {
        // The hint refers to the value this filter passed on last, which is
        // also the last value the inner cursor produced.
        let mut hint = hint;
        loop {
            let item = self.inner.next_item(hint)?;
            if (self.predicate)(&item) {
                return Some(item);
            }
            hint = IterationHint::None;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}
