//! Coarse node classifiers used to prune traversal.
//!
//! A bucket is a conservative superset of the nodes a node test can accept.
//! `None` (no bucket) accepts everything. Buckets never decide a match on their
//! own; they only let accessors and axes skip work that cannot produce one.

use core::fmt;

use string_cache::DefaultAtom;

use crate::model::{NodeKind, QName};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Any node of the given kind.
    Kind(NodeKind),
    /// Elements with the given local name.
    Element(DefaultAtom),
    /// No node at all.
    Empty,
}

impl Bucket {
    pub fn element_named(local: &str) -> Self {
        Bucket::Element(DefaultAtom::from(local))
    }

    /// Whether a node with this kind and name can fall into the bucket.
    pub fn admits(&self, kind: NodeKind, name: Option<&QName>) -> bool {
        match self {
            Bucket::Kind(k) => *k == kind,
            Bucket::Element(local) => {
                kind == NodeKind::Element && name.is_some_and(|q| q.local.as_str() == &**local)
            }
            Bucket::Empty => false,
        }
    }

    /// True if every node in the bucket is an element.
    pub fn implies_element(&self) -> bool {
        matches!(self, Bucket::Kind(NodeKind::Element) | Bucket::Element(_))
    }

    /// True if the bucket can contain a node that has children (a parent or
    /// ancestor of something).
    pub fn may_contain_parents(&self) -> bool {
        match self {
            Bucket::Kind(k) => k.has_children(),
            Bucket::Element(_) => true,
            Bucket::Empty => false,
        }
    }

    /// Hint that is still safe when walking into subtrees: only "element"
    /// survives, because non-elements cannot contain elements.
    pub fn descent_hint(bucket: Option<&Bucket>) -> Option<Bucket> {
        match bucket {
            Some(b) if b.implies_element() => Some(Bucket::Kind(NodeKind::Element)),
            Some(Bucket::Empty) => Some(Bucket::Empty),
            _ => None,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Kind(k) => write!(f, "kind-{k:?}"),
            Bucket::Element(n) => write!(f, "name-{n}"),
            Bucket::Empty => f.write_str("empty"),
        }
    }
}

/// Meet of two buckets.
///
/// `None` is the top element; equal buckets meet at themselves; an element
/// name refines the element kind; any other combination of distinct buckets
/// is disjoint and meets at [`Bucket::Empty`].
pub fn intersect_buckets(a: Option<&Bucket>, b: Option<&Bucket>) -> Option<Bucket> {
    match (a, b) {
        (None, None) => None,
        (None, Some(x)) | (Some(x), None) => Some(x.clone()),
        (Some(x), Some(y)) if x == y => Some(x.clone()),
        (Some(Bucket::Empty), _) | (_, Some(Bucket::Empty)) => Some(Bucket::Empty),
        (Some(Bucket::Kind(NodeKind::Element)), Some(named @ Bucket::Element(_)))
        | (Some(named @ Bucket::Element(_)), Some(Bucket::Kind(NodeKind::Element))) => Some(named.clone()),
        _ => Some(Bucket::Empty),
    }
}
