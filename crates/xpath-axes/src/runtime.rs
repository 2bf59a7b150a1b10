use core::fmt;

use crate::consts::ERR_NS;
use crate::model::TreeAccessor;
use crate::xdm::{NodeValue, XdmItem};

/// Error codes raised by the axis engine.
///
/// Only context-related dynamic/type errors originate here; failures of the
/// tree accessor are not interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    XPDY0002, // context item undefined
    XPTY0020, // context item is not a node
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::XPDY0002 => "XPDY0002",
            ErrorCode::XPTY0020 => "XPTY0020",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }

    pub fn from_code(s: &str) -> Self {
        match s.strip_prefix("err:").unwrap_or(s) {
            "XPDY0002" => ErrorCode::XPDY0002,
            "XPTY0020" => ErrorCode::XPTY0020,
            _ => ErrorCode::Unknown,
        }
    }

    /// Expanded form `Q{http://www.w3.org/2005/xqt-errors}LOCAL`.
    pub fn expanded(&self) -> String {
        format!("Q{{{ERR_NS}}}{}", self.as_str())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "err:{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("error: {message} ({code})")]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
}

impl Error {
    pub fn from_code(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into() }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn absent_context() -> Self {
        Self::from_code(ErrorCode::XPDY0002, "context is absent, it needs to be present to use axes")
    }

    pub fn context_not_node() -> Self {
        Self::from_code(ErrorCode::XPTY0020, "axes can only be applied to nodes")
    }
}

/// Evaluation-time state shared by all axis steps of one evaluation.
pub struct DynamicContext<'t, A: TreeAccessor> {
    tree: &'t A,
    context_item: Option<XdmItem<A::Handle>>,
    bucket_pruning: bool,
}

impl<'t, A: TreeAccessor> DynamicContext<'t, A> {
    pub fn tree(&self) -> &'t A {
        self.tree
    }

    pub fn context_item(&self) -> Option<&XdmItem<A::Handle>> {
        self.context_item.as_ref()
    }

    /// Whether axes may hand bucket hints to the accessor and short-circuit on
    /// empty buckets.
    pub fn bucket_pruning(&self) -> bool {
        self.bucket_pruning
    }

    /// Same tree and settings, different focus. Used by nested steps.
    pub fn focus(&self, item: impl Into<XdmItem<A::Handle>>) -> Self {
        Self { tree: self.tree, context_item: Some(item.into()), bucket_pruning: self.bucket_pruning }
    }
}

impl<A: TreeAccessor> Clone for DynamicContext<'_, A> {
    fn clone(&self) -> Self {
        Self { tree: self.tree, context_item: self.context_item.clone(), bucket_pruning: self.bucket_pruning }
    }
}

impl<A: TreeAccessor> fmt::Debug for DynamicContext<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicContext")
            .field("context_item", &self.context_item)
            .field("bucket_pruning", &self.bucket_pruning)
            .finish_non_exhaustive()
    }
}

pub struct DynamicContextBuilder<'t, A: TreeAccessor> {
    ctx: DynamicContext<'t, A>,
}

impl<'t, A: TreeAccessor> DynamicContextBuilder<'t, A> {
    pub fn new(tree: &'t A) -> Self {
        Self { ctx: DynamicContext { tree, context_item: None, bucket_pruning: true } }
    }

    pub fn with_context_item(mut self, item: impl Into<XdmItem<A::Handle>>) -> Self {
        self.ctx.context_item = Some(item.into());
        self
    }

    pub fn with_context_node(self, node: NodeValue<A::Handle>) -> Self {
        self.with_context_item(XdmItem::Node(node))
    }

    pub fn with_bucket_pruning(mut self, enabled: bool) -> Self {
        self.ctx.bucket_pruning = enabled;
        self
    }

    pub fn build(self) -> DynamicContext<'t, A> {
        self.ctx
    }
}
