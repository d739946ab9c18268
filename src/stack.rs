//! Dispatch frame stack
//!
//! An immutable, persistent list of frames ordered most recently entered
//! first. Every modification returns a new stack sharing the unchanged tail
//! with the stack it was derived from, so a callee can never alter what its
//! caller sees.

use crate::chain::{Layer, MethodChain};
use std::fmt;
use std::sync::Arc;

/// Current position of one logical call within a method chain
pub struct Frame<R> {
    chain: Arc<MethodChain<R>>,
    layer: Arc<Layer<R>>,
}

impl<R> Frame<R> {
    pub(crate) fn new(chain: Arc<MethodChain<R>>, layer: Arc<Layer<R>>) -> Self {
        Self { chain, layer }
    }

    pub fn chain(&self) -> &Arc<MethodChain<R>> {
        &self.chain
    }

    pub fn layer(&self) -> &Arc<Layer<R>> {
        &self.layer
    }

    /// Depth of the executing layer, 0 being the most specific
    pub fn depth(&self) -> usize {
        self.chain.depth_of(&self.layer)
    }

    pub fn is_for(&self, chain: &Arc<MethodChain<R>>) -> bool {
        Arc::ptr_eq(&self.chain, chain)
    }

    /// Same chain, next less specific layer
    pub(crate) fn advanced(&self) -> Option<Self> {
        self.chain
            .below(&self.layer)
            .map(|layer| Self::new(Arc::clone(&self.chain), layer))
    }
}

impl<R> Clone for Frame<R> {
    fn clone(&self) -> Self {
        Self {
            chain: Arc::clone(&self.chain),
            layer: Arc::clone(&self.layer),
        }
    }
}

impl<R> fmt::Debug for Frame<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("model", &self.chain.model())
            .field("method", &self.chain.method())
            .field("position", &self.layer.position())
            .finish()
    }
}

struct Node<R> {
    frame: Frame<R>,
    next: Option<Arc<Node<R>>>,
}

/// Active frames of one call tree, most recent first
pub struct CallStack<R> {
    head: Option<Arc<Node<R>>>,
    len: usize,
}

impl<R> CallStack<R> {
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn front(&self) -> Option<&Frame<R>> {
        self.head.as_deref().map(|node| &node.frame)
    }

    pub fn iter(&self) -> Iter<'_, R> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Live frame for `chain`, if that method is already executing
    pub fn find(&self, chain: &Arc<MethodChain<R>>) -> Option<&Frame<R>> {
        self.iter().find(|frame| frame.is_for(chain))
    }

    pub fn push(&self, frame: Frame<R>) -> Self {
        Self {
            head: Some(Arc::new(Node {
                frame,
                next: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Replace the front frame, keeping the rest of the stack shared.
    /// On an empty stack this is a push.
    pub fn replace_front(&self, frame: Frame<R>) -> Self {
        match self.head.as_deref() {
            Some(node) => Self {
                head: Some(Arc::new(Node {
                    frame,
                    next: node.next.clone(),
                })),
                len: self.len,
            },
            None => self.push(frame),
        }
    }

    /// Move the frame for `chain` to the front.
    ///
    /// Frames in front of it are copied; everything behind it stays shared.
    /// Returns `None` when no frame for `chain` is live.
    pub fn promote(&self, chain: &Arc<MethodChain<R>>) -> Option<Self> {
        let mut prefix = Vec::new();
        let mut cursor = self.head.as_ref();
        while let Some(node) = cursor {
            if node.frame.is_for(chain) {
                if prefix.is_empty() {
                    return Some(self.clone());
                }
                let mut rebuilt = Self {
                    head: node.next.clone(),
                    len: self.len - prefix.len() - 1,
                };
                for frame in prefix.into_iter().rev() {
                    rebuilt = rebuilt.push(frame);
                }
                return Some(rebuilt.push(node.frame.clone()));
            }
            prefix.push(node.frame.clone());
            cursor = node.next.as_ref();
        }
        None
    }
}

impl<R> Default for CallStack<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for CallStack<R> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

impl<R> fmt::Debug for CallStack<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

pub struct Iter<'a, R> {
    next: Option<&'a Node<R>>,
}

impl<'a, R> Iterator for Iter<'a, R> {
    type Item = &'a Frame<R>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some(&node.frame)
    }
}
