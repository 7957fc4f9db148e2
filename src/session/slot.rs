//! Single-slot holder for the current compressed result.
//!
//! Every derivation request gets a [`RequestId`] from a monotonically
//! increasing counter. Only the most recently issued request may install its
//! result; anything older is stale, however late or early it finishes.

use crate::types::CompressedImage;
use std::fmt;
use std::sync::Arc;

/// Sequence number of a derivation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome of [`ResultSlot::install`].
#[derive(Debug)]
pub enum Install {
    /// The result is now current. `released` is the handle it replaced.
    Installed {
        released: Option<Arc<CompressedImage>>,
    },
    /// A newer request was issued; the result was dropped.
    Stale,
}

#[derive(Debug, Default)]
pub struct ResultSlot {
    issued: u64,
    current: Option<Arc<CompressedImage>>,
}

impl ResultSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next request number. Every earlier request becomes stale.
    pub fn issue(&mut self) -> RequestId {
        self.issued += 1;
        RequestId(self.issued)
    }

    /// Most recently issued request, if any.
    pub fn latest(&self) -> Option<RequestId> {
        (self.issued > 0).then_some(RequestId(self.issued))
    }

    pub fn is_latest(&self, request: RequestId) -> bool {
        request.0 == self.issued
    }

    pub fn install(&mut self, request: RequestId, image: Arc<CompressedImage>) -> Install {
        if !self.is_latest(request) {
            return Install::Stale;
        }
        Install::Installed {
            released: self.current.replace(image),
        }
    }

    /// Drop the held result, returning it.
    pub fn clear(&mut self) -> Option<Arc<CompressedImage>> {
        self.current.take()
    }

    pub fn current(&self) -> Option<Arc<CompressedImage>> {
        self.current.clone()
    }
}
