//! Peer bookkeeping for cooperating components.
//!
//! Other components may register matching begin/end step operations
//! with the bridge. Driving those operations from the step loop is an
//! inactive extension point; the behavior that is live is pruning: a
//! peer whose operations stop responding is treated as a broken
//! connection and dropped with a single warning, never retried.

use std::sync::Arc;

use indexmap::IndexMap;
use log::{info, warn};

/// A cooperating component exposing begin/end step operations.
pub trait StepPeer: Send + Sync {
    /// Whether the peer's begin-of-step operation is still responding.
    fn begin_ready(&self) -> bool;
    /// Whether the peer's end-of-step operation is still responding.
    fn end_ready(&self) -> bool;
}

/// Insertion-ordered registry of step peers, keyed by peer name.
#[derive(Default)]
pub struct PeerRegistry {
    peers: IndexMap<String, Arc<dyn StepPeer>>,
}

impl PeerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            peers: IndexMap::new(),
        }
    }

    /// Register a peer under the given name. A name that is already
    /// registered is left untouched.
    pub fn register(&mut self, name: &str, peer: Arc<dyn StepPeer>) {
        if self.peers.contains_key(name) {
            return;
        }
        info!("adding new peer {name}");
        self.peers.insert(name.to_string(), peer);
    }

    /// Drop every peer whose begin or end operation is not responding.
    pub fn prune(&mut self) {
        self.peers.retain(|name, peer| {
            let responsive = peer.begin_ready() && peer.end_ready();
            if !responsive {
                warn!("removing broken connection with peer {name}");
            }
            responsive
        });
    }

    /// Whether a peer with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.peers.contains_key(name)
    }

    /// Number of registered peers.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Registered peer names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.peers.keys().map(String::as_str).collect()
    }
}
