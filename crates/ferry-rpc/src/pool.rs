//! Ordered RPC endpoints with a rotating cursor.

use std::sync::atomic::{AtomicUsize, Ordering};

use ferry_config::NetworkConfig;
use ferry_types::{FerryError, NetworkId, Result};

/// Ordered list of RPC endpoints for one network with a current-index
/// cursor.
///
/// The orchestrator is single-threaded with respect to any one network, so
/// rotation is a plain atomic index update and needs no further locking.
/// Do not submit against the same network from multiple tasks without
/// adding synchronization around the whole submit/confirm sequence.
#[derive(Debug)]
pub struct EndpointPool {
    network: NetworkId,
    endpoints: Vec<String>,
    cursor: AtomicUsize,
}

impl EndpointPool {
    pub fn new(network: NetworkId, endpoints: Vec<String>) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(FerryError::Config(format!(
                "{} endpoint list is empty",
                network
            )));
        }
        Ok(Self {
            network,
            endpoints,
            cursor: AtomicUsize::new(0),
        })
    }

    pub fn from_config(config: &NetworkConfig) -> Result<Self> {
        Self::new(config.id, config.endpoints.clone())
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Index of the active endpoint, for progress reporting.
    pub fn position(&self) -> usize {
        self.cursor.load(Ordering::SeqCst) % self.endpoints.len()
    }

    /// The active endpoint. An out-of-range cursor resets to the first
    /// endpoint.
    pub fn current(&self) -> String {
        let index = self.cursor.load(Ordering::SeqCst);
        if index >= self.endpoints.len() {
            self.cursor.store(0, Ordering::SeqCst);
            return self.endpoints[0].clone();
        }
        self.endpoints[index].clone()
    }

    /// Advance the cursor by one, wrapping, and return the new active
    /// endpoint.
    pub fn rotate(&self) -> String {
        let next = (self.cursor.load(Ordering::SeqCst) + 1) % self.endpoints.len();
        self.cursor.store(next, Ordering::SeqCst);
        self.endpoints[next].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    fn pool(n: usize) -> EndpointPool {
        let endpoints = (0..n).map(|i| format!("https://rpc{}.example", i)).collect();
        EndpointPool::new(NetworkId::Sepolia, endpoints).unwrap()
    }

    #[test]
    fn test_rotate_is_cyclic() {
        let pool = pool(3);
        let first = pool.current();
        for _ in 0..pool.len() {
            pool.rotate();
        }
        assert_eq!(pool.current(), first);
    }

    #[test]
    fn test_rotate_advances_in_order() {
        let pool = pool(3);
        assert_eq!(pool.current(), "https://rpc0.example");
        assert_eq!(pool.rotate(), "https://rpc1.example");
        assert_eq!(pool.rotate(), "https://rpc2.example");
        assert_eq!(pool.rotate(), "https://rpc0.example");
    }

    #[test]
    fn test_out_of_range_cursor_resets() {
        let pool = pool(2);
        pool.cursor.store(7, Ordering::SeqCst);
        assert_eq!(pool.current(), "https://rpc0.example");
        assert_eq!(pool.position(), 0);
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert!(EndpointPool::new(NetworkId::Sepolia, Vec::new()).is_err());
    }
}
