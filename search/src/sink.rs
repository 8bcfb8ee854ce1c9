//! Output channel for finished chains.

use crate::profile::ProfileChainV1;

/// Receives every chain the profile search finishes, in emission order.
pub trait ChainSink {
    fn accept(&mut self, chain: &ProfileChainV1);
}

impl<F: FnMut(&ProfileChainV1)> ChainSink for F {
    fn accept(&mut self, chain: &ProfileChainV1) {
        self(chain);
    }
}

impl ChainSink for Vec<ProfileChainV1> {
    fn accept(&mut self, chain: &ProfileChainV1) {
        self.push(chain.clone());
    }
}

/// Counts chains without keeping them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountingSink {
    pub chains: u64,
    pub max_len: usize,
}

impl ChainSink for CountingSink {
    fn accept(&mut self, chain: &ProfileChainV1) {
        self.chains += 1;
        self.max_len = self.max_len.max(chain.len());
    }
}
