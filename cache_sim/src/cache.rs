use std::fmt;

use crate::{
    config::{CacheConfig, ConfigError},
    stat::{CacheStat, Report},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessResult {
    Hit,
    Miss,
}

impl AccessResult {
    pub fn is_hit(self) -> bool {
        self == AccessResult::Hit
    }
}

impl fmt::Display for AccessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessResult::Hit => f.write_str("Hit"),
            AccessResult::Miss => f.write_str("Miss"),
        }
    }
}

/// one slot of the cache. `tag` is meaningless while `valid` is false.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheLine {
    pub valid: bool,
    pub tag: u64,
}

impl CacheLine {
    fn holds(&self, tag: u64) -> bool {
        self.valid && self.tag == tag
    }
}

pub struct DirectMappedCache {
    config: CacheConfig,
    lines: Vec<CacheLine>,
    stat: CacheStat,
}

impl DirectMappedCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            lines: vec![CacheLine::default(); config.num_lines()],
            stat: CacheStat::default(),
        }
    }
    pub fn with_sizes(cache_size: u64, mem_size: u64, block_size: u64) -> Result<Self, ConfigError> {
        Ok(Self::new(CacheConfig::new(cache_size, mem_size, block_size)?))
    }
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }
    pub fn tag_of(&self, address: u64) -> u64 {
        address / self.config.block_size()
    }
    /// line an address maps to; always in `0..num_lines()`.
    pub fn index_of(&self, address: u64) -> usize {
        (self.tag_of(address) % self.lines.len() as u64) as usize
    }
    /// whether `address` would hit, without touching the cache.
    pub fn probe(&self, address: u64) -> bool {
        self.lines[self.index_of(address)].holds(self.tag_of(address))
    }
    pub fn access(&mut self, address: u64) -> AccessResult {
        let tag = self.tag_of(address);
        let index = self.index_of(address);
        let line = &mut self.lines[index];
        let result = if line.holds(tag) {
            AccessResult::Hit
        } else {
            *line = CacheLine { valid: true, tag };
            AccessResult::Miss
        };
        self.stat.update_stat(result);
        result
    }
    pub fn stat(&self) -> &CacheStat {
        &self.stat
    }
    pub fn statistics(&self) -> Report {
        self.stat.report()
    }
    /// invalidates every line and clears the counters.
    pub fn reset(&mut self) {
        self.lines.fill(CacheLine::default());
        self.stat = CacheStat::default();
    }
}
