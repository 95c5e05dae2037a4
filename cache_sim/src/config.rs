use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid cache and memory sizes. Both sizes must be divisible by 2, and cache size must be smaller than or equal to memory size.")]
    InvalidSizes { mem_size: u64, cache_size: u64 },
    #[error("block size must be at least 1")]
    ZeroBlockSize,
    #[error("{what} size {size} is not a multiple of block size {block_size}")]
    NotBlockAligned {
        what: SizeKind,
        size: u64,
        block_size: u64,
    },
    #[error("cache of size {cache_size} holds no lines")]
    NoCacheLines { cache_size: u64 },
    #[error("cache of {lines} lines exceeds the limit of {} lines", MAX_CACHE_LINES)]
    TooManyLines { lines: u64 },
}

/// upper bound on the number of lines a simulated cache may hold.
pub const MAX_CACHE_LINES: usize = 1 << 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeKind {
    Cache,
    Memory,
}

impl fmt::Display for SizeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeKind::Cache => write!(f, "cache"),
            SizeKind::Memory => write!(f, "memory"),
        }
    }
}

/// checks the constraint the command line imposes on the raw sizes,
/// before any block arithmetic happens.
pub fn check_sizes(mem_size: u64, cache_size: u64) -> Result<(), ConfigError> {
    if mem_size % 2 != 0 || cache_size % 2 != 0 || cache_size > mem_size {
        return Err(ConfigError::InvalidSizes {
            mem_size,
            cache_size,
        });
    }
    Ok(())
}

/// validated geometry of a direct-mapped cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    cache_size: u64,
    mem_size: u64,
    block_size: u64,
    num_lines: usize,
}

impl CacheConfig {
    pub fn new(cache_size: u64, mem_size: u64, block_size: u64) -> Result<Self, ConfigError> {
        if block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        for (what, size) in [(SizeKind::Cache, cache_size), (SizeKind::Memory, mem_size)] {
            if size % block_size != 0 {
                return Err(ConfigError::NotBlockAligned {
                    what,
                    size,
                    block_size,
                });
            }
        }
        let lines = cache_size / block_size;
        if lines == 0 {
            return Err(ConfigError::NoCacheLines { cache_size });
        }
        let num_lines = match usize::try_from(lines) {
            Ok(n) if n <= MAX_CACHE_LINES => n,
            _ => return Err(ConfigError::TooManyLines { lines }),
        };
        Ok(Self {
            cache_size,
            mem_size,
            block_size,
            num_lines,
        })
    }
    pub fn cache_size(&self) -> u64 {
        self.cache_size
    }
    pub fn mem_size(&self) -> u64 {
        self.mem_size
    }
    pub fn block_size(&self) -> u64 {
        self.block_size
    }
    pub fn num_lines(&self) -> usize {
        self.num_lines
    }
    pub fn num_mem_blocks(&self) -> u64 {
        self.mem_size / self.block_size
    }
}

impl fmt::Display for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cache {} / memory {} / block {} ({} lines, {} memory blocks)",
            self.cache_size,
            self.mem_size,
            self.block_size,
            self.num_lines(),
            self.num_mem_blocks()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_sizes() {
        assert!(check_sizes(8, 4).is_ok());
        assert!(check_sizes(8, 8).is_ok());
        assert!(check_sizes(0, 0).is_ok());
        assert!(check_sizes(7, 4).is_err());
        assert!(check_sizes(8, 3).is_err());
        assert_eq!(
            check_sizes(4, 8),
            Err(ConfigError::InvalidSizes {
                mem_size: 4,
                cache_size: 8
            })
        );
    }
    #[test]
    fn test_derived_counts() {
        let c = CacheConfig::new(64, 256, 4).unwrap();
        assert_eq!(c.num_lines(), 16);
        assert_eq!(c.num_mem_blocks(), 64);
        let c = CacheConfig::new(4, 8, 1).unwrap();
        assert_eq!(c.num_lines(), 4);
        assert_eq!(c.num_mem_blocks(), 8);
    }
    #[test]
    fn test_invalid_config() {
        assert_eq!(CacheConfig::new(4, 8, 0), Err(ConfigError::ZeroBlockSize));
        assert_eq!(
            CacheConfig::new(6, 8, 4),
            Err(ConfigError::NotBlockAligned {
                what: SizeKind::Cache,
                size: 6,
                block_size: 4
            })
        );
        assert_eq!(
            CacheConfig::new(8, 10, 4),
            Err(ConfigError::NotBlockAligned {
                what: SizeKind::Memory,
                size: 10,
                block_size: 4
            })
        );
        assert_eq!(
            CacheConfig::new(0, 8, 1),
            Err(ConfigError::NoCacheLines { cache_size: 0 })
        );
    }
    #[test]
    fn test_too_many_lines() {
        assert!(check_sizes(1 << 62, 1 << 62).is_ok());
        assert_eq!(
            CacheConfig::new(1 << 62, 1 << 62, 1),
            Err(ConfigError::TooManyLines { lines: 1 << 62 })
        );
        let max = MAX_CACHE_LINES as u64;
        assert_eq!(CacheConfig::new(max, max, 1).unwrap().num_lines(), MAX_CACHE_LINES);
        assert!(CacheConfig::new(2 * max, 2 * max, 1).is_err());
        // bigger blocks bring the line count back under the limit
        assert_eq!(CacheConfig::new(2 * max, 2 * max, 2).unwrap().num_lines(), MAX_CACHE_LINES);
    }
    #[test]
    fn test_error_message() {
        let e = CacheConfig::new(6, 8, 4).unwrap_err();
        assert_eq!(e.to_string(), "cache size 6 is not a multiple of block size 4");
    }
}
