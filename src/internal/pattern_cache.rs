//! The bounded compiled-pattern cache.
//!
//! Keyed by the verbatim pattern string, storing shared compiled
//! artifacts. The façade wraps the cache in an `RwLock`, so reads run
//! concurrently while inserts are serialized. When an insertion would
//! exceed the bound, the oldest entry by insertion order is evicted.

use std::collections::VecDeque;
use std::sync::Arc;

use log::trace;
use rustc_hash::FxHashMap;

use crate::CompiledPattern;

#[derive(Debug)]
pub(crate) struct PatternCache {
    entries: FxHashMap<String, Arc<CompiledPattern>>,
    insertion_order: VecDeque<String>,
    max_size: usize,
}

impl PatternCache {
    pub(crate) fn new(max_size: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            insertion_order: VecDeque::new(),
            max_size,
        }
    }

    pub(crate) fn get(&self, pattern: &str) -> Option<Arc<CompiledPattern>> {
        self.entries.get(pattern).cloned()
    }

    pub(crate) fn insert(&mut self, compiled: Arc<CompiledPattern>) {
        if self.max_size == 0 {
            return;
        }
        let pattern = compiled.pattern().to_string();
        if self.entries.contains_key(&pattern) {
            return;
        }
        while self.entries.len() >= self.max_size {
            if let Some(oldest) = self.insertion_order.pop_front() {
                trace!("evicting pattern '{}' from cache", oldest.escape_default());
                self.entries.remove(&oldest);
            } else {
                break;
            }
        }
        self.insertion_order.push_back(pattern.clone());
        self.entries.insert(pattern, compiled);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::parser::parse;

    fn compiled(pattern: &str) -> Arc<CompiledPattern> {
        Arc::new(CompiledPattern::new(
            pattern.to_string(),
            parse(pattern).unwrap(),
            0.0,
        ))
    }

    #[test]
    fn test_hit_and_miss() {
        let mut cache = PatternCache::new(4);
        cache.insert(compiled("a+"));
        assert!(cache.get("a+").is_some());
        assert!(cache.get("b+").is_none());
    }

    #[test]
    fn test_size_never_exceeds_the_bound() {
        let mut cache = PatternCache::new(3);
        for pattern in ["a", "b", "c", "d", "e"] {
            cache.insert(compiled(pattern));
            assert!(cache.len() <= 3);
        }
    }

    #[test]
    fn test_eviction_is_insertion_ordered() {
        let mut cache = PatternCache::new(2);
        cache.insert(compiled("a"));
        cache.insert(compiled("b"));
        cache.insert(compiled("c"));
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_reinserting_a_cached_pattern_is_a_no_op() {
        let mut cache = PatternCache::new(2);
        cache.insert(compiled("a"));
        cache.insert(compiled("a"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut cache = PatternCache::new(0);
        cache.insert(compiled("a"));
        assert_eq!(cache.len(), 0);
        assert!(cache.get("a").is_none());
    }
}
