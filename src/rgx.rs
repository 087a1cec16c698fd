use std::sync::{Arc, RwLock};
use std::time::Instant;

use log::{debug, trace};

use crate::internal::{
    parse, Backtracker, Budget, DfaMatcher, MatcherRun, Nfa, NfaMatcher, PatternCache,
};
use crate::{
    CompiledPattern, Engine, EngineConfig, Match, MatchResult, ReplaceResult, Result, RgxError,
    RgxErrorKind,
};

/// The matching façade.
///
/// An `Rgx` instance carries the runtime limits and the shared
/// compiled-pattern cache. Every operation validates its arguments,
/// obtains the compiled pattern (from the cache when enabled), binds a
/// fresh matcher for the chosen [Engine] and runs it against the input.
///
/// All indices in results are code point offsets. Inputs are `&str`, so
/// "null" arguments cannot occur; only over-length arguments are rejected.
#[derive(Debug)]
pub struct Rgx {
    config: EngineConfig,
    cache: RwLock<PatternCache>,
}

impl Rgx {
    /// Create a façade with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create a façade with the given configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        let cache = RwLock::new(PatternCache::new(config.cache_max_size));
        Self { config, cache }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The number of compiled patterns currently cached.
    pub fn cache_size(&self) -> usize {
        self.cache.read().map(|cache| cache.len()).unwrap_or(0)
    }

    /// Compile a pattern, or fetch it from the cache.
    pub fn compile(&self, pattern: &str) -> Result<Arc<CompiledPattern>> {
        self.validate_pattern(pattern)?;
        if self.config.cache_enabled {
            if let Some(hit) = self.read_cache()?.get(pattern) {
                trace!("cache hit for pattern '{}'", pattern.escape_default());
                return Ok(hit);
            }
        }
        let started = Instant::now();
        let ast = parse(pattern)?;
        let compile_ms = started.elapsed().as_secs_f64() * 1e3;
        debug!(
            "compiled pattern '{}' in {:.3} ms",
            pattern.escape_default(),
            compile_ms
        );
        let compiled = Arc::new(CompiledPattern::new(pattern.to_string(), ast, compile_ms));
        if self.config.cache_enabled {
            self.write_cache()?.insert(compiled.clone());
        }
        Ok(compiled)
    }

    /// Match the pattern against the entire input.
    pub fn match_full(&self, pattern: &str, input: &str, engine: Engine) -> Result<MatchResult> {
        let started = Instant::now();
        let (compiled, chars) = self.prepare(pattern, input)?;
        let budget = Budget::new(started, self.config.timeout_ms);
        let run = match engine {
            Engine::Backtracking => {
                Backtracker::new(&compiled.ast, self.config.max_backtracks, budget)
                    .match_full(&chars)?
            }
            Engine::Nfa => {
                let nfa = Nfa::from_ast(&compiled.ast);
                NfaMatcher::new(&nfa, budget).match_full(&chars)?
            }
            Engine::Dfa => DfaMatcher::new(Nfa::from_ast(&compiled.ast), budget).match_full(&chars)?,
        };
        Ok(Self::single_result(run, &chars, started))
    }

    /// Find the leftmost match. The backtracking engine reports the
    /// leftmost-first match, the NFA and DFA engines the leftmost-longest.
    pub fn find(&self, pattern: &str, input: &str, engine: Engine) -> Result<MatchResult> {
        let started = Instant::now();
        let (compiled, chars) = self.prepare(pattern, input)?;
        let budget = Budget::new(started, self.config.timeout_ms);
        let run = match engine {
            Engine::Backtracking => {
                Backtracker::new(&compiled.ast, self.config.max_backtracks, budget).find(&chars)?
            }
            Engine::Nfa => {
                let nfa = Nfa::from_ast(&compiled.ast);
                NfaMatcher::new(&nfa, budget).find(&chars)?
            }
            Engine::Dfa => DfaMatcher::new(Nfa::from_ast(&compiled.ast), budget).find(&chars)?,
        };
        Ok(Self::single_result(run, &chars, started))
    }

    /// Find all non-overlapping matches in order of increasing start
    /// position.
    pub fn find_all(&self, pattern: &str, input: &str, engine: Engine) -> Result<MatchResult> {
        let started = Instant::now();
        let (compiled, chars) = self.prepare(pattern, input)?;
        let budget = Budget::new(started, self.config.timeout_ms);
        let (spans, work) = match engine {
            Engine::Backtracking => {
                Backtracker::new(&compiled.ast, self.config.max_backtracks, budget)
                    .find_all(&chars)?
            }
            Engine::Nfa => {
                let nfa = Nfa::from_ast(&compiled.ast);
                NfaMatcher::new(&nfa, budget).find_all(&chars)?
            }
            Engine::Dfa => DfaMatcher::new(Nfa::from_ast(&compiled.ast), budget).find_all(&chars)?,
        };
        let matches = spans
            .into_iter()
            .map(|span| Match::new(span, chars[span.range()].iter().collect()))
            .collect();
        let elapsed_ms = started.elapsed().as_secs_f64() * 1e3;
        Ok(MatchResult::hits(matches, work, elapsed_ms))
    }

    /// Replace every match with the replacement, taken as a literal string
    /// (no back-substitution).
    pub fn replace(
        &self,
        pattern: &str,
        input: &str,
        replacement: &str,
        engine: Engine,
    ) -> Result<ReplaceResult> {
        let result = self.find_all(pattern, input, engine)?;
        if !result.matched() {
            return Ok(ReplaceResult::new(input.to_string(), 0));
        }
        let chars: Vec<char> = input.chars().collect();
        let mut out = String::with_capacity(input.len());
        let mut last = 0usize;
        for m in result.matches() {
            out.extend(chars[last..m.start()].iter());
            out.push_str(replacement);
            last = m.end();
        }
        out.extend(chars[last..].iter());
        Ok(ReplaceResult::new(out, result.matches().len()))
    }

    /// Split the input around every match. Matches abutting the input
    /// boundaries produce empty leading or trailing parts; N matches yield
    /// N+1 parts.
    pub fn split(&self, pattern: &str, input: &str, engine: Engine) -> Result<Vec<String>> {
        let result = self.find_all(pattern, input, engine)?;
        if !result.matched() {
            return Ok(vec![input.to_string()]);
        }
        let chars: Vec<char> = input.chars().collect();
        let mut parts: Vec<String> = Vec::with_capacity(result.matches().len() + 1);
        let mut last = 0usize;
        for m in result.matches() {
            parts.push(chars[last..m.start()].iter().collect());
            last = m.end();
        }
        parts.push(chars[last..].iter().collect());
        Ok(parts)
    }

    // Operation prelude: pattern and input limits first, then
    // compile-or-cached.
    fn prepare(&self, pattern: &str, input: &str) -> Result<(Arc<CompiledPattern>, Vec<char>)> {
        self.validate_pattern(pattern)?;
        self.validate_input(input)?;
        let compiled = self.compile(pattern)?;
        Ok((compiled, input.chars().collect()))
    }

    fn single_result(run: MatcherRun, chars: &[char], started: Instant) -> MatchResult {
        let elapsed_ms = started.elapsed().as_secs_f64() * 1e3;
        match run.span {
            Some(span) => MatchResult::hit(
                span,
                chars[span.range()].iter().collect(),
                run.work,
                elapsed_ms,
            ),
            None => MatchResult::no_match(run.work, elapsed_ms),
        }
    }

    fn validate_pattern(&self, pattern: &str) -> Result<()> {
        let length = pattern.chars().count();
        if length > self.config.max_pattern_length {
            return Err(RgxError::invalid_argument(format!(
                "pattern length {} exceeds the limit of {}",
                length, self.config.max_pattern_length
            )));
        }
        Ok(())
    }

    fn validate_input(&self, input: &str) -> Result<()> {
        let length = input.chars().count();
        if length > self.config.max_input_length {
            return Err(RgxError::invalid_argument(format!(
                "input length {} exceeds the limit of {}",
                length, self.config.max_input_length
            )));
        }
        Ok(())
    }

    fn read_cache(&self) -> Result<std::sync::RwLockReadGuard<'_, PatternCache>> {
        self.cache
            .read()
            .map_err(|_| RgxError::new(RgxErrorKind::Internal("pattern cache lock poisoned".into())))
    }

    fn write_cache(&self) -> Result<std::sync::RwLockWriteGuard<'_, PatternCache>> {
        self.cache
            .write()
            .map_err(|_| RgxError::new(RgxErrorKind::Internal("pattern cache lock poisoned".into())))
    }
}

impl Default for Rgx {
    fn default() -> Self {
        Self::new()
    }
}
