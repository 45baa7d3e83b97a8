//! Symbol - global string interning.
//!
//! Declared names (class names, parameter names) appear in attribute
//! payloads and are compared structurally when two arenas are compared. A
//! [`Symbol`] is a 4-byte handle into a global, thread-safe string table,
//! giving O(1) equality and hashing regardless of name length.
//!
//! Interned strings are leaked to obtain `'static` references. The table
//! lives for the whole process and strings are never removed, so no
//! lifetime tracking is needed.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

use dashmap::DashMap;

/// An interned string.
///
/// Two symbols are equal iff the strings they intern are equal.
///
/// # Examples
///
/// ```
/// use jfmt_util::Symbol;
///
/// let a = Symbol::intern("toString");
/// let b = Symbol::intern("toString");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "toString");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

static_assertions::assert_impl_all!(Symbol: Send, Sync);
static_assertions::assert_eq_size!(Symbol, u32);

/// Global string table, initialized on first use.
static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(StringTable::new);

/// Thread-safe interner backing [`Symbol`].
///
/// A `DashMap` keyed by string hash gives lock-free concurrent interning;
/// a second map resolves symbol indices back to their strings.
struct StringTable {
    /// string -> index.
    by_name: DashMap<&'static str, u32, ahash::RandomState>,
    /// index -> string, indexed by symbol value.
    by_index: DashMap<u32, &'static str, ahash::RandomState>,
    /// Next free index.
    next_index: AtomicU32,
}

impl StringTable {
    fn new() -> Self {
        Self {
            by_name: DashMap::with_hasher(ahash::RandomState::new()),
            by_index: DashMap::with_hasher(ahash::RandomState::new()),
            next_index: AtomicU32::new(0),
        }
    }

    fn intern(&self, string: &str) -> u32 {
        if let Some(existing) = self.by_name.get(string) {
            return *existing;
        }

        let leaked: &'static str = Box::leak(string.to_owned().into_boxed_str());
        let index = self.next_index.fetch_add(1, Ordering::Relaxed);

        // A racing intern of the same string may have won; keep the first
        // index so equality stays injective.
        match self.by_name.entry(leaked) {
            dashmap::mapref::entry::Entry::Occupied(entry) => *entry.get(),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(index);
                self.by_index.insert(index, leaked);
                index
            },
        }
    }

    fn resolve(&self, index: u32) -> &'static str {
        self.by_index
            .get(&index)
            .map(|s| *s)
            .expect("symbol index not present in string table")
    }
}

impl Symbol {
    /// Interns a string, returning its symbol.
    pub fn intern(string: &str) -> Self {
        Symbol(STRING_TABLE.intern(string))
    }

    /// Returns the interned string.
    pub fn as_str(&self) -> &'static str {
        STRING_TABLE.resolve(self.0)
    }

    /// Compares the interned string to `other` without interning `other`.
    pub fn eq_str(&self, other: &str) -> bool {
        self.as_str() == other
    }

    /// Returns the raw index value.
    #[inline]
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_round_trip() {
        let sym = Symbol::intern("hello");
        assert_eq!(sym.as_str(), "hello");
    }

    #[test]
    fn test_same_string_same_symbol() {
        let a = Symbol::intern("widget");
        let b = Symbol::intern("widget");
        assert_eq!(a, b);
        assert_eq!(a.as_u32(), b.as_u32());
    }

    #[test]
    fn test_distinct_strings_distinct_symbols() {
        let a = Symbol::intern("alpha");
        let b = Symbol::intern("beta");
        assert_ne!(a, b);
    }

    #[test]
    fn test_eq_str() {
        let sym = Symbol::intern("getValue");
        assert!(sym.eq_str("getValue"));
        assert!(!sym.eq_str("setValue"));
    }

    #[test]
    fn test_empty_string() {
        let sym = Symbol::intern("");
        assert_eq!(sym.as_str(), "");
    }

    #[test]
    fn test_display() {
        let sym = Symbol::intern("Point");
        assert_eq!(format!("{}", sym), "Point");
    }

    #[test]
    fn test_concurrent_interning() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| Symbol::intern("shared-name")))
            .collect();

        let symbols: Vec<Symbol> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(symbols.windows(2).all(|w| w[0] == w[1]));
    }
}
