use once_cell::sync::Lazy;
use std::fmt;
use std::sync::RwLock;
use string_interner::{DefaultBackend, DefaultSymbol, StringInterner};

static SYMBOLS: Lazy<RwLock<StringInterner<DefaultBackend>>> =
    Lazy::new(|| RwLock::new(StringInterner::default()));

/// An atom name, interned in the process-wide symbol table.
///
/// Two atoms with the same name always compare equal and share one
/// backing string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(DefaultSymbol);

impl Symbol {
    /// Intern a name, returning its Symbol.
    pub fn intern(name: &str) -> Self {
        let mut table = SYMBOLS.write().unwrap();
        Symbol(table.get_or_intern(name))
    }

    /// Resolve back to an owned String.
    pub fn resolve(&self) -> String {
        self.with_str(str::to_string)
    }

    /// Run a function over the interned string slice without allocating.
    pub fn with_str<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        let table = SYMBOLS.read().unwrap();
        let s = table
            .resolve(self.0)
            .expect("interned symbol must resolve");
        f(s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| write!(f, "{s}"))
    }
}
