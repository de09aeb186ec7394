/// How a function body relates to its parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FunctionMode {
    /// The body is kept as source text and evaluated on every call, with the
    /// argument bound to the parameter.
    #[default]
    Substitute,
    /// The body is evaluated once, when the function is defined, without the
    /// parameter being bound. Calls ignore their argument and return that
    /// value. Compatible with the first computor prototype.
    Eager,
}

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Knobs carried by a [`SymbolTable`](crate::SymbolTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub function_mode: FunctionMode,
    /// Maximum nesting of function calls and matrix literals.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            function_mode: FunctionMode::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    pub fn eager(mut self, eager: bool) -> Self {
        self.function_mode = if eager {
            FunctionMode::Eager
        } else {
            FunctionMode::Substitute
        };
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
