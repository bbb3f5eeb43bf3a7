//! LispIsh value trees.
//!
//! A parsed expression is always a [`Method`] at the root.
//! Its arguments are [`Value`]s: numbers, strings, or further method calls.
//! Each node owns its children, so replacing an argument simply drops the old subtree.
//!
//! Every value can [emit](Value::emit) itself as canonical LispIsh text,
//! which the reader parses back into an equal tree.
//! The `Display` implementations emit at indent level 0.

pub mod escape;

/// Numbers are unsigned: the grammar has no negative literals.
pub type Integer = u64;

/// One level of indentation in emitted text.
pub const INDENT: &str = "    ";

/// Indentation for the given nesting level.
pub fn indent(level: usize) -> String {
    INDENT.repeat(level)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Number(Integer),
    String(String),
    Method(Method),
}

impl Value {
    /// Emit this value as LispIsh text, indented to `level`.
    pub fn emit(&self, level: usize) -> String {
        match self {
            Value::Number(n) => format!("{}{}", indent(level), n),
            Value::String(s) => format!("{}{}", indent(level), escape::quote(s)),
            Value::Method(m) => m.emit(level),
        }
    }

    pub fn as_number(&self) -> Option<Integer> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&Method> {
        match self {
            Value::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_method_mut(&mut self) -> Option<&mut Method> {
        match self {
            Value::Method(m) => Some(m),
            _ => None,
        }
    }
}

impl From<Integer> for Value {
    fn from(value: Integer) -> Self {
        Value::Number(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<Method> for Value {
    fn from(value: Method) -> Self {
        Value::Method(value)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.emit(0))
    }
}

/// A method call: `(name arg...)`.
///
/// The name is kept as written; the canonical name is its uppercase form,
/// which evaluators dispatch on. The two only change together, through [`Method::rename`].
/// Arity is not checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    name: String,
    canonical_name: String,
    args: Vec<Value>,
}

impl Method {
    pub fn new(name: impl Into<String>, args: Vec<Value>) -> Self {
        let name = name.into();
        Method {
            canonical_name: name.to_uppercase(),
            name,
            args,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    /// Replace the name, and the canonical name with it.
    ///
    /// The new name is not checked against the name grammar;
    /// a name the reader would reject will not survive an emit/parse round trip.
    pub fn rename(&mut self, name: impl Into<String>) {
        let name = name.into();
        tracing::trace!(from = %self.name, to = %name, "renaming method");
        self.canonical_name = name.to_uppercase();
        self.name = name;
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn args_mut(&mut self) -> &mut Vec<Value> {
        &mut self.args
    }

    pub fn push_arg(&mut self, value: impl Into<Value>) {
        self.args.push(value.into());
    }

    /// Insert an argument at `index`, shifting later arguments right.
    ///
    /// Panics if `index > args().len()`, like [`Vec::insert`].
    pub fn insert_arg(&mut self, index: usize, value: impl Into<Value>) {
        self.args.insert(index, value.into());
    }

    pub fn remove_arg(&mut self, index: usize) -> Option<Value> {
        if index < self.args.len() {
            Some(self.args.remove(index))
        } else {
            None
        }
    }

    /// Put `value` in place of the argument at `index`, returning the old argument.
    ///
    /// Returns `None`, and leaves the call unchanged, if there is no such argument.
    pub fn replace_arg(&mut self, index: usize, value: impl Into<Value>) -> Option<Value> {
        let slot = self.args.get_mut(index)?;
        Some(std::mem::replace(slot, value.into()))
    }

    /// All method calls in this tree, depth-first, starting with `self`.
    pub fn methods(&self) -> Methods<'_> {
        Methods { stack: vec![self] }
    }

    /// Method calls in this tree whose canonical name matches `name`, in any case.
    pub fn find_calls(&self, name: &str) -> Vec<&Method> {
        let canonical = name.to_uppercase();
        self.methods()
            .filter(|m| m.canonical_name == canonical)
            .collect()
    }

    /// Emit this call as LispIsh text, indented to `level`.
    ///
    /// No arguments: `(name)`.
    /// One argument: on one line, `(name arg)`, however long the argument is.
    /// More: `(name` on the first line, then each argument on its own line one level deeper,
    /// with the closing paren after the last argument.
    ///
    /// Recurses once per nesting level. Trees from [`crate::parse`] are bounded by
    /// [`crate::MAX_DEPTH`]; trees built by hand are not.
    pub fn emit(&self, level: usize) -> String {
        let prefix = indent(level);
        match self.args.as_slice() {
            [] => format!("{}({})", prefix, self.name),
            [only] => format!("{}({} {})", prefix, self.name, only.emit(level).trim_start()),
            [init @ .., last] => {
                let mut lines = Vec::with_capacity(self.args.len() + 1);
                lines.push(format!("{}({}", prefix, self.name));
                lines.extend(init.iter().map(|arg| arg.emit(level + 1)));
                lines.push(format!("{})", last.emit(level + 1)));
                lines.join("\n")
            }
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.emit(0))
    }
}

/// Depth-first iterator over the method calls in a tree.
pub struct Methods<'a> {
    stack: Vec<&'a Method>,
}

impl<'a> Iterator for Methods<'a> {
    type Item = &'a Method;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        // Reversed, so the first argument is visited first.
        self.stack
            .extend(next.args.iter().rev().filter_map(Value::as_method));
        Some(next)
    }
}
