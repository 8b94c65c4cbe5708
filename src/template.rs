//! Processor for [RFC 6570] URI Templates (Level 4), with a deep-object
//! extension.
//!
//! [RFC 6570]: https://www.rfc-editor.org/rfc/rfc6570.html
//!
//! # Usage
//!
//! 1. Parse a template with [`parse_uri_template`] (or build one from
//!    parts).
//! 2. Bind variables: insert values into a [`Context`], or implement
//!    [`Bindings`] to compute them on demand.
//! 3. Expand with [`UriTemplate::expand`]. Expansion of a parsed template
//!    is total; absent variables simply disappear from the output.
//!
//! # Examples
//!
//! ```
//! use uri_kit::{parse_uri_template, Context, Value};
//!
//! let mut context = Context::new();
//! context.insert("username", "foo");
//! // U+2713 CHECK MARK
//! context.insert("mark", "\u{2713}");
//! context.insert("list", Value::list(["red", "green", "blue"]));
//!
//! let template = parse_uri_template("/users/{username}{/list*}{?mark}")?;
//! assert_eq!(
//!     template.expand(&context),
//!     "/users/foo/red/green/blue?mark=%E2%9C%93"
//! );
//! # Ok::<_, uri_kit::UriTemplateError>(())
//! ```

mod error;
mod expand;
mod model;
mod parser;
mod value;

use std::collections::{BTreeMap, HashMap};

pub use self::error::{UriTemplateError, UriTemplateErrorKind};
pub use self::model::{CoerceFn, Expression, Operator, TemplatePart, UriTemplate, Variable};
pub use self::parser::{
    parse_uri_expression, parse_uri_template, parse_uri_variable, try_parse_uri_expression,
    try_parse_uri_template, try_parse_uri_variable,
};
pub use self::value::Value;

/// A source of variable values for expansion.
///
/// Implemented by [`Context`], by plain maps of values, and by lookup
/// functions wrapped in [`FnBindings`].
pub trait Bindings {
    /// Looks up the value bound to `name`.
    ///
    /// Returning `None` (or [`Value::Null`]) marks the variable absent.
    fn get(&self, name: &str) -> Option<Value>;
}

/// Template expansion context: a name-to-value map.
///
/// # Examples
///
/// ```
/// use uri_kit::{parse_uri_template, Context};
///
/// let mut context = Context::new();
/// context.insert("username", "foo");
///
/// let template = parse_uri_template("/users/{username}")?;
/// assert_eq!(template.expand(&context), "/users/foo");
/// # Ok::<_, uri_kit::UriTemplateError>(())
/// ```
#[derive(Default, Debug, Clone)]
pub struct Context {
    /// Variable values.
    variables: BTreeMap<String, Value>,
}

impl Context {
    /// Creates a new empty context.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a variable, returning the previous value if any.
    ///
    /// Passing [`Value::Null`] removes the entry; a null binding and a
    /// missing one are indistinguishable to expansion.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::{parse_uri_template, Context, Value};
    ///
    /// let mut context = Context::new();
    /// context.insert("username", "foo");
    /// context.insert("username", Value::Null);
    ///
    /// let template = parse_uri_template("/users/{username}")?;
    /// assert_eq!(template.expand(&context), "/users/");
    /// # Ok::<_, uri_kit::UriTemplateError>(())
    /// ```
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let key = key.into();
        match value.into() {
            Value::Null => self.variables.remove(&key),
            value => self.variables.insert(key, value),
        }
    }

    /// Removes a variable, returning its value if it was bound.
    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.variables.remove(key)
    }

    /// Removes all entries.
    #[inline]
    pub fn clear(&mut self) {
        self.variables.clear();
    }

    /// Returns a reference to the value bound to `key`.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.variables.get(key)
    }
}

impl Bindings for Context {
    #[inline]
    fn get(&self, name: &str) -> Option<Value> {
        self.variables.get(name).cloned()
    }
}

impl Bindings for BTreeMap<String, Value> {
    #[inline]
    fn get(&self, name: &str) -> Option<Value> {
        BTreeMap::get(self, name).cloned()
    }
}

impl Bindings for HashMap<String, Value> {
    #[inline]
    fn get(&self, name: &str) -> Option<Value> {
        HashMap::get(self, name).cloned()
    }
}

/// Adapter implementing [`Bindings`] for a lookup function.
///
/// # Examples
///
/// ```
/// use uri_kit::{parse_uri_template, FnBindings, Value};
///
/// let bindings = FnBindings(|name: &str| Some(Value::from(name.to_uppercase())));
/// let template = parse_uri_template("{var}")?;
/// assert_eq!(template.expand(&bindings), "VAR");
/// # Ok::<_, uri_kit::UriTemplateError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnBindings<F>(pub F);

impl<F: Fn(&str) -> Option<Value>> Bindings for FnBindings<F> {
    #[inline]
    fn get(&self, name: &str) -> Option<Value> {
        (self.0)(name)
    }
}

/// A template argument: an already-parsed template or a raw string.
#[derive(Debug, Clone, Copy)]
pub enum TemplateOrStr<'a> {
    /// An already-parsed template.
    Parsed(&'a UriTemplate),
    /// A string yet to be parsed.
    Raw(&'a str),
}

impl<'a> From<&'a UriTemplate> for TemplateOrStr<'a> {
    #[inline]
    fn from(template: &'a UriTemplate) -> Self {
        Self::Parsed(template)
    }
}

impl<'a> From<&'a str> for TemplateOrStr<'a> {
    #[inline]
    fn from(s: &'a str) -> Self {
        Self::Raw(s)
    }
}

impl<'a> From<&'a String> for TemplateOrStr<'a> {
    #[inline]
    fn from(s: &'a String) -> Self {
        Self::Raw(s)
    }
}

/// Expands a template against the given bindings.
///
/// Accepts a parsed [`UriTemplate`] or a template string; the only possible
/// error is a parse failure of a string argument.
///
/// # Examples
///
/// ```
/// use uri_kit::{expand_uri_template, Context};
///
/// let mut context = Context::new();
/// context.insert("q", "cat pictures");
/// assert_eq!(
///     expand_uri_template("/search{?q}", &context)?,
///     "/search?q=cat%20pictures"
/// );
/// # Ok::<_, uri_kit::UriTemplateError>(())
/// ```
pub fn expand_uri_template<'a, T, B>(template: T, bindings: &B) -> Result<String, UriTemplateError>
where
    T: Into<TemplateOrStr<'a>>,
    B: Bindings,
{
    match template.into() {
        TemplateOrStr::Parsed(template) => Ok(template.expand(bindings)),
        TemplateOrStr::Raw(s) => Ok(parse_uri_template(s)?.expand(bindings)),
    }
}

/// Expands a single expression against the given bindings.
#[inline]
#[must_use]
pub fn expand_uri_expression<B: Bindings>(expression: &Expression, bindings: &B) -> String {
    expression.expand(bindings)
}

/// Expands a single variable against a value.
///
/// Returns `None` when the value is absent.
#[inline]
#[must_use]
pub fn expand_uri_variable(variable: &Variable, value: &Value) -> Option<String> {
    variable.expand(value)
}

/// Returns the variables of all expressions in the template, in order.
#[must_use]
pub fn get_uri_template_variables(template: &UriTemplate) -> Vec<&Variable> {
    template.variables().collect()
}

/// Formats a template back to its canonical string form.
#[inline]
#[must_use]
pub fn format_uri_template(template: &UriTemplate) -> String {
    template.to_string()
}

/// Formats an expression back to its `{...}` form.
#[inline]
#[must_use]
pub fn format_uri_expression(expression: &Expression) -> String {
    expression.to_string()
}

/// Formats a variable specifier back to its `name`, `name*`, or `name:n`
/// form.
#[inline]
#[must_use]
pub fn format_uri_variable(variable: &Variable) -> String {
    variable.to_string()
}
