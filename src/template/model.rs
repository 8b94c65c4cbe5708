//! The template model: templates, expressions, and variable specifiers.

use core::fmt;
use core::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::chars::CharSet;
use crate::template::error::UriTemplateError;
use crate::template::expand::{expand_expression_into, expand_template, expand_variable};
use crate::template::parser::{parse_uri_template, validate_varname};
use crate::template::{Bindings, Value};

/// A value-to-string coercion hook.
///
/// Returning `None` marks the value absent, exactly like [`Value::Null`].
pub type CoerceFn = fn(&Value) -> Option<String>;

/// An expression operator.
///
/// See [RFC 6570 Appendix A](https://www.rfc-editor.org/rfc/rfc6570#appendix-A).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    /// No operator. String expansion.
    #[default]
    String,
    /// Reserved expansion by `+`.
    Reserved,
    /// Fragment expansion by `#`.
    Fragment,
    /// Label expansion by `.`.
    Label,
    /// Path segments by `/`.
    PathSegments,
    /// Path-style parameters by `;`.
    PathParams,
    /// Form-style query by `?`.
    FormQuery,
    /// Form-style query continuation by `&`.
    FormQueryCont,
}

/// Per-operator expansion defaults.
struct OpProps {
    /// Prefix for the first emitted variable.
    first: &'static str,
    /// Separator between emitted variables.
    sep: &'static str,
    /// Whether the expansion includes the variable or key name.
    named: bool,
    /// Substitution when a named value is empty.
    ifemp: &'static str,
    /// Characters written without being encoded.
    allow: CharSet,
}

impl Operator {
    /// Properties for all known operators, indexed by discriminant.
    const PROPS: [OpProps; 8] = [
        // String
        OpProps {
            first: "",
            sep: ",",
            named: false,
            ifemp: "",
            allow: CharSet::Unreserved,
        },
        // Reserved
        OpProps {
            first: "",
            sep: ",",
            named: false,
            ifemp: "",
            allow: CharSet::Reserved,
        },
        // Fragment
        OpProps {
            first: "#",
            sep: ",",
            named: false,
            ifemp: "",
            allow: CharSet::Reserved,
        },
        // Label
        OpProps {
            first: ".",
            sep: ".",
            named: false,
            ifemp: "",
            allow: CharSet::Unreserved,
        },
        // PathSegments
        OpProps {
            first: "/",
            sep: "/",
            named: false,
            ifemp: "",
            allow: CharSet::Unreserved,
        },
        // PathParams
        OpProps {
            first: ";",
            sep: ";",
            named: true,
            ifemp: "",
            allow: CharSet::Unreserved,
        },
        // FormQuery
        OpProps {
            first: "?",
            sep: "&",
            named: true,
            ifemp: "=",
            allow: CharSet::Unreserved,
        },
        // FormQueryCont
        OpProps {
            first: "&",
            sep: "&",
            named: true,
            ifemp: "=",
            allow: CharSet::Unreserved,
        },
    ];

    /// Returns the defaults for this operator.
    fn props(self) -> &'static OpProps {
        let index = match self {
            Self::String => 0,
            Self::Reserved => 1,
            Self::Fragment => 2,
            Self::Label => 3,
            Self::PathSegments => 4,
            Self::PathParams => 5,
            Self::FormQuery => 6,
            Self::FormQueryCont => 7,
        };
        &Self::PROPS[index]
    }

    /// Returns the working operator for the given byte.
    #[must_use]
    pub(crate) fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'+' => Some(Self::Reserved),
            b'#' => Some(Self::Fragment),
            b'.' => Some(Self::Label),
            b'/' => Some(Self::PathSegments),
            b';' => Some(Self::PathParams),
            b'?' => Some(Self::FormQuery),
            b'&' => Some(Self::FormQueryCont),
            _ => None,
        }
    }

    /// Returns `true` for an operator character reserved for future
    /// extensions.
    #[must_use]
    pub(crate) fn is_reserved_byte(b: u8) -> bool {
        matches!(b, b'=' | b',' | b'!' | b'@' | b'|')
    }

    /// Returns the operator's character as written in a template.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::String => "",
            Self::Reserved => "+",
            Self::Fragment => "#",
            Self::Label => ".",
            Self::PathSegments => "/",
            Self::PathParams => ";",
            Self::FormQuery => "?",
            Self::FormQueryCont => "&",
        }
    }

    /// Returns the prefix emitted before the first expanded variable.
    #[inline]
    #[must_use]
    pub fn first(self) -> &'static str {
        self.props().first
    }

    /// Returns the separator emitted between expanded variables.
    #[inline]
    #[must_use]
    pub fn separator(self) -> &'static str {
        self.props().sep
    }

    /// Returns whether expansions carry the variable or key name.
    #[inline]
    #[must_use]
    pub fn is_named(self) -> bool {
        self.props().named
    }

    /// Returns the substitution for empty named values.
    #[inline]
    #[must_use]
    pub fn empty(self) -> &'static str {
        self.props().ifemp
    }

    /// Returns the set of characters the expansion writes verbatim.
    #[inline]
    #[must_use]
    pub fn allow(self) -> CharSet {
        self.props().allow
    }
}

/// A variable specifier inside an expression.
///
/// The per-variable expansion settings (separator, named flag, empty
/// substitution, allowed set) are fixed by the owning expression's operator
/// when parsed, and can be configured freely when built programmatically.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Variable name.
    pub(crate) name: String,
    /// Separator between exploded items.
    pub(crate) separator: &'static str,
    /// Separator inside a non-exploded composite expansion.
    pub(crate) composite_separator: &'static str,
    /// Whether expansions carry the variable or key name.
    pub(crate) named: bool,
    /// Substitution for empty named values.
    pub(crate) empty: &'static str,
    /// Characters written without being encoded.
    pub(crate) allow: CharSet,
    /// Prefix length limit; `None` is unlimited.
    pub(crate) max_length: Option<u16>,
    /// Whether the `*` modifier is present.
    pub(crate) explode: bool,
    /// Whether nested associative values flatten to `name[k1][k2]=v` form.
    pub(crate) deep_object: bool,
    /// Value-to-string coercion hook.
    pub(crate) coerce: Option<CoerceFn>,
}

impl Variable {
    /// Creates a variable with the defaults of simple string expansion.
    ///
    /// The name must match `varchar *( ["."] varchar )` where `varchar` is
    /// `ALPHA / DIGIT / "_" / pct-encoded`.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::Variable;
    ///
    /// let var = Variable::new("hello")?;
    /// assert_eq!(var.name(), "hello");
    /// assert!(Variable::new("he llo").is_err());
    /// # Ok::<_, uri_kit::UriTemplateError>(())
    /// ```
    pub fn new(name: &str) -> Result<Self, UriTemplateError> {
        Self::for_operator(name, Operator::String)
    }

    /// Creates a variable with the given operator's defaults.
    pub fn for_operator(name: &str, operator: Operator) -> Result<Self, UriTemplateError> {
        validate_varname(name)?;
        Ok(Self::with_operator_defaults(name, operator))
    }

    /// Creates a variable from a name already known to be valid.
    pub(crate) fn with_operator_defaults(name: &str, operator: Operator) -> Self {
        let props = operator.props();
        Self {
            name: name.into(),
            separator: props.sep,
            composite_separator: ",",
            named: props.named,
            empty: props.ifemp,
            allow: props.allow,
            max_length: None,
            explode: false,
            deep_object: false,
            coerce: None,
        }
    }

    /// Returns the variable name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the separator between exploded items.
    #[inline]
    #[must_use]
    pub fn separator(&self) -> &str {
        self.separator
    }

    /// Returns the separator inside a non-exploded composite expansion.
    #[inline]
    #[must_use]
    pub fn composite_separator(&self) -> &str {
        self.composite_separator
    }

    /// Returns whether expansions carry the variable or key name.
    #[inline]
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.named
    }

    /// Returns the substitution for empty named values.
    #[inline]
    #[must_use]
    pub fn empty(&self) -> &str {
        self.empty
    }

    /// Returns the set of characters written without being encoded.
    #[inline]
    #[must_use]
    pub fn allow(&self) -> CharSet {
        self.allow
    }

    /// Returns the prefix length limit, if any.
    #[inline]
    #[must_use]
    pub fn max_length(&self) -> Option<u16> {
        self.max_length
    }

    /// Returns whether the `*` modifier is present.
    #[inline]
    #[must_use]
    pub fn is_explode(&self) -> bool {
        self.explode
    }

    /// Returns whether deep-object expansion is enabled.
    #[inline]
    #[must_use]
    pub fn is_deep_object(&self) -> bool {
        self.deep_object
    }

    /// Enables the explode (`*`) modifier.
    #[must_use]
    pub fn with_explode(mut self) -> Self {
        self.explode = true;
        self
    }

    /// Sets the prefix length limit (`:n` modifier), `1..=9999`.
    #[must_use]
    pub fn with_max_length(mut self, max_length: u16) -> Self {
        debug_assert!((1..10000).contains(&max_length));
        self.max_length = Some(max_length);
        self
    }

    /// Enables deep-object expansion of nested associative values.
    ///
    /// This is an extension over RFC 6570: the template syntax cannot
    /// express it, it only applies to programmatically built variables.
    #[must_use]
    pub fn with_deep_object(mut self) -> Self {
        self.deep_object = true;
        self
    }

    /// Installs a value-to-string coercion hook replacing the default
    /// (strings pass through, other values render as JSON).
    #[must_use]
    pub fn with_coerce(mut self, coerce: CoerceFn) -> Self {
        self.coerce = Some(coerce);
        self
    }

    /// Expands this variable against a single value.
    ///
    /// Returns `None` when the value (or every element of it) is absent;
    /// the owning expression then skips the variable entirely.
    #[must_use]
    pub fn expand(&self, value: &Value) -> Option<String> {
        expand_variable(self, value)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.explode {
            f.write_str("*")?;
        } else if let Some(max_length) = self.max_length {
            write!(f, ":{max_length}")?;
        }
        Ok(())
    }
}

/// An expression: an operator plus a non-empty variable list.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// Operator.
    pub(crate) operator: Operator,
    /// Variable list.
    pub(crate) variables: Vec<Variable>,
    /// Prefix emitted before the first expanded variable.
    pub(crate) first: &'static str,
    /// Separator emitted between expanded variables.
    pub(crate) separator: &'static str,
}

impl Expression {
    /// Creates an expression from an operator and its variables.
    ///
    /// The expression-level `first` and `separator` strings come from the
    /// operator; the variables are taken as given.
    #[must_use]
    pub fn new(operator: Operator, variables: Vec<Variable>) -> Self {
        Self {
            operator,
            variables,
            first: operator.first(),
            separator: operator.separator(),
        }
    }

    /// Returns the operator.
    #[inline]
    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the variable list.
    #[inline]
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Returns the prefix emitted before the first expanded variable.
    #[inline]
    #[must_use]
    pub fn first(&self) -> &str {
        self.first
    }

    /// Returns the separator emitted between expanded variables.
    #[inline]
    #[must_use]
    pub fn separator(&self) -> &str {
        self.separator
    }

    /// Expands this expression against the given bindings.
    ///
    /// Absent variables are skipped; if nothing is emitted the result is
    /// empty (no prefix).
    #[must_use]
    pub fn expand<B: Bindings>(&self, bindings: &B) -> String {
        let mut out = String::new();
        expand_expression_into(&mut out, self, bindings);
        out
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        f.write_str(self.operator.symbol())?;
        let mut following = false;
        for variable in &self.variables {
            if following {
                f.write_str(",")?;
            }
            following = true;
            write!(f, "{variable}")?;
        }
        f.write_str("}")
    }
}

/// One part of a template: a literal or an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// A literal chunk, written to the expansion verbatim.
    ///
    /// The template parser percent-encodes literal characters that are not
    /// URI-safe, so parsed literals are always ASCII.
    Literal(String),
    /// A `{...}` expression.
    Expression(Expression),
}

/// A parsed URI template: an ordered sequence of literals and expressions.
///
/// # Examples
///
/// ```
/// use uri_kit::{parse_uri_template, Context};
///
/// let template = parse_uri_template("/users/{username}{?lang}")?;
/// let mut context = Context::new();
/// context.insert("username", "foo");
/// context.insert("lang", "en");
/// assert_eq!(template.expand(&context), "/users/foo?lang=en");
/// # Ok::<_, uri_kit::UriTemplateError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UriTemplate {
    /// Ordered template parts.
    pub(crate) parts: Vec<TemplatePart>,
}

impl UriTemplate {
    /// Creates a template from parts.
    #[must_use]
    pub fn new(parts: Vec<TemplatePart>) -> Self {
        Self { parts }
    }

    /// Returns the template parts.
    #[inline]
    #[must_use]
    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    /// Returns the variables of all expressions, in template order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                TemplatePart::Expression(expr) => Some(expr.variables()),
                TemplatePart::Literal(_) => None,
            })
            .flatten()
    }

    /// Expands the template against the given bindings.
    ///
    /// Expansion of a parsed template is total: absent variables are
    /// silently omitted and the result is a plain string.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::{parse_uri_template, Context};
    ///
    /// let template = parse_uri_template("{var}")?;
    /// assert_eq!(template.expand(&Context::new()), "");
    /// # Ok::<_, uri_kit::UriTemplateError>(())
    /// ```
    #[must_use]
    pub fn expand<B: Bindings>(&self, bindings: &B) -> String {
        expand_template(self, bindings)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part {
                TemplatePart::Literal(literal) => f.write_str(literal)?,
                TemplatePart::Expression(expression) => write!(f, "{expression}")?,
            }
        }
        Ok(())
    }
}

impl FromStr for UriTemplate {
    type Err = UriTemplateError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_uri_template(s)
    }
}

impl TryFrom<&str> for UriTemplate {
    type Error = UriTemplateError;

    #[inline]
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        parse_uri_template(s)
    }
}

impl Serialize for UriTemplate {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UriTemplate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        /// Visitor that parses the string as a template.
        struct TemplateVisitor;

        impl Visitor<'_> for TemplateVisitor {
            type Value = UriTemplate;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a URI template string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                parse_uri_template(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(TemplateVisitor)
    }
}
