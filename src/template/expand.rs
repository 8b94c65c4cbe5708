//! The template expansion engine.
//!
//! Expansion walks the template parts in order, copying literals and
//! expanding each expression against the supplied bindings. Absent values
//! (unbound names, [`Value::Null`], empty composites) are skipped silently;
//! an expression whose variables are all absent emits nothing, not even its
//! prefix.

use core::mem;

use crate::chars::CharSet;
use crate::percent::PctEncoded;
use crate::template::model::{Expression, TemplatePart, UriTemplate, Variable};
use crate::template::{Bindings, Value};

/// Expands a whole template.
pub(crate) fn expand_template<B: Bindings>(template: &UriTemplate, bindings: &B) -> String {
    let mut out = String::new();
    for part in template.parts() {
        match part {
            TemplatePart::Literal(literal) => out.push_str(literal),
            TemplatePart::Expression(expression) => {
                expand_expression_into(&mut out, expression, bindings);
            }
        }
    }
    out
}

/// Expands one expression, appending to `out`.
pub(crate) fn expand_expression_into<B: Bindings>(
    out: &mut String,
    expression: &Expression,
    bindings: &B,
) {
    let mut is_first = true;
    for variable in expression.variables() {
        let value = match bindings.get(variable.name()) {
            Some(value) if !value.is_null() => value,
            _ => continue,
        };
        if let Some(expanded) = expand_variable(variable, &value) {
            out.push_str(if mem::replace(&mut is_first, false) {
                expression.first
            } else {
                expression.separator
            });
            out.push_str(&expanded);
        }
    }
}

/// Expands one variable against one value.
///
/// Dispatches on the value shape: scalars take string expansion, composites
/// take joined or (with `*`) exploded expansion.
pub(crate) fn expand_variable(variable: &Variable, value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(_) => expand_string(variable, value),
        Value::List(_) | Value::Assoc(_) if !variable.explode => expand_joined(variable, value),
        Value::List(_) | Value::Assoc(_) => expand_exploded(variable, value),
    }
}

/// Applies the variable's coercion hook, or the default.
fn coerce(variable: &Variable, value: &Value) -> Option<String> {
    match variable.coerce {
        Some(hook) => hook(value),
        None => value.coerce_default(),
    }
}

/// Percent-encodes an expansion chunk against the variable's allowed set.
///
/// The reserved set passes pre-encoded triplets through unchanged.
fn encode(s: &str, allow: CharSet) -> String {
    if allow == CharSet::Reserved {
        PctEncoded::keeping_triplets(s, allow).to_string()
    } else {
        PctEncoded::new(s, allow).to_string()
    }
}

/// Truncates to the first `max_length` Unicode scalar values.
fn prefix(s: &str, max_length: Option<u16>) -> &str {
    match max_length {
        Some(n) => match s.char_indices().nth(usize::from(n)) {
            Some((pos, _)) => &s[..pos],
            None => s,
        },
        None => s,
    }
}

/// String expansion of a scalar value.
fn expand_string(variable: &Variable, value: &Value) -> Option<String> {
    let s = coerce(variable, value)?;
    if variable.named {
        if s.is_empty() {
            return Some(format!("{}{}", variable.name, variable.empty));
        }
        return Some(format!(
            "{}={}",
            variable.name,
            encode(prefix(&s, variable.max_length), variable.allow)
        ));
    }
    Some(encode(prefix(&s, variable.max_length), variable.allow))
}

/// Joined expansion of a composite value (no `*` modifier).
fn expand_joined(variable: &Variable, value: &Value) -> Option<String> {
    let mut body = String::new();
    let mut any = false;
    match value {
        Value::List(items) => {
            for item in items {
                let Some(s) = coerce(variable, item) else {
                    continue;
                };
                if mem::replace(&mut any, true) {
                    body.push_str(variable.composite_separator);
                }
                body.push_str(&encode(&s, variable.allow));
            }
        }
        Value::Assoc(pairs) => {
            for (key, item) in pairs {
                let Some(s) = coerce(variable, item) else {
                    continue;
                };
                if mem::replace(&mut any, true) {
                    body.push_str(variable.composite_separator);
                }
                body.push_str(&encode(key, variable.allow));
                body.push_str(variable.composite_separator);
                body.push_str(&encode(&s, variable.allow));
            }
        }
        Value::Null | Value::String(_) => {
            unreachable!("joined expansion is only reached for composites")
        }
    }
    if !any {
        return None;
    }
    if variable.named {
        return Some(format!("{}={}", variable.name, body));
    }
    Some(body)
}

/// Exploded expansion of a composite value (`*` modifier).
fn expand_exploded(variable: &Variable, value: &Value) -> Option<String> {
    if variable.deep_object {
        if let Value::Assoc(pairs) = value {
            return expand_deep_object(variable, pairs);
        }
    }
    let mut body = String::new();
    let mut any = false;
    match value {
        Value::List(items) => {
            for item in items {
                let Some(s) = coerce(variable, item) else {
                    continue;
                };
                if mem::replace(&mut any, true) {
                    body.push_str(variable.separator);
                }
                if variable.named {
                    body.push_str(&variable.name);
                    if s.is_empty() {
                        body.push_str(variable.empty);
                    } else {
                        body.push('=');
                        body.push_str(&encode(&s, variable.allow));
                    }
                } else {
                    body.push_str(&encode(&s, variable.allow));
                }
            }
        }
        Value::Assoc(pairs) => {
            for (key, item) in pairs {
                let Some(s) = coerce(variable, item) else {
                    continue;
                };
                if mem::replace(&mut any, true) {
                    body.push_str(variable.separator);
                }
                body.push_str(&encode(key, variable.allow));
                if variable.named && s.is_empty() {
                    body.push_str(variable.empty);
                } else {
                    body.push('=');
                    body.push_str(&encode(&s, variable.allow));
                }
            }
        }
        Value::Null | Value::String(_) => {
            unreachable!("exploded expansion is only reached for composites")
        }
    }
    if any {
        Some(body)
    } else {
        None
    }
}

/// Deep-object expansion: flattens nested associative values into
/// `name[k1][k2]=value` items.
fn expand_deep_object(variable: &Variable, pairs: &[(String, Value)]) -> Option<String> {
    let mut items = Vec::new();
    for (key, value) in pairs {
        let path = format!("{}[{}]", variable.name, encode(key, variable.allow));
        collect_deep(variable, &path, value, &mut items);
    }
    if items.is_empty() {
        return None;
    }
    Some(items.join(variable.separator))
}

/// Depth-first walk collecting `path=value` leaves.
fn collect_deep(variable: &Variable, path: &str, value: &Value, items: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::Assoc(pairs) => {
            for (key, value) in pairs {
                let path = format!("{path}[{}]", encode(key, variable.allow));
                collect_deep(variable, &path, value, items);
            }
        }
        other => {
            if let Some(s) = coerce(variable, other) {
                items.push(format!("{path}={}", encode(&s, variable.allow)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::parser::parse_uri_template;
    use crate::template::Context;

    fn ctx() -> Context {
        let mut context = Context::new();
        context.insert("var", "value");
        context.insert("hello", "Hello World!");
        context.insert("half", "50%");
        context.insert("empty", "");
        context.insert("path", "/foo/bar");
        context.insert("list", Value::list(["red", "green", "blue"]));
        context.insert(
            "keys",
            Value::assoc([("semi", ";"), ("dot", "."), ("comma", ",")]),
        );
        context
    }

    fn expand(template: &str) -> String {
        parse_uri_template(template).unwrap().expand(&ctx())
    }

    #[test]
    fn string_expansion() {
        assert_eq!(expand("{var}"), "value");
        assert_eq!(expand("{hello}"), "Hello%20World%21");
        assert_eq!(expand("{half}"), "50%25");
        assert_eq!(expand("{+hello}"), "Hello%20World!");
        assert_eq!(expand("{#hello}"), "#Hello%20World!");
        assert_eq!(expand("{var,hello}"), "value,Hello%20World%21");
    }

    #[test]
    fn absent_values_are_skipped() {
        assert_eq!(expand("{undef}"), "");
        assert_eq!(expand("{?undef}"), "");
        assert_eq!(expand("{var,undef,hello}"), "value,Hello%20World%21");
        assert_eq!(expand("{?undef,var}"), "?var=value");
        // An empty list is as absent as an unbound name.
        let mut context = ctx();
        context.insert("nil", Value::List(Vec::new()));
        let template = parse_uri_template("{?nil}").unwrap();
        assert_eq!(template.expand(&context), "");
    }

    #[test]
    fn named_empty_values() {
        assert_eq!(expand("{?empty}"), "?empty=");
        assert_eq!(expand("{;empty}"), ";empty");
        assert_eq!(expand("{&empty}"), "&empty=");
    }

    #[test]
    fn prefix_modifiers() {
        assert_eq!(expand("{var:3}"), "val");
        assert_eq!(expand("{var:30}"), "value");
        assert_eq!(expand("{+path:6}/here"), "/foo/b/here");
        assert_eq!(expand("{semi:2}"), "");
    }

    #[test]
    fn prefix_counts_scalars_not_bytes() {
        let mut context = Context::new();
        // Two two-byte characters and an astral one.
        context.insert("s", "\u{E9}\u{E8}\u{10300}x");
        let template = parse_uri_template("{s:3}").unwrap();
        assert_eq!(template.expand(&context), "%C3%A9%C3%A8%F0%90%8C%80");
    }

    #[test]
    fn composite_joined() {
        assert_eq!(expand("{list}"), "red,green,blue");
        assert_eq!(expand("{/list}"), "/red,green,blue");
        assert_eq!(expand("{?list}"), "?list=red,green,blue");
        assert_eq!(expand("{keys}"), "semi,%3B,dot,.,comma,%2C");
        assert_eq!(expand("{?keys}"), "?keys=semi,%3B,dot,.,comma,%2C");
        assert_eq!(expand("{+keys}"), "semi,;,dot,.,comma,,");
    }

    #[test]
    fn composite_exploded() {
        assert_eq!(expand("{/list*}"), "/red/green/blue");
        assert_eq!(expand("{.list*}"), ".red.green.blue");
        assert_eq!(expand("{?keys*}"), "?semi=%3B&dot=.&comma=%2C");
        assert_eq!(expand("{;keys*}"), ";semi=%3B;dot=.;comma=%2C");
        assert_eq!(expand("{keys*}"), "semi=%3B,dot=.,comma=%2C");

        let mut context = Context::new();
        context.insert("count", Value::list(["one", "two", "three"]));
        let template = parse_uri_template("{;count*}").unwrap();
        assert_eq!(template.expand(&context), ";count=one;count=two;count=three");
    }

    #[test]
    fn named_array_explode_empty_item() {
        let mut context = Context::new();
        context.insert("list", Value::list(["a", "", "b"]));
        let template = parse_uri_template("{;list*}").unwrap();
        assert_eq!(template.expand(&context), ";list=a;list;list=b");
        let template = parse_uri_template("{?list*}").unwrap();
        assert_eq!(template.expand(&context), "?list=a&list=&list=b");
    }

    #[test]
    fn deep_object_expansion() {
        let mut context = Context::new();
        context.insert(
            "filter",
            Value::assoc([
                ("name", Value::from("fred")),
                (
                    "address",
                    Value::assoc([("city", "Camelot"), ("zip", "12 345")]),
                ),
            ]),
        );
        let variable = Variable::for_operator("filter", crate::template::Operator::FormQuery)
            .unwrap()
            .with_explode()
            .with_deep_object();
        let expression =
            crate::template::Expression::new(crate::template::Operator::FormQuery, vec![variable]);
        assert_eq!(
            expression.expand(&context),
            "?filter[name]=fred&filter[address][city]=Camelot&filter[address][zip]=12%20345"
        );
    }

    #[test]
    fn custom_coercion_hook() {
        let mut context = Context::new();
        context.insert("flag", Value::list(["ignored"]));
        let variable = crate::template::Variable::new("flag")
            .unwrap()
            .with_coerce(|_| Some("fixed".into()));
        assert_eq!(variable.expand(&Value::from("x")), Some("fixed".into()));
        // A hook returning `None` marks the value absent.
        let silent = crate::template::Variable::new("flag")
            .unwrap()
            .with_coerce(|_| None);
        assert_eq!(silent.expand(&Value::from("x")), None);
    }

    #[test]
    fn json_default_coercion_of_nested_values() {
        let mut context = Context::new();
        context.insert(
            "mixed",
            Value::List(vec![Value::from("a"), Value::list(["b", "c"])]),
        );
        let template = parse_uri_template("{mixed}").unwrap();
        assert_eq!(template.expand(&context), "a,%5B%22b%22%2C%22c%22%5D");
    }
}
