//! Recursive `${...}` placeholder substitution.
//!
//! Handles arbitrarily many placeholders per string, and placeholders whose
//! replacement value itself contains another placeholder (mutually
//! recursive properties), iterating to a fixed point instead of doing a
//! single pass.

/// Recursion/pass bound so a pathological lookup (e.g. `a` expands to
/// `${a}`) cannot spin forever. Chosen generously above any realistic POM
/// property-inheritance depth.
const MAX_PASSES: usize = 16;

/// `true` if `text` contains an (possibly unresolved) placeholder marker.
/// Used by callers to detect "still has `${` after evaluation" per the
/// coordinate-purity invariant.
pub fn contains_placeholder(text: &str) -> bool {
    text.contains("${")
}

/// Replace every `${key}` in `text` with `lookup(key)`, repeating until a
/// fixed point or [`MAX_PASSES`] is reached. A placeholder whose key misses
/// the lookup is left textually intact (`${key}`) rather than erased. Never
/// panics or returns an error; callers detect leftover placeholders by
/// calling [`contains_placeholder`] on the result.
pub fn evaluate<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if !contains_placeholder(text) {
        return text.to_owned();
    }

    let mut current = text.to_owned();
    for _ in 0..MAX_PASSES {
        let (next, changed) = substitute_once(&current, &lookup);
        if !changed {
            return next;
        }
        current = next;
    }
    current
}

/// One left-to-right pass substituting every placeholder it can resolve.
/// Returns the new string and whether anything actually changed, so the
/// caller can detect a fixed point.
fn substitute_once<F>(text: &str, lookup: &F) -> (String, bool)
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut changed = false;
    let mut rest = text;

    loop {
        match rest.find("${") {
            None => {
                out.push_str(rest);
                break;
            }
            Some(start) => {
                out.push_str(&rest[..start]);
                let after_marker = &rest[start + 2..];
                match after_marker.find('}') {
                    None => {
                        // Unterminated placeholder: leave the rest intact.
                        out.push_str(&rest[start..]);
                        break;
                    }
                    Some(end) => {
                        let key = &after_marker[..end];
                        match lookup(key) {
                            Some(value) => {
                                out.push_str(&value);
                                changed = true;
                            }
                            None => {
                                out.push_str("${");
                                out.push_str(key);
                                out.push('}');
                            }
                        }
                        rest = &after_marker[end + 1..];
                    }
                }
            }
        }
    }

    (out, changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(map: &HashMap<&str, &str>) -> impl Fn(&str) -> Option<String> + '_ {
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn leaves_plain_text_untouched() {
        assert_eq!(evaluate("1.2.3", |_| None), "1.2.3");
    }

    #[test]
    fn substitutes_a_single_placeholder() {
        let map = HashMap::from([("foo", "bar")]);
        assert_eq!(evaluate("${foo}", lookup_from(&map)), "bar");
    }

    #[test]
    fn substitutes_multiple_placeholders_in_one_string() {
        let map = HashMap::from([("foo", "child"), ("bar", "parent")]);
        assert_eq!(evaluate("${foo}-${bar}", lookup_from(&map)), "child-parent");
    }

    #[test]
    fn leaves_unresolvable_placeholder_intact() {
        assert_eq!(evaluate("${missing}", |_| None), "${missing}");
    }

    #[test]
    fn resolves_mutually_recursive_properties_to_a_fixed_point() {
        let map = HashMap::from([("a", "${b}"), ("b", "final")]);
        assert_eq!(evaluate("${a}", lookup_from(&map)), "final");
    }

    #[test]
    fn does_not_loop_forever_on_a_self_referential_property() {
        let map = HashMap::from([("a", "${a}")]);
        // Should terminate (bounded passes) and leave the marker intact.
        assert_eq!(evaluate("${a}", lookup_from(&map)), "${a}");
    }

    #[test]
    fn unterminated_placeholder_is_left_as_is() {
        assert_eq!(evaluate("${unterminated", |_| None), "${unterminated");
    }

    #[test]
    fn no_placeholder_short_circuits_without_calling_lookup() {
        let called = std::cell::Cell::new(false);
        let result = evaluate("plain", |_| {
            called.set(true);
            None
        });
        assert_eq!(result, "plain");
        assert!(!called.get());
    }
}
