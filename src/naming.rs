//! Identifier naming policies and table-name pluralization.

/// Case-conversion policy applied to type and property names when deriving
/// table and column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingPolicy {
    /// Insert `_` before each internal uppercase letter, then lowercase.
    #[default]
    SnakeCase,
    /// Lowercase the whole identifier.
    LowerCase,
}

impl NamingPolicy {
    /// Convert an identifier according to this policy.
    pub fn convert(&self, name: &str) -> String {
        match self {
            NamingPolicy::LowerCase => name.to_lowercase(),
            NamingPolicy::SnakeCase => {
                let mut result = String::with_capacity(name.len() + 4);
                for (i, c) in name.chars().enumerate() {
                    if c.is_uppercase() {
                        if i > 0 {
                            result.push('_');
                        }
                        for lower in c.to_lowercase() {
                            result.push(lower);
                        }
                    } else {
                        result.push(c);
                    }
                }
                result
            }
        }
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Derive a plural table name from an already case-converted type name.
///
/// Ordered rules, first full match wins:
/// 1. consonant + `y` -> drop the `y`, append `ies` ("city" -> "cities")
/// 2. vowel + `s`/`x` -> append `es` ("bus" -> "buses", "fox" -> "foxes")
/// 3. ends `ch`/`sh`/`ss`/`zz` -> append `es` ("church" -> "churches")
/// 4. ends `f`/`fe` -> drop it, append `ves` ("wolf" -> "wolves")
/// 5. otherwise append `s`
///
/// Irregular plurals ("person" -> "people") are not handled here; entities
/// that need one declare an explicit table name, which bypasses this resolver.
pub fn pluralize(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() >= 2 {
        let last = chars[chars.len() - 1];
        let prev = chars[chars.len() - 2];
        if last == 'y' && !is_vowel(prev) {
            return format!("{}ies", &name[..name.len() - 1]);
        }
        if (last == 's' || last == 'x') && is_vowel(prev) {
            return format!("{name}es");
        }
    }
    if name.ends_with("ch") || name.ends_with("sh") || name.ends_with("ss") || name.ends_with("zz")
    {
        return format!("{name}es");
    }
    if name.ends_with("fe") {
        return format!("{}ves", &name[..name.len() - 2]);
    }
    if name.ends_with('f') {
        return format!("{}ves", &name[..name.len() - 1]);
    }
    format!("{name}s")
}

/// Default table name for a type: case-convert, then pluralize.
pub(crate) fn default_table_name(type_name: &str, policy: NamingPolicy) -> String {
    pluralize(&policy.convert(type_name))
}
