//! Naming primitives.
//!
//! Two kinds of names come out of a configuration: human-facing `name`
//! attribute values (`kebab_name`) and block addresses used as HCL labels
//! and CDKTF map keys (`snake_case`).

use craig_spec::Craig;

/// Join `parts` with hyphens behind `prefix`. An empty prefix is skipped.
pub fn kebab_name<S: AsRef<str>>(prefix: &str, parts: &[S]) -> String {
    let mut words: Vec<&str> = Vec::with_capacity(parts.len() + 1);
    if !prefix.is_empty() {
        words.push(prefix);
    }
    words.extend(parts.iter().map(|p| p.as_ref()).filter(|p| !p.is_empty()));
    words.join("-")
}

/// Kebab name behind the configuration's global prefix.
pub fn resource_name<S: AsRef<str>>(craig: &Craig, parts: &[S]) -> String {
    kebab_name(&craig.options.prefix, parts)
}

/// `name` with the global prefix unless the entity opts out.
pub fn prefixed_name(craig: &Craig, use_prefix: bool, name: &str) -> String {
    if use_prefix {
        kebab_name(&craig.options.prefix, &[name])
    } else {
        name.to_string()
    }
}

#[derive(PartialEq, Clone, Copy)]
enum CharClass {
    Lower,
    Upper,
    Digit,
}

fn class_of(c: char) -> CharClass {
    if c.is_ascii_digit() {
        CharClass::Digit
    } else if c.is_uppercase() {
        CharClass::Upper
    } else {
        CharClass::Lower
    }
}

/// Normalize a composite address to a snake_case symbol.
///
/// Words are split on any non-alphanumeric character, on a lower to upper
/// case change and on a letter/digit change. The transform is idempotent.
pub fn snake_case(value: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut previous: Option<CharClass> = None;

    for c in value.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous = None;
            continue;
        }

        let class = class_of(c);
        let boundary = match (previous, class) {
            (Some(CharClass::Lower), CharClass::Upper) => true,
            (Some(CharClass::Digit), CharClass::Lower | CharClass::Upper) => true,
            (Some(CharClass::Lower | CharClass::Upper), CharClass::Digit) => true,
            _ => false,
        };
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(c.to_lowercase());
        previous = Some(class);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join("_")
}

/// Title-case a phrase for banner headers, treating `-` and `_` as spaces.
pub fn title_case(value: &str) -> String {
    value
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
