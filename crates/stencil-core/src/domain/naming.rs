//! Casing and pluralization utilities.
//!
//! Every name that appears in generated output (table names, class names,
//! route segments, display labels, file stems) is derived here, so all five
//! output layers agree on how an entity is spelled.
//!
//! # Pluralization
//!
//! English pluralization is handled by a small override table covering the
//! irregular nouns used by the built-in domain presets, followed by the usual
//! suffix rules. Only the last word of a compound name is inflected:
//! `ProductCategory` → `ProductCategories`, `order_item` → `order_items`.
//! The case of the inflected word's first letter is preserved.

// ── Case conversion ──────────────────────────────────────────────────────────

/// Convert a string to snake_case.
///
/// | Input | Output |
/// |-------|--------|
/// | "OrderItem" | "order_item" |
/// | "order-item" | "order_item" |
/// | "HTTPRequest" | "http_request" |
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Convert a string to kebab-case. Used for route segments.
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Convert a string to PascalCase. Used for class and component names.
///
/// | Input | Output |
/// |-------|--------|
/// | "order_item" | "OrderItem" |
/// | "HTTPRequest" | "HttpRequest" |
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// Convert a string to camelCase. Used for TypeScript property names.
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert a string to a human display label: `OrderItem` → `Order Item`.
pub fn to_title_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| capitalize(w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(word.len());
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Split a string into lowercase words based on casing and separators.
///
/// 1. **Explicit separators:** `_`, `-`, whitespace → always split
/// 2. **Case transition (camelCase):** `aB` → split between `a` and `B`
/// 3. **Acronym boundary:** `HTTPRequest` → split between `P` and `R`
///    (detected by `Upper Upper Lower` pattern)
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            let lower_to_upper = (c.is_lowercase() || c.is_ascii_digit()) && next.is_uppercase();
            let acronym_end = c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase());

            if lower_to_upper || acronym_end {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

// ── Pluralization ────────────────────────────────────────────────────────────

/// Irregular singular/plural pairs (lowercase).
///
/// Covers the nouns used by the domain-category presets plus the common
/// irregulars a business domain is likely to name an entity after.
static IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("category", "categories"),
    ("person", "people"),
    ("child", "children"),
    ("status", "statuses"),
    ("address", "addresses"),
    ("analysis", "analyses"),
    ("company", "companies"),
    ("inventory", "inventories"),
    ("currency", "currencies"),
    ("quiz", "quizzes"),
    ("datum", "data"),
    ("criterion", "criteria"),
    ("leaf", "leaves"),
    ("half", "halves"),
    ("life", "lives"),
    ("knife", "knives"),
    ("mouse", "mice"),
    ("man", "men"),
    ("woman", "women"),
    ("foot", "feet"),
    ("tooth", "teeth"),
];

/// Nouns with identical singular and plural forms.
static UNCOUNTABLE_NOUNS: &[&str] = &[
    "news",
    "series",
    "species",
    "equipment",
    "information",
    "feedback",
    "metadata",
];

/// Pluralize the last word of a name.
///
/// | Input | Output |
/// |-------|--------|
/// | "Category" | "Categories" |
/// | "Person" | "People" |
/// | "box" | "boxes" |
/// | "order_item" | "order_items" |
pub fn pluralize(name: &str) -> String {
    inflect(name, pluralize_word)
}

/// Singularize the last word of a name. Inverts [`pluralize`].
pub fn singularize(name: &str) -> String {
    inflect(name, singularize_word)
}

fn inflect(name: &str, rule: fn(&str) -> String) -> String {
    let (head, tail) = name.split_at(last_word_start(name));
    if tail.is_empty() {
        return name.to_string();
    }

    let inflected = rule(&tail.to_lowercase());
    format!("{head}{}", match_case(tail, &inflected))
}

/// Byte offset where the last word of `name` begins.
///
/// Uses the same boundaries as `split_words`: separators, `aB` transitions
/// and the end of an acronym (`HTTPRequest` → `Request`).
fn last_word_start(name: &str) -> usize {
    let chars: Vec<(usize, char)> = name.char_indices().collect();
    let mut start = 0;

    for w in 1..chars.len() {
        let (i, c) = chars[w];
        let p = chars[w - 1].1;
        let after_separator = p == '_' || p == '-' || p.is_whitespace();
        let camel_boundary = (p.is_lowercase() || p.is_ascii_digit()) && c.is_uppercase();
        let acronym_end = p.is_uppercase()
            && c.is_uppercase()
            && chars.get(w + 1).is_some_and(|&(_, n)| n.is_lowercase());
        if after_separator || camel_boundary || acronym_end {
            start = i;
        }
    }

    start
}

/// Re-apply the casing of `original` to a lowercase `inflected` word.
fn match_case(original: &str, inflected: &str) -> String {
    let is_upper = |c: char| c.is_uppercase();

    if original.chars().count() > 1 && original.chars().all(|c| !c.is_alphabetic() || is_upper(c)) {
        return inflected.to_uppercase();
    }
    if original.chars().next().is_some_and(is_upper) {
        return capitalize(inflected);
    }
    inflected.to_string()
}

fn pluralize_word(word: &str) -> String {
    if UNCOUNTABLE_NOUNS.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR_NOUNS.iter().find(|(s, _)| *s == word) {
        return (*plural).to_string();
    }
    if IRREGULAR_NOUNS.iter().any(|(_, p)| *p == word) {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix('y')
        && stem.chars().last().is_some_and(is_consonant)
    {
        return format!("{stem}ies");
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }
    format!("{word}s")
}

fn singularize_word(word: &str) -> String {
    if UNCOUNTABLE_NOUNS.contains(&word) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR_NOUNS.iter().find(|(_, p)| *p == word) {
        return (*singular).to_string();
    }
    if IRREGULAR_NOUNS.iter().any(|(s, _)| *s == word) {
        return word.to_string();
    }
    if ["us", "is", "ss"].iter().any(|s| word.ends_with(s)) {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies")
        && stem.chars().last().is_some_and(is_consonant)
    {
        return format!("{stem}y");
    }
    if let Some(stem) = word.strip_suffix("es")
        && ["s", "x", "z", "ch", "sh"].iter().any(|s| stem.ends_with(s))
        && (!stem.ends_with('s') || stem.ends_with("ss") || stem.ends_with("us"))
        && !stem.ends_with("ous")
    {
        return stem.to_string();
    }
    if let Some(stem) = word.strip_suffix('s')
        && !stem.is_empty()
    {
        return stem.to_string();
    }
    word.to_string()
}

fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

// ── Identifiers ──────────────────────────────────────────────────────────────

/// Words that would produce broken code when used as a generated identifier.
static RESERVED_WORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "false", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "none", "nonlocal", "not", "or", "pass", "raise", "return", "true", "try",
    "while", "with", "yield",
];

/// Whether `name` can be used as an entity or field name.
///
/// ASCII letter first, then letters, digits, or underscores; its snake-case
/// form must not be a reserved word in the generated languages.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    starts_ok && rest_ok && !RESERVED_WORDS.contains(&to_snake_case(name).as_str())
}

/// Database table name for an entity: `OrderItem` → `order_items`.
pub fn table_name(entity: &str) -> String {
    pluralize(&to_snake_case(entity))
}
