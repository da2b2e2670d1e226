//! Key casing conversion between the wire convention (`price-details`) and the
//! application convention (`priceDetails`).
//!
//! Conversion first splits a key into words and then re-joins them, so any input casing
//! is accepted: hyphens, underscores, spaces, dots, lower-to-upper transitions, letter/digit
//! transitions and acronym endings (`XMLHttp` -> `XML`, `Http`) all start a new word.
//! Digits always form their own word, which is why `customer-ref-1` maps to `customerRef1`
//! and back.
//!
//! Kebab -> camel -> kebab is lossless only when every hyphen-separated segment is all
//! letters or all digits. A segment mixing both is split: `a1b` comes back as `a-1-b`.

/// Target casing convention for object keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyStyle {
    /// Lowercase words joined by hyphens, as used on the wire.
    Kebab,
    /// lowerCamelCase, as used by application objects.
    Camel,
}

impl KeyStyle {
    pub fn apply(self, key: &str) -> String {
        match self {
            KeyStyle::Kebab => to_kebab_case(key),
            KeyStyle::Camel => to_camel_case(key),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Lower,
    Upper,
    Digit,
    Separator,
}

fn classify(c: char) -> CharClass {
    if c.is_ascii_digit() {
        CharClass::Digit
    } else if c.is_uppercase() {
        CharClass::Upper
    } else if c.is_alphabetic() {
        CharClass::Lower
    } else {
        CharClass::Separator
    }
}

/// Split a key into its words.
pub fn split_words(key: &str) -> Vec<&str> {
    let chars: Vec<(usize, CharClass)> = key
        .char_indices()
        .map(|(pos, c)| (pos, classify(c)))
        .collect();

    let mut words = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &(pos, class)) in chars.iter().enumerate() {
        if class == CharClass::Separator {
            if let Some(begin) = start.take() {
                words.push(&key[begin..pos]);
            }
            continue;
        }

        let Some(begin) = start else {
            start = Some(pos);
            continue;
        };

        let prev = chars[i - 1].1;
        let next = chars.get(i + 1).map(|&(_, c)| c);
        let boundary = match (prev, class) {
            (CharClass::Lower, CharClass::Upper) => true,
            (CharClass::Digit, CharClass::Lower | CharClass::Upper) => true,
            (CharClass::Lower | CharClass::Upper, CharClass::Digit) => true,
            (CharClass::Upper, CharClass::Upper) => next == Some(CharClass::Lower),
            _ => false,
        };

        if boundary {
            words.push(&key[begin..pos]);
            start = Some(pos);
        }
    }

    if let Some(begin) = start {
        words.push(&key[begin..]);
    }
    words
}

pub fn to_kebab_case(key: &str) -> String {
    split_words(key)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, word) in split_words(key).into_iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
