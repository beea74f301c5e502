//! Porter stemming, reproducing NLTK's `PorterStemmer` in its default `NLTK_EXTENSIONS` mode.
//!
//! The model was trained on tokens stemmed by NLTK, so the departures NLTK makes from the
//! published algorithm are kept here: the irregular-forms table, words of two letters or fewer
//! left untouched, the `ies`/`ied` special cases, the relaxed `y -> i` rule, the `alli` rewrite
//! and the extra `fulli`/`logi` rules in step 2.

use std::collections::HashMap;

use lazy_static::lazy_static;

type Condition = fn(&[u8]) -> bool;

/// A suffix, its replacement and the condition the remaining stem must meet
type Rule = (&'static str, &'static str, Condition);

lazy_static! {
    /// Words mapped directly to their stem, bypassing the rule steps
    static ref IRREGULAR_FORMS: HashMap<&'static str, &'static str> = [
        ("sky", "sky"),
        ("skies", "sky"),
        ("dying", "die"),
        ("lying", "lie"),
        ("tying", "tie"),
        ("news", "news"),
        ("innings", "inning"),
        ("inning", "inning"),
        ("outings", "outing"),
        ("outing", "outing"),
        ("cannings", "canning"),
        ("canning", "canning"),
        ("howe", "howe"),
        ("proceed", "proceed"),
        ("exceed", "exceed"),
        ("succeed", "succeed"),
    ]
    .into_iter()
    .collect();
}

static STEP1A: &[Rule] = &[
    ("sses", "ss", always),
    ("ies", "i", always),
    ("ss", "ss", always),
    ("s", "", always),
];

static STEP2: &[Rule] = &[
    ("ational", "ate", positive_measure),
    ("tional", "tion", positive_measure),
    ("enci", "ence", positive_measure),
    ("anci", "ance", positive_measure),
    ("izer", "ize", positive_measure),
    ("bli", "ble", positive_measure),
    ("alli", "al", positive_measure),
    ("entli", "ent", positive_measure),
    ("eli", "e", positive_measure),
    ("ousli", "ous", positive_measure),
    ("ization", "ize", positive_measure),
    ("ation", "ate", positive_measure),
    ("ator", "ate", positive_measure),
    ("alism", "al", positive_measure),
    ("iveness", "ive", positive_measure),
    ("fulness", "ful", positive_measure),
    ("ousness", "ous", positive_measure),
    ("aliti", "al", positive_measure),
    ("iviti", "ive", positive_measure),
    ("biliti", "ble", positive_measure),
    ("fulli", "ful", positive_measure),
    ("logi", "log", logi_condition),
];

static STEP3: &[Rule] = &[
    ("icate", "ic", positive_measure),
    ("ative", "", positive_measure),
    ("alize", "al", positive_measure),
    ("iciti", "ic", positive_measure),
    ("ical", "ic", positive_measure),
    ("ful", "", positive_measure),
    ("ness", "", positive_measure),
];

static STEP4: &[Rule] = &[
    ("al", "", measure_gt_one),
    ("ance", "", measure_gt_one),
    ("ence", "", measure_gt_one),
    ("er", "", measure_gt_one),
    ("ic", "", measure_gt_one),
    ("able", "", measure_gt_one),
    ("ible", "", measure_gt_one),
    ("ant", "", measure_gt_one),
    ("ement", "", measure_gt_one),
    ("ment", "", measure_gt_one),
    ("ent", "", measure_gt_one),
    ("ion", "", ion_condition),
    ("ou", "", measure_gt_one),
    ("ism", "", measure_gt_one),
    ("ate", "", measure_gt_one),
    ("iti", "", measure_gt_one),
    ("ous", "", measure_gt_one),
    ("ive", "", measure_gt_one),
    ("ize", "", measure_gt_one),
];

static STEP5B: &[Rule] = &[("ll", "l", ll_condition)];

/// The Porter stemmer used at both training and serving time
#[derive(Debug, Default, Clone, Copy)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new stemmer
    pub const fn new() -> Self {
        Self
    }

    /// Stem a single word.
    ///
    /// The word is lowercased first. Words containing anything other than ASCII letters are
    /// returned lowercased but otherwise unchanged.
    pub fn stem(&self, word: &str) -> String {
        let word = word.to_lowercase();

        if let Some(stem) = IRREGULAR_FORMS.get(word.as_str()) {
            return (*stem).to_string();
        }

        if word.len() <= 2 || !word.bytes().all(|b| b.is_ascii_lowercase()) {
            return word;
        }

        let word = step1a(word);
        let word = step1b(word);
        let word = apply_rules(word, &[("y", "i", y_condition)]);
        let word = step2(word);
        let word = apply_rules(word, STEP3);
        let word = apply_rules(word, STEP4);
        let word = step5a(word);

        apply_rules(word, STEP5B)
    }
}

/// Apply the first rule whose suffix matches. Once a suffix matches no later rule is tried,
/// whether or not its condition held.
fn apply_rules(word: String, rules: &[Rule]) -> String {
    for &(suffix, replacement, condition) in rules {
        if let Some(stem) = word.strip_suffix(suffix) {
            if condition(stem.as_bytes()) {
                return format!("{stem}{replacement}");
            }

            return word;
        }
    }

    word
}

fn step1a(word: String) -> String {
    // 'ties' -> 'tie' but 'flies' -> 'fli'
    if word.len() == 4 && word.ends_with("ies") {
        return format!("{}ie", &word[..1]);
    }

    apply_rules(word, STEP1A)
}

fn step1b(word: String) -> String {
    // 'died' -> 'die' but 'spied' -> 'spi'
    if let Some(stem) = word.strip_suffix("ied") {
        let replacement = if word.len() == 4 { "ie" } else { "i" };
        return format!("{stem}{replacement}");
    }

    if let Some(stem) = word.strip_suffix("eed") {
        if positive_measure(stem.as_bytes()) {
            return format!("{stem}ee");
        }

        return word;
    }

    let suffix_len = ["ed", "ing"]
        .into_iter()
        .find(|suffix| {
            word.strip_suffix(suffix)
                .is_some_and(|stem| contains_vowel(stem.as_bytes()))
        })
        .map(str::len);

    let Some(suffix_len) = suffix_len else {
        return word;
    };

    let mut stem = word;
    stem.truncate(stem.len() - suffix_len);

    for (suffix, replacement) in [("at", "ate"), ("bl", "ble"), ("iz", "ize")] {
        if stem.ends_with(suffix) {
            stem.truncate(stem.len() - suffix.len());
            stem.push_str(replacement);
            return stem;
        }
    }

    if ends_double_consonant(stem.as_bytes()) {
        if !stem.ends_with(|c| matches!(c, 'l' | 's' | 'z')) {
            stem.pop();
        }

        return stem;
    }

    if measure(stem.as_bytes()) == 1 && ends_cvc(stem.as_bytes()) {
        stem.push('e');
    }

    stem
}

fn step2(word: String) -> String {
    // NLTK rewrites 'alli' first and runs the result through step 2 again
    if let Some(stem) = word.strip_suffix("alli") {
        if positive_measure(stem.as_bytes()) {
            return step2(format!("{stem}al"));
        }
    }

    apply_rules(word, STEP2)
}

fn step5a(word: String) -> String {
    if let Some(stem) = word.strip_suffix('e') {
        let m = measure(stem.as_bytes());

        if m > 1 || (m == 1 && !ends_cvc(stem.as_bytes())) {
            return stem.to_string();
        }
    }

    word
}

fn is_consonant(word: &[u8], i: usize) -> bool {
    match word[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(word, i - 1),
        _ => true,
    }
}

/// The number of vowel-consonant sequences, `m` in `[C](VC){m}[V]`
fn measure(stem: &[u8]) -> usize {
    (1..stem.len())
        .filter(|&i| !is_consonant(stem, i - 1) && is_consonant(stem, i))
        .count()
}

fn contains_vowel(stem: &[u8]) -> bool {
    (0..stem.len()).any(|i| !is_consonant(stem, i))
}

fn ends_double_consonant(word: &[u8]) -> bool {
    let n = word.len();

    n >= 2 && word[n - 1] == word[n - 2] && is_consonant(word, n - 1)
}

/// `*o`: ends consonant-vowel-consonant where the last consonant is not w, x or y. NLTK also
/// accepts a two letter vowel-consonant word.
fn ends_cvc(word: &[u8]) -> bool {
    let n = word.len();

    (n >= 3
        && is_consonant(word, n - 3)
        && !is_consonant(word, n - 2)
        && is_consonant(word, n - 1)
        && !matches!(word[n - 1], b'w' | b'x' | b'y'))
        || (n == 2 && !is_consonant(word, 0) && is_consonant(word, 1))
}

fn always(_stem: &[u8]) -> bool {
    true
}

fn positive_measure(stem: &[u8]) -> bool {
    measure(stem) > 0
}

fn measure_gt_one(stem: &[u8]) -> bool {
    measure(stem) > 1
}

fn ion_condition(stem: &[u8]) -> bool {
    measure(stem) > 1 && matches!(stem.last(), Some(b's' | b't'))
}

fn y_condition(stem: &[u8]) -> bool {
    stem.len() > 1 && is_consonant(stem, stem.len() - 1)
}

// The 'l' of 'logi' stays with the stem so 'geo', 'theo' and friends qualify
fn logi_condition(stem: &[u8]) -> bool {
    positive_measure(&[stem, b"l"].concat())
}

fn ll_condition(stem: &[u8]) -> bool {
    measure(&[stem, b"l"].concat()) > 1
}
