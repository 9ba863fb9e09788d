// ============================================================
// Layer 4 — Part-of-Speech Aware Lemmatizer
// ============================================================
// Reduces inflected words to a dictionary form so "movies",
// "movie" and "Movie" all share one vocabulary slot.
//
// Two pieces work together:
//
//   PosTagger   guesses a Penn Treebank tag for a single token
//               (closed-class lexicon first, then suffix rules)
//
//   Lemmatizer  takes the word plus a coarse part of speech and
//               applies, in order:
//                 1. closed-class words (determiners, pronouns,
//                    prepositions, …) come back unchanged
//                 2. an irregular-form exception table
//                 3. WordNet-style suffix detachment rules
//
// The Penn tag is reduced to a coarse part of speech with a
// fixed first-letter mapping:
//
//   J… → Adjective    N… → Noun    V… → Verb    R… → Adverb
//   anything else → Noun
//
// There is no dictionary lookup behind the rules, so stems are
// repaired with a few spelling heuristics (undoubling "runn",
// restoring the silent "e" of "lov" → "love").
//
// Reference: Miller (1995) WordNet — morphy detachment rules
//            Marcus et al. (1993) Penn Treebank tag set

use std::collections::{HashMap, HashSet};

/// Coarse part of speech understood by the lemmatizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl PartOfSpeech {
    /// Map a Penn Treebank tag to a coarse part of speech.
    /// Unknown tags (DT, IN, PRP, …) default to Noun.
    pub fn from_penn_tag(tag: &str) -> Self {
        match tag.chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('J') => Self::Adjective,
            Some('N') => Self::Noun,
            Some('V') => Self::Verb,
            Some('R') => Self::Adverb,
            _         => Self::Noun,
        }
    }
}

// ─── Word lists ───────────────────────────────────────────────────────────────

/// Irregular verb forms → base form.
/// Every entry is also tagged VBD by the tagger.
const VERB_EXCEPTIONS: &[(&str, &str)] = &[
    ("am", "be"), ("are", "be"), ("is", "be"), ("was", "be"), ("were", "be"),
    ("been", "be"), ("being", "be"),
    ("has", "have"), ("had", "have"), ("having", "have"),
    ("does", "do"), ("did", "do"), ("done", "do"),
    ("goes", "go"), ("went", "go"), ("gone", "go"),
    ("made", "make"), ("said", "say"), ("says", "say"),
    ("got", "get"), ("gotten", "get"), ("took", "take"), ("taken", "take"),
    ("saw", "see"), ("seen", "see"), ("came", "come"),
    ("knew", "know"), ("known", "know"), ("gave", "give"), ("given", "give"),
    ("found", "find"), ("thought", "think"), ("told", "tell"), ("felt", "feel"),
    ("kept", "keep"), ("began", "begin"), ("begun", "begin"),
    ("brought", "bring"), ("bought", "buy"), ("ran", "run"),
    ("wrote", "write"), ("written", "write"), ("sat", "sit"), ("stood", "stand"),
    ("lost", "lose"), ("paid", "pay"), ("met", "meet"), ("held", "hold"),
    ("spent", "spend"), ("built", "build"), ("fell", "fall"), ("fallen", "fall"),
    ("became", "become"), ("ate", "eat"), ("eaten", "eat"), ("won", "win"),
    ("taught", "teach"), ("caught", "catch"), ("fought", "fight"),
    ("sought", "seek"), ("sold", "sell"), ("heard", "hear"), ("meant", "mean"),
    ("dying", "die"), ("lying", "lie"), ("tying", "tie"),
    ("drove", "drive"), ("driven", "drive"), ("spoke", "speak"), ("spoken", "speak"),
    ("broke", "break"), ("broken", "break"), ("chose", "choose"), ("chosen", "choose"),
    ("forgot", "forget"), ("forgotten", "forget"), ("hid", "hide"), ("hidden", "hide"),
    ("left", "leave"), ("led", "lead"), ("fed", "feed"), ("slept", "sleep"),
    ("struck", "strike"), ("swam", "swim"), ("threw", "throw"), ("thrown", "throw"),
    ("understood", "understand"), ("woke", "wake"), ("wore", "wear"), ("worn", "wear"),
    ("shot", "shoot"), ("sang", "sing"), ("sung", "sing"), ("shook", "shake"),
    ("shaken", "shake"), ("rode", "ride"), ("ridden", "ride"), ("rose", "rise"),
    ("risen", "rise"), ("grew", "grow"), ("grown", "grow"), ("flew", "fly"),
    ("flown", "fly"), ("drew", "draw"), ("drawn", "draw"), ("drank", "drink"),
    ("blew", "blow"), ("born", "bear"),
];

const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("men", "man"), ("women", "woman"), ("children", "child"), ("feet", "foot"),
    ("teeth", "tooth"), ("mice", "mouse"), ("geese", "goose"), ("lives", "life"),
    ("wives", "wife"), ("knives", "knife"), ("oxen", "ox"),
    ("criteria", "criterion"), ("phenomena", "phenomenon"),
    ("analyses", "analysis"), ("crises", "crisis"), ("theses", "thesis"),
    ("series", "series"), ("species", "species"), ("news", "news"),
];

const ADJECTIVE_EXCEPTIONS: &[(&str, &str)] = &[
    ("other", "other"),
    ("better", "good"), ("best", "good"), ("worse", "bad"), ("worst", "bad"),
    ("farther", "far"), ("farthest", "far"), ("furthest", "far"),
    ("elder", "old"), ("eldest", "old"),
];

const ADVERB_EXCEPTIONS: &[(&str, &str)] = &[
    ("better", "well"), ("best", "well"), ("deeper", "deeply"),
    ("farther", "far"), ("further", "far"), ("harder", "hard"), ("hardest", "hard"),
];

/// Nouns whose singular ends in "ie", so "-ies" must not become "-y"
const IE_NOUNS: &[&str] = &[
    "movie", "cookie", "zombie", "hippie", "pie", "tie", "lie", "die",
    "goalie", "rookie", "genie", "calorie", "prairie", "smoothie", "selfie",
    "collie", "brownie", "newbie", "indie", "auntie", "hoodie", "yuppie",
    "groupie", "junkie", "freebie", "bookie", "cutie", "sweetie", "veggie",
    "foodie", "boogie",
];

/// Plural endings checked before the plain "-s" rule
const NOUN_SUFFIXES: &[(&str, &str)] = &[
    ("sses", "ss"), ("zzes", "zz"), ("xes", "x"), ("ches", "ch"), ("shes", "sh"),
    ("ieves", "ief"), ("eaves", "eaf"), ("lves", "lf"),
];

/// Third-person endings where the whole "-es" goes
const VERB_ES_SUFFIXES: &[&str] = &["ches", "shes", "sses", "xes", "zzes", "oes"];

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "less", "ish", "ical",
];

/// Closed-class words and open-class words the suffix rules get wrong
const LEXICON: &[(&str, &str)] = &[
    // determiners
    ("the", "DT"), ("a", "DT"), ("an", "DT"), ("this", "DT"), ("these", "DT"),
    ("those", "DT"), ("each", "DT"), ("every", "DT"), ("some", "DT"), ("any", "DT"),
    ("all", "DT"), ("both", "DT"), ("either", "DT"), ("neither", "DT"), ("no", "DT"),
    ("another", "DT"),
    // pronouns
    ("i", "PRP"), ("me", "PRP"), ("we", "PRP"), ("us", "PRP"), ("you", "PRP"),
    ("he", "PRP"), ("him", "PRP"), ("she", "PRP"), ("it", "PRP"), ("they", "PRP"),
    ("them", "PRP"), ("myself", "PRP"), ("yourself", "PRP"), ("himself", "PRP"),
    ("herself", "PRP"), ("itself", "PRP"), ("ourselves", "PRP"),
    ("yourselves", "PRP"), ("themselves", "PRP"), ("my", "PRP$"), ("our", "PRP$"), ("your", "PRP$"),
    ("his", "PRP$"), ("her", "PRP$"), ("its", "PRP$"), ("their", "PRP$"),
    // prepositions and subordinators
    ("of", "IN"), ("in", "IN"), ("on", "IN"), ("at", "IN"), ("by", "IN"),
    ("for", "IN"), ("with", "IN"), ("about", "IN"), ("against", "IN"),
    ("between", "IN"), ("into", "IN"), ("through", "IN"), ("during", "IN"),
    ("before", "IN"), ("after", "IN"), ("above", "IN"), ("below", "IN"),
    ("from", "IN"), ("over", "IN"), ("under", "IN"), ("than", "IN"), ("as", "IN"),
    ("if", "IN"), ("because", "IN"), ("while", "IN"), ("until", "IN"),
    ("since", "IN"), ("like", "IN"), ("though", "IN"), ("although", "IN"),
    ("whether", "IN"), ("that", "IN"), ("upon", "IN"), ("within", "IN"),
    ("without", "IN"), ("across", "IN"), ("along", "IN"), ("among", "IN"),
    ("around", "IN"), ("behind", "IN"), ("beyond", "IN"), ("despite", "IN"),
    ("toward", "IN"), ("towards", "IN"), ("to", "TO"),
    ("up", "RP"), ("out", "RP"), ("off", "RP"), ("down", "RB"),
    // conjunctions and modals
    ("and", "CC"), ("but", "CC"), ("or", "CC"), ("nor", "CC"), ("yet", "CC"),
    ("can", "MD"), ("could", "MD"), ("will", "MD"), ("would", "MD"),
    ("shall", "MD"), ("should", "MD"), ("may", "MD"), ("might", "MD"),
    ("must", "MD"),
    // adverbs
    ("not", "RB"), ("very", "RB"), ("too", "RB"), ("also", "RB"), ("just", "RB"),
    ("only", "RB"), ("never", "RB"), ("always", "RB"), ("often", "RB"),
    ("here", "RB"), ("there", "RB"), ("then", "RB"), ("now", "RB"),
    ("again", "RB"), ("once", "RB"), ("even", "RB"), ("still", "RB"),
    ("well", "RB"), ("almost", "RB"), ("quite", "RB"), ("rather", "RB"),
    ("really", "RB"), ("soon", "RB"), ("already", "RB"), ("ever", "RB"),
    ("so", "RB"), ("sometimes", "RB"), ("perhaps", "RB"), ("maybe", "RB"),
    ("indeed", "RB"), ("instead", "RB"), ("ahead", "RB"), ("away", "RB"),
    ("back", "RB"), ("together", "RB"), ("else", "RB"),
    // wh-words
    ("what", "WP"), ("which", "WDT"), ("who", "WP"), ("whom", "WP"),
    ("whose", "WP$"), ("when", "WRB"), ("where", "WRB"), ("why", "WRB"),
    ("how", "WRB"),
    // adjectives, including comparatives with irregular lemmas
    ("good", "JJ"), ("bad", "JJ"), ("great", "JJ"), ("new", "JJ"), ("old", "JJ"),
    ("big", "JJ"), ("little", "JJ"), ("much", "JJ"), ("many", "JJ"), ("few", "JJ"),
    ("other", "JJ"), ("own", "JJ"), ("same", "JJ"), ("such", "JJ"),
    ("funny", "JJ"), ("pretty", "JJ"), ("whole", "JJ"), ("real", "JJ"),
    ("true", "JJ"), ("red", "JJ"), ("dead", "JJ"), ("sacred", "JJ"),
    ("naked", "JJ"), ("wicked", "JJ"), ("kindred", "JJ"),
    ("better", "JJR"), ("worse", "JJR"), ("best", "JJS"), ("worst", "JJS"),
    ("more", "JJR"), ("most", "JJS"), ("less", "JJR"), ("least", "JJS"),
    // nouns the -ing / -ed / -ier rules would misread
    ("nothing", "NN"), ("something", "NN"), ("anything", "NN"),
    ("everything", "NN"), ("evening", "NN"), ("morning", "NN"),
    ("wedding", "NN"), ("ceiling", "NN"), ("darling", "NN"), ("sibling", "NN"),
    ("pudding", "NN"), ("building", "NN"), ("hundred", "CD"), ("hatred", "NN"),
    ("soldier", "NN"), ("cashier", "NN"), ("frontier", "NN"), ("barrier", "NN"),
    ("carrier", "NN"), ("premier", "NN"), ("dossier", "NN"), ("courier", "NN"),
    ("glacier", "NN"), ("cavalier", "NN"),
];

// ─── Tagger ───────────────────────────────────────────────────────────────────

/// Single-token Penn Treebank tagger.
pub struct PosTagger {
    lexicon: HashMap<&'static str, &'static str>,
}

impl PosTagger {
    pub fn new() -> Self {
        let mut lexicon: HashMap<&'static str, &'static str> = VERB_EXCEPTIONS
            .iter()
            .map(|&(form, _)| (form, "VBD"))
            .collect();
        // explicit entries win over the irregular-verb default
        lexicon.extend(LEXICON.iter().copied());
        Self { lexicon }
    }

    /// Guess the Penn tag of one lowercase token
    pub fn tag(&self, token: &str) -> &'static str {
        if let Some(&tag) = self.lexicon.get(token) {
            return tag;
        }

        let len = token.chars().count();

        if len >= 4 && token.ends_with("ly") {
            return "RB";
        }
        // "need", "speed", "bread", "thread" are not past tenses
        if token.ends_with("eed") || token.ends_with("ead") {
            return "NN";
        }
        if len >= 5 {
            if let Some(stem) = token.strip_suffix("ing") {
                if has_vowel(stem) {
                    return "VBG";
                }
            }
        }
        if len >= 4 {
            if let Some(stem) = token.strip_suffix("ed") {
                if has_vowel(stem) {
                    return "VBD";
                }
            }
        }
        if len >= 6 && token.ends_with("iest") {
            return "JJS";
        }
        if len >= 5 && token.ends_with("ier") {
            return "JJR";
        }
        if ADJECTIVE_SUFFIXES
            .iter()
            .any(|suffix| token.ends_with(suffix) && len > suffix.len() + 2)
        {
            return "JJ";
        }
        if len >= 4 && token.ends_with('s') && !is_singular_s_ending(token) {
            return "NNS";
        }
        "NN"
    }
}

impl Default for PosTagger {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Lemmatizer ───────────────────────────────────────────────────────────────

pub struct Lemmatizer {
    closed:     HashSet<&'static str>,
    exceptions: HashMap<PartOfSpeech, HashMap<&'static str, &'static str>>,
    ie_nouns:   HashSet<&'static str>,
}

impl Lemmatizer {
    pub fn new() -> Self {
        let tables = [
            (PartOfSpeech::Verb,      VERB_EXCEPTIONS),
            (PartOfSpeech::Noun,      NOUN_EXCEPTIONS),
            (PartOfSpeech::Adjective, ADJECTIVE_EXCEPTIONS),
            (PartOfSpeech::Adverb,    ADVERB_EXCEPTIONS),
        ];

        let exceptions = tables
            .iter()
            .map(|&(pos, table)| (pos, table.iter().copied().collect()))
            .collect();

        // lexicon words whose tag has no open-class lemma rules
        let closed = LEXICON
            .iter()
            .filter(|&&(_, tag)| !matches!(tag.chars().next(), Some('J' | 'N' | 'V' | 'R')))
            .map(|&(word, _)| word)
            .collect();

        Self {
            closed,
            exceptions,
            ie_nouns: IE_NOUNS.iter().copied().collect(),
        }
    }

    /// Return the lemma of a lowercase word for the given part of speech.
    /// Words no rule applies to come back unchanged.
    pub fn lemmatize(&self, word: &str, pos: PartOfSpeech) -> String {
        if self.closed.contains(word) {
            return word.to_string();
        }
        if let Some(lemma) = self.exceptions.get(&pos).and_then(|table| table.get(word)) {
            return (*lemma).to_string();
        }
        match pos {
            PartOfSpeech::Noun      => self.noun(word),
            PartOfSpeech::Verb      => verb(word),
            PartOfSpeech::Adjective => adjective(word),
            PartOfSpeech::Adverb    => word.to_string(),
        }
    }

    fn noun(&self, word: &str) -> String {
        if word.chars().count() < 4 || !word.ends_with('s') || is_singular_s_ending(word) {
            return word.to_string();
        }

        if let Some(stem) = word.strip_suffix("ies") {
            let singular = format!("{stem}ie");
            if self.ie_nouns.contains(singular.as_str()) {
                return singular;
            }
            return format!("{stem}y");
        }

        for &(suffix, replacement) in NOUN_SUFFIXES {
            if let Some(stem) = word.strip_suffix(suffix) {
                return format!("{stem}{replacement}");
            }
        }

        word[..word.len() - 1].to_string()
    }
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

fn verb(word: &str) -> String {
    let len = word.chars().count();

    for suffix in ["ied", "ies"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            // "died" → "die", "cried" → "cry"
            return if stem.chars().count() < 2 {
                format!("{stem}ie")
            } else {
                format!("{stem}y")
            };
        }
    }

    if word.ends_with("eed") {
        // "agreed" → "agree", but "need" and "speed" stay
        return if len > 5 { word[..word.len() - 1].to_string() } else { word.to_string() };
    }

    for suffix in VERB_ES_SUFFIXES {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }

    if len >= 5 {
        if let Some(stem) = word.strip_suffix("ing") {
            if has_vowel(stem) {
                return repair_stem(stem);
            }
        }
    }

    if len >= 4 {
        if let Some(stem) = word.strip_suffix("ed") {
            if has_vowel(stem) {
                return repair_stem(stem);
            }
        }
    }

    if len >= 4 && word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

fn adjective(word: &str) -> String {
    let len = word.chars().count();

    if len >= 6 {
        if let Some(stem) = word.strip_suffix("iest") {
            return format!("{stem}y");
        }
    }
    if len >= 5 {
        if let Some(stem) = word.strip_suffix("ier") {
            return format!("{stem}y");
        }
    }
    if len >= 6 {
        if let Some(stem) = word.strip_suffix("est") {
            return repair_stem(stem);
        }
    }
    if len >= 5 {
        if let Some(stem) = word.strip_suffix("er") {
            return repair_stem(stem);
        }
    }
    word.to_string()
}

// ─── Spelling helpers ─────────────────────────────────────────────────────────

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn has_vowel(stem: &str) -> bool {
    stem.chars().any(|c| is_vowel(c) || c == 'y')
}

/// "glass", "bus", "basis", "physics" are not plurals
fn is_singular_s_ending(word: &str) -> bool {
    ["ss", "us", "is", "ics"].iter().any(|s| word.ends_with(s))
}

/// Number of vowel runs, counting a non-initial "y" as a vowel
fn vowel_groups(stem: &str) -> usize {
    let mut groups   = 0;
    let mut in_vowel = false;
    for (i, c) in stem.chars().enumerate() {
        let vowel = is_vowel(c) || (c == 'y' && i > 0);
        if vowel && !in_vowel {
            groups += 1;
        }
        in_vowel = vowel;
    }
    groups
}

/// Fix up a stem left behind by stripping "-ing", "-ed", "-er" or "-est":
///   "runn"  → "run"    (doubled final consonant)
///   "lov"   → "love"   (silent e)
fn repair_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();

    if n >= 3 {
        let (prev, last) = (chars[n - 2], chars[n - 1]);
        if prev == last && !is_vowel(last) && !matches!(last, 'l' | 's' | 'z' | 'f') {
            return chars[..n - 1].iter().collect();
        }
    }

    if needs_silent_e(&chars) {
        format!("{stem}e")
    } else {
        stem.to_string()
    }
}

fn needs_silent_e(chars: &[char]) -> bool {
    let n = chars.len();
    if n < 2 {
        return false;
    }
    let (prev, last) = (chars[n - 2], chars[n - 1]);

    // English words do not end in these
    if matches!(last, 'v' | 'u' | 'c') {
        return true;
    }
    if last == 'z' {
        return prev != 'z';
    }
    // "judg", "charg", "engag"
    if last == 'g' && (matches!(prev, 'd' | 'r') || is_vowel(prev)) {
        return true;
    }
    // "us", "ag", "ow"
    if n == 2 {
        return is_vowel(prev) && !is_vowel(last) && !matches!(last, 'w' | 'x' | 'y');
    }
    // "caus", "clos", "surpris"
    if last == 's' && is_vowel(prev) {
        return true;
    }

    let before = chars[n - 3];
    // "relat", "execut", "admir", "captur"
    if !is_vowel(before) && matches!((prev, last), ('a', 't') | ('u', 't') | ('i', 'r') | ('u', 'r')) && n >= 4 {
        return true;
    }

    // single-syllable consonant-vowel-consonant: "mak", "hop", "scor"
    let stem: String = chars.iter().collect();
    !is_vowel(before)
        && is_vowel(prev)
        && !is_vowel(last)
        && !matches!(last, 'w' | 'x' | 'y')
        && vowel_groups(&stem) == 1
}
