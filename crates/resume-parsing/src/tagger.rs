//! Heuristic part-of-speech tagger and named-entity chunker.
//!
//! A closed-class lexicon, suffix rules and capitalization are enough to
//! separate nouns, adjectives and proper-noun runs in resume text, which is
//! all the name fallback and the terminology miner need.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Penn-style part-of-speech tags, reduced to the classes the rules emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    /// NN
    Noun,
    /// NNS
    PluralNoun,
    /// NNP
    ProperNoun,
    /// JJ
    Adjective,
    /// RB
    Adverb,
    /// VB / VBD / VBG / VBZ collapsed
    Verb,
    /// DT
    Determiner,
    /// IN / TO
    Preposition,
    /// CC
    Conjunction,
    /// PRP / PRP$
    Pronoun,
    /// MD
    Modal,
    /// CD
    Number,
    /// Punctuation and symbols
    Punct,
}

impl PosTag {
    pub fn as_penn(&self) -> &'static str {
        match self {
            PosTag::Noun => "NN",
            PosTag::PluralNoun => "NNS",
            PosTag::ProperNoun => "NNP",
            PosTag::Adjective => "JJ",
            PosTag::Adverb => "RB",
            PosTag::Verb => "VB",
            PosTag::Determiner => "DT",
            PosTag::Preposition => "IN",
            PosTag::Conjunction => "CC",
            PosTag::Pronoun => "PRP",
            PosTag::Modal => "MD",
            PosTag::Number => "CD",
            PosTag::Punct => ".",
        }
    }

    pub fn is_noun(&self) -> bool {
        matches!(self, PosTag::Noun | PosTag::PluralNoun | PosTag::ProperNoun)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedToken<'a> {
    pub text: &'a str,
    pub tag: PosTag,
}

/// Entity classes produced by [`ne_chunk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Person,
    Organization,
    Gpe,
}

impl EntityKind {
    /// Label in the usual NER vocabulary.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Person => "PERSON",
            EntityKind::Organization => "ORGANIZATION",
            EntityKind::Gpe => "GPE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityChunk {
    pub kind: EntityKind,
    pub text: String,
}

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9]+(?:['’.\-+#&][A-Za-z0-9+#]+)*[+#]*|[^\sA-Za-z0-9]").unwrap()
});

static LEXICON: Lazy<HashMap<&'static str, PosTag>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for w in ["a", "an", "the", "this", "that", "these", "those", "each", "every", "all", "any", "some", "no"] {
        m.insert(w, PosTag::Determiner);
    }
    for w in [
        "in", "on", "at", "of", "for", "with", "by", "from", "to", "into", "over", "under",
        "about", "across", "through", "during", "within", "via", "per", "as", "between",
        "including", "after", "before", "since", "until", "among", "toward", "towards",
    ] {
        m.insert(w, PosTag::Preposition);
    }
    for w in ["and", "or", "but", "nor", "yet", "so", "&"] {
        m.insert(w, PosTag::Conjunction);
    }
    for w in [
        "i", "me", "my", "we", "our", "you", "your", "he", "him", "his", "she", "her", "it",
        "its", "they", "them", "their", "myself",
    ] {
        m.insert(w, PosTag::Pronoun);
    }
    for w in ["can", "could", "will", "would", "shall", "should", "may", "might", "must"] {
        m.insert(w, PosTag::Modal);
    }
    for w in [
        "is", "are", "was", "were", "be", "been", "being", "am", "has", "have", "had", "do",
        "does", "did", "led", "built", "ran", "won", "made", "grew", "drove", "wrote", "taught",
        "managed", "developed", "designed", "created", "implemented", "improved", "reduced",
        "increased", "delivered", "launched", "maintained", "supported",
    ] {
        m.insert(w, PosTag::Verb);
    }
    for w in [
        "very", "highly", "also", "not", "well", "currently", "successfully", "closely",
        "directly", "remotely",
    ] {
        m.insert(w, PosTag::Adverb);
    }
    for w in [
        "senior", "junior", "new", "large", "small", "key", "strong", "excellent", "good",
        "great", "high", "low", "full", "main", "global", "local", "national", "international",
        "technical", "professional", "cross-functional", "scalable", "real-time", "end-to-end",
        "various", "multiple", "several", "annual", "daily", "weekly", "monthly", "open",
        "public", "private", "social", "digital", "financial", "clinical", "legal", "remote",
    ] {
        m.insert(w, PosTag::Adjective);
    }
    m
});

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "able", "ible", "ical", "ive", "less", "ic", "ary", "ish", "ent", "ant",
];

const ORG_SUFFIXES: &[&str] = &[
    "inc", "inc.", "corp", "corp.", "corporation", "llc", "ltd", "ltd.", "co", "co.", "company",
    "group", "university", "college", "institute", "school", "academy", "bank", "labs",
    "technologies", "systems", "solutions", "hospital", "clinic", "foundation", "association",
    "agency", "partners", "consulting", "services", "center", "centre", "department",
];

const ORG_PREFIXES: &[&str] = &["university", "bank", "department", "institute", "college"];

pub(crate) const PLACES: &[&str] = &[
    "alabama", "alaska", "arizona", "arkansas", "california", "colorado", "connecticut",
    "delaware", "florida", "georgia", "hawaii", "idaho", "illinois", "indiana", "iowa",
    "kansas", "kentucky", "louisiana", "maine", "maryland", "massachusetts", "michigan",
    "minnesota", "mississippi", "missouri", "montana", "nebraska", "nevada", "new hampshire",
    "new jersey", "new mexico", "new york", "north carolina", "north dakota", "ohio",
    "oklahoma", "oregon", "pennsylvania", "rhode island", "south carolina", "south dakota",
    "tennessee", "texas", "utah", "vermont", "virginia", "washington", "west virginia",
    "wisconsin", "wyoming", "boston", "chicago", "seattle", "austin", "denver", "atlanta",
    "san francisco", "los angeles", "san diego", "san jose", "portland", "miami", "dallas",
    "houston", "philadelphia", "phoenix", "toronto", "vancouver", "montreal", "london",
    "paris", "berlin", "amsterdam", "dublin", "madrid", "barcelona", "munich", "zurich",
    "stockholm", "singapore", "tokyo", "sydney", "melbourne", "bangalore", "mumbai", "delhi",
    "usa", "united states", "canada", "mexico", "brazil", "united kingdom", "uk", "england",
    "ireland", "germany", "france", "spain", "italy", "netherlands", "sweden", "switzerland",
    "india", "china", "japan", "australia", "singapore",
];

/// Split text into word and punctuation tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    TOKEN_RE.find_iter(text).map(|m| m.as_str()).collect()
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_uppercase())
}

fn tag_word(word: &str, sentence_start: bool) -> PosTag {
    if word.chars().all(|c| !c.is_alphanumeric()) {
        return PosTag::Punct;
    }
    if word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return PosTag::Number;
    }
    let lower = word.to_lowercase();
    if let Some(tag) = LEXICON.get(lower.as_str()) {
        // Closed-class words stay closed-class even when capitalized, except
        // adjectives, which start many proper names ("New York").
        if *tag != PosTag::Adjective || !is_capitalized(word) || sentence_start {
            return *tag;
        }
    }
    if is_capitalized(word) && !sentence_start {
        return PosTag::ProperNoun;
    }
    if is_capitalized(word) && word.chars().filter(|c| c.is_uppercase()).count() > 1 {
        return PosTag::ProperNoun;
    }
    if lower.ends_with("ly") && lower.len() > 4 {
        return PosTag::Adverb;
    }
    if lower.ends_with("ing") && lower.len() > 5 {
        return PosTag::Verb;
    }
    if lower.ends_with("ed") && lower.len() > 4 {
        return PosTag::Verb;
    }
    if ADJECTIVE_SUFFIXES
        .iter()
        .any(|s| lower.ends_with(s) && lower.len() > s.len() + 2)
    {
        return PosTag::Adjective;
    }
    if lower.ends_with('s') && !lower.ends_with("ss") && lower.len() > 3 {
        return PosTag::PluralNoun;
    }
    if is_capitalized(word) {
        return PosTag::ProperNoun;
    }
    PosTag::Noun
}

/// Tag a token sequence. Line breaks are not visible here, so callers that
/// care about them should tag line by line.
pub fn pos_tag<'a>(tokens: &[&'a str]) -> Vec<TaggedToken<'a>> {
    let mut tagged = Vec::with_capacity(tokens.len());
    let mut sentence_start = true;
    for &token in tokens {
        let tag = tag_word(token, sentence_start);
        sentence_start = matches!(token, "." | "!" | "?" | ":" | "•" | "|");
        tagged.push(TaggedToken { text: token, tag });
    }
    tagged
}

fn classify_run(words: &[&str]) -> Option<EntityKind> {
    let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
    let last = lower.last()?;
    let first = lower.first()?;
    if ORG_SUFFIXES.contains(&last.as_str()) || ORG_PREFIXES.contains(&first.as_str()) {
        return Some(EntityKind::Organization);
    }
    let joined = lower.join(" ");
    if PLACES.contains(&joined.as_str()) {
        return Some(EntityKind::Gpe);
    }
    if words.len() == 1 {
        return None;
    }
    if words.iter().all(|w| w.chars().all(|c| c.is_uppercase())) && words.len() > 3 {
        return None;
    }
    if words.len() <= 3 && words.iter().all(|w| w.chars().all(|c| c.is_alphabetic() || c == '\'' || c == '-')) {
        return Some(EntityKind::Person);
    }
    Some(EntityKind::Organization)
}

/// Group runs of proper nouns into named-entity chunks.
///
/// Runs ending in an organization suffix become organizations, known places
/// become GPEs, and two- or three-word alphabetic runs are treated as people.
pub fn ne_chunk(tagged: &[TaggedToken<'_>]) -> Vec<EntityChunk> {
    fn flush(run: &mut Vec<&str>, chunks: &mut Vec<EntityChunk>) {
        if let Some(kind) = classify_run(run) {
            chunks.push(EntityChunk {
                kind,
                text: run.join(" "),
            });
        }
        run.clear();
    }

    let mut chunks = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for token in tagged {
        let proper = token.tag == PosTag::ProperNoun
            || (token.tag == PosTag::Adjective && is_capitalized(token.text) && !run.is_empty())
            || (!run.is_empty() && is_capitalized(token.text) && token.tag != PosTag::Punct
                && !matches!(token.tag, PosTag::Preposition | PosTag::Conjunction | PosTag::Determiner));
        let starts_name = run.is_empty()
            && is_capitalized(token.text)
            && token.text.chars().count() > 1
            && !matches!(
                token.tag,
                PosTag::Punct
                    | PosTag::Number
                    | PosTag::Preposition
                    | PosTag::Conjunction
                    | PosTag::Determiner
                    | PosTag::Pronoun
                    | PosTag::Modal
            );
        if proper || starts_name {
            run.push(token.text);
        } else if !run.is_empty() {
            flush(&mut run, &mut chunks);
        }
    }
    if !run.is_empty() {
        flush(&mut run, &mut chunks);
    }
    chunks
}

/// Tokenize, tag and chunk in one step, line by line.
pub fn entities(text: &str) -> Vec<EntityChunk> {
    text.lines()
        .flat_map(|line| {
            let tokens = tokenize(line);
            ne_chunk(&pos_tag(&tokens))
        })
        .collect()
}
