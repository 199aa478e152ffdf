use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::{Error, Result};

/// What identifies one language: a list of frequent words and a set of characters that rarely
/// occur in other languages.
#[derive(Debug, Clone)]
pub struct LanguageSignature {
    tag: String,
    display_name: String,
    keywords: Option<Regex>,
    script: Option<Regex>,
}

impl LanguageSignature {
    /// Builds a signature.
    ///
    /// Keywords are matched as whole words, ignoring case; they are taken literally. `script` is a
    /// regex character class body, e.g. `а-яё` or `\p{Hangul}`, matched one character at a time,
    /// ignoring case.
    pub fn new<T, N>(
        tag: T,
        display_name: N,
        keywords: &[&str],
        script: Option<&str>,
    ) -> Result<Self>
    where
        T: Into<String>,
        N: Into<String>,
    {
        let tag = tag.into();
        let compile = |pattern: String| {
            RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| Error::InvalidPattern {
                    tag: tag.clone(),
                    source,
                })
        };

        let keywords = if keywords.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = keywords.iter().map(|kw| regex::escape(kw)).collect();
            Some(compile(format!(r"\b(?:{})\b", alternatives.join("|")))?)
        };
        let script = script.map(|class| compile(format!("[{}]", class))).transpose()?;

        Ok(Self {
            tag,
            display_name: display_name.into(),
            keywords,
            script,
        })
    }

    /// The BCP 47 tag of the language, e.g. `fr-FR`.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The human-readable name of the language.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Counts keyword occurrences plus characters from the language's script.
    pub fn score(&self, text: &str) -> usize {
        let keywords = self.keywords.as_ref().map_or(0, |re| re.find_iter(text).count());
        let script = self.script.as_ref().map_or(0, |re| re.find_iter(text).count());
        keywords + script
    }
}

fn builtin(tag: &str, name: &str, keywords: &[&str], script: &str) -> LanguageSignature {
    LanguageSignature::new(tag, name, keywords, Some(script))
        .expect("built-in language signatures are valid")
}

static BUILTIN: Lazy<Vec<LanguageSignature>> = Lazy::new(|| {
    vec![
        builtin(
            "fr-FR",
            "French",
            &["le", "les", "est", "et", "une", "des", "du", "avec", "pour", "dans", "nous", "vous"],
            "àâæçèêëîïôœùûÿ",
        ),
        builtin(
            "es-ES",
            "Spanish",
            &[
                "el", "los", "las", "que", "del", "por", "una", "es", "pero", "muy", "está",
                "gracias",
            ],
            "ñ¿¡áíóú",
        ),
        builtin(
            "de-DE",
            "German",
            &[
                "der", "das", "und", "ist", "nicht", "ein", "eine", "ich", "mit", "auf", "sie",
                "wir",
            ],
            "äöüß",
        ),
        builtin(
            "it-IT",
            "Italian",
            &["il", "di", "che", "della", "sono", "questo", "gli", "perché", "molto", "anche"],
            "ìò",
        ),
        builtin(
            "pt-BR",
            "Portuguese",
            &["não", "uma", "com", "para", "são", "você", "muito", "também", "obrigado", "isso"],
            "ãõ",
        ),
        builtin("ru-RU", "Russian", &["и", "в", "не", "на", "что", "это", "как"], "а-яё"),
        builtin("ja-JP", "Japanese", &[], r"\p{Hiragana}\p{Katakana}"),
        builtin("ko-KR", "Korean", &[], r"\p{Hangul}"),
        builtin("zh-CN", "Chinese", &[], r"\p{Han}"),
        builtin("ar-SA", "Arabic", &[], r"\p{Arabic}"),
        builtin("hi-IN", "Hindi", &[], r"\p{Devanagari}"),
    ]
});

/// The built-in signature table, in scoring order: French, Spanish, German, Italian, Portuguese,
/// Russian, Japanese, Korean, Chinese, Arabic, Hindi.
pub fn builtin_signatures() -> &'static [LanguageSignature] {
    &BUILTIN
}
