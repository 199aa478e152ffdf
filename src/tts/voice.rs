use serde::{Deserialize, Serialize};
use strum_macros::{EnumString, IntoStaticStr};

/// A voice as listed by the speech engine.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    /// The display name, unique within the engine's listing.
    pub name: String,
    /// The BCP 47 language tag, e.g. `fr-FR`.
    pub language: String,
    /// Whether the engine uses this voice when none is specified.
    pub is_default: bool,
    /// Whether the voice is rendered locally rather than by a remote service.
    pub local_service: bool,
}

impl VoiceDescriptor {
    /// Creates a non-default, local voice.
    pub fn new<N: Into<String>, L: Into<String>>(name: N, language: L) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            is_default: false,
            local_service: true,
        }
    }

    /// Marks this voice as the engine default.
    pub fn default_voice(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Marks this voice as rendered by a remote service.
    pub fn remote(mut self) -> Self {
        self.local_service = false;
        self
    }

    /// Returns the primary subtag of the voice's language, e.g. `fr` for `fr-FR`.
    pub fn primary_language(&self) -> &str {
        primary_subtag(&self.language)
    }
}

/// Returns the primary subtag of a language tag, e.g. `pt` for `pt-BR` or `zh` for `zh_Hant`.
pub fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}

/// The gender a voice name can advertise.
#[derive(
    Debug, PartialEq, Eq, Hash, Clone, Copy, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum VoiceGender {
    Female,
    Male,
    Neutral,
}

#[derive(Debug, Clone)]
enum Condition {
    Language(String),
    NameContains(String),
    Gender(VoiceGender),
    LocalService(bool),
}

impl Condition {
    fn matches(&self, voice: &VoiceDescriptor) -> bool {
        match self {
            Self::Language(primary) => voice.primary_language().eq_ignore_ascii_case(primary),
            Self::NameContains(needle) => {
                voice.name.to_lowercase().contains(&needle.to_lowercase())
            }
            Self::Gender(gender) => carries_gender(&voice.name, *gender),
            Self::LocalService(local) => voice.local_service == *local,
        }
    }
}

fn carries_gender(name: &str, gender: VoiceGender) -> bool {
    let name = name.to_ascii_lowercase();
    let marker = <&'static str>::from(gender).to_ascii_lowercase();
    // "male" is also a substring of "female".
    name.match_indices(&marker)
        .any(|(at, _)| gender != VoiceGender::Male || !name[..at].ends_with("fe"))
}

/// A set of criteria a voice has to meet. An empty selector matches every voice.
#[derive(Debug, Clone, Default)]
pub struct VoiceSelector {
    conditions: Vec<Condition>,
}

impl VoiceSelector {
    /// Creates an empty selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the voice's primary language subtag to match that of the given tag, ignoring
    /// case.
    pub fn language_eq<S: AsRef<str>>(self, language: S) -> Self {
        let primary = primary_subtag(language.as_ref()).to_owned();
        self.append_condition(Condition::Language(primary))
    }

    /// Requires the voice's name to contain the given substring, ignoring case.
    pub fn name_contains<S: AsRef<str>>(self, needle: S) -> Self {
        self.append_condition(Condition::NameContains(needle.as_ref().to_owned()))
    }

    /// Requires the voice's name to contain the given gender, ignoring case. The marker may be
    /// glued to other words (as in "DeniseFemaleNeural"), but `Male` never matches inside
    /// "Female".
    pub fn gender_eq(self, gender: VoiceGender) -> Self {
        self.append_condition(Condition::Gender(gender))
    }

    /// Requires the voice to be rendered locally (`true`) or remotely (`false`).
    pub fn local_service_eq(self, local: bool) -> Self {
        self.append_condition(Condition::LocalService(local))
    }

    /// Returns `true` if the voice meets every condition.
    pub fn matches(&self, voice: &VoiceDescriptor) -> bool {
        self.conditions.iter().all(|condition| condition.matches(voice))
    }

    /// Returns the matching voices, in their original order.
    pub fn filter<'s, 'v: 's>(
        &'s self,
        voices: &'v [VoiceDescriptor],
    ) -> impl Iterator<Item = &'v VoiceDescriptor> + 's {
        voices.iter().filter(move |voice| self.matches(voice))
    }

    fn append_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// Decides which voice to preselect for a detected language.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct VoicePreference {
    /// Voices whose name contains this marker are preferred over all others.
    pub quality_marker: String,
    /// Among voices without the quality marker, those carrying this gender in their name win.
    pub gender: VoiceGender,
}

impl Default for VoicePreference {
    fn default() -> Self {
        Self {
            quality_marker: "Premium".to_owned(),
            gender: VoiceGender::Female,
        }
    }
}

impl VoicePreference {
    /// Picks the voice for the given language tag: the first voice of that language carrying the
    /// quality marker, else the first carrying the gender marker, else the first of that
    /// language. Returns `None` if no voice speaks the language.
    pub fn pick<'v>(
        &self,
        voices: &'v [VoiceDescriptor],
        language: &str,
    ) -> Option<&'v VoiceDescriptor> {
        let selector = VoiceSelector::new().language_eq(language);
        let candidates: Vec<&VoiceDescriptor> = selector.filter(voices).collect();

        let quality = VoiceSelector::new().name_contains(&self.quality_marker);
        let gendered = VoiceSelector::new().gender_eq(self.gender);

        candidates
            .iter()
            .find(|voice| quality.matches(voice))
            .or_else(|| candidates.iter().find(|voice| gendered.matches(voice)))
            .or_else(|| candidates.first())
            .copied()
    }

    /// Reorders the voices so that those speaking the given language come first. The relative
    /// order within both groups is kept.
    pub fn rank<'v>(
        &self,
        voices: &'v [VoiceDescriptor],
        language: &str,
    ) -> Vec<&'v VoiceDescriptor> {
        let selector = VoiceSelector::new().language_eq(language);
        let (mut matching, others): (Vec<_>, Vec<_>) =
            voices.iter().partition(|voice| selector.matches(voice));
        matching.extend(others);
        matching
    }
}
