use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "Tài")]
    High,
    #[serde(rename = "Xỉu")]
    Low,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::High => "Tài",
            Outcome::Low => "Xỉu",
        }
    }

    /// Décode un libellé brut. Seuls "Tài" et "Xỉu" (après trim) sont reconnus.
    pub fn from_label(raw: &str) -> Option<Outcome> {
        match raw.trim() {
            "Tài" => Some(Outcome::High),
            "Xỉu" => Some(Outcome::Low),
            _ => None,
        }
    }

    pub fn opposite(&self) -> Outcome {
        match self {
            Outcome::High => Outcome::Low,
            Outcome::Low => Outcome::High,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Case de l'historique : `None` quand le résultat brut n'a pas pu être décodé.
/// La case garde sa position pour le fenêtrage mais ne satisfait aucune égalité.
pub type Slot = Option<Outcome>;

/// Égalité entre cases : vraie seulement si les deux sont connues et identiques.
pub fn same(a: Slot, b: Slot) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x == y)
}

/// `true` si `needle` apparaît de façon contiguë dans `haystack` (égalité stricte de cases).
pub fn contains_sequence(haystack: &[Slot], needle: &[Outcome]) -> bool {
    if needle.is_empty() || haystack.len() < needle.len() {
        return false;
    }
    haystack
        .windows(needle.len())
        .any(|w| w.iter().zip(needle).all(|(&s, &o)| s == Some(o)))
}

/// Les `n` dernières cases (ou tout l'historique s'il est plus court).
pub fn tail(history: &[Slot], n: usize) -> &[Slot] {
    &history[history.len().saturating_sub(n)..]
}

pub fn count_outcome(slots: &[Slot], outcome: Outcome) -> usize {
    slots.iter().filter(|&&s| s == Some(outcome)).count()
}

/// Dernière case connue, en partant de la fin.
pub fn last_known(slots: &[Slot]) -> Option<Outcome> {
    slots.iter().rev().find_map(|&s| s)
}

/// Clé d'affichage "Tài-Xỉu-Tài" ; une case inconnue s'affiche "?".
pub fn format_slots(slots: &[Slot]) -> String {
    slots
        .iter()
        .map(|s| s.map(|o| o.label()).unwrap_or("?"))
        .collect::<Vec<_>>()
        .join("-")
}

pub fn format_outcomes(outcomes: &[Outcome]) -> String {
    outcomes.iter().map(|o| o.label()).collect::<Vec<_>>().join("-")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleKind {
    WindowMatch,
    Run,
    Alternation,
    Canonical,
    Pad,
}

impl std::fmt::Display for SampleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleKind::WindowMatch => write!(f, "MATCH"),
            SampleKind::Run => write!(f, "BỆT"),
            SampleKind::Alternation => write!(f, "1-1"),
            SampleKind::Canonical => write!(f, "CANON"),
            SampleKind::Pad => write!(f, "PAD"),
        }
    }
}

/// Motif extrait de l'historique et résultat qui est supposé le suivre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSample {
    pub kind: SampleKind,
    pub pattern: Vec<Slot>,
    pub next: Outcome,
}

impl PatternSample {
    pub fn new(kind: SampleKind, pattern: Vec<Slot>, next: Outcome) -> Self {
        Self { kind, pattern, next }
    }

    pub fn key(&self) -> String {
        format_slots(&self.pattern)
    }
}

/// Nombre d'échantillons qui mènent à `Tài`.
pub fn samples_leading_high(samples: &[PatternSample]) -> usize {
    samples.iter().filter(|s| s.next == Outcome::High).count()
}

/// Verdict final de l'ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    High,
    Low,
    Undetermined,
    NoData,
}

impl Verdict {
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Verdict::High => Some(Outcome::High),
            Verdict::Low => Some(Outcome::Low),
            Verdict::Undetermined | Verdict::NoData => None,
        }
    }
}

impl From<Outcome> for Verdict {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::High => Verdict::High,
            Outcome::Low => Verdict::Low,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::High => write!(f, "Tài"),
            Verdict::Low => write!(f, "Xỉu"),
            Verdict::Undetermined => write!(f, "Indéterminé"),
            Verdict::NoData => write!(f, "Pas assez de données"),
        }
    }
}

/// Champs de la manche courante tels que la source les expose.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub session: Option<serde_json::Value>,
    pub dice: Option<String>,
    pub total: Option<serde_json::Value>,
    pub result: Option<String>,
    pub next_session: Option<u64>,
}

impl RoundSnapshot {
    /// Identifiant de manche sous forme texte, si présent.
    pub fn session_id(&self) -> Option<String> {
        match &self.session {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn actual(&self) -> Option<Outcome> {
        self.result.as_deref().and_then(Outcome::from_label)
    }
}
