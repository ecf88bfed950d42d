use std::fmt::Write;

use taixiu_core::models::{format_slots, samples_leading_high, tail, PatternSample, Slot, Verdict};

use super::ModelVote;

/// Nombre de manches rappelées en fin de justification.
const REFERENCE_SPAN: usize = 10;

const DISCLAIMER: &str = "Avertissement : l'analyse des cầu repose uniquement sur l'historique, \
elle ne garantit aucune exactitude. Combinez-la avec une gestion de mise (Kelly ou sizing) \
et ne l'utilisez que comme une source de référence parmi d'autres.";

pub fn summary(
    sample_count: usize,
    total_votes: usize,
    votes_high: usize,
    votes_low: usize,
    verdict: Verdict,
) -> String {
    format!(
        "À partir de {sample_count} motifs extraits, ensemble de {total_votes} prédicteurs (2 variantes par heuristique). \
Résultat : {votes_high}/{total_votes} votes Tài, {votes_low}/{total_votes} votes Xỉu. Prédiction principale : {verdict}."
    )
}

pub struct RationaleInput<'a> {
    pub verdict: Verdict,
    pub confidence: u8,
    pub votes_high: usize,
    pub votes_low: usize,
    pub samples: &'a [PatternSample],
    pub votes: &'a [ModelVote],
    pub history: &'a [Slot],
}

pub fn rationale(input: &RationaleInput<'_>) -> String {
    let total = input.votes.len();
    let high_lead = samples_leading_high(input.samples);
    let mut text = String::new();

    let _ = writeln!(
        text,
        "SYNTHÈSE : prédiction principale **{}** (confiance {}%). Votes : Tài {}/{total}, Xỉu {}/{total}.",
        input.verdict, input.confidence, input.votes_high, input.votes_low
    );
    text.push('\n');

    let _ = writeln!(
        text,
        "Détail des motifs ({} au total) : {high_lead} mènent à Tài, {} mènent à Xỉu. \
Les motifs de tête couvrent les cầu bệt, 1-1, 2-2, 1-2-1, 2-1-2, 3-1, 1-3, 2-3, 3-2, 4-1 et 1-4.",
        input.samples.len(),
        input.samples.len() - high_lead
    );
    text.push('\n');

    text.push_str("Justification de chaque prédicteur :\n");
    for (i, vote) in input.votes.iter().enumerate() {
        let _ = writeln!(text, "• IA #{} : {}", i + 1, vote.rationale);
    }

    let _ = writeln!(
        text,
        "\nDonnées de référence ({REFERENCE_SPAN} dernières manches) : {}.",
        format_slots(tail(input.history, REFERENCE_SPAN))
    );
    let _ = writeln!(text, "\n{DISCLAIMER}");

    text
}
