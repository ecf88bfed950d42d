use std::collections::HashMap;

use taixiu_core::models::{Outcome, Slot};

/// Longueurs de fenêtre minées, la plus longue d'abord.
pub const WINDOW_LENGTHS: [usize; 3] = [5, 4, 3];

/// Comptage des résultats qui suivent une clé.
/// `total` compte chaque occurrence, même quand le suivant est inconnu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NextCounts {
    pub high: usize,
    pub low: usize,
    pub total: usize,
}

impl NextCounts {
    pub fn add(&mut self, follower: Slot) {
        self.total += 1;
        match follower {
            Some(Outcome::High) => self.high += 1,
            Some(Outcome::Low) => self.low += 1,
            None => {}
        }
    }

    /// Majorité des suivants ; égalité → Tài.
    pub fn majority(&self) -> Outcome {
        if self.high >= self.low {
            Outcome::High
        } else {
            Outcome::Low
        }
    }

    pub fn decisiveness(&self) -> usize {
        self.high.abs_diff(self.low)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowStat {
    pub pattern: Vec<Slot>,
    pub counts: NextCounts,
}

impl WindowStat {
    pub fn score(&self) -> usize {
        self.counts.total * self.counts.decisiveness()
    }
}

/// Clé d'une fenêtre. Une fenêtre qui contient une case inconnue n'égale
/// aucune autre : elle est identifiée par sa position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum WindowKey {
    Known(Vec<Outcome>),
    Positioned { start: usize, len: usize },
}

/// Fenêtre de longueur `n` commençant en `start`, si toutes ses cases sont connues.
/// Une case inconnue n'égale rien : la fenêtre ne peut jamais se répéter.
pub fn known_window(slots: &[Slot], start: usize, n: usize) -> Option<Vec<Outcome>> {
    slots.get(start..start + n)?.iter().copied().collect()
}

/// Statistiques de toutes les fenêtres 5, 4 puis 3 ayant un suivant,
/// dans l'ordre de première apparition.
pub fn window_stats(history: &[Slot]) -> Vec<WindowStat> {
    let mut index: HashMap<WindowKey, usize> = HashMap::new();
    let mut stats: Vec<WindowStat> = Vec::new();

    for n in WINDOW_LENGTHS {
        for i in 0..history.len().saturating_sub(n) {
            let key = match known_window(history, i, n) {
                Some(outcomes) => WindowKey::Known(outcomes),
                None => WindowKey::Positioned { start: i, len: n },
            };
            let follower = history[i + n];
            let pos = *index.entry(key).or_insert_with(|| {
                stats.push(WindowStat { pattern: history[i..i + n].to_vec(), counts: NextCounts::default() });
                stats.len() - 1
            });
            stats[pos].counts.add(follower);
        }
    }

    stats
}

/// Fenêtres triées par `total × |Tài − Xỉu|` décroissant.
/// Tri stable : à score égal, l'ordre de première apparition est conservé.
pub fn ranked_windows(history: &[Slot]) -> Vec<WindowStat> {
    let mut stats = window_stats(history);
    stats.sort_by(|a, b| b.score().cmp(&a.score()));
    stats
}

/// Index n-gramme → suivants, construit sur une fenêtre.
pub fn ngram_index(slots: &[Slot], n: usize) -> HashMap<Vec<Outcome>, NextCounts> {
    let mut map: HashMap<Vec<Outcome>, NextCounts> = HashMap::new();
    if n == 0 {
        return map;
    }
    for i in 0..slots.len().saturating_sub(n) {
        if let Some(key) = known_window(slots, i, n) {
            map.entry(key).or_default().add(slots[i + n]);
        }
    }
    map
}
