use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use textplots::Plot;

use taixiu_core::models::{Outcome, PatternSample, RoundSnapshot, Verdict};
use taixiu_core::scoreboard::{ScoreboardEntry, ScoreboardStats};

use crate::ensemble::backtest::BacktestReport;
use crate::ensemble::EnsembleResult;
use crate::service::PredictionReport;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn outcome_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::High => Color::Red,
        Outcome::Low => Color::Blue,
    }
}

fn verdict_cell(verdict: Verdict) -> Cell {
    let cell = Cell::new(verdict.to_string());
    match verdict.outcome() {
        Some(outcome) => cell.fg(outcome_color(outcome)),
        None => cell.fg(Color::Yellow),
    }
}

fn value_text(v: &Option<serde_json::Value>) -> String {
    match v {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "—".to_string(),
    }
}

pub fn display_report(report: &PredictionReport) {
    display_snapshot(&report.snapshot);
    display_verdict(&report.result);
    if !report.result.votes.is_empty() {
        display_votes(&report.result);
    }
    if let Some(entry) = &report.recorded {
        let status = if entry.was_correct { "gagné" } else { "perdu" };
        println!(
            "\nManche {} enregistrée : prédit {}, réel {} ({status}).",
            entry.session_id, entry.predicted, entry.actual
        );
    }
}

pub fn display_snapshot(snapshot: &RoundSnapshot) {
    println!("\n== Manche courante ==\n");

    let mut table = new_table();
    table.set_header(vec!["Session", "Dés", "Total", "Résultat", "Prochaine"]);
    table.add_row(vec![
        value_text(&snapshot.session),
        snapshot.dice.clone().unwrap_or_else(|| "—".to_string()),
        value_text(&snapshot.total),
        snapshot.result.clone().unwrap_or_else(|| "—".to_string()),
        snapshot
            .next_session
            .map(|s| s.to_string())
            .unwrap_or_else(|| "—".to_string()),
    ]);
    println!("{table}");
}

pub fn display_verdict(result: &EnsembleResult) {
    println!("\n== Prédiction ==\n");

    let mut table = new_table();
    table.set_header(vec!["Verdict", "Confiance", "Votes Tài", "Votes Xỉu"]);
    table.add_row(vec![
        verdict_cell(result.verdict),
        Cell::new(result.confidence_label()),
        Cell::new(format!("{}/{}", result.votes_high, result.total_votes())),
        Cell::new(format!("{}/{}", result.votes_low, result.total_votes())),
    ]);
    println!("{table}");
    println!("\n{}", result.summary);
}

pub fn display_votes(result: &EnsembleResult) {
    println!("\n── Votes des prédicteurs ──");

    let mut table = new_table();
    table.set_header(vec!["#", "Prédicteur", "Fenêtre", "Vote"]);
    for (i, vote) in result.votes.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&vote.name),
            Cell::new(&vote.label),
            Cell::new(vote.outcome).fg(outcome_color(vote.outcome)),
        ]);
    }
    println!("{table}");
}

pub fn display_rationale(result: &EnsembleResult) {
    println!("\n── Justification ──\n");
    println!("{}", result.rationale);
}

pub fn display_samples(samples: &[PatternSample]) {
    println!("\n== Motifs extraits ({}) ==\n", samples.len());

    let mut table = new_table();
    table.set_header(vec!["#", "Type", "Motif", "Suivant"]);
    for (i, sample) in samples.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(sample.kind),
            Cell::new(sample.key()),
            Cell::new(sample.next).fg(outcome_color(sample.next)),
        ]);
    }
    println!("{table}");

    let high = taixiu_core::models::samples_leading_high(samples);
    println!("  {high} mènent à Tài, {} mènent à Xỉu", samples.len() - high);
}

pub fn display_scoreboard_stats(stats: &ScoreboardStats) {
    println!("\n== Tableau des scores ==\n");

    let mut table = new_table();
    table.set_header(vec!["Prédictions", "Correctes", "Incorrectes", "Taux de réussite"]);
    table.add_row(vec![
        stats.total_predictions.to_string(),
        stats.correct_predictions.to_string(),
        stats.incorrect_predictions.to_string(),
        stats.win_rate_percent.clone(),
    ]);
    println!("{table}");
}

pub fn display_scoreboard_history(entries: &[ScoreboardEntry], limit: usize) {
    if entries.is_empty() {
        println!("  (Aucune prédiction enregistrée)");
        return;
    }

    let mut table = new_table();
    table.set_header(vec!["Session", "Prédit", "Réel", "Résultat", "Confiance", "Heure"]);
    for entry in entries.iter().take(limit) {
        let status = if entry.was_correct {
            Cell::new("✓").fg(Color::Green)
        } else {
            Cell::new("✗").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(&entry.session_id),
            Cell::new(entry.predicted).fg(outcome_color(entry.predicted)),
            Cell::new(entry.actual).fg(outcome_color(entry.actual)),
            status,
            Cell::new(format!("{}%", entry.confidence)),
            Cell::new(entry.recorded_at.format("%H:%M:%S")),
        ]);
    }
    println!("{table}");
}

pub fn display_backtest(report: &BacktestReport) {
    println!("\n== Backtest walk-forward ==\n");
    println!(
        "  {} manches évaluées, {} ignorées (verdict indéterminé ou résultat inconnu)",
        report.evaluated, report.skipped
    );
    display_scoreboard_stats(&report.stats);

    if report.predictors.is_empty() {
        return;
    }

    println!("\n── Précision par prédicteur ──");
    let mut table = new_table();
    table.set_header(vec!["Fenêtre", "Prédicteur", "Correctes", "Total", "Précision", ""]);
    for p in &report.predictors {
        let rate = p.hit_rate();
        let bar = "█".repeat((rate * 30.0).round() as usize);
        table.add_row(vec![
            p.label.clone(),
            p.name.clone(),
            p.correct.to_string(),
            p.total.to_string(),
            format!("{:.1}%", rate * 100.0),
            bar,
        ]);
    }
    println!("{table}");
}

pub fn display_backtest_chart(report: &BacktestReport) {
    println!("\n== Taux de réussite cumulé (%) ==\n");

    let points: Vec<(f32, f32)> = report
        .rolling
        .iter()
        .map(|&(t, rate)| (t as f32, rate as f32))
        .collect();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        println!("  (Pas de données à afficher)");
        return;
    };

    let x_min = first.0;
    let x_max = if last.0 > x_min { last.0 } else { x_min + 1.0 };
    let shape = textplots::Shape::Lines(&points);
    let mut chart = textplots::Chart::new_with_y_range(120, 40, x_min, x_max, 0.0, 100.0);
    println!("{}", chart.lineplot(&shape));
}
