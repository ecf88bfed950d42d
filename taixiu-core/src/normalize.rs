use serde_json::Value;

use crate::models::{Outcome, RoundSnapshot, Slot};

const HISTORY_KEYS: [&str; 2] = ["Lich_su_phien", "history"];
const RESULT_KEYS: [&str; 3] = ["Ket_qua", "ket_qua", "result"];
const SESSION_KEYS: [&str; 3] = ["Phien", "phien", "session"];
const TOTAL_KEYS: [&str; 3] = ["Tong", "tong", "total"];
const DICE_KEYS: [&str; 2] = ["Xuc_xac", "dice"];

/// Premier alias présent et non vide (équivalent d'une chaîne de `||`).
fn field<'a>(obj: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| is_truthy(v))
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|x| x != 0.0).unwrap_or(true),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn decode_record(record: &Value) -> Slot {
    match record {
        Value::String(s) => Outcome::from_label(s),
        Value::Object(_) => field(record, &RESULT_KEYS)
            .and_then(Value::as_str)
            .and_then(Outcome::from_label),
        _ => None,
    }
}

/// Convertit le payload brut en séquence ordonnée (plus ancien en tête).
/// Les enregistrements indécodables deviennent des cases inconnues ;
/// la normalisation ne peut pas échouer.
pub fn normalize_history(raw: &Value) -> Vec<Slot> {
    let records = HISTORY_KEYS
        .iter()
        .filter_map(|k| raw.get(*k))
        .find_map(Value::as_array);

    match records {
        Some(records) => records.iter().map(decode_record).collect(),
        None => Vec::new(),
    }
}

fn dice_string(raw: &Value) -> Option<String> {
    let parts: Vec<&Value> = ["Xuc_xac_1", "Xuc_xac_2", "Xuc_xac_3"]
        .iter()
        .filter_map(|k| raw.get(*k))
        .filter(|v| !v.is_null())
        .collect();
    if parts.len() == 3 {
        return Some(
            parts
                .iter()
                .map(|v| value_text(v))
                .collect::<Vec<_>>()
                .join("-"),
        );
    }
    field(raw, &DICE_KEYS).map(value_text)
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Notation compacte : `T` = Tài, `X` = Xỉu, `?` = inconnu.
/// Espaces, tirets et virgules sont ignorés ; tout autre caractère donne une case inconnue.
pub fn parse_compact(s: &str) -> Vec<Slot> {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != ',')
        .map(|c| match c.to_ascii_uppercase() {
            'T' => Some(Outcome::High),
            'X' => Some(Outcome::Low),
            _ => None,
        })
        .collect()
}

/// Extrait les champs de la manche courante (session, dés, total, résultat).
pub fn extract_snapshot(raw: &Value) -> RoundSnapshot {
    let session = field(raw, &SESSION_KEYS).cloned();
    let next_session = session.as_ref().and_then(Value::as_u64).map(|s| s + 1);

    RoundSnapshot {
        session,
        dice: dice_string(raw),
        total: field(raw, &TOTAL_KEYS).cloned(),
        result: field(raw, &RESULT_KEYS).map(value_text),
        next_session,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::models::Outcome::{High as H, Low as L};

    #[test]
    fn test_normalize_lich_su_phien() {
        let raw = json!({
            "Lich_su_phien": [
                {"Phien": 1, "Ket_qua": "Tài"},
                {"Phien": 2, "ket_qua": "Xỉu"},
                {"Phien": 3, "result": " Tài "},
            ]
        });
        assert_eq!(normalize_history(&raw), vec![Some(H), Some(L), Some(H)]);
    }

    #[test]
    fn test_normalize_history_fallback_and_flat_list() {
        let raw = json!({ "history": ["Xỉu", {"result": "Tài"}, 42] });
        assert_eq!(normalize_history(&raw), vec![Some(L), Some(H), None]);
    }

    #[test]
    fn test_unknown_label_keeps_position() {
        let raw = json!({ "Lich_su_phien": [{"Ket_qua": "Tài"}, {"Ket_qua": "Bão"}, {}] });
        let history = normalize_history(&raw);
        assert_eq!(history.len(), 3);
        assert_eq!(history[1], None);
        assert_eq!(history[2], None);
    }

    #[test]
    fn test_missing_history_is_empty() {
        assert!(normalize_history(&json!({"foo": 1})).is_empty());
        assert!(normalize_history(&json!({"Lich_su_phien": "pas un tableau"})).is_empty());
        assert!(normalize_history(&json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_lich_su_phien_preferred_over_history() {
        let raw = json!({ "Lich_su_phien": ["Tài"], "history": ["Xỉu", "Xỉu"] });
        assert_eq!(normalize_history(&raw), vec![Some(H)]);
    }

    #[test]
    fn test_extract_snapshot_with_dice_triplet() {
        let raw = json!({
            "Phien": 2001,
            "Xuc_xac_1": 3, "Xuc_xac_2": 5, "Xuc_xac_3": 6,
            "Tong": 14,
            "Ket_qua": "Tài",
        });
        let snap = extract_snapshot(&raw);
        assert_eq!(snap.session, Some(json!(2001)));
        assert_eq!(snap.dice.as_deref(), Some("3-5-6"));
        assert_eq!(snap.total, Some(json!(14)));
        assert_eq!(snap.result.as_deref(), Some("Tài"));
        assert_eq!(snap.next_session, Some(2002));
    }

    #[test]
    fn test_extract_snapshot_aliases() {
        let raw = json!({ "session": "abc", "dice": "1-1-2", "total": 4, "result": "Xỉu" });
        let snap = extract_snapshot(&raw);
        assert_eq!(snap.session_id().as_deref(), Some("abc"));
        assert_eq!(snap.dice.as_deref(), Some("1-1-2"));
        assert_eq!(snap.next_session, None);
        assert_eq!(snap.actual(), Some(L));
    }

    #[test]
    fn test_parse_compact() {
        assert_eq!(parse_compact("T X-t,?x"), vec![Some(H), Some(L), Some(H), None, Some(L)]);
        assert!(parse_compact("").is_empty());
    }

    #[test]
    fn test_extract_snapshot_empty() {
        let snap = extract_snapshot(&json!({}));
        assert_eq!(snap, RoundSnapshot::default());
    }
}
