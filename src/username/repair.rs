use serde::{Deserialize, Serialize};

/// Two character infix that replaced a lost `.` separator.
pub const MB_TOKEN: &str = "mb";
pub const MB_TOKEN_LENGTH: usize = 2;

/// Four letter token that replaced `joao` in front of the infix.
pub const JOTA_PREFIX: &str = "jota";
pub const JOTA_PREFIX_LENGTH: usize = 4;

/// Replacement for `jota` + `mb`.
pub const JOAO_PREFIX: &str = "joao.";

const DOT: char = '.';

/// Known bad values with their verified good counterparts. Checked before any
/// pattern rule, so one-off fixes can be added here without touching the rules.
pub const LITERAL_OVERRIDES: &[(&str, &str)] = &[("jotambbarbosa", "joao.barbosa")];

/// Which rule produced a correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairRule {
    /// Exact match in [`LITERAL_OVERRIDES`]
    LiteralOverride,
    /// `jota` + `mb` + suffix becomes `joao.` + suffix
    JotaPrefix,
    /// `mb` between two ASCII letters becomes `.`
    DotInfix,
}

impl std::fmt::Display for RepairRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepairRule::LiteralOverride => write!(f, "literal_override"),
            RepairRule::JotaPrefix => write!(f, "jota_prefix"),
            RepairRule::DotInfix => write!(f, "dot_infix"),
        }
    }
}

/// Outcome of running the heuristic over a single username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub original: String,
    pub corrected: String,
    pub changed: bool,
    pub rule: Option<RepairRule>,
}

impl Correction {
    fn unchanged(input: &str) -> Self {
        Self {
            original: input.to_string(),
            corrected: input.to_string(),
            changed: false,
            rule: None,
        }
    }

    fn fixed(input: &str, corrected: String, rule: RepairRule) -> Self {
        Self {
            original: input.to_string(),
            changed: corrected != input,
            corrected,
            rule: Some(rule),
        }
    }
}

/// Returns the username the heuristic believes was intended. Inputs that
/// match no corruption signature come back unchanged.
pub fn repair_username(input: &str) -> String {
    analyze_username(input).corrected
}

/// Runs the rules in order and reports the first one that fires.
///
/// Only the first occurrence of [`MB_TOKEN`] is considered. The infix rule
/// is a best-effort guess and also rewrites legitimate names that happen to
/// contain `mb` between two letters.
pub fn analyze_username(input: &str) -> Correction {
    if input.is_empty() {
        return Correction::unchanged(input);
    }

    if let Some(good) = literal_override(input) {
        tracing::debug!(username = %input, corrected = %good, "literal username override");
        return Correction::fixed(input, good.to_string(), RepairRule::LiteralOverride);
    }

    let Some(idx) = input.find(MB_TOKEN) else {
        return Correction::unchanged(input);
    };

    // "mb" is ASCII, so both ends of the match are char boundaries
    let prefix = &input[..idx];
    let suffix = &input[idx + MB_TOKEN_LENGTH..];

    if suffix.is_empty() {
        return Correction::unchanged(input);
    }

    if idx >= JOTA_PREFIX_LENGTH - 1 && prefix == JOTA_PREFIX {
        let corrected = format!("{JOAO_PREFIX}{suffix}");
        tracing::debug!(username = %input, %corrected, "jota prefix correction");
        return Correction::fixed(input, corrected, RepairRule::JotaPrefix);
    }

    let before = prefix.chars().next_back();
    let after = suffix.chars().next();
    let between_letters = matches!(
        (before, after),
        (Some(b), Some(a)) if b.is_ascii_alphabetic() && a.is_ascii_alphabetic()
    );
    if between_letters {
        let mut corrected = String::with_capacity(input.len());
        corrected.push_str(prefix);
        corrected.push(DOT);
        corrected.push_str(suffix);
        tracing::debug!(username = %input, %corrected, "possible dot infix correction");
        return Correction::fixed(input, corrected, RepairRule::DotInfix);
    }

    Correction::unchanged(input)
}

fn literal_override(input: &str) -> Option<&'static str> {
    LITERAL_OVERRIDES
        .iter()
        .find(|(bad, _)| *bad == input)
        .map(|(_, good)| *good)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stays_empty() {
        assert_eq!(repair_username(""), "");
        assert_eq!(analyze_username("").rule, None);
    }

    #[test]
    fn literal_override_wins_over_prefix_rule() {
        let c = analyze_username("jotambbarbosa");
        assert_eq!(c.corrected, "joao.barbosa");
        assert_eq!(c.rule, Some(RepairRule::LiteralOverride));
        assert!(c.changed);
    }

    #[test]
    fn jota_prefix() {
        let c = analyze_username("jotambcarvalho");
        assert_eq!(c.corrected, "joao.carvalho");
        assert_eq!(c.rule, Some(RepairRule::JotaPrefix));
    }

    #[test]
    fn jota_prefix_keeps_non_alpha_suffix() {
        // the prefix rule does not look at the character after the token
        assert_eq!(repair_username("jotamb42"), "joao.42");
    }

    #[test]
    fn jota_is_case_sensitive() {
        // falls through to the infix rule instead
        let c = analyze_username("JOTAmbsilva");
        assert_eq!(c.corrected, "JOTA.silva");
        assert_eq!(c.rule, Some(RepairRule::DotInfix));
    }

    #[test]
    fn dot_infix() {
        let c = analyze_username("pedrombsilva");
        assert_eq!(c.corrected, "pedro.silva");
        assert_eq!(c.rule, Some(RepairRule::DotInfix));
    }

    #[test]
    fn dot_infix_accepts_uppercase_neighbours() {
        assert_eq!(repair_username("AnaMBx"), "AnaMBx");
        assert_eq!(repair_username("AnAmbXy"), "AnA.Xy");
    }

    #[test]
    fn token_at_start_is_ignored() {
        assert_eq!(analyze_username("mbjoao"), Correction::unchanged("mbjoao"));
    }

    #[test]
    fn token_at_end_is_ignored() {
        assert_eq!(repair_username("jotamb"), "jotamb");
        assert_eq!(repair_username("pedromb"), "pedromb");
    }

    #[test]
    fn digits_around_token_are_ignored() {
        assert_eq!(repair_username("ana1mbsilva"), "ana1mbsilva");
        assert_eq!(repair_username("anamb2silva"), "anamb2silva");
    }

    #[test]
    fn non_ascii_neighbours_are_not_letters() {
        assert_eq!(repair_username("joãmbsilva"), "joãmbsilva");
        assert_eq!(repair_username("anambésilva"), "anambésilva");
    }

    #[test]
    fn only_first_occurrence_is_inspected() {
        // first "mb" sits between digits, so the later one is never tried
        assert_eq!(repair_username("1mb2pedrombsilva"), "1mb2pedrombsilva");
        // first occurrence fires, second stays as is
        assert_eq!(repair_username("anambbiambcosta"), "ana.biambcosta");
    }

    #[test]
    fn no_token() {
        assert_eq!(repair_username("joaosilva"), "joaosilva");
    }

    #[test]
    fn overrides_are_well_formed() {
        for (bad, good) in LITERAL_OVERRIDES {
            assert_ne!(bad, good);
            assert_eq!(repair_username(bad), *good);
        }
    }
}
