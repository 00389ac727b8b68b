//! Look up periods, categories and items by id or by name.
//!
//! An argument matches a row by full id, by name, by a qualified name such
//! as `Food/Grocery` or `Out/Savings`, or by an id prefix of at least four
//! characters. Ids compare without their braces, so a file that stores
//! `{...}` keys accepts the bare form too. Exact matches win over
//! case-insensitive ones.

use cashflow_core::{FlowKind, Id, Session};

use crate::errors::CliError;
use crate::ui::short_id;

const MIN_PREFIX: usize = 4;

/// A row an argument may refer to.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: Id,
    pub name: String,
    /// Other names the row answers to.
    pub aliases: Vec<String>,
    /// Shown when a name is ambiguous.
    pub label: String,
}

impl Candidate {
    fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

fn single_or_ambiguous<'a>(
    kind: &str,
    input: &str,
    matches: Vec<&'a Candidate>,
) -> Result<Option<&'a Candidate>, CliError> {
    match matches.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some(*only)),
        many => {
            let listed = many
                .iter()
                .map(|c| format!("{} ({})", c.label, short_id(&c.id)))
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::ambiguous(
                format!("\"{}\" matches {} {}s: {}", input, many.len(), kind, listed),
                "Use a qualified name or an id",
            ))
        }
    }
}

/// Pick the one candidate `input` refers to.
pub fn pick<'a>(
    kind: &str,
    input: &str,
    candidates: &'a [Candidate],
    list_command: &str,
) -> Result<&'a Candidate, CliError> {
    let input = input.trim();
    let bare = input.trim_start_matches('{').trim_end_matches('}');

    if let Some(found) = candidates
        .iter()
        .find(|c| c.id.as_str() == input || c.id.bare().eq_ignore_ascii_case(bare))
    {
        return Ok(found);
    }

    let exact = candidates
        .iter()
        .filter(|c| c.names().any(|name| name == input))
        .collect();
    if let Some(found) = single_or_ambiguous(kind, input, exact)? {
        return Ok(found);
    }

    let folded = candidates
        .iter()
        .filter(|c| c.names().any(|name| name.eq_ignore_ascii_case(input)))
        .collect();
    if let Some(found) = single_or_ambiguous(kind, input, folded)? {
        return Ok(found);
    }

    let hex_only = bare.chars().all(|ch| ch.is_ascii_hexdigit() || ch == '-');
    if bare.len() >= MIN_PREFIX && hex_only {
        let prefix = bare.to_ascii_lowercase();
        let by_prefix = candidates
            .iter()
            .filter(|c| c.id.bare().to_ascii_lowercase().starts_with(&prefix))
            .collect();
        if let Some(found) = single_or_ambiguous(kind, input, by_prefix)? {
            return Ok(found);
        }
    }

    Err(CliError::not_found(
        format!("No {} matches \"{}\"", kind, input),
        format!("Run `{}` to see them", list_command),
    ))
}

pub fn period_candidates(session: &Session) -> anyhow::Result<Vec<Candidate>> {
    Ok(session
        .periods()?
        .into_iter()
        .map(|p| Candidate {
            id: p.period_id,
            label: p.period_name.clone(),
            name: p.period_name,
            aliases: Vec::new(),
        })
        .collect())
}

pub fn category_candidates(
    session: &Session,
    flow: Option<FlowKind>,
) -> anyhow::Result<Vec<Candidate>> {
    Ok(session
        .category_map(flow)?
        .into_iter()
        .map(|c| {
            let qualified = format!("{}/{}", c.flow_name, c.category_name);
            Candidate {
                id: c.category_id,
                name: c.category_name,
                aliases: vec![qualified.clone()],
                label: qualified,
            }
        })
        .collect())
}

pub fn item_candidates(session: &Session) -> anyhow::Result<Vec<Candidate>> {
    Ok(session
        .item_map(None)?
        .into_iter()
        .map(|i| {
            let qualified = format!("{}/{}", i.category_name, i.item_name);
            let full = format!("{}/{}", i.flow_name, qualified);
            Candidate {
                id: i.item_id,
                name: i.item_name,
                aliases: vec![qualified, full.clone()],
                label: full,
            }
        })
        .collect())
}

/// Resolve a period argument to its id and name.
pub fn period(session: &Session, input: &str) -> anyhow::Result<(Id, String)> {
    let candidates = period_candidates(session)?;
    let found = pick("period", input, &candidates, "cashflow period list")?;
    Ok((found.id.clone(), found.name.clone()))
}

/// Resolve a category argument to its id and name.
pub fn category(session: &Session, input: &str) -> anyhow::Result<(Id, String)> {
    let candidates = category_candidates(session, None)?;
    let found = pick("category", input, &candidates, "cashflow category list")?;
    Ok((found.id.clone(), found.name.clone()))
}

/// Resolve an item argument to its id and qualified label.
pub fn item(session: &Session, input: &str) -> anyhow::Result<(Id, String)> {
    let candidates = item_candidates(session)?;
    let found = pick("item", input, &candidates, "cashflow item list")?;
    Ok((found.id.clone(), found.label.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, name: &str, alias: &str) -> Candidate {
        Candidate {
            id: id.parse().unwrap(),
            name: name.to_string(),
            aliases: vec![alias.to_string()],
            label: alias.to_string(),
        }
    }

    fn sample() -> Vec<Candidate> {
        vec![
            candidate("11111111-0000-4000-8000-000000000001", "Misc", "Food/Misc"),
            candidate("22222222-0000-4000-8000-000000000002", "Misc", "Debt/Misc"),
            candidate("33333333-0000-4000-8000-000000000003", "Grocery", "Food/Grocery"),
        ]
    }

    #[test]
    fn test_unique_name() {
        let all = sample();
        let found = pick("item", "Grocery", &all, "list").unwrap();
        assert_eq!(found.label, "Food/Grocery");
    }

    #[test]
    fn test_case_insensitive_fallback() {
        let all = sample();
        let found = pick("item", "grocery", &all, "list").unwrap();
        assert_eq!(found.name, "Grocery");
    }

    #[test]
    fn test_ambiguous_name_lists_choices() {
        let all = sample();
        let err = pick("item", "Misc", &all, "list").unwrap_err();
        match err {
            CliError::Ambiguous { message, .. } => {
                assert!(message.contains("Food/Misc (11111111)"));
                assert!(message.contains("Debt/Misc (22222222)"));
            }
            other => panic!("expected Ambiguous, got {:?}", other),
        }
    }

    #[test]
    fn test_qualified_name_disambiguates() {
        let all = sample();
        let found = pick("item", "Debt/Misc", &all, "list").unwrap();
        assert_eq!(found.id, all[1].id);
    }

    #[test]
    fn test_full_id_and_prefix() {
        let all = sample();
        let found = pick("item", "33333333-0000-4000-8000-000000000003", &all, "list").unwrap();
        assert_eq!(found.name, "Grocery");
        let found = pick("item", "2222", &all, "list").unwrap();
        assert_eq!(found.label, "Debt/Misc");
    }

    #[test]
    fn test_braced_ids_match_bare_input() {
        let all = vec![candidate(
            "{44444444-0000-4000-8000-000000000004}",
            "Rent",
            "Housing/Rent",
        )];
        let found = pick("item", "44444444-0000-4000-8000-000000000004", &all, "list").unwrap();
        assert_eq!(found.name, "Rent");
        let found = pick("item", "{44444444-0000-4000-8000-000000000004}", &all, "list").unwrap();
        assert_eq!(found.name, "Rent");
        let found = pick("item", "4444", &all, "list").unwrap();
        assert_eq!(found.name, "Rent");
    }

    #[test]
    fn test_unknown_is_not_found() {
        let all = sample();
        assert!(matches!(
            pick("item", "Yacht", &all, "cashflow item list"),
            Err(CliError::NotFound { .. })
        ));
    }

    #[test]
    fn test_session_lookups() {
        let mut session = Session::new_database().unwrap();
        session.add_period("Jan").unwrap();
        let (_, name) = period(&session, "jan").unwrap();
        assert_eq!(name, "Jan");

        let (_, label) = item(&session, "Food/Grocery").unwrap();
        assert_eq!(label, "Out/Food/Grocery");

        // Savings exists under both flows
        assert!(category(&session, "Savings").is_err());
        assert!(category(&session, "In/Savings").is_ok());
    }
}
