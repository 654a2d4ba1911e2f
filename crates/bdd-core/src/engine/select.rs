//! Filtro de selección de casos por path (`grep` / `grepv`).

use regex::Regex;

use crate::constants::PATH_SEPARATOR;

/// Une los nombres ancestro + nombre propio en la cadena que evalúan los
/// patrones de selección.
pub(crate) fn joined_path(path: &[String], name: &str) -> String {
    let mut parts: Vec<&str> = path.iter().map(String::as_str).collect();
    parts.push(name);
    parts.join(PATH_SEPARATOR)
}

/// Decide si un caso ejecuta. `grepv` (exclusión) se evalúa primero y tiene
/// precedencia; un path no excluido debe además coincidir con `grep` cuando
/// hay uno configurado. Sin `grep`, todo pasa.
pub(crate) fn case_selected(joined: &str,
                            grep: Option<&Regex>,
                            grepv: Option<&Regex>)
                            -> bool {
    if let Some(exclude) = grepv {
        if exclude.is_match(joined) {
            return false;
        }
    }
    match grep {
        Some(include) => include.is_match(joined),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    fn paths() -> Vec<String> {
        vec!["i1", "i2", "d i3"].into_iter().map(String::from).collect()
    }

    fn selected_with(grep: Option<&Regex>, grepv: Option<&Regex>) -> Vec<String> {
        paths().into_iter()
               .filter(|p| case_selected(p, grep, grepv))
               .collect()
    }

    #[test]
    fn no_patterns_selects_everything() {
        assert_eq!(selected_with(None, None), paths());
    }

    #[test]
    fn grep_keeps_only_matching_paths() {
        assert_eq!(selected_with(Some(&re("i1")), None), vec!["i1"]);
    }

    #[test]
    fn grepv_drops_matching_paths() {
        assert_eq!(selected_with(None, Some(&re("i2"))), vec!["i1", "d i3"]);
    }

    #[test]
    fn exclude_wins_over_include() {
        // "i1" matches both patterns; exclusion takes precedence.
        assert_eq!(selected_with(Some(&re("i")), Some(&re("i1"))),
                   vec!["i2", "d i3"]);
    }

    #[test]
    fn joined_path_appends_own_name() {
        let ancestors = vec!["r".to_string(), "d".to_string()];
        assert_eq!(joined_path(&ancestors, "i3"), "r d i3");
        assert_eq!(joined_path(&[], "i1"), "i1");
    }
}
