pub mod convert;
pub mod run;
pub mod scan;

use bitprobe_core::Registry;

/// Parse a comma-separated test selection. `"all"` (or an empty string)
/// expands to every registered name in registry order. Unknown names are
/// kept so the run can report them.
pub fn parse_tests(selection: &str) -> Vec<String> {
    let trimmed = selection.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        return Registry::canonical()
            .names()
            .into_iter()
            .map(String::from)
            .collect();
    }
    trimmed
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // parse_tests tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_all_expands_to_registry() {
        let tests = parse_tests("all");
        assert_eq!(tests.len(), 15);
        assert_eq!(tests[0], "frequency");
        assert_eq!(tests[14], "random_excursions_variant");
    }

    #[test]
    fn test_parse_empty_means_all() {
        assert_eq!(parse_tests("  ").len(), 15);
        assert_eq!(parse_tests("ALL").len(), 15);
    }

    #[test]
    fn test_parse_comma_separated_trims() {
        assert_eq!(
            parse_tests(" frequency, runs ,,serial"),
            vec!["frequency", "runs", "serial"]
        );
    }

    #[test]
    fn test_parse_keeps_unknown_names() {
        assert_eq!(parse_tests("frequency,bogus"), vec!["frequency", "bogus"]);
    }
}
