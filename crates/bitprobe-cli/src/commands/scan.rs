use bitprobe_core::{Registry, StaticCatalog};

pub fn run() {
    println!("Scanning test catalog...\n");
    for line in catalog_listing(&Registry::canonical(), &bitprobe_tests::catalog()) {
        println!("{line}");
    }
}

/// One block per module (exports and the test names bound to them),
/// followed by any registry entry that points at a missing module or export.
fn catalog_listing(registry: &Registry, catalog: &StaticCatalog) -> Vec<String> {
    let mut lines = Vec::new();
    let mut module_count = 0;

    for module in catalog.modules() {
        module_count += 1;
        lines.push(format!("  {}", module.name()));
        for export in module.exports() {
            let bound: Vec<&str> = registry
                .specs()
                .iter()
                .filter(|s| s.module == module.name() && s.callable == export)
                .map(|s| s.name)
                .collect();
            let tag = if bound.is_empty() {
                "(unused)".to_string()
            } else {
                bound.join(", ")
            };
            lines.push(format!("    {export:<45} {tag}"));
        }
    }
    if module_count == 0 {
        lines.push("  (none found)".to_string());
    }

    let broken: Vec<String> = registry
        .specs()
        .iter()
        .filter(|s| {
            !catalog
                .modules()
                .any(|m| m.name() == s.module && m.get(s.callable).is_some())
        })
        .map(|s| format!("  \u{274C} {:<25} -> {}.{}", s.name, s.module, s.callable))
        .collect();

    lines.push(String::new());
    if broken.is_empty() {
        lines.push(format!(
            "All {} registered tests resolve ({module_count} modules).",
            registry.len()
        ));
    } else {
        lines.push(format!("{} registered test(s) do not resolve:", broken.len()));
        lines.extend(broken);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_catalog_resolves() {
        let lines = catalog_listing(&Registry::canonical(), &bitprobe_tests::catalog());
        assert!(lines.iter().any(|l| l == "  frequency"));
        assert!(
            lines
                .iter()
                .any(|l| l.contains("RunTest.run_test") && l.ends_with("runs"))
        );
        assert_eq!(
            lines.last().map(String::as_str),
            Some("All 15 registered tests resolve (11 modules).")
        );
    }

    #[test]
    fn test_missing_module_is_flagged() {
        let mut catalog = bitprobe_tests::catalog();
        catalog.remove("runs");
        let lines = catalog_listing(&Registry::canonical(), &catalog);
        assert!(lines.contains(&"2 registered test(s) do not resolve:".to_string()));
        assert!(lines.iter().any(|l| l.contains("longest_run")));
    }

    #[test]
    fn test_empty_catalog() {
        let lines = catalog_listing(&Registry::canonical(), &StaticCatalog::new());
        assert!(lines.contains(&"  (none found)".to_string()));
        assert!(lines.contains(&"15 registered test(s) do not resolve:".to_string()));
    }
}
