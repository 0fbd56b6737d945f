use crate::rules::extension;
use once_cell::sync::Lazy;
use std::collections::HashMap;

static LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        (".py", "Python"),
        (".js", "JavaScript"),
        (".html", "HTML"),
        (".css", "CSS"),
        (".java", "Java"),
        (".cs", "C#"),
        (".cpp", "C++"),
        (".c", "C"),
        (".go", "Go"),
        (".rb", "Ruby"),
        (".php", "PHP"),
        (".rs", "Rust"),
        (".kt", "Kotlin"),
        (".ts", "TypeScript"),
        (".tsx", "TypeScript React"),
        (".sql", "SQL"),
        (".sh", "Shell"),
        (".bat", "Batch"),
        (".json", "JSON"),
        (".xml", "XML"),
        (".yml", "YAML"),
        (".yaml", "YAML"),
        (".md", "Markdown"),
        (".replit", "Replit Config"),
        (".toml", "TOML"),
        (".pyi", "Python Stub"),
        (".jsm", "JavaScript Module"),
    ]
    .into_iter()
    .collect()
});

/// Returns the display language for a basename.
///
/// Only used in content block headers. Unknown extensions keep the raw
/// extension in the label.
#[must_use]
pub fn language_for(basename: &str) -> String {
    let ext = extension(basename);

    if ext.is_empty() && basename.eq_ignore_ascii_case("dockerfile") {
        return "Dockerfile".to_string();
    }

    LANGUAGES
        .get(ext.to_lowercase().as_str())
        .map_or_else(|| format!("Inconnu ({ext})"), |lang| (*lang).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_languages() {
        assert_eq!(language_for("app.py"), "Python");
        assert_eq!(language_for("App.TSX"), "TypeScript React");
        assert_eq!(language_for("docker-compose.yml"), "YAML");
    }

    #[test]
    fn test_dockerfile_by_name() {
        assert_eq!(language_for("Dockerfile"), "Dockerfile");
        assert_eq!(language_for("dockerfile"), "Dockerfile");
        assert_eq!(language_for("Dockerfile.dev"), "Inconnu (.dev)");
    }

    #[test]
    fn test_unknown_keeps_extension() {
        assert_eq!(language_for("schema.prisma"), "Inconnu (.prisma)");
        assert_eq!(language_for("Makefile"), "Inconnu ()");
        assert_eq!(language_for(".replit"), "Inconnu ()");
    }
}
