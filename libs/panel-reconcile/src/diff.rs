//! Unified line diff between an egg startup and a server startup

use similar::TextDiff;

/// Header for the "from" side
pub const EGG_LABEL: &str = "Egg Startup";
/// Header for the "to" side
pub const SERVER_LABEL: &str = "Server Startup";

/// Lines of unchanged context around each hunk
pub const CONTEXT_LINES: usize = 3;

/// Render a unified diff from `egg` to `server`.
///
/// Lines are split on line breaks only. Identical input yields an empty
/// string.
pub fn startup_diff(egg: &str, server: &str) -> String {
    TextDiff::from_lines(egg, server)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .missing_newline_hint(false)
        .header(EGG_LABEL, SERVER_LABEL)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_startup_has_empty_diff() {
        assert_eq!(startup_diff("java -jar server.jar", "java -jar server.jar"), "");
        assert_eq!(startup_diff("", ""), "");
    }

    #[test]
    fn test_single_line_diff() {
        let diff = startup_diff("java -jar server.jar", "java -jar old.jar");

        assert!(diff.starts_with("--- Egg Startup\n+++ Server Startup\n"));
        assert!(diff.contains("@@ -1 +1 @@"));
        assert!(diff.contains("-java -jar server.jar"));
        assert!(diff.contains("+java -jar old.jar"));
        assert!(!diff.contains("No newline"));
    }

    #[test]
    fn test_whitespace_is_significant() {
        let diff = startup_diff("./bedrock_server", "./bedrock_server ");
        assert!(!diff.is_empty());
    }

    #[test]
    fn test_context_window_limits_unchanged_lines() {
        let egg = "a\nb\nc\nd\ne\nf\ng\nh\ni\n";
        let server = "a\nb\nc\nd\nE\nf\ng\nh\ni\n";
        let diff = startup_diff(egg, server);

        // three lines either side of the change, nothing further out
        assert!(diff.contains(" b\n"));
        assert!(diff.contains(" h\n"));
        assert!(!diff.contains(" a\n"));
        assert!(!diff.contains(" i\n"));
        assert!(diff.contains("-e\n+E\n"));
    }

    #[test]
    fn test_diff_is_deterministic() {
        let a = startup_diff("./start.sh {{SERVER_PORT}}", "./start.sh 25565");
        let b = startup_diff("./start.sh {{SERVER_PORT}}", "./start.sh 25565");
        assert_eq!(a, b);
    }
}
