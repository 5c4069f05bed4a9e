//! Trace header emission.
//!
//! The reload entry point stamps every run with the active branch, framed the
//! same way the platform scripts frame their own section headers.

use chrono::Utc;
use std::fmt::Write;

const SEPARATOR: &str = "=================================================================";

/// Build the branch trace block, exactly as it appears in the reload log:
///
/// ```text
/// TRACE
/// =================================================================
///     GIT Branch: <branch>
/// =================================================================
/// ```
///
/// The branch is substituted verbatim, with no formatting applied.
pub fn branch_header(branch: &str) -> String {
    let mut block = String::new();
    writeln!(block, "TRACE").unwrap();
    writeln!(block, "{}", SEPARATOR).unwrap();
    writeln!(block, "    GIT Branch: {}", branch).unwrap();
    writeln!(block, "{}", SEPARATOR).unwrap();
    block
}

/// Current UTC time formatted `YYYY-MM-DD hh:mm:ss.ffffff`.
///
/// Captured once per run; every record loaded during the run carries the same
/// load timestamp.
pub fn utc_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_header_format() {
        let block = branch_header("main");
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "TRACE");
        assert_eq!(lines[1], "=".repeat(65));
        assert_eq!(lines[2], "    GIT Branch: main");
        assert_eq!(lines[3], "=".repeat(65));
    }

    #[test]
    fn test_branch_header_substitutes_verbatim() {
        let block = branch_header("feature/odd name");
        assert!(block.contains("    GIT Branch: feature/odd name"));
    }

    #[test]
    fn test_utc_timestamp_shape() {
        let ts = utc_timestamp();

        // YYYY-MM-DD hh:mm:ss.ffffff
        assert_eq!(ts.len(), 26);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[19..20], ".");
        assert_eq!(ts[20..].len(), 6);
        assert!(ts[20..].chars().all(|c| c.is_ascii_digit()));
    }
}
