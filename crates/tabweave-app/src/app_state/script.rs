//! Command scripts: one [`BrowserCommand`] per line.

use std::fs;
use std::path::Path;

use tabweave_common::{BrowserCommand, TabweaveError};

/// Parse a script. Blank lines and `#` comments are skipped; the first bad
/// line rejects the whole script.
pub fn parse_script(source: &str) -> Result<Vec<BrowserCommand>, TabweaveError> {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| {
            line.parse()
                .map_err(|e| TabweaveError::Script(format!("line {number}: {e}")))
        })
        .collect()
}

pub fn load_script(path: &Path) -> Result<Vec<BrowserCommand>, TabweaveError> {
    let source = fs::read_to_string(path)?;
    parse_script(&source)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn skips_comments_and_blanks() {
        let commands = parse_script("# setup\nnew about:blank\n\n  next  \n").unwrap();
        assert_eq!(
            commands,
            vec![
                BrowserCommand::NewTab(Some("about:blank".into())),
                BrowserCommand::Next
            ]
        );
    }

    #[test]
    fn reports_bad_line_number() {
        let err = parse_script("next\n\nfly away").unwrap_err();
        assert!(matches!(err, TabweaveError::Script(msg) if msg.starts_with("line 3:")));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "go about:blank").unwrap();
        let commands = load_script(file.path()).unwrap();
        assert_eq!(commands, vec![BrowserCommand::Navigate("about:blank".into())]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_script(Path::new("/nonexistent/tabweave/script.txt")).unwrap_err();
        assert!(matches!(err, TabweaveError::Io(_)));
    }
}
