//! Where command text comes from.

use std::io::Read;
use std::path::Path;

use crate::error::CliError;

/// Command text from the argument, the file, or `stdin`, in that order.
pub fn read_source(
    source: Option<String>,
    file: Option<&Path>,
    mut stdin: impl Read,
) -> Result<String, CliError> {
    let text = match (source, file) {
        (Some(source), _) => source,
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(|err| CliError::Io(format!("{}: {err}", path.display())))?,
        (None, None) => {
            let mut text = String::new();
            stdin.read_to_string(&mut text)?;
            text
        }
    };

    if text.trim().is_empty() {
        return Err(CliError::Arguments(
            "no command text given (pass SOURCE, --file, or pipe it on stdin)".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_argument_wins() {
        let text = read_source(Some("/color red".into()), None, "ignored".as_bytes()).unwrap();
        assert_eq!(text, "/color red");
    }

    #[test]
    fn test_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "/web meta\nurl = \"https://example.com\"").unwrap();

        let text = read_source(None, Some(file.path()), "ignored".as_bytes()).unwrap();
        assert!(text.starts_with("/web meta\n"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_source(None, Some(Path::new("/nonexistent/cmd.txt")), &b""[..]).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn test_falls_back_to_stdin() {
        let text = read_source(None, None, "/color gradient\nred\nblue".as_bytes()).unwrap();
        assert_eq!(text, "/color gradient\nred\nblue");
    }

    #[test]
    fn test_blank_input_is_usage_error() {
        let err = read_source(None, None, "  \n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 64);
    }
}
