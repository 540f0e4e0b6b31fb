use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use regex::Regex;

use super::super::input::TextInput;

/// Glob patterns of a file filter expression such as
/// `Config files (*.toml *.json);;All files (*)`.
///
/// A file matches when its name matches any pattern of any group. An
/// expression without usable patterns accepts every file.
#[derive(Debug, Clone)]
pub(super) struct FileFilter {
    patterns: Vec<Regex>,
}

impl FileFilter {
    pub fn parse(expression: &str) -> Self {
        let patterns = expression
            .split(";;")
            .flat_map(|group| globs_of(group).into_iter())
            .filter_map(|glob| match glob_to_regex(&glob) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    log::warn!("ignoring file filter pattern '{glob}': {err}");
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn matches(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        self.patterns.iter().any(|pattern| pattern.is_match(name))
    }
}

fn globs_of(group: &str) -> Vec<String> {
    let group = group.trim();
    let inner = match (group.rfind('('), group.rfind(')')) {
        (Some(open), Some(close)) if open < close => &group[open + 1..close],
        _ => group,
    };
    inner.split_whitespace().map(str::to_string).collect()
}

fn glob_to_regex(glob: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::from("^");
    for ch in glob.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern.push('$');
    Regex::new(&pattern)
}

#[derive(Debug, Clone)]
enum PickKind {
    File(FileFilter),
    Directory,
}

/// Typed path entry standing in for a native chooser.
#[derive(Debug, Clone)]
pub(super) struct PathPrompt {
    kind: PickKind,
    title: String,
    hint: String,
    pub input: String,
    pub error: Option<String>,
}

impl PathPrompt {
    pub fn file(start_dir: &Path, filter: &str) -> Self {
        Self {
            kind: PickKind::File(FileFilter::parse(filter)),
            title: "Choose a file".to_string(),
            hint: format!("Filter: {filter}"),
            input: seed(start_dir),
            error: None,
        }
    }

    pub fn directory(start_dir: &Path) -> Self {
        Self {
            kind: PickKind::Directory,
            title: "Choose a directory".to_string(),
            hint: "Enter an existing directory".to_string(),
            input: start_dir.display().to_string(),
            error: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub fn edit(&mut self, input: TextInput) {
        match input {
            TextInput::Insert(ch) => self.input.push(ch),
            TextInput::Backspace => {
                self.input.pop();
            }
            TextInput::Newline => {}
        }
        self.error = None;
    }

    /// The chosen path if it names an existing entry of the right kind.
    pub fn resolve(&self) -> Result<PathBuf, String> {
        let raw = self.input.trim();
        if raw.is_empty() {
            return Err("enter a path".to_string());
        }
        let path = PathBuf::from(raw);
        match &self.kind {
            PickKind::File(filter) => {
                if !path.is_file() {
                    return Err(format!("{raw} is not an existing file"));
                }
                if !filter.matches(&path) {
                    return Err(format!("{raw} does not match the filter"));
                }
            }
            PickKind::Directory => {
                if !path.is_dir() {
                    return Err(format!("{raw} is not an existing directory"));
                }
            }
        }
        Ok(path)
    }
}

fn seed(start_dir: &Path) -> String {
    let mut text = start_dir.display().to_string();
    if !text.is_empty() && !text.ends_with(MAIN_SEPARATOR) {
        text.push(MAIN_SEPARATOR);
    }
    text
}
