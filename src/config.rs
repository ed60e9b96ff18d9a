use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::external_editor::EditorImpl;
use crate::highlight::TextFormat;

/// Rows shown by a popup unless configured otherwise.
pub const DEFAULT_MAX_POPUP_HEIGHT: usize = 5;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_mouse: bool,
    pub format: Option<TextFormat>,
    pub max_popup_height: Option<usize>,
    pub theme: Option<ThemeMode>,
    pub log: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            no_mouse: self.no_mouse || other.no_mouse,
            format: other.format.or(self.format),
            max_popup_height: other.max_popup_height.or(self.max_popup_height),
            theme: other.theme.or(self.theme),
            log: other.log.clone().or_else(|| self.log.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("textinput").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("textinput")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("textinput").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("textinput")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".textinputrc")
}

/// `editors.json`, next to the global config file.
pub fn editors_config_path() -> PathBuf {
    global_config_path().with_file_name("editors.json")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# textinput defaults (saved with --save)".to_string());
    if flags.no_mouse {
        lines.push("--no-mouse".to_string());
    }
    if let Some(name) = flags.format.and_then(|f| value_name(&f)) {
        lines.push(format!("--format {name}"));
    }
    if let Some(height) = flags.max_popup_height {
        lines.push(format!("--max-popup-height {height}"));
    }
    if let Some(name) = flags.theme.and_then(|t| value_name(&t)) {
        lines.push(format!("--theme {name}"));
    }
    if let Some(path) = &flags.log {
        lines.push(format!("--log {}", path.display()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the flags this crate knows out of an argument list.
///
/// Unknown tokens and unparsable values are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        let takes_value = matches!(
            name,
            "--format" | "--max-popup-height" | "--theme" | "--log"
        );
        let value = if takes_value && inline.is_none() {
            i += 1;
            tokens.get(i).map(String::as_str)
        } else {
            inline
        };

        match (name, value) {
            ("--no-mouse", None) => flags.no_mouse = true,
            ("--format", Some(v)) => flags.format = TextFormat::from_str(v, true).ok(),
            ("--max-popup-height", Some(v)) => {
                flags.max_popup_height = v.parse().ok().filter(|h| *h > 0);
            }
            ("--theme", Some(v)) => flags.theme = ThemeMode::from_str(v, true).ok(),
            ("--log", Some(v)) => flags.log = Some(PathBuf::from(v)),
            _ => {}
        }
        i += 1;
    }
    flags
}

fn value_name(value: &impl ValueEnum) -> Option<String> {
    value
        .to_possible_value()
        .map(|v| v.get_name().to_string())
}

/// The editors tried when no `editors.json` exists.
pub fn default_editor_impls() -> Vec<EditorImpl> {
    vec![
        EditorImpl::new("VS Code", "code --version", "code -w \"$FILE_PATH\""),
        EditorImpl::new("Sublime Text", "subl --version", "subl -w \"$FILE_PATH\""),
        EditorImpl::new(
            "vim",
            "command -v vim",
            "vim \"$FILE_PATH\" < /dev/tty > /dev/tty",
        ),
    ]
}

/// Load the ordered editor list.
///
/// A missing file gives [`default_editor_impls`]; an empty array gives
/// no editors at all.
pub fn load_editor_impls(path: &Path) -> Result<Vec<EditorImpl>> {
    if !path.exists() {
        return Ok(default_editor_impls());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read editor list {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid editor list {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&args(&[
            "textinput",
            "--no-mouse",
            "--format",
            "sql",
            "--max-popup-height=8",
            "--theme",
            "dark",
            "--log=input.log",
            "query.sql",
        ]));
        assert!(flags.no_mouse);
        assert_eq!(flags.format, Some(TextFormat::Sql));
        assert_eq!(flags.max_popup_height, Some(8));
        assert_eq!(flags.theme, Some(ThemeMode::Dark));
        assert_eq!(flags.log, Some(PathBuf::from("input.log")));
    }

    #[test]
    fn test_parse_flag_tokens_skips_bad_values() {
        let flags = parse_flag_tokens(&args(&[
            "--format",
            "cobol",
            "--max-popup-height",
            "0",
            "--theme=sepia",
        ]));
        assert_eq!(flags, ConfigFlags::default());
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            no_mouse: true,
            theme: Some(ThemeMode::Light),
            max_popup_height: Some(3),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            format: Some(TextFormat::Json),
            theme: Some(ThemeMode::Dark),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.no_mouse);
        assert_eq!(merged.format, Some(TextFormat::Json));
        assert_eq!(merged.max_popup_height, Some(3));
        assert_eq!(merged.theme, Some(ThemeMode::Dark));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config");
        let flags = ConfigFlags {
            no_mouse: true,
            format: Some(TextFormat::Markdown),
            max_popup_height: Some(7),
            theme: Some(ThemeMode::Auto),
            log: Some(PathBuf::from("input.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        assert_eq!(load_config_flags(&path).unwrap(), flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempdir().unwrap();
        let flags = load_config_flags(&dir.path().join("absent")).unwrap();
        assert_eq!(flags, ConfigFlags::default());
    }

    #[test]
    fn test_editors_path_sits_beside_config() {
        let editors = editors_config_path();
        assert_eq!(editors.file_name().and_then(|n| n.to_str()), Some("editors.json"));
        assert_eq!(editors.parent(), global_config_path().parent());
    }

    // --- Editor list ---

    #[test]
    fn test_missing_editor_list_uses_defaults() {
        let dir = tempdir().unwrap();
        let impls = load_editor_impls(&dir.path().join("editors.json")).unwrap();
        assert_eq!(impls, default_editor_impls());
        assert_eq!(impls.len(), 3);
        assert!(impls.iter().all(|i| i.command.contains("$FILE_PATH")));
    }

    #[test]
    fn test_empty_editor_list_stays_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("editors.json");
        fs::write(&path, "[]").unwrap();
        assert!(load_editor_impls(&path).unwrap().is_empty());
    }

    #[test]
    fn test_editor_list_keeps_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("editors.json");
        fs::write(
            &path,
            r#"[
                {"name": "nano", "test_command": "command -v nano", "command": "nano \"$FILE_PATH\""},
                {"name": "ed", "test_command": "true", "command": "ed \"$FILE_PATH\""}
            ]"#,
        )
        .unwrap();
        let names: Vec<_> = load_editor_impls(&path)
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["nano", "ed"]);
    }

    #[test]
    fn test_malformed_editor_list_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("editors.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load_editor_impls(&path).is_err());
    }
}
