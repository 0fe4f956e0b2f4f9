use std::{env, path::PathBuf};

use crate::error::{PathError, PathResult};

/// Expands `~`, `$VAR` and `${VAR}` in `path` and makes the result absolute
/// relative to the current working directory.
///
/// # Errors
///
/// * [`PathError::Empty`] if the path is empty
/// * [`PathError::MissingEnvVar`] if a referenced variable is not set
/// * [`PathError::UnclosedVariable`] for `${` without a closing brace
/// * [`PathError::CurrentDir`] if the working directory cannot be determined
pub fn expand_path(path: &str) -> PathResult<PathBuf> {
    let path = path.trim();
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let mut expanded = String::with_capacity(path.len());
    let mut rest = path;

    if rest == "~" || rest.starts_with("~/") {
        expanded.push_str(&home_dir().to_string_lossy());
        rest = &rest[1..];
    }

    while let Some(pos) = rest.find('$') {
        expanded.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (var, tail) = if let Some(braced) = after.strip_prefix('{') {
            let end = braced.find('}').ok_or_else(|| {
                PathError::UnclosedVariable {
                    input: rest[pos..].to_string(),
                }
            })?;
            (&braced[..end], &braced[end + 1..])
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], &after[end..])
        };

        if var.is_empty() {
            expanded.push('$');
        } else {
            let value = env::var(var).map_err(|_| {
                PathError::MissingEnvVar {
                    var: var.to_string(),
                    input: path.to_string(),
                }
            })?;
            expanded.push_str(&value);
        }
        rest = tail;
    }
    expanded.push_str(rest);

    let expanded = PathBuf::from(expanded);
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        let cwd = env::current_dir().map_err(|err| {
            PathError::CurrentDir {
                source: err,
            }
        })?;
        Ok(cwd.join(expanded))
    }
}

/// Returns `$HOME`, falling back to `/` when it is unset.
pub fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/"))
}

/// Returns `$XDG_CONFIG_HOME`, defaulting to `~/.config`.
pub fn xdg_config_home() -> PathBuf {
    env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".config"))
}

/// Returns `$XDG_DATA_HOME`, defaulting to `~/.local/share`.
pub fn xdg_data_home() -> PathBuf {
    env::var_os("XDG_DATA_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".local/share"))
}
