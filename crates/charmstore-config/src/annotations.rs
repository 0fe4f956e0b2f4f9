use std::any::type_name;

use documented::DocumentedFields;
use toml_edit::{Decor, DocumentMut, Item, RawString};
use tracing::warn;

use crate::error::{ConfigError, Result};

/// Renders documentation text as a block of TOML comment lines.
pub fn comment_block(docs: &str) -> String {
    docs.lines()
        .map(|line| {
            if line.is_empty() {
                "#\n".to_string()
            } else {
                format!("# {line}\n")
            }
        })
        .collect()
}

fn prepend_comments(decor: &mut Decor, docs: &str) {
    let existing = decor
        .prefix()
        .and_then(RawString::as_str)
        .unwrap_or_default();
    let separator = if existing.is_empty() { "" } else { "#\n" };
    decor.set_prefix(format!("{existing}{separator}{}", comment_block(docs)));
}

/// Writes each field's documentation from `T` above the matching top-level key.
///
/// Keys with no matching field are left untouched and reported at `warn` level.
pub fn annotate_document<T>(doc: &mut DocumentMut) -> Result<()>
where
    T: DocumentedFields,
{
    let table = doc.as_table_mut();

    for (mut key, item) in table.iter_mut() {
        let name = key.get().to_string();
        let Ok(docs) = T::get_field_docs(&name) else {
            warn!(
                "Field '{}' has no documentation on '{}'",
                name,
                type_name::<T>()
            );
            continue;
        };

        match item {
            Item::None => return Err(ConfigError::UnexpectedTomlItem(name)),
            Item::Value(_) => prepend_comments(key.leaf_decor_mut(), docs),
            Item::Table(sub_table) => prepend_comments(sub_table.decor_mut(), docs),
            Item::ArrayOfTables(_) => return Err(ConfigError::UnexpectedTomlItem(name)),
        }
    }

    Ok(())
}
