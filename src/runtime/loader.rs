use std::fs;
use std::path::{Path, absolute};

use anyhow::Context;
use mlua::{Lua, Table};

/// Entry-file spellings whose siblings should be require-able: each maps the
/// script's own filename to a `?.lua` wildcard in the module search path.
const ENTRY_FILENAMES: [&str; 4] = ["main.lua", "Main.lua", "init.lua", "Init.lua"];

/// Execute the script at `path` inside the session, first extending
/// `package.path` so modules next to the script resolve without
/// configuration. Failures carry the interpreter's own error value.
pub fn load(lua: &Lua, path: &str) -> mlua::Result<()> {
    let resolved = absolute(path)
        .with_context(|| format!("cannot resolve {path}"))
        .map_err(mlua::Error::external)?;

    append_search_path(lua, &search_path_augmentation(&resolved))?;

    let source = fs::read_to_string(&resolved)
        .with_context(|| format!("cannot open {}", resolved.display()))
        .map_err(mlua::Error::external)?;
    lua.load(&source)
        .set_name(format!("@{}", resolved.display()))
        .exec()
}

/// Append one entry to the interpreter's module search path.
pub fn append_search_path(lua: &Lua, entry: &str) -> mlua::Result<()> {
    let package: Table = lua.globals().get("package")?;
    let current: String = package.get("path")?;
    package.set("path", format!("{current};{entry}"))
}

/// The search-path contribution for a resolved script path: conventional
/// entry filenames become a sibling wildcard; anything else is appended
/// unchanged and matches no module.
fn search_path_augmentation(path: &Path) -> String {
    let is_entry = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| ENTRY_FILENAMES.contains(&name));

    if is_entry {
        path.with_file_name("?.lua").display().to_string()
    } else {
        path.display().to_string()
    }
}
