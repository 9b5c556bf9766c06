use std::fs;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use mlua::{Lua, Table};
use nix::unistd::getcwd;

use crate::procinfo;
use crate::runtime::loader;

// Embedded at compile time; a copy at ~/.luay/luay.lua overrides it.
const LUAY_BOOTSTRAP: &str = include_str!("../lua/luay.lua");

/// Install the host surface into the VM's global namespace: the `Process`
/// descriptor plus the free-standing `cwd`, `__dirname`, and `wait` globals.
/// Runs before the module loader so top-level script statements can observe
/// all of it.
pub fn install(lua: &Lua, argv: &[String]) -> mlua::Result<()> {
    let globals = lua.globals();

    let process = lua.create_table()?;

    // env and argv/argc are laid down before the host-function entries;
    // everything shares the one table reference.
    let env = lua.create_table()?;
    env.set("LUAY_ENV", "production")?;
    process.set("env", env)?;

    let (args, argc) = args_table(lua, argv)?;
    process.set("argc", argc)?;
    process.set("argv", args)?;

    process.set(
        "MemoryUsage",
        lua.create_function(|_, ()| {
            let stats = procinfo::mem_stats().map_err(mlua::Error::external)?;
            Ok(stats.vm_kb)
        })?,
    )?;
    process.set(
        "RSS",
        lua.create_function(|_, ()| {
            let stats = procinfo::mem_stats().map_err(mlua::Error::external)?;
            Ok(stats.rss_bytes)
        })?,
    )?;

    globals.set("Process", process)?;

    globals.set(
        "cwd",
        lua.create_function(|_, ()| working_dir().map_err(mlua::Error::external))?,
    )?;
    globals.set("__dirname", working_dir().map_err(mlua::Error::external)?)?;
    globals.set(
        "wait",
        lua.create_function(|_, secs: f64| {
            thread::sleep(Duration::from_secs(secs as u64));
            Ok(())
        })?,
    )?;

    Ok(())
}

/// Run the bootstrap script, which installs additional script-level globals
/// before the user's file executes. A copy at `~/.luay/luay.lua` takes the
/// embedded script's place and makes its own siblings require-able.
pub fn install_bootstrap(lua: &Lua) -> mlua::Result<()> {
    if let Some(dir) = home::home_dir().map(|h| h.join(".luay"))
        && dir.join("luay.lua").is_file()
    {
        let file = dir.join("luay.lua");
        loader::append_search_path(lua, &dir.join("?.lua").display().to_string())?;
        let source = fs::read_to_string(&file)
            .with_context(|| format!("cannot open {}", file.display()))
            .map_err(mlua::Error::external)?;
        return lua
            .load(&source)
            .set_name(format!("@{}", file.display()))
            .exec();
    }

    lua.load(LUAY_BOOTSTRAP).set_name("@luay.lua").exec()
}

/// Build the 1-indexed argument table and its raw count. Index 1 is the
/// first argument after the host program name; the count still includes the
/// program name. Shared by the `Process` descriptor and the dispatcher so
/// the two views cannot disagree on the offset.
pub fn args_table(lua: &Lua, argv: &[String]) -> mlua::Result<(Table, i64)> {
    let argc = argv.len() as i64;
    let args = lua.create_table()?;
    for (i, arg) in argv.iter().enumerate().skip(1) {
        args.set(i, arg.as_str())?;
    }
    Ok((args, argc))
}

fn working_dir() -> anyhow::Result<String> {
    let dir = getcwd().context("cannot read working directory")?;
    Ok(dir.to_string_lossy().into_owned())
}
