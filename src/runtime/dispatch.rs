use mlua::{Function, Lua, Table, Value};

use crate::bindings;
use crate::runtime::report::HostError;

/// The script's designated entry point, resolved once before invocation.
#[derive(Debug)]
pub enum EntryPoint {
    /// A global function named `main`, called as `main(args, argc)`.
    Function(Function),
    /// A global table named `Program` with a function field `Main`, called
    /// as `Main(Program, args, argc)` with the table as the receiver.
    Method { receiver: Table, func: Function },
}

/// Resolve the entry point using the fixed two-tier convention. A global
/// `main` is always checked before the `Program` table.
pub fn resolve(lua: &Lua) -> Result<EntryPoint, HostError> {
    let globals = lua.globals();
    match globals.get::<Value>("main")? {
        Value::Function(func) => Ok(EntryPoint::Function(func)),
        Value::Nil => resolve_program(&globals),
        other => Err(uncallable("call", &other, "global 'main'")),
    }
}

fn resolve_program(globals: &Table) -> Result<EntryPoint, HostError> {
    let receiver = match globals.get::<Value>("Program")? {
        Value::Nil => return Err(HostError::EntryMissing),
        Value::Table(table) => table,
        other => return Err(uncallable("index", &other, "global 'Program'")),
    };
    match receiver.get::<Value>("Main")? {
        Value::Function(func) => Ok(EntryPoint::Method { receiver, func }),
        other => Err(uncallable("call", &other, "field 'Main'")),
    }
}

/// The interpreter-style message for an entry slot holding the wrong kind of
/// value, worded as the failed call/index itself would have reported it.
fn uncallable(op: &str, value: &Value, slot: &str) -> HostError {
    mlua::Error::RuntimeError(format!(
        "attempt to {op} a {} value ({slot})",
        value.type_name()
    ))
    .into()
}

/// Invoke the resolved entry point, marshalling the argument vector as a
/// freshly built table plus its raw count. All return values are discarded.
pub fn invoke(lua: &Lua, entry: EntryPoint, argv: &[String]) -> Result<(), HostError> {
    let (args, argc) = bindings::args_table(lua, argv)?;
    match entry {
        EntryPoint::Function(func) => func.call::<()>((args, argc))?,
        EntryPoint::Method { receiver, func } => func.call::<()>((receiver, args, argc))?,
    }
    Ok(())
}
