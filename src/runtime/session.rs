use mlua::{Lua, LuaOptions, StdLib};

/// One interpreter VM handle, live from `open` until `close`.
///
/// The session is exclusively owned by the invoking thread. All access goes
/// through mlua's typed API, so every host-initiated operation leaves the
/// interpreter stack balanced without caller-side index arithmetic.
pub struct Session {
    lua: Lua,
}

impl Session {
    /// Create a VM with no libraries loaded.
    pub fn open() -> mlua::Result<Self> {
        let lua = Lua::new_with(StdLib::NONE, LuaOptions::default())?;
        Ok(Self { lua })
    }

    /// Install the interpreter's own standard library. Must run before any
    /// script or host code executes.
    pub fn load_default_libraries(&self) -> mlua::Result<()> {
        self.lua.load_std_libs(StdLib::ALL_SAFE)
    }

    /// Borrow the VM handle for loader, installer, and dispatcher calls.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    /// Release the VM handle. Only reachable on the success path; error
    /// paths exit the process and leave teardown to the OS.
    pub fn close(self) {
        drop(self.lua);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlua::Value;

    #[test]
    fn open_starts_without_standard_library() {
        let session = Session::open().unwrap();
        let string_lib: Value = session.lua().globals().get("string").unwrap();
        assert!(string_lib.is_nil());
    }

    #[test]
    fn load_default_libraries_installs_stdlib() {
        let session = Session::open().unwrap();
        session.load_default_libraries().unwrap();
        let formatted: String = session
            .lua()
            .load("return string.format('%d', 42)")
            .eval()
            .unwrap();
        assert_eq!(formatted, "42");
    }
}
