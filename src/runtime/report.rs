use std::process;

use thiserror::Error;

/// Every failure the host can observe after the usage check. All of them are
/// fatal: the reporter prints once and terminates with exit code 1.
#[derive(Debug, Error)]
pub enum HostError {
    #[error(
        "Your program lacks a 'main' function or 'Program' class with 'Main' method, therefore it can not run."
    )]
    EntryMissing,

    #[error(transparent)]
    Lua(#[from] mlua::Error),
}

/// Print the failure and terminate the process.
///
/// Host-detected conditions carry the `[Luay]` tag; interpreter failures are
/// printed as the interpreter's own error value, with no message override.
/// Session close is skipped on this path; the OS reclaims the VM.
pub fn report(err: &HostError) -> ! {
    match err {
        HostError::EntryMissing => println!("[Luay] {err}"),
        HostError::Lua(cause) => println!("{}", error_text(cause)),
    }
    process::exit(1);
}

/// The string form of the propagated interpreter error value, unwrapped from
/// the framing mlua adds around callback and syntax errors.
fn error_text(err: &mlua::Error) -> String {
    match err {
        mlua::Error::RuntimeError(message) => message.clone(),
        mlua::Error::SyntaxError { message, .. } => message.clone(),
        mlua::Error::CallbackError { cause, .. } => error_text(cause),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlua::Lua;

    #[test]
    fn runtime_error_text_is_the_raw_message() {
        let err = mlua::Error::RuntimeError("kaboom".to_string());
        assert_eq!(error_text(&err), "kaboom");
    }

    #[test]
    fn callback_nesting_is_unwrapped() {
        let lua = Lua::new();
        let explode = lua
            .create_function(|_, ()| -> mlua::Result<()> {
                Err(mlua::Error::RuntimeError("kaboom".to_string()))
            })
            .unwrap();
        let err = explode.call::<()>(()).unwrap_err();
        assert_eq!(error_text(&err), "kaboom");
    }

    #[test]
    fn syntax_error_text_comes_from_the_interpreter() {
        let lua = Lua::new();
        let err = lua.load("not lua at all").exec().unwrap_err();
        assert!(error_text(&err).contains("near"));
    }

    #[test]
    fn entry_missing_message_is_fixed() {
        let message = HostError::EntryMissing.to_string();
        assert!(message.contains("lacks a 'main' function or 'Program' class with 'Main' method"));
    }
}
