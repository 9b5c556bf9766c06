mod bindings;
mod procinfo;
mod runtime;

use std::env;

use runtime::report::{self, HostError};
use runtime::session::Session;
use runtime::{dispatch, loader};

fn main() {
    let argv: Vec<String> = env::args().collect();

    // Bad usage is a non-error exit: nothing is loaded, nothing dispatched.
    if argv.len() != 2 {
        println!("Usage: luay <file>\n");
        return;
    }

    let session = match Session::open() {
        Ok(session) => session,
        Err(err) => report::report(&HostError::Lua(err)),
    };

    if let Err(err) = run(&session, &argv) {
        report::report(&err);
    }

    session.close();
}

/// Drive one script through the full lifecycle: default libraries, host
/// globals, bootstrap, module load, entry-point dispatch.
fn run(session: &Session, argv: &[String]) -> Result<(), HostError> {
    let lua = session.lua();

    session.load_default_libraries()?;
    bindings::install(lua, argv)?;
    bindings::install_bootstrap(lua)?;

    loader::load(lua, &argv[1])?;

    let entry = dispatch::resolve(lua)?;
    dispatch::invoke(lua, entry, argv)?;
    Ok(())
}
