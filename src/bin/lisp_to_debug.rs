//! Render a parsed LispIsh tree into:
//! - LispIsh on stdout, in canonical form
//! - Debug on stderr - the internal representation from the `lispish` crate.
//!
//! The debug format is given by the defaults of the `derive(Debug)` macro in Rust.
//!
//!
//! ```ignore
//! <input.lisp lisp_to_debug
//! ```

use std::io::Read;

fn main() -> std::io::Result<()> {
    let mut input = String::new();
    std::io::stdin().lock().read_to_string(&mut input)?;

    let tree = lispish::parse(&input)?;

    println!("{}", tree);
    eprintln!("{:#?}", tree);
    Ok(())
}
