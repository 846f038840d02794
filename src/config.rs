pub trait ConfigT {
    const DEBUG: bool;
    const CHECK_INVARIANTS: bool; // re-verify the whole tree after every insert/remove
}

/// Trace line for a structural step. Expects a type parameter named `Config`
/// bound by `ConfigT` in scope at the call site.
#[macro_export]
macro_rules! debug {
    ($writer:expr, $($arg:tt)+) => {
        if Config::DEBUG {
            match $writer {
                Some(ref w) => {
                    use std::fmt::Write as _;
                    let _ = writeln!(w.borrow_mut(), $($arg)+);
                }
                None => {
                    eprintln!($($arg)+);
                }
            }
        }
    };
}

pub struct DefaultConfig {}
pub struct CheckedConfig {}
pub struct DebugConfig {}

impl ConfigT for DefaultConfig {
    const DEBUG: bool = false;
    const CHECK_INVARIANTS: bool = false;
}

impl ConfigT for CheckedConfig {
    const DEBUG: bool = false;
    const CHECK_INVARIANTS: bool = true;
}

impl ConfigT for DebugConfig {
    const DEBUG: bool = true;
    const CHECK_INVARIANTS: bool = true;
}
