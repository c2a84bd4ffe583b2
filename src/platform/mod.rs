// Platform layer: everything that talks to the host OS directly.

pub mod derived;
pub mod shell;
