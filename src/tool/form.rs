// src/tool/form.rs

use std::fmt;

/// A concrete way of invoking a logical tool.
///
/// Many tools ship in two shapes at once: a plugin subcommand of a bigger CLI
/// (`docker compose`) and an older standalone binary (`docker-compose`). Both
/// accept the same arguments once the leading part is stripped off.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InvocationForm {
    /// `<binary> <subcommand> ...`, e.g. `docker compose up`.
    Integrated { binary: String, subcommand: String },
    /// `<binary> ...`, e.g. `docker-compose up`.
    Standalone { binary: String },
}

impl InvocationForm {
    pub fn integrated(binary: impl Into<String>, subcommand: impl Into<String>) -> Self {
        InvocationForm::Integrated {
            binary: binary.into(),
            subcommand: subcommand.into(),
        }
    }

    pub fn standalone(binary: impl Into<String>) -> Self {
        InvocationForm::Standalone {
            binary: binary.into(),
        }
    }

    /// The executable to spawn.
    pub fn binary(&self) -> &str {
        match self {
            InvocationForm::Integrated { binary, .. } | InvocationForm::Standalone { binary } => {
                binary
            }
        }
    }

    /// Arguments that must precede everything else for this form.
    pub fn leading_args(&self) -> Vec<String> {
        match self {
            InvocationForm::Integrated { subcommand, .. } => vec![subcommand.clone()],
            InvocationForm::Standalone { .. } => Vec::new(),
        }
    }

    /// Arguments of the identity check used to tell whether this form is
    /// installed, e.g. `["compose", "version"]`.
    pub fn probe_args(&self, version_arg: &str) -> Vec<String> {
        let mut args = self.leading_args();
        args.push(version_arg.to_string());
        args
    }
}

impl fmt::Display for InvocationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationForm::Integrated { binary, subcommand } => {
                write!(f, "{} {}", binary, subcommand)
            }
            InvocationForm::Standalone { binary } => f.write_str(binary),
        }
    }
}
