//! Static command registry
//!
//! Commands are a fixed list resolved at startup; there is no runtime
//! module discovery. Unknown names are a silent no-op at the dispatch
//! boundary.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Price,
    Ath,
    Convert,
    Lp,
    RestrictionList,
    RestrictionAdd,
    RestrictionRemove,
    RestrictionClear,
}

pub struct Registry {
    commands: HashMap<&'static str, Command>,
}

impl Registry {
    /// The built-in command set.
    pub fn builtin() -> Self {
        let commands = HashMap::from([
            ("price", Command::Price),
            ("ath", Command::Ath),
            ("convert", Command::Convert),
            ("lp", Command::Lp),
            ("restriction list", Command::RestrictionList),
            ("restriction add", Command::RestrictionAdd),
            ("restriction remove", Command::RestrictionRemove),
            ("restriction clear", Command::RestrictionClear),
        ]);

        Self { commands }
    }

    pub fn resolve(&self, name: &str) -> Option<Command> {
        self.commands.get(name.trim()).copied()
    }
}

impl Command {
    /// Administrative commands mutate the restriction map and require the
    /// dispatcher to have verified elevated privilege.
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Command::RestrictionList
                | Command::RestrictionAdd
                | Command::RestrictionRemove
                | Command::RestrictionClear
        )
    }
}
