//! The macro table: a single-file-scoped name→body map used by the
//! pre-processor. Grounded on `data_structures.c`'s `add_macro`/
//! `find_macro`, translated from the head-insertion linked list to an
//! insertion-ordered vector, matching [`crate::symbol::SymbolTable`].

#[derive(Debug, Clone)]
pub struct Macro {
    pub name: String,
    pub body: String,
}

#[derive(Debug, Default)]
pub struct MacroTable {
    macros: Vec<Macro>,
}

impl MacroTable {
    pub fn new() -> MacroTable {
        MacroTable::default()
    }

    /// Define a macro. Returns `false` without modifying the table if
    /// `name` is already defined.
    pub fn add(&mut self, name: &str, body: String) -> bool {
        if self.find(name).is_some() {
            return false;
        }
        self.macros.push(Macro {
            name: name.to_string(),
            body,
        });
        true
    }

    pub fn find(&self, name: &str) -> Option<&Macro> {
        self.macros.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_names() {
        let mut table = MacroTable::new();
        assert!(table.add("M", "mov r1, r2\n".to_string()));
        assert!(!table.add("M", "add r1, r2\n".to_string()));
        assert_eq!(table.find("M").unwrap().body, "mov r1, r2\n");
    }

    #[test]
    fn finds_body_verbatim() {
        let mut table = MacroTable::new();
        let body = "mov r1, r2\nadd r2, r3\n".to_string();
        table.add("M", body.clone());
        assert_eq!(table.find("M").unwrap().body, body);
        assert!(table.find("NOPE").is_none());
    }
}
