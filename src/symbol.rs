//! The symbol table: an insertion-ordered name→(address, attribute) map.
//!
//! Grounded on `data_structures.c`'s `add_symbol`/`find_symbol`/
//! `update_data_symbols`, which store symbols on a singly linked list built
//! by head insertion — so a literal port would enumerate symbols in
//! *reverse* declaration order. Nothing in spec.md pins that order, and
//! forward (declaration) order is the more natural reading for anything
//! that walks the table afterwards (the `.ent` file, diagnostics), so this
//! keeps insertion order instead.

/// What a symbol was declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolAttribute {
    Code,
    Data,
    External,
    Entry,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub address: u32,
    pub attribute: SymbolAttribute,
}

/// An insertion-ordered, unique-keyed table of symbols local to one source
/// file. Fresh per file; nothing here is process-wide state.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Insert a new symbol. Returns `false` without modifying the table if
    /// `name` is already defined (the caller is responsible for turning
    /// that into a "label already defined" diagnostic).
    pub fn add(&mut self, name: &str, address: u32, attribute: SymbolAttribute) -> bool {
        if self.find(name).is_some() {
            return false;
        }
        self.symbols.push(Symbol {
            name: name.to_string(),
            address,
            attribute,
        });
        true
    }

    pub fn find(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.symbols.iter_mut().find(|s| s.name == name)
    }

    /// Promote an existing symbol to [`SymbolAttribute::Entry`]. Returns
    /// `false` if `name` is undefined or is itself `External` (a symbol
    /// can't be both imported and exported).
    pub fn mark_entry(&mut self, name: &str) -> bool {
        match self.find_mut(name) {
            Some(symbol) if symbol.attribute != SymbolAttribute::External => {
                symbol.attribute = SymbolAttribute::Entry;
                true
            }
            _ => false,
        }
    }

    /// After the first pass, every `Data` symbol's address is relative to
    /// the start of the data image; offset it by the final instruction
    /// counter (`ICF`) so it lands past the code image.
    pub fn update_data_symbols(&mut self, icf: u32) {
        for symbol in &mut self.symbols {
            if symbol.attribute == SymbolAttribute::Data {
                symbol.address += icf;
            }
        }
    }

    /// Symbols in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn entries(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols
            .iter()
            .filter(|s| s.attribute == SymbolAttribute::Entry)
    }
}
