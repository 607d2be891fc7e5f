//! Precedence levels of the Flix expression, type and pattern grammar.
//!
//! The grammar assigns every ambiguous construct a named level (low binds loosest) and an associativity. This
//! module is the immutable, statically-constructed form of that table: [`PRECEDENCE`] lists the entries and
//! [`PrecedenceTable`] wraps a table for lookup. The grammar engine receives a `&PrecedenceTable` at construction
//! and never mutates it.
//!
//! ## Notes
//! - All infix operators share the single [`PrecedenceId::Infix`] level and associate left: `a ⊕ b ⊗ c` is
//!   `(a ⊕ b) ⊗ c` whatever the symbols are.
//! - Prefix operators (`+ - ! ~`) bind tighter than infix and looser than call/field access.
//! - Levels are relative; only the ordering matters.
//!
//! ## Examples
//! ```rust
//! use flix_core::lang::precedence::{Associativity, PrecedenceId, FLIX};
//!
//! assert!(FLIX.binds_tighter(PrecedenceId::Prefix, PrecedenceId::Infix));
//! assert!(FLIX.binds_tighter(PrecedenceId::Call, PrecedenceId::Prefix));
//! assert_eq!(FLIX.associativity(PrecedenceId::Infix), Associativity::Left);
//! ```

/// Define how a construct associates when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    None,
}

/// Stable identifier for every precedence category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrecedenceId {
    /// Bodies of control keywords (`if`, `match`, `try`, template bodies).
    Control,
    /// `A.B.C` in type position.
    QualifiedTypePath,
    /// `x -> body`.
    Lambda,
    /// Binding declarations.
    BindingDeclaration,
    /// `while` headers.
    WhileHeader,
    /// `let` definitions.
    BindingDefinition,
    /// `x = e`, `x := e`.
    Assignment,
    /// `case p => body`.
    CaseArm,
    /// `a.b.c` in value position.
    QualifiedValuePath,
    /// `()`.
    UnitLiteral,
    /// `e : Type`.
    TypeAscription,
    /// `e op` (single trailing identifier).
    Postfix,
    /// `f: { ... }`.
    ColonCall,
    /// `a op b`.
    Infix,
    /// `Type(args)` in constructor position.
    ConstructorApplication,
    /// `-e`, `!e`.
    Prefix,
    /// `f(args)`, `f[T]`.
    Call,
    /// `e.field`.
    FieldAccess,
    /// Lambda parameter bindings, preferred over expressions.
    LocalBinding,
}

impl PrecedenceId {
    /// Number of categories; every table has exactly this many rows.
    pub const COUNT: usize = 19;

    /// Row of this category in a table, which lists categories in declaration order.
    pub const fn index(self) -> usize {
        match self {
            PrecedenceId::Control => 0,
            PrecedenceId::QualifiedTypePath => 1,
            PrecedenceId::Lambda => 2,
            PrecedenceId::BindingDeclaration => 3,
            PrecedenceId::WhileHeader => 4,
            PrecedenceId::BindingDefinition => 5,
            PrecedenceId::Assignment => 6,
            PrecedenceId::CaseArm => 7,
            PrecedenceId::QualifiedValuePath => 8,
            PrecedenceId::UnitLiteral => 9,
            PrecedenceId::TypeAscription => 10,
            PrecedenceId::Postfix => 11,
            PrecedenceId::ColonCall => 12,
            PrecedenceId::Infix => 13,
            PrecedenceId::ConstructorApplication => 14,
            PrecedenceId::Prefix => 15,
            PrecedenceId::Call => 16,
            PrecedenceId::FieldAccess => 17,
            PrecedenceId::LocalBinding => 18,
        }
    }
}

/// One row of the precedence table.
#[derive(Debug, Clone, Copy)]
pub struct PrecedenceInfo {
    pub id: PrecedenceId,
    pub name: &'static str,
    pub level: u8,
    pub associativity: Associativity,
}

use Associativity::{Left, None as NonAssoc, Right};

/// The Flix precedence table, in [`PrecedenceId::index`] order (which is also ascending binding strength).
pub const PRECEDENCE: &[PrecedenceInfo; PrecedenceId::COUNT] = &[
    entry(PrecedenceId::Control, "control", 1, Right),
    entry(PrecedenceId::QualifiedTypePath, "qualified-type-path", 2, Left),
    entry(PrecedenceId::Lambda, "lambda", 2, Right),
    entry(PrecedenceId::BindingDeclaration, "binding-declaration", 2, NonAssoc),
    entry(PrecedenceId::WhileHeader, "while-header", 2, Right),
    entry(PrecedenceId::BindingDefinition, "binding-definition", 3, NonAssoc),
    entry(PrecedenceId::Assignment, "assignment", 3, Right),
    entry(PrecedenceId::CaseArm, "case-arm", 3, Left),
    entry(PrecedenceId::QualifiedValuePath, "qualified-value-path", 4, Left),
    entry(PrecedenceId::UnitLiteral, "unit-literal", 4, NonAssoc),
    entry(PrecedenceId::TypeAscription, "type-ascription", 4, NonAssoc),
    entry(PrecedenceId::Postfix, "postfix", 5, Left),
    entry(PrecedenceId::ColonCall, "colon-trailing-call", 5, Right),
    entry(PrecedenceId::Infix, "infix-operator", 6, Left),
    entry(PrecedenceId::ConstructorApplication, "constructor-application", 7, Left),
    entry(PrecedenceId::Prefix, "prefix-operator", 7, NonAssoc),
    entry(PrecedenceId::Call, "call", 8, Left),
    entry(PrecedenceId::FieldAccess, "field-access", 8, Left),
    entry(PrecedenceId::LocalBinding, "local-binding", 10, NonAssoc),
];

/// Read-only view over a precedence table.
#[derive(Debug, Clone, Copy)]
pub struct PrecedenceTable {
    entries: &'static [PrecedenceInfo; PrecedenceId::COUNT],
}

/// The process-wide Flix table.
pub static FLIX: PrecedenceTable = PrecedenceTable::new(PRECEDENCE);

impl PrecedenceTable {
    /// Wrap `entries`, whose row `i` must describe the category with [`PrecedenceId::index`] `i`.
    pub const fn new(entries: &'static [PrecedenceInfo; PrecedenceId::COUNT]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [PrecedenceInfo] {
        self.entries
    }

    /// Full metadata.
    pub fn info(&self, id: PrecedenceId) -> &'static PrecedenceInfo {
        &self.entries[id.index()]
    }

    pub fn level(&self, id: PrecedenceId) -> u8 {
        self.info(id).level
    }

    pub fn associativity(&self, id: PrecedenceId) -> Associativity {
        self.info(id).associativity
    }

    /// Whether `a` binds strictly tighter than `b`.
    pub fn binds_tighter(&self, a: PrecedenceId, b: PrecedenceId) -> bool {
        self.level(a) > self.level(b)
    }

    /// Whether a construct at `id` may continue an expression whose minimum binding power is `min`.
    ///
    /// ## Notes
    /// - This is the precedence-climbing threshold test: a continuation is allowed when its level is at least the
    ///   current minimum.
    pub fn admits(&self, id: PrecedenceId, min: u8) -> bool {
        self.level(id) >= min
    }

    /// The binding power to require of the right operand of a construct at `id`.
    ///
    /// ## Notes
    /// - Left-associative constructs demand strictly tighter right operands, so chains grow to the left.
    pub fn right_operand_min(&self, id: PrecedenceId) -> u8 {
        let info = self.info(id);
        match info.associativity {
            Associativity::Left | Associativity::None => info.level + 1,
            Associativity::Right => info.level,
        }
    }
}

const fn entry(id: PrecedenceId, name: &'static str, level: u8, associativity: Associativity) -> PrecedenceInfo {
    PrecedenceInfo {
        id,
        name,
        level,
        associativity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_ascending() {
        let levels: Vec<u8> = PRECEDENCE.iter().map(|e| e.level).collect();
        let mut sorted = levels.clone();
        sorted.sort_unstable();
        assert_eq!(levels, sorted);
    }

    #[test]
    fn rows_follow_category_index() {
        for (i, info) in PRECEDENCE.iter().enumerate() {
            assert_eq!(info.id.index(), i, "{:?} is out of place", info.id);
            assert_eq!(FLIX.info(info.id).name, info.name);
        }
    }

    #[test]
    fn documented_ordering_holds() {
        use PrecedenceId::*;
        let chain = [Control, Lambda, Assignment, TypeAscription, Postfix, Infix, Prefix, Call, LocalBinding];
        for pair in chain.windows(2) {
            assert!(FLIX.binds_tighter(pair[1], pair[0]), "{:?} should bind tighter than {:?}", pair[1], pair[0]);
        }
        assert_eq!(FLIX.level(Postfix), FLIX.level(ColonCall));
        assert_eq!(FLIX.level(Call), FLIX.level(FieldAccess));
    }

    #[test]
    fn infix_right_operand_is_strictly_tighter() {
        assert_eq!(FLIX.right_operand_min(PrecedenceId::Infix), FLIX.level(PrecedenceId::Infix) + 1);
        assert_eq!(FLIX.right_operand_min(PrecedenceId::Assignment), FLIX.level(PrecedenceId::Assignment));
    }
}
