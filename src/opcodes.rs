//! Opcode table.
//!
//! [`define_opcodes!`] holds the canonical list (number, mnemonic, arity) and
//! expands it into the [`Opcode`] enum plus its lookup helpers.

use crate::constants::OPCODE_COUNT;

macro_rules! define_opcodes {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $opcode:literal, $mnemonic:literal, $arity:literal;
        )*
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum Opcode {
            $(
                $(#[$doc])*
                $name = $opcode,
            )*
        }

        impl Opcode {
            /// Every opcode, ordered by number.
            pub const ALL: &'static [Opcode] = &[$(Opcode::$name,)*];

            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $( Opcode::$name => $mnemonic, )*
                }
            }

            /// Number of operand words following the opcode word.
            pub const fn arity(self) -> usize {
                match self {
                    $( Opcode::$name => $arity, )*
                }
            }

            pub const fn number(self) -> u16 {
                self as u16
            }
        }

        /// Map an opcode word to its table entry; `None` outside `0..=21`.
        pub fn lookup(word: u16) -> Option<Opcode> {
            match word {
                $( $opcode => Some(Opcode::$name), )*
                _ => None,
            }
        }
    };
}

define_opcodes! {
    /// stop execution
    Halt = 0, "halt", 0;
    /// set a b ; a = b
    Set = 1, "set", 2;
    /// push a ; append a to the stack
    Push = 2, "push", 1;
    /// pop a ; a = top of stack (empty stack is an error)
    Pop = 3, "pop", 1;
    /// eq a b c ; a = (b == c)
    Eq = 4, "eq", 3;
    /// gt a b c ; a = (b > c)
    Gt = 5, "gt", 3;
    /// jmp a ; jump to a
    Jmp = 6, "jmp", 1;
    /// jt a b ; if a != 0 jump to b
    Jt = 7, "jt", 2;
    /// jf a b ; if a == 0 jump to b
    Jf = 8, "jf", 2;
    /// add a b c ; a = (b + c) mod 32768
    Add = 9, "add", 3;
    /// mult a b c ; a = (b * c) mod 32768
    Mult = 10, "mult", 3;
    /// mod a b c ; a = b mod c
    Mod = 11, "mod", 3;
    /// and a b c ; a = b & c
    And = 12, "and", 3;
    /// or a b c ; a = b | c
    Or = 13, "or", 3;
    /// not a b ; a = 15-bit complement of b
    Not = 14, "not", 2;
    /// rmem a b ; a = memory[b]
    Rmem = 15, "rmem", 2;
    /// wmem a b ; memory[a] = b
    Wmem = 16, "wmem", 2;
    /// call a ; push next address, jump to a
    Call = 17, "call", 1;
    /// ret ; pop address and jump (empty stack halts)
    Ret = 18, "ret", 0;
    /// out a ; write character a
    Out = 19, "out", 1;
    /// in a ; read a character into a
    In = 20, "in", 1;
    /// no operation
    Noop = 21, "noop", 0;
}

const _: () = assert!(Opcode::Noop as u16 + 1 == OPCODE_COUNT);
