/// Domain-separation tag for each value kind.
///
/// The numeric values are part of the hashing contract: changing them changes
/// every digest the engine produces. Each hash computation starts with the
/// kind's tag byte, preventing cross-kind collisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    String = 0,
    Float = 1,
    Map = 2,
    Slice = 3,
    True = 4,
    False = 5,
    Null = 6,
}

impl TypeTag {
    /// The tag as its single canonical byte.
    pub const fn byte(self) -> u8 {
        self as u8
    }
}
