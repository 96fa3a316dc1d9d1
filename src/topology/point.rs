//! Strong, zero-cost handles for mesh entities.
//!
//! Points, faces and cells are addressed by opaque index types wrapping a
//! `u32`. The wrappers are `repr(transparent)`, so they have the same ABI
//! and layout as the raw index. Unlike a raw integer, they cannot be mixed
//! up across entity kinds, and "unbound" is expressed with `Option` rather
//! than a sentinel value.

use std::fmt;

macro_rules! mesh_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates a handle from a raw index.
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Creates a handle from a container index.
            #[inline]
            pub const fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            /// Returns the raw value.
            #[inline]
            pub const fn get(self) -> u32 {
                self.0
            }

            /// Returns the value as a container index.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

mesh_id! {
    /// Handle for a mesh point (vertex).
    PointId
}

mesh_id! {
    /// Handle for a mesh face.
    FaceId
}

mesh_id! {
    /// Handle for a mesh cell.
    CellId
}

#[cfg(test)]
mod layout_tests {
    //! Compile-time assertion that the handles have the same size as u32.
    use super::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(PointId, u32);
    assert_eq_size!(FaceId, u32);
    assert_eq_size!(CellId, u32);
}


#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let p = PointId::new(123);
        let s = serde_json::to_string(&p).unwrap();
        let p2: PointId = serde_json::from_str(&s).unwrap();
        assert_eq!(p2, p);
    }

    #[test]
    fn bincode_roundtrip() {
        let f = FaceId::new(456);
        let bytes = bincode::serialize(&f).unwrap();
        let f2: FaceId = bincode::deserialize(&bytes).unwrap();
        assert_eq!(f2, f);
    }
}
