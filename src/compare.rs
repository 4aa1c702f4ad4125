//! Key comparison callbacks.
//!
//! A [`ByteMap`](crate::ByteMap) orders its entries with a single
//! [`KeyComparator`] chosen at creation time, so the same map type can hold
//! lexicographic byte strings, native-endian integers, or any other
//! fixed-width encoding. The comparators in this module cover the common
//! encodings; anything else is a plain `fn` away.

use core::cmp::Ordering;

/// Three-way ordering function over two raw key buffers.
///
/// Both buffers are always exactly the map's key slot width. The function
/// must implement a strict total order for the tree to behave.
pub type KeyComparator = fn(&[u8], &[u8]) -> Ordering;

/// Byte-wise lexicographic ordering. This is the comparator
/// [`ByteMap::new`](crate::ByteMap::new) uses.
///
/// # Examples
///
/// ```rust
/// use core::cmp::Ordering;
/// use carmine::lexicographic;
///
/// assert_eq!(lexicographic(b"abc", b"abd"), Ordering::Less);
/// assert_eq!(lexicographic(b"abc", b"abc"), Ordering::Equal);
/// ```
pub fn lexicographic(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

macro_rules! int_comparators {
    ($($ty:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!(
                    "Numeric ordering over keys holding a native-endian `",
                    stringify!($ty),
                    "`."
                )]
                ///
                /// Reads are unaligned, so the key buffer needs no particular
                /// placement inside the node.
                ///
                /// # Panics
                ///
                #[doc = concat!(
                    "Panics if either buffer is not exactly `size_of::<",
                    stringify!($ty),
                    ">()` bytes wide."
                )]
                ///
                /// # Examples
                ///
                /// ```rust
                /// use core::cmp::Ordering;
                #[doc = concat!("use carmine::", stringify!($ty), "_native;")]
                ///
                #[doc = concat!(
                    "let (small, large) = (2", stringify!($ty),
                    ".to_ne_bytes(), 10", stringify!($ty), ".to_ne_bytes());"
                )]
                #[doc = concat!(
                    "assert_eq!(", stringify!($ty),
                    "_native(&small, &large), Ordering::Less);"
                )]
                /// ```
                pub fn [<$ty _native>](a: &[u8], b: &[u8]) -> Ordering {
                    let a: $ty = bytemuck::pod_read_unaligned(a);
                    let b: $ty = bytemuck::pod_read_unaligned(b);
                    a.cmp(&b)
                }
            )*
        }
    };
}

int_comparators!(u16, u32, u64, u128, i16, i32, i64, i128);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_orders_prefixes_first() {
        assert_eq!(lexicographic(b"ab", b"ab"), Ordering::Equal);
        assert_eq!(lexicographic(b"aa", b"ab"), Ordering::Less);
        assert_eq!(lexicographic(b"b", b"a"), Ordering::Greater);
    }

    #[test]
    fn numeric_comparators_ignore_byte_order_quirks() {
        // Lexicographic comparison of little-endian encodings gets this
        // pair backwards; the numeric comparators must not.
        let small = 2u32.to_ne_bytes();
        let large = 256u32.to_ne_bytes();
        assert_eq!(u32_native(&small, &large), Ordering::Less);
        assert_eq!(u32_native(&large, &small), Ordering::Greater);
        assert_eq!(u32_native(&small, &small), Ordering::Equal);
    }

    #[test]
    fn signed_comparators_order_negative_values_first() {
        let negative = (-5i64).to_ne_bytes();
        let positive = 3i64.to_ne_bytes();
        assert_eq!(i64_native(&negative, &positive), Ordering::Less);
    }

    #[test]
    #[should_panic]
    fn numeric_comparator_rejects_wrong_widths() {
        let _ = u16_native(&[1], &[2]);
    }
}
