// SPDX-License-Identifier: MIT

/// Generates little-endian read/write helpers for each primitive type.
#[macro_export]
macro_rules! blockio_le_rw {
    ($($ty:ty),+ $(,)?) => {
        $(
            paste::paste! {
                #[doc = concat!("Writes a little-endian `", stringify!($ty), "` at `offset`.")]
                #[inline(always)]
                fn [<write_ $ty _at>](&mut self, offset: u64, value: $ty) -> BlockIOResult {
                    self.write_at(offset, &value.to_le_bytes())
                }

                #[doc = concat!("Reads a little-endian `", stringify!($ty), "` from `offset`.")]
                #[inline(always)]
                fn [<read_ $ty _at>](&mut self, offset: u64) -> BlockIOResult<$ty> {
                    let mut buf = [0u8; core::mem::size_of::<$ty>()];
                    self.read_at(offset, &mut buf)?;
                    Ok(<$ty>::from_le_bytes(buf))
                }
            }
        )+
    };
}
