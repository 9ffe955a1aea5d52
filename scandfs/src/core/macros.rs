// SPDX-License-Identifier: MIT

/// Wires the `From` conversions between the error layers in one place:
/// each sub-error into its top-level variant, `&'static str` into every
/// `Other` variant, and the cross-layer embeddings.
#[macro_export]
macro_rules! fs_error_wiring {
    (
        top => $top:ty {
            $($top_src:ty : $top_variant:ident),+ $(,)?
        },
        str_into => [ $($str_tgt:ty),* $(,)? ],
        sub => {
            $($src:ty => [ $($dst:ident :: $dst_variant:ident),+ ]),* $(,)?
        } $(,)?
    ) => {
        $(
            impl From<$top_src> for $top {
                #[inline]
                fn from(e: $top_src) -> Self {
                    <$top>::$top_variant(e)
                }
            }
        )+

        $(
            impl From<&'static str> for $str_tgt {
                #[inline]
                fn from(msg: &'static str) -> Self {
                    <$str_tgt>::Other(msg)
                }
            }
        )*
        impl From<&'static str> for $top {
            #[inline]
            fn from(msg: &'static str) -> Self {
                <$top>::Other(msg)
            }
        }

        $($(
            impl From<$src> for $dst {
                #[inline]
                fn from(e: $src) -> Self {
                    $dst::$dst_variant(e)
                }
            }
        )+)*
    };
}

/// Early-return with the given error unless the condition holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err.into());
        }
    };
}
