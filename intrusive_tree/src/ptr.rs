use core::{
    fmt::Debug,
    hash::Hash,
    num::{NonZeroU128, NonZeroU16, NonZeroU32, NonZeroU64, NonZeroU8, NonZeroUsize},
};

/// Generation counter type of a `Ptr`.
///
/// Implemented for the `NonZeroU...` types and for `()`, which disables
/// generation counting entirely.
pub trait PtrGen: Debug + Hash + Clone + Copy + PartialEq + Eq + PartialOrd + Ord + Send + Sync {
    /// Arenas start at generation 2, so pointers with generation 1 are
    /// guaranteed invalid
    fn one() -> Self;
    fn two() -> Self;
    /// Panics on overflow
    fn increment(this: Self) -> Self;
}

macro_rules! impl_gen {
    ($($x: ident)*) => {
        $(
            impl PtrGen for $x {
                #[inline]
                fn one() -> Self {
                    Self::MIN
                }

                #[inline]
                fn two() -> Self {
                    Self::MIN.saturating_add(1)
                }

                #[inline]
                fn increment(this: Self) -> Self {
                    match this.checked_add(1) {
                        Some(x) => x,
                        None => panic!("generation overflow"),
                    }
                }
            }
        )*
    };
}

impl_gen!(NonZeroU8 NonZeroU16 NonZeroU32 NonZeroU64 NonZeroU128);

impl PtrGen for () {
    #[inline]
    fn one() -> Self {}

    #[inline]
    fn two() -> Self {}

    #[inline]
    fn increment(_this: Self) -> Self {}
}

/// Index type of a `Ptr`.
///
/// The stored value is the zero based index plus one, so that `Option<P>`
/// link fields take no extra space.
pub trait PtrInx: Debug + Hash + Clone + Copy + PartialEq + Eq + PartialOrd + Ord + Send + Sync {
    /// Panics if `inx` is not representable
    fn new(inx: usize) -> Self;
    /// Returns the zero based index
    fn get(this: Self) -> usize;
    /// The maximum representable zero based index
    fn max() -> usize;
}

macro_rules! impl_ptr_inx {
    ($($nz:ident $x:ident);*;) => {
        $(
            impl PtrInx for $nz {
                #[inline]
                fn new(inx: usize) -> Self {
                    match $x::try_from(inx.wrapping_add(1)).ok().and_then($nz::new) {
                        Some(x) => x,
                        None => panic!("arena index overflow"),
                    }
                }

                #[inline]
                fn get(this: Self) -> usize {
                    (this.get() as usize).wrapping_sub(1)
                }

                #[inline]
                fn max() -> usize {
                    usize::try_from($x::MAX).unwrap_or(usize::MAX).wrapping_sub(1)
                }
            }
        )*
    };
}

impl_ptr_inx!(
    NonZeroUsize usize;
    NonZeroU8 u8;
    NonZeroU16 u16;
    NonZeroU32 u32;
    NonZeroU64 u64;
    NonZeroU128 u128;
);

/// A typed handle into an [Arena](crate::Arena), made of an index and a
/// generation counter.
///
/// Use the [ptr_struct](crate::ptr_struct) macro instead of implementing this
/// manually. `Default` should return [Ptr::invalid].
pub trait Ptr: Debug + Hash + Clone + Copy + PartialEq + Eq + PartialOrd + Ord + Send + Sync {
    type Inx: PtrInx;
    type Gen: PtrGen;

    /// Returns a `Ptr` with generation `PtrGen::one()` and the maximum index,
    /// which no arena with generation counters will ever accept
    fn invalid() -> Self;

    fn inx(self) -> Self::Inx;

    fn gen(self) -> Self::Gen;

    /// Do not use this unless you are manually managing internal details
    #[doc(hidden)]
    fn _from_raw(inx: Self::Inx, gen: Self::Gen) -> Self;
}

/// Makes new structs implementing [Ptr]. By default the index type is
/// `NonZeroUsize` and the generation type is `NonZeroU64`. The index type can
/// be overridden in square brackets, and the generation type in parenthesis.
/// Empty parenthesis remove the generation counter. Attributes can follow as a
/// comma separated list, and multiple structs of the same kind can be made at
/// once with semicolon separators.
///
/// ```
/// use core::num::{NonZeroU16, NonZeroU32};
/// use intrusive_tree::{ptr_struct, Arena, Ptr};
///
/// ptr_struct!(P0 doc="Handles to line elements");
/// ptr_struct!(P1[NonZeroU32]);
/// ptr_struct!(P2(NonZeroU16));
/// ptr_struct!(P3[NonZeroU16]());
/// ptr_struct!(Q0(); Q1());
///
/// let mut a: Arena<P0, &str> = Arena::new();
/// let p = a.insert("apple");
/// assert_eq!(format!("{p:?}"), "P0[0](2)");
/// assert!(!a.contains(P0::invalid()));
/// ```
#[macro_export]
macro_rules! ptr_struct {
    (@define $struct_name:ident, $inx_type:ty, $gen_type:ty, $($attributes:meta),*) => {
        $(#[$attributes])*
        #[derive(
            core::hash::Hash,
            core::clone::Clone,
            core::marker::Copy,
            core::cmp::PartialEq,
            core::cmp::Eq,
            core::cmp::PartialOrd,
            core::cmp::Ord
        )]
        pub struct $struct_name {
            #[doc(hidden)]
            _internal_inx: $inx_type,
            #[doc(hidden)]
            _internal_gen: $gen_type,
        }

        impl $crate::Ptr for $struct_name {
            type Inx = $inx_type;
            type Gen = $gen_type;

            #[inline]
            fn invalid() -> Self {
                Self {
                    _internal_inx: $crate::PtrInx::new(<Self::Inx as $crate::PtrInx>::max()),
                    _internal_gen: $crate::PtrGen::one(),
                }
            }

            #[inline]
            fn inx(self) -> Self::Inx {
                self._internal_inx
            }

            #[inline]
            fn gen(self) -> Self::Gen {
                self._internal_gen
            }

            #[inline]
            #[doc(hidden)]
            fn _from_raw(_internal_inx: Self::Inx, _internal_gen: Self::Gen) -> Self {
                Self {
                    _internal_inx,
                    _internal_gen,
                }
            }
        }

        impl core::default::Default for $struct_name {
            #[inline]
            fn default() -> Self {
                $crate::Ptr::invalid()
            }
        }

        // kept on one line so that arena and tree dumps stay readable
        impl core::fmt::Debug for $struct_name {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                let inx = <$inx_type as $crate::PtrInx>::get(self._internal_inx);
                if core::mem::size_of::<$gen_type>() == 0 {
                    f.write_fmt(format_args!("{}[{}]", stringify!($struct_name), inx))
                } else {
                    f.write_fmt(format_args!(
                        "{}[{}]({:?})",
                        stringify!($struct_name),
                        inx,
                        self._internal_gen
                    ))
                }
            }
        }

        impl core::fmt::Display for $struct_name {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                core::fmt::Debug::fmt(self, f)
            }
        }
    };
    ($($struct_name:ident[$inx_type:ty]($gen_type:ty) $($attributes:meta),*);*) => {
        $(
            $crate::ptr_struct!(@define $struct_name, $inx_type, $gen_type, $($attributes),*);
        )*
    };
    ($($struct_name:ident[$inx_type:ty]() $($attributes:meta),*);*) => {
        $(
            $crate::ptr_struct!(@define $struct_name, $inx_type, (), $($attributes),*);
        )*
    };
    ($($struct_name:ident[$inx_type:ty] $($attributes:meta),*);*) => {
        $(
            $crate::ptr_struct!(
                @define $struct_name, $inx_type, core::num::NonZeroU64, $($attributes),*
            );
        )*
    };
    ($($struct_name:ident($gen_type:ty) $($attributes:meta),*);*) => {
        $(
            $crate::ptr_struct!(
                @define $struct_name, core::num::NonZeroUsize, $gen_type, $($attributes),*
            );
        )*
    };
    ($($struct_name:ident() $($attributes:meta),*);*) => {
        $(
            $crate::ptr_struct!(@define $struct_name, core::num::NonZeroUsize, (), $($attributes),*);
        )*
    };
    ($($struct_name:ident $($attributes:meta),*);*) => {
        $(
            $crate::ptr_struct!(
                @define $struct_name, core::num::NonZeroUsize, core::num::NonZeroU64,
                $($attributes),*
            );
        )*
    };
}
